pub(crate) type BuildHasher = fxhash::FxBuildHasher;

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, BuildHasher>;
pub(crate) type HashSet<K> = hashbrown::HashSet<K, BuildHasher>;

pub(crate) type IndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

/// An interned string.
///
/// This is provided by the
/// [`symbol_table`](https://crates.io/crates/symbol_table) crate.
///
/// Operator and atom names are compared and hashed constantly, so they are
/// kept as 4-byte interned handles rather than heap strings. Creating a
/// [`Symbol`] from a string looks it up in a global table, inserting it if
/// not found; the table leaks its strings, which is fine for things like
/// operator names and identifiers.
pub use symbol_table::GlobalSymbol as Symbol;

pub(crate) fn concat_vecs<T>(to: &mut Vec<T>, mut from: Vec<T>) {
    if to.len() < from.len() {
        std::mem::swap(to, &mut from)
    }
    to.extend(from);
}
