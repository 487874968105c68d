pub mod square;

pub use self::square::Square;

use linked_hash_map::LinkedHashMap;
use linked_hash_set::LinkedHashSet;

pub type LinkedAHashSet<T> = LinkedHashSet<T, ahash::RandomState>;
pub type LinkedAHashMap<K, V> = LinkedHashMap<K, V, ahash::RandomState>;
