//! An arena-backed, separately-chained hash map: the worked-example client
//! that exercises the arena facade end to end.

use std::ptr;

use crate::arena::{Arena, ArenaSlice};
use crate::error::AllocError;

/// Number of buckets a freshly-created map starts with.
pub const INITIAL_BUCKET_SIZE: usize = 16;
/// Average chain length at which the bucket table doubles.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// FNV-1a, 32-bit. Matches the hashing used by the Go original this map is
/// modeled on, over each key type's little-endian byte encoding.
fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Types the map can hash. Implemented for the primitive key types; there is
/// no blanket impl so adding a new key type is an explicit, visible choice.
pub trait ArenaHashable {
    fn arena_hash(&self) -> u32;
}

macro_rules! impl_hashable_int {
    ($($t:ty),* $(,)?) => {
        $(impl ArenaHashable for $t {
            fn arena_hash(&self) -> u32 {
                fnv1a(&self.to_le_bytes())
            }
        })*
    };
}

impl_hashable_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ArenaHashable for f32 {
    fn arena_hash(&self) -> u32 {
        fnv1a(&self.to_bits().to_le_bytes())
    }
}

impl ArenaHashable for f64 {
    fn arena_hash(&self) -> u32 {
        fnv1a(&self.to_bits().to_le_bytes())
    }
}

impl ArenaHashable for bool {
    fn arena_hash(&self) -> u32 {
        fnv1a(&[u8::from(*self)])
    }
}

impl ArenaHashable for String {
    fn arena_hash(&self) -> u32 {
        fnv1a(self.as_bytes())
    }
}

impl ArenaHashable for &str {
    fn arena_hash(&self) -> u32 {
        fnv1a(self.as_bytes())
    }
}

struct Node<K, V> {
    key: K,
    value: V,
    next: *mut Node<K, V>,
}

/// Separately-chained hash map whose bucket table and nodes all live in an
/// [`Arena`] supplied by the caller to every mutating method, rather than
/// owned by the map itself: the same explicit-collaborator style the rest
/// of this crate uses for the buffer provider.
pub struct ArenaHashMap<K, V> {
    buckets: ArenaSlice<*mut Node<K, V>>,
    size: usize,
    load_factor: f64,
}

impl<K: ArenaHashable + PartialEq, V> ArenaHashMap<K, V> {
    /// # Errors
    /// Forwards [`AllocError`] from the initial bucket-table allocation.
    pub fn new(arena: &mut Arena) -> Result<Self, AllocError> {
        Self::with_capacity(arena, INITIAL_BUCKET_SIZE)
    }

    pub fn with_capacity(arena: &mut Arena, capacity: usize) -> Result<Self, AllocError> {
        let capacity = capacity.max(1);
        let buckets = arena.make_slice(capacity)?;
        Ok(Self {
            buckets,
            size: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current bucket-table size (not the live entry count, see [`Self::len`]).
    #[must_use]
    pub fn buckets_capacity(&self) -> usize {
        self.buckets.cap
    }

    /// Inserts or updates `key`. Looks the chain up for an existing key
    /// *before* allocating anything: only the insert-new path allocates a
    /// node, so an update never leaks a throwaway allocation.
    pub fn put(&mut self, arena: &mut Arena, key: K, value: V) -> Result<(), AllocError> {
        let idx = self.bucket_index(&key);
        let mut cur = self.buckets.as_full_slice()[idx];
        while !cur.is_null() {
            let node = unsafe { &mut *cur };
            if node.key == key {
                node.value = value;
                return Ok(());
            }
            cur = node.next;
        }

        let head = self.buckets.as_full_slice()[idx];
        let node_ptr = arena.copy_typed(Node {
            key,
            value,
            next: head,
        })?;
        self.buckets.as_full_mut_slice()[idx] = node_ptr;
        self.size += 1;

        if (self.size as f64) / (self.buckets.cap as f64) > self.load_factor {
            self.resize(arena)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.bucket_index(key);
        let mut cur = self.buckets.as_full_slice()[idx];
        while !cur.is_null() {
            let node = unsafe { &*cur };
            if &node.key == key {
                return Some(&node.value);
            }
            cur = node.next;
        }
        None
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Unlinks and frees the node holding `key`, if present.
    pub fn delete(&mut self, arena: &mut Arena, key: &K) -> Result<bool, AllocError> {
        let idx = self.bucket_index(key);
        let mut prev: *mut Node<K, V> = ptr::null_mut();
        let mut cur = self.buckets.as_full_slice()[idx];
        while !cur.is_null() {
            let node = unsafe { &*cur };
            if &node.key == key {
                let next = node.next;
                if prev.is_null() {
                    self.buckets.as_full_mut_slice()[idx] = next;
                } else {
                    unsafe {
                        (*prev).next = next;
                    }
                }
                unsafe {
                    ptr::drop_in_place(cur);
                }
                arena.free_typed(cur)?;
                self.size -= 1;
                return Ok(true);
            }
            prev = cur;
            cur = node.next;
        }
        Ok(false)
    }

    /// Frees every node and the bucket table itself. Consumes the map since
    /// using it afterward would dereference freed chunks.
    pub fn free(mut self, arena: &mut Arena) -> Result<(), AllocError> {
        for idx in 0..self.buckets.cap {
            let mut cur = self.buckets.as_full_slice()[idx];
            while !cur.is_null() {
                let next = unsafe { (*cur).next };
                unsafe {
                    ptr::drop_in_place(cur);
                }
                arena.free_typed(cur)?;
                cur = next;
            }
        }
        arena.free_slice(&self.buckets)?;
        self.size = 0;
        Ok(())
    }

    fn bucket_index(&self, key: &K) -> usize {
        (key.arena_hash() as usize) % self.buckets.cap
    }

    fn resize(&mut self, arena: &mut Arena) -> Result<(), AllocError> {
        let new_cap = self.buckets.cap * 2;
        slaballoc_log::debug!(
            "hash map resize: {} -> {new_cap} buckets, {} entries",
            self.buckets.cap,
            self.size
        );
        let mut new_buckets: ArenaSlice<*mut Node<K, V>> = arena.make_slice(new_cap)?;
        for idx in 0..self.buckets.cap {
            let mut cur = self.buckets.as_full_slice()[idx];
            while !cur.is_null() {
                let next = unsafe { (*cur).next };
                let new_idx = (unsafe { (*cur).key.arena_hash() } as usize) % new_cap;
                unsafe {
                    (*cur).next = new_buckets.as_full_slice()[new_idx];
                }
                new_buckets.as_full_mut_slice()[new_idx] = cur;
                cur = next;
            }
        }
        arena.free_slice(&self.buckets)?;
        self.buckets = new_buckets;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_roundtrips() {
        let mut arena = Arena::new_default();
        let mut map: ArenaHashMap<i32, String> = ArenaHashMap::new(&mut arena).unwrap();
        map.put(&mut arena, 1, "one".to_string()).unwrap();
        map.put(&mut arena, 2, "two".to_string()).unwrap();
        assert_eq!(map.get(&1).unwrap(), "one");
        assert_eq!(map.get(&2).unwrap(), "two");
        assert!(map.get(&3).is_none());
        map.free(&mut arena).unwrap();
    }

    #[test]
    fn put_existing_key_updates_in_place_without_growing_size() {
        let mut arena = Arena::new_default();
        let mut map: ArenaHashMap<i32, i32> = ArenaHashMap::new(&mut arena).unwrap();
        map.put(&mut arena, 7, 100).unwrap();
        map.put(&mut arena, 7, 200).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(*map.get(&7).unwrap(), 200);
        map.free(&mut arena).unwrap();
    }

    #[test]
    fn delete_removes_key_and_keeps_siblings() {
        let mut arena = Arena::new_default();
        let mut map: ArenaHashMap<i32, i32> = ArenaHashMap::new(&mut arena).unwrap();
        map.put(&mut arena, 1, 1).unwrap();
        map.put(&mut arena, 2, 2).unwrap();
        assert!(map.delete(&mut arena, &1).unwrap());
        assert!(map.get(&1).is_none());
        assert_eq!(*map.get(&2).unwrap(), 2);
        assert!(!map.delete(&mut arena, &1).unwrap());
        map.free(&mut arena).unwrap();
    }

    #[test]
    fn resize_preserves_all_entries() {
        let mut arena = Arena::new_default();
        let mut map: ArenaHashMap<i32, i32> = ArenaHashMap::new(&mut arena).unwrap();
        for i in 0..100 {
            map.put(&mut arena, i, i * 10).unwrap();
        }
        assert!(map.buckets.cap > INITIAL_BUCKET_SIZE);
        for i in 0..100 {
            assert_eq!(*map.get(&i).unwrap(), i * 10);
        }
        map.free(&mut arena).unwrap();
    }

    #[test]
    fn string_keys_hash_by_content() {
        let mut arena = Arena::new_default();
        let mut map: ArenaHashMap<String, i32> = ArenaHashMap::new(&mut arena).unwrap();
        map.put(&mut arena, "alpha".to_string(), 1).unwrap();
        map.put(&mut arena, "beta".to_string(), 2).unwrap();
        assert_eq!(*map.get(&"alpha".to_string()).unwrap(), 1);
        assert_eq!(*map.get(&"beta".to_string()).unwrap(), 2);
        map.free(&mut arena).unwrap();
    }
}
