//! Out-of-band chunk descriptors.
//!
//! Descriptors are kept in a dense array separate from the payload buffer so
//! free-list mutation (`next`, `refs`) never touches bytes the client can see
//! or the backing buffer's owner (the host allocator, or in a GC'd host its
//! collector) might otherwise need to scan.

use crate::location::Location;

/// One descriptor per fixed-size cell inside a [`Slab`](crate::slab::Slab).
///
/// `refs == 0` iff the chunk is linked into its class's free list; `refs >= 1`
/// iff the chunk is handed out to a client. `next` is only meaningful while
/// the chunk is free.
#[derive(Debug, Clone, Copy)]
pub struct ChunkDescriptor {
    pub loc: Location,
    pub next: Location,
    pub refs: i32,
}

impl ChunkDescriptor {
    #[must_use]
    pub const fn new(loc: Location) -> Self {
        Self {
            loc,
            next: Location::NIL,
            refs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_free_with_no_next() {
        let c = ChunkDescriptor::new(Location::new(0, 3));
        assert_eq!(c.refs, 0);
        assert!(c.next.is_nil());
        assert_eq!(c.loc, Location::new(0, 3));
    }
}
