//! A slab-class allocator, an arena facade over it, and an arena-backed
//! chained hash map as a worked-example client.
//!
//! Sizes are bucketed into geometrically-spaced classes (`1, 2, 4, 8, ...`
//! bytes by default); each class owns a growing list of slabs and an
//! intrusive free list of chunks. The [`Arena`](arena::Arena) facade adds
//! typed single-object and growable-slice helpers on top, and
//! [`ArenaHashMap`](hashmap::ArenaHashMap) demonstrates a real client:
//! buckets, nodes, keys and values all come from the arena instead of the
//! host's general-purpose allocator.
//!
//! Everything here is single-threaded by design: none of `Allocator`,
//! `Arena` or `ArenaHashMap` implement `Send`/`Sync`.

pub mod allocator;
pub mod arena;
pub mod chunk;
pub mod class;
pub mod error;
pub mod hashmap;
pub mod location;
pub mod slab;

pub use allocator::{Allocator, AllocatorConfig};
pub use arena::{Arena, ArenaSlice};
pub use chunk::ChunkDescriptor;
pub use error::AllocError;
pub use hashmap::{ArenaHashMap, ArenaHashable};
pub use location::Location;
pub use slab::{BufferProvider, Slab};
