//! Non-fatal error taxonomy.
//!
//! Corruption of the free-list invariants (refcount underflow, popping or
//! pushing a chunk with the wrong refcount) is *not* represented here: those
//! are programming errors and halt the process with a panic rather than
//! returning a value a caller could ignore.

use std::fmt;

/// Failure modes a caller of [`Allocator`](crate::allocator::Allocator) or
/// [`Arena`](crate::arena::Arena) can recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The buffer provider returned nothing while a size class needed a new
    /// slab.
    SlabCreationFailed,
    /// `free` was called with a size/address that doesn't belong to this
    /// allocator: no class fits the size, or no slab of the matching class
    /// contains the address.
    NotFromThisAllocator,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::SlabCreationFailed => write!(f, "slab creation failed"),
            AllocError::NotFromThisAllocator => write!(f, "not from this allocator"),
        }
    }
}

impl std::error::Error for AllocError {}
