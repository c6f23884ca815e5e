//! A slab: one backing buffer plus the chunk descriptors indexing into it.

use crate::chunk::ChunkDescriptor;
use crate::error::AllocError;
use crate::location::Location;

/// Supplies a contiguous byte buffer of exactly the requested size, with a
/// stable address for the buffer's lifetime. `None` models the host
/// allocator running out of memory.
///
/// This is the external collaborator spec.md treats as a black box; the
/// default provider just zero-initializes a boxed slice.
pub type BufferProvider = Box<dyn Fn(usize) -> Option<Box<[u8]>>>;

/// Zero-initialized `Box<[u8]>` of the requested length.
#[must_use]
pub fn default_buffer_provider() -> BufferProvider {
    Box::new(|size| Some(vec![0u8; size].into_boxed_slice()))
}

/// One backing buffer, divided into `chunk_size`-byte cells, plus the dense
/// array of [`ChunkDescriptor`]s addressing them.
///
/// A slab is never destroyed individually; it lives for the lifetime of the
/// [`SizeClass`](crate::class::SizeClass) that owns it.
pub struct Slab {
    buffer: Box<[u8]>,
    pub chunks: Box<[ChunkDescriptor]>,
}

impl Slab {
    /// Requests a `slab_size`-byte buffer from `provider` and materializes
    /// `slab_size / chunk_size` chunk descriptors, pre-filled with their own
    /// `(slab_id, chunk_id)` location and `refs = 0`.
    pub fn new(
        provider: &BufferProvider,
        slab_id: usize,
        slab_size: usize,
        chunk_size: usize,
    ) -> Result<Self, AllocError> {
        let buffer = provider(slab_size).ok_or(AllocError::SlabCreationFailed)?;
        let chunk_count = slab_size / chunk_size;
        let chunks: Box<[ChunkDescriptor]> = (0..chunk_count)
            .map(|i| ChunkDescriptor::new(Location::new(slab_id as isize, i as isize)))
            .collect();
        Ok(Self { buffer, chunks })
    }

    /// Stable base address of the backing buffer.
    #[must_use]
    pub fn base_address(&self) -> usize {
        self.buffer.as_ptr() as usize
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Address of chunk `chunk_id`'s first byte.
    #[must_use]
    pub fn chunk_address(&self, chunk_id: usize, chunk_size: usize) -> usize {
        self.base_address() + chunk_id * chunk_size
    }
}
