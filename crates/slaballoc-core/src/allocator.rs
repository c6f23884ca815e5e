//! The allocator: an ordered ladder of size classes, routing by size.

use std::fmt::Write as _;

use crate::class::SizeClass;
use crate::error::AllocError;
use crate::slab::{default_buffer_provider, BufferProvider};

/// Default target size of a class's backing slabs (128 KiB).
pub const DEFAULT_SLAB_SIZE: usize = 128 * 1024;
/// Default geometric ratio between consecutive size classes.
pub const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

/// Tunables for an [`Allocator`]. The `align` flag is accepted for interface
/// parity with the byte-allocator contract but has no effect: returned
/// addresses carry whatever alignment the buffer provider happens to give.
pub struct AllocatorConfig {
    pub slab_size: usize,
    pub growth_factor: f64,
    pub buffer_provider: BufferProvider,
    pub align: bool,
}

impl AllocatorConfig {
    #[must_use]
    pub fn with_slab_size(mut self, slab_size: usize) -> Self {
        self.slab_size = slab_size;
        self
    }

    #[must_use]
    pub fn with_growth_factor(mut self, growth_factor: f64) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    #[must_use]
    pub fn with_buffer_provider(mut self, provider: BufferProvider) -> Self {
        self.buffer_provider = provider;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            slab_size: DEFAULT_SLAB_SIZE,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            buffer_provider: default_buffer_provider(),
            align: false,
        }
    }
}

/// A ladder of [`SizeClass`]es, sorted strictly ascending by `chunk_size`.
/// Classes are materialized lazily the first time a request exceeds the
/// current ladder.
pub struct Allocator {
    classes: Vec<SizeClass>,
    config: AllocatorConfig,
}

impl Allocator {
    #[must_use]
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            classes: Vec::new(),
            config,
        }
    }

    /// Allocates `size` bytes (alignment is accepted, ignored). `size == 0`
    /// routes to the smallest class, same as `size == 1`.
    pub fn alloc(&mut self, size: usize, _align: usize) -> Result<usize, AllocError> {
        let idx = self.find_class(size, true).expect("create=true always finds or makes a class");
        self.classes[idx].alloc_chunk(&self.config.buffer_provider)
    }

    /// Releases `addr`, which must have come from a prior `alloc(size, _)`
    /// call on this allocator.
    pub fn free(&mut self, addr: usize, size: usize) -> Result<(), AllocError> {
        let idx = self
            .find_class(size, false)
            .ok_or(AllocError::NotFromThisAllocator)?;
        if self.classes[idx].free_chunk_at(addr) {
            Ok(())
        } else {
            Err(AllocError::NotFromThisAllocator)
        }
    }

    /// Binary-searches the ladder for the smallest class with
    /// `chunk_size >= size`, growing the ladder geometrically when `create`
    /// is set and no class fits yet.
    fn find_class(&mut self, size: usize, create: bool) -> Option<usize> {
        let idx = self.classes.partition_point(|c| c.chunk_size < size);
        if idx < self.classes.len() {
            return Some(idx);
        }
        if !create {
            return None;
        }
        let next_chunk_size = match self.classes.last() {
            None => 1,
            Some(last) => (last.chunk_size as f64 * self.config.growth_factor).ceil() as usize,
        };
        slaballoc_log::debug!(
            "growing size-class ladder: new chunk_size={next_chunk_size}"
        );
        self.classes
            .push(SizeClass::new(next_chunk_size, self.config.slab_size));
        self.find_class(size, create)
    }

    /// Human-readable per-class report plus a totals footer.
    #[must_use]
    pub fn stats(&self) -> String {
        let mut out = String::new();
        let mut total_slabs = 0;
        let mut total_objs = 0;
        let mut total_allocated = 0;
        let mut total_free = 0;
        let mut total_used = 0;

        for (i, class) in self.classes.iter().enumerate() {
            let slab_count = class.slabs.len();
            let allocated = slab_count * class.slab_size;
            let free = class.free_chunk_count() * class.chunk_size;
            let used = allocated - free;

            total_slabs += slab_count;
            total_objs += class.objs;
            total_allocated += allocated;
            total_free += free;
            total_used += used;

            let _ = writeln!(
                out,
                "class:{i}, slabs:{slab_count}, objs:{}, slabSize:{}, chunkSize:{}, allocated:{allocated}, free:{free}, used:{used}",
                class.objs, class.slab_size, class.chunk_size,
            );
        }
        let _ = write!(
            out,
            "Total slabs: {total_slabs}, Total objects: {total_objs}, Total allocated: {total_allocated} bytes, Total free: {total_free} bytes, Total used: {total_used} bytes",
        );
        out
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(AllocatorConfig::default())
    }
}
