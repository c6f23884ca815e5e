//! A size class: a growing list of same-chunk-size slabs, a free list, and a
//! live-object count.

use crate::chunk::ChunkDescriptor;
use crate::error::AllocError;
use crate::location::Location;
use crate::slab::{BufferProvider, Slab};

/// All slabs using one fixed `chunk_size`.
///
/// `objs` always equals the number of chunks across all slabs with
/// `refs > 0`; the free-list length always equals the remainder. Once
/// created, `chunk_size` never changes.
pub struct SizeClass {
    pub chunk_size: usize,
    pub slab_size: usize,
    pub slabs: Vec<Slab>,
    free: Location,
    pub objs: usize,
}

impl SizeClass {
    /// `slab_size = chunk_size * floor(target_slab_size / chunk_size)`,
    /// floored to at least one chunk so classes whose chunk exceeds the
    /// target still get a slab.
    #[must_use]
    pub fn new(chunk_size: usize, target_slab_size: usize) -> Self {
        let chunk_count = (target_slab_size / chunk_size).max(1);
        Self {
            chunk_size,
            slab_size: chunk_size * chunk_count,
            slabs: Vec::new(),
            free: Location::NIL,
            objs: 0,
        }
    }

    fn chunk(&self, loc: Location) -> &ChunkDescriptor {
        &self.slabs[loc.slab_id as usize].chunks[loc.chunk_id as usize]
    }

    fn chunk_mut(&mut self, loc: Location) -> &mut ChunkDescriptor {
        &mut self.slabs[loc.slab_id as usize].chunks[loc.chunk_id as usize]
    }

    fn add_slab(&mut self, provider: &BufferProvider) -> Result<(), AllocError> {
        let slab_id = self.slabs.len();
        let slab = Slab::new(provider, slab_id, self.slab_size, self.chunk_size)?;
        slaballoc_log::trace!(
            "new slab: class chunk_size={} slab_id={} slab_size={}",
            self.chunk_size,
            slab_id,
            self.slab_size
        );
        let chunk_count = slab.chunks.len();
        self.slabs.push(slab);
        for chunk_id in 0..chunk_count {
            let loc = Location::new(slab_id as isize, chunk_id as isize);
            self.push_free_chunk(loc);
        }
        Ok(())
    }

    /// Pop one chunk off the free list, creating a new slab first if empty.
    /// Returns the chunk's raw address.
    pub fn alloc_chunk(&mut self, provider: &BufferProvider) -> Result<usize, AllocError> {
        if self.free.is_nil() {
            self.add_slab(provider)?;
        }
        let loc = self.pop_free_chunk();
        let addr = self.slabs[loc.slab_id as usize].chunk_address(loc.chunk_id as usize, self.chunk_size);
        self.objs += 1;
        Ok(addr)
    }

    /// Releases the chunk at `addr`. Returns `false` if `addr` falls outside
    /// every slab owned by this class.
    pub fn free_chunk_at(&mut self, addr: usize) -> bool {
        let Some(loc) = self.locate(addr) else {
            return false;
        };
        if self.decref(loc) {
            self.objs -= 1;
        }
        true
    }

    /// Shares a chunk among multiple owners; each matching `free` must
    /// decrement. Part of the contract even though the shipped hash map
    /// doesn't exercise it.
    pub fn ref_chunk(&mut self, loc: Location) {
        self.chunk_mut(loc).refs += 1;
    }

    fn locate(&self, addr: usize) -> Option<Location> {
        for (slab_id, slab) in self.slabs.iter().enumerate() {
            let base = slab.base_address();
            if addr >= base && addr < base + slab.len() {
                let chunk_id = (addr - base) / self.chunk_size;
                return Some(Location::new(slab_id as isize, chunk_id as isize));
            }
        }
        None
    }

    /// Decrements the chunk's refcount; pushes it back onto the free list if
    /// it reaches zero. Returns whether it was pushed (i.e. whether the
    /// object is now fully released).
    fn decref(&mut self, loc: Location) -> bool {
        let chunk = self.chunk_mut(loc);
        chunk.refs -= 1;
        if chunk.refs < 0 {
            slaballoc_log::error!("refcount underflow on chunk {:?}", loc);
            panic!("slaballoc: refcount went negative on chunk {loc:?} (double free)");
        }
        if chunk.refs == 0 {
            self.push_free_chunk(loc);
            true
        } else {
            false
        }
    }

    fn push_free_chunk(&mut self, loc: Location) {
        let head = self.free;
        let chunk = self.chunk_mut(loc);
        if chunk.refs != 0 {
            panic!("slaballoc: pushed a chunk with non-zero refs ({})", chunk.refs);
        }
        chunk.next = head;
        self.free = loc;
    }

    fn pop_free_chunk(&mut self) -> Location {
        let loc = self.free;
        assert!(!loc.is_nil(), "slaballoc: popFreeChunk() when free list is empty");
        let chunk = self.chunk_mut(loc);
        assert_eq!(
            chunk.refs, 0,
            "slaballoc: popFreeChunk() on chunk with non-zero refs"
        );
        let next = chunk.next;
        chunk.next = Location::NIL;
        chunk.refs = 1;
        self.free = next;
        loc
    }

    /// Walks the intrusive free list, `O(free_chunks)`.
    #[must_use]
    pub fn free_chunk_count(&self) -> usize {
        let mut count = 0;
        let mut current = self.free;
        while !current.is_nil() {
            count += 1;
            current = self.chunk(current).next;
        }
        count
    }
}
