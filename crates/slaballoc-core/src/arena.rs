//! The arena facade: typed convenience helpers over a raw [`Allocator`].

use std::mem;
use std::ptr;

use crate::allocator::{Allocator, AllocatorConfig};
use crate::error::AllocError;

/// Default slab target for an [`Arena`]: bigger than the bare allocator's
/// default since arena clients (the hash map, typed slices) tend to request
/// larger, longer-lived chunks.
pub const DEFAULT_ARENA_SLAB_SIZE: usize = 16 * 1024 * 1024;

/// A growable slice handed back by [`Arena::make_slice`]/[`Arena::slice_append`].
/// `len` tracks live elements, `cap` the chunk's element capacity; both are
/// caller-managed since the arena itself only knows byte sizes.
pub struct ArenaSlice<T> {
    pub ptr: *mut T,
    pub len: usize,
    pub cap: usize,
}

impl<T> ArenaSlice<T> {
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        if self.cap == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
        }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.cap == 0 {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
        }
    }

    /// Views every allocated slot, not just the `len` live ones (for arena
    /// slices used as fixed-size arrays, e.g. a hash map's bucket table,
    /// rather than a growable vector).
    #[must_use]
    pub fn as_full_slice(&self) -> &[T] {
        if self.cap == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr, self.cap) }
        }
    }

    #[must_use]
    pub fn as_full_mut_slice(&mut self) -> &mut [T] {
        if self.cap == 0 {
            &mut []
        } else {
            unsafe { std::slice::from_raw_parts_mut(self.ptr, self.cap) }
        }
    }
}

/// Thin facade over an [`Allocator`] that adds typed single-object and slice
/// helpers. Holds no state of its own beyond the allocator it wraps.
pub struct Arena {
    allocator: Allocator,
}

impl Arena {
    #[must_use]
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            allocator: Allocator::new(config),
        }
    }

    /// An arena with the teacher-sized defaults: 16 MiB slabs, `growth_factor`
    /// 2.0.
    #[must_use]
    pub fn new_default() -> Self {
        Self::new(AllocatorConfig::default().with_slab_size(DEFAULT_ARENA_SLAB_SIZE))
    }

    /// Raw byte allocation, for clients that don't need the typed helpers.
    pub fn allocate(&mut self, size: usize, align: usize) -> Result<*mut u8, AllocError> {
        let addr = self.allocator.alloc(size.max(1), align)?;
        Ok(addr as *mut u8)
    }

    /// Raw byte release. `size` must match the size originally requested.
    pub fn release(&mut self, ptr: *mut u8, size: usize) -> Result<(), AllocError> {
        self.allocator.free(ptr as usize, size.max(1))
    }

    /// Allocates space for one `T`, zero-initialized, and returns a typed
    /// pointer.
    pub fn new_typed<T>(&mut self) -> Result<*mut T, AllocError> {
        let ptr = self.allocate(mem::size_of::<T>(), mem::align_of::<T>())?;
        Ok(ptr.cast::<T>())
    }

    /// Allocates space for one `T` and copies `value` into it.
    pub fn copy_typed<T>(&mut self, value: T) -> Result<*mut T, AllocError> {
        let ptr = self.new_typed::<T>()?;
        unsafe { ptr::write(ptr, value) };
        Ok(ptr)
    }

    /// Allocates an arena-backed array of `cap` zero-initialized `T`s.
    pub fn make_slice<T: Default + Clone>(&mut self, cap: usize) -> Result<ArenaSlice<T>, AllocError> {
        if cap == 0 {
            return Ok(ArenaSlice {
                ptr: ptr::null_mut(),
                len: 0,
                cap: 0,
            });
        }
        let bytes = cap * mem::size_of::<T>();
        let ptr = self.allocate(bytes, mem::align_of::<T>())?.cast::<T>();
        for i in 0..cap {
            unsafe { ptr::write(ptr.add(i), T::default()) };
        }
        Ok(ArenaSlice { ptr, len: 0, cap })
    }

    /// Releases a value allocated with [`Arena::new_typed`]/[`Arena::copy_typed`].
    pub fn free_typed<T>(&mut self, ptr: *mut T) -> Result<(), AllocError> {
        self.release(ptr.cast::<u8>(), mem::size_of::<T>())
    }

    /// Releases a slice allocated with [`Arena::make_slice`].
    pub fn free_slice<T>(&mut self, slice: &ArenaSlice<T>) -> Result<(), AllocError> {
        if slice.cap == 0 {
            return Ok(());
        }
        self.release(slice.ptr.cast::<u8>(), slice.cap * mem::size_of::<T>())
    }

    /// Appends `value`, growing (and copying into a fresh, larger chunk) when
    /// `len == cap`. Growth policy: double while `cap < 256`, then
    /// `cap += cap / 4` afterward, matching the Go original's `expandSlice`.
    ///
    /// Returns whether a reallocation occurred, so the caller can tell a
    /// moved slice from one appended in place (the old chunk, if any, has
    /// already been freed by the time this returns).
    pub fn slice_append<T: Default + Clone>(
        &mut self,
        slice: &mut ArenaSlice<T>,
        value: T,
    ) -> Result<bool, AllocError> {
        let reallocated = slice.len == slice.cap;
        if reallocated {
            let new_cap = Self::grown_capacity(slice.cap);
            let mut grown = self.make_slice::<T>(new_cap)?;
            if slice.cap > 0 {
                let src = slice.as_slice();
                let dst = grown.as_mut_slice();
                dst[..slice.len].clone_from_slice(src);
                self.free_slice(slice)?;
            }
            grown.len = slice.len;
            *slice = grown;
        }
        unsafe { ptr::write(slice.ptr.add(slice.len), value) };
        slice.len += 1;
        Ok(reallocated)
    }

    fn grown_capacity(cap: usize) -> usize {
        if cap == 0 {
            1
        } else if cap < 256 {
            cap * 2
        } else {
            cap + cap / 4
        }
    }

    #[must_use]
    pub fn stats(&self) -> String {
        self.allocator.stats()
    }

    /// No-op, matching the allocator's "no central teardown" design: slabs
    /// are reclaimed only when their owning `Arena` is dropped.
    pub fn close(&mut self) {}
}
