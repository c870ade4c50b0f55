//! Fixed-region pool
//!
//! A [`PoolServices`] implementation over a caller-provided memory region,
//! managed by `linked_list_allocator`. Used where the firmware pool is not the
//! right backing (hosted runs, tests, carved-out scratch regions).
//!
//! ```text
//! ┌────────────┬───────────────────────────┐
//! │ size (16B) │ payload (POOL_ALIGN)      │  <- pointer handed out
//! └────────────┴───────────────────────────┘
//! ```
//!
//! Pool frees carry no size, so every allocation is prefixed with a header
//! recording its layout.

use super::{PoolServices, Status};
use core::alloc::Layout;
use core::ptr::NonNull;
use linked_list_allocator::Heap;
use spin::Mutex;

const HEADER_SIZE: usize = 16;
const BLOCK_ALIGN: usize = 16;

/// Pool over a fixed memory region
pub struct HeapPool {
    inner: Mutex<Heap>,
}

impl HeapPool {
    /// Create a pool over `size` bytes at `start`
    ///
    /// # Safety
    /// - The region must be valid for reads and writes and unused elsewhere
    ///   for the lifetime of the pool
    /// - `size` must be large enough for the allocator's bookkeeping
    pub unsafe fn new(start: *mut u8, size: usize) -> Self {
        let mut heap = Heap::empty();
        heap.init(start, size);
        Self {
            inner: Mutex::new(heap),
        }
    }

    /// Create a pool owning a `'static` region
    pub fn from_static(region: &'static mut [u8]) -> Self {
        // SAFETY: the exclusive 'static borrow is never handed out again
        unsafe { Self::new(region.as_mut_ptr(), region.len()) }
    }

    /// Current usage
    pub fn stats(&self) -> PoolStats {
        let heap = self.inner.lock();
        PoolStats {
            total_size: heap.size(),
            used: heap.used(),
            free: heap.free(),
        }
    }

    fn layout_for(size: usize) -> Option<Layout> {
        let total = size.checked_add(HEADER_SIZE)?;
        Layout::from_size_align(total, BLOCK_ALIGN).ok()
    }
}

impl PoolServices for HeapPool {
    fn allocate_pool(&self, size: usize) -> Result<NonNull<u8>, Status> {
        let layout = Self::layout_for(size).ok_or(Status::INVALID_PARAMETER)?;
        let block = self
            .inner
            .lock()
            .allocate_first_fit(layout)
            .map_err(|_| Status::OUT_OF_RESOURCES)?;

        // SAFETY: block is at least HEADER_SIZE bytes and 16-byte aligned
        unsafe {
            block.as_ptr().cast::<usize>().write(size);
            Ok(NonNull::new_unchecked(block.as_ptr().add(HEADER_SIZE)))
        }
    }

    unsafe fn free_pool(&self, buffer: NonNull<u8>) -> Result<(), Status> {
        let block = buffer.as_ptr().sub(HEADER_SIZE);
        let size = block.cast::<usize>().read();
        let layout = Self::layout_for(size).ok_or(Status::INVALID_PARAMETER)?;
        self.inner
            .lock()
            .deallocate(NonNull::new_unchecked(block), layout);
        Ok(())
    }
}

/// Pool statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Region size managed by the allocator
    pub total_size: usize,
    /// Bytes handed out, headers included
    pub used: usize,
    /// Bytes available
    pub free: usize,
}

impl PoolStats {
    /// Usage percentage
    pub fn usage_percent(&self) -> u8 {
        if self.total_size == 0 {
            return 0;
        }
        ((self.used * 100) / self.total_size) as u8
    }
}
