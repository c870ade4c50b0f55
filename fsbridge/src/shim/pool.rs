//! Memory allocation
//!
//! The foreign driver's `malloc`/`zalloc`/`free` go straight to the firmware
//! pool: no bookkeeping, no pooling, no leak tracking. Each allocation belongs
//! to the caller until it is freed.
//!
//! [`PoolBox`] is the owned form used by the bridge's own objects: one pool
//! allocation holding one value, returned to the pool on drop.

use super::Runtime;
use crate::firmware::{PoolServices, POOL_ALIGN};
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

impl Runtime<'_> {
    /// Allocate `size` bytes, `None` on exhaustion
    pub fn malloc(&self, size: usize) -> Option<NonNull<u8>> {
        self.firmware().pool.allocate_pool(size).ok()
    }

    /// Allocate `size` zeroed bytes, `None` on exhaustion
    pub fn zalloc(&self, size: usize) -> Option<NonNull<u8>> {
        zeroed(self.firmware().pool, size)
    }

    /// Return memory from [`Runtime::malloc`] / [`Runtime::zalloc`]
    ///
    /// Freeing `None` does nothing.
    ///
    /// # Safety
    /// `ptr` must come from this runtime's pool and must not be used again.
    pub unsafe fn free(&self, ptr: Option<NonNull<u8>>) {
        if let Some(ptr) = ptr {
            let _ = self.firmware().pool.free_pool(ptr);
        }
    }
}

fn zeroed(pool: &dyn PoolServices, size: usize) -> Option<NonNull<u8>> {
    let ptr = pool.allocate_pool(size).ok()?;
    // SAFETY: fresh allocation of `size` bytes
    unsafe { ptr::write_bytes(ptr.as_ptr(), 0, size) };
    Some(ptr)
}

/// A single value living in a pool allocation
pub struct PoolBox<'a, T> {
    ptr: NonNull<T>,
    pool: &'a dyn PoolServices,
    _marker: PhantomData<T>,
}

impl<'a, T> PoolBox<'a, T> {
    /// Move `value` into a zeroed pool allocation
    ///
    /// `None` if the pool is exhausted or `T` needs more than
    /// [`POOL_ALIGN`] alignment.
    pub fn new_in(pool: &'a dyn PoolServices, value: T) -> Option<Self> {
        let slot = PoolBox::<MaybeUninit<T>>::new_uninit_in(pool)?;
        Some(slot.write(value))
    }

    /// Pool this value is allocated from
    pub fn pool(&self) -> &'a dyn PoolServices {
        self.pool
    }
}

impl<'a, T> PoolBox<'a, MaybeUninit<T>> {
    /// Reserve zeroed storage for a `T` without initialising it
    pub fn new_uninit_in(pool: &'a dyn PoolServices) -> Option<Self> {
        if mem::align_of::<T>() > POOL_ALIGN {
            return None;
        }
        let raw = zeroed(pool, mem::size_of::<T>().max(1))?;
        Some(PoolBox {
            ptr: raw.cast(),
            pool,
            _marker: PhantomData,
        })
    }

    /// Initialise the storage, keeping the same allocation
    pub fn write(self, value: T) -> PoolBox<'a, T> {
        let ptr = self.ptr.cast::<T>();
        let pool = self.pool;
        mem::forget(self);
        // SAFETY: storage is sized and aligned for T and not yet initialised
        unsafe { ptr.as_ptr().write(value) };
        PoolBox {
            ptr,
            pool,
            _marker: PhantomData,
        }
    }
}

impl<T> Deref for PoolBox<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: initialised and owned for our lifetime
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> DerefMut for PoolBox<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: initialised and exclusively owned
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> Drop for PoolBox<'_, T> {
    fn drop(&mut self) {
        // SAFETY: we own the value and the allocation it lives in
        unsafe {
            ptr::drop_in_place(self.ptr.as_ptr());
            let _ = self.pool.free_pool(self.ptr.cast());
        }
    }
}
