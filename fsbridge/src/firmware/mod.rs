//! Host firmware capabilities
//!
//! Every service the bridge consumes from the firmware sits behind one small
//! trait so the same code drives real boot services (see [`efi`]) and the
//! in-memory doubles used by the tests. All methods take `&self`: firmware
//! protocols are called through raw pointers and pre-boot execution is single
//! threaded.

pub mod block;
pub mod efi;
pub mod heap;
pub mod status;

use core::ptr::NonNull;
use uguid::Guid;

pub use status::Status;

/// Byte-addressed raw disk reads (UEFI Disk I/O protocol shape)
pub trait DiskIo {
    /// Read `buffer.len()` bytes starting at byte `offset` of media `media_id`
    fn read_disk(&self, media_id: u32, offset: u64, buffer: &mut [u8]) -> Result<(), Status>;
}

/// A key as delivered by the console input protocol
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputKey {
    /// Scan code for non-printable keys
    pub scan_code: u16,
    /// UTF-16 character, 0 for pure scan codes
    pub unicode_char: u16,
}

/// Console input device
pub trait ConsoleIn {
    /// Non-blocking key read; `Status::NOT_READY` when no key is waiting
    fn read_key_stroke(&self) -> Result<InputKey, Status>;
}

/// Console output device
pub trait ConsoleOut {
    /// Print a NUL-terminated UTF-16 string
    fn output_string(&self, text: &[u16]) -> Result<(), Status>;
}

/// Firmware variable store
pub trait VariableStore {
    /// Copy the variable `name` (NUL-terminated UTF-16) owned by `vendor` into
    /// `data`, returning the number of bytes written
    fn get_variable(&self, name: &[u16], vendor: &Guid, data: &mut [u8]) -> Result<usize, Status>;
}

/// Pool allocator
///
/// Allocations are at least [`POOL_ALIGN`] aligned, like UEFI `AllocatePool`.
pub trait PoolServices {
    /// Allocate `size` bytes
    fn allocate_pool(&self, size: usize) -> Result<NonNull<u8>, Status>;

    /// Return an allocation to the pool
    ///
    /// # Safety
    /// `buffer` must come from `allocate_pool` on this same pool and must not
    /// be used afterwards.
    unsafe fn free_pool(&self, buffer: NonNull<u8>) -> Result<(), Status>;
}

/// Alignment guaranteed by [`PoolServices::allocate_pool`]
pub const POOL_ALIGN: usize = 8;

/// Control over the running image
pub trait ImageControl {
    /// Ask the firmware to unload this image with `status`
    ///
    /// Returns only if the firmware refuses.
    fn exit(&self, status: Status);
}

/// The set of firmware services one runtime works against
#[derive(Clone, Copy)]
pub struct Firmware<'a> {
    /// Pool allocator
    pub pool: &'a dyn PoolServices,
    /// Keyboard
    pub con_in: &'a dyn ConsoleIn,
    /// Text console
    pub con_out: &'a dyn ConsoleOut,
    /// Variable store
    pub variables: &'a dyn VariableStore,
    /// Image services
    pub image: &'a dyn ImageControl,
}
