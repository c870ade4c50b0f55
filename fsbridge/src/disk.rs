//! Disk I/O translation
//!
//! The foreign driver addresses its volume as `(sector, offset)` pairs on
//! fixed 512-byte sectors. The firmware Disk I/O protocol is byte addressed,
//! so every read becomes one raw read at `sector * SECTOR_SIZE + offset`.
//!
//! `SECTOR_SIZE` is the driver's own constant and is never replaced with the
//! device's reported block size; the driver computes every sector number with
//! it. There is no caching, read-ahead or retry.

use crate::error::{ErrorCode, Result};
use crate::firmware::DiskIo;

/// Sector size the foreign driver addresses with
pub const SECTOR_SIZE: u64 = 512;

/// Media id passed to the Disk I/O protocol (whatever media is present)
pub const MEDIA_ANY: u32 = 0;

/// What a Disk needs to know about the volume that owns it
#[derive(Clone, Copy)]
pub struct VolumeContext<'a> {
    /// Raw disk capability of the volume, if it has one
    pub disk_io: Option<&'a dyn DiskIo>,
}

impl<'a> VolumeContext<'a> {
    /// Context for a volume backed by `disk_io`
    pub fn new(disk_io: &'a dyn DiskIo) -> Self {
        Self {
            disk_io: Some(disk_io),
        }
    }
}

/// The foreign runtime's disk handle
///
/// Only the back-reference is populated: sizes and names are never filled in
/// because reads bypass the foreign disk subsystem entirely.
pub struct Disk<'a> {
    context: Option<VolumeContext<'a>>,
}

impl<'a> Disk<'a> {
    pub(crate) fn new(context: Option<VolumeContext<'a>>) -> Self {
        Self { context }
    }

    /// Volume this disk reads from
    pub fn context(&self) -> Option<&VolumeContext<'a>> {
        self.context.as_ref()
    }

    /// Read `buffer.len()` bytes at byte `offset` of `sector`
    ///
    /// # Errors
    /// - `ReadError` if the disk has no volume or the volume no Disk I/O
    /// - `OutOfRange` if the byte address does not fit in 64 bits
    /// - `ReadError` if the firmware read fails
    pub fn read(&self, sector: u64, offset: u64, buffer: &mut [u8]) -> Result<()> {
        let disk_io = match self.context.and_then(|ctx| ctx.disk_io) {
            Some(disk_io) => disk_io,
            None => return Err(ErrorCode::ReadError),
        };

        let address = sector
            .checked_mul(SECTOR_SIZE)
            .and_then(|base| base.checked_add(offset))
            .ok_or(ErrorCode::OutOfRange)?;

        #[cfg(feature = "trace")]
        log::trace!(
            "disk read: sector {:#x} offset {} len {}",
            sector,
            offset,
            buffer.len()
        );

        disk_io
            .read_disk(MEDIA_ANY, address, buffer)
            .map_err(|status| {
                log::error!("Could not read block at address {:08x}: {}", sector, status);
                ErrorCode::ReadError
            })
    }
}
