//! `gpt_disk_io::BlockIo` to byte-addressed [`DiskIo`] adapter
//!
//! Disk I/O is layered on Block I/O by the firmware; volumes that only expose
//! a block device (or the in-memory devices used in tests) go through this
//! adapter instead. Reads are widened to whole blocks in a scratch buffer and
//! the requested window is copied out.

use super::{DiskIo, Status};
use alloc::vec;
use core::cell::RefCell;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Byte-addressed view of a block device
pub struct BlockDiskIo<B: BlockIo> {
    inner: RefCell<B>,
    media_id: u32,
}

impl<B: BlockIo> BlockDiskIo<B> {
    /// Wrap a block device presenting media `media_id`
    pub fn new(block_io: B, media_id: u32) -> Self {
        Self {
            inner: RefCell::new(block_io),
            media_id,
        }
    }

    /// Give the block device back
    pub fn into_inner(self) -> B {
        self.inner.into_inner()
    }
}

impl<B: BlockIo> DiskIo for BlockDiskIo<B> {
    fn read_disk(&self, media_id: u32, offset: u64, buffer: &mut [u8]) -> Result<(), Status> {
        // MEDIA_ANY (0) matches whatever is inserted
        if media_id != 0 && media_id != self.media_id {
            return Err(Status::INVALID_PARAMETER);
        }
        if buffer.is_empty() {
            return Ok(());
        }

        let mut block_io = self
            .inner
            .try_borrow_mut()
            .map_err(|_| Status::DEVICE_ERROR)?;

        let block_size = u64::from(block_io.block_size().to_u32());
        let end = offset
            .checked_add(buffer.len() as u64)
            .ok_or(Status::INVALID_PARAMETER)?;
        let first_lba = offset / block_size;
        let last_lba = (end - 1) / block_size;
        let span = ((last_lba - first_lba + 1) * block_size) as usize;
        let skip = (offset - first_lba * block_size) as usize;

        let mut scratch = vec![0u8; span];
        block_io.read_blocks(Lba(first_lba), &mut scratch).map_err(|e| {
            log::debug!("block read at lba {} failed: {:?}", first_lba, e);
            Status::DEVICE_ERROR
        })?;

        buffer.copy_from_slice(&scratch[skip..skip + buffer.len()]);
        Ok(())
    }
}
