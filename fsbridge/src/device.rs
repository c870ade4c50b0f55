//! Device shadowing
//!
//! The foreign driver works on a Device that owns a Disk. One pair is built
//! per mounted volume when it is initialised and torn down when it exits. The
//! Disk carries the volume's [`VolumeContext`] so reads can find their way
//! back to the firmware Disk I/O protocol.

use crate::disk::{Disk, VolumeContext};
use crate::firmware::PoolServices;
use crate::shim::PoolBox;
use core::mem::MaybeUninit;

/// The foreign runtime's device handle
pub struct Device<'a> {
    disk: PoolBox<'a, Disk<'a>>,
}

impl<'a> Device<'a> {
    /// Disk behind this device
    pub fn disk(&self) -> &Disk<'a> {
        &self.disk
    }
}

/// Allocate a Device and its Disk bound to `identity`
///
/// `None` on allocation failure; nothing stays allocated in that case.
pub fn open<'a>(
    pool: &'a dyn PoolServices,
    identity: Option<VolumeContext<'a>>,
) -> Option<PoolBox<'a, Device<'a>>> {
    let device = PoolBox::<MaybeUninit<Device<'a>>>::new_uninit_in(pool)?;
    // dropping `device` on failure returns its storage
    let disk = PoolBox::new_in(pool, Disk::new(identity))?;
    Some(device.write(Device { disk }))
}

/// Release a Device: its Disk first, then the Device itself
pub fn close(device: PoolBox<'_, Device<'_>>) {
    drop(device);
}
