//! Probe & UUID bridge
//!
//! The four entry points a standalone UEFI filesystem driver calls:
//!
//! | Entry | Purpose |
//! |-------|---------|
//! | [`Bridge::init`] | build the volume's Device/Disk pair |
//! | [`Bridge::probe`] | does the registered driver recognise the volume? |
//! | [`Bridge::uuid`] | volume identifier as UTF-16 |
//! | [`Bridge::exit`] | tear the Device down |

use crate::device::{self, Device};
use crate::disk::VolumeContext;
use crate::firmware::{DiskIo, Status};
use crate::fs::{DirhookInfo, DriverSlot};
use crate::shim::charset::encode_utf16;
use crate::shim::{PoolBox, Runtime};
use alloc::vec::Vec;

/// Longest identifier returned by [`Bridge::uuid`], in UTF-16 units
pub const UUID_MAX_CHARS: usize = 36;

/// One attached volume, as seen by the bridge
///
/// Owned by the surrounding driver. Holds at most one live Device, created
/// by [`Bridge::init`] and released by [`Bridge::exit`].
pub struct Volume<'a> {
    disk_io: Option<&'a dyn DiskIo>,
    device: Option<PoolBox<'a, Device<'a>>>,
}

impl<'a> Volume<'a> {
    /// Volume read through `disk_io`
    pub fn new(disk_io: &'a dyn DiskIo) -> Self {
        Self {
            disk_io: Some(disk_io),
            device: None,
        }
    }

    /// Volume with no raw disk access; every read on it fails
    pub fn detached() -> Self {
        Self {
            disk_io: None,
            device: None,
        }
    }

    /// Device built by [`Bridge::init`]
    pub fn device(&self) -> Option<&Device<'a>> {
        self.device.as_deref()
    }

    /// True between [`Bridge::init`] and [`Bridge::exit`]
    pub fn is_initialized(&self) -> bool {
        self.device.is_some()
    }

    fn context(&self) -> VolumeContext<'a> {
        VolumeContext {
            disk_io: self.disk_io,
        }
    }
}

/// Glue between the surrounding driver and the registered filesystem driver
pub struct Bridge<'r> {
    runtime: &'r Runtime<'r>,
    drivers: &'r DriverSlot,
}

impl<'r> Bridge<'r> {
    /// Bridge running `drivers` on `runtime`
    pub fn new(runtime: &'r Runtime<'r>, drivers: &'r DriverSlot) -> Self {
        Self { runtime, drivers }
    }

    /// Runtime handed to the driver
    pub fn runtime(&self) -> &'r Runtime<'r> {
        self.runtime
    }

    /// Create the volume's Device
    ///
    /// # Errors
    /// - `OUT_OF_RESOURCES` if the pool cannot hold the Device or Disk
    /// - `ALREADY_STARTED` if the volume already has a Device
    pub fn init<'a>(&self, volume: &mut Volume<'a>) -> Result<(), Status>
    where
        'r: 'a,
    {
        if volume.device.is_some() {
            return Err(Status::ALREADY_STARTED);
        }
        let device = device::open(self.runtime.firmware().pool, Some(volume.context()))
            .ok_or(Status::OUT_OF_RESOURCES)?;
        volume.device = Some(device);
        log::trace!("volume device opened");
        Ok(())
    }

    /// Release the volume's Device, if any
    pub fn exit(&self, volume: &mut Volume<'_>) -> Result<(), Status> {
        if let Some(device) = volume.device.take() {
            device::close(device);
            log::trace!("volume device closed");
        }
        Ok(())
    }

    /// Ask the registered driver whether it recognises the volume
    ///
    /// Lists the root directory, stopping at the first entry. The verdict is
    /// the runtime error flag afterwards, not what the listing returned.
    pub fn probe(&self, volume: &Volume<'_>) -> bool {
        let (driver, device) = match (self.drivers.get(), volume.device()) {
            (Some(driver), Some(device)) if device.disk().context().is_some() => (driver, device),
            _ => {
                log::error!("probe: uninitialized variables");
                return false;
            }
        };

        let rt = self.runtime;
        rt.clear_error();
        let mut first_entry = |_: &str, _: &DirhookInfo| true;
        if let Err(code) = (driver.dir)(rt, device, "/", &mut first_entry) {
            rt.record(code);
        }

        let errno = rt.errno();
        if errno.is_error() {
            log::debug!("{} does not recognise volume: {}", driver.name, errno);
        }
        !errno.is_error()
    }

    /// Volume identifier from the registered driver, as UTF-16
    ///
    /// At most [`UUID_MAX_CHARS`] units, no terminator. `None` if the driver
    /// has no UUID support, fails, or returns nothing.
    pub fn uuid(&self, volume: &Volume<'_>) -> Option<Vec<u16>> {
        let Some(driver) = self.drivers.get() else {
            log::error!("uuid: no filesystem driver registered");
            return None;
        };
        let Some(read_uuid) = driver.uuid else {
            log::warn!("{} has no UUID support", driver.name);
            return None;
        };
        let device = volume.device()?;

        let uuid = match read_uuid(self.runtime, device) {
            Ok(Some(uuid)) if !uuid.is_empty() => uuid,
            Ok(_) => return None,
            Err(code) => {
                self.runtime.record(code);
                return None;
            }
        };

        let mut wide = [0u16; UUID_MAX_CHARS];
        let len = encode_utf16(&uuid, &mut wide);
        if len == 0 {
            return None;
        }
        Some(wide[..len].to_vec())
    }
}
