//! Foreign filesystem driver interface
//!
//! A driver is described by an [`FsDriver`] capability record: its directory
//! listing entry point and, optionally, UUID extraction. Exactly one driver is
//! linked into an image; it is placed in a [`DriverSlot`] at startup and never
//! replaced.

use crate::device::Device;
use crate::error::Result;
use crate::shim::{Runtime, StaticModule};
use alloc::string::String;
use spin::Once;

/// Entry information passed to a directory hook
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirhookInfo {
    /// Entry is a directory
    pub dir: bool,
    /// `mtime` is meaningful
    pub mtime_set: bool,
    /// Names on this filesystem compare case-insensitively
    pub case_insensitive: bool,
    /// Modification time, epoch seconds (see [`crate::time::to_calendar`])
    pub mtime: i32,
}

/// Per-entry visitor; returning `true` stops the listing
pub type DirHook<'h> = dyn FnMut(&str, &DirhookInfo) -> bool + 'h;

/// List directory `path`, calling the hook for each entry
pub type DirFn = fn(&Runtime<'_>, &Device<'_>, &str, &mut DirHook<'_>) -> Result<()>;

/// Read the volume identifier
pub type UuidFn = fn(&Runtime<'_>, &Device<'_>) -> Result<Option<String>>;

/// Capability record of a foreign filesystem driver
pub struct FsDriver {
    /// Filesystem name
    pub name: &'static str,
    /// Directory listing
    pub dir: DirFn,
    /// UUID extraction, if the filesystem has one
    pub uuid: Option<UuidFn>,
    /// Lifetime of the driver's module
    pub module: StaticModule,
}

/// Write-once slot holding the image's filesystem driver
pub struct DriverSlot {
    slot: Once<&'static FsDriver>,
}

impl DriverSlot {
    /// Slot with no driver
    pub const fn empty() -> Self {
        Self { slot: Once::new() }
    }

    /// Slot filled at compile time
    pub const fn with(driver: &'static FsDriver) -> Self {
        Self {
            slot: Once::initialized(driver),
        }
    }

    /// Fill the slot
    ///
    /// Returns the driver already present if the slot was filled before.
    pub fn register(&self, driver: &'static FsDriver) -> core::result::Result<(), &'static FsDriver> {
        let mut installed = false;
        let current = *self.slot.call_once(|| {
            installed = true;
            driver
        });
        if installed {
            log::debug!("registered filesystem driver {}", driver.name);
            Ok(())
        } else {
            Err(current)
        }
    }

    /// Registered driver
    pub fn get(&self) -> Option<&'static FsDriver> {
        self.slot.get().copied()
    }
}

impl Default for DriverSlot {
    fn default() -> Self {
        Self::empty()
    }
}
