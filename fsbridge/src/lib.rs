//! Morpheus Filesystem Bridge
//!
//! A `no_std` binding layer that lets a filesystem driver written against a
//! foreign runtime contract run unmodified inside a UEFI driver.
//!
//! # Overview
//!
//! The foreign driver expects its native host to provide memory allocation,
//! sector-addressed disk reads, device handles, epoch timestamps, console
//! access and module reference counting. UEFI provides none of these in that
//! shape. This crate emulates them on top of boot services:
//!
//! - **Disk I/O translation** ([`disk`]) - sector + offset reads become raw
//!   byte-offset reads on the volume's Disk I/O protocol
//! - **Device shadowing** ([`device`]) - the foreign Device/Disk pair bound to
//!   one mounted volume
//! - **Probe & UUID** ([`bridge`]) - runs the registered driver against a
//!   volume and marshals its identifier to UTF-16
//! - **Time conversion** ([`time`]) - epoch seconds to calendar time
//! - **Runtime shim** ([`shim`]) - allocation, charset, environment, console,
//!   fatal exit and module references
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │   surrounding UEFI driver    │      │   foreign filesystem driver  │
//! │  init / probe / uuid / exit  │      │   dir(), uuid() entry points │
//! └──────────────┬───────────────┘      └──────────────┬───────────────┘
//!                │                                     │ disk_read, malloc,
//!                ▼                                     ▼ env_get, getkey ...
//!        ┌───────────────┐   Device/Disk   ┌────────────────────────┐
//!        │    Bridge     │ ──────────────▶ │        Runtime         │
//!        └───────────────┘                 └───────────┬────────────┘
//!                                                      ▼
//!                                     firmware traits (DiskIo, PoolServices,
//!                                     ConsoleIn/Out, VariableStore, Image)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use fsbridge::{Bridge, DriverSlot, Runtime, Volume};
//!
//! static DRIVERS: DriverSlot = DriverSlot::with(&ISO_DRIVER);
//!
//! let firmware = unsafe { EfiFirmware::new(image_handle, system_table) };
//! let runtime = Runtime::new(firmware.services());
//! let bridge = Bridge::new(&runtime, &DRIVERS);
//!
//! let disk_io = unsafe { EfiDiskIo::new(disk_io_protocol) };
//! let mut volume = Volume::new(&disk_io);
//! bridge.init(&mut volume)?;
//! if bridge.probe(&volume) {
//!     let uuid = bridge.uuid(&volume);
//! }
//! bridge.exit(&mut volume)?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod bridge;
pub mod device;
pub mod disk;
pub mod error;
pub mod firmware;
pub mod fs;
pub mod logger;
pub mod shim;
pub mod time;

pub use bridge::{Bridge, Volume, UUID_MAX_CHARS};
pub use device::Device;
pub use disk::{Disk, VolumeContext, MEDIA_ANY, SECTOR_SIZE};
pub use error::{ErrorCode, Result};
pub use firmware::{Firmware, Status};
pub use fs::{DirHook, DirhookInfo, DriverSlot, FsDriver};
pub use shim::{PoolBox, Runtime, StaticModule};
pub use time::{to_calendar, CalendarTime};
