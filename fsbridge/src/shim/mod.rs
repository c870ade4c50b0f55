//! Runtime shim
//!
//! The primitive surface a foreign filesystem driver expects from its native
//! host, implemented on firmware services:
//!
//! - [`pool`] - pool allocation and [`PoolBox`]
//! - [`charset`] - bounded UTF-8 / UTF-16 conversion
//! - [`env`] - shell variable lookup
//! - [`console`] - key input, text output, refresh
//! - [`exit`] - fatal image exit
//! - [`module`] - module reference counting
//!
//! A [`Runtime`] also carries the process-wide error flag the driver reports
//! failures through.

pub mod charset;
pub mod console;
pub mod env;
pub mod exit;
pub mod module;
pub mod pool;

use crate::disk::Disk;
use crate::error::{ErrorCode, Result};
use crate::firmware::Firmware;
use core::cell::Cell;
use core::fmt;

pub use self::module::StaticModule;
pub use self::pool::PoolBox;

/// Execution context handed to the foreign driver
pub struct Runtime<'a> {
    firmware: Firmware<'a>,
    errno: Cell<ErrorCode>,
}

impl<'a> Runtime<'a> {
    /// Runtime over the given firmware services
    pub fn new(firmware: Firmware<'a>) -> Self {
        Self {
            firmware,
            errno: Cell::new(ErrorCode::None),
        }
    }

    /// Firmware services in use
    pub fn firmware(&self) -> &Firmware<'a> {
        &self.firmware
    }

    /// Current error flag
    pub fn errno(&self) -> ErrorCode {
        self.errno.get()
    }

    /// Reset the error flag
    pub fn clear_error(&self) {
        self.errno.set(ErrorCode::None);
    }

    /// Raise `code` with a message, returning `code` for `Err(..)`
    pub fn error(&self, code: ErrorCode, args: fmt::Arguments<'_>) -> ErrorCode {
        log::debug!("{}: {}", code, args);
        self.errno.set(code);
        code
    }

    /// Fold a returned error into the flag unless one is already pending
    pub fn record(&self, code: ErrorCode) {
        if code.is_error() && !self.errno.get().is_error() {
            self.errno.set(code);
        }
    }

    /// Sector-addressed read on behalf of the driver
    ///
    /// Same as [`Disk::read`], with failures also raised on the error flag.
    pub fn disk_read(&self, disk: &Disk<'_>, sector: u64, offset: u64, buf: &mut [u8]) -> Result<()> {
        disk.read(sector, offset, buf).map_err(|code| {
            self.errno.set(code);
            code
        })
    }
}
