//! UEFI status codes

use core::fmt;

const ERROR_BIT: usize = 1 << (usize::BITS - 1);

/// Raw UEFI status as returned by every boot/runtime service call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Status(pub usize);

impl Status {
    /// EFI_SUCCESS
    pub const SUCCESS: Status = Status(0);
    /// EFI_LOAD_ERROR
    pub const LOAD_ERROR: Status = Status(ERROR_BIT | 1);
    /// EFI_INVALID_PARAMETER
    pub const INVALID_PARAMETER: Status = Status(ERROR_BIT | 2);
    /// EFI_UNSUPPORTED
    pub const UNSUPPORTED: Status = Status(ERROR_BIT | 3);
    /// EFI_BUFFER_TOO_SMALL
    pub const BUFFER_TOO_SMALL: Status = Status(ERROR_BIT | 5);
    /// EFI_NOT_READY
    pub const NOT_READY: Status = Status(ERROR_BIT | 6);
    /// EFI_DEVICE_ERROR
    pub const DEVICE_ERROR: Status = Status(ERROR_BIT | 7);
    /// EFI_VOLUME_CORRUPTED
    pub const VOLUME_CORRUPTED: Status = Status(ERROR_BIT | 10);
    /// EFI_OUT_OF_RESOURCES
    pub const OUT_OF_RESOURCES: Status = Status(ERROR_BIT | 9);
    /// EFI_NOT_FOUND
    pub const NOT_FOUND: Status = Status(ERROR_BIT | 14);
    /// EFI_ALREADY_STARTED
    pub const ALREADY_STARTED: Status = Status(ERROR_BIT | 20);

    /// True if the high (error) bit is set
    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 & ERROR_BIT != 0
    }

    /// Turn a raw service return value into a `Result`
    #[inline]
    pub fn to_result(self) -> Result<(), Status> {
        if self.is_error() {
            Err(self)
        } else {
            Ok(())
        }
    }

    /// Short name for known codes
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::SUCCESS => "Success",
            Self::LOAD_ERROR => "Load Error",
            Self::INVALID_PARAMETER => "Invalid Parameter",
            Self::UNSUPPORTED => "Unsupported",
            Self::BUFFER_TOO_SMALL => "Buffer Too Small",
            Self::NOT_READY => "Not Ready",
            Self::DEVICE_ERROR => "Device Error",
            Self::VOLUME_CORRUPTED => "Volume Corrupted",
            Self::OUT_OF_RESOURCES => "Out of Resources",
            Self::NOT_FOUND => "Not Found",
            Self::ALREADY_STARTED => "Already Started",
            _ => "Unknown Status",
        }
    }
}

impl From<usize> for Status {
    fn from(raw: usize) -> Self {
        Status(raw)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0 & !ERROR_BIT, self.as_str())
    }
}
