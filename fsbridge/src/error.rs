//! Error codes of the foreign runtime contract
//!
//! Filesystem drivers report failures with these codes; the bridge converts
//! them to firmware [`Status`] values at the UEFI boundary and back.

use crate::firmware::Status;
use core::fmt;

/// Result type for operations exposed to the foreign driver
pub type Result<T> = core::result::Result<T, ErrorCode>;

/// Error codes understood by the foreign filesystem driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ErrorCode {
    /// No error
    #[default]
    None = 0,

    /// Self-test failed
    TestFailure = 1,

    /// Module could not be loaded
    BadModule = 2,

    /// Allocation failed
    OutOfMemory = 3,

    /// Wrong file type for the operation
    BadFileType = 4,

    /// File or directory not found
    FileNotFound = 5,

    /// Reading file contents failed
    FileReadError = 6,

    /// Malformed path
    BadFilename = 7,

    /// Volume not recognised by the driver
    UnknownFs = 8,

    /// Filesystem metadata is corrupted
    BadFs = 9,

    /// Malformed number
    BadNumber = 10,

    /// Value or address out of range
    OutOfRange = 11,

    /// Device name not known
    UnknownDevice = 12,

    /// Device unusable
    BadDevice = 13,

    /// Raw disk read failed
    ReadError = 14,

    /// Raw disk write failed
    WriteError = 15,

    /// Invalid argument
    BadArgument = 18,

    /// Feature not implemented by the driver
    NotImplementedYet = 24,
}

impl ErrorCode {
    /// True for anything but [`ErrorCode::None`]
    #[inline]
    pub const fn is_error(self) -> bool {
        !matches!(self, ErrorCode::None)
    }

    /// Human-readable description
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "No error",
            Self::TestFailure => "Test failure",
            Self::BadModule => "Bad module",
            Self::OutOfMemory => "Out of memory",
            Self::BadFileType => "Bad file type",
            Self::FileNotFound => "File not found",
            Self::FileReadError => "File read error",
            Self::BadFilename => "Bad filename",
            Self::UnknownFs => "Unknown filesystem",
            Self::BadFs => "Bad filesystem",
            Self::BadNumber => "Bad number",
            Self::OutOfRange => "Out of range",
            Self::UnknownDevice => "Unknown device",
            Self::BadDevice => "Bad device",
            Self::ReadError => "Read error",
            Self::WriteError => "Write error",
            Self::BadArgument => "Bad argument",
            Self::NotImplementedYet => "Not implemented yet",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorCode> for Status {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::None => Status::SUCCESS,
            ErrorCode::OutOfMemory => Status::OUT_OF_RESOURCES,
            ErrorCode::FileNotFound | ErrorCode::UnknownDevice => Status::NOT_FOUND,
            ErrorCode::ReadError
            | ErrorCode::WriteError
            | ErrorCode::FileReadError
            | ErrorCode::BadDevice => Status::DEVICE_ERROR,
            ErrorCode::BadFs => Status::VOLUME_CORRUPTED,
            ErrorCode::UnknownFs | ErrorCode::NotImplementedYet | ErrorCode::BadModule => {
                Status::UNSUPPORTED
            }
            ErrorCode::BadFilename
            | ErrorCode::BadNumber
            | ErrorCode::BadArgument
            | ErrorCode::BadFileType
            | ErrorCode::OutOfRange => Status::INVALID_PARAMETER,
            ErrorCode::TestFailure => Status::LOAD_ERROR,
        }
    }
}

impl From<Status> for ErrorCode {
    fn from(status: Status) -> Self {
        match status {
            Status::SUCCESS => ErrorCode::None,
            Status::OUT_OF_RESOURCES => ErrorCode::OutOfMemory,
            Status::NOT_FOUND => ErrorCode::FileNotFound,
            Status::DEVICE_ERROR => ErrorCode::ReadError,
            Status::VOLUME_CORRUPTED => ErrorCode::BadFs,
            Status::UNSUPPORTED => ErrorCode::NotImplementedYet,
            Status::INVALID_PARAMETER | Status::BUFFER_TOO_SMALL => ErrorCode::BadArgument,
            s if !s.is_error() => ErrorCode::None,
            _ => ErrorCode::BadDevice,
        }
    }
}
