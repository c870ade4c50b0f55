//! Environment lookup
//!
//! The driver's environment is the firmware shell's variable namespace.
//! Names and values keep the fixed capacities of the native implementation:
//! 64 UTF-16 units for a name (terminator included) and 128 for a value.

use super::charset::{decode_utf16, encode_utf16_nul};
use super::Runtime;
use alloc::string::String;
use uguid::Guid;

/// Vendor GUID of shell variables: 158DEF5A-F656-419C-B027-7A3192C079D2
pub const SHELL_VARIABLE_GUID: Guid = uguid::guid!("158def5a-f656-419c-b027-7a3192c079d2");

/// Name capacity in UTF-16 units, terminator included
pub const ENV_NAME_MAX_CHARS: usize = 64;

/// Value capacity in UTF-16 units
pub const ENV_VALUE_MAX_CHARS: usize = 128;

impl Runtime<'_> {
    /// Look up shell variable `name`
    ///
    /// `None` if the variable is unset, the store rejects the query, or
    /// `name` does not fit in [`ENV_NAME_MAX_CHARS`] units or contains a NUL.
    /// The value is cut at its first NUL and at [`ENV_VALUE_MAX_CHARS`] units.
    pub fn env_get(&self, name: &str) -> Option<String> {
        let mut wide_name = [0u16; ENV_NAME_MAX_CHARS];
        let written = encode_utf16_nul(name, &mut wide_name);
        // a shortened name would address some other variable
        if name.contains('\0') || written != name.encode_utf16().count() {
            log::trace!("env name rejected: {} units", name.encode_utf16().count());
            return None;
        }

        // the store sizes in bytes, the driver in characters
        let mut raw = [0u8; ENV_VALUE_MAX_CHARS * 2];
        let size = match self
            .firmware()
            .variables
            .get_variable(&wide_name, &SHELL_VARIABLE_GUID, &mut raw)
        {
            Ok(size) => size.min(raw.len()),
            Err(status) => {
                log::trace!("env {}: {}", name, status);
                return None;
            }
        };

        let mut wide = [0u16; ENV_VALUE_MAX_CHARS];
        for (unit, bytes) in wide.iter_mut().zip(raw[..size].chunks_exact(2)) {
            *unit = u16::from_le_bytes([bytes[0], bytes[1]]);
        }
        let units = size / 2;

        // up to 3 UTF-8 bytes per unit
        Some(decode_utf16(&wide[..units], ENV_VALUE_MAX_CHARS * 3))
    }
}
