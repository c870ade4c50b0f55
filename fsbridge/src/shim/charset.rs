//! Charset conversion
//!
//! The driver speaks UTF-8, the firmware UTF-16. Both directions are bounded
//! by the destination capacity and never emit half a character.

use alloc::string::String;

/// Replacement for undecodable input
const REPLACEMENT: char = '?';

/// Encode `src` as UTF-16 into `dest`, returning the number of units written
///
/// Stops at the first NUL in `src` or at the last character that fits
/// entirely; a surrogate pair is never split. No terminator is written.
pub fn encode_utf16(src: &str, dest: &mut [u16]) -> usize {
    let mut written = 0;
    for c in src.chars() {
        if c == '\0' {
            break;
        }
        let needed = c.len_utf16();
        if written + needed > dest.len() {
            break;
        }
        c.encode_utf16(&mut dest[written..written + needed]);
        written += needed;
    }
    written
}

/// Encode `src` as NUL-terminated UTF-16 into `dest`, returning the length
/// without the terminator
///
/// `dest` must hold at least one unit.
pub fn encode_utf16_nul(src: &str, dest: &mut [u16]) -> usize {
    let Some(cap) = dest.len().checked_sub(1) else {
        return 0;
    };
    let n = encode_utf16(src, &mut dest[..cap]);
    dest[n] = 0;
    n
}

/// Decode UTF-16 up to the first NUL into a string of at most `max_bytes`
/// UTF-8 bytes
///
/// Unpaired surrogates decode as `?`. Characters that would push the result
/// past `max_bytes` are dropped along with everything after them.
pub fn decode_utf16(src: &[u16], max_bytes: usize) -> String {
    let end = src.iter().position(|&u| u == 0).unwrap_or(src.len());
    let mut out = String::new();
    for c in char::decode_utf16(src[..end].iter().copied()) {
        let c = c.unwrap_or(REPLACEMENT);
        if out.len() + c.len_utf8() > max_bytes {
            break;
        }
        out.push(c);
    }
    out
}

/// Widen narrow console text one byte per unit
///
/// Calls `sink` with NUL-terminated chunks of at most `N - 1` units; `\n` is
/// expanded to `\r\n`. Returns the first error `sink` reports.
pub fn widen_chunks<const N: usize, E>(
    text: &str,
    mut sink: impl FnMut(&[u16]) -> Result<(), E>,
) -> Result<(), E> {
    let mut chunk = [0u16; N];
    let mut len = 0;
    for &b in text.as_bytes() {
        // room for "\r\n" plus the terminator
        if len + 3 > N {
            chunk[len] = 0;
            sink(&chunk[..=len])?;
            len = 0;
        }
        if b == b'\n' {
            chunk[len] = u16::from(b'\r');
            len += 1;
        }
        chunk[len] = u16::from(b);
        len += 1;
    }
    if len > 0 {
        chunk[len] = 0;
        sink(&chunk[..=len])?;
    }
    Ok(())
}
