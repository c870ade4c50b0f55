//! Console primitives

use super::charset::widen_chunks;
use super::Runtime;
use crate::firmware::Status;

/// Units per output chunk, terminator included
const OUTPUT_CHUNK: usize = 128;

impl Runtime<'_> {
    /// Block until a key is pressed and return its UTF-16 value
    ///
    /// Busy-polls the input device. Keys without a character (arrows,
    /// function keys) return 0, as does a device error.
    pub fn getkey(&self) -> u32 {
        loop {
            match self.firmware().con_in.read_key_stroke() {
                Ok(key) => return u32::from(key.unicode_char),
                Err(Status::NOT_READY) => core::hint::spin_loop(),
                Err(status) => {
                    log::warn!("key read failed: {}", status);
                    return 0;
                }
            }
        }
    }

    /// Print narrow text, best effort
    ///
    /// Bytes are widened one-to-one; anything beyond ASCII comes out as
    /// whatever the console makes of it.
    pub fn xputs(&self, text: &str) {
        let con_out = self.firmware().con_out;
        let _ = widen_chunks::<OUTPUT_CHUNK, Status>(text, |chunk| con_out.output_string(chunk));
    }

    /// Flush pending console output (firmware consoles are unbuffered)
    pub fn refresh(&self) {}

    /// Number of registered terminal input drivers
    ///
    /// Always 0: the driver never runs its own terminal layer here.
    pub fn term_inputs(&self) -> usize {
        0
    }
}
