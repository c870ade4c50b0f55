//! Fatal exit

use super::Runtime;
use crate::firmware::Status;

impl Runtime<'_> {
    /// Unload the hosting image, reporting success to the firmware
    ///
    /// Never returns. If the firmware does not honour the request the caller
    /// is parked here for good.
    pub fn exit(&self) -> ! {
        log::debug!("image exit requested");
        self.firmware().image.exit(Status::SUCCESS);
        loop {
            core::hint::spin_loop();
        }
    }
}
