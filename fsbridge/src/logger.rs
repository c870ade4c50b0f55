//! Global logging for the bridge
//!
//! A `log` backend keeping the most recent records in a fixed ring so they can
//! be inspected after a failed probe, optionally echoing each record to a
//! console sink installed by the driver image.

use alloc::vec::Vec;
use core::fmt::{self, Write};
use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::{Mutex, Once};

const MAX_LOG_ENTRIES: usize = 64;
const ENTRY_LEN: usize = 120;

/// One captured record
#[derive(Clone, Copy)]
pub struct LogEntry {
    level: Level,
    len: usize,
    text: [u8; ENTRY_LEN],
}

impl LogEntry {
    const EMPTY: LogEntry = LogEntry {
        level: Level::Trace,
        len: 0,
        text: [0; ENTRY_LEN],
    };

    /// Severity
    pub fn level(&self) -> Level {
        self.level
    }

    /// Formatted message, cut at `ENTRY_LEN` bytes
    pub fn message(&self) -> &str {
        // only whole characters are ever copied in
        core::str::from_utf8(&self.text[..self.len]).unwrap_or("")
    }
}

impl Write for LogEntry {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            let n = c.len_utf8();
            if self.len + n > ENTRY_LEN {
                break;
            }
            c.encode_utf8(&mut self.text[self.len..self.len + n]);
            self.len += n;
        }
        Ok(())
    }
}

struct Ring {
    entries: [LogEntry; MAX_LOG_ENTRIES],
    total: usize,
}

/// Ring-buffer `log` backend
pub struct RingLogger {
    ring: Mutex<Ring>,
    sink: Once<fn(&str)>,
}

impl RingLogger {
    /// Empty logger
    pub const fn new() -> Self {
        Self {
            ring: Mutex::new(Ring {
                entries: [LogEntry::EMPTY; MAX_LOG_ENTRIES],
                total: 0,
            }),
            sink: Once::new(),
        }
    }

    /// Captured records, oldest first
    pub fn recent(&self) -> Vec<LogEntry> {
        let ring = self.ring.lock();
        let count = ring.total.min(MAX_LOG_ENTRIES);
        let start = ring.total - count;
        (start..ring.total)
            .map(|i| ring.entries[i % MAX_LOG_ENTRIES])
            .collect()
    }

    /// Records seen since startup, including overwritten ones
    pub fn total(&self) -> usize {
        self.ring.lock().total
    }
}

impl Default for RingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for RingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut entry = LogEntry {
            level: record.level(),
            ..LogEntry::EMPTY
        };
        let _ = write!(entry, "{}", record.args());

        if let Some(sink) = self.sink.get() {
            sink(entry.message());
        }

        let mut ring = self.ring.lock();
        let slot = ring.total % MAX_LOG_ENTRIES;
        ring.entries[slot] = entry;
        ring.total += 1;
    }

    fn flush(&self) {}
}

static LOGGER: RingLogger = RingLogger::new();

/// Install the ring logger as the `log` backend
///
/// Safe to call more than once; later calls only change the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Echo every record to `sink` from now on (first caller wins)
pub fn set_sink(sink: fn(&str)) {
    LOGGER.sink.call_once(|| sink);
}

/// Captured records, oldest first
pub fn recent() -> Vec<LogEntry> {
    LOGGER.recent()
}

/// Number of records logged so far
pub fn log_count() -> usize {
    LOGGER.total()
}
