//! Epoch timestamp conversion
//!
//! Foreign drivers report modification times as signed 32-bit seconds since
//! 1970-01-01 00:00:00. The firmware wants a broken-down calendar date.
//! No timezone is applied.

const SECS_PER_HOUR: i32 = 60 * 60;
const SECS_PER_DAY: i32 = SECS_PER_HOUR * 24;

/// Days before each month (index 0..=12), normal and leap years
const MON_YDAY: [[u16; 13]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366],
];

/// Broken-down calendar time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarTime {
    /// Year (1901..=2038 for 32-bit input)
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

/// Gregorian leap year rule
#[inline]
pub const fn is_leap(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Floor division
#[inline]
const fn div(a: i32, b: i32) -> i32 {
    a / b - (a % b < 0) as i32
}

/// Leap days in years 1..=y
#[inline]
const fn leaps_thru_end_of(y: i32) -> i32 {
    div(y, 4) - div(y, 100) + div(y, 400)
}

/// Convert epoch seconds to calendar time
///
/// Total over the whole `i32` range.
pub fn to_calendar(t: i32) -> CalendarTime {
    let mut days = t / SECS_PER_DAY;
    let mut rem = t % SECS_PER_DAY;
    while rem < 0 {
        rem += SECS_PER_DAY;
        days -= 1;
    }
    while rem >= SECS_PER_DAY {
        rem -= SECS_PER_DAY;
        days += 1;
    }

    let hour = rem / SECS_PER_HOUR;
    rem %= SECS_PER_HOUR;
    let minute = rem / 60;
    let second = rem % 60;

    let (year, month, day) = date_from_days(days);

    CalendarTime {
        year: year as u16,
        month,
        day,
        hour: hour as u8,
        minute: minute as u8,
        second: second as u8,
    }
}

/// Split a day count relative to 1970-01-01 into (year, month, day)
pub(crate) fn date_from_days(mut days: i32) -> (i32, u8, u8) {
    let mut y: i32 = 1970;

    while days < 0 || days >= if is_leap(y) { 366 } else { 365 } {
        // Guess a corrected year, assuming 365 days per year
        let yg = y + days / 365 - (days % 365 < 0) as i32;

        days -= (yg - y) * 365 + leaps_thru_end_of(yg - 1) - leaps_thru_end_of(y - 1);
        y = yg;
    }

    let ip = &MON_YDAY[is_leap(y) as usize];
    let mut m = 11;
    while days < i32::from(ip[m]) {
        m -= 1;
    }
    days -= i32::from(ip[m]);

    (y, (m + 1) as u8, (days + 1) as u8)
}
