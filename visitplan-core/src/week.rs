//! Conversions between minutes-since-Monday and calendar positions.
//!
//! Every time value in a request or response is a count of minutes elapsed
//! since Monday 00:00 of the scheduling week. [`WeekTime`] offers the
//! human-facing `(day, hour, minute)` view with Monday numbered `1`, while
//! response records use a zero-based day index capped at Friday.

use std::fmt;

use thiserror::Error;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Working days in the scheduling horizon (Monday to Friday).
pub const WORKING_DAYS: u8 = 5;

/// Highest zero-based day index emitted in responses (Friday).
pub const LAST_DAY_IDX: u8 = WORKING_DAYS - 1;

const DAYS_PER_WEEK: u8 = 7;
const MINUTES_PER_HOUR: u32 = 60;
const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Zero-based working-day index for `minutes`, clamped to Friday.
///
/// Returns the index together with a flag telling whether clamping occurred.
///
/// # Examples
///
/// ```
/// use visitplan_core::day_index;
///
/// assert_eq!(day_index(1450), (1, false));
/// assert_eq!(day_index(9000), (4, true));
/// ```
#[must_use]
pub fn day_index(minutes: u32) -> (u8, bool) {
    let raw = minutes / MINUTES_PER_DAY;
    match u8::try_from(raw) {
        Ok(day) if day <= LAST_DAY_IDX => (day, false),
        _ => (LAST_DAY_IDX, true),
    }
}

/// A position within the week.
///
/// `day` is 1-based (`1` = Monday, `7` = Sunday).
///
/// # Examples
///
/// ```
/// use visitplan_core::WeekTime;
///
/// let tuesday_morning = WeekTime::new(2, 8, 30)?;
/// assert_eq!(tuesday_morning.to_minutes(), 1440 + 8 * 60 + 30);
/// assert_eq!(WeekTime::from_minutes(1950)?, tuesday_morning);
/// assert_eq!(tuesday_morning.to_string(), "Tue 08:30");
/// # Ok::<(), visitplan_core::WeekTimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekTime {
    day: u8,
    hour: u8,
    minute: u8,
}

/// Errors raised when building a [`WeekTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeekTimeError {
    /// Day outside `1..=7`.
    #[error("day {0} is outside 1..=7")]
    Day(u8),
    /// Hour outside `0..24`.
    #[error("hour {0} is outside 0..24")]
    Hour(u8),
    /// Minute outside `0..60`.
    #[error("minute {0} is outside 0..60")]
    Minute(u8),
    /// Minute count lies beyond the end of the week.
    #[error("{0} minutes is beyond the end of the week")]
    BeyondWeek(u32),
}

impl WeekTime {
    /// Validate and build a week position.
    ///
    /// # Errors
    ///
    /// Returns [`WeekTimeError`] naming the out-of-range component.
    pub const fn new(day: u8, hour: u8, minute: u8) -> Result<Self, WeekTimeError> {
        if day == 0 || day > DAYS_PER_WEEK {
            return Err(WeekTimeError::Day(day));
        }
        if hour >= 24 {
            return Err(WeekTimeError::Hour(hour));
        }
        if minute >= 60 {
            return Err(WeekTimeError::Minute(minute));
        }
        Ok(Self { day, hour, minute })
    }

    /// Decompose a minutes-since-Monday value.
    ///
    /// # Errors
    ///
    /// Returns [`WeekTimeError::BeyondWeek`] for values past Sunday 23:59.
    pub fn from_minutes(minutes: u32) -> Result<Self, WeekTimeError> {
        let day = u8::try_from(minutes / MINUTES_PER_DAY)
            .ok()
            .filter(|day| *day < DAYS_PER_WEEK)
            .ok_or(WeekTimeError::BeyondWeek(minutes))?;
        let within_day = minutes % MINUTES_PER_DAY;
        let hour = u8::try_from(within_day / MINUTES_PER_HOUR)
            .map_err(|_| WeekTimeError::BeyondWeek(minutes))?;
        let minute = u8::try_from(within_day % MINUTES_PER_HOUR)
            .map_err(|_| WeekTimeError::BeyondWeek(minutes))?;
        Self::new(day + 1, hour, minute)
    }

    /// Minutes elapsed since Monday 00:00.
    #[must_use]
    pub fn to_minutes(self) -> u32 {
        u32::from(self.day - 1) * MINUTES_PER_DAY
            + u32::from(self.hour) * MINUTES_PER_HOUR
            + u32::from(self.minute)
    }

    /// 1-based day of the week.
    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Hour of the day.
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Minute of the hour.
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for WeekTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = DAY_NAMES
            .get(usize::from(self.day - 1))
            .copied()
            .unwrap_or("???");
        write!(f, "{name} {:02}:{:02}", self.hour, self.minute)
    }
}
