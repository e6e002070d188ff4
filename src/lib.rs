//! Check-in/check-out selection for hotel stays.
//!
//! The crate is built from small value types: [`CalendarDate`] is a
//! day-granular date, [`DateWindow`] pairs an optional check-in with an
//! optional check-out, [`RangeSelectionController`] turns calendar clicks and
//! manual edits into new windows, [`Calendar`] lays a month out as a grid of
//! [`CalendarCell`]s, and [`BookingIntentForm`] binds all of it to a booking
//! submission.

mod calendar;
mod clock;
mod config;
mod consts;
mod form;
mod prelude;
mod selection;
mod types;
mod window;

#[cfg(test)]
mod test_utils;

pub use calendar::{Calendar, CalendarCell, CalendarError, Cells, DisplayedMonth, cells_for, cells_for_week_start};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, PickerConfig};
pub use consts::*;
pub use form::{
    BookingConfirmation, BookingCreator, BookingIntentForm, BookingRequest, Field, FieldError, FormState,
    RoomNumber, SubmissionRejected, SubmitError,
};
pub use selection::RangeSelectionController;
pub use types::{Day, Month, Weekday, Year, days_in_month, is_leap_year};
pub use window::{DateWindow, Phase, WindowError, validate};

use crate::prelude::*;
use chrono::{Days, NaiveDate};
use std::str::FromStr;

/// A calendar day with no time-of-day component.
///
/// Ordering is by `(year, month, day)`. Always formats as `YYYY-MM-DD`, which is
/// also the form used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}-{}-{}", year, month, day)]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// 0001-01-01
    pub const MIN: Self = Self {
        year:  Year::MIN,
        month: Month::JANUARY,
        day:   Day::FIRST,
    };
    /// 9999-12-31
    pub const MAX: Self = Self {
        year:  Year::MAX,
        month: Month::DECEMBER,
        day:   Day::LAST_OF_DECEMBER,
    };

    /// Creates a date from already validated components.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if `day` does not exist in that month.
    pub fn new(year: Year, month: Month, day: Day) -> Result<Self, ParseError> {
        let day = Day::new(day.get(), year.get(), month.get())?;
        Ok(Self { year, month, day })
    }

    /// Creates a date from raw numbers.
    ///
    /// # Errors
    /// Returns the `ParseError` for the first component that is out of range.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year:  Year::new(year)?,
            month: Month::new(month)?,
            day:   Day::new(day, year, month)?,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    pub fn weekday(&self) -> Weekday {
        use chrono::Datelike;

        self.to_naive_date().weekday().into()
    }

    pub const fn first_of_month(&self) -> Self {
        Self {
            day: Day::FIRST,
            ..*self
        }
    }

    pub(crate) const fn first_day_of(year: Year, month: Month) -> Self {
        Self {
            year,
            month,
            day: Day::FIRST,
        }
    }

    pub fn last_of_month(&self) -> Self {
        let last = days_in_month(self.year(), self.month());
        Self::from_ymd(self.year(), self.month(), last).unwrap_or(*self)
    }

    /// The next day, or `None` after 9999-12-31.
    pub fn succ(&self) -> Option<Self> {
        Self::from_naive(self.to_naive_date().succ_opt()?)
    }

    /// The previous day, or `None` before 0001-01-01.
    pub fn pred(&self) -> Option<Self> {
        Self::from_naive(self.to_naive_date().pred_opt()?)
    }

    pub fn checked_add_days(&self, days: u32) -> Option<Self> {
        Self::from_naive(self.to_naive_date().checked_add_days(Days::new(u64::from(days)))?)
    }

    pub fn checked_sub_days(&self, days: u32) -> Option<Self> {
        Self::from_naive(self.to_naive_date().checked_sub_days(Days::new(u64::from(days)))?)
    }

    /// Signed number of days from `self` to `other`; positive when `other` is later.
    pub fn days_until(&self, other: &Self) -> i64 {
        other
            .to_naive_date()
            .signed_duration_since(self.to_naive_date())
            .num_days()
    }

    pub fn to_naive_date(&self) -> NaiveDate {
        NaiveDate::from(*self)
    }

    /// Days since 0000-12-31, so 0001-01-01 is day 1.
    pub(crate) fn day_number(&self) -> i64 {
        use chrono::Datelike;

        i64::from(self.to_naive_date().num_days_from_ce())
    }

    pub(crate) fn from_day_number(days: i64) -> Option<Self> {
        let days = i32::try_from(days).ok()?;
        Self::from_naive(NaiveDate::from_num_days_from_ce_opt(days)?)
    }

    fn from_naive(date: NaiveDate) -> Option<Self> {
        Self::try_from(date).ok()
    }

    fn parse_component<T: FromStr>(part: &str, width: usize) -> Result<T, ParseError> {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(part.to_owned()));
        }
        part.parse::<T>()
            .map_err(|_| ParseError::InvalidFormat(part.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Parses `YYYY-MM-DD`. A trailing `T...` time component is discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let date_part = trimmed
            .split_once(TIME_DESIGNATOR)
            .map_or(trimmed, |(date, _time)| date);

        let parts: Vec<&str> = date_part.split(DATE_SEPARATOR).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed}"
            )));
        };

        let year = Self::parse_component::<u16>(year, 4)?;
        let month = Self::parse_component::<u8>(month, 2)?;
        let day = Self::parse_component::<u8>(day, 2)?;

        Self::from_ymd(year, month, day)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        // Years 1..=9999 are always inside chrono's range
        Self::from_ymd_opt(i32::from(date.year()), u32::from(date.month()), u32::from(date.day()))
            .unwrap_or(Self::MIN)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = ParseError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        use chrono::Datelike;

        let year = u16::try_from(date.year()).map_err(|_| ParseError::InvalidFormat(date.to_string()))?;
        let month = u8::try_from(date.month()).map_err(|_| ParseError::InvalidFormat(date.to_string()))?;
        let day = u8::try_from(date.day()).map_err(|_| ParseError::InvalidFormat(date.to_string()))?;
        Self::from_ymd(year, month, day)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
