use crate::CalendarDate;

/// Source of "today", used as the default earliest selectable day.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Reads the local date from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        use chrono::Datelike;

        let today = chrono::Local::now().date_naive();
        CalendarDate::try_from(today).unwrap_or_else(|err| {
            log::warn!("system date {today} is outside the supported range: {err}");
            if today.year() < 1 {
                CalendarDate::MIN
            } else {
                CalendarDate::MAX
            }
        })
    }
}

/// A clock that always reports the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> CalendarDate,
{
    fn today(&self) -> CalendarDate {
        self()
    }
}
