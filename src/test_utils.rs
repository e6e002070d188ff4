use crate::{CalendarDate, DateWindow, DisplayedMonth};

pub fn date(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::from_ymd(year, month, day).unwrap_or_else(|e| panic!("bad test date {year}-{month}-{day}: {e}"))
}

pub fn month(year: u16, month: u8) -> DisplayedMonth {
    DisplayedMonth::new(year, month).unwrap_or_else(|e| panic!("bad test month {year}-{month}: {e}"))
}

/// Window with only a check-in
pub fn awaiting(check_in: CalendarDate) -> DateWindow {
    DateWindow::new(Some(check_in), None)
}

pub fn complete(check_in: CalendarDate, check_out: CalendarDate) -> DateWindow {
    DateWindow::new(Some(check_in), Some(check_out))
}
