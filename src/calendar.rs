use std::iter::FusedIterator;

use log::debug;
use serde::Serialize;

use crate::{CalendarDate, DAYS_PER_WEEK, DateWindow, Month, ParseError, Weekday, Year, prelude::*};

/// A month shown by the calendar.
///
/// Displayable months run from 0001-02 to 9999-11, the range whose full-week
/// grid stays inside the supported dates for any week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{} {}", "month.name()", "year.get()")]
pub struct DisplayedMonth {
    year:  Year,
    month: Month,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error("Month {year:04}-{month:02} is outside the displayable range")]
    OutOfRange { year: u16, month: u8 },
}

/// One day of the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date:              CalendarDate,
    /// False for the leading and trailing days borrowed from adjacent months
    pub in_current_month:  bool,
    /// Before the minimum selectable date; clicks on it are ignored
    pub disabled:          bool,
    pub is_range_start:    bool,
    pub is_range_end:      bool,
    /// Strictly between check-in and check-out
    pub in_range:          bool,
    pub is_min_selectable: bool,
}

impl DisplayedMonth {
    /// # Errors
    /// Returns `CalendarError::ParseError` for an invalid year or month and
    /// `CalendarError::OutOfRange` outside the displayable range.
    pub fn new(year: u16, month: u8) -> Result<Self, CalendarError> {
        Self::from_parts(Year::new(year)?, Month::new(month)?)
    }

    /// # Errors
    /// Returns `CalendarError::OutOfRange` outside the displayable range.
    pub fn from_parts(year: Year, month: Month) -> Result<Self, CalendarError> {
        let candidate = Self { year, month };
        if candidate < Self::FIRST || candidate > Self::LAST {
            return Err(CalendarError::OutOfRange {
                year:  year.get(),
                month: month.get(),
            });
        }
        Ok(candidate)
    }

    const FIRST: Self = Self {
        year:  Year::MIN,
        month: Month::FEBRUARY,
    };
    const LAST: Self = Self {
        year:  Year::MAX,
        month: Month::NOVEMBER,
    };

    /// The month containing `date`, clamped to the displayable range.
    pub fn containing(date: CalendarDate) -> Self {
        let month = Self {
            year:  date.year_typed(),
            month: date.month_typed(),
        };
        month.clamp(Self::FIRST, Self::LAST)
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn first_day(&self) -> CalendarDate {
        CalendarDate::first_day_of(self.year, self.month)
    }

    pub fn last_day(&self) -> CalendarDate {
        self.first_day().last_of_month()
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year_typed() == self.year && date.month_typed() == self.month
    }

    /// The following month, or `None` past the displayable range.
    pub fn succ(&self) -> Option<Self> {
        let (month, rolled) = self.month.succ();
        let year = if rolled { self.year.succ()? } else { self.year };
        Self::from_parts(year, month).ok()
    }

    /// The preceding month, or `None` before the displayable range.
    pub fn pred(&self) -> Option<Self> {
        let (month, rolled) = self.month.pred();
        let year = if rolled { self.year.pred()? } else { self.year };
        Self::from_parts(year, month).ok()
    }
}

/// The cells of one month's grid, in display order.
///
/// Finite and cheap to clone; clone it before iterating to walk the grid again.
#[derive(Debug, Clone)]
pub struct Cells {
    month:          DisplayedMonth,
    window:         DateWindow,
    min_selectable: CalendarDate,
    start:          i64,
    next:           i64,
    end:            i64,
}

impl Cells {
    /// Number of week rows in the full grid
    pub fn week_count(&self) -> usize {
        usize::try_from(self.end - self.start).unwrap_or(0) / usize::from(DAYS_PER_WEEK)
    }

    fn cell(&self, date: CalendarDate) -> CalendarCell {
        let is_range_start = self.window.check_in() == Some(date);
        let is_range_end = self.window.check_out() == Some(date);
        CalendarCell {
            date,
            in_current_month: self.month.contains(date),
            disabled: date < self.min_selectable,
            is_range_start,
            is_range_end,
            in_range: self.window.contains(date) && !is_range_start && !is_range_end,
            is_min_selectable: date == self.min_selectable,
        }
    }
}

impl Iterator for Cells {
    type Item = CalendarCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let date = CalendarDate::from_day_number(self.next)?;
        self.next += 1;
        Some(self.cell(date))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells {}

impl FusedIterator for Cells {}

/// Grid cells for `month` with weeks starting on Monday.
pub fn cells_for(month: DisplayedMonth, window: &DateWindow, min_selectable: CalendarDate) -> Cells {
    cells_for_week_start(month, window, min_selectable, Weekday::Monday)
}

/// Grid cells for `month`, padded to whole weeks beginning on `week_start`.
///
/// The grid starts on the last `week_start` on or before the first of the
/// month and ends on the day before the first `week_start` after the last of
/// the month, so its length is always a multiple of seven.
pub fn cells_for_week_start(
    month: DisplayedMonth,
    window: &DateWindow,
    min_selectable: CalendarDate,
    week_start: Weekday,
) -> Cells {
    let first = month.first_day();
    let last = month.last_day();
    let lead = first.weekday().days_since(week_start);
    let trail = DAYS_PER_WEEK - 1 - last.weekday().days_since(week_start);
    let start = first.day_number() - i64::from(lead);

    Cells {
        month,
        window: *window,
        min_selectable,
        start,
        next: start,
        end: last.day_number() + i64::from(trail) + 1,
    }
}

/// Month navigation state for a date-range picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    displayed:      DisplayedMonth,
    min_selectable: CalendarDate,
    week_start:     Weekday,
}

impl Calendar {
    /// Opens on the month of `check_in` if there is one, otherwise on the
    /// month of `min_selectable`.
    pub fn new(check_in: Option<CalendarDate>, min_selectable: CalendarDate, week_start: Weekday) -> Self {
        Self {
            displayed: DisplayedMonth::containing(check_in.unwrap_or(min_selectable)),
            min_selectable,
            week_start,
        }
    }

    pub const fn displayed(&self) -> DisplayedMonth {
        self.displayed
    }

    pub const fn min_selectable(&self) -> CalendarDate {
        self.min_selectable
    }

    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Header text, e.g. "June 2024"
    pub fn title(&self) -> String {
        self.displayed.to_string()
    }

    /// Column headers starting at the configured week start
    pub fn weekday_labels(&self) -> [&'static str; 7] {
        std::array::from_fn(|i| {
            let offset = u8::try_from(i).unwrap_or(0);
            Weekday::from_index(self.week_start.index() + offset).short_label()
        })
    }

    /// Months entirely before the minimum selectable date are never shown.
    pub fn can_go_previous(&self) -> bool {
        self.displayed > DisplayedMonth::containing(self.min_selectable) && self.displayed.pred().is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.displayed.succ().is_some()
    }

    /// Moves back one month. Returns false, leaving the calendar unchanged,
    /// when that would show a fully disabled month.
    pub fn previous_month(&mut self) -> bool {
        if !self.can_go_previous() {
            debug!("previous month blocked at {}", self.displayed);
            return false;
        }
        match self.displayed.pred() {
            Some(prev) => {
                self.displayed = prev;
                debug!("navigated to {}", self.displayed);
                true
            },
            None => false,
        }
    }

    pub fn next_month(&mut self) -> bool {
        match self.displayed.succ() {
            Some(next) => {
                self.displayed = next;
                debug!("navigated to {}", self.displayed);
                true
            },
            None => false,
        }
    }

    pub fn cells(&self, window: &DateWindow) -> Cells {
        cells_for_week_start(self.displayed, window, self.min_selectable, self.week_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{awaiting, complete, date, month};

    #[test]
    fn test_grid_length_is_whole_weeks() {
        for year in [2023, 2024, 2025] {
            for m in 1..=12 {
                for week_start in [Weekday::Monday, Weekday::Sunday, Weekday::Wednesday] {
                    let cells = cells_for_week_start(month(year, m), &DateWindow::empty(), date(2000, 1, 1), week_start);
                    let len = cells.len();
                    assert_eq!(len % 7, 0, "{year}-{m} starting {week_start:?} has {len} cells");
                    assert!((28..=42).contains(&len));
                    assert_eq!(cells.count(), len);
                }
            }
        }
    }

    #[test]
    fn test_grid_dates_are_consecutive() {
        for m in 1..=12 {
            let cells: Vec<_> = cells_for(month(2024, m), &DateWindow::empty(), date(2000, 1, 1)).collect();
            for pair in cells.windows(2) {
                assert_eq!(pair[0].date.succ(), Some(pair[1].date));
            }
        }
    }

    #[test]
    fn test_grid_covers_month_starting_monday() {
        // June 2024: Saturday 1st to Sunday 30th
        let cells: Vec<_> = cells_for(month(2024, 6), &DateWindow::empty(), date(2024, 1, 1)).collect();
        assert_eq!(cells.len(), 35);
        assert_eq!(cells[0].date, date(2024, 5, 27));
        assert_eq!(cells[0].date.weekday(), Weekday::Monday);
        assert_eq!(cells[34].date, date(2024, 6, 30));
        assert!(!cells[0].in_current_month);
        assert!(cells[5].in_current_month);
        assert_eq!(cells.iter().filter(|c| c.in_current_month).count(), 30);
    }

    #[test]
    fn test_grid_of_six_weeks() {
        // September 2024 starts on a Sunday
        let cells: Vec<_> = cells_for(month(2024, 9), &DateWindow::empty(), date(2024, 1, 1)).collect();
        assert_eq!(cells.len(), 42);
        assert_eq!(cells[0].date, date(2024, 8, 26));
        assert_eq!(cells[41].date, date(2024, 10, 6));
    }

    #[test]
    fn test_grid_of_four_weeks() {
        // February 2021 starts on a Monday and has 28 days
        let cells = cells_for(month(2021, 2), &DateWindow::empty(), date(2020, 1, 1));
        assert_eq!(cells.len(), 28);
        assert_eq!(cells.week_count(), 4);
    }

    #[test]
    fn test_grid_sunday_start() {
        let cells: Vec<_> =
            cells_for_week_start(month(2024, 6), &DateWindow::empty(), date(2024, 1, 1), Weekday::Sunday).collect();
        assert_eq!(cells[0].date, date(2024, 5, 26));
        assert_eq!(cells.last().map(|c| c.date), Some(date(2024, 7, 6)));
    }

    #[test]
    fn test_disabled_before_min() {
        let min = date(2024, 6, 12);
        let cells: Vec<_> = cells_for(month(2024, 6), &DateWindow::empty(), min).collect();
        for cell in &cells {
            assert_eq!(cell.disabled, cell.date < min, "{}", cell.date);
            assert_eq!(cell.is_min_selectable, cell.date == min);
        }
    }

    #[test]
    fn test_range_flags() {
        let window = complete(date(2024, 6, 10), date(2024, 6, 15));
        let cells: Vec<_> = cells_for(month(2024, 6), &window, date(2024, 6, 1)).collect();
        let find = |d: CalendarDate| cells.iter().find(|c| c.date == d).copied().unwrap();

        let start = find(date(2024, 6, 10));
        assert!(start.is_range_start && !start.is_range_end && !start.in_range);

        let end = find(date(2024, 6, 15));
        assert!(end.is_range_end && !end.is_range_start && !end.in_range);

        for day in 11..=14 {
            let cell = find(date(2024, 6, day));
            assert!(cell.in_range && !cell.is_range_start && !cell.is_range_end);
        }

        assert!(!find(date(2024, 6, 9)).in_range);
        assert!(!find(date(2024, 6, 16)).in_range);
        assert_eq!(cells.iter().filter(|c| c.in_range).count(), 4);
    }

    #[test]
    fn test_awaiting_checkout_marks_only_start() {
        let window = awaiting(date(2024, 6, 10));
        let cells: Vec<_> = cells_for(month(2024, 6), &window, date(2024, 6, 1)).collect();
        assert_eq!(cells.iter().filter(|c| c.is_range_start).count(), 1);
        assert!(cells.iter().all(|c| !c.is_range_end && !c.in_range));
    }

    #[test]
    fn test_range_spanning_months() {
        let window = complete(date(2024, 5, 30), date(2024, 6, 2));
        let cells: Vec<_> = cells_for(month(2024, 6), &window, date(2024, 5, 1)).collect();
        // 2024-05-30 and 05-31 appear as leading days of the June grid
        let start = cells.iter().find(|c| c.date == date(2024, 5, 30)).unwrap();
        assert!(start.is_range_start && !start.in_current_month);
        let interior: Vec<_> = cells.iter().filter(|c| c.in_range).map(|c| c.date).collect();
        assert_eq!(interior, vec![date(2024, 5, 31), date(2024, 6, 1)]);
    }

    #[test]
    fn test_cells_restart_from_clone() {
        let cells = cells_for(month(2024, 6), &DateWindow::empty(), date(2024, 6, 1));
        let first_pass: Vec<_> = cells.clone().collect();
        let second_pass: Vec<_> = cells.collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_week_count_after_partial_iteration() {
        let mut cells = cells_for(month(2024, 6), &DateWindow::empty(), date(2024, 6, 1));
        cells.next();
        assert_eq!(cells.week_count(), 5);
        assert_eq!(cells.len(), 34);
    }

    #[test]
    fn test_displayed_month_display() {
        assert_eq!(month(2024, 6).to_string(), "June 2024");
        assert_eq!(month(2025, 1).to_string(), "January 2025");
    }

    #[test]
    fn test_displayed_month_bounds() {
        assert!(DisplayedMonth::new(1, 1).is_err());
        assert!(DisplayedMonth::new(1, 2).is_ok());
        assert!(DisplayedMonth::new(9999, 11).is_ok());
        assert!(matches!(
            DisplayedMonth::new(9999, 12),
            Err(CalendarError::OutOfRange { year: 9999, month: 12 })
        ));
        assert!(matches!(
            DisplayedMonth::new(2024, 13),
            Err(CalendarError::ParseError(ParseError::InvalidMonth(13)))
        ));
        assert_eq!(DisplayedMonth::containing(CalendarDate::MAX), month(9999, 11));
        assert_eq!(DisplayedMonth::containing(CalendarDate::MIN), month(1, 2));
    }

    #[test]
    fn test_displayed_month_succ_pred() {
        assert_eq!(month(2024, 12).succ(), Some(month(2025, 1)));
        assert_eq!(month(2024, 1).pred(), Some(month(2023, 12)));
        assert_eq!(month(9999, 11).succ(), None);
        assert_eq!(month(1, 2).pred(), None);
    }

    #[test]
    fn test_displayed_month_days() {
        let feb = month(2024, 2);
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert!(feb.contains(date(2024, 2, 15)));
        assert!(!feb.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_calendar_opens_on_check_in_month() {
        let calendar = Calendar::new(Some(date(2024, 8, 3)), date(2024, 6, 12), Weekday::Monday);
        assert_eq!(calendar.displayed(), month(2024, 8));

        let calendar = Calendar::new(None, date(2024, 6, 12), Weekday::Monday);
        assert_eq!(calendar.displayed(), month(2024, 6));
        assert_eq!(calendar.title(), "June 2024");
    }

    #[test]
    fn test_previous_month_blocked_at_min_month() {
        let mut calendar = Calendar::new(None, date(2024, 6, 12), Weekday::Monday);
        assert!(!calendar.can_go_previous());
        assert!(!calendar.previous_month());
        assert_eq!(calendar.displayed(), month(2024, 6));
    }

    #[test]
    fn test_navigation_round_trip() {
        let mut calendar = Calendar::new(None, date(2024, 11, 20), Weekday::Monday);
        assert!(calendar.next_month());
        assert!(calendar.next_month());
        assert_eq!(calendar.displayed(), month(2025, 1));
        assert!(calendar.can_go_previous());
        assert!(calendar.previous_month());
        assert!(calendar.previous_month());
        assert_eq!(calendar.displayed(), month(2024, 11));
        assert!(!calendar.previous_month());
    }

    #[test]
    fn test_previous_month_blocked_when_check_in_precedes_min() {
        // Opened on an old check-in: navigation back stays blocked
        let mut calendar = Calendar::new(Some(date(2024, 3, 1)), date(2024, 6, 1), Weekday::Monday);
        assert!(!calendar.previous_month());
        assert_eq!(calendar.displayed(), month(2024, 3));
    }

    #[test]
    fn test_next_month_stops_at_last_displayable() {
        let mut calendar = Calendar::new(None, date(9999, 11, 1), Weekday::Monday);
        assert!(!calendar.can_go_next());
        assert!(!calendar.next_month());
    }

    #[test]
    fn test_weekday_labels_rotate() {
        let calendar = Calendar::new(None, date(2024, 6, 1), Weekday::Monday);
        assert_eq!(calendar.weekday_labels(), ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);

        let calendar = Calendar::new(None, date(2024, 6, 1), Weekday::Sunday);
        assert_eq!(calendar.weekday_labels(), ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    }

    #[test]
    fn test_calendar_cells_use_week_start() {
        let calendar = Calendar::new(None, date(2024, 6, 1), Weekday::Sunday);
        let first = calendar.cells(&DateWindow::empty()).next().unwrap();
        assert_eq!(first.date.weekday(), Weekday::Sunday);
    }

    #[test]
    fn test_cell_serializes_camel_case() {
        let cell = cells_for(month(2024, 6), &DateWindow::empty(), date(2024, 6, 1)).next().unwrap();
        let json = serde_json::to_string(&cell).unwrap();
        assert!(json.contains(r#""date":"2024-05-27""#));
        assert!(json.contains(r#""inCurrentMonth":false"#));
        assert!(json.contains(r#""disabled":true"#));
    }
}
