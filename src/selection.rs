use log::debug;

use crate::{CalendarDate, ConfigError, DEFAULT_STAY_NIGHTS, DateWindow, Phase, PickerConfig};

/// Turns user input into new [`DateWindow`]s.
///
/// Two entry surfaces are supported. Calendar clicks go through
/// [`select_day`](Self::select_day): a click on a complete range starts a new
/// one, and a click on or before a lone check-in moves the check-in. Manual
/// date fields go through [`edit_check_in`](Self::edit_check_in) and
/// [`edit_check_out`](Self::edit_check_out), where a fresh check-in gets a
/// default stay so the window stays bookable.
///
/// The controller holds policy only. The window itself is owned by the caller
/// and passed in on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelectionController {
    min_selectable:             CalendarDate,
    default_stay_nights:        u32,
    auto_fill_on_calendar_pick: bool,
}

impl RangeSelectionController {
    pub const fn new(min_selectable: CalendarDate) -> Self {
        Self {
            min_selectable,
            default_stay_nights: DEFAULT_STAY_NIGHTS,
            auto_fill_on_calendar_pick: false,
        }
    }

    /// # Errors
    /// Returns `ConfigError::ZeroStay` for a zero-night default stay, which
    /// would fill check-outs that never validate.
    pub fn with_config(min_selectable: CalendarDate, config: &PickerConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self {
            min_selectable,
            default_stay_nights: config.default_stay_nights,
            auto_fill_on_calendar_pick: config.auto_fill_on_calendar_pick,
        })
    }

    pub const fn min_selectable(&self) -> CalendarDate {
        self.min_selectable
    }

    pub fn is_selectable(&self, date: CalendarDate) -> bool {
        date >= self.min_selectable
    }

    /// Applies a calendar click to `current`.
    ///
    /// Days before the minimum selectable date are ignored and `current` is
    /// returned as is.
    pub fn select_day(&self, current: DateWindow, picked: CalendarDate) -> DateWindow {
        if !self.is_selectable(picked) {
            debug!("ignoring pick of disabled day {picked} (min {})", self.min_selectable);
            return current;
        }

        let next = match (current.phase(), current.check_in()) {
            (Phase::AwaitingCheckout, Some(check_in)) if picked > check_in => {
                debug!("committing stay {check_in} -> {picked}");
                current.with_check_out(Some(picked))
            },
            (phase, _) => {
                debug!("restarting selection at {picked} (was {phase})");
                DateWindow::starting(picked)
            },
        };

        if self.auto_fill_on_calendar_pick {
            self.fill_default_stay(next)
        } else {
            next
        }
    }

    /// Applies a manual check-in edit.
    ///
    /// When the check-in changes while no check-out is set, the check-out is
    /// filled with the default stay length. An existing check-out is kept.
    pub fn edit_check_in(&self, current: DateWindow, check_in: Option<CalendarDate>) -> DateWindow {
        let next = current.with_check_in(check_in);
        if check_in == current.check_in() {
            return next;
        }
        self.fill_default_stay(next)
    }

    /// Applies a manual check-out edit. The value is taken as given.
    pub fn edit_check_out(&self, current: DateWindow, check_out: Option<CalendarDate>) -> DateWindow {
        current.with_check_out(check_out)
    }

    /// Check-out the default stay would give for `check_in`
    pub fn default_check_out(&self, check_in: CalendarDate) -> Option<CalendarDate> {
        check_in.checked_add_days(self.default_stay_nights)
    }

    fn fill_default_stay(&self, window: DateWindow) -> DateWindow {
        match (window.check_in(), window.check_out()) {
            (Some(check_in), None) => {
                let check_out = self.default_check_out(check_in);
                debug!("defaulting check-out for {check_in} to {check_out:?}");
                window.with_check_out(check_out)
            },
            _ => window,
        }
    }
}
