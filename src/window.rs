use serde::{Deserialize, Serialize};

use crate::{CalendarDate, form::Field, prelude::*};

/// A stay being selected: an optional check-in and an optional check-out.
///
/// Windows are values. Every edit produces a new window, so the same window
/// can be shared between the calendar and the form without aliasing.
/// Any shape can be represented; [`DateWindow::validate`] decides whether it
/// is acceptable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    check_in:  Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    check_out: Option<CalendarDate>,
}

/// Selection progress, derived from which dates a window holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    /// No check-in yet (a lone check-out also counts as empty)
    #[display(fmt = "empty")]
    Empty,
    #[display(fmt = "awaiting check-out")]
    AwaitingCheckout,
    #[display(fmt = "complete")]
    Complete,
}

/// Why a window cannot be booked. Each variant belongs to one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// A check-out was chosen without a check-in.
    #[error("Select a check-in date before choosing check-out ({check_out})")]
    OrphanCheckout { check_out: CalendarDate },

    /// The check-in precedes the first selectable day.
    #[error("Check-in date {check_in} is before the earliest available date {min_selectable}")]
    CheckInTooEarly {
        check_in:       CalendarDate,
        min_selectable: CalendarDate,
    },

    /// The check-out is on or before the check-in.
    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn {
        check_in:  CalendarDate,
        check_out: CalendarDate,
    },
}

impl WindowError {
    /// The form field this error is reported against
    pub const fn field(&self) -> Field {
        match self {
            Self::OrphanCheckout { .. } | Self::CheckInTooEarly { .. } => Field::CheckIn,
            Self::CheckOutNotAfterCheckIn { .. } => Field::CheckOut,
        }
    }
}

/// Checks a window against the booking rules, in order:
/// a check-out needs a check-in, the check-in may not precede
/// `min_selectable`, and the check-out must fall strictly after the check-in.
///
/// # Errors
/// Returns the first [`WindowError`] that applies.
pub fn validate(window: &DateWindow, min_selectable: CalendarDate) -> Result<(), WindowError> {
    match (window.check_in, window.check_out) {
        (None, Some(check_out)) => Err(WindowError::OrphanCheckout { check_out }),
        (Some(check_in), _) if check_in < min_selectable => Err(WindowError::CheckInTooEarly {
            check_in,
            min_selectable,
        }),
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            Err(WindowError::CheckOutNotAfterCheckIn { check_in, check_out })
        },
        _ => Ok(()),
    }
}

impl DateWindow {
    /// Creates a window of any shape. Use [`validate`] to check it.
    pub const fn new(check_in: Option<CalendarDate>, check_out: Option<CalendarDate>) -> Self {
        Self { check_in, check_out }
    }

    pub const fn empty() -> Self {
        Self::new(None, None)
    }

    /// A window holding only a check-in
    pub const fn starting(check_in: CalendarDate) -> Self {
        Self::new(Some(check_in), None)
    }

    pub const fn check_in(&self) -> Option<CalendarDate> {
        self.check_in
    }

    pub const fn check_out(&self) -> Option<CalendarDate> {
        self.check_out
    }

    #[must_use]
    pub const fn with_check_in(self, check_in: Option<CalendarDate>) -> Self {
        Self { check_in, ..self }
    }

    #[must_use]
    pub const fn with_check_out(self, check_out: Option<CalendarDate>) -> Self {
        Self { check_out, ..self }
    }

    pub const fn phase(&self) -> Phase {
        match (self.check_in, self.check_out) {
            (None, _) => Phase::Empty,
            (Some(_), None) => Phase::AwaitingCheckout,
            (Some(_), Some(_)) => Phase::Complete,
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self.phase(), Phase::Complete)
    }

    /// # Errors
    /// See [`validate`].
    pub fn validate(&self, min_selectable: CalendarDate) -> Result<(), WindowError> {
        validate(self, min_selectable)
    }

    /// Number of nights between check-in and check-out, when both are set
    /// and in order.
    pub fn nights(&self) -> Option<u32> {
        let (check_in, check_out) = self.dates()?;
        u32::try_from(check_in.days_until(&check_out))
            .ok()
            .filter(|&n| n > 0)
    }

    /// Whether `date` lies within `[check_in, check_out]`.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.dates()
            .is_some_and(|(check_in, check_out)| check_in <= date && date <= check_out)
    }

    /// Both dates, when the window is complete
    pub const fn dates(&self) -> Option<(CalendarDate, CalendarDate)> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some((check_in, check_out)),
            _ => None,
        }
    }
}
