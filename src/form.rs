use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Calendar, CalendarDate, Cells, Clock, ConfigError, DateWindow, ParseError, PickerConfig, RangeSelectionController, WindowError,
    prelude::*,
};

const DEFAULT_REJECTION_MESSAGE: &str = "Unable to create booking. Please try again.";

/// Input fields of the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    #[display(fmt = "checkIn")]
    CheckIn,
    #[display(fmt = "checkOut")]
    CheckOut,
}

/// A validation problem attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("Check-out date is required")]
    MissingCheckOut,
}

impl FieldError {
    pub const fn field(&self) -> Field {
        match self {
            Self::Window(err) => err.field(),
            Self::MissingCheckOut => Field::CheckOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum FormState {
    #[default]
    #[display(fmt = "editing")]
    Editing,
    /// A booking request has been handed out and not yet resolved
    #[display(fmt = "submitting")]
    Submitting,
}

/// What is sent to the booking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub hotel_id:  String,
    pub check_in:  CalendarDate,
    pub check_out: CalendarDate,
}

/// Room numbers come back either as JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomNumber {
    #[display(fmt = "{_0}")]
    Number(u64),
    #[display(fmt = "{_0}")]
    Text(String),
}

/// A booking the service accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    #[serde(rename = "_id")]
    pub id:          String,
    #[serde(rename = "roomNumber")]
    pub room_number: RoomNumber,
}

impl BookingConfirmation {
    /// Short success message for the user
    pub fn notice(&self) -> String {
        format!("Room {} reserved", self.room_number)
    }

    /// Where the user continues to pay for this booking
    pub fn payment_path(&self) -> String {
        format!("/booking/payment?bookingId={}", self.id)
    }
}

/// The booking service refused or failed the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionRejected {
    pub message: String,
}

impl SubmissionRejected {
    /// Wraps a service message, falling back to a generic retry prompt.
    pub fn from_message(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_owned());
        Self { message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The window failed validation; nothing was sent.
    #[error("{0}")]
    Invalid(#[from] FieldError),

    #[error("A booking request is already in progress")]
    AlreadySubmitting,

    #[error("No booking request is in progress")]
    NotSubmitting,

    #[error(transparent)]
    Rejected(#[from] SubmissionRejected),
}

/// Creates bookings. Implemented by the REST client of the host application.
pub trait BookingCreator {
    /// # Errors
    /// Returns `SubmissionRejected` when the service refuses the booking or
    /// cannot be reached.
    fn create_booking(&self, request: &BookingRequest) -> Result<BookingConfirmation, SubmissionRejected>;
}

/// Booking form for one hotel: the selected window, the calendar showing it,
/// and the submission state.
///
/// Submission is split in two so the request can cross an async boundary:
/// [`begin_submit`](Self::begin_submit) validates and hands out the request,
/// [`finish_submit`](Self::finish_submit) records the outcome. While a request
/// is outstanding further submissions are refused.
#[derive(Debug, Clone)]
pub struct BookingIntentForm {
    hotel_id:   String,
    window:     DateWindow,
    controller: RangeSelectionController,
    calendar:   Calendar,
    state:      FormState,
}

impl BookingIntentForm {
    /// Opens a form with check-in today and the default stay.
    ///
    /// # Errors
    /// Returns the `ConfigError` if `config` does not validate.
    pub fn new(hotel_id: impl Into<String>, clock: &impl Clock, config: &PickerConfig) -> Result<Self, ConfigError> {
        let today = clock.today();
        let controller = RangeSelectionController::with_config(today, config)?;
        let window = DateWindow::new(Some(today), controller.default_check_out(today));

        Ok(Self {
            hotel_id: hotel_id.into(),
            window,
            controller,
            calendar: Calendar::new(window.check_in(), today, config.week_start),
            state: FormState::Editing,
        })
    }

    pub fn hotel_id(&self) -> &str {
        &self.hotel_id
    }

    pub const fn window(&self) -> DateWindow {
        self.window
    }

    pub const fn state(&self) -> FormState {
        self.state
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting)
    }

    pub const fn min_selectable(&self) -> CalendarDate {
        self.controller.min_selectable()
    }

    pub const fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// For month navigation
    pub const fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }

    /// Cells of the displayed month for the current window
    pub fn cells(&self) -> Cells {
        self.calendar.cells(&self.window)
    }

    /// Applies a calendar click and returns the new window.
    pub fn pick_day(&mut self, date: CalendarDate) -> DateWindow {
        self.window = self.controller.select_day(self.window, date);
        self.window
    }

    pub fn set_check_in(&mut self, check_in: Option<CalendarDate>) -> DateWindow {
        self.window = self.controller.edit_check_in(self.window, check_in);
        self.window
    }

    pub fn set_check_out(&mut self, check_out: Option<CalendarDate>) -> DateWindow {
        self.window = self.controller.edit_check_out(self.window, check_out);
        self.window
    }

    /// Sets check-in from text field input. An empty string clears it.
    ///
    /// # Errors
    /// Returns the `ParseError` for malformed input; the window is unchanged.
    pub fn set_check_in_input(&mut self, input: &str) -> Result<DateWindow, ParseError> {
        let value = parse_input(input)?;
        Ok(self.set_check_in(value))
    }

    /// Sets check-out from text field input. An empty string clears it.
    ///
    /// # Errors
    /// Returns the `ParseError` for malformed input; the window is unchanged.
    pub fn set_check_out_input(&mut self, input: &str) -> Result<DateWindow, ParseError> {
        let value = parse_input(input)?;
        Ok(self.set_check_out(value))
    }

    /// Current validation error, recomputed from the window on every call.
    pub fn field_error(&self) -> Option<FieldError> {
        self.window
            .validate(self.min_selectable())
            .err()
            .map(FieldError::from)
    }

    pub fn error_for(&self, field: Field) -> Option<FieldError> {
        self.field_error().filter(|err| err.field() == field)
    }

    /// Earliest value the check-out field should offer
    pub fn min_check_out_input(&self) -> CalendarDate {
        self.window.check_in().unwrap_or_else(|| self.min_selectable())
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.window.is_complete() && self.field_error().is_none()
    }

    /// Validates the window and, if it can be booked, marks the form as
    /// submitting and returns the request to send.
    ///
    /// # Errors
    /// `SubmitError::AlreadySubmitting` while a previous request is
    /// unresolved, `SubmitError::Invalid` when the window fails validation or
    /// lacks a check-out.
    pub fn begin_submit(&mut self) -> Result<BookingRequest, SubmitError> {
        if self.is_submitting() {
            warn!("ignoring submit for hotel {}: request already in flight", self.hotel_id);
            return Err(SubmitError::AlreadySubmitting);
        }

        self.window
            .validate(self.min_selectable())
            .map_err(FieldError::from)?;
        let (check_in, check_out) = self.window.dates().ok_or(FieldError::MissingCheckOut)?;

        self.state = FormState::Submitting;
        info!(
            "requesting booking for hotel {} from {check_in} to {check_out}",
            self.hotel_id
        );
        Ok(BookingRequest {
            hotel_id: self.hotel_id.clone(),
            check_in,
            check_out,
        })
    }

    /// Records the service's answer and returns the form to editing.
    ///
    /// # Errors
    /// `SubmitError::NotSubmitting` without a prior
    /// [`begin_submit`](Self::begin_submit), `SubmitError::Rejected` when the
    /// service refused. Rejections are not retried.
    pub fn finish_submit(
        &mut self,
        outcome: Result<BookingConfirmation, SubmissionRejected>,
    ) -> Result<BookingConfirmation, SubmitError> {
        if !self.is_submitting() {
            return Err(SubmitError::NotSubmitting);
        }
        self.state = FormState::Editing;

        match outcome {
            Ok(confirmation) => {
                info!(
                    "booking {} confirmed for hotel {} (room {})",
                    confirmation.id, self.hotel_id, confirmation.room_number
                );
                Ok(confirmation)
            },
            Err(rejected) => {
                warn!("booking for hotel {} rejected: {rejected}", self.hotel_id);
                Err(rejected.into())
            },
        }
    }

    /// Runs a full submission against a synchronous booking service.
    ///
    /// # Errors
    /// See [`begin_submit`](Self::begin_submit) and
    /// [`finish_submit`](Self::finish_submit).
    pub fn submit(&mut self, creator: &impl BookingCreator) -> Result<BookingConfirmation, SubmitError> {
        let request = self.begin_submit()?;
        debug!("dispatching {request:?}");
        let outcome = creator.create_booking(&request);
        self.finish_submit(outcome)
    }
}

fn parse_input(input: &str) -> Result<Option<CalendarDate>, ParseError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}
