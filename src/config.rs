use serde::{Deserialize, Serialize};

use crate::{DEFAULT_STAY_NIGHTS, Weekday};

/// Host-tunable picker behaviour.
///
/// Deserializes from any serde format with every field optional, so it can be
/// embedded in an application's own config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// First column of the calendar grid
    pub week_start: Weekday,

    /// Nights filled in when only a check-in is entered
    pub default_stay_nights: u32,

    /// Also fill the default stay after a calendar click, not just after
    /// a manual check-in edit
    pub auto_fill_on_calendar_pick: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("default_stay_nights must be at least 1")]
    ZeroStay,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Monday,
            default_stay_nights: DEFAULT_STAY_NIGHTS,
            auto_fill_on_calendar_pick: false,
        }
    }
}

impl PickerConfig {
    /// # Errors
    /// Returns `ConfigError::ZeroStay` if the default stay is zero nights,
    /// which would produce a window that never validates.
    pub const fn validated(self) -> Result<Self, ConfigError> {
        if self.default_stay_nights == 0 {
            return Err(ConfigError::ZeroStay);
        }
        Ok(self)
    }
}
