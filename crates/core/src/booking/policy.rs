use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};

/// Thresholds used by the booking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Shortest bookable slot.
    pub min_duration_minutes: i64,
    /// First hour at which an appointment may start.
    pub opening_hour: u32,
    /// Appointments must start before this hour and end no later than `closing_hour:00`.
    pub closing_hour: u32,
    /// Minimum gap between booking time and the appointment start.
    pub min_lead_time_minutes: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            min_duration_minutes: 15,
            opening_hour: 8,
            closing_hour: 18,
            min_lead_time_minutes: 60,
        }
    }
}

impl BookingPolicy {
    pub fn validate(&self) -> ClinicResult<()> {
        if self.min_duration_minutes <= 0 {
            return Err(ClinicError::Validation(
                "Minimum duration must be positive".to_string(),
            ));
        }
        if self.min_lead_time_minutes < 0 {
            return Err(ClinicError::Validation(
                "Minimum lead time cannot be negative".to_string(),
            ));
        }
        if self.closing_hour > 23 || self.opening_hour >= self.closing_hour {
            return Err(ClinicError::Validation(format!(
                "Business hours {}:00-{}:00 are not a valid same-day range",
                self.opening_hour, self.closing_hour
            )));
        }
        Ok(())
    }
}
