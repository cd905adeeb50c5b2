//! Independent checks run against a candidate before any I/O happens.
//!
//! Each rule sees the candidate and the clock reading taken once per attempt,
//! so running the same rules twice with the same `now` gives the same verdict.

use chrono::{NaiveDateTime, Timelike};

use super::policy::BookingPolicy;
use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::Appointment;

pub trait BookingRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, candidate: &Appointment, now: NaiveDateTime) -> ClinicResult<()>;
}

/// Rules in pipeline order: duration, business hours, lead time.
pub fn default_rules(policy: &BookingPolicy) -> Vec<Box<dyn BookingRule>> {
    vec![
        Box::new(MinimumDuration {
            minutes: policy.min_duration_minutes,
        }),
        Box::new(BusinessHours {
            opening_hour: policy.opening_hour,
            closing_hour: policy.closing_hour,
        }),
        Box::new(MinimumLeadTime {
            minutes: policy.min_lead_time_minutes,
        }),
    ]
}

#[derive(Debug, Clone, Copy)]
pub struct MinimumDuration {
    pub minutes: i64,
}

impl BookingRule for MinimumDuration {
    fn name(&self) -> &'static str {
        "minimum_duration"
    }

    fn check(&self, candidate: &Appointment, _now: NaiveDateTime) -> ClinicResult<()> {
        let actual = candidate.duration_minutes();
        if actual < self.minutes {
            return Err(ClinicError::DurationTooShort {
                actual,
                minimum: self.minutes,
            });
        }
        Ok(())
    }
}

/// Start hour must fall in `[opening_hour, closing_hour)`; minutes of the
/// start are ignored. The end's clock time may be at most `closing_hour:00`.
#[derive(Debug, Clone, Copy)]
pub struct BusinessHours {
    pub opening_hour: u32,
    pub closing_hour: u32,
}

impl BookingRule for BusinessHours {
    fn name(&self) -> &'static str {
        "business_hours"
    }

    fn check(&self, candidate: &Appointment, _now: NaiveDateTime) -> ClinicResult<()> {
        let start_hour = candidate.start_hour();
        if start_hour < self.opening_hour || start_hour >= self.closing_hour {
            return Err(ClinicError::OutsideBusinessHours(format!(
                "start {} is outside {:02}:00-{:02}:00",
                candidate.start().format("%H:%M"),
                self.opening_hour,
                self.closing_hour
            )));
        }

        // Compares hour and minute of the end only; seconds and date are not checked.
        let end = candidate.end();
        if end.hour() > self.closing_hour
            || (end.hour() == self.closing_hour && end.minute() > 0)
        {
            return Err(ClinicError::OutsideBusinessHours(format!(
                "end {} is past {:02}:00",
                end.format("%H:%M"),
                self.closing_hour
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MinimumLeadTime {
    pub minutes: i64,
}

impl BookingRule for MinimumLeadTime {
    fn name(&self) -> &'static str {
        "minimum_lead_time"
    }

    fn check(&self, candidate: &Appointment, now: NaiveDateTime) -> ClinicResult<()> {
        let actual = (candidate.start() - now).num_minutes();
        if actual < self.minutes {
            return Err(ClinicError::InsufficientLeadTime {
                actual,
                minimum: self.minutes,
            });
        }
        Ok(())
    }
}
