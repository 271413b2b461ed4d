//! Appointment models and the status state machine.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of service booked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    Consultation,
    Vaccination,
    Surgery,
    Grooming,
    Emergency,
}

impl AppointmentType {
    /// Booked duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        match self {
            AppointmentType::Consultation => 30,
            AppointmentType::Vaccination => 15,
            AppointmentType::Surgery => 120,
            AppointmentType::Grooming => 60,
            AppointmentType::Emergency => 45,
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentType::Consultation => "consultation",
            AppointmentType::Vaccination => "vaccination",
            AppointmentType::Surgery => "surgery",
            AppointmentType::Grooming => "grooming",
            AppointmentType::Emergency => "emergency",
        };
        f.write_str(s)
    }
}

/// Appointment status.
///
/// ```text
/// scheduled → confirmed → in-progress → completed
///     └──────────┴─────────────┴──→ cancelled | no-show
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Completed, cancelled and no-show accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Whether the appointment still counts as upcoming work.
    pub fn is_open(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }

    /// Edges of the lifecycle graph. Staying in the same status is always allowed.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        if *self == next {
            return true;
        }
        match (*self, next) {
            (Scheduled, Confirmed) | (Confirmed, InProgress) | (InProgress, Completed) => true,
            (from, Cancelled | NoShow) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no-show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which status changes `update_appointment` accepts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may follow any other.
    #[default]
    Permissive,
    /// Only the edges of the lifecycle graph.
    Lifecycle,
}

impl TransitionPolicy {
    pub fn allows(&self, from: AppointmentStatus, to: AppointmentStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Lifecycle => from.can_transition_to(to),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "lifecycle" => Ok(TransitionPolicy::Lifecycle),
            other => Err(format!("unknown transition policy '{}'", other)),
        }
    }
}

/// A scheduled service instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique ID
    pub id: String,
    /// Pet being seen
    pub pet_id: String,
    /// Owner of the pet at booking time
    pub owner_id: String,
    /// Service type
    pub appointment_type: AppointmentType,
    /// Calendar day (local)
    pub date: NaiveDate,
    /// Local wall-clock start time
    pub start_time: NaiveTime,
    /// Duration in minutes, derived from the type
    pub duration_minutes: u32,
    /// Current status
    pub status: AppointmentStatus,
    /// Free-text notes
    pub notes: String,
    /// Whether the owner has been reminded
    pub reminder_sent: bool,
    /// Pet name captured at booking time
    pub pet_name: String,
    /// Owner name captured at booking time
    pub owner_name: String,
    /// Owner phone captured at booking time
    pub owner_phone: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Local wall-clock end time (wraps past midnight).
    pub fn end_time(&self) -> NaiveTime {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Booking request. Display fields are resolved by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub pet_id: String,
    pub owner_id: String,
    pub appointment_type: AppointmentType,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Initial status; `scheduled` when absent
    pub status: Option<AppointmentStatus>,
    pub notes: String,
}

impl NewAppointment {
    pub fn new(
        pet_id: impl Into<String>,
        owner_id: impl Into<String>,
        appointment_type: AppointmentType,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Self {
        Self {
            pet_id: pet_id.into(),
            owner_id: owner_id.into(),
            appointment_type,
            date,
            start_time,
            status: None,
            notes: String::new(),
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update for an appointment. Pet and owner references are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentPatch {
    /// Changing the type also re-derives the duration
    pub appointment_type: Option<AppointmentType>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
    pub reminder_sent: Option<bool>,
}

impl AppointmentPatch {
    /// Patch that only changes the status.
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Merge into an appointment and refresh its timestamp.
    pub fn apply(&self, appointment: &mut Appointment, now: DateTime<Utc>) {
        if let Some(t) = self.appointment_type {
            appointment.appointment_type = t;
            appointment.duration_minutes = t.duration_minutes();
        }
        if let Some(d) = self.date {
            appointment.date = d;
        }
        if let Some(t) = self.start_time {
            appointment.start_time = t;
        }
        if let Some(s) = self.status {
            appointment.status = s;
        }
        if let Some(n) = &self.notes {
            appointment.notes = n.clone();
        }
        if let Some(r) = self.reminder_sent {
            appointment.reminder_sent = r;
        }
        appointment.updated_at = now;
    }
}
