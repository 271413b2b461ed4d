//! Dashboard statistics.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::AppointmentStatus;
use crate::store::ClinicState;

/// Summary counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicStats {
    pub total_owners: usize,
    pub total_pets: usize,
    /// Appointments dated today, any status
    pub today_appointments: usize,
    /// Appointments still awaiting confirmation
    pub pending_appointments: usize,
    /// Completed appointments dated from the 1st of this month through today
    pub completed_appointments_this_month: usize,
}

impl ClinicState {
    pub fn stats(&self, today: NaiveDate) -> ClinicStats {
        let month_start = today.with_day(1).unwrap_or(today);

        ClinicStats {
            total_owners: self.owners.len(),
            total_pets: self.owners.iter().map(|o| o.pets.len()).sum(),
            today_appointments: self.appointments_by_date(today).len(),
            pending_appointments: self
                .appointments
                .iter()
                .filter(|a| a.status == AppointmentStatus::Scheduled)
                .count(),
            completed_appointments_this_month: self
                .appointments
                .iter()
                .filter(|a| {
                    a.status == AppointmentStatus::Completed
                        && a.date >= month_start
                        && a.date <= today
                })
                .count(),
        }
    }
}
