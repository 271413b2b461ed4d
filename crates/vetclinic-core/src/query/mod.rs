//! Read-only views over a [`ClinicState`].
//!
//! Everything here is recomputed from the collections on each call; there
//! are no secondary indexes. Date-relative views take `today` explicitly.

mod search;
mod stats;
mod vaccinations;

pub use search::*;
pub use stats::*;
pub use vaccinations::*;

use chrono::NaiveDate;

use crate::models::{Appointment, MedicalRecord, Owner, Pet};
use crate::store::ClinicState;

impl ClinicState {
    pub fn owner_by_id(&self, id: &str) -> Option<&Owner> {
        self.owner(id)
    }

    pub fn pet_by_id(&self, id: &str) -> Option<&Pet> {
        self.pet(id)
    }

    pub fn appointment_by_id(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn medical_record_by_id(&self, id: &str) -> Option<&MedicalRecord> {
        self.medical_records.iter().find(|r| r.id == id)
    }

    /// All pets in owner order, then registration order.
    pub fn pets(&self) -> Vec<&Pet> {
        self.owners.iter().flat_map(|o| o.pets.iter()).collect()
    }

    pub fn appointments_by_owner(&self, owner_id: &str) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .collect()
    }

    pub fn appointments_by_pet(&self, pet_id: &str) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.pet_id == pet_id)
            .collect()
    }

    /// Appointments on the given calendar day, in booking order.
    pub fn appointments_by_date(&self, date: NaiveDate) -> Vec<&Appointment> {
        self.appointments.iter().filter(|a| a.date == date).collect()
    }

    /// The day's appointments ordered by start time.
    pub fn schedule_for(&self, date: NaiveDate) -> Vec<&Appointment> {
        let mut day = self.appointments_by_date(date);
        day.sort_by_key(|a| a.start_time);
        day
    }

    /// Scheduled or confirmed appointments dated today or later, ordered by
    /// date. Appointments on the same day keep booking order.
    pub fn upcoming_appointments(&self, today: NaiveDate) -> Vec<&Appointment> {
        let mut upcoming: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.date >= today && a.status.is_open())
            .collect();
        upcoming.sort_by_key(|a| a.date);
        upcoming
    }

    /// Upcoming appointments whose reminder has not been sent.
    pub fn pending_reminders(&self, today: NaiveDate) -> Vec<&Appointment> {
        self.upcoming_appointments(today)
            .into_iter()
            .filter(|a| !a.reminder_sent)
            .collect()
    }

    /// A pet's medical records in filing order.
    pub fn medical_history_by_pet(&self, pet_id: &str) -> Vec<&MedicalRecord> {
        self.medical_records
            .iter()
            .filter(|r| r.pet_id == pet_id)
            .collect()
    }
}
