//! Daily schedule sheet.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus, AppointmentType};
use crate::store::ClinicState;

/// One line of the day sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub appointment_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub pet_name: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub notes: String,
}

impl From<&Appointment> for ScheduleEntry {
    fn from(a: &Appointment) -> Self {
        Self {
            appointment_id: a.id.clone(),
            start_time: a.start_time,
            end_time: a.end_time(),
            appointment_type: a.appointment_type,
            status: a.status,
            pet_name: a.pet_name.clone(),
            owner_name: a.owner_name.clone(),
            owner_phone: a.owner_phone.clone(),
            notes: a.notes.clone(),
        }
    }
}

/// All appointments of one day, ordered by start time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleExport {
    pub date: NaiveDate,
    pub exported_at: DateTime<Utc>,
    pub entries: Vec<ScheduleEntry>,
    /// Booked minutes, excluding cancelled appointments
    pub booked_minutes: u32,
}

impl ScheduleExport {
    pub fn for_date(state: &ClinicState, date: NaiveDate, exported_at: DateTime<Utc>) -> Self {
        let day = state.schedule_for(date);
        let booked_minutes = day
            .iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .map(|a| a.duration_minutes)
            .sum();

        Self {
            date,
            exported_at,
            entries: day.into_iter().map(ScheduleEntry::from).collect(),
            booked_minutes,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("date,start,end,type,status,pet,owner,phone,notes,appointment_id\n");

        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                self.date,
                entry.start_time.format("%H:%M"),
                entry.end_time.format("%H:%M"),
                entry.appointment_type,
                entry.status,
                escape_csv(&entry.pet_name),
                escape_csv(&entry.owner_name),
                escape_csv(&entry.owner_phone),
                escape_csv(&entry.notes),
                escape_csv(&entry.appointment_id),
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
