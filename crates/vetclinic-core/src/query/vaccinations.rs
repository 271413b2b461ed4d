//! Upcoming vaccinations derived from medical records.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Vaccine;
use crate::store::ClinicState;

/// A vaccine dose coming due.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpcomingVaccination {
    pub pet_id: String,
    pub pet_name: String,
    pub owner_id: String,
    pub owner_name: String,
    pub vaccine_name: String,
    /// When the last dose was given
    pub last_administered: NaiveDate,
    pub due_date: NaiveDate,
    /// Medical record holding the last dose
    pub record_id: String,
}

impl ClinicState {
    /// Vaccines whose next dose is due after `today`, soonest first.
    ///
    /// Only the most recent administration of each vaccine per pet counts, so
    /// a booster supersedes the due date of the dose before it. With
    /// `window_days` set, doses due later than `today + window_days` are left
    /// out. A window reaching past the last representable date is no limit.
    pub fn upcoming_vaccinations(
        &self,
        today: NaiveDate,
        window_days: Option<u32>,
    ) -> Vec<UpcomingVaccination> {
        let horizon =
            window_days.and_then(|days| today.checked_add_days(Days::new(u64::from(days))));

        // (pet_id, lowercase vaccine name) -> latest dose
        let mut latest: HashMap<(&str, String), (&str, &Vaccine)> = HashMap::new();
        for record in &self.medical_records {
            for vaccine in &record.vaccines {
                let key = (record.pet_id.as_str(), vaccine.name.to_lowercase());
                let newer = latest
                    .get(&key)
                    .map_or(true, |(_, seen)| vaccine.administered_date >= seen.administered_date);
                if newer {
                    latest.insert(key, (record.id.as_str(), vaccine));
                }
            }
        }

        let mut upcoming: Vec<UpcomingVaccination> = latest
            .into_iter()
            .filter(|(_, (_, v))| v.next_due_date > today)
            .filter(|(_, (_, v))| horizon.map_or(true, |h| v.next_due_date <= h))
            .filter_map(|((pet_id, _), (record_id, vaccine))| {
                let pet = self.pet(pet_id)?;
                let owner = self.owner(&pet.owner_id)?;
                Some(UpcomingVaccination {
                    pet_id: pet.id.clone(),
                    pet_name: pet.name.clone(),
                    owner_id: owner.id.clone(),
                    owner_name: owner.full_name.clone(),
                    vaccine_name: vaccine.name.clone(),
                    last_administered: vaccine.administered_date,
                    due_date: vaccine.next_due_date,
                    record_id: record_id.to_string(),
                })
            })
            .collect();

        // HashMap order is arbitrary; break due-date ties by pet, vaccine, pet id
        upcoming.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.pet_name.cmp(&b.pet_name))
                .then_with(|| a.vaccine_name.cmp(&b.vaccine_name))
                .then_with(|| a.pet_id.cmp(&b.pet_id))
        });
        upcoming
    }
}
