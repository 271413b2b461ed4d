//! Medical record mutations.

use tracing::info;

use super::{ClinicStore, Domain, StoreError, StoreResult};
use crate::models::{MedicalRecord, MedicalRecordPatch, NewMedicalRecord};

impl ClinicStore {
    /// File a medical record for an existing pet and append it to the pet's
    /// history. Returns the new record's ID.
    pub async fn add_medical_record(&self, data: NewMedicalRecord) -> StoreResult<String> {
        self.mutate(Domain::Medical, "add_medical_record", move |state, now| {
            validate_weight(data.weight)?;
            let pet = state.pet_mut(&data.pet_id).ok_or_else(|| {
                StoreError::ReferentialIntegrity(format!("pet {} does not exist", data.pet_id))
            })?;

            let record = MedicalRecord::from_new(data, now);
            pet.medical_history.push(record.id.clone());

            let id = record.id.clone();
            info!(record_id = %id, pet_id = %record.pet_id, "medical record filed");
            state.medical_records.push(record);
            Ok(id)
        })
        .await
    }

    /// Correct a medical record.
    pub async fn update_medical_record(&self, id: &str, patch: MedicalRecordPatch) -> StoreResult<()> {
        let id = id.to_string();
        self.mutate(Domain::Medical, "update_medical_record", move |state, now| {
            if let Some(weight) = patch.weight {
                validate_weight(weight)?;
            }
            let record = state
                .medical_records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::not_found("medical record", &id))?;

            patch.apply(record, now);
            info!(record_id = %id, "medical record updated");
            Ok(())
        })
        .await
    }
}

fn validate_weight(weight: f64) -> StoreResult<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidInput(format!(
            "weight at visit must be a non-negative number, got {}",
            weight
        )))
    }
}
