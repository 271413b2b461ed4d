//! The authoritative entity collections.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{StoreError, StoreResult};
use crate::models::{Appointment, MedicalRecord, Owner, Pet};

/// All owners (with their pets), appointments and medical records.
///
/// Also the serialized snapshot format used by `ClinicStore::init` and
/// `ClinicStore::snapshot`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClinicState {
    pub owners: Vec<Owner>,
    pub appointments: Vec<Appointment>,
    pub medical_records: Vec<MedicalRecord>,
}

impl ClinicState {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Verify every cross-entity reference in the collections.
    ///
    /// Checks ID uniqueness per entity kind, that each pet's `owner_id` is the
    /// owner it is listed under, that appointments point at an existing pet of
    /// the stated owner, and that medical records point at an existing pet.
    /// Each pet's `medical_history` must list exactly that pet's records in
    /// filing order.
    pub fn check_integrity(&self) -> StoreResult<()> {
        let mut owner_ids = HashSet::new();
        let mut pet_ids = HashSet::new();

        for owner in &self.owners {
            if !owner_ids.insert(owner.id.as_str()) {
                return Err(StoreError::ReferentialIntegrity(format!(
                    "duplicate owner id {}",
                    owner.id
                )));
            }
            for pet in &owner.pets {
                if pet.owner_id != owner.id {
                    return Err(StoreError::ReferentialIntegrity(format!(
                        "pet {} is listed under owner {} but references owner {}",
                        pet.id, owner.id, pet.owner_id
                    )));
                }
                if !pet_ids.insert(pet.id.as_str()) {
                    return Err(StoreError::ReferentialIntegrity(format!(
                        "duplicate pet id {}",
                        pet.id
                    )));
                }
            }
        }

        let mut appointment_ids = HashSet::new();
        for appointment in &self.appointments {
            if !appointment_ids.insert(appointment.id.as_str()) {
                return Err(StoreError::ReferentialIntegrity(format!(
                    "duplicate appointment id {}",
                    appointment.id
                )));
            }
            self.check_pet_of_owner(&appointment.pet_id, &appointment.owner_id)?;
        }

        // record id -> pet id, and pet id -> record ids in filing order
        let mut record_pets: HashMap<&str, &str> = HashMap::new();
        let mut filed: HashMap<&str, Vec<&str>> = HashMap::new();
        for record in &self.medical_records {
            if record_pets.insert(record.id.as_str(), record.pet_id.as_str()).is_some() {
                return Err(StoreError::ReferentialIntegrity(format!(
                    "duplicate medical record id {}",
                    record.id
                )));
            }
            if !pet_ids.contains(record.pet_id.as_str()) {
                return Err(StoreError::ReferentialIntegrity(format!(
                    "medical record {} references missing pet {}",
                    record.id, record.pet_id
                )));
            }
            filed
                .entry(record.pet_id.as_str())
                .or_default()
                .push(record.id.as_str());
        }

        for pet in self.owners.iter().flat_map(|o| &o.pets) {
            for record_id in &pet.medical_history {
                match record_pets.get(record_id.as_str()) {
                    None => {
                        return Err(StoreError::ReferentialIntegrity(format!(
                            "pet {} lists missing medical record {}",
                            pet.id, record_id
                        )))
                    }
                    Some(filed_for) if *filed_for != pet.id => {
                        return Err(StoreError::ReferentialIntegrity(format!(
                            "pet {} lists medical record {} filed for pet {}",
                            pet.id, record_id, filed_for
                        )))
                    }
                    Some(_) => {}
                }
            }
            let expected = filed.get(pet.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            if !pet.medical_history.iter().map(String::as_str).eq(expected.iter().copied()) {
                return Err(StoreError::ReferentialIntegrity(format!(
                    "medical history of pet {} does not match its filed records",
                    pet.id
                )));
            }
        }

        Ok(())
    }

    /// Resolve a pet that must belong to `owner_id`.
    pub(crate) fn check_pet_of_owner(&self, pet_id: &str, owner_id: &str) -> StoreResult<(&Owner, &Pet)> {
        let owner = self.owner(owner_id).ok_or_else(|| {
            StoreError::ReferentialIntegrity(format!("owner {} does not exist", owner_id))
        })?;
        match owner.pet(pet_id) {
            Some(pet) => Ok((owner, pet)),
            None => match self.pet(pet_id) {
                Some(pet) => Err(StoreError::ReferentialIntegrity(format!(
                    "pet {} belongs to owner {}, not {}",
                    pet_id, pet.owner_id, owner_id
                ))),
                None => Err(StoreError::ReferentialIntegrity(format!(
                    "pet {} does not exist",
                    pet_id
                ))),
            },
        }
    }

    pub(crate) fn owner(&self, id: &str) -> Option<&Owner> {
        self.owners.iter().find(|o| o.id == id)
    }

    pub(crate) fn owner_mut(&mut self, id: &str) -> Option<&mut Owner> {
        self.owners.iter_mut().find(|o| o.id == id)
    }

    pub(crate) fn pet(&self, id: &str) -> Option<&Pet> {
        self.owners.iter().find_map(|o| o.pet(id))
    }

    pub(crate) fn pet_mut(&mut self, id: &str) -> Option<&mut Pet> {
        self.owners.iter_mut().find_map(|o| o.pet_mut(id))
    }

    /// Owner index and pet index of a pet.
    pub(crate) fn locate_pet(&self, id: &str) -> Option<(usize, usize)> {
        self.owners.iter().enumerate().find_map(|(oi, owner)| {
            owner
                .pets
                .iter()
                .position(|p| p.id == id)
                .map(|pi| (oi, pi))
        })
    }
}
