//! Owner and pet mutations.

use std::collections::HashSet;
use tracing::{debug, info};

use super::{ClinicStore, Domain, StoreError, StoreResult};
use crate::models::{NewOwner, NewPet, Owner, OwnerPatch, Pet, PetPatch};

impl ClinicStore {
    /// Register a new owner, optionally with a first pet.
    ///
    /// Returns the new owner's ID.
    pub async fn add_owner(&self, data: NewOwner) -> StoreResult<String> {
        self.mutate(Domain::Owners, "add_owner", move |state, now| {
            data.validate().map_err(StoreError::InvalidInput)?;

            let initial_pet = data.initial_pet.clone();
            let mut owner = Owner::from_new(data, now);
            if let Some(pet) = initial_pet {
                owner.pets.push(Pet::from_new(pet, owner.id.clone(), now));
            }

            let id = owner.id.clone();
            info!(owner_id = %id, pets = owner.pets.len(), "owner created");
            state.owners.push(owner);
            Ok(id)
        })
        .await
    }

    /// Merge `patch` into an owner and refresh its `updated_at`.
    pub async fn update_owner(&self, id: &str, patch: OwnerPatch) -> StoreResult<()> {
        let id = id.to_string();
        self.mutate(Domain::Owners, "update_owner", move |state, now| {
            patch.validate().map_err(StoreError::InvalidInput)?;
            let owner = state
                .owner_mut(&id)
                .ok_or_else(|| StoreError::not_found("owner", &id))?;

            patch.apply(owner);
            owner.touch(now);
            info!(owner_id = %id, "owner updated");
            Ok(())
        })
        .await
    }

    /// Remove an owner together with its pets, every appointment booked for
    /// the owner or any of those pets, and the pets' medical records.
    pub async fn delete_owner(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.mutate(Domain::Owners, "delete_owner", move |state, _now| {
            let index = state
                .owners
                .iter()
                .position(|o| o.id == id)
                .ok_or_else(|| StoreError::not_found("owner", &id))?;

            let owner = state.owners.remove(index);
            let pet_ids: HashSet<&str> = owner.pets.iter().map(|p| p.id.as_str()).collect();

            let appointments_before = state.appointments.len();
            state
                .appointments
                .retain(|a| a.owner_id != id && !pet_ids.contains(a.pet_id.as_str()));
            let records_before = state.medical_records.len();
            state
                .medical_records
                .retain(|r| !pet_ids.contains(r.pet_id.as_str()));

            debug!(
                owner_id = %id,
                pets = pet_ids.len(),
                appointments = appointments_before - state.appointments.len(),
                medical_records = records_before - state.medical_records.len(),
                "owner cascade removed"
            );
            info!(owner_id = %id, "owner deleted");
            Ok(())
        })
        .await
    }

    /// Add a pet to an existing owner. Returns the new pet's ID.
    pub async fn add_pet(&self, owner_id: &str, data: NewPet) -> StoreResult<String> {
        let owner_id = owner_id.to_string();
        self.mutate(Domain::Owners, "add_pet", move |state, now| {
            data.validate().map_err(StoreError::InvalidInput)?;
            let owner = state
                .owner_mut(&owner_id)
                .ok_or_else(|| StoreError::not_found("owner", &owner_id))?;

            let pet = Pet::from_new(data, owner.id.clone(), now);
            let id = pet.id.clone();
            owner.pets.push(pet);
            owner.touch(now);
            info!(owner_id = %owner_id, pet_id = %id, "pet added");
            Ok(id)
        })
        .await
    }

    /// Merge `patch` into a pet; its owner's `updated_at` is refreshed too.
    pub async fn update_pet(&self, pet_id: &str, patch: PetPatch) -> StoreResult<()> {
        let pet_id = pet_id.to_string();
        self.mutate(Domain::Owners, "update_pet", move |state, now| {
            patch.validate().map_err(StoreError::InvalidInput)?;
            let (oi, pi) = state
                .locate_pet(&pet_id)
                .ok_or_else(|| StoreError::not_found("pet", &pet_id))?;

            let owner = &mut state.owners[oi];
            patch.apply(&mut owner.pets[pi], now);
            owner.touch(now);
            info!(pet_id = %pet_id, "pet updated");
            Ok(())
        })
        .await
    }

    /// Remove a pet from its owner along with its appointments and medical
    /// records.
    pub async fn delete_pet(&self, pet_id: &str) -> StoreResult<()> {
        let pet_id = pet_id.to_string();
        self.mutate(Domain::Owners, "delete_pet", move |state, now| {
            let (oi, pi) = state
                .locate_pet(&pet_id)
                .ok_or_else(|| StoreError::not_found("pet", &pet_id))?;

            let owner = &mut state.owners[oi];
            owner.pets.remove(pi);
            owner.touch(now);

            let appointments_before = state.appointments.len();
            state.appointments.retain(|a| a.pet_id != pet_id);
            let records_before = state.medical_records.len();
            state.medical_records.retain(|r| r.pet_id != pet_id);

            debug!(
                pet_id = %pet_id,
                appointments = appointments_before - state.appointments.len(),
                medical_records = records_before - state.medical_records.len(),
                "pet cascade removed"
            );
            info!(pet_id = %pet_id, "pet deleted");
            Ok(())
        })
        .await
    }
}
