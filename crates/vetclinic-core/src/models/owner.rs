//! Owner (client) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pet::{NewPet, Pet};

/// A client record. Owns its pets by composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    /// Unique ID, immutable after creation
    pub id: String,
    /// Full name
    pub full_name: String,
    /// National identity document number
    pub national_id: String,
    /// Postal address
    pub address: String,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
    /// Pets owned by this client, in registration order
    pub pets: Vec<Pet>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Owner {
    /// Build an owner from registration data. The initial pet, if any, is
    /// attached separately so it can receive the owner's ID.
    pub fn from_new(data: NewOwner, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: data.full_name,
            national_id: data.national_id,
            address: data.address,
            phone: data.phone,
            email: data.email,
            pets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find one of this owner's pets.
    pub fn pet(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == pet_id)
    }

    /// Find one of this owner's pets for mutation.
    pub fn pet_mut(&mut self, pet_id: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == pet_id)
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Registration data for a new owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewOwner {
    pub full_name: String,
    pub national_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Optional pet registered together with the owner
    pub initial_pet: Option<NewPet>,
}

impl NewOwner {
    /// Create registration data with only a name set.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// Attach an initial pet.
    pub fn with_pet(mut self, pet: NewPet) -> Self {
        self.initial_pet = Some(pet);
        self
    }

    /// Check required fields. Returns a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("owner full name must not be empty".into());
        }
        if let Some(pet) = &self.initial_pet {
            pet.validate()?;
        }
        Ok(())
    }
}

/// Partial update for an owner. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OwnerPatch {
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl OwnerPatch {
    /// Check the fields that are being set.
    pub fn validate(&self) -> Result<(), String> {
        match &self.full_name {
            Some(name) if name.trim().is_empty() => {
                Err("owner full name must not be empty".into())
            }
            _ => Ok(()),
        }
    }

    /// Merge into an owner. Does not touch timestamps.
    pub fn apply(&self, owner: &mut Owner) {
        if let Some(v) = &self.full_name {
            owner.full_name = v.clone();
        }
        if let Some(v) = &self.national_id {
            owner.national_id = v.clone();
        }
        if let Some(v) = &self.address {
            owner.address = v.clone();
        }
        if let Some(v) = &self.phone {
            owner.phone = v.clone();
        }
        if let Some(v) = &self.email {
            owner.email = v.clone();
        }
    }
}
