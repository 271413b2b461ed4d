//! Pet models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Reptile,
    Other,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Bird => "bird",
            Species::Rabbit => "rabbit",
            Species::Reptile => "reptile",
            Species::Other => "other",
        };
        f.write_str(s)
    }
}

/// A pet. Always lives inside its owner's pet list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// Unique ID
    pub id: String,
    /// Pet name
    pub name: String,
    /// Species
    pub species: Species,
    /// Breed (free text)
    pub breed: String,
    /// Age in years
    pub age: u32,
    /// Weight in kg
    pub weight: f64,
    /// Known allergies
    pub allergies: Vec<String>,
    /// Back-reference to the owning client
    pub owner_id: String,
    /// IDs of medical records filed for this pet, oldest first
    pub medical_history: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    /// Build a pet for the given owner.
    pub fn from_new(data: NewPet, owner_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: data.name,
            species: data.species,
            breed: data.breed,
            age: data.age,
            weight: data.weight,
            allergies: data.allergies,
            owner_id,
            medical_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration data for a new pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub age: u32,
    pub weight: f64,
    pub allergies: Vec<String>,
}

impl NewPet {
    /// Create pet data with name and species; other fields empty.
    pub fn new(name: impl Into<String>, species: Species) -> Self {
        Self {
            name: name.into(),
            species,
            breed: String::new(),
            age: 0,
            weight: 0.0,
            allergies: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("pet name must not be empty".into());
        }
        validate_weight(self.weight)
    }
}

/// Partial update for a pet. Ownership cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub allergies: Option<Vec<String>>,
}

impl PetPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("pet name must not be empty".into());
            }
        }
        match self.weight {
            Some(w) => validate_weight(w),
            None => Ok(()),
        }
    }

    /// Merge into a pet and refresh its timestamp.
    pub fn apply(&self, pet: &mut Pet, now: DateTime<Utc>) {
        if let Some(v) = &self.name {
            pet.name = v.clone();
        }
        if let Some(v) = self.species {
            pet.species = v;
        }
        if let Some(v) = &self.breed {
            pet.breed = v.clone();
        }
        if let Some(v) = self.age {
            pet.age = v;
        }
        if let Some(v) = self.weight {
            pet.weight = v;
        }
        if let Some(v) = &self.allergies {
            pet.allergies = v.clone();
        }
        pet.updated_at = now;
    }
}

fn validate_weight(weight: f64) -> Result<(), String> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(format!("pet weight must be a non-negative number, got {}", weight))
    }
}
