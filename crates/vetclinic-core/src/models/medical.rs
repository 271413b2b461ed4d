//! Medical record models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::appointment::AppointmentType;

/// A vaccine administered during a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vaccine {
    /// Vaccine name (e.g., "Rabies", "DHPP")
    pub name: String,
    /// Date administered
    pub administered_date: NaiveDate,
    /// Date the next dose is due
    pub next_due_date: NaiveDate,
    pub notes: Option<String>,
}

/// An X-ray taken during a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct XRay {
    pub description: String,
    /// Reference to the stored image
    pub image_ref: String,
    pub date: NaiveDate,
    pub findings: String,
}

/// A clinical note for one visit of one pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    /// Unique ID
    pub id: String,
    /// Pet this record belongs to
    pub pet_id: String,
    /// Visit date
    pub visit_date: NaiveDate,
    /// Attending veterinarian
    pub veterinarian: String,
    /// Kind of visit
    pub appointment_type: AppointmentType,
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment: String,
    pub medications: Vec<String>,
    /// Weight at visit in kg
    pub weight: f64,
    /// Suggested follow-up date
    pub next_visit_date: Option<NaiveDate>,
    pub vaccines: Vec<Vaccine>,
    pub xrays: Vec<XRay>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    pub fn from_new(data: NewMedicalRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pet_id: data.pet_id,
            visit_date: data.visit_date,
            veterinarian: data.veterinarian,
            appointment_type: data.appointment_type,
            symptoms: data.symptoms,
            diagnosis: data.diagnosis,
            treatment: data.treatment,
            medications: data.medications,
            weight: data.weight,
            next_visit_date: data.next_visit_date,
            vaccines: data.vaccines,
            xrays: data.xrays,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data for filing a new medical record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedicalRecord {
    pub pet_id: String,
    pub visit_date: NaiveDate,
    pub veterinarian: String,
    pub appointment_type: AppointmentType,
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment: String,
    pub medications: Vec<String>,
    pub weight: f64,
    pub next_visit_date: Option<NaiveDate>,
    pub vaccines: Vec<Vaccine>,
    pub xrays: Vec<XRay>,
}

impl NewMedicalRecord {
    /// Minimal record for a visit; clinical fields start empty.
    pub fn new(
        pet_id: impl Into<String>,
        visit_date: NaiveDate,
        veterinarian: impl Into<String>,
        appointment_type: AppointmentType,
    ) -> Self {
        Self {
            pet_id: pet_id.into(),
            visit_date,
            veterinarian: veterinarian.into(),
            appointment_type,
            symptoms: String::new(),
            diagnosis: String::new(),
            treatment: String::new(),
            medications: Vec::new(),
            weight: 0.0,
            next_visit_date: None,
            vaccines: Vec::new(),
            xrays: Vec::new(),
        }
    }
}

/// Partial update for a medical record (corrections). The pet is fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecordPatch {
    pub visit_date: Option<NaiveDate>,
    pub veterinarian: Option<String>,
    pub appointment_type: Option<AppointmentType>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<Vec<String>>,
    pub weight: Option<f64>,
    /// `Some(None)` clears the follow-up date
    pub next_visit_date: Option<Option<NaiveDate>>,
    pub vaccines: Option<Vec<Vaccine>>,
    pub xrays: Option<Vec<XRay>>,
}

impl MedicalRecordPatch {
    pub fn apply(&self, record: &mut MedicalRecord, now: DateTime<Utc>) {
        if let Some(v) = self.visit_date {
            record.visit_date = v;
        }
        if let Some(v) = &self.veterinarian {
            record.veterinarian = v.clone();
        }
        if let Some(v) = self.appointment_type {
            record.appointment_type = v;
        }
        if let Some(v) = &self.symptoms {
            record.symptoms = v.clone();
        }
        if let Some(v) = &self.diagnosis {
            record.diagnosis = v.clone();
        }
        if let Some(v) = &self.treatment {
            record.treatment = v.clone();
        }
        if let Some(v) = &self.medications {
            record.medications = v.clone();
        }
        if let Some(v) = self.weight {
            record.weight = v;
        }
        if let Some(v) = self.next_visit_date {
            record.next_visit_date = v;
        }
        if let Some(v) = &self.vaccines {
            record.vaccines = v.clone();
        }
        if let Some(v) = &self.xrays {
            record.xrays = v.clone();
        }
        record.updated_at = now;
    }
}
