//! Vet Clinic Core Library
//!
//! In-memory data store for a veterinary clinic: owners, their pets,
//! appointments and medical records, plus the operational views derived
//! from them (today's schedule, upcoming appointments and vaccinations,
//! pending reminders, dashboard statistics).
//!
//! # Architecture
//!
//! ```text
//!   Consumer (UI, API facade)
//!        │ async mutations              │ sync queries
//!        ▼                              ▼
//!   ┌─────────────────────────┐   ┌───────────────────────┐
//!   │ busy flag (per domain)  │   │ query: lookups,       │
//!   │ domain lane (FIFO)      │   │ filters, stats,       │
//!   │ simulated latency       │   │ vaccinations, search  │
//!   └────────────┬────────────┘   └───────────▲───────────┘
//!                ▼                            │ read lock
//!   ┌─────────────────────────┐               │
//!   │ validate → apply        │──write lock──▶ ClinicState
//!   │ (cascades, timestamps)  │
//!   └─────────────────────────┘
//! ```
//!
//! # Integrity rules
//!
//! - A pet always lives in the pet list of the owner its `owner_id` names.
//! - Deleting an owner removes its pets and every appointment and medical
//!   record tied to them. Deleting a pet removes its appointments and records.
//! - Appointments and records can only be created for existing pets; an
//!   appointment's pet must belong to its owner.
//! - A rejected mutation changes nothing.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Owner, Pet, Appointment, MedicalRecord)
//! - [`store`]: The store, its mutations and busy flags
//! - [`query`]: Read-only views and aggregates
//! - [`export`]: Daily schedule export
//! - [`config`], [`clock`], [`logging`]: Ambient setup

pub mod clock;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StoreConfig, MAX_VACCINATION_WINDOW_DAYS};
pub use export::{ScheduleEntry, ScheduleExport};
pub use models::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentType, MedicalRecord,
    MedicalRecordPatch, NewAppointment, NewMedicalRecord, NewOwner, NewPet, Owner, OwnerPatch,
    Pet, PetPatch, Species, TransitionPolicy, Vaccine, XRay,
};
pub use query::{ClinicStats, OwnerMatch, UpcomingVaccination};
pub use store::{ClinicState, ClinicStore, Domain, LoadingState, StoreError, StoreResult};
