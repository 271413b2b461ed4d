//! The clinic data store.
//!
//! [`ClinicStore`] owns the entity collections and is their only writer.
//! Mutations are `async`: each one raises its domain's busy flag, waits its
//! turn on the domain lane, sleeps for the configured latency, then validates
//! and applies its change under a single write lock. A rejected mutation
//! leaves the collections untouched.
//!
//! Queries are synchronous, take a read lock and return owned copies.

mod appointments;
mod busy;
mod medical;
mod owners;
mod state;

pub use busy::{Domain, LoadingState};
pub use state::ClinicState;

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::export::ScheduleExport;
use crate::models::{Appointment, AppointmentStatus, MedicalRecord, Owner, Pet};
use crate::query::{ClinicStats, OwnerMatch, UpcomingVaccination};
use busy::{BusyTracker, MutationLanes};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStateTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(e: PoisonError<T>) -> Self {
        StoreError::LockPoisoned(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory clinic store. Construct one per application and share it by
/// reference (or `Arc`).
pub struct ClinicStore {
    state: RwLock<ClinicState>,
    busy: BusyTracker,
    lanes: MutationLanes,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl ClinicStore {
    /// Create an empty store using the system clock.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an empty store with an explicit time source.
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(ClinicState::default()),
            busy: BusyTracker::new(),
            lanes: MutationLanes::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Today's local date according to the store clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replace all collections with `state` after checking its integrity.
    /// On failure the current contents are kept.
    pub fn init(&self, state: ClinicState) -> StoreResult<()> {
        state.check_integrity()?;
        let mut current = self.state.write()?;
        info!(
            owners = state.owners.len(),
            appointments = state.appointments.len(),
            medical_records = state.medical_records.len(),
            "store initialized"
        );
        *current = state;
        Ok(())
    }

    /// Load a JSON snapshot produced by [`ClinicState::to_json`].
    pub fn init_from_json(&self, json: &str) -> StoreResult<()> {
        self.init(ClinicState::from_json(json)?)
    }

    /// Drop all data.
    pub fn reset(&self) {
        let mut current = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *current = ClinicState::default();
        info!("store reset");
    }

    /// A copy of all collections.
    pub fn snapshot(&self) -> ClinicState {
        self.read().clone()
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn owners(&self) -> Vec<Owner> {
        self.read().owners.clone()
    }

    /// All pets, flattened from their owners in owner order.
    pub fn pets(&self) -> Vec<Pet> {
        self.read().pets().into_iter().cloned().collect()
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.read().appointments.clone()
    }

    pub fn medical_records(&self) -> Vec<MedicalRecord> {
        self.read().medical_records.clone()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.busy.current()
    }

    pub fn is_loading_owners(&self) -> bool {
        self.busy.current().is_loading_owners()
    }

    pub fn is_loading_appointments(&self) -> bool {
        self.busy.current().is_loading_appointments()
    }

    pub fn is_loading_medical(&self) -> bool {
        self.busy.current().is_loading_medical()
    }

    pub fn is_loading(&self) -> bool {
        self.busy.current().is_loading()
    }

    /// Receive every busy-flag change.
    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingState> {
        self.busy.subscribe()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_owner_by_id(&self, id: &str) -> Option<Owner> {
        self.read().owner_by_id(id).cloned()
    }

    pub fn get_pet_by_id(&self, id: &str) -> Option<Pet> {
        self.read().pet_by_id(id).cloned()
    }

    pub fn get_appointment_by_id(&self, id: &str) -> Option<Appointment> {
        self.read().appointment_by_id(id).cloned()
    }

    pub fn get_medical_record_by_id(&self, id: &str) -> Option<MedicalRecord> {
        self.read().medical_record_by_id(id).cloned()
    }

    pub fn get_appointments_by_owner(&self, owner_id: &str) -> Vec<Appointment> {
        cloned(self.read().appointments_by_owner(owner_id))
    }

    pub fn get_appointments_by_pet(&self, pet_id: &str) -> Vec<Appointment> {
        cloned(self.read().appointments_by_pet(pet_id))
    }

    pub fn get_appointments_by_date(&self, date: NaiveDate) -> Vec<Appointment> {
        cloned(self.read().appointments_by_date(date))
    }

    /// Today's appointments ordered by start time.
    pub fn get_today_schedule(&self) -> Vec<Appointment> {
        cloned(self.read().schedule_for(self.today()))
    }

    pub fn get_upcoming_appointments(&self) -> Vec<Appointment> {
        cloned(self.read().upcoming_appointments(self.today()))
    }

    /// Upcoming appointments whose owner has not been reminded yet.
    pub fn get_pending_reminders(&self) -> Vec<Appointment> {
        cloned(self.read().pending_reminders(self.today()))
    }

    pub fn get_medical_history_by_pet(&self, pet_id: &str) -> Vec<MedicalRecord> {
        cloned(self.read().medical_history_by_pet(pet_id))
    }

    pub fn get_upcoming_vaccinations(&self) -> Vec<UpcomingVaccination> {
        self.read()
            .upcoming_vaccinations(self.today(), self.config.upcoming_vaccination_window_days)
    }

    pub fn get_stats(&self) -> ClinicStats {
        self.read().stats(self.today())
    }

    pub fn search_owners(&self, query: &str, limit: usize) -> Vec<OwnerMatch> {
        self.read()
            .search_owners(query, limit, self.config.search_threshold)
    }

    /// The day sheet for `date`.
    pub fn export_schedule(&self, date: NaiveDate) -> ScheduleExport {
        ScheduleExport::for_date(&self.read(), date, self.clock.now())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Queries never fail, so a poisoned lock is read through.
    fn read(&self) -> RwLockReadGuard<'_, ClinicState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one mutation through the busy flag, the domain lane and the
    /// simulated latency, then apply `op` under the write lock.
    async fn mutate<T, F>(&self, domain: Domain, action: &'static str, op: F) -> StoreResult<T>
    where
        F: FnOnce(&mut ClinicState, DateTime<Utc>) -> StoreResult<T> + Send,
        T: Send,
    {
        let _busy = self.busy.enter(domain);
        let _lane = self.lanes.acquire(domain).await;

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let now = self.clock.now();
        let result = match self.state.write() {
            Ok(mut state) => op(&mut state, now),
            Err(poisoned) => Err(poisoned.into()),
        };

        if let Err(e) = &result {
            warn!(%domain, action, error = %e, "mutation rejected");
        }
        result
    }
}

fn cloned<T: Clone>(items: Vec<&T>) -> Vec<T> {
    items.into_iter().cloned().collect()
}
