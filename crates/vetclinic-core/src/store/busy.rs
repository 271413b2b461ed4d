//! Busy flags and per-domain mutation lanes.
//!
//! Every mutation enters its domain's counter for its whole lifetime and
//! queues on the domain's lane before touching state. The counter is
//! released by [`BusyGuard`]'s `Drop`, so success, failure and a dropped
//! future all clear it.

use serde::Serialize;
use std::fmt;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::debug;

/// Entity groups that carry their own busy flag and mutation lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Owners and their pets
    Owners,
    Appointments,
    /// Medical records
    Medical,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::Owners => "owners",
            Domain::Appointments => "appointments",
            Domain::Medical => "medical",
        };
        f.write_str(s)
    }
}

/// In-flight mutation counts per domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadingState {
    owners: u32,
    appointments: u32,
    medical: u32,
}

impl LoadingState {
    pub fn is_loading_owners(&self) -> bool {
        self.owners > 0
    }

    pub fn is_loading_appointments(&self) -> bool {
        self.appointments > 0
    }

    pub fn is_loading_medical(&self) -> bool {
        self.medical > 0
    }

    /// True while any domain has a mutation in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading_owners() || self.is_loading_appointments() || self.is_loading_medical()
    }

    /// Number of mutations currently in flight for `domain`.
    pub fn in_flight(&self, domain: Domain) -> u32 {
        match domain {
            Domain::Owners => self.owners,
            Domain::Appointments => self.appointments,
            Domain::Medical => self.medical,
        }
    }

    fn counter_mut(&mut self, domain: Domain) -> &mut u32 {
        match domain {
            Domain::Owners => &mut self.owners,
            Domain::Appointments => &mut self.appointments,
            Domain::Medical => &mut self.medical,
        }
    }
}

/// Publishes [`LoadingState`] changes to subscribers.
pub(crate) struct BusyTracker {
    tx: watch::Sender<LoadingState>,
}

impl BusyTracker {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadingState::default());
        Self { tx }
    }

    pub(crate) fn current(&self) -> LoadingState {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.tx.subscribe()
    }

    /// Mark one mutation in flight for `domain` until the guard drops.
    pub(crate) fn enter(&self, domain: Domain) -> BusyGuard<'_> {
        self.tx.send_modify(|state| *state.counter_mut(domain) += 1);
        debug!(%domain, in_flight = self.current().in_flight(domain), "busy flag raised");
        BusyGuard {
            tracker: self,
            domain,
        }
    }
}

/// Releases one in-flight count on drop.
pub(crate) struct BusyGuard<'a> {
    tracker: &'a BusyTracker,
    domain: Domain,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let domain = self.domain;
        self.tracker.tx.send_modify(|state| {
            let counter = state.counter_mut(domain);
            *counter = counter.saturating_sub(1);
        });
        debug!(%domain, in_flight = self.tracker.current().in_flight(domain), "busy flag released");
    }
}

/// One FIFO lane per domain. tokio's mutex grants the lock in request order,
/// so same-domain mutations apply in the order they were issued.
pub(crate) struct MutationLanes {
    owners: Mutex<()>,
    appointments: Mutex<()>,
    medical: Mutex<()>,
}

impl MutationLanes {
    pub(crate) fn new() -> Self {
        Self {
            owners: Mutex::new(()),
            appointments: Mutex::new(()),
            medical: Mutex::new(()),
        }
    }

    pub(crate) async fn acquire(&self, domain: Domain) -> MutexGuard<'_, ()> {
        let lane = match domain {
            Domain::Owners => &self.owners,
            Domain::Appointments => &self.appointments,
            Domain::Medical => &self.medical,
        };
        lane.lock().await
    }
}
