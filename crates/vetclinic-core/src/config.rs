//! Store configuration.
//!
//! Defaults suit an interactive front end. `from_env` lets a host process
//! override them through `VETCLINIC_*` environment variables.

use std::time::Duration;

use crate::models::TransitionPolicy;

/// Longest accepted upcoming-vaccination window (one hundred years).
pub const MAX_VACCINATION_WINDOW_DAYS: u32 = 36_500;

/// Configuration loading failures.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Tunables for a [`crate::ClinicStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Simulated persistence round-trip applied to every mutation
    pub latency: Duration,
    /// Which appointment status changes are accepted
    pub transition_policy: TransitionPolicy,
    /// Limit upcoming vaccinations to this many days ahead (None = no limit)
    pub upcoming_vaccination_window_days: Option<u32>,
    /// Minimum Jaro-Winkler similarity for fuzzy owner search hits
    pub search_threshold: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(300),
            transition_policy: TransitionPolicy::Permissive,
            upcoming_vaccination_window_days: None,
            search_threshold: 0.85,
        }
    }
}

impl StoreConfig {
    /// Defaults with no simulated latency.
    pub fn for_tests() -> Self {
        Self {
            latency: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("VETCLINIC_LATENCY_MS") {
            let ms = raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("VETCLINIC_LATENCY_MS".to_string(), e.to_string())
            })?;
            config.latency = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("VETCLINIC_TRANSITION_POLICY") {
            config.transition_policy = raw.parse().map_err(|e: String| {
                ConfigError::InvalidValue("VETCLINIC_TRANSITION_POLICY".to_string(), e)
            })?;
        }

        if let Some(raw) = lookup("VETCLINIC_VACCINATION_WINDOW_DAYS") {
            let days = raw.trim().parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue(
                    "VETCLINIC_VACCINATION_WINDOW_DAYS".to_string(),
                    e.to_string(),
                )
            })?;
            if days > MAX_VACCINATION_WINDOW_DAYS {
                return Err(ConfigError::InvalidValue(
                    "VETCLINIC_VACCINATION_WINDOW_DAYS".to_string(),
                    format!("{} exceeds {} days", days, MAX_VACCINATION_WINDOW_DAYS),
                ));
            }
            config.upcoming_vaccination_window_days = Some(days);
        }

        if let Some(raw) = lookup("VETCLINIC_SEARCH_THRESHOLD") {
            let threshold = raw.trim().parse::<f64>().map_err(|e| {
                ConfigError::InvalidValue("VETCLINIC_SEARCH_THRESHOLD".to_string(), e.to_string())
            })?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::InvalidValue(
                    "VETCLINIC_SEARCH_THRESHOLD".to_string(),
                    format!("'{}' is outside 0.0..=1.0", threshold),
                ));
            }
            config.search_threshold = threshold;
        }

        Ok(config)
    }
}
