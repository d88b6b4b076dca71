//! Alert counter and the Alertmanager webhook payload.
//!
//! The counter tracks how many alerts are believed to be firing. It counts
//! deltas, not alert identities: a batch delivered twice is counted twice.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use tracing::{info, warn};

/// Number of currently firing alerts, never below zero
#[derive(Debug, Default)]
pub struct AlertCounter {
    firing: AtomicU64,
}

impl AlertCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value
    pub fn get(&self) -> u64 {
        self.firing.load(Ordering::Acquire)
    }

    /// Count one more firing alert, returning the new value
    pub fn fire(&self) -> u64 {
        self.firing.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Count one resolved alert, returning the new value.
    ///
    /// Decrements with a compare-and-swap loop so concurrent resolves never
    /// take the counter below zero.
    pub fn resolve(&self) -> u64 {
        match self
            .firing
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(1))
            }) {
            Ok(prev) | Err(prev) => prev.saturating_sub(1),
        }
    }

    /// Apply every alert of a batch in payload order
    pub fn apply(&self, batch: &AlertBatch) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for alert in &batch.alerts {
            let summary = &alert.annotations.summary;
            match &alert.status {
                AlertStatus::Firing => {
                    info!("firing: {}", summary);
                    self.fire();
                    outcome.fired += 1;
                }
                AlertStatus::Resolved => {
                    info!("resolved: {}", summary);
                    self.resolve();
                    outcome.resolved += 1;
                }
                AlertStatus::Other(status) => {
                    warn!("Ignoring alert with status {:?}: {}", status, summary);
                    outcome.ignored += 1;
                }
            }
        }

        outcome.count = self.get();
        outcome
    }
}

/// What a batch did to the counter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub fired: usize,
    pub resolved: usize,
    pub ignored: usize,
    /// Counter value after the batch
    pub count: u64,
}

/// Alert status as sent by Alertmanager
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AlertStatus {
    Firing,
    Resolved,
    Other(String),
}

impl Default for AlertStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for AlertStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "firing" => Self::Firing,
            "resolved" => Self::Resolved,
            _ => Self::Other(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub summary: String,
    pub description: String,
}

/// One alert of a webhook batch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alert {
    pub status: AlertStatus,
    pub annotations: Annotations,
    pub labels: BTreeMap<String, String>,
    pub starts_at: String,
    pub ends_at: String,
    #[serde(rename = "generatorURL")]
    pub generator_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommonAnnotations {
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlertNameLabels {
    pub alertname: String,
}

/// Alertmanager webhook body. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertBatch {
    pub alerts: Vec<Alert>,
    pub status: String,
    pub receiver: String,
    pub version: String,
    pub group_key: String,
    #[serde(rename = "externalURL")]
    pub external_url: String,
    pub common_annotations: CommonAnnotations,
    pub common_labels: AlertNameLabels,
    pub group_labels: AlertNameLabels,
}
