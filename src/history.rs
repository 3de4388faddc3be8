// ⏰ Car History - one identity, many values over time
//
// The ledger hands back raw modifications. This module numbers them and
// gives each one a validity window:
//   Version 1 (valid t1 → t2): owner="Manufacturer", status=Active
//   Version 2 (valid t2 → now): owner="Rahul", status=Sold

use crate::car::Car;
use crate::ledger::KeyModification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CAR VERSION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarVersion {
    /// Starts at 1, monotonically increasing
    pub version: i64,

    /// Transaction that wrote this value
    pub tx_id: String,

    /// When this value became true (commit time)
    pub valid_from: DateTime<Utc>,

    /// When the next value replaced it (None = still current)
    pub valid_until: Option<DateTime<Utc>>,

    pub value: Car,
}

impl CarVersion {
    pub fn is_current(&self) -> bool {
        self.valid_until.is_none()
    }

    pub fn was_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.valid_from <= time && self.valid_until.map_or(true, |until| until > time)
    }
}

// ============================================================================
// CAR HISTORY
// ============================================================================

/// Timeline of a single chassis number (append-only, oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarHistory {
    pub chassis_number: String,
    pub versions: Vec<CarVersion>,
}

impl CarHistory {
    /// Build from the ledger's modifications (must be oldest first).
    pub fn from_modifications(
        chassis_number: &str,
        modifications: &[KeyModification],
    ) -> serde_json::Result<Self> {
        let mut versions = Vec::with_capacity(modifications.len());

        for (i, modification) in modifications.iter().enumerate() {
            versions.push(CarVersion {
                version: i as i64 + 1,
                tx_id: modification.tx_id.clone(),
                valid_from: modification.timestamp,
                valid_until: modifications.get(i + 1).map(|next| next.timestamp),
                value: Car::from_bytes(&modification.value)?,
            });
        }

        Ok(CarHistory {
            chassis_number: chassis_number.to_string(),
            versions,
        })
    }

    /// Rebuild from a `getCarHistory` payload.
    pub fn from_payload(chassis_number: &str, payload: &[u8]) -> serde_json::Result<Self> {
        Ok(CarHistory {
            chassis_number: chassis_number.to_string(),
            versions: serde_json::from_slice(payload)?,
        })
    }

    pub fn current(&self) -> Option<&CarVersion> {
        self.versions.last()
    }

    pub fn at_version(&self, version: i64) -> Option<&CarVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Value as it was at a specific time
    pub fn as_of(&self, time: DateTime<Utc>) -> Option<&CarVersion> {
        self.versions.iter().find(|v| v.was_valid_at(time))
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn has_history(&self) -> bool {
        self.versions.len() > 1
    }

    /// Owners in the order they held the car, consecutive repeats collapsed.
    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = self.versions.iter().map(|v| v.value.owner.as_str()).collect();
        owners.dedup();
        owners
    }
}

// ============================================================================
// TESTS
// ============================================================================
