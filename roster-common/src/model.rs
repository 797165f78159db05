//! Fleet data model
//!
//! Field names serialize in camelCase so the snapshot files keep the
//! shape the dashboard reads (`makeModel`, `lastSync`, `publicMessage`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named organizational unit that vehicles are assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// `"1"` followed by the source code, e.g. code `42A` becomes `142A`
    pub id: String,
    /// `"<description> (<code>)"`
    pub name: String,
}

/// One vehicle row from the roster spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Row index/label from the first cell, verbatim
    pub id: String,
    pub plate: String,
    pub make_model: String,
    /// License plate reader fitted (source cell equals `"1"`)
    pub alpr: bool,
    /// Operating location code
    pub ol: String,
    pub authorized: String,
    pub purpose: String,
    pub notes: String,
}

/// Snapshot produced by one sync
///
/// Assignments are sorted by name; vehicles keep source row order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FleetData {
    pub assignments: Vec<Assignment>,
    pub vehicles: Vec<Vehicle>,
}

impl FleetData {
    /// Look up an assignment by id
    pub fn assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Look up a vehicle by id
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

/// Persisted sync-rate-limit state
///
/// `can_sync` is informational only; readers recompute it from `last_sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub last_sync: Option<DateTime<Utc>>,
    pub can_sync: bool,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            last_sync: None,
            can_sync: true,
        }
    }
}

/// Operator-settable broadcast banner
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminData {
    pub public_message: String,
    pub show_public_message: bool,
}

impl AdminData {
    /// Message to show on the public dashboard, if enabled and non-blank
    pub fn visible_message(&self) -> Option<&str> {
        if self.show_public_message && !self.public_message.trim().is_empty() {
            Some(self.public_message.as_str())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_serializes_camel_case() {
        let vehicle = Vehicle {
            id: "7".to_string(),
            plate: "142001".to_string(),
            make_model: "Ford Explorer".to_string(),
            alpr: true,
            ..Default::default()
        };

        let json = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(json["makeModel"], "Ford Explorer");
        assert_eq!(json["alpr"], true);
        assert!(json.get("make_model").is_none());
    }

    #[test]
    fn test_sync_status_reads_iso_timestamp() {
        let status: SyncStatus =
            serde_json::from_str(r#"{"lastSync":"2024-03-01T08:30:00.000Z","canSync":false}"#)
                .unwrap();
        assert_eq!(
            status.last_sync.unwrap().to_rfc3339(),
            "2024-03-01T08:30:00+00:00"
        );
        assert!(!status.can_sync);
    }

    #[test]
    fn test_sync_status_default_allows_sync() {
        let status = SyncStatus::default();
        assert!(status.last_sync.is_none());
        assert!(status.can_sync);
    }

    #[test]
    fn test_visible_message_requires_flag() {
        let mut admin = AdminData {
            public_message: "Lot B closed Friday".to_string(),
            show_public_message: false,
        };
        assert_eq!(admin.visible_message(), None);

        admin.show_public_message = true;
        assert_eq!(admin.visible_message(), Some("Lot B closed Friday"));

        admin.public_message = "   ".to_string();
        assert_eq!(admin.visible_message(), None);
    }
}
