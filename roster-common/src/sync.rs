//! Sync orchestration
//!
//! One sync is a sequential pipeline:
//! 1. Consult the [`SyncGate`] (skipped for operator-forced syncs)
//! 2. Validate the sheet configuration
//! 3. Fetch raw rows from the [`RowSource`]
//! 4. Classify every row, collecting assignments and vehicles
//! 5. Sort assignments by name
//! 6. Persist the snapshot
//! 7. Record the sync time
//!
//! Nothing is written until classification has finished, so a failed fetch
//! leaves both the snapshot and the sync status untouched.

use std::sync::Arc;

use async_trait::async_trait;
use feruca::{Collator, Tailoring};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::classifier::{classify, Classified, SkipReason};
use crate::config::{SheetCoordinates, SheetsConfig};
use crate::gate::SyncGate;
use crate::model::{Assignment, FleetData};
use crate::store::SnapshotStore;
use crate::time::Clock;
use crate::{Error, Result};

/// Upstream provider of raw spreadsheet rows
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch every row in the configured range
    ///
    /// `Ok(None)` means the source answered but carried no row data.
    async fn fetch_rows(&self, coords: &SheetCoordinates) -> Result<Option<Vec<Vec<String>>>>;
}

/// Counts from one classification pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows: usize,
    pub assignments: usize,
    pub vehicles: usize,
    pub empty_rows: usize,
    pub malformed_headers: usize,
}

/// Classify rows into a snapshot, sorting assignments by name
pub fn build_fleet(rows: &[Vec<String>]) -> (FleetData, SyncReport) {
    let mut fleet = FleetData::default();
    let mut report = SyncReport {
        rows: rows.len(),
        ..Default::default()
    };

    for row in rows {
        match classify(row) {
            Classified::Assignment(assignment) => fleet.assignments.push(assignment),
            Classified::Vehicle(vehicle) => fleet.vehicles.push(vehicle),
            Classified::Skip(SkipReason::Empty) => report.empty_rows += 1,
            Classified::Skip(SkipReason::MalformedHeader) => {
                debug!("Skipping malformed assignment header: {:?}", row.first());
                report.malformed_headers += 1;
            }
        }
    }

    sort_assignments(&mut fleet.assignments);
    report.assignments = fleet.assignments.len();
    report.vehicles = fleet.vehicles.len();
    (fleet, report)
}

/// Stable sort by name using the CLDR root collation
///
/// Punctuation is non-ignorable and lowercase sorts before uppercase at
/// the tertiary level, matching the browser's default `localeCompare`.
pub fn sort_assignments(assignments: &mut [Assignment]) {
    let mut collator = Collator::new(Tailoring::default(), false, true);
    assignments.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));
}

/// Drives a sync from the row source into the snapshot store
pub struct SyncService {
    source: Arc<dyn RowSource>,
    store: Arc<dyn SnapshotStore>,
    gate: SyncGate,
    clock: Arc<dyn Clock>,
    sheets: SheetsConfig,
    /// Serialises concurrent syncs (single writer)
    running: Mutex<()>,
}

impl SyncService {
    pub fn new(
        source: Arc<dyn RowSource>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        sheets: SheetsConfig,
    ) -> Self {
        let gate = SyncGate::new(store.clone(), clock.clone());
        Self {
            source,
            store,
            gate,
            clock,
            sheets,
            running: Mutex::new(()),
        }
    }

    pub fn gate(&self) -> &SyncGate {
        &self.gate
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Run a sync; `forced_by_operator` bypasses the cooldown
    pub async fn sync(&self, forced_by_operator: bool) -> Result<FleetData> {
        let _guard = self.running.lock().await;

        let result = self.run(forced_by_operator).await;
        if let Err(ref e) = result {
            match e {
                Error::RateLimited { next_allowed, .. } => {
                    info!("Sync refused, cooldown active until {}", next_allowed)
                }
                _ => error!("Sync failed: {}", e),
            }
        }
        result
    }

    async fn run(&self, forced_by_operator: bool) -> Result<FleetData> {
        self.gate.check(forced_by_operator)?;
        let coords = self.sheets.validate()?;

        let rows = self
            .source
            .fetch_rows(&coords)
            .await?
            .ok_or(Error::SourceUnavailable)?;

        let (fleet, report) = build_fleet(&rows);

        self.store.save_fleet(&fleet)?;
        self.gate.record_sync(self.clock.now())?;

        info!(
            rows = report.rows,
            assignments = report.assignments,
            vehicles = report.vehicles,
            empty_rows = report.empty_rows,
            malformed_headers = report.malformed_headers,
            forced = forced_by_operator,
            "Fleet data synced"
        );
        Ok(fleet)
    }

    /// Persisted snapshot, syncing first if none exists or it is unreadable
    pub async fn load_or_sync(&self) -> Result<FleetData> {
        match self.store.load_fleet() {
            Ok(Some(fleet)) => Ok(fleet),
            Ok(None) => {
                info!("No fleet snapshot found, running initial sync");
                self.sync(false).await
            }
            Err(e) => {
                warn!("Fleet snapshot unreadable ({}), running sync", e);
                self.sync(false).await
            }
        }
    }
}
