//! Sync cooldown gate
//!
//! A non-privileged sync is allowed when no sync has ever completed or when
//! strictly more than [`SYNC_COOLDOWN_HOURS`] have passed since the last one.
//! Operator-forced syncs bypass the check but are still recorded.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::model::SyncStatus;
use crate::store::SnapshotStore;
use crate::time::Clock;
use crate::{Error, Result};

/// Minimum interval between non-privileged syncs
pub const SYNC_COOLDOWN_HOURS: i64 = 24;

pub fn cooldown() -> Duration {
    Duration::hours(SYNC_COOLDOWN_HOURS)
}

/// Whether the cooldown has elapsed at `now` for a given last-sync time
pub fn cooldown_elapsed(last_sync: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_sync {
        None => true,
        Some(last) => now - last > cooldown(),
    }
}

/// Cooldown check backed by the persisted sync status
#[derive(Clone)]
pub struct SyncGate {
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
}

impl SyncGate {
    pub fn new(store: Arc<dyn SnapshotStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current status with `can_sync` recomputed from `last_sync`
    pub fn status(&self) -> Result<SyncStatus> {
        let last_sync = self
            .store
            .load_sync_status()?
            .and_then(|status| status.last_sync);

        Ok(SyncStatus {
            last_sync,
            can_sync: cooldown_elapsed(last_sync, self.clock.now()),
        })
    }

    /// Whether a sync may start now
    pub fn can_sync_now(&self, forced_by_operator: bool) -> Result<bool> {
        if forced_by_operator {
            return Ok(true);
        }
        Ok(self.status()?.can_sync)
    }

    /// Like [`can_sync_now`](Self::can_sync_now) but fails with
    /// [`Error::RateLimited`] when the gate is closed
    pub fn check(&self, forced_by_operator: bool) -> Result<()> {
        if forced_by_operator {
            return Ok(());
        }

        let status = self.status()?;
        match status.last_sync {
            Some(last_sync) if !status.can_sync => Err(Error::RateLimited {
                last_sync,
                next_allowed: last_sync + cooldown(),
            }),
            _ => Ok(()),
        }
    }

    /// Record a completed sync and close the gate
    pub fn record_sync(&self, at: DateTime<Utc>) -> Result<()> {
        self.store.save_sync_status(&SyncStatus {
            last_sync: Some(at),
            can_sync: false,
        })
    }
}
