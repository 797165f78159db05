//! Snapshot persistence
//!
//! Three independent JSON documents live in the data directory:
//! - `fleetData.json`: the last synced [`FleetData`]
//! - `syncStatus.json`: the [`SyncStatus`] used by the sync gate
//! - `adminData.json`: the operator banner ([`AdminData`])
//!
//! Every write replaces the whole document. [`JsonFileStore`] writes to a
//! temporary sibling and renames it over the target so readers never see a
//! half-written file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{AdminData, FleetData, SyncStatus};
use crate::Result;

pub const FLEET_DATA_FILE: &str = "fleetData.json";
pub const SYNC_STATUS_FILE: &str = "syncStatus.json";
pub const ADMIN_DATA_FILE: &str = "adminData.json";

/// Storage for the snapshot, the sync status and the admin settings
pub trait SnapshotStore: Send + Sync {
    /// Last persisted snapshot, `None` if no sync has completed yet
    fn load_fleet(&self) -> Result<Option<FleetData>>;

    /// Replace the snapshot
    fn save_fleet(&self, data: &FleetData) -> Result<()>;

    /// Persisted sync status, `None` if never synced
    fn load_sync_status(&self) -> Result<Option<SyncStatus>>;

    /// Replace the sync status
    fn save_sync_status(&self, status: &SyncStatus) -> Result<()>;

    /// Admin settings, defaults if never saved
    fn load_admin(&self) -> Result<AdminData>;

    /// Replace the admin settings
    fn save_admin(&self, data: &AdminData) -> Result<()>;
}

// ============================================================================
// File-backed store
// ============================================================================

/// Stores each document as pretty-printed JSON in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fleet_path(&self) -> PathBuf {
        self.dir.join(FLEET_DATA_FILE)
    }

    pub fn sync_status_path(&self) -> PathBuf {
        self.dir.join(SYNC_STATUS_FILE)
    }

    pub fn admin_path(&self) -> PathBuf {
        self.dir.join(ADMIN_DATA_FILE)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        write_atomic(path, content.as_bytes())?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Write `bytes` to a temporary sibling of `path`, then rename over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, bytes)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

impl SnapshotStore for JsonFileStore {
    fn load_fleet(&self) -> Result<Option<FleetData>> {
        Self::read_json(&self.fleet_path())
    }

    fn save_fleet(&self, data: &FleetData) -> Result<()> {
        Self::write_json(&self.fleet_path(), data)
    }

    fn load_sync_status(&self) -> Result<Option<SyncStatus>> {
        // An unreadable status file means "never synced"
        match Self::read_json(&self.sync_status_path()) {
            Ok(status) => Ok(status),
            Err(e) => {
                warn!(
                    "Ignoring unreadable sync status {}: {}",
                    self.sync_status_path().display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save_sync_status(&self, status: &SyncStatus) -> Result<()> {
        Self::write_json(&self.sync_status_path(), status)
    }

    fn load_admin(&self) -> Result<AdminData> {
        Ok(Self::read_json(&self.admin_path())?.unwrap_or_default())
    }

    fn save_admin(&self, data: &AdminData) -> Result<()> {
        Self::write_json(&self.admin_path(), data)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    fleet: Option<FleetData>,
    sync_status: Option<SyncStatus>,
    admin: Option<AdminData>,
}

/// Volatile store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a snapshot
    pub fn with_fleet(data: FleetData) -> Self {
        let store = Self::new();
        store.lock().fleet = Some(data);
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn load_fleet(&self) -> Result<Option<FleetData>> {
        Ok(self.lock().fleet.clone())
    }

    fn save_fleet(&self, data: &FleetData) -> Result<()> {
        self.lock().fleet = Some(data.clone());
        Ok(())
    }

    fn load_sync_status(&self) -> Result<Option<SyncStatus>> {
        Ok(self.lock().sync_status)
    }

    fn save_sync_status(&self, status: &SyncStatus) -> Result<()> {
        self.lock().sync_status = Some(*status);
        Ok(())
    }

    fn load_admin(&self) -> Result<AdminData> {
        Ok(self.lock().admin.clone().unwrap_or_default())
    }

    fn save_admin(&self, data: &AdminData) -> Result<()> {
        self.lock().admin = Some(data.clone());
        Ok(())
    }
}
