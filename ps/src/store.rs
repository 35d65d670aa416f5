//! Core ProgressStore implementation

use chrono::{SecondsFormat, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::storage::StorageBackend;

/// Unique identifier for a knowledge item
pub type NodeId = String;

/// Completion metadata for one knowledge item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Always true while the record exists
    pub completed: bool,
    /// ISO-8601 completion timestamp
    pub completed_at: String,
}

/// Outcome of a best-effort persistence operation
///
/// Load and save never raise; failures are reported here so callers and tests
/// can assert on them without inspecting logs. In-memory state stays
/// authoritative for the session either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Synced,
    Failed(String),
}

impl SyncStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }
}

/// The persisted blob - the single value stored under the storage key
///
/// Field names match the original browser-storage shape, so progress saved by
/// the web app imports unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedBlob {
    #[serde(default)]
    completed: Vec<NodeId>,
    #[serde(default, rename = "nodeProgress")]
    node_progress: BTreeMap<NodeId, ProgressRecord>,
}

/// Export snapshot - the persisted blob plus an export timestamp
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    completed: Vec<&'a NodeId>,
    #[serde(rename = "nodeProgress")]
    node_progress: &'a BTreeMap<NodeId, ProgressRecord>,
    #[serde(rename = "exportedAt")]
    exported_at: String,
}

/// Tracks which knowledge items a user has completed
///
/// Holds the completed-set and per-item records in memory, synchronized to a
/// single key of the injected storage backend after every mutation. The
/// completed-set and the record map never desynchronize: every mutation
/// updates both before persisting.
pub struct ProgressStore<S: StorageBackend> {
    completed: BTreeSet<NodeId>,
    records: BTreeMap<NodeId, ProgressRecord>,
    total_nodes: usize,
    storage: S,
    storage_key: String,
}

impl<S: StorageBackend> ProgressStore<S> {
    /// Create an empty store over the given backend
    ///
    /// State starts empty; call [`load`](Self::load) once at startup to pull
    /// any prior session's progress.
    pub fn new(storage: S) -> Self {
        Self {
            completed: BTreeSet::new(),
            records: BTreeMap::new(),
            total_nodes: crate::DEFAULT_TOTAL_NODES,
            storage,
            storage_key: crate::STORAGE_KEY.to_string(),
        }
    }

    /// Override the fixed denominator used for percentage reporting
    pub fn with_total_nodes(mut self, total_nodes: usize) -> Self {
        self.total_nodes = total_nodes;
        self
    }

    /// Override the storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Load persisted progress, replacing in-memory state
    ///
    /// Best-effort: an absent blob leaves the store empty and counts as
    /// success; a read or parse failure also leaves the store empty but is
    /// reported (and logged), never raised.
    pub fn load(&mut self) -> SyncStatus {
        match self.try_load() {
            Ok(loaded) => {
                debug!(count = self.completed.len(), loaded, "progress loaded");
                SyncStatus::Synced
            }
            Err(e) => {
                warn!(error = %e, "failed to load progress, starting empty");
                self.completed.clear();
                self.records.clear();
                SyncStatus::Failed(e.to_string())
            }
        }
    }

    fn try_load(&mut self) -> Result<bool> {
        let Some(raw) = self.storage.read(&self.storage_key)? else {
            return Ok(false);
        };
        let blob: PersistedBlob = serde_json::from_str(&raw).context("Failed to parse persisted progress")?;
        self.replace_from_blob(blob);
        Ok(true)
    }

    /// Persist current state under the storage key
    ///
    /// Best-effort: failures are reported and logged, never raised.
    pub fn save(&self) -> SyncStatus {
        let blob = PersistedBlob {
            completed: self.completed.iter().cloned().collect(),
            node_progress: self.records.clone(),
        };
        let result = serde_json::to_string(&blob)
            .context("Failed to serialize progress")
            .and_then(|json| self.storage.write(&self.storage_key, &json));

        match result {
            Ok(()) => SyncStatus::Synced,
            Err(e) => {
                warn!(error = %e, "failed to save progress");
                SyncStatus::Failed(e.to_string())
            }
        }
    }

    /// Mark an item completed and persist
    ///
    /// Idempotent: re-marking an already-completed item refreshes its
    /// timestamp. Returns the save outcome.
    pub fn mark_completed(&mut self, id: impl Into<NodeId>) -> SyncStatus {
        let id = id.into();
        debug!(%id, "mark completed");
        self.records.insert(
            id.clone(),
            ProgressRecord {
                completed: true,
                completed_at: now_iso(),
            },
        );
        self.completed.insert(id);
        self.save()
    }

    /// Remove an item's completion and persist
    ///
    /// Idempotent: a no-op beyond a redundant save when the id is absent.
    pub fn unmark_completed(&mut self, id: &str) -> SyncStatus {
        debug!(%id, "unmark completed");
        self.completed.remove(id);
        self.records.remove(id);
        self.save()
    }

    /// Whether an item has been completed
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    /// Number of completed items
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Completion percentage, rounded to the nearest integer
    ///
    /// Zero when the configured total is zero.
    pub fn progress_percent(&self) -> u32 {
        if self.total_nodes == 0 {
            return 0;
        }
        ((self.completed.len() as f64 / self.total_nodes as f64) * 100.0).round() as u32
    }

    /// The completion record for an item, if any
    pub fn record(&self, id: &str) -> Option<&ProgressRecord> {
        self.records.get(id)
    }

    /// Completed item ids, in sorted order
    pub fn completed_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.completed.iter()
    }

    /// Clear all progress and persist the empty state
    pub fn reset(&mut self) -> SyncStatus {
        debug!("reset progress");
        self.completed.clear();
        self.records.clear();
        self.save()
    }

    /// Render current state as an indented JSON snapshot
    ///
    /// A superset of the persisted blob: adds an `exportedAt` timestamp.
    pub fn export_snapshot(&self) -> String {
        let snapshot = Snapshot {
            completed: self.completed.iter().collect(),
            node_progress: &self.records,
            exported_at: now_iso(),
        };
        // These value types serialize infallibly
        serde_json::to_string_pretty(&snapshot).unwrap_or_default()
    }

    /// Replace state from an exported snapshot and persist
    ///
    /// Returns false and leaves current state untouched when `text` does not
    /// parse; there is no partial import.
    pub fn import_snapshot(&mut self, text: &str) -> bool {
        let blob: PersistedBlob = match serde_json::from_str(text) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to import progress snapshot");
                return false;
            }
        };
        self.replace_from_blob(blob);
        self.save();
        true
    }

    fn replace_from_blob(&mut self, blob: PersistedBlob) {
        self.completed = blob.completed.into_iter().collect();
        self.records = blob.node_progress;
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
