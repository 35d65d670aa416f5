//! ProgressStore - lesson-completion tracking for mathtutor
//!
//! Holds the set of completed knowledge items and their completion records in
//! memory, synchronized to a single key of an injected key-value storage
//! backend after every mutation. Persistence is best-effort: load and save
//! report failures instead of raising them, and the in-memory state stays
//! authoritative for the session.
//!
//! # Example
//!
//! ```ignore
//! use progressstore::{FileStorage, ProgressStore};
//!
//! let storage = FileStorage::open(".progress")?;
//! let mut store = ProgressStore::new(storage);
//! store.load();
//! store.mark_completed("linear-equations");
//! println!("{}%", store.progress_percent());
//! ```

pub mod cli;
pub mod config;
pub mod storage;
mod store;

pub use storage::{FileStorage, StorageBackend};
pub use store::{NodeId, ProgressRecord, ProgressStore, SyncStatus};

/// Default total item count used as the percentage denominator
pub const DEFAULT_TOTAL_NODES: usize = 86;

/// The single storage key the progress blob lives under
pub const STORAGE_KEY: &str = "math-progress";
