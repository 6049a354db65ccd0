//! Slots - atomic, idempotent single-object files.
//!
//! ## Example
//!
//! ```ignore
//! use stowage::{Persist, SlotStore};
//!
//! #[derive(Serialize, Deserialize, Default, Persist)]
//! struct RepoCache {
//!     pub repos: Vec<String>,
//! }
//!
//! let store = SlotStore::new();
//! let changed = store.store_with_backup(&cache, "tmp/cache/repos")?;
//! let cache: RepoCache = store.load("tmp/cache/repos", RepoCache::default(), true)?;
//! ```

mod store;

pub use store::SlotStore;
