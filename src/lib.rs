//! Durable single-object persistence for Plain Old Rust Structs.
//!
//! - [`SlotStore`] writes one object per file with a temp-file-then-rename
//!   protocol and skips writes whose bytes are unchanged.
//! - [`BackupRotator`] keeps a numbered chain of compressed snapshots that only
//!   grows when content changes.
//! - The codec tags payloads with their type identity and schema version,
//!   remaps relocated types and runs [`Persist::migrate`] on old data.
//!
//! Soft failures (missing slot, stale type, wrong shape) are recovered by the
//! `load*` operations; everything else surfaces as a [`PersistError`].

mod backup;
mod codec;
mod config;
mod error;
mod files;
mod slot;

pub use backup::{
    archive_entries, read_archive_entry, snapshot_path, BackupOutcome, BackupRotator,
};
pub use codec::{
    decode, decode_versioned, encode, Envelope, Fields, Persist, RemapTable, Versionable,
};
pub use config::{BackupConfig, StoreConfig};
pub use error::{PersistError, Severity};
pub use files::{diff_files, FileDiff};
pub use slot::SlotStore;

pub use stowage_macros::Persist;
