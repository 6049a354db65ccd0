//! Backup rotation - compressed, numbered snapshot chains.
//!
//! ```text
//! cache/wallet.zip      newest snapshot
//! cache/wallet.zip.1    previous snapshot
//! cache/wallet.zip.2    older still
//! ```

mod archive;
mod rotator;

pub use archive::{archive_entries, read_archive_entry};
pub use rotator::{snapshot_path, BackupOutcome, BackupRotator};
