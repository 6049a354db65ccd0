//! Store and backup settings.
//!
//! Paths are never part of the configuration: every operation receives its
//! slot or archive path explicitly. These structs only carry the knobs that
//! shape how files are named, encoded and rotated. Both deserialize with
//! defaults for missing keys so callers can embed them in their own config.

use serde::{Deserialize, Serialize};

use crate::codec::RemapTable;

pub const DEFAULT_TMP_SUFFIX: &str = "_tmp";
pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".zip";
pub const DEFAULT_COMPRESSION: u32 = 6;
pub const MAX_COMPRESSION: u32 = 9;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Appended to a slot path to name its transient file.
    pub tmp_suffix: String,
    /// Pretty-print envelopes. Only affects bytes on disk, not equality semantics.
    pub pretty: bool,
    /// Type relocations consulted by versioned loads.
    pub remap: RemapTable,
    pub backup: BackupConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            tmp_suffix: DEFAULT_TMP_SUFFIX.to_string(),
            pretty: false,
            remap: RemapTable::new(),
            backup: BackupConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_tmp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.tmp_suffix = suffix.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_remap(mut self, remap: RemapTable) -> Self {
        self.remap = remap;
        self
    }

    pub fn with_backup(mut self, backup: BackupConfig) -> Self {
        self.backup = backup;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Appended to a slot path to name its backup archive.
    pub archive_suffix: String,
    /// Appended to an archive path while the next snapshot is being built.
    pub tmp_suffix: String,
    /// Gzip level, 0 (store) to 9 (best). Higher values are treated as 9.
    pub compression: u32,
    /// Maximum number of numbered snapshots kept behind the current one.
    /// `None` keeps every snapshot.
    pub max_history: Option<usize>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        BackupConfig {
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
            tmp_suffix: DEFAULT_TMP_SUFFIX.to_string(),
            compression: DEFAULT_COMPRESSION,
            max_history: None,
        }
    }
}

impl BackupConfig {
    pub fn with_archive_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.archive_suffix = suffix.into();
        self
    }

    pub fn with_compression(mut self, level: u32) -> Self {
        self.compression = level.min(MAX_COMPRESSION);
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = Some(max_history);
        self
    }
}
