use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::{BackupOutcome, BackupRotator};
use crate::codec::{decode, decode_versioned, encode, Persist, Versionable};
use crate::config::StoreConfig;
use crate::error::PersistError;
use crate::files::{diff_files, ensure_parent, remove, rename, suffixed, write_synced};

/// Durable single-object storage on the local filesystem.
///
/// A slot is a path holding exactly one encoded object. Writes go to
/// `slot + tmp_suffix` first and are renamed into place, so a slot file is
/// either absent or complete. Writes whose bytes match the current file are
/// dropped, which keeps backups from churning on unchanged data.
///
/// `SlotStore` holds configuration only; it can be cloned and shared freely.
/// Concurrent writers to the same slot must be serialized by the caller.
#[derive(Clone, Debug, Default)]
pub struct SlotStore {
    config: StoreConfig,
    rotator: BackupRotator,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let rotator = BackupRotator::new(config.backup.clone());
        SlotStore { config, rotator }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Transient file a store writes before renaming it over `slot`.
    pub fn tmp_path(&self, slot: impl AsRef<Path>) -> PathBuf {
        suffixed(slot.as_ref(), &self.config.tmp_suffix)
    }

    /// Newest backup archive of `slot`.
    pub fn archive_path(&self, slot: impl AsRef<Path>) -> PathBuf {
        suffixed(slot.as_ref(), &self.config.backup.archive_suffix)
    }

    /// Backup chain of `slot`, newest first.
    pub fn backups(&self, slot: impl AsRef<Path>) -> Vec<PathBuf> {
        self.rotator.chain(self.archive_path(slot))
    }

    /// Persist `payload` into `slot`. Returns `true` when the slot's content changed.
    pub fn store<T: Persist>(
        &self,
        payload: &T,
        slot: impl AsRef<Path>,
    ) -> Result<bool, PersistError> {
        let slot = slot.as_ref();
        let bytes = encode(payload, self.config.pretty)?;

        ensure_parent(slot)?;
        let tmp = self.tmp_path(slot);
        write_synced(&tmp, &bytes)?;

        if !slot.is_file() {
            tracing::info!(slot = %slot.display(), "saving data");
            rename(&tmp, slot)?;
            return Ok(true);
        }

        match diff_files(&tmp, slot).map_err(PersistError::io("compare", slot))? {
            None => {
                tracing::info!(slot = %slot.display(), "no new data to store");
                remove(&tmp)?;
                Ok(false)
            }
            Some(diff) => {
                tracing::debug!(slot = %slot.display(), ?diff, "slot content differs");
                tracing::info!(slot = %slot.display(), "saving data");
                // rename replaces the old file in one step
                rename(&tmp, slot)?;
                Ok(true)
            }
        }
    }

    /// Like [`store`](Self::store), and additionally snapshot the slot into its
    /// backup chain when the content changed.
    pub fn store_with_backup<T: Persist>(
        &self,
        payload: &T,
        slot: impl AsRef<Path>,
    ) -> Result<bool, PersistError> {
        let slot = slot.as_ref();
        if !self.store(payload, slot)? {
            return Ok(false);
        }
        self.rotator.backup(&[slot], self.archive_path(slot))?;
        Ok(true)
    }

    /// Snapshot arbitrary files into `archive` using this store's backup settings.
    pub fn backup<P: AsRef<Path>>(
        &self,
        files: &[P],
        archive: impl AsRef<Path>,
    ) -> Result<BackupOutcome, PersistError> {
        self.rotator.backup(files, archive)
    }

    /// Decode `slot` as a `T`, reporting every failure with its classification.
    pub fn try_load<T: Persist>(&self, slot: impl AsRef<Path>) -> Result<T, PersistError> {
        let slot = slot.as_ref();
        let bytes = read_slot(slot)?;
        decode(&bytes, slot)
    }

    /// Decode `slot` as a `T`, falling back to `default` on soft failures.
    ///
    /// Soft failures (missing slot, unknown type, wrong shape) are logged as
    /// warnings unless `silent` is set. Hard failures are logged and returned.
    pub fn load<T: Persist>(
        &self,
        slot: impl AsRef<Path>,
        default: T,
        silent: bool,
    ) -> Result<T, PersistError> {
        let slot = slot.as_ref();
        recover(slot, self.try_load(slot), default, silent)
    }

    /// Decode `slot` through the remap table and the schema migration hook of `T`.
    pub fn try_load_versioned<T: Versionable>(
        &self,
        slot: impl AsRef<Path>,
    ) -> Result<T, PersistError> {
        let slot = slot.as_ref();
        tracing::info!(slot = %slot.display(), "loading data");
        let bytes = read_slot(slot)?;
        decode_versioned(&bytes, &self.config.remap, slot)
    }

    /// Versioned counterpart of [`load`](Self::load). Soft failures are always logged.
    pub fn load_versioned<T: Versionable>(
        &self,
        slot: impl AsRef<Path>,
        default: T,
    ) -> Result<T, PersistError> {
        let slot = slot.as_ref();
        recover(slot, self.try_load_versioned(slot), default, false)
    }
}

fn read_slot(slot: &Path) -> Result<Vec<u8>, PersistError> {
    fs::read(slot).map_err(PersistError::missing_or_io("read", slot))
}

fn recover<T>(
    slot: &Path,
    result: Result<T, PersistError>,
    default: T,
    silent: bool,
) -> Result<T, PersistError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_soft() => {
            if !silent {
                tracing::warn!(slot = %slot.display(), error = %err, "failed to load");
            }
            Ok(default)
        }
        Err(err) => {
            tracing::error!(slot = %slot.display(), error = %err, "failed to load");
            Err(err)
        }
    }
}
