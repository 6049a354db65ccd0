use std::path::{Path, PathBuf};

use crate::config::BackupConfig;
use crate::error::PersistError;
use crate::files::{ensure_parent, files_equal, remove, rename, suffixed};

use super::archive::write_archive;

/// What a call to [`BackupRotator::backup`] did to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// No archive existed; the snapshot became index 0.
    Created,
    /// The snapshot matched index 0 byte for byte and was discarded.
    Unchanged,
    /// Existing members shifted up; `depth` is the index the oldest one now occupies.
    Rotated { depth: usize },
}

/// Path of chain member `index`: 0 is the archive itself, `n` is `archive.n`.
pub fn snapshot_path(archive: &Path, index: usize) -> PathBuf {
    if index == 0 {
        archive.to_path_buf()
    } else {
        suffixed(archive, &format!(".{index}"))
    }
}

/// Maintains a numbered chain of compressed snapshots for a set of files.
///
/// The chain only grows when the archived content actually changes:
/// `archive` (newest), `archive.1`, `archive.2`, ... (oldest).
#[derive(Clone, Debug, Default)]
pub struct BackupRotator {
    config: BackupConfig,
}

impl BackupRotator {
    pub fn new(config: BackupConfig) -> Self {
        BackupRotator { config }
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Snapshot `inputs` into `archive`, shifting older snapshots up the chain.
    pub fn backup<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        archive: impl AsRef<Path>,
    ) -> Result<BackupOutcome, PersistError> {
        let archive = archive.as_ref();
        ensure_parent(archive)?;

        let tmp = suffixed(archive, &self.config.tmp_suffix);
        write_archive(inputs, &tmp, self.config.compression)?;

        if !archive.is_file() {
            tracing::info!(archive = %archive.display(), "storing backup");
            rename(&tmp, archive)?;
            return Ok(BackupOutcome::Created);
        }

        if files_equal(&tmp, archive)? {
            tracing::info!(archive = %archive.display(), "no new data to backup");
            remove(&tmp)?;
            return Ok(BackupOutcome::Unchanged);
        }

        let depth = first_free_index(archive);
        tracing::info!(
            archive = %archive.display(),
            slot = %snapshot_path(archive, depth).display(),
            "found backup slot"
        );

        // Top of the chain first, so every rename lands on a vacant index.
        for index in (1..=depth).rev() {
            rename(
                &snapshot_path(archive, index - 1),
                &snapshot_path(archive, index),
            )?;
        }
        rename(&tmp, archive)?;

        if let Some(max_history) = self.config.max_history {
            self.prune(archive, max_history)?;
        }

        Ok(BackupOutcome::Rotated { depth })
    }

    /// Existing chain members, newest first. Stops at the first missing index.
    pub fn chain(&self, archive: impl AsRef<Path>) -> Vec<PathBuf> {
        let archive = archive.as_ref();
        (0..)
            .map(|index| snapshot_path(archive, index))
            .take_while(|path| path.is_file())
            .collect()
    }

    fn prune(&self, archive: &Path, max_history: usize) -> Result<(), PersistError> {
        let mut index = max_history + 1;
        loop {
            let path = snapshot_path(archive, index);
            if !path.is_file() {
                return Ok(());
            }
            tracing::info!(
                archive = %archive.display(),
                pruned = %path.display(),
                "pruning old backup"
            );
            remove(&path)?;
            index += 1;
        }
    }
}

fn first_free_index(archive: &Path) -> usize {
    let mut index = 1;
    while snapshot_path(archive, index).is_file() {
        index += 1;
    }
    index
}
