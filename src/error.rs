use std::io;
use std::path::{Path, PathBuf};

/// How a failure is handled by the `load*` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Expected operational condition, recovered by returning the caller's default.
    Soft,
    /// Bug, corruption or filesystem fault, always surfaced to the caller.
    Hard,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("slot {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error(
        "slot {} records type `{recorded}`, which does not resolve to `{expected}`",
        .path.display()
    )]
    TypeUnresolved {
        path: PathBuf,
        recorded: String,
        expected: &'static str,
    },

    #[error("slot {} does not match the shape of `{type_name}`: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        type_name: &'static str,
        source: serde_json::Error,
    },

    #[error("slot {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode `{type_name}`: {source}")]
    Encode {
        type_name: &'static str,
        source: serde_json::Error,
    },

    #[error("{op} failed for {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("invalid input {}: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: &'static str },
}

impl PersistError {
    pub fn severity(&self) -> Severity {
        match self {
            PersistError::NotFound { .. }
            | PersistError::TypeUnresolved { .. }
            | PersistError::Malformed { .. } => Severity::Soft,
            PersistError::Corrupt { .. }
            | PersistError::Encode { .. }
            | PersistError::Io { .. }
            | PersistError::InvalidInput { .. } => Severity::Hard,
        }
    }

    pub fn is_soft(&self) -> bool {
        self.severity() == Severity::Soft
    }

    /// The slot or archive path the failure refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PersistError::NotFound { path }
            | PersistError::TypeUnresolved { path, .. }
            | PersistError::Malformed { path, .. }
            | PersistError::Corrupt { path, .. }
            | PersistError::Io { path, .. }
            | PersistError::InvalidInput { path, .. } => Some(path),
            PersistError::Encode { .. } => None,
        }
    }

    pub(crate) fn io(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> PersistError {
        let path = path.to_path_buf();
        move |source| PersistError::Io { op, path, source }
    }

    /// Like [`PersistError::io`], but a missing file becomes `NotFound`.
    pub(crate) fn missing_or_io(
        op: &'static str,
        path: &Path,
    ) -> impl FnOnce(io::Error) -> PersistError {
        let path = path.to_path_buf();
        move |source| match source.kind() {
            io::ErrorKind::NotFound => PersistError::NotFound { path },
            _ => PersistError::Io { op, path, source },
        }
    }
}
