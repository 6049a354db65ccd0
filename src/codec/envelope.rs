use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::Value;

use crate::error::PersistError;

use super::persist::{Persist, Versionable};
use super::remap::RemapTable;

/// On-disk form of a stored object: type identity, optional schema tag and field data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub fields: Value,
}

impl Envelope {
    /// Wrap a payload. Fields pass through `serde_json::Value`, whose maps are
    /// key-ordered, so payloads holding `HashMap`s still encode to stable bytes.
    pub fn wrap<T: Persist>(payload: &T) -> Result<Self, PersistError> {
        let fields = serde_json::to_value(payload).map_err(|source| PersistError::Encode {
            type_name: T::TYPE_NAME,
            source,
        })?;
        Ok(Envelope {
            type_name: T::TYPE_NAME.to_string(),
            version: T::SCHEMA_VERSION,
            fields,
        })
    }

    pub fn to_vec(&self, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
        if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Encode a payload into envelope bytes.
pub fn encode<T: Persist>(payload: &T, pretty: bool) -> Result<Vec<u8>, PersistError> {
    Envelope::wrap(payload)?
        .to_vec(pretty)
        .map_err(|source| PersistError::Encode {
            type_name: T::TYPE_NAME,
            source,
        })
}

/// Decode envelope bytes read from `origin` as a `T`.
///
/// The recorded type must be exactly `T::TYPE_NAME`. Fields recorded under
/// another schema version go through [`Persist::migrate`] first.
pub fn decode<T: Persist>(bytes: &[u8], origin: &Path) -> Result<T, PersistError> {
    let envelope = read_envelope(bytes, origin)?;
    if envelope.type_name != T::TYPE_NAME {
        return Err(unresolved::<T>(envelope.type_name, origin));
    }
    upgrade::<T>(envelope.fields, envelope.version, origin)
}

/// Like [`decode`], but the recorded type name is first resolved through
/// `remap`, so payloads written before a type moved still load.
pub fn decode_versioned<T: Versionable>(
    bytes: &[u8],
    remap: &RemapTable,
    origin: &Path,
) -> Result<T, PersistError> {
    let envelope = read_envelope(bytes, origin)?;

    let resolved = remap.resolve(&envelope.type_name);
    if resolved != T::TYPE_NAME {
        return Err(unresolved::<T>(envelope.type_name, origin));
    }
    if resolved != envelope.type_name.as_str() {
        tracing::debug!(
            slot = %origin.display(),
            recorded = %envelope.type_name,
            resolved = T::TYPE_NAME,
            "remapped relocated type"
        );
    }

    upgrade::<T>(envelope.fields, envelope.version, origin)
}

// A file that does not parse as an envelope is corrupt, whatever the reason.
fn read_envelope(bytes: &[u8], origin: &Path) -> Result<Envelope, PersistError> {
    Envelope::from_slice(bytes).map_err(|source| PersistError::Corrupt {
        path: origin.to_path_buf(),
        source,
    })
}

fn upgrade<T: Persist>(
    fields: Value,
    recorded: Option<u64>,
    origin: &Path,
) -> Result<T, PersistError> {
    if recorded == T::SCHEMA_VERSION {
        return install::<T>(fields, origin);
    }

    let Value::Object(fields) = fields else {
        return Err(PersistError::Malformed {
            path: origin.to_path_buf(),
            type_name: T::TYPE_NAME,
            source: serde::de::Error::custom("versioned payload fields must be a map"),
        });
    };
    let migrated = T::migrate(fields, recorded);
    install::<T>(Value::Object(migrated), origin)
}

fn install<T: Persist>(fields: Value, origin: &Path) -> Result<T, PersistError> {
    serde_json::from_value(fields).map_err(|source| classify::<T>(source, origin))
}

fn unresolved<T: Persist>(recorded: String, origin: &Path) -> PersistError {
    PersistError::TypeUnresolved {
        path: origin.to_path_buf(),
        recorded,
        expected: T::TYPE_NAME,
    }
}

// Shape mismatches inside a well-formed envelope are an expected consequence
// of schema drift.
fn classify<T: Persist>(source: serde_json::Error, origin: &Path) -> PersistError {
    match source.classify() {
        Category::Data => PersistError::Malformed {
            path: origin.to_path_buf(),
            type_name: T::TYPE_NAME,
            source,
        },
        Category::Syntax | Category::Eof | Category::Io => PersistError::Corrupt {
            path: origin.to_path_buf(),
            source,
        },
    }
}
