use serde::{de::DeserializeOwned, Serialize};

/// Field data of an encoded payload, as handed to migration hooks.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Trait for types that can be stored in a slot.
///
/// The type name is recorded next to the payload and checked on load, so a
/// slot written for one type is never silently decoded as another.
///
/// Every load compares the recorded schema version with `SCHEMA_VERSION`.
/// When they differ (an absent tag counts as different) the raw field map is
/// passed through [`migrate`](Persist::migrate) before it is decoded into `Self`.
pub trait Persist: Serialize + DeserializeOwned {
    /// Fully-qualified identity recorded in the envelope (e.g. "gen::cache::RepoCache").
    const TYPE_NAME: &'static str;

    /// Current schema version. `None` writes untagged envelopes.
    const SCHEMA_VERSION: Option<u64> = None;

    /// Convert fields recorded under `recorded` into the current schema.
    ///
    /// The default installs the fields unchanged and only logs the mismatch.
    /// Types with renamed or restructured fields must override it.
    fn migrate(fields: Fields, recorded: Option<u64>) -> Fields {
        tracing::info!(
            type_name = Self::TYPE_NAME,
            from = ?recorded,
            to = ?Self::SCHEMA_VERSION,
            "converting object between schema versions"
        );
        fields
    }
}

/// Opt-in marker for payloads with a declared schema version.
///
/// Only `Versionable` types can be loaded through the relocation-aware
/// versioned path, which consults a [`RemapTable`](super::RemapTable) before
/// checking the recorded type name.
pub trait Versionable: Persist {}
