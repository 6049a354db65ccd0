//! Versioned codec - the envelope format stored in every slot.
//!
//! Each slot holds a JSON envelope recording the payload's type identity,
//! an optional schema version and the payload's fields:
//!
//! ```text
//! {"type":"stockmonitor::datatypes::Wallet","version":2,"fields":{...}}
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use stowage::{Fields, Persist, RemapTable};
//!
//! fn migrate_wallet(mut fields: Fields, recorded: Option<u64>) -> Fields {
//!     if recorded < Some(2) {
//!         fields.insert("currency".into(), "PLN".into());
//!     }
//!     fields
//! }
//!
//! #[derive(Serialize, Deserialize, Persist)]
//! #[persist(name = "stockmonitor::datatypes::Wallet", version = 2, migrate = "migrate_wallet")]
//! struct Wallet {
//!     pub stocks: Vec<String>,
//!     pub currency: String,
//! }
//!
//! // Older versions are migrated on every load
//! let wallet: Wallet = stowage::decode(&bytes, path)?;
//!
//! // Relocated types additionally need the versioned path
//! let remap = RemapTable::new().with_module("stockmonitor::gui", "stockmonitor::datatypes");
//! let wallet: Wallet = stowage::decode_versioned(&bytes, &remap, path)?;
//! ```

mod envelope;
mod persist;
mod remap;

pub use envelope::{decode, decode_versioned, encode, Envelope};
pub use persist::{Fields, Persist, Versionable};
pub use remap::RemapTable;
