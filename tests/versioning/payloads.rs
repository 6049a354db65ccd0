use serde::{Deserialize, Serialize};
use stowage::{Fields, Persist};

// =============================================================================
// V1: first schema, owner + stocks
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(name = "stockmonitor::datatypes::datatypes::Wallet", version = 1)]
pub struct WalletV1 {
    pub owner: String,
    pub stocks: Vec<String>,
}

// =============================================================================
// V2: added currency, migration hook fills the default
// =============================================================================

pub fn migrate_wallet_v2(mut fields: Fields, recorded: Option<u64>) -> Fields {
    if recorded.unwrap_or(0) < 2 {
        fields
            .entry("currency")
            .or_insert_with(|| serde_json::Value::from("PLN"));
    }
    fields
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(
    name = "stockmonitor::datatypes::datatypes::Wallet",
    version = 2,
    migrate = "migrate_wallet_v2"
)]
pub struct WalletV2 {
    pub owner: String,
    pub stocks: Vec<String>,
    pub currency: String,
}

// =============================================================================
// V3: `stocks` renamed to `holdings`, chained on top of the v2 hook
// =============================================================================

pub fn migrate_wallet_v3(fields: Fields, recorded: Option<u64>) -> Fields {
    let mut fields = migrate_wallet_v2(fields, recorded);
    if recorded.unwrap_or(0) < 3 {
        if let Some(stocks) = fields.remove("stocks") {
            fields.insert("holdings".into(), stocks);
        }
    }
    fields
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(
    name = "stockmonitor::datatypes::datatypes::Wallet",
    version = 3,
    migrate = "migrate_wallet_v3"
)]
pub struct WalletV3 {
    pub owner: String,
    pub holdings: Vec<String>,
    pub currency: String,
}

// =============================================================================
// Default hook: same shape as V2 under a new version, no field changes
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(name = "stockmonitor::datatypes::datatypes::Wallet", version = 4)]
pub struct WalletV2Compatible {
    pub owner: String,
    pub stocks: Vec<String>,
    pub currency: String,
}

// =============================================================================
// Relocation: the type used to live under `stockmonitor::gui`
// =============================================================================

/// Written by older code, before the datatypes moved out of the GUI module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(name = "stockmonitor::gui::datatypes::Wallet", version = 2)]
pub struct LegacyGuiWallet {
    pub owner: String,
    pub stocks: Vec<String>,
    pub currency: String,
}

/// Untagged payload, never versioned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(name = "stockmonitor::gui::wallettypes::TransHistory")]
pub struct LegacyHistory {
    pub entries: Vec<String>,
}

/// `LegacyHistory` after the move, now versioned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Persist)]
#[persist(name = "stockmonitor::datatypes::wallettypes::TransHistory", version = 1)]
pub struct TransHistory {
    pub entries: Vec<String>,
}
