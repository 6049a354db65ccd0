mod persist;

use proc_macro::TokenStream;

/// Derive macro implementing `stowage::Persist` (and `stowage::Versionable`
/// when a schema version is declared).
///
/// # Usage
///
/// Untagged payload, identified by its module path:
/// ```ignore
/// #[derive(Serialize, Deserialize, Persist)]
/// struct RepoCache {
///     pub repos: Vec<String>,
/// }
/// ```
///
/// Explicit identity and schema version with the default migration hook:
/// ```ignore
/// #[derive(Serialize, Deserialize, Persist)]
/// #[persist(name = "stockmonitor::datatypes::Wallet", version = 2)]
/// struct Wallet {
///     pub stocks: Vec<String>,
/// }
/// ```
///
/// With a migration hook converting older field maps:
/// ```ignore
/// fn migrate_wallet(mut fields: Fields, recorded: Option<u64>) -> Fields {
///     if recorded < Some(3) {
///         fields.entry("currency").or_insert("PLN".into());
///     }
///     fields
/// }
///
/// #[derive(Serialize, Deserialize, Persist)]
/// #[persist(version = 3, migrate = "migrate_wallet")]
/// struct Wallet {
///     pub stocks: Vec<String>,
///     pub currency: String,
/// }
/// ```
///
/// The macro supports:
/// - `name = "..."`: recorded type identity (default: `module_path!()::Type`)
/// - `version = N`: current schema version, also implements `Versionable`
/// - `migrate = "path"`: `fn(Fields, Option<u64>) -> Fields` used as the hook
#[proc_macro_derive(Persist, attributes(persist))]
pub fn derive_persist(input: TokenStream) -> TokenStream {
    persist::derive_persist(input)
}
