use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const PATH_SEPARATOR: &str = "::";

/// Static table translating historical type identities to current ones.
///
/// Two kinds of entries are supported:
/// - type entries map one qualified name to another (`old::Wallet` -> `new::Wallet`)
/// - module entries relocate every type under a module (`app::gui` -> `app::datatypes`)
///
/// Type entries win over module entries; among module entries the longest
/// matching prefix wins. Remaps chain, so `a -> b` and `b -> c` resolve `a` to `c`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapTable {
    types: BTreeMap<String, String>,
    modules: BTreeMap<String, String>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table of type entries from a static slice.
    pub fn from_static(types: &[(&str, &str)]) -> Self {
        types
            .iter()
            .fold(Self::new(), |table, (old, new)| table.with_type(*old, *new))
    }

    pub fn with_type(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.types.insert(old.into(), new.into());
        self
    }

    pub fn with_module(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        let old = old.into();
        let new = new.into();
        self.modules.insert(
            old.trim_end_matches(PATH_SEPARATOR).to_string(),
            new.trim_end_matches(PATH_SEPARATOR).to_string(),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.modules.is_empty()
    }

    /// Resolve `name` to its current identity. Names without an entry come back unchanged.
    pub fn resolve<'a>(&self, name: &'a str) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(name);
        // A chain can be at most as long as the table; one more hop means a cycle.
        for _ in 0..=self.len() {
            match self.step(&current) {
                Some(next) if next != current => current = Cow::Owned(next),
                _ => return current,
            }
        }
        tracing::warn!(type_name = name, "type remap table contains a cycle");
        current
    }

    fn step(&self, name: &str) -> Option<String> {
        if let Some(new) = self.types.get(name) {
            return Some(new.clone());
        }

        self.modules
            .iter()
            .filter(|(old, _)| {
                name.strip_prefix(old.as_str())
                    .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
            })
            .max_by_key(|(old, _)| old.len())
            .map(|(old, new)| format!("{}{}", new, &name[old.len()..]))
    }
}
