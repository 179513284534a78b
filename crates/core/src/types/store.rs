//! Retail store record.

use serde::{Deserialize, Serialize};

use super::id::StoreId;

/// A retail skate store listed in the directory.
///
/// Stores are seeded externally (bundled fixture or backend record) and are
/// never modified by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    /// Display name, usually the romanized shop name.
    pub name: String,
    /// Localized (Japanese) name.
    #[serde(default)]
    pub name_ja: String,
    /// Coarse region such as `関東`.
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub prefecture: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    /// Brand names carried by the store. Not validated against the catalog.
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub open_year: Option<i32>,
}

impl Store {
    /// Number of brands the store carries.
    #[must_use]
    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    /// Whether the store carries any of the given brands.
    ///
    /// Matching is exact; an empty request set matches nothing.
    #[must_use]
    pub fn carries_any<S: AsRef<str>>(&self, brands: &[S]) -> bool {
        brands
            .iter()
            .any(|wanted| self.brands.iter().any(|b| b == wanted.as_ref()))
    }
}
