//! Brand record.

use serde::{Deserialize, Serialize};

use super::id::BrandId;

/// A skate brand described in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Lowercased display name, used for routing.
    pub id: BrandId,
    /// Uppercase display name, e.g. `FTC`.
    pub name: String,
    pub name_ja: String,
    /// Path to the brand image under the static assets root.
    pub image: String,
    pub description: String,
    pub long_description: String,
    /// Founding year as displayed, e.g. `"1986"`.
    pub established: String,
    pub origin: String,
    /// Category tag, e.g. `Skateboard / Streetwear`.
    pub category: String,
}
