//! Brand listing: searchable fields, sort orders and brand queries.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Criteria, FieldAccessor, Keyword, Listable, Selection, SortKey, collate};
use crate::types::Brand;

fn name(brand: &Brand) -> &str {
    &brand.name
}

fn name_ja(brand: &Brand) -> &str {
    &brand.name_ja
}

fn description(brand: &Brand) -> &str {
    &brand.description
}

fn long_description(brand: &Brand) -> &str {
    &brand.long_description
}

fn origin(brand: &Brand) -> &str {
    &brand.origin
}

fn category(brand: &Brand) -> &str {
    &brand.category
}

impl Listable for Brand {
    const SEARCHABLE: &'static [FieldAccessor<Self>] =
        &[name, name_ja, description, long_description, origin, category];

    fn category(&self) -> &str {
        &self.category
    }
}

/// Sort orders available on the brand listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BrandSort {
    #[default]
    NameAsc,
    NameDesc,
    /// Localized name, あ to ん.
    JaAsc,
    /// Localized name, ん to あ.
    JaDesc,
}

impl BrandSort {
    /// All sort orders in display order.
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::JaAsc, Self::JaDesc];

    /// Parse a sort order, falling back to [`BrandSort::NameAsc`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "name-desc" => Self::NameDesc,
            "ja-asc" => Self::JaAsc,
            "ja-desc" => Self::JaDesc,
            _ => Self::NameAsc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::JaAsc => "ja-asc",
            Self::JaDesc => "ja-desc",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "A-Z",
            Self::NameDesc => "Z-A",
            Self::JaAsc => "あ-ん",
            Self::JaDesc => "ん-あ",
        }
    }
}

impl Serialize for BrandSort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BrandSort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

impl SortKey<Brand> for BrandSort {
    fn compare(&self, a: &Brand, b: &Brand) -> Ordering {
        match self {
            Self::NameAsc => collate::compare(&a.name, &b.name),
            Self::NameDesc => collate::compare(&b.name, &a.name),
            Self::JaAsc => collate::compare(&a.name_ja, &b.name_ja),
            Self::JaDesc => collate::compare(&b.name_ja, &a.name_ja),
        }
    }
}

/// A brand listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrandQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    /// Category tag to keep; `"all"` or blank disables the filter.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: BrandSort,
}

impl BrandQuery {
    #[must_use]
    pub fn criteria(&self) -> Criteria<BrandSort> {
        Criteria {
            keyword: Keyword::parse_opt(self.keyword.as_deref()),
            category: Selection::parse(self.category.as_deref()),
            sort: self.sort,
        }
    }

    /// Run the query against `brands`.
    #[must_use]
    pub fn apply<'a>(&self, brands: &'a [Brand]) -> Vec<&'a Brand> {
        super::filter_sort(brands, &self.criteria())
    }
}
