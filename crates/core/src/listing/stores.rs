//! Store listing: searchable fields, sort orders and store search queries.

use std::cmp::{Ordering, Reverse};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Criteria, FieldAccessor, Keyword, Listable, Selection, SortKey, collate};
use crate::types::Store;

fn name(store: &Store) -> &str {
    &store.name
}

fn name_ja(store: &Store) -> &str {
    &store.name_ja
}

fn prefecture(store: &Store) -> &str {
    &store.prefecture
}

fn city(store: &Store) -> &str {
    &store.city
}

fn address(store: &Store) -> &str {
    &store.address
}

fn description(store: &Store) -> &str {
    &store.description
}

impl Listable for Store {
    const SEARCHABLE: &'static [FieldAccessor<Self>] =
        &[name, name_ja, prefecture, city, address, description];

    fn category(&self) -> &str {
        &self.area
    }
}

/// Sort orders available on store listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreSort {
    /// Display name, A to Z.
    #[default]
    NameAsc,
    /// Display name, Z to A.
    NameDesc,
    /// Grouped by area, then by name.
    Area,
    /// Most brands carried first.
    BrandsDesc,
    /// Newest founding year first; stores without a year last.
    YearDesc,
}

impl StoreSort {
    /// All sort orders in display order.
    pub const ALL: [Self; 5] = [
        Self::NameAsc,
        Self::NameDesc,
        Self::Area,
        Self::BrandsDesc,
        Self::YearDesc,
    ];

    /// Parse a sort order from its query-string form.
    ///
    /// Unknown values fall back to [`StoreSort::NameAsc`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "name-desc" => Self::NameDesc,
            "area" => Self::Area,
            "brands-desc" => Self::BrandsDesc,
            "year-desc" => Self::YearDesc,
            _ => Self::NameAsc,
        }
    }

    /// The query-string form of this sort order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Area => "area",
            Self::BrandsDesc => "brands-desc",
            Self::YearDesc => "year-desc",
        }
    }

    /// Button label shown on the listing page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "名前 A-Z",
            Self::NameDesc => "名前 Z-A",
            Self::Area => "エリア順",
            Self::BrandsDesc => "取扱ブランド数",
            Self::YearDesc => "創業年順",
        }
    }
}

impl Serialize for StoreSort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StoreSort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

impl SortKey<Store> for StoreSort {
    fn compare(&self, a: &Store, b: &Store) -> Ordering {
        match self {
            Self::NameAsc => collate::compare(&a.name, &b.name),
            Self::NameDesc => collate::compare(&b.name, &a.name),
            Self::Area => collate::compare(&a.area, &b.area)
                .then_with(|| collate::compare(&a.name, &b.name)),
            Self::BrandsDesc => b.brand_count().cmp(&a.brand_count()),
            // None < Some(_), so reversing puts missing years last
            Self::YearDesc => Reverse(a.open_year).cmp(&Reverse(b.open_year)),
        }
    }
}

/// A store search request.
///
/// Every criterion is optional; absent or blank values disable the
/// corresponding filter. The area additionally honours the `"all"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub sort: StoreSort,
}

impl StoreQuery {
    /// Listing criteria derived from this query.
    #[must_use]
    pub fn criteria(&self) -> Criteria<StoreSort> {
        Criteria {
            keyword: Keyword::parse_opt(self.keyword.as_deref()),
            category: Selection::parse(self.area.as_deref()),
            sort: self.sort,
        }
    }

    /// The prefecture filter, if enabled.
    #[must_use]
    pub fn prefecture_filter(&self) -> Option<&str> {
        self.prefecture
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// Requested brands with blank entries dropped.
    #[must_use]
    pub fn brand_filter(&self) -> Vec<&str> {
        self.brands
            .iter()
            .map(String::as_str)
            .filter(|b| !b.trim().is_empty())
            .collect()
    }

    /// Whether no filter is active.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        let criteria = self.criteria();
        criteria.keyword.is_none()
            && criteria.category == Selection::All
            && self.prefecture_filter().is_none()
            && self.brand_filter().is_empty()
    }

    /// Run the query against `stores`.
    #[must_use]
    pub fn apply<'a>(&self, stores: &'a [Store]) -> Vec<&'a Store> {
        let prefecture = self.prefecture_filter();
        let brands = self.brand_filter();

        super::filter_sort_with(stores, &self.criteria(), |store| {
            prefecture.is_none_or(|p| store.prefecture == p)
                && (brands.is_empty() || store.carries_any(&brands))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::sample_stores;
    use crate::listing::{self, ALL};
    use crate::types::StoreId;

    fn store(id: &str, name: &str, area: &str, year: Option<i32>, brands: &[&str]) -> Store {
        Store {
            id: StoreId::new(id),
            name: name.to_string(),
            name_ja: String::new(),
            area: area.to_string(),
            prefecture: String::new(),
            city: String::new(),
            address: String::new(),
            brands: brands.iter().map(|b| (*b).to_string()).collect(),
            description: String::new(),
            open_year: year,
        }
    }

    fn names(view: &[&Store]) -> Vec<String> {
        view.iter().map(|s| s.name.clone()).collect()
    }

    fn sorted(stores: &[Store], sort: StoreSort) -> Vec<String> {
        let query = StoreQuery {
            sort,
            ..Default::default()
        };
        names(&query.apply(stores))
    }

    #[test]
    fn test_area_scenario() {
        let stores = vec![
            store("instant", "INSTANT", "関東", Some(2005), &[]),
            store("coverage", "COVERAGE", "関西", Some(2003), &[]),
        ];
        let query = StoreQuery {
            area: Some("関西".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&stores)), vec!["COVERAGE"]);
    }

    #[test]
    fn test_all_area_is_identity_set() {
        let stores = sample_stores();
        let query = StoreQuery {
            area: Some(ALL.to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(&stores).len(), stores.len());
    }

    #[test]
    fn test_blank_keyword_keeps_order() {
        let stores = sample_stores();
        let criteria = Criteria {
            keyword: Keyword::parse("   "),
            category: Selection::All,
            sort: StoreSort::NameAsc,
        };
        let before = names(&listing::filter_sort(&stores, &criteria));
        let query = StoreQuery {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&stores)), before);
    }

    #[test]
    fn test_keyword_partitions_records() {
        let stores = sample_stores();
        let query = StoreQuery {
            keyword: Some("大阪".to_string()),
            ..Default::default()
        };
        let hits = query.apply(&stores);
        let keyword = Keyword::parse("大阪").unwrap();
        assert!(!hits.is_empty());
        for s in &stores {
            let included = hits.iter().any(|h| h.id == s.id);
            assert_eq!(included, keyword.matches_record(s), "store {}", s.id);
        }
    }

    #[test]
    fn test_keyword_matches_description_case_insensitively() {
        let stores = sample_stores();
        let query = StoreQuery {
            keyword: Some("ftc".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = query.apply(&stores).iter().map(|s| s.id.to_string()).collect();
        assert!(ids.contains(&"ftc-tokyo".to_string()));
    }

    #[test]
    fn test_area_not_keyword_searchable() {
        let stores = sample_stores();
        let query = StoreQuery {
            keyword: Some("関西".to_string()),
            ..Default::default()
        };
        // "関西" only appears in the COVERAGE description, not via the area field
        let ids: Vec<_> = query.apply(&stores).iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["coverage"]);
    }

    #[test]
    fn test_prefecture_filter() {
        let stores = sample_stores();
        let query = StoreQuery {
            prefecture: Some("愛知県".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&stores)), vec!["REGGIE"]);
    }

    #[test]
    fn test_brand_filter_is_or() {
        let stores = vec![
            store("a", "A", "x", None, &["FTC"]),
            store("b", "B", "x", None, &["DIME"]),
            store("c", "C", "x", None, &["POLAR"]),
        ];
        let query = StoreQuery {
            brands: vec!["FTC".to_string(), "DIME".to_string()],
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&stores)), vec!["A", "B"]);
    }

    #[test]
    fn test_blank_brand_entries_ignored() {
        let stores = vec![store("a", "A", "x", None, &[])];
        let query = StoreQuery {
            brands: vec![String::new(), " ".to_string()],
            ..Default::default()
        };
        assert_eq!(query.apply(&stores).len(), 1);
        assert!(query.is_unfiltered());
    }

    #[test]
    fn test_name_sorts_are_reverses() {
        let stores = sample_stores();
        let mut asc = sorted(&stores, StoreSort::NameAsc);
        let desc = sorted(&stores, StoreSort::NameDesc);
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let stores = sample_stores();
        let asc = sorted(&stores, StoreSort::NameAsc);
        let murasaki = asc.iter().position(|n| n.starts_with("murasaki")).unwrap();
        let hoop = asc.iter().position(|n| n == "HOOP OSAKA").unwrap();
        let reggie = asc.iter().position(|n| n == "REGGIE").unwrap();
        assert!(hoop < murasaki && murasaki < reggie);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let stores = sample_stores();
        for sort in StoreSort::ALL {
            let query = StoreQuery {
                sort,
                ..Default::default()
            };
            let once: Vec<Store> = query.apply(&stores).into_iter().cloned().collect();
            let twice = names(&query.apply(&once));
            assert_eq!(names(&once.iter().collect::<Vec<_>>()), twice, "{sort:?}");
        }
    }

    #[test]
    fn test_year_desc_puts_missing_last() {
        let stores = vec![
            store("a", "A", "x", None, &[]),
            store("b", "B", "x", Some(2003), &[]),
            store("c", "C", "x", None, &[]),
            store("d", "D", "x", Some(2015), &[]),
        ];
        assert_eq!(sorted(&stores, StoreSort::YearDesc), vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn test_brands_desc() {
        let stores = vec![
            store("a", "A", "x", None, &["X"]),
            store("b", "B", "x", None, &["X", "Y", "Z"]),
            store("c", "C", "x", None, &["X", "Y"]),
            store("d", "D", "x", None, &["Y"]),
        ];
        // A and D tie and keep input order
        assert_eq!(sorted(&stores, StoreSort::BrandsDesc), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_area_sort_groups_then_names() {
        let stores = vec![
            store("a", "ZETA", "関東", None, &[]),
            store("b", "beta", "関西", None, &[]),
            store("c", "ALPHA", "関東", None, &[]),
        ];
        let order = sorted(&stores, StoreSort::Area);
        assert_eq!(order[0..2].to_vec(), vec!["ALPHA", "ZETA"]);
        assert_eq!(order[2], "beta");
    }

    #[test]
    fn test_sort_parse_roundtrip_and_fallback() {
        for sort in StoreSort::ALL {
            assert_eq!(StoreSort::parse(sort.as_str()), sort);
        }
        assert_eq!(StoreSort::parse("bogus"), StoreSort::NameAsc);
    }

    #[test]
    fn test_query_deserializes_from_search_body() {
        let query: StoreQuery = serde_json::from_str(
            r#"{"keyword": "shop", "area": "all", "brands": ["FTC"], "sort": "year-desc"}"#,
        )
        .unwrap();
        assert_eq!(query.sort, StoreSort::YearDesc);
        assert_eq!(query.criteria().category, Selection::All);
        assert_eq!(query.brand_filter(), vec!["FTC"]);
        let empty: StoreQuery = serde_json::from_str("{}").unwrap();
        assert!(empty.is_unfiltered());
    }
}
