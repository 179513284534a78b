//! Display data shared by page templates.

use dabot_core::{Brand, Store, catalog, listing::ALL};

/// One option of a select, chip group or checkbox list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Category choices led by the "all" sentinel.
///
/// `current` is the raw selected value; absent or blank selects "all".
pub fn category_choices<'a>(
    values: impl IntoIterator<Item = &'a str>,
    current: Option<&str>,
) -> Vec<Choice> {
    let current = current.filter(|c| !c.trim().is_empty()).unwrap_or(ALL);
    std::iter::once(Choice::new(ALL, "すべて", current == ALL))
        .chain(
            values
                .into_iter()
                .map(|value| Choice::new(value, value, value == current)),
        )
        .collect()
}

/// A brand name on a store card, linked when the catalog knows it.
#[derive(Debug, Clone)]
pub struct BrandChip {
    pub name: String,
    pub href: Option<String>,
}

/// Store display data for templates.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub id: String,
    pub name: String,
    pub name_ja: String,
    pub area: String,
    pub prefecture: String,
    pub city: String,
    pub address: String,
    pub brands: Vec<BrandChip>,
    pub description: String,
    pub open_year: Option<i32>,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.to_string(),
            name: store.name.clone(),
            name_ja: store.name_ja.clone(),
            area: store.area.clone(),
            prefecture: store.prefecture.clone(),
            city: store.city.clone(),
            address: store.address.clone(),
            brands: store
                .brands
                .iter()
                .map(|name| BrandChip {
                    name: name.clone(),
                    href: catalog::find_brand(name).map(brand_href),
                })
                .collect(),
            description: store.description.clone(),
            open_year: store.open_year,
        }
    }
}

/// Path of a brand's detail page.
pub fn brand_href(brand: &Brand) -> String {
    format!("/brands/{}", brand.id)
}
