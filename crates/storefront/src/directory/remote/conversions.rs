//! Conversions from generated GraphQL response types to core records.

use dabot_core::{Store, StoreId};

use super::queries::list_stores;

/// Convert a `listStores` item into a store record.
///
/// Nullable text fields become empty strings; null brand entries are dropped.
/// Founding years outside the `i32` range are treated as unknown.
pub fn convert_store(item: list_stores::ListStoresListStoresItems) -> Store {
    Store {
        id: StoreId::new(item.id),
        name: item.name,
        name_ja: item.name_ja.unwrap_or_default(),
        area: item.area.unwrap_or_default(),
        prefecture: item.prefecture.unwrap_or_default(),
        city: item.city.unwrap_or_default(),
        address: item.address.unwrap_or_default(),
        brands: item
            .brands
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect(),
        description: item.description.unwrap_or_default(),
        open_year: item.open_year.and_then(|year| i32::try_from(year).ok()),
    }
}
