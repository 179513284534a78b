//! Store listing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
};
use dabot_core::listing;
use dabot_core::{Store, StoreQuery, StoreSort, catalog};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

use super::views::{Choice, StoreView, category_choices};

/// Message shown when the directory cannot be loaded.
pub const FETCH_FAILED: &str = "店舗データの取得に失敗しました";

/// Parse a store query from a raw query string.
///
/// Accepts `keyword`, `area`, `prefecture`, `sort` and a repeatable `brand`
/// parameter. Unknown parameters are ignored and an unknown sort falls back
/// to the default.
#[must_use]
pub fn parse_store_query(raw: Option<&str>) -> StoreQuery {
    let mut query = StoreQuery::default();
    let raw = raw.unwrap_or_default();

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "keyword" => query.keyword = Some(value.into_owned()),
            "area" => query.area = Some(value.into_owned()),
            "prefecture" => query.prefecture = Some(value.into_owned()),
            "brand" | "brands" => query.brands.push(value.into_owned()),
            "sort" => query.sort = StoreSort::parse(&value),
            _ => {}
        }
    }

    query
}

/// Distinct non-empty values in order of first appearance.
fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Store listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/index.html")]
pub struct StoresIndexTemplate {
    pub stores: Vec<StoreView>,
    pub total: usize,
    pub keyword: String,
    pub areas: Vec<Choice>,
    pub prefectures: Vec<Choice>,
    pub brands: Vec<Choice>,
    pub sorts: Vec<Choice>,
    pub error: Option<&'static str>,
}

impl StoresIndexTemplate {
    /// Build the page for `query` over the full record set `all`.
    ///
    /// Filter options are derived from `all`; the listing is the query's view
    /// of it.
    #[must_use]
    pub fn new(query: &StoreQuery, all: &[Store], error: Option<&'static str>) -> Self {
        let stores: Vec<StoreView> = query.apply(all).into_iter().map(StoreView::from).collect();

        let current_prefecture = query.prefecture_filter().unwrap_or_default();
        let all_prefectures = Choice::new("", "都道府県", current_prefecture.is_empty());
        let prefectures = std::iter::once(all_prefectures)
            .chain(
                distinct(all.iter().map(|s| s.prefecture.as_str()))
                    .into_iter()
                    .map(|p| Choice::new(p, p, p == current_prefecture)),
            )
            .collect();

        let selected_brands = query.brand_filter();
        let brands = catalog::brands()
            .iter()
            .map(|b| {
                let name = b.name.as_str();
                Choice::new(name, name, selected_brands.contains(&name))
            })
            .collect();

        let sorts = StoreSort::ALL
            .iter()
            .map(|s| Choice::new(s.as_str(), s.label(), *s == query.sort))
            .collect();

        Self {
            total: stores.len(),
            stores,
            keyword: query.keyword.clone().unwrap_or_default(),
            areas: category_choices(listing::categories(all), query.area.as_deref()),
            prefectures,
            brands,
            sorts,
            error,
        }
    }
}

/// Display the store listing.
///
/// Backend failures render the page with an empty list and a generic
/// message.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let query = parse_store_query(raw.as_deref());

    let (stores, error) = match state.directory().list_stores().await {
        Ok(stores) => (stores, None),
        Err(e) => {
            tracing::error!("Failed to fetch stores: {e}");
            (Vec::new(), Some(FETCH_FAILED))
        }
    };

    StoresIndexTemplate::new(&query, &stores, error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_query_repeatable_brand() {
        let query = parse_store_query(Some(
            "brand=POLAR&brand=DIME&area=%E9%96%A2%E8%A5%BF&sort=year-desc",
        ));
        assert_eq!(query.brands, vec!["POLAR", "DIME"]);
        assert_eq!(query.area.as_deref(), Some("関西"));
        assert_eq!(query.sort, StoreSort::YearDesc);
    }

    #[test]
    fn test_parse_store_query_lenient() {
        let query = parse_store_query(Some("sort=price&page=2&keyword=+shop"));
        assert_eq!(query.sort, StoreSort::NameAsc);
        // '+' decodes to a space and the keyword is kept untrimmed
        assert_eq!(query.keyword.as_deref(), Some(" shop"));
        assert_eq!(parse_store_query(None), StoreQuery::default());
    }

    #[test]
    fn test_template_options() {
        let all = catalog::sample_stores();
        let query = StoreQuery {
            area: Some("関西".to_string()),
            brands: vec!["POLAR".to_string()],
            ..Default::default()
        };
        let page = StoresIndexTemplate::new(&query, &all, None);

        assert!(page.stores.iter().all(|s| s.area == "関西"));
        assert_eq!(page.total, page.stores.len());
        let selected = |choices: &[Choice]| -> Vec<String> {
            choices
                .iter()
                .filter(|c| c.selected)
                .map(|c| c.value.clone())
                .collect()
        };
        let selected_area = selected(&page.areas);
        assert_eq!(selected_area, vec!["関西"]);
        let selected_brands = selected(&page.brands);
        assert_eq!(selected_brands, vec!["POLAR"]);
        assert!(page.prefectures.first().unwrap().selected);
    }

    #[test]
    fn test_template_renders_error() {
        let page = StoresIndexTemplate::new(&StoreQuery::default(), &[], Some(FETCH_FAILED));
        let html = page.render().unwrap();
        assert!(html.contains(FETCH_FAILED));
    }
}
