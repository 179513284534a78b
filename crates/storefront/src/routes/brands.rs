//! Brand listing and brand detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dabot_core::{Brand, BrandQuery, BrandSort, StoreQuery, catalog};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

use super::stores::FETCH_FAILED;
use super::views::{Choice, StoreView, brand_href, category_choices};

/// Parse a brand query from a raw query string.
///
/// Accepts `keyword`, `category` and `sort`; the last occurrence of a
/// repeated parameter wins.
#[must_use]
pub fn parse_brand_query(raw: Option<&str>) -> BrandQuery {
    let mut query = BrandQuery::default();
    let raw = raw.unwrap_or_default();

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "keyword" => query.keyword = Some(value.into_owned()),
            "category" => query.category = Some(value.into_owned()),
            "sort" => query.sort = BrandSort::parse(&value),
            _ => {}
        }
    }

    query
}

/// Brand display data for templates.
pub struct BrandView {
    pub brand: &'static Brand,
    pub href: String,
}

impl From<&'static Brand> for BrandView {
    fn from(brand: &'static Brand) -> Self {
        Self {
            brand,
            href: brand_href(brand),
        }
    }
}

/// Brand listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "brands/index.html")]
pub struct BrandsIndexTemplate {
    pub brands: Vec<BrandView>,
    pub keyword: String,
    pub categories: Vec<Choice>,
    pub sorts: Vec<Choice>,
}

impl BrandsIndexTemplate {
    #[must_use]
    pub fn new(query: &BrandQuery) -> Self {
        let brands = query
            .apply(catalog::brands())
            .into_iter()
            .map(BrandView::from)
            .collect();

        let sorts = BrandSort::ALL
            .iter()
            .map(|s| Choice::new(s.as_str(), s.label(), *s == query.sort))
            .collect();

        Self {
            brands,
            keyword: query.keyword.clone().unwrap_or_default(),
            categories: category_choices(catalog::brand_categories(), query.category.as_deref()),
            sorts,
        }
    }
}

/// Brand detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "brands/show.html")]
pub struct BrandShowTemplate {
    pub brand: &'static Brand,
    /// Stores carrying the brand.
    pub stores: Vec<StoreView>,
    pub stores_href: String,
    pub error: Option<&'static str>,
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub message: String,
}

/// Display the brand listing.
#[instrument]
pub async fn index(RawQuery(raw): RawQuery) -> impl IntoResponse {
    BrandsIndexTemplate::new(&parse_brand_query(raw.as_deref()))
}

/// Display a brand and the stores carrying it.
///
/// The identifier is matched case-insensitively; unknown brands get a 404.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(brand) = catalog::find_brand(&id) else {
        return (
            StatusCode::NOT_FOUND,
            NotFoundTemplate {
                message: "ブランドが見つかりませんでした".to_string(),
            },
        )
            .into_response();
    };

    let query = StoreQuery {
        brands: vec![brand.name.clone()],
        ..Default::default()
    };

    let (stores, error) = match state.directory().search_stores(&query).await {
        Ok(stores) => (stores.iter().map(StoreView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch stores for brand {}: {e}", brand.id);
            (Vec::new(), Some(FETCH_FAILED))
        }
    };

    BrandShowTemplate {
        brand,
        stores,
        stores_href: format!("/stores?brand={}", urlencoding::encode(&brand.name)),
        error,
    }
    .into_response()
}
