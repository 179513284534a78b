//! JSON API handlers.
//!
//! Store endpoints always answer with a `stores` array; on backend failure
//! it is empty and an `error` field is added (status 500).

use axum::{
    Json,
    body::Bytes,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Response},
};
use dabot_core::{Brand, Store, StoreQuery, StoreSort, catalog};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::{ApiError, AppError, add_breadcrumb, stores_unavailable};
use crate::state::AppState;

use super::brands::parse_brand_query;

#[derive(Debug, Serialize)]
pub struct StoresResponse {
    pub stores: Vec<Store>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<&'static Brand>,
}

/// A store search request body.
///
/// `{"keyword"?, "area"?, "prefecture"?, "brands"?, "sort"?, "seq"?}`.
/// Fields with the wrong JSON type are ignored, which disables the
/// corresponding filter. A body that is not a JSON object searches
/// everything.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: StoreQuery,
    /// Client sequence number, echoed back in the response.
    pub seq: Option<u64>,
}

impl SearchRequest {
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);

        let brands = value
            .get("brands")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            query: StoreQuery {
                keyword: text("keyword"),
                area: text("area"),
                prefecture: text("prefecture"),
                brands,
                sort: text("sort").map_or_else(StoreSort::default, |s| StoreSort::parse(&s)),
            },
            seq: value.get("seq").and_then(Value::as_u64),
        }
    }

    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(|value| Self::from_json(&value))
            .unwrap_or_default()
    }
}

/// `GET /api/stores`: every store record.
#[instrument(skip(state))]
pub async fn list_stores(State(state): State<AppState>) -> Response {
    match state.directory().list_stores().await {
        Ok(stores) => Json(StoresResponse { stores, seq: None }).into_response(),
        Err(e) => stores_unavailable(e, None),
    }
}

/// `POST /api/stores/search`: stores matching the request body.
#[instrument(skip(state, body))]
pub async fn search_stores(State(state): State<AppState>, body: Bytes) -> Response {
    let SearchRequest { query, seq } = SearchRequest::from_body(&body);

    let keyword = query.keyword.clone().unwrap_or_default();
    add_breadcrumb("search", "Store search", Some(&[("keyword", keyword.as_str())]));

    match state.directory().search_stores(&query).await {
        Ok(stores) => Json(StoresResponse { stores, seq }).into_response(),
        Err(e) => stores_unavailable(e, seq),
    }
}

/// `GET /api/brands`: catalog brands, filtered and sorted like the page.
#[instrument]
pub async fn list_brands(RawQuery(raw): RawQuery) -> Json<BrandsResponse> {
    let query = parse_brand_query(raw.as_deref());
    Json(BrandsResponse {
        brands: query.apply(catalog::brands()),
    })
}

/// `GET /api/brands/{id}`: one brand, matched case-insensitively.
///
/// # Errors
///
/// Returns 404 `{"error": "Brand not found"}` for unknown identifiers.
#[instrument]
pub async fn show_brand(Path(id): Path<String>) -> Result<Json<&'static Brand>, ApiError> {
    catalog::find_brand(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_full() {
        let request = SearchRequest::from_json(&json!({
            "keyword": "shop",
            "area": "関西",
            "brands": ["POLAR", "DIME"],
            "sort": "brands-desc",
            "seq": 7
        }));
        assert_eq!(request.query.keyword.as_deref(), Some("shop"));
        assert_eq!(request.query.brands, vec!["POLAR", "DIME"]);
        assert_eq!(request.query.sort, StoreSort::BrandsDesc);
        assert_eq!(request.seq, Some(7));
    }

    #[test]
    fn test_search_request_wrong_types_disable_filters() {
        let request = SearchRequest::from_json(&json!({
            "keyword": 42,
            "area": ["関西"],
            "brands": "POLAR",
            "seq": "seven"
        }));
        assert!(request.query.is_unfiltered());
        assert_eq!(request.seq, None);
    }

    #[test]
    fn test_search_request_invalid_body() {
        assert_eq!(SearchRequest::from_body(b"not json"), SearchRequest::default());
        assert_eq!(SearchRequest::from_body(b""), SearchRequest::default());
    }
}
