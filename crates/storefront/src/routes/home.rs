//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use dabot_core::{Brand, catalog};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

use super::views::brand_href;

/// A brand tile in the home page strip.
pub struct BrandTile {
    pub name: &'static str,
    pub image: &'static str,
    pub href: String,
}

impl From<&'static Brand> for BrandTile {
    fn from(brand: &'static Brand) -> Self {
        Self {
            name: &brand.name,
            image: &brand.image,
            href: brand_href(brand),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub brands: Vec<BrandTile>,
    /// `None` when the directory could not be loaded.
    pub store_count: Option<usize>,
}

/// Display home page with the brand strip and store count.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let store_count = match state.directory().list_stores().await {
        Ok(stores) => Some(stores.len()),
        Err(e) => {
            tracing::error!("Failed to fetch stores for home page: {e}");
            None
        }
    };

    HomeTemplate {
        brands: catalog::brands().iter().map(BrandTile::from).collect(),
        store_count,
    }
}
