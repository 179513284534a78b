//! Store listing and search.

use dabot_core::{Store, StoreQuery};
use tracing::info;

use super::Output;

/// One plain-text line per store.
fn describe(store: &Store) -> String {
    let year = store
        .open_year
        .map_or_else(String::new, |y| format!(" ({y})"));
    format!(
        "{:<20} {} / {} {}{year}  [{}]",
        store.id.as_str(),
        store.area,
        store.prefecture,
        store.name,
        store.brands.join(", ")
    )
}

fn print(output: Output, stores: &[Store]) -> std::io::Result<()> {
    output.emit(stores, stores.iter().map(describe))
}

/// List every store in the configured backend.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the backend fails.
pub async fn list(output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let stores = super::directory()?.list_stores().await?;
    info!(count = stores.len(), "Listed stores");
    print(output, &stores)?;
    Ok(())
}

/// Search stores with the same semantics as the site and JSON API.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the backend fails.
pub async fn search(output: Output, query: &StoreQuery) -> Result<(), Box<dyn std::error::Error>> {
    let stores = super::directory()?.search_stores(query).await?;
    info!(count = stores.len(), sort = query.sort.as_str(), "Searched stores");
    print(output, &stores)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dabot_core::catalog;

    #[test]
    fn test_describe_includes_location_and_brands() {
        let store = catalog::sample_stores()
            .into_iter()
            .find(|s| s.id.as_str() == "coverage")
            .unwrap();
        let line = describe(&store);
        assert!(line.starts_with("coverage"));
        assert!(line.contains("関西 / 大阪府 COVERAGE (2003)"));
        assert!(line.ends_with("[DIME, POLAR, EVISEN, YARDSALE]"));
    }

    #[test]
    fn test_describe_without_year() {
        let mut store = catalog::sample_stores().into_iter().next().unwrap();
        store.open_year = None;
        assert!(!describe(&store).contains('('));
    }
}
