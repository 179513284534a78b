//! Audit store records for brand references that are not exact catalog names.
//!
//! Records are read from a YAML or JSON file when one is given, otherwise
//! from the configured backend. The command fails when any reference is
//! unmatched so it can gate data imports.

use std::path::Path;

use dabot_core::{Store, catalog};
use thiserror::Error;
use tracing::{info, warn};

use super::Output;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Unsupported file extension for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("{0} unmatched brand reference(s) found")]
    Unmatched(usize),
}

/// File formats accepted for store records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordFormat {
    Yaml,
    Json,
}

impl RecordFormat {
    fn from_path(path: &Path) -> Result<Self, AuditError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(AuditError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse a store record list.
fn parse_records(
    content: &str,
    format: RecordFormat,
) -> Result<Vec<Store>, Box<dyn std::error::Error>> {
    let stores: Vec<Store> = match format {
        RecordFormat::Yaml => serde_yaml::from_str(content)?,
        RecordFormat::Json => serde_json::from_str(content)?,
    };
    Ok(stores)
}

async fn load(file: Option<&Path>) -> Result<Vec<Store>, Box<dyn std::error::Error>> {
    match file {
        Some(path) => {
            let format = RecordFormat::from_path(path)?;
            info!(path = %path.display(), "Loading store records from file");
            let content = tokio::fs::read_to_string(path).await?;
            parse_records(&content, format)
        }
        None => Ok(super::directory()?.list_stores().await?),
    }
}

/// Run the audit.
///
/// # Errors
///
/// Returns an error if records cannot be loaded, or [`AuditError::Unmatched`]
/// when any store references a brand missing from the catalog.
pub async fn run(output: Output, file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let stores = load(file).await?;
    let unmatched = catalog::unmatched_brand_references(&stores);

    info!(
        stores = stores.len(),
        unmatched = unmatched.len(),
        "Audited brand references"
    );

    let report: Vec<_> = unmatched
        .iter()
        .map(|u| {
            serde_json::json!({
                "storeId": u.store_id,
                "brand": u.brand,
                "expected": u.expected,
            })
        })
        .collect();
    output.emit(&report, unmatched.iter().map(ToString::to_string))?;

    if unmatched.is_empty() {
        return Ok(());
    }
    for u in &unmatched {
        warn!(
            store_id = %u.store_id,
            brand = %u.brand,
            expected = u.expected,
            "Unmatched brand reference"
        );
    }
    Err(AuditError::Unmatched(unmatched.len()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const YAML: &str = r"
- id: night-shop
  name: NIGHT SHOP
  area: 九州
  prefecture: 福岡県
  brands: [POLAR, HOCKEY]
- id: coverage
  name: COVERAGE
  brands: [dime]
";

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RecordFormat::from_path(Path::new("stores.YML")).unwrap(),
            RecordFormat::Yaml
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("data/stores.json")).unwrap(),
            RecordFormat::Json
        );
        assert!(RecordFormat::from_path(Path::new("stores.csv")).is_err());
        assert!(RecordFormat::from_path(Path::new("stores")).is_err());
    }

    #[test]
    fn test_parse_yaml_records() {
        let stores = parse_records(YAML, RecordFormat::Yaml).unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores.first().unwrap().prefecture, "福岡県");
        assert_eq!(stores.last().unwrap().open_year, None);
    }

    #[test]
    fn test_unmatched_found_in_yaml() {
        let stores = parse_records(YAML, RecordFormat::Yaml).unwrap();
        let unmatched = catalog::unmatched_brand_references(&stores);
        let found: Vec<_> = unmatched
            .iter()
            .map(|u| (u.brand.as_str(), u.expected))
            .collect();
        assert_eq!(found, vec![("HOCKEY", None), ("dime", Some("DIME"))]);
    }

    #[test]
    fn test_parse_json_records() {
        let json = r#"[{"id": "x", "name": "X", "openYear": 1999, "brands": ["FTC"]}]"#;
        let stores = parse_records(json, RecordFormat::Json).unwrap();
        assert_eq!(stores.first().unwrap().open_year, Some(1999));
    }
}
