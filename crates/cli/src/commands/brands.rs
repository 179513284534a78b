//! Brand catalog lookups.

use dabot_core::{Brand, catalog};

use super::Output;

/// Error for unknown brand identifiers.
#[derive(Debug, thiserror::Error)]
#[error("Brand not found: {0}")]
pub struct BrandNotFound(String);

fn describe(brand: &Brand) -> String {
    format!(
        "{:<10} {:<10} {} / {} / {}",
        brand.id.as_str(), brand.name, brand.category, brand.origin, brand.established
    )
}

/// List the catalog in display order.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn list(output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let brands = catalog::brands();
    output.emit(brands, brands.iter().map(describe))?;
    Ok(())
}

/// Show one brand, matched case-insensitively.
///
/// # Errors
///
/// Returns [`BrandNotFound`] for unknown identifiers.
pub fn show(output: Output, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let brand = lookup(id)?;
    output.emit(
        brand,
        [
            describe(brand),
            brand.name_ja.clone(),
            brand.long_description.clone(),
        ],
    )?;
    Ok(())
}

fn lookup(id: &str) -> Result<&'static Brand, BrandNotFound> {
    catalog::find_brand(id).ok_or_else(|| BrandNotFound(id.to_string()))
}
