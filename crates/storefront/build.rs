//! Build script for the directory site crate.
//!
//! Generates a content hash for the stylesheet, used as a cache-busting
//! query parameter on the stylesheet link.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    if let Err(e) = hash_css() {
        println!("cargo:warning=Could not hash main.css: {e}");
        println!("cargo:rustc-env=CSS_HASH=");
    }
}

/// Hash main.css.
///
/// Sets `CSS_HASH` for use with `env!("CSS_HASH")`.
fn hash_css() -> io::Result<()> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(io::Error::other)?;
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = fs::read(&css_path)?;

    // First 8 hex chars of SHA256
    let digest = Sha256::digest(&content);
    let short_hash: String = format!("{digest:x}").chars().take(8).collect();

    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    Ok(())
}
