//! CLI command implementations.

pub mod audit;
pub mod brands;
pub mod stores;

use std::io::{self, Write};

use dabot_storefront::config::StorefrontConfig;
use dabot_storefront::directory::StoreDirectory;
use serde::Serialize;

/// Where and how command results are written.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Write `value` as pretty JSON when `--json` is set, otherwise one line
    /// per item produced by `lines`.
    pub fn emit<T, I>(self, value: &T, lines: I) -> io::Result<()>
    where
        T: Serialize + ?Sized,
        I: IntoIterator<Item = String>,
    {
        let mut stdout = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        } else {
            for line in lines {
                writeln!(stdout, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Build the store directory from the same environment as the site.
fn directory() -> Result<StoreDirectory, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let directory = StoreDirectory::from_config(&config);
    tracing::info!(
        source = directory.source_name(),
        strategy = ?directory.strategy(),
        "Loaded directory configuration"
    );
    Ok(directory)
}
