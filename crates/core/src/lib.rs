//! DABOT Core - Shared types, brand catalog and listing engine.
//!
//! This crate provides the pieces shared by every DABOT component:
//! - `storefront` - Public directory site and JSON API
//! - `cli` - Command-line tools for browsing and auditing directory data
//!
//! # Architecture
//!
//! The core crate contains only types, static data and pure functions - no
//! I/O, no HTTP clients. This keeps the filter/sort logic testable in
//! isolation from any rendering or transport concern.
//!
//! # Modules
//!
//! - [`types`] - Store and brand records with newtype IDs
//! - [`catalog`] - Static brand catalog and the bundled store fixture
//! - [`listing`] - Generic keyword/category filter and sort engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod listing;
pub mod types;

pub use listing::{BrandQuery, BrandSort, StoreQuery, StoreSort};
pub use types::*;
