//! Core types for DABOT.
//!
//! This module provides type-safe wrappers and records for the directory's
//! domain concepts.

pub mod brand;
pub mod id;
pub mod store;

pub use brand::Brand;
pub use id::*;
pub use store::Store;
