//! Configuration module for scrape and search runs
//!
//! This module provides the `ScraperConfig` struct, its type-safe builder and
//! an environment-variable loader.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{ScraperConfigBuilder, WithApiKey};
pub use types::{Credentials, LlmSettings, PageTimings, ScraperConfig};
