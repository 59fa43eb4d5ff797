//! Profile Fetcher
//!
//! Turns a profile URL into a `RawProfileBundle`: main page (after lazy-load
//! scrolling and section expansion), contact-info overlay, and the skills and
//! experience sub-pages.

pub mod bundle;
pub mod locators;
pub mod profile;

pub use bundle::{RawProfileBundle, StepOutcome};
pub use profile::ProfileFetcher;
