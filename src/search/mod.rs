//! Search Orchestrator
//!
//! Turns a free-text people search into a bounded list of extracted
//! profiles, reusing one authenticated page for the search and every
//! profile it visits.

pub mod links;
pub mod orchestrator;
pub mod phase;
pub mod query;

pub use links::collect_profile_links;
pub use orchestrator::{ProfileFailure, SearchOrchestrator, SearchReport};
pub use phase::SearchPhase;
pub use query::SearchQuery;
