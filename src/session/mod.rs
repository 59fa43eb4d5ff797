//! Session Manager
//!
//! Restores persisted cookies into the browser and falls back to a single
//! interactive login when the site rejects them.

pub mod cookie;
pub mod manager;
pub mod store;

pub use cookie::{Session, SessionCookie, SessionOrigin};
pub use manager::SessionManager;
pub use store::{FileSessionStore, SessionStore};
