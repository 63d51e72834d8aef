//! Middleware: session management and admin auth extractors.

pub mod auth;
pub mod session;

pub use auth::{OptionalAdmin, RequireAdmin, clear_current_admin, set_current_admin};
pub use session::SESSION_COOKIE_NAME;
