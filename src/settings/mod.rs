//! Settings Module
//!
//! Per-user Rebrandly credentials, an optional custom short domain and the
//! auto-shorten switch. A user's row is created with defaults the first
//! time it is read.

mod handler;
mod routes;
mod store;

pub use routes::routes;
pub use store::*;

pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[("settings_001_user_settings.sql", include_str!("migrations/001_user_settings.sql"))]
}
