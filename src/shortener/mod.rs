//! Shortener Module
//!
//! Turns saved links into Rebrandly short links, one at a time or in
//! batches. Every upstream call is bracketed by a request and a response
//! entry in the `api_logs` audit table.
//!
//! # Usage
//!
//! ```rust,ignore
//! use linkshelf::shortener::{RebrandlyClient, Shortener};
//!
//! let client = RebrandlyClient::new("https://api.rebrandly.com", Duration::from_secs(30))?;
//! let summary = Shortener::new(&db, &client, Duration::from_secs(1))
//!     .shorten_links("local", &[1, 2, 3])
//!     .await?;
//! ```

mod audit;
mod client;
mod handler;
mod routes;
mod service;

pub use audit::*;
pub use client::*;
pub use routes::routes;
pub use service::*;

pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[("shortener_001_api_logs.sql", include_str!("migrations/001_api_logs.sql"))]
}
