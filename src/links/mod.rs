//! Links Module
//!
//! The bookmark store: saved URLs with their tags, display metadata and
//! shortening state. Every operation is scoped to the calling user except
//! short-code resolution, which serves public redirects.
//!
//! # Usage
//!
//! ```rust,ignore
//! use linkshelf::links;
//!
//! let app = Router::new()
//!     .merge(links::routes())
//!     .with_state(app_state);
//!
//! let store = links::LinkStore::new(&db);
//! let page = store.list("local", &params).await?;
//! ```

mod handler;
mod routes;
mod store;

pub use routes::routes;
pub use store::*;

pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[("links_001_schema.sql", include_str!("migrations/001_schema.sql"))]
}

/// Trims tags, strips control characters and drops empties and repeats,
/// keeping the first occurrence's position.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let cleaned: String = tag.as_ref().chars().filter(|c| !c.is_control()).collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || out.iter().any(|t| t == cleaned) {
            continue;
        }
        out.push(cleaned.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["  rust ", "", "web", "rust", "re\u{1f}ad", "\t"]);
        assert_eq!(tags, vec!["rust", "web", "read"]);
    }
}
