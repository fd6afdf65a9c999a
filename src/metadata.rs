//! Display metadata derived from nothing but the URL string.
//!
//! No page is fetched: the title comes from the last path segment (or the
//! domain) and the favicon from Google's favicon service.

use serde::Serialize;
use url::Url;

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";
const STRIPPED_EXTENSIONS: &[&str] = &[".html", ".php", ".aspx", ".asp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMetadata {
    pub title: String,
    pub favicon: Option<String>,
}

pub fn fetch_link_metadata(raw: &str) -> LinkMetadata {
    let fallback = || LinkMetadata {
        title: raw.to_string(),
        favicon: None,
    };

    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(_) => return fallback(),
    };
    let domain = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.replacen("www.", "", 1),
        _ => return fallback(),
    };

    let mut title = domain.clone();
    if parsed.path() != "/" {
        if let Some(segment) = parsed.path().split('/').filter(|s| !s.is_empty()).last() {
            title = title_from_segment(segment);
        }
    }
    if title.is_empty() {
        title = domain.clone();
    }

    LinkMetadata {
        title,
        favicon: Some(format!(
            "{}?domain={}&sz=32",
            FAVICON_SERVICE,
            urlencoding::encode(&domain)
        )),
    }
}

fn title_from_segment(segment: &str) -> String {
    let mut spaced = segment.replace(['-', '_'], " ");

    let lower = spaced.to_ascii_lowercase();
    if let Some(ext) = STRIPPED_EXTENSIONS.iter().find(|ext| lower.ends_with(*ext)) {
        spaced.truncate(spaced.len() - ext.len());
    }

    spaced
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trims the input and defaults a missing http(s) scheme to `https://`.
/// Returns `None` for blank input.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favicon_for(domain: &str) -> Option<String> {
        Some(format!("https://www.google.com/s2/favicons?domain={}&sz=32", domain))
    }

    #[test]
    fn test_domain_only_url_uses_domain_as_title() {
        let meta = fetch_link_metadata("https://example.com");
        assert_eq!(meta.title, "example.com");
        assert_eq!(meta.favicon, favicon_for("example.com"));
    }

    #[test]
    fn test_title_from_last_path_segment() {
        let meta = fetch_link_metadata("https://example.com/my-article");
        assert_eq!(meta.title, "My Article");

        let meta = fetch_link_metadata("https://blog.example.com/category/my_blog-post/");
        assert_eq!(meta.title, "My Blog Post");
        assert_eq!(meta.favicon, favicon_for("blog.example.com"));
    }

    #[test]
    fn test_file_extensions_are_dropped() {
        assert_eq!(fetch_link_metadata("https://example.com/document.html").title, "Document");
        assert_eq!(fetch_link_metadata("https://example.com/index.PHP").title, "Index");
        assert_eq!(fetch_link_metadata("https://example.com/old-page.aspx").title, "Old Page");
        assert_eq!(fetch_link_metadata("https://example.com/report.pdf").title, "Report.pdf");
    }

    #[test]
    fn test_www_prefix_is_removed() {
        let meta = fetch_link_metadata("https://www.example.com");
        assert_eq!(meta.title, "example.com");
        assert_eq!(meta.favicon, favicon_for("example.com"));
    }

    #[test]
    fn test_invalid_url_falls_back_to_input() {
        let meta = fetch_link_metadata("not-a-url");
        assert_eq!(meta.title, "not-a-url");
        assert_eq!(meta.favicon, None);
    }

    #[test]
    fn test_extension_only_segment_falls_back_to_domain() {
        assert_eq!(fetch_link_metadata("https://example.com/.html").title, "example.com");
    }

    #[test]
    fn test_percent_escapes_are_kept_in_title() {
        assert_eq!(fetch_link_metadata("https://x.dev/caf%C3%A9").title, "Caf%C3%A9");
        assert_eq!(fetch_link_metadata("https://x.dev/a%20b-c").title, "A%20b C");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("  example.com "), Some("https://example.com".to_string()));
        assert_eq!(normalize_url("HTTP://Example.com"), Some("HTTP://Example.com".to_string()));
        assert_eq!(normalize_url("https://a.dev/x"), Some("https://a.dev/x".to_string()));
        assert_eq!(normalize_url("   "), None);
    }
}
