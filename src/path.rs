//! Path and URL utilities for HTML generation

use std::path::PathBuf;

use crate::markdown::SiteOrigin;

/// Normalizes deployment base path.
///
/// Ensures a leading slash and strips trailing slashes, so `docs/`
/// becomes `/docs`. Empty input and `/` both yield `/`.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Joins a site relative path onto the base path.
///
/// # Arguments
///
/// * `base`: Normalized base path
/// * `path`: Path relative to site root (leading slash ignored)
pub fn join_base(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if base == "/" {
        format!("/{}", path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Returns URL of the page with `slug`, with trailing slash.
pub fn page_url(base: &str, slug: &str) -> String {
    if slug.is_empty() {
        join_base(base, "")
    } else {
        join_base(base, &format!("{}/", slug))
    }
}

/// Returns absolute canonical URL of a page.
pub fn canonical_url(origin: &SiteOrigin, base: &str, slug: &str) -> Option<String> {
    origin
        .url()
        .join(&page_url(base, slug))
        .ok()
        .map(String::from)
}

/// Output file for the page with `slug`, relative to output directory.
pub fn output_path(slug: &str) -> PathBuf {
    if slug.is_empty() {
        PathBuf::from("index.html")
    } else {
        PathBuf::from(slug).join("index.html")
    }
}
