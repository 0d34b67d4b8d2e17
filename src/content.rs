//! Markdown page discovery.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Markdown source mapped to a site slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Slash separated slug, empty for the site root.
    pub slug: String,
    /// Path to the markdown source.
    pub source: PathBuf,
}

/// Lists markdown pages under `content_dir`, sorted by path.
///
/// # Errors
///
/// Returns error if the directory cannot be traversed
pub fn discover(content_dir: &Path) -> Result<Vec<Page>> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(content_dir).sort_by_file_name() {
        let entry = entry.with_context(|| {
            format!("Failed to read content directory: {}", content_dir.display())
        })?;

        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(content_dir)
            .context("Content path outside content directory")?;

        pages.push(Page {
            slug: slug_for(relative)?,
            source: entry.path().to_path_buf(),
        });
    }

    Ok(pages)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Derives slug from a path relative to the content root.
///
/// `index.md` maps to the empty slug, `guides/index.md` to `guides`.
///
/// # Errors
///
/// Returns error if the path contains invalid UTF8
pub fn slug_for(relative: &Path) -> Result<String> {
    let stem = relative.with_extension("");
    let mut components = Vec::new();
    for component in stem.components() {
        let part = component
            .as_os_str()
            .to_str()
            .with_context(|| format!("Path contains invalid UTF8: {}", relative.display()))?;
        components.push(part);
    }

    if components.last() == Some(&"index") {
        components.pop();
    }

    Ok(components.join("/"))
}
