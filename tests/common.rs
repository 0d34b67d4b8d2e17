//! Shared test utilities for integration tests.
//!
//! Provides helpers for creating temporary documentation projects used
//! across multiple test files.

#![allow(dead_code)]

use anyhow::Result;
use std::path::Path;
use tempfile::TempDir;

/// Site configuration mirroring the Piccione documentation site.
pub const PICCIONE_CONFIG: &str = r#"
title = "Piccione"
description = "A Python toolkit for uploading and downloading data to external repositories and cloud services."
site = "https://arcangelo7.github.io"
base = "/piccione"

[logo]
src = "./public/piccione.svg"
alt = "Piccione logo"

[[social]]
icon = "github"
label = "GitHub"
href = "https://github.com/arcangelo7/piccione"

[[sidebar]]
label = "Guides"
items = [{ label = "Getting started", slug = "getting_started" }]

[markdown.external_links]
target = "_blank"
rel = ["noopener", "noreferrer"]
"#;

/// Creates temporary project with site configuration and logo.
///
/// # Errors
///
/// Returns error if directory creation or file writes fail
pub fn create_test_project() -> Result<TempDir> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "site.toml", PICCIONE_CONFIG)?;
    write_file(dir.path(), "public/piccione.svg", "<svg/>")?;
    Ok(dir)
}

/// Writes file to project, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(root: &Path, path: &str, content: &str) -> Result<()> {
    let file_path = root.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Writes markdown page under the default content directory.
///
/// # Errors
///
/// Returns error if the file cannot be written
pub fn write_page(root: &Path, slug_path: &str, content: &str) -> Result<()> {
    write_file(root, &format!("src/content/docs/{}", slug_path), content)
}
