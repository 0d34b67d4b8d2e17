//! Static asset bundling and copying

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::path::join_base;
use crate::site::Logo;

const BASE: &str = include_str!("../assets/base.css");
const LAYOUT: &str = include_str!("../assets/layout.css");
const MARKDOWN: &str = include_str!("../assets/markdown.css");

/// Writes bundled stylesheet to `assets_dir/site.css`
pub fn write_css_assets(assets_dir: &Path) -> Result<()> {
    fs::create_dir_all(assets_dir).context("Failed to create assets directory")?;
    write_bundled(assets_dir, "site.css", &[BASE, LAYOUT, MARKDOWN])
}

fn write_bundled(dir: &Path, name: &str, parts: &[&str]) -> Result<()> {
    let css = parts.join("\n");
    fs::write(dir.join(name), css)
        .with_context(|| format!("Failed to write CSS asset: {}", name))?;
    Ok(())
}

/// Copies directory tree verbatim into `output`
///
/// When `output` lies inside `source` it is skipped, so rebuilding never
/// copies previous output into itself.
///
/// # Returns
///
/// Number of files copied
///
/// # Errors
///
/// Returns error if a file cannot be read or written
pub fn copy_dir(source: &Path, output: &Path) -> Result<usize> {
    let nested_output = nested_path(source, output);
    let mut copied = 0;

    let walker = WalkDir::new(source).into_iter().filter_entry(|entry| {
        nested_output
            .as_deref()
            .is_none_or(|nested| entry.path().strip_prefix(source).ok() != Some(nested))
    });

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .context("Entry outside source directory")?;
        let target = output.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Location of `inner` relative to `outer` when it lies inside it.
fn nested_path(outer: &Path, inner: &Path) -> Option<PathBuf> {
    let outer = outer.canonicalize().ok()?;
    let inner = inner.canonicalize().ok()?;
    inner.strip_prefix(&outer).ok().map(Path::to_path_buf)
}

/// Publishes configured logo and returns its URL
///
/// Logos inside the public directory are already copied with it and are
/// served from their relative location. Others are copied into
/// `assets/`.
///
/// # Arguments
///
/// * `project_dir`: Project root logo paths are relative to
/// * `public_dir`: Public directory (absolute or project relative)
/// * `output`: Output directory
/// * `base`: Deployment base path
/// * `logo`: Logo configuration
///
/// # Errors
///
/// Returns error if the logo file is missing or cannot be copied
pub fn publish_logo(
    project_dir: &Path,
    public_dir: &Path,
    output: &Path,
    base: &str,
    logo: &Logo,
) -> Result<String> {
    let source = project_dir.join(&logo.src);
    if !source.is_file() {
        bail!("Logo file does not exist: {}", source.display());
    }

    let public = project_dir.join(public_dir);
    if let Ok(relative) = source.strip_prefix(&public) {
        let relative = relative
            .to_str()
            .context("Logo path contains invalid UTF8")?
            .replace('\\', "/");
        return Ok(join_base(base, &relative));
    }

    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid logo file name: {}", source.display()))?;

    let assets_dir = output.join("assets");
    fs::create_dir_all(&assets_dir).context("Failed to create assets directory")?;
    fs::copy(&source, assets_dir.join(file_name))
        .with_context(|| format!("Failed to copy logo {}", source.display()))?;

    Ok(join_base(base, &format!("assets/{}", file_name)))
}
