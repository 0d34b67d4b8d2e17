//! Site build orchestration.

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{copy_dir, publish_logo, write_css_assets};
use crate::content::{self, Page};
use crate::markdown::{MarkdownRenderer, Pipeline};
use crate::pages::{self, SiteContext};
use crate::path::output_path;
use crate::site::SiteConfig;

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub external_links: usize,
    /// Sidebar slugs with no matching page.
    pub missing_slugs: Vec<String>,
    pub index: PathBuf,
}

/// Builds the site into `output`.
///
/// Writes the stylesheet, copies the public directory and logo, renders
/// every markdown page through the standard pipeline and writes the
/// `404.html` page.
///
/// # Arguments
///
/// * `project_dir`: Project root holding content and public directories
/// * `output`: Output directory, created if missing
/// * `config`: Validated site configuration
///
/// # Errors
///
/// Returns error if any page fails to render or any file cannot be
/// written. The error names the failing source file.
pub fn build(project_dir: &Path, output: &Path, config: &SiteConfig) -> Result<BuildReport> {
    let origin = config.origin().context("Invalid site origin")?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    write_css_assets(&output.join("assets"))?;

    let public = project_dir.join(&config.public_dir);
    if public.is_dir() {
        let copied = copy_dir(&public, output).context("Failed to copy public directory")?;
        debug!("Copied {} public files", copied);
    }

    let logo_url = config
        .logo
        .as_ref()
        .map(|logo| publish_logo(project_dir, &config.public_dir, output, &config.base, logo))
        .transpose()
        .context("Failed to publish logo")?;

    let content_dir = project_dir.join(&config.content_dir);
    let pages = content::discover(&content_dir)?;
    if pages.is_empty() {
        warn!("No markdown pages found in {}", content_dir.display());
    }

    let missing_slugs = missing_sidebar_slugs(config, &pages);
    for slug in &missing_slugs {
        warn!("Sidebar entry '{}' matches no page", slug);
    }

    let site = SiteContext {
        config,
        origin: &origin,
        logo_url: logo_url.as_deref(),
    };
    let renderer = MarkdownRenderer::new(Pipeline::standard(&config.markdown));
    debug!("Pipeline: {}", renderer.pipeline().names().join(", "));

    let mut external_links = 0;
    for page in &pages {
        external_links += write_page(&renderer, &site, page, output)?;
    }

    let not_found = output.join("404.html");
    fs::write(&not_found, pages::not_found::generate(&site).into_string())
        .with_context(|| format!("Failed to write {}", not_found.display()))?;

    info!(
        "Rendered {} pages with {} external links",
        pages.len(),
        external_links
    );

    Ok(BuildReport {
        pages: pages.len(),
        external_links,
        missing_slugs,
        index: output.join(output_path("")),
    })
}

/// Renders one page and returns its external link count.
fn write_page(
    renderer: &MarkdownRenderer,
    site: &SiteContext<'_>,
    page: &Page,
    output: &Path,
) -> Result<usize> {
    let rendered = renderer.render_file(&page.source, site.origin, &site.config.base)?;

    let title = match (&rendered.front_matter.title, page.slug.is_empty()) {
        (Some(title), _) => title.clone(),
        (None, true) => site.config.title.clone(),
        (None, false) => {
            bail!("Missing title in front matter: {}", page.source.display())
        }
    };

    let html = pages::doc::generate(site, &page.slug, &title, &rendered);

    let target = output.join(output_path(&page.slug));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&target, html.into_string())
        .with_context(|| format!("Failed to write page: {}", target.display()))?;

    debug!(
        "{} -> {} ({} external links)",
        page.source.display(),
        target.display(),
        rendered.external_links
    );

    Ok(rendered.external_links)
}

fn missing_sidebar_slugs(config: &SiteConfig, pages: &[Page]) -> Vec<String> {
    let known: HashSet<&str> = pages.iter().map(|page| page.slug.as_str()).collect();
    config
        .sidebar_slugs()
        .into_iter()
        .filter(|slug| !known.contains(slug))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(toml_extra: &str) -> SiteConfig {
        SiteConfig::from_toml(&format!(
            "title = \"Docs\"\nsite = \"https://example.com\"\nbase = \"/docs\"\n{}",
            toml_extra
        ))
        .expect("Should parse config")
    }

    fn write(dir: &Path, path: &str, content: &str) -> Result<()> {
        let path = dir.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    #[test]
    fn test_build_writes_pages() -> Result<()> {
        // Arrange
        let project = TempDir::new()?;
        let output = TempDir::new()?;
        write(
            project.path(),
            "src/content/docs/index.md",
            "# Welcome\n\n[x](https://example.org)\n",
        )?;
        write(
            project.path(),
            "src/content/docs/guide.md",
            "---\ntitle: Guide\n---\n\n[home](/docs/)\n",
        )?;

        // Act
        let report = build(project.path(), output.path(), &config(""))?;

        // Assert
        assert_eq!(report.pages, 2);
        assert_eq!(report.external_links, 1);
        assert!(output.path().join("index.html").is_file());
        assert!(output.path().join("guide/index.html").is_file());
        assert!(output.path().join("404.html").is_file());
        assert!(output.path().join("assets/site.css").is_file());
        Ok(())
    }

    #[test]
    fn test_build_missing_title_fails() -> Result<()> {
        // Arrange
        let project = TempDir::new()?;
        let output = TempDir::new()?;
        write(project.path(), "src/content/docs/untitled.md", "No front matter\n")?;

        // Act
        let result = build(project.path(), output.path(), &config(""));

        // Assert
        let err = result.expect_err("Page without title should fail");
        assert!(format!("{:#}", err).contains("untitled.md"), "{:#}", err);
        Ok(())
    }

    #[test]
    fn test_missing_sidebar_slugs_reported() -> Result<()> {
        // Arrange
        let project = TempDir::new()?;
        let output = TempDir::new()?;
        write(project.path(), "src/content/docs/index.md", "Home\n")?;
        let config = config(
            "[[sidebar]]\nlabel = \"Guides\"\nitems = [{ label = \"Gone\", slug = \"gone\" }]\n",
        );

        // Act
        let report = build(project.path(), output.path(), &config)?;

        // Assert
        assert_eq!(report.missing_slugs, vec!["gone".to_string()]);
        Ok(())
    }
}
