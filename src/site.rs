//! Site configuration loaded from `site.toml`.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::markdown::{LinkPolicy, SiteOrigin};
use crate::path::normalize_base;

/// Site wide configuration.
///
/// Loaded once per build and passed explicitly to every component that
/// needs it. Never mutated after [`SiteConfig::load`] returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title shown in the header and page titles.
    pub title: String,

    /// Meta description used when a page declares none.
    #[serde(default)]
    pub description: String,

    /// Absolute URL of the deployed site (e.g. `https://example.github.io`).
    pub site: String,

    /// Deployment sub path (e.g. `/docs`).
    #[serde(default = "default_base")]
    pub base: String,

    #[serde(default)]
    pub logo: Option<Logo>,

    #[serde(default)]
    pub social: Vec<SocialLink>,

    #[serde(default)]
    pub sidebar: Vec<SidebarGroup>,

    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Markdown page root, relative to the project directory.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Files copied verbatim to the output root.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_base() -> String {
    "/".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("src/content/docs")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Logo image shown next to the site title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Logo {
    /// Image path relative to the project directory.
    pub src: PathBuf,
    #[serde(default)]
    pub alt: String,
}

/// Header link to an external profile or repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    /// Icon name (e.g. `github`).
    pub icon: String,
    pub label: String,
    pub href: String,
}

/// Labelled group of sidebar entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarGroup {
    pub label: String,
    #[serde(default)]
    pub items: Vec<SidebarItem>,
}

/// Sidebar entry pointing at a page slug or an arbitrary link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarItem {
    pub label: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Resolved destination of a sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTarget<'a> {
    Slug(&'a str),
    Link(&'a str),
}

impl SidebarItem {
    pub fn target(&self) -> Option<SidebarTarget<'_>> {
        match (&self.slug, &self.link) {
            (Some(slug), None) => Some(SidebarTarget::Slug(slug.trim_matches('/'))),
            (None, Some(link)) => Some(SidebarTarget::Link(link)),
            _ => None,
        }
    }
}

/// Markdown processing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Attributes applied to links leaving the site.
    pub external_links: LinkPolicy,
}

impl SiteConfig {
    /// Reads, parses and validates configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or
    /// fails validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Invalid site config: {}", path.display()))
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or validation fails
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.base = normalize_base(&config.base);
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("title must not be empty");
        }

        self.origin().context("site is invalid")?;

        if self.base.split('/').any(|segment| segment == "..") {
            bail!("base must not contain '..': {}", self.base);
        }

        for group in &self.sidebar {
            for item in &group.items {
                if item.target().is_none() {
                    bail!(
                        "Sidebar item '{}' in group '{}' needs exactly one of slug or link",
                        item.label,
                        group.label
                    );
                }
            }
        }

        self.markdown
            .external_links
            .validate()
            .context("markdown.external_links is invalid")?;

        Ok(())
    }

    /// Parses the site origin.
    ///
    /// # Errors
    ///
    /// Returns error if `site` is not an absolute http(s) URL
    pub fn origin(&self) -> Result<SiteOrigin> {
        SiteOrigin::parse(&self.site)
    }

    /// Sidebar slugs in declaration order.
    pub fn sidebar_slugs(&self) -> Vec<&str> {
        self.sidebar
            .iter()
            .flat_map(|group| &group.items)
            .filter_map(|item| match item.target() {
                Some(SidebarTarget::Slug(slug)) => Some(slug),
                _ => None,
            })
            .collect()
    }
}
