//! Markdown rendering with GitHub Flavored Markdown support.

use anyhow::{Context, Result};
use comrak::nodes::NodeValue;
use comrak::{Arena, Options};
use serde::Deserialize;
use std::path::Path;
use syntect::parsing::SyntaxSet;

use super::convert::Converter;
use super::headings::{self, Heading};
use super::links::{ExternalLinks, SiteOrigin};
use super::pipeline::{Pipeline, TransformContext};

/// Page metadata declared between `---` delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Result of rendering one markdown document.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub front_matter: FrontMatter,
    /// Serialized document body.
    pub html: String,
    /// `h2`/`h3` outline for the table of contents.
    pub headings: Vec<Heading>,
    /// Number of links classified as external.
    pub external_links: usize,
}

/// Renders markdown to HTML through the transformation pipeline.
///
/// Parses with comrak (tables, strikethrough, autolinks, front matter,
/// smart punctuation), converts the AST to an HTML tree, runs every
/// registered transformation and serializes the result. Code blocks with
/// a known language are highlighted with syntect using CSS classes.
pub struct MarkdownRenderer {
    options: Options<'static>,
    syntax_set: SyntaxSet,
    pipeline: Pipeline,
}

impl MarkdownRenderer {
    /// Creates renderer applying `pipeline` to every document.
    pub fn new(pipeline: Pipeline) -> Self {
        let mut options = Options::default();

        // Extension options (GFM subset)
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.front_matter_delimiter = Some("---".to_string());

        options.parse.smart = true;

        // Raw HTML in docs is trusted
        options.render.unsafe_ = true;

        Self {
            options,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Renders markdown content.
    ///
    /// # Errors
    ///
    /// Returns error if front matter is not valid YAML or code
    /// highlighting fails
    pub fn render(&self, content: &str, cx: &TransformContext<'_>) -> Result<RenderedPage> {
        let arena = Arena::new();
        let root = comrak::parse_document(&arena, content, &self.options);

        let mut front_matter = FrontMatter::default();
        for node in root.children() {
            if let NodeValue::FrontMatter(raw) = &node.data.borrow().value {
                front_matter = parse_front_matter(raw)?;
            }
        }

        let mut tree = Converter::new(&self.options, &self.syntax_set)
            .convert(root)
            .context("Failed to convert markdown")?;

        let report = self.pipeline.run(&mut tree, cx);

        Ok(RenderedPage {
            front_matter,
            html: tree.to_html(),
            headings: headings::outline(&tree),
            external_links: report.count(ExternalLinks::NAME),
        })
    }

    /// Reads and renders markdown file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or rendering fails
    pub fn render_file(
        &self,
        path: impl AsRef<Path>,
        origin: &SiteOrigin,
        base: &str,
    ) -> Result<RenderedPage> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read markdown file: {}", path.display()))?;

        let cx = TransformContext {
            origin,
            base,
            source: path,
        };
        self.render(&content, &cx)
            .with_context(|| format!("Failed to render {}", path.display()))
    }
}

/// Parses YAML front matter block including its delimiters.
fn parse_front_matter(raw: &str) -> Result<FrontMatter> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("---")
        .and_then(|rest| rest.strip_suffix("---"))
        .unwrap_or(trimmed);

    if body.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    serde_yaml::from_str(body).context("Invalid front matter")
}
