//! Ordered document tree transformations.

use log::trace;
use std::path::Path;

use super::headings::HeadingIds;
use super::links::{ExternalLinks, SiteOrigin};
use super::tree::Tree;
use crate::site::MarkdownConfig;

/// Read only context handed to every transformation of one document.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Site origin used to tell internal links from external ones.
    pub origin: &'a SiteOrigin,
    /// Deployment path prefix (`/` when served from the domain root).
    pub base: &'a str,
    /// Markdown source being rendered.
    pub source: &'a Path,
}

/// Document tree transformation.
///
/// Implementations mutate the tree in place and hold no state across
/// documents, so one instance can serve a whole build.
pub trait Transform: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// Mutates the tree and returns how many elements were affected.
    fn apply(&self, tree: &mut Tree, cx: &TransformContext<'_>) -> usize;
}

/// Per transformation counts from one pipeline run, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport(Vec<(&'static str, usize)>);

impl PipelineReport {
    /// Total count reported by transformations named `name`.
    pub fn count(&self, name: &str) -> usize {
        self.0
            .iter()
            .filter(|(transform, _)| *transform == name)
            .map(|(_, count)| count)
            .sum()
    }
}

/// Transformations applied left to right.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the pipeline every page goes through.
    ///
    /// Heading ids are assigned first so in-page anchors exist before
    /// links are classified.
    pub fn standard(config: &MarkdownConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline.push(HeadingIds);
        pipeline.push(ExternalLinks::new(config.external_links.clone()));
        pipeline
    }

    /// Registers transformation at the end of the pipeline.
    pub fn push(&mut self, transform: impl Transform + 'static) {
        self.transforms.push(Box::new(transform));
    }

    /// Names of registered transformations in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Applies every registered transformation in order.
    pub fn run(&self, tree: &mut Tree, cx: &TransformContext<'_>) -> PipelineReport {
        let mut report = PipelineReport::default();
        for transform in &self.transforms {
            let count = transform.apply(tree, cx);
            trace!("{}: {} affected {}", cx.source.display(), transform.name(), count);
            report.0.push((transform.name(), count));
        }
        report
    }
}
