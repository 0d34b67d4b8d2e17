//! Markdown rendering through an ordered pipeline of tree transformations.
//!
//! Markdown is parsed with comrak, converted to an HTML document tree,
//! passed through registered transformations (heading anchors, external
//! link annotation) and serialized.

mod convert;
pub mod headings;
mod html;
pub mod links;
pub mod pipeline;
mod renderer;
pub mod tree;

pub use headings::{Heading, HeadingIds};
pub use links::{ExternalLinks, LinkKind, LinkPolicy, SiteOrigin, annotate, classify};
pub use pipeline::{Pipeline, PipelineReport, Transform, TransformContext};
pub use renderer::{FrontMatter, MarkdownRenderer, RenderedPage};
pub use tree::{Attributes, Element, Node, Tree};
