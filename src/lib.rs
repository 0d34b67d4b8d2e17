//! Static documentation site generator with safe external links.

mod assets;
pub mod components;
mod config;
pub mod content;
mod generator;
pub mod markdown;
pub mod pages;
pub mod path;
pub mod site;

pub use config::Config;
pub use content::{Page, discover};
pub use generator::{BuildReport, build};
pub use markdown::{
    LinkKind, LinkPolicy, MarkdownRenderer, Pipeline, SiteOrigin, Transform, TransformContext,
    Tree, annotate, classify,
};
pub use site::{MarkdownConfig, SiteConfig};
