//! Heading anchors and page outline.

use std::collections::HashMap;

use super::pipeline::{Transform, TransformContext};
use super::tree::Tree;

/// Heading entry for the "On this page" outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Assigns slug ids to headings lacking one.
///
/// Duplicate slugs within a document receive numeric suffixes (`-1`,
/// `-2`). Headings that already carry an id keep it, which makes the
/// transformation idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingIds;

impl Transform for HeadingIds {
    fn name(&self) -> &'static str {
        "heading-ids"
    }

    fn apply(&self, tree: &mut Tree, _cx: &TransformContext<'_>) -> usize {
        assign_ids(tree)
    }
}

/// Assigns heading ids in document order, returning how many were added.
pub fn assign_ids(tree: &mut Tree) -> usize {
    let mut assigned = 0;
    let mut seen: HashMap<String, usize> = HashMap::new();

    // Reserve ids already present so generated ones never collide
    tree.visit_elements(|element| {
        if element.heading_level().is_some()
            && let Some(id) = element.attributes.get("id")
        {
            seen.entry(id.to_string()).or_insert(0);
        }
    });

    tree.visit_elements_mut(|element| {
        if element.heading_level().is_none() || element.attributes.contains("id") {
            return;
        }

        let base = slugify(&element.text_content());
        let id = unique_id(&base, &mut seen);
        element.attributes.set("id", id);
        assigned += 1;
    });

    assigned
}

fn unique_id(base: &str, seen: &mut HashMap<String, usize>) -> String {
    let base = if base.is_empty() { "heading" } else { base };
    let mut candidate = base.to_string();

    // Counter lives on the base slug so suffixes keep increasing
    while seen.contains_key(&candidate) {
        let count = seen.entry(base.to_string()).or_insert(0);
        *count += 1;
        candidate = format!("{}-{}", base, count);
    }

    seen.insert(candidate.clone(), 0);
    candidate
}

/// Converts heading text to an anchor slug.
///
/// Lowercases, keeps alphanumerics, `-` and `_`, turns whitespace into
/// `-` and drops everything else.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() {
            slug.push('-');
        }
    }
    slug
}

/// Collects `h2` and `h3` headings carrying ids, in document order.
pub fn outline(tree: &Tree) -> Vec<Heading> {
    let mut headings = Vec::new();
    tree.visit_elements(|element| {
        if let Some(level) = element.heading_level()
            && (2..=3).contains(&level)
            && let Some(id) = element.attributes.get("id")
        {
            headings.push(Heading {
                level,
                id: id.to_string(),
                text: element.text_content(),
            });
        }
    });
    headings
}
