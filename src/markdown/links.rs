//! External link classification and annotation.
//!
//! Links pointing away from the site origin get the configured browsing
//! context (`target`) and relationship tokens (`rel`). Links that stay on
//! the site are left alone. Anything that cannot be classified is treated
//! as external so it never escapes without the safety attributes.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::{ParseError, Url};

use super::pipeline::{Transform, TransformContext};
use super::tree::{Attributes, Tree};

/// Attributes attached to external links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkPolicy {
    /// Browsing context, e.g. `_blank`.
    pub target: String,
    /// Relationship tokens in output order, e.g. `noopener noreferrer`.
    pub rel: Vec<String>,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            target: "_blank".to_string(),
            rel: vec!["noopener".to_string(), "noreferrer".to_string()],
        }
    }
}

impl LinkPolicy {
    pub fn new(target: impl Into<String>, rel: &[&str]) -> Self {
        Self {
            target: target.into(),
            rel: rel.iter().map(|token| token.to_string()).collect(),
        }
    }

    /// Validates policy tokens.
    ///
    /// # Errors
    ///
    /// Returns error if target is empty or a rel token is empty or
    /// contains whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            bail!("External link target must not be empty");
        }

        for token in &self.rel {
            if token.is_empty() || token.contains(char::is_whitespace) {
                bail!("Invalid rel token: {:?}", token);
            }
        }

        Ok(())
    }

    /// Writes policy attributes onto a link's attribute set.
    ///
    /// Target is overwritten. Existing rel tokens are kept in order and
    /// missing policy tokens are appended.
    fn apply(&self, attributes: &mut Attributes) {
        attributes.set("target", self.target.as_str());

        let rel = merge_rel(attributes.get("rel"), &self.rel);
        if !rel.is_empty() {
            attributes.set("rel", rel);
        }
    }

    /// Returns `(target, rel)` to render for `href`, or None for internal
    /// links.
    ///
    /// Used where links are emitted directly as markup rather than through
    /// a document tree (sidebar and header links).
    pub fn attributes_for(&self, href: &str, origin: &SiteOrigin) -> Option<(&str, String)> {
        match classify(href, origin) {
            LinkKind::Internal => None,
            LinkKind::External => Some((self.target.as_str(), merge_rel(None, &self.rel))),
        }
    }
}

/// Origin of the deployed site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOrigin {
    url: Url,
}

impl SiteOrigin {
    /// Parses the configured site URL.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not absolute, not http(s), or has no
    /// host.
    pub fn parse(site: &str) -> Result<Self> {
        let url = Url::parse(site).with_context(|| format!("Invalid site URL: {}", site))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Site URL scheme '{}' not supported, must be http or https",
                url.scheme()
            );
        }

        if url.host_str().is_none() {
            bail!("Site URL must have a host: {}", site);
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn is_same_origin(&self, other: &Url) -> bool {
        self.url.origin() == other.origin()
    }
}

/// Link classification relative to the site origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
}

/// Classifies `href` relative to `origin`.
///
/// In-page anchors, relative references and same origin http(s) URLs are
/// internal. Cross origin URLs, non web schemes (`mailto:`, `ftp:`, ...)
/// and unparsable values are external.
pub fn classify(href: &str, origin: &SiteOrigin) -> LinkKind {
    if href.trim().is_empty() {
        return LinkKind::External;
    }

    if href.starts_with('#') {
        return LinkKind::Internal;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        // Relative reference: resolve against the site to catch
        // protocol relative links to foreign hosts
        Err(ParseError::RelativeUrlWithoutBase) => match origin.url.join(href) {
            Ok(url) => url,
            Err(_) => return LinkKind::External,
        },
        Err(_) => return LinkKind::External,
    };

    if matches!(resolved.scheme(), "http" | "https") && origin.is_same_origin(&resolved) {
        LinkKind::Internal
    } else {
        LinkKind::External
    }
}

/// Annotates every external link in the tree with the policy attributes.
///
/// Single pass, in place, idempotent. Internal links are not touched.
/// Returns the number of external links found.
pub fn annotate(tree: &mut Tree, policy: &LinkPolicy, origin: &SiteOrigin) -> usize {
    let mut external = 0;
    tree.visit_elements_mut(|element| {
        if !element.is_link() {
            return;
        }

        let kind = match element.attributes.get("href") {
            Some(href) => classify(href, origin),
            None => return,
        };

        if kind == LinkKind::External {
            policy.apply(&mut element.attributes);
            external += 1;
        }
    });
    external
}

/// Existing tokens first (deduplicated), then missing policy tokens.
fn merge_rel(existing: Option<&str>, policy: &[String]) -> String {
    let mut tokens: Vec<&str> = Vec::new();

    let candidates = existing
        .unwrap_or("")
        .split_ascii_whitespace()
        .chain(policy.iter().map(String::as_str));

    for token in candidates {
        if !tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            tokens.push(token);
        }
    }

    tokens.join(" ")
}

/// External link annotation as a pipeline transformation.
#[derive(Debug, Clone)]
pub struct ExternalLinks {
    policy: LinkPolicy,
}

impl ExternalLinks {
    /// Name under which the transformation reports its link count.
    pub const NAME: &'static str = "external-links";

    pub fn new(policy: LinkPolicy) -> Self {
        Self { policy }
    }
}

impl Transform for ExternalLinks {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, tree: &mut Tree, cx: &TransformContext<'_>) -> usize {
        annotate(tree, &self.policy, cx.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tree::{Element, Node};
    use pretty_assertions::assert_eq;

    const SITE: &str = "https://arcangelo7.github.io";

    fn origin() -> SiteOrigin {
        SiteOrigin::parse(SITE).expect("Should parse site origin")
    }

    fn policy() -> LinkPolicy {
        LinkPolicy::new("_blank", &["noopener", "noreferrer"])
    }

    fn link(href: &str) -> Element {
        Element::new("a")
            .with_attr("href", href)
            .with_children(vec![Node::Text("text".to_string())])
    }

    fn tree_of(links: Vec<Element>) -> Tree {
        Tree::new(vec![Node::Element(
            Element::new("p").with_children(links.into_iter().map(Node::Element).collect()),
        )])
    }

    fn links_of(tree: &Tree) -> Vec<Element> {
        let mut links = Vec::new();
        tree.visit_elements(|element| {
            if element.tag == "a" {
                links.push(element.clone());
            }
        });
        links
    }

    fn annotated(href: &str) -> Element {
        let mut tree = tree_of(vec![link(href)]);
        annotate(&mut tree, &policy(), &origin());
        links_of(&tree).remove(0)
    }

    #[test]
    fn test_cross_origin_link_gets_policy_attributes() {
        // Arrange & Act
        let element = annotated("https://example.com/page");

        // Assert
        assert_eq!(element.attributes.get("target"), Some("_blank"));
        assert_eq!(element.attributes.get("rel"), Some("noopener noreferrer"));
    }

    #[test]
    fn test_site_relative_path_untouched() {
        // Arrange & Act
        let element = annotated("/piccione/getting_started");

        // Assert
        assert_eq!(element, link("/piccione/getting_started"));
    }

    #[test]
    fn test_fragment_untouched() {
        // Arrange & Act
        let element = annotated("#installation");

        // Assert
        assert_eq!(element, link("#installation"));
    }

    #[test]
    fn test_same_origin_absolute_untouched() {
        // Arrange & Act
        let element = annotated("https://arcangelo7.github.io/piccione/other");

        // Assert
        assert_eq!(element, link("https://arcangelo7.github.io/piccione/other"));
    }

    #[test]
    fn test_relative_paths_untouched() {
        for href in ["./guide", "../other/", "getting_started", "?page=2"] {
            // Arrange & Act
            let element = annotated(href);

            // Assert
            assert_eq!(element, link(href), "Relative href {} should stay internal", href);
        }
    }

    #[test]
    fn test_other_scheme_or_port_is_external() {
        for href in [
            "http://arcangelo7.github.io/piccione",
            "https://arcangelo7.github.io:8443/piccione",
            "mailto:someone@example.com",
            "ftp://arcangelo7.github.io/file",
            "//example.com/page",
        ] {
            // Arrange & Act
            let element = annotated(href);

            // Assert
            assert_eq!(
                element.attributes.get("target"),
                Some("_blank"),
                "{} should be external",
                href
            );
        }
    }

    #[test]
    fn test_malformed_href_fails_safe() {
        for href in ["", "   ", "https://exa mple.com", "http://", "//exa mple.com"] {
            // Arrange & Act
            let element = annotated(href);

            // Assert
            assert_eq!(
                element.attributes.get("rel"),
                Some("noopener noreferrer"),
                "Malformed href {:?} should be treated as external",
                href
            );
        }
    }

    #[test]
    fn test_relative_href_resolved_like_a_browser() {
        // Spaces and bad escapes in relative paths are percent-encoded on
        // join and stay on the site
        for href in ["foo bar", "/a/%zz"] {
            assert_eq!(classify(href, &origin()), LinkKind::Internal, "{}", href);
        }
    }

    #[test]
    fn test_existing_target_overwritten() {
        // Arrange
        let mut tree = tree_of(vec![link("https://example.com").with_attr("target", "_self")]);

        // Act
        annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(links_of(&tree)[0].attributes.get("target"), Some("_blank"));
    }

    #[test]
    fn test_existing_rel_tokens_preserved_and_merged() {
        // Arrange
        let mut tree = tree_of(vec![
            link("https://example.com").with_attr("rel", "nofollow NOOPENER"),
        ]);

        // Act
        annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(
            links_of(&tree)[0].attributes.get("rel"),
            Some("nofollow NOOPENER noreferrer")
        );
    }

    #[test]
    fn test_conflicting_rel_token_is_kept() {
        // Arrange
        let mut tree = tree_of(vec![link("https://example.com").with_attr("rel", "opener")]);

        // Act
        annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(
            links_of(&tree)[0].attributes.get("rel"),
            Some("opener noopener noreferrer")
        );
    }

    #[test]
    fn test_annotate_is_idempotent() {
        // Arrange
        let mut tree = tree_of(vec![
            link("https://example.com/page"),
            link("/piccione/getting_started"),
            link("#installation"),
            link("https://example.org").with_attr("rel", "me"),
        ]);
        annotate(&mut tree, &policy(), &origin());
        let once = tree.clone();

        // Act
        annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(tree, once);
    }

    #[test]
    fn test_non_link_elements_ignored() {
        // Arrange
        let mut tree = Tree::new(vec![
            Node::Element(Element::new("a").with_attr("name", "anchor")),
            Node::Element(Element::new("img").with_attr("src", "https://example.com/a.png")),
        ]);
        let before = tree.clone();

        // Act
        annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(tree, before);
    }

    #[test]
    fn test_empty_rel_policy_sets_only_target() {
        // Arrange
        let policy = LinkPolicy::new("_blank", &[]);
        let mut tree = tree_of(vec![link("https://example.com")]);

        // Act
        annotate(&mut tree, &policy, &origin());

        // Assert
        let element = &links_of(&tree)[0];
        assert_eq!(element.attributes.get("target"), Some("_blank"));
        assert_eq!(element.attributes.get("rel"), None);
    }

    #[test]
    fn test_end_to_end_serialization() {
        // Arrange
        let mut tree = tree_of(vec![link("https://example.com/page")]);

        // Act
        annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(
            tree.to_html(),
            "<p><a href=\"https://example.com/page\" target=\"_blank\" rel=\"noopener noreferrer\">text</a></p>"
        );
    }

    #[test]
    fn test_annotate_returns_external_count() {
        // Arrange
        let mut tree = tree_of(vec![
            link("https://example.com"),
            link("/local"),
            link("mailto:a@b.c"),
        ]);

        // Act
        let external = annotate(&mut tree, &policy(), &origin());

        // Assert
        assert_eq!(external, 2);
    }

    #[test]
    fn test_attributes_for_direct_markup() {
        // Arrange
        let policy = policy();
        let origin = origin();

        // Act & Assert
        assert_eq!(
            policy.attributes_for("https://github.com/arcangelo7/piccione", &origin),
            Some(("_blank", "noopener noreferrer".to_string()))
        );
        assert_eq!(policy.attributes_for("/piccione/", &origin), None);
    }

    #[test]
    fn test_site_origin_rejects_non_http() {
        assert!(SiteOrigin::parse("ftp://example.com").is_err());
        assert!(SiteOrigin::parse("not a url").is_err());
        assert!(SiteOrigin::parse("/relative").is_err());
        assert!(SiteOrigin::parse("https://example.com/docs").is_ok());
    }

    #[test]
    fn test_policy_validation() {
        assert!(policy().validate().is_ok());
        assert!(LinkPolicy::new("", &["noopener"]).validate().is_err());
        assert!(LinkPolicy::new("_blank", &["no opener"]).validate().is_err());
        assert!(LinkPolicy::new("_blank", &[""]).validate().is_err());
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        // Arrange
        let toml_str = "rel = [\"nofollow\"]";

        // Act
        let policy: LinkPolicy = toml::from_str(toml_str).expect("Should parse policy");

        // Assert
        assert_eq!(policy.target, "_blank");
        assert_eq!(policy.rel, vec!["nofollow".to_string()]);
    }
}
