//! HTML document tree produced from parsed markdown.
//!
//! Transformations operate on this tree rather than on rendered HTML
//! strings, so attribute edits never depend on string scanning.

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Returns true for elements that never have content.
pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Node in a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup emitted verbatim (highlighted code, comments, entity
    /// references).
    Raw(String),
}

/// Ordered attribute mapping.
///
/// Keeps insertion order so serialization is reproducible for a given
/// input tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets attribute value, overwriting in place when already present.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// HTML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Returns true for hyperlink elements carrying an `href`.
    pub fn is_link(&self) -> bool {
        self.tag == "a" && self.attributes.contains("href")
    }

    /// Returns heading level for `h1`..`h6` elements.
    pub fn heading_level(&self) -> Option<u8> {
        match self.tag.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            Node::Raw(_) => {}
        }
    }
}

/// Root of a rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub children: Vec<Node>,
}

impl Tree {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Visits every element depth first, parents before children.
    pub fn visit_elements_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        visit_nodes_mut(&mut self.children, &mut f);
    }

    /// Read only counterpart of [`Tree::visit_elements_mut`].
    pub fn visit_elements<F>(&self, mut f: F)
    where
        F: FnMut(&Element),
    {
        visit_nodes(&self.children, &mut f);
    }

    /// Serializes tree to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.children, &mut out);
        out
    }
}

fn visit_nodes_mut<F>(nodes: &mut [Node], f: &mut F)
where
    F: FnMut(&mut Element),
{
    for node in nodes {
        if let Node::Element(element) = node {
            f(element);
            visit_nodes_mut(&mut element.children, f);
        }
    }
}

fn visit_nodes<F>(nodes: &[Node], f: &mut F)
where
    F: FnMut(&Element),
{
    for node in nodes {
        if let Node::Element(element) = node {
            f(element);
            visit_nodes(&element.children, f);
        }
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Raw(html) => out.push_str(html),
            Node::Element(element) => write_element(element, out),
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in element.attributes.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if is_void(&element.tag) {
        return;
    }

    write_nodes(&element.children, out);
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

/// Escapes HTML special characters in text content.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes HTML special characters in attribute values.
pub fn escape_attr(text: &str) -> String {
    escape_text(text)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
