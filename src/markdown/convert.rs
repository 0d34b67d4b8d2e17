//! Conversion from comrak's markdown AST to the HTML document tree.

use anyhow::{Context, Result};
use comrak::Options;
use comrak::nodes::{AstNode, ListType, NodeValue};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::html;
use super::tree::{Element, Node, Tree};

/// Converts parsed markdown into an HTML tree.
///
/// Raw HTML is parsed into tree nodes so transformations see links written
/// as HTML. Node kinds without a dedicated mapping are rendered by comrak
/// and parsed the same way.
pub struct Converter<'o, 'c> {
    options: &'o Options<'c>,
    syntax_set: &'o SyntaxSet,
}

impl<'o, 'c> Converter<'o, 'c> {
    pub fn new(options: &'o Options<'c>, syntax_set: &'o SyntaxSet) -> Self {
        Self {
            options,
            syntax_set,
        }
    }

    /// Converts document root into a tree.
    ///
    /// # Errors
    ///
    /// Returns error if code highlighting or fallback rendering fails
    pub fn convert<'a>(&self, root: &'a AstNode<'a>) -> Result<Tree> {
        Ok(Tree::new(self.convert_children(root)?))
    }

    /// Converts child nodes in order.
    ///
    /// A raw HTML start tag standing alone (`<a href="...">` inline, or a
    /// `<div>` block) takes the following siblings up to its matching end
    /// tag as children. Without an end tag it takes the remaining siblings.
    fn convert_children<'a>(&self, node: &'a AstNode<'a>) -> Result<Vec<Node>> {
        let children: Vec<_> = node.children().collect();
        let mut nodes = Vec::new();
        let mut idx = 0;

        while idx < children.len() {
            let start = raw_literal(children[idx]).and_then(|raw| html::start_tag(&raw));
            let Some(mut element) = start else {
                nodes.extend(self.convert_node(children[idx])?);
                idx += 1;
                continue;
            };

            let end = matching_end(&children[idx + 1..], &element.tag)
                .map_or(children.len(), |offset| idx + 1 + offset);
            for &inner in &children[idx + 1..end] {
                element.children.extend(self.convert_node(inner)?);
            }
            nodes.push(Node::Element(element));
            idx = end + 1;
        }

        Ok(nodes)
    }

    fn element<'a>(&self, tag: &str, node: &'a AstNode<'a>) -> Result<Vec<Node>> {
        let children = self.convert_children(node)?;
        Ok(vec![Node::Element(Element::new(tag).with_children(children))])
    }

    fn convert_node<'a>(&self, node: &'a AstNode<'a>) -> Result<Vec<Node>> {
        let value = node.data.borrow().value.clone();

        match value {
            NodeValue::Document => self.convert_children(node),
            NodeValue::FrontMatter(_) => Ok(Vec::new()),
            NodeValue::Paragraph => {
                if in_tight_list(node) {
                    self.convert_children(node)
                } else {
                    self.element("p", node)
                }
            }
            NodeValue::Heading(heading) => self.element(&format!("h{}", heading.level), node),
            NodeValue::Text(text) => Ok(vec![Node::Text(text)]),
            NodeValue::SoftBreak => Ok(vec![Node::Text("\n".to_string())]),
            NodeValue::LineBreak => Ok(vec![
                Node::Element(Element::new("br")),
                Node::Text("\n".to_string()),
            ]),
            NodeValue::Emph => self.element("em", node),
            NodeValue::Strong => self.element("strong", node),
            NodeValue::Strikethrough => self.element("del", node),
            NodeValue::BlockQuote => self.element("blockquote", node),
            NodeValue::ThematicBreak => Ok(vec![Node::Element(Element::new("hr"))]),
            NodeValue::Code(code) => Ok(vec![Node::Element(
                Element::new("code").with_children(vec![Node::Text(code.literal)]),
            )]),
            NodeValue::HtmlInline(raw) => Ok(html::parse_fragment(&raw)),
            NodeValue::HtmlBlock(block) => Ok(html::parse_fragment(&block.literal)),
            NodeValue::Link(link) => {
                let mut element = Element::new("a").with_attr("href", link.url);
                if !link.title.is_empty() {
                    element.attributes.set("title", link.title);
                }
                element.children = self.convert_children(node)?;
                Ok(vec![Node::Element(element)])
            }
            NodeValue::Image(link) => {
                let alt = Element::new("span")
                    .with_children(self.convert_children(node)?)
                    .text_content();
                let mut element = Element::new("img")
                    .with_attr("src", link.url)
                    .with_attr("alt", alt);
                if !link.title.is_empty() {
                    element.attributes.set("title", link.title);
                }
                Ok(vec![Node::Element(element)])
            }
            NodeValue::List(list) => {
                let tag = match list.list_type {
                    ListType::Bullet => "ul",
                    ListType::Ordered => "ol",
                };
                let mut element = Element::new(tag);
                if matches!(list.list_type, ListType::Ordered) && list.start != 1 {
                    element.attributes.set("start", list.start.to_string());
                }
                element.children = self.convert_children(node)?;
                Ok(vec![Node::Element(element)])
            }
            NodeValue::Item(_) => self.element("li", node),
            NodeValue::CodeBlock(block) => {
                let language = block.info.split_whitespace().next().unwrap_or("");
                Ok(vec![self.code_block(&block.literal, language)?])
            }
            NodeValue::Table(..) => self.table(node),
            NodeValue::TableRow(_) => self.element("tr", node),
            NodeValue::TableCell => {
                let header = node
                    .parent()
                    .map(|row| matches!(row.data.borrow().value, NodeValue::TableRow(true)))
                    .unwrap_or(false);
                self.element(if header { "th" } else { "td" }, node)
            }
            _ => {
                let mut html = Vec::new();
                comrak::format_html(node, self.options, &mut html)
                    .context("Failed to render markdown node")?;
                let html = String::from_utf8(html).context("Rendered HTML is not UTF8")?;
                Ok(html::parse_fragment(&html))
            }
        }
    }

    /// Splits header rows into `thead` and the rest into `tbody`.
    fn table<'a>(&self, node: &'a AstNode<'a>) -> Result<Vec<Node>> {
        let mut head = Vec::new();
        let mut body = Vec::new();

        for row in node.children() {
            let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
            let converted = self.convert_node(row)?;
            if is_header {
                head.extend(converted);
            } else {
                body.extend(converted);
            }
        }

        let mut table = Element::new("table");
        if !head.is_empty() {
            table
                .children
                .push(Node::Element(Element::new("thead").with_children(head)));
        }
        if !body.is_empty() {
            table
                .children
                .push(Node::Element(Element::new("tbody").with_children(body)));
        }
        Ok(vec![Node::Element(table)])
    }

    /// Renders fenced code with `hljs-` prefixed CSS classes.
    fn code_block(&self, code: &str, language: &str) -> Result<Node> {
        let mut code_element = Element::new("code");
        if !language.is_empty() {
            code_element
                .attributes
                .set("class", format!("language-{}", language));
        }

        let highlighted = self
            .highlight(code, language)
            .context("Failed to highlight code block")?;

        code_element.children = match highlighted {
            Some(html) => vec![Node::Raw(html)],
            None => vec![Node::Text(code.to_string())],
        };

        Ok(Node::Element(
            Element::new("pre").with_children(vec![Node::Element(code_element)]),
        ))
    }

    /// Returns None when the language is unknown or the block is empty.
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>> {
        if code.is_empty() || language.is_empty() {
            return Ok(None);
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language));

        let Some(syntax) = syntax else {
            return Ok(None);
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            self.syntax_set,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .context("Failed to parse line for syntax highlighting")?;
        }

        Ok(Some(generator.finalize()))
    }
}

fn raw_literal<'a>(node: &'a AstNode<'a>) -> Option<String> {
    match &node.data.borrow().value {
        NodeValue::HtmlInline(raw) => Some(raw.clone()),
        NodeValue::HtmlBlock(block) => Some(block.literal.clone()),
        _ => None,
    }
}

/// Index of the raw end tag closing `tag` among `siblings`, skipping
/// nested elements of the same name.
fn matching_end<'a>(siblings: &[&'a AstNode<'a>], tag: &str) -> Option<usize> {
    let mut depth = 0;

    for (offset, &sibling) in siblings.iter().enumerate() {
        let Some(raw) = raw_literal(sibling) else {
            continue;
        };

        if html::start_tag(&raw).is_some_and(|element| element.tag == tag) {
            depth += 1;
        } else if html::end_tag(&raw).as_deref() == Some(tag) {
            if depth == 0 {
                return Some(offset);
            }
            depth -= 1;
        }
    }

    None
}

/// Paragraphs directly inside items of a tight list render without `<p>`.
fn in_tight_list<'a>(node: &'a AstNode<'a>) -> bool {
    let Some(item) = node.parent() else {
        return false;
    };
    if !matches!(item.data.borrow().value, NodeValue::Item(_)) {
        return false;
    }
    item.parent()
        .map(|list| match &list.data.borrow().value {
            NodeValue::List(list) => list.tight,
            _ => false,
        })
        .unwrap_or(false)
}
