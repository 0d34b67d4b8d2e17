//! Raw HTML embedded in markdown, parsed into document tree nodes.
//!
//! Fragments are tokenized leniently: unclosed elements are closed at the
//! end of the fragment and unmatched end tags are kept verbatim. Comments,
//! entity references and the content of `script`, `style` and `textarea`
//! pass through unchanged.

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;

use super::tree::{Element, Node, is_void};

/// Elements whose content is never parsed as markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// Parses an HTML fragment into tree nodes.
///
/// Falls back to a single raw node when the fragment cannot be tokenized.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    match FragmentBuilder::default().parse(html) {
        Ok(nodes) => nodes,
        Err(err) => {
            debug!("Keeping HTML fragment verbatim: {}", err);
            vec![Node::Raw(html.to_string())]
        }
    }
}

/// Returns the element when `html` is a single start tag whose content
/// and end tag follow elsewhere, e.g. inline `<a href="...">`.
pub fn start_tag(html: &str) -> Option<Element> {
    let mut reader = reader(html.trim());
    let element = match reader.read_event().ok()? {
        Event::Start(start) => element(&start),
        _ => return None,
    };

    if is_void(&element.tag) || RAW_TEXT_ELEMENTS.contains(&element.tag.as_str()) {
        return None;
    }

    matches!(reader.read_event().ok()?, Event::Eof).then_some(element)
}

/// Returns the lowercase tag name when `html` is a single end tag.
pub fn end_tag(html: &str) -> Option<String> {
    let mut reader = reader(html.trim());
    let tag = match reader.read_event().ok()? {
        Event::End(end) => tag_name(end.name().as_ref()),
        _ => return None,
    };

    matches!(reader.read_event().ok()?, Event::Eof).then_some(tag)
}

#[derive(Default)]
struct FragmentBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
}

impl FragmentBuilder {
    fn parse(mut self, html: &str) -> quick_xml::Result<Vec<Node>> {
        let mut rest = html;

        'chunks: loop {
            let mut reader = reader(rest);
            loop {
                match reader.read_event()? {
                    Event::Start(start) => {
                        let mut element = element(&start);
                        if is_void(&element.tag) {
                            self.push(Node::Element(element));
                        } else if RAW_TEXT_ELEMENTS.contains(&element.tag.as_str()) {
                            // Content runs to the end tag, so tokenizing
                            // resumes after it with a fresh reader
                            let offset = reader.buffer_position() as usize;
                            let (content, consumed) = raw_text(&rest[offset..], &element.tag);
                            if !content.is_empty() {
                                element.children.push(Node::Raw(content.to_string()));
                            }
                            self.push(Node::Element(element));
                            rest = &rest[offset + consumed..];
                            continue 'chunks;
                        } else {
                            self.open.push(element);
                        }
                    }
                    Event::Empty(start) => self.push(Node::Element(element(&start))),
                    Event::End(end) => {
                        let name = end.name();
                        self.close(
                            &tag_name(name.as_ref()),
                            format!("</{}>", lossy(name.as_ref())),
                        );
                    }
                    Event::Text(text) => self.push(Node::Text(lossy(&text).into_owned())),
                    Event::GeneralRef(reference) => {
                        self.push(Node::Raw(format!("&{};", lossy(&reference))))
                    }
                    Event::CData(data) => {
                        self.push(Node::Raw(format!("<![CDATA[{}]]>", lossy(&data))))
                    }
                    Event::Comment(comment) => {
                        self.push(Node::Raw(format!("<!--{}-->", lossy(&comment))))
                    }
                    Event::DocType(doctype) => {
                        self.push(Node::Raw(format!("<!DOCTYPE {}>", lossy(&doctype).trim())))
                    }
                    Event::Decl(decl) => self.push(Node::Raw(format!("<?{}?>", lossy(&decl)))),
                    Event::PI(pi) => self.push(Node::Raw(format!("<?{}?>", lossy(&pi)))),
                    Event::Eof => break 'chunks,
                }
            }
        }

        while let Some(element) = self.open.pop() {
            self.push(Node::Element(element));
        }

        Ok(self.root)
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    /// Closes the innermost open element named `tag` and everything opened
    /// inside it. End tags with no open element are kept as raw markup.
    fn close(&mut self, tag: &str, verbatim: String) {
        let Some(position) = self.open.iter().rposition(|element| element.tag == tag) else {
            self.push(Node::Raw(verbatim));
            return;
        };

        while self.open.len() > position {
            if let Some(element) = self.open.pop() {
                self.push(Node::Element(element));
            }
        }
    }
}

fn reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    reader
}

fn element(start: &BytesStart<'_>) -> Element {
    let mut element = Element::new(tag_name(start.name().as_ref()));

    for attr in start.html_attributes().flatten() {
        let name = lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = attr
            .unescape_value()
            .map_or_else(|_| lossy(&attr.value).into_owned(), Cow::into_owned);
        element.attributes.set(name, value);
    }

    element
}

fn tag_name(name: &[u8]) -> String {
    lossy(name).to_ascii_lowercase()
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Splits raw text content from the end tag that terminates it.
///
/// Returns the content and the number of bytes consumed including the end
/// tag. Without an end tag the whole input is content.
fn raw_text<'a>(html: &'a str, tag: &str) -> (&'a str, usize) {
    let lower = html.to_ascii_lowercase();
    let Some(start) = lower.find(&format!("</{}", tag)) else {
        return (html, html.len());
    };

    let end = lower[start..].find('>').map_or(html.len(), |idx| start + idx + 1);

    (&html[..start], end)
}
