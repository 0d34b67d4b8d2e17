//! Page layout wrapper component

use maud::{DOCTYPE, Markup, html};

/// Document head metadata
pub struct PageHead<'a> {
    /// Page title (without site suffix)
    pub title: &'a str,
    pub site_title: &'a str,
    pub description: &'a str,
    /// Absolute canonical URL of the page
    pub canonical: Option<&'a str>,
    /// Stylesheet URL under the base path
    pub stylesheet: &'a str,
}

impl PageHead<'_> {
    /// Full document title, `page | site` unless both are equal
    pub fn document_title(&self) -> String {
        if self.title == self.site_title {
            self.title.to_string()
        } else {
            format!("{} | {}", self.title, self.site_title)
        }
    }
}

/// Wraps page content with standard HTML structure
///
/// Provides consistent DOCTYPE, html, head, and container structure across
/// all page types. The caller provides the header and page-specific body.
///
/// # Arguments
///
/// * `head`: Title, description and asset metadata
/// * `header`: Site header markup
/// * `body`: Page-specific body markup
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(head: &PageHead<'_>, header: Markup, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.document_title()) }
                @if !head.description.is_empty() {
                    meta name="description" content=(head.description);
                }
                @if let Some(canonical) = head.canonical {
                    link rel="canonical" href=(canonical);
                }
                script src="https://unpkg.com/@phosphor-icons/web" {}
                link rel="stylesheet" href=(head.stylesheet);
            }
            body {
                (header)
                div class="container" {
                    (body)
                }
            }
        }
    }
}
