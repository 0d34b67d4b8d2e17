//! On-page table of contents

use maud::{Markup, html};

use crate::markdown::Heading;

/// Renders "On this page" navigation from the page outline
///
/// Returns empty markup when the page has no `h2`/`h3` headings.
pub fn table_of_contents(headings: &[Heading]) -> Markup {
    html! {
        @if !headings.is_empty() {
            aside class="toc" aria-label="On this page" {
                h2 class="toc-title" { "On this page" }
                ul {
                    @for heading in headings {
                        li class=(format!("toc-level-{}", heading.level)) {
                            a href=(format!("#{}", heading.id)) { (heading.text) }
                        }
                    }
                }
            }
        }
    }
}
