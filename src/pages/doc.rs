//! Documentation page generation

use maud::{Markup, PreEscaped, html};

use super::SiteContext;
use crate::components::header::site_header;
use crate::components::layout::{PageHead, page_wrapper};
use crate::components::sidebar::sidebar;
use crate::components::toc::table_of_contents;
use crate::markdown::RenderedPage;
use crate::path::{canonical_url, join_base};

/// Generates HTML page for a rendered markdown document
///
/// Lays out the site header, sidebar, page title, rendered body and the
/// on-page table of contents.
///
/// # Arguments
///
/// * `site`: Site wide context
/// * `slug`: Page slug (empty for the site root)
/// * `title`: Page title from front matter
/// * `page`: Rendered markdown document
///
/// # Returns
///
/// Complete HTML document markup
pub fn generate(site: &SiteContext<'_>, slug: &str, title: &str, page: &RenderedPage) -> Markup {
    let config = site.config;
    let description = page
        .front_matter
        .description
        .as_deref()
        .unwrap_or(config.description.as_str());
    let canonical = canonical_url(site.origin, &config.base, slug);
    let stylesheet = join_base(&config.base, "assets/site.css");

    let head = PageHead {
        title,
        site_title: &config.title,
        description,
        canonical: canonical.as_deref(),
        stylesheet: &stylesheet,
    };

    let body = html! {
        div class="page" {
            (sidebar(config, site.origin, slug))
            main class="content" {
                h1 id="_top" { (title) }
                div class="markdown-body" {
                    (PreEscaped(&page.html))
                }
            }
            (table_of_contents(&page.headings))
        }
    };

    page_wrapper(&head, site_header(config, site.origin, site.logo_url), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{FrontMatter, Heading};
    use crate::site::SiteConfig;

    fn config() -> SiteConfig {
        SiteConfig::from_toml(
            r#"
title = "Piccione"
description = "Python toolkit"
site = "https://arcangelo7.github.io"
base = "/piccione"

[[social]]
icon = "github"
label = "GitHub"
href = "https://github.com/arcangelo7/piccione"

[[sidebar]]
label = "Guides"
items = [{ label = "Getting started", slug = "getting_started" }]
"#,
        )
        .expect("Should parse config")
    }

    fn rendered() -> RenderedPage {
        RenderedPage {
            front_matter: FrontMatter::default(),
            html: "<h2 id=\"installation\">Installation</h2><p>Body</p>".to_string(),
            headings: vec![Heading {
                level: 2,
                id: "installation".to_string(),
                text: "Installation".to_string(),
            }],
            external_links: 0,
        }
    }

    #[test]
    fn test_generate_doc_page() {
        // Arrange
        let config = config();
        let origin = config.origin().expect("Should parse origin");
        let site = SiteContext {
            config: &config,
            origin: &origin,
            logo_url: Some("/piccione/piccione.png"),
        };

        // Act
        let html = generate(&site, "getting_started", "Getting started", &rendered()).into_string();

        // Assert
        assert!(html.contains("<title>Getting started | Piccione</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"Python toolkit\">"));
        assert!(html.contains(
            "<link rel=\"canonical\" href=\"https://arcangelo7.github.io/piccione/getting_started/\">"
        ));
        assert!(html.contains("<h2 id=\"installation\">Installation</h2><p>Body</p>"));
        assert!(html.contains("href=\"#installation\""));
        assert!(html.contains("aria-current=\"page\""));
        assert!(html.contains("src=\"/piccione/piccione.png\""));
        assert!(html.contains("target=\"_blank\""), "Social link should be external");
    }

    #[test]
    fn test_front_matter_description_wins() {
        // Arrange
        let config = config();
        let origin = config.origin().expect("Should parse origin");
        let site = SiteContext {
            config: &config,
            origin: &origin,
            logo_url: None,
        };
        let mut page = rendered();
        page.front_matter.description = Some("Page specific".to_string());

        // Act
        let html = generate(&site, "", "Piccione", &page).into_string();

        // Assert
        assert!(html.contains("content=\"Page specific\""));
        assert!(html.contains("<title>Piccione</title>"));
    }
}
