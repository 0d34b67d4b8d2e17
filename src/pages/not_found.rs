//! Not found page generation

use maud::{Markup, html};

use super::SiteContext;
use crate::components::header::site_header;
use crate::components::layout::{PageHead, page_wrapper};
use crate::components::sidebar::sidebar;
use crate::path::{join_base, page_url};

/// Generates the `404.html` page served for unknown routes
pub fn generate(site: &SiteContext<'_>) -> Markup {
    let config = site.config;
    let stylesheet = join_base(&config.base, "assets/site.css");

    let head = PageHead {
        title: "Page not found",
        site_title: &config.title,
        description: &config.description,
        canonical: None,
        stylesheet: &stylesheet,
    };

    let body = html! {
        div class="page" {
            (sidebar(config, site.origin, ""))
            main class="content" {
                h1 { "404" }
                p { "Page not found. Check the URL or try the sidebar." }
                a href=(page_url(&config.base, "")) { "Take me home" }
            }
        }
    };

    page_wrapper(&head, site_header(config, site.origin, site.logo_url), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteConfig;

    #[test]
    fn test_generate_not_found() {
        // Arrange
        let config = SiteConfig::from_toml(
            "title = \"Piccione\"\nsite = \"https://arcangelo7.github.io\"\nbase = \"/piccione\"\n",
        )
        .expect("Should parse config");
        let origin = config.origin().expect("Should parse origin");
        let site = SiteContext {
            config: &config,
            origin: &origin,
            logo_url: None,
        };

        // Act
        let html = generate(&site).into_string();

        // Assert
        assert!(html.contains("<title>Page not found | Piccione</title>"));
        assert!(html.contains("href=\"/piccione/\""));
    }
}
