//! Site header component

use maud::{Markup, html};

use super::icons::social_icon;
use super::link::anchor;
use crate::markdown::SiteOrigin;
use crate::path::page_url;
use crate::site::SiteConfig;

/// Renders site header with logo, title and social links
///
/// # Arguments
///
/// * `config`: Site configuration
/// * `origin`: Site origin for social link classification
/// * `logo_url`: Published logo URL, when a logo is configured
///
/// # Returns
///
/// Header markup linking the title back to the site root
pub fn site_header(config: &SiteConfig, origin: &SiteOrigin, logo_url: Option<&str>) -> Markup {
    let policy = &config.markdown.external_links;
    let logo_alt = config.logo.as_ref().map(|logo| logo.alt.as_str()).unwrap_or("");

    html! {
        header class="site-header" {
            a href=(page_url(&config.base, "")) class="site-title" {
                @if let Some(url) = logo_url {
                    img src=(url) alt=(logo_alt) class="site-logo";
                }
                span { (config.title) }
            }
            @if !config.social.is_empty() {
                nav class="social-links" aria-label="Social links" {
                    @for link in &config.social {
                        (anchor(
                            &link.href,
                            Some("social-link"),
                            policy,
                            origin,
                            html! {
                                i class=(social_icon(&link.icon)) {}
                                span class="sr-only" { (link.label) }
                            },
                        ))
                    }
                }
            }
        }
    }
}
