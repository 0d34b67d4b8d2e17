//! Sidebar navigation component

use maud::{Markup, html};

use super::link::anchor;
use crate::markdown::SiteOrigin;
use crate::path::page_url;
use crate::site::{SidebarTarget, SiteConfig};

/// Renders sidebar groups with the current page highlighted
///
/// Slug entries link to generated pages under the base path and carry
/// `aria-current="page"` when they match `current_slug`. Link entries are
/// emitted as configured, with the external link policy applied when they
/// leave the site.
///
/// # Arguments
///
/// * `config`: Site configuration providing groups and base path
/// * `origin`: Site origin for link classification
/// * `current_slug`: Slug of the page being rendered
pub fn sidebar(config: &SiteConfig, origin: &SiteOrigin, current_slug: &str) -> Markup {
    let policy = &config.markdown.external_links;

    html! {
        nav class="sidebar" aria-label="Main" {
            @for group in &config.sidebar {
                details class="sidebar-group" open {
                    summary { (group.label) }
                    ul {
                        @for item in &group.items {
                            @match item.target() {
                                Some(SidebarTarget::Slug(slug)) => {
                                    li {
                                        a href=(page_url(&config.base, slug))
                                            aria-current=[(slug == current_slug).then_some("page")] {
                                            (item.label)
                                        }
                                    }
                                }
                                Some(SidebarTarget::Link(link)) => {
                                    li { (anchor(link, None, policy, origin, html! { (item.label) })) }
                                }
                                None => {}
                            }
                        }
                    }
                }
            }
        }
    }
}
