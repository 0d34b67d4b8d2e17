//! Links emitted directly as markup

use maud::{Markup, html};

use crate::markdown::{LinkPolicy, SiteOrigin};

/// Renders an anchor, applying the external link policy when `href`
/// leaves the site
///
/// Header and sidebar links bypass the markdown pipeline, so they are
/// classified here with the same rules as document links.
///
/// # Arguments
///
/// * `href`: Link destination
/// * `class`: Optional CSS class
/// * `policy`: External link policy
/// * `origin`: Site origin for classification
/// * `body`: Link content
pub fn anchor(
    href: &str,
    class: Option<&str>,
    policy: &LinkPolicy,
    origin: &SiteOrigin,
    body: Markup,
) -> Markup {
    let external = policy.attributes_for(href, origin);
    let target = external.as_ref().map(|(target, _)| *target);
    let rel = external
        .as_ref()
        .map(|(_, rel)| rel.as_str())
        .filter(|rel| !rel.is_empty());

    html! {
        a href=(href) class=[class] target=[target] rel=[rel] { (body) }
    }
}
