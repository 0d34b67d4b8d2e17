//! Page generation modules for different view types
//!
//! Each page module assembles shared components from the components
//! module into a complete HTML document.

pub mod doc;
pub mod not_found;

use crate::markdown::SiteOrigin;
use crate::site::SiteConfig;

/// Site wide data shared by every generated page.
#[derive(Debug, Clone, Copy)]
pub struct SiteContext<'a> {
    pub config: &'a SiteConfig,
    pub origin: &'a SiteOrigin,
    /// Published logo URL, when a logo is configured.
    pub logo_url: Option<&'a str>,
}
