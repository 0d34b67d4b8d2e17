//! Reusable HTML components for page generation
//!
//! Maud component functions shared by every page type: document layout,
//! site header, sidebar navigation and the on-page table of contents.

pub mod header;
pub mod icons;
pub mod layout;
pub mod link;
pub mod sidebar;
pub mod toc;
