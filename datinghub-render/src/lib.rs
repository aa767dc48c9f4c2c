//! # datinghub-render
//!
//! HTML rendering for the Dating Hub site.
//!
//! [`blocks`] emits formatted post bodies as escaped HTML; [`templates`]
//! holds the Askama page templates and [`pages`] the informational pages.

pub mod blocks;
pub mod pages;
pub mod templates;

pub use blocks::{html_escape, render_block, render_blocks, render_body};
pub use pages::{find_page, HomeTemplate, InfoPage, InfoPageTemplate, PageKind, PageLink, PAGES};
pub use templates::{
    CategoryLink, ListingTemplate, NotFoundTemplate, Pager, PostCard, PostContext, PostTemplate,
    SiteMeta, SurveyTemplate, TagLink, ThankYouTemplate,
};
