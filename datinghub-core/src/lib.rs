//! # datinghub-core
//!
//! Core library for the Dating Hub research site.
//!
//! Posts are authored as plain text. At save time the [`derive`] module fills
//! slug, meta fields and read time; at render time the [`format`] module turns
//! the body into typed blocks. Both are pure. Persistence sits behind
//! [`store::PostStore`] and the authoring workflow in [`service`] ties them
//! together.

pub mod config;
pub mod derive;
pub mod format;
pub mod frontmatter;
pub mod import;
pub mod models;
pub mod pagination;
pub mod service;
pub mod slug;
pub mod store;
pub mod survey;

pub use config::Config;
pub use derive::{derive_fields, derive_read_time, DeriveInput, DerivedFields};
pub use format::{format_content, Block, BlockKind};
pub use models::{Category, CategoryCount, Post, PostChanges, PostDraft, PostStatus, Tag};
pub use pagination::{paginate, Page};
pub use service::{PostError, PostService, ValidationError};
pub use slug::{derive_slug, normalize_slug, slugify};
pub use store::{MemoryStore, PostStore, StoreError};
