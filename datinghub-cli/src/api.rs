//! Shared JSON shapes for `--json` output and the `/api` endpoints.

use datinghub_core::{format_content, Block, Post};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "2026-10-posts-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

#[derive(Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub category: String,
    pub status: String,
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
    pub read_time: u32,
    pub published_date: String,
    pub views: u64,
    pub is_featured: bool,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            url: post.url(),
            category: post.category.as_str().to_string(),
            status: post.status.as_str().to_string(),
            tags: post.tags.iter().map(|t| t.slug.clone()).collect(),
            excerpt: post.excerpt.clone(),
            read_time: post.read_time,
            published_date: post.published_date.to_rfc3339(),
            views: post.views,
            is_featured: post.is_featured,
        }
    }
}

#[derive(Serialize)]
pub struct PostData {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: String,
    pub word_count: usize,
    pub body: String,
    pub blocks: Vec<Block>,
}

impl From<&Post> for PostData {
    fn from(post: &Post) -> Self {
        Self {
            summary: PostSummary::from(post),
            meta_title: post.meta_title.clone(),
            meta_description: post.meta_description.clone(),
            keywords: post.keywords(),
            word_count: post.word_count(),
            body: post.body.clone(),
            blocks: format_content(&post.body),
        }
    }
}

/// One page of post summaries
#[derive(Serialize)]
pub struct PostPage {
    pub page: usize,
    pub num_pages: usize,
    pub total: usize,
    pub posts: Vec<PostSummary>,
}

#[derive(Serialize)]
pub struct FormatData {
    pub blocks: Vec<Block>,
    pub html: String,
}
