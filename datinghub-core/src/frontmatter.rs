//! Frontmatter parsing from markdown post files.

use crate::models::{Category, PostDraft, PostStatus};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Metadata block at the top of a post file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostFrontmatter {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// `YYYY-MM-DD` or RFC 3339
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub meta_title: Option<String>,

    #[serde(default)]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub featured_image_alt: Option<String>,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub canonical_url: Option<String>,
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    // Closing delimiter may be the last line of the file
    FRONTMATTER_REGEX
        .get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---[ \t]*(?:\n(.*))?$").unwrap())
}

/// Split a post file into frontmatter and body.
///
/// A file without a frontmatter block has no title, which is an error: every
/// post needs one.
///
/// # Example
///
/// ```
/// use datinghub_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ndate: 2025-01-01\n---\nThe Basics:\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.title, "My Post");
/// assert_eq!(fm.date, Some("2025-01-01".to_string()));
/// assert!(body.trim().starts_with("The Basics:"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(PostFrontmatter, String), FrontmatterError> {
    let captures = frontmatter_regex()
        .captures(content)
        .ok_or_else(|| FrontmatterError::MissingField("title".to_string()))?;

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let frontmatter: PostFrontmatter = serde_yaml::from_str(yaml)?;
    if frontmatter.title.trim().is_empty() {
        return Err(FrontmatterError::MissingField("title".to_string()));
    }

    Ok((frontmatter, body.to_string()))
}

/// Parse a post file straight into a draft ready for the authoring service
pub fn parse_post(content: &str) -> Result<PostDraft, FrontmatterError> {
    let (fm, body) = parse_frontmatter(content)?;

    let category = fm
        .category
        .as_deref()
        .map(|value| {
            Category::from_str(value).ok_or_else(|| FrontmatterError::InvalidValue {
                field: "category",
                value: value.to_string(),
            })
        })
        .transpose()?;

    let status = fm
        .status
        .as_deref()
        .map(|value| {
            PostStatus::from_str(value).ok_or_else(|| FrontmatterError::InvalidValue {
                field: "status",
                value: value.to_string(),
            })
        })
        .transpose()?;

    let published_date = fm.date.as_deref().map(parse_date).transpose()?;

    Ok(PostDraft {
        title: fm.title,
        body: body.trim().to_string(),
        slug: fm.slug,
        excerpt: fm.excerpt,
        meta_title: fm.meta_title,
        meta_description: fm.meta_description,
        category,
        status,
        author: fm.author,
        author_bio: None,
        tags: fm.tags,
        featured_image: fm.featured_image,
        featured_image_alt: fm.featured_image_alt,
        published_date,
        is_featured: fm.is_featured,
        canonical_url: fm.canonical_url,
    })
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, FrontmatterError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| FrontmatterError::InvalidValue {
            field: "date",
            value: raw.to_string(),
        })
}
