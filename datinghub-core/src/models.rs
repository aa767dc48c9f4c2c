//! Content model structs for posts, tags, and categories.

use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current shape of a persisted [`Post`]. Bumped whenever a field is added
/// or changes meaning, so snapshots written by older builds can be detected.
pub const POST_SCHEMA_VERSION: u32 = 1;

/// Default byline for posts without an explicit author
pub const DEFAULT_AUTHOR: &str = "Dating Hub Research Team";

/// Blog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Research,
    Trends,
    Technology,
    Psychology,
    Advice,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 5] = [
        Category::Research,
        Category::Trends,
        Category::Technology,
        Category::Psychology,
        Category::Advice,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "research" => Some(Category::Research),
            "trends" => Some(Category::Trends),
            "technology" => Some(Category::Technology),
            "psychology" => Some(Category::Psychology),
            "advice" => Some(Category::Advice),
            _ => None,
        }
    }

    /// URL slug for the category page
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Research => "research",
            Category::Trends => "trends",
            Category::Technology => "technology",
            Category::Psychology => "psychology",
            Category::Advice => "advice",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Research => "Research Insights",
            Category::Trends => "Dating Trends",
            Category::Technology => "Technology & Dating",
            Category::Psychology => "Relationship Psychology",
            Category::Advice => "Practical Advice",
        }
    }
}

/// Publication state; only published posts are visible on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

/// A label attached to posts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Create a tag, deriving its slug from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let slug = slugify(&name);
        Self { name, slug }
    }
}

/// A blog post as persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier (0 until inserted)
    #[serde(default)]
    pub id: u64,

    pub title: String,

    /// URL slug (e.g., "rise-of-video-dating")
    pub slug: String,

    /// True when the author chose the slug; such slugs never follow title edits
    #[serde(default)]
    pub slug_customized: bool,

    #[serde(default)]
    pub excerpt: Option<String>,

    /// Raw body text, possibly already containing HTML from a rich editor
    pub body: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub status: PostStatus,

    pub author: String,

    #[serde(default)]
    pub author_bio: Option<String>,

    #[serde(default)]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub featured_image_alt: Option<String>,

    pub meta_title: String,

    pub meta_description: String,

    /// Whether the meta fields were typed by the author rather than derived
    #[serde(default)]
    pub meta_title_customized: bool,

    #[serde(default)]
    pub meta_description_customized: bool,

    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Estimated minutes to read, always derived from the body
    pub read_time: u32,

    pub published_date: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,

    #[serde(default)]
    pub views: u64,

    #[serde(default)]
    pub shares: u64,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub canonical_url: Option<String>,

    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_schema_version() -> u32 {
    POST_SCHEMA_VERSION
}

impl Post {
    /// Site-relative URL of the post detail page
    pub fn url(&self) -> String {
        format!("/blog/{}/", self.slug)
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Whitespace-delimited word count of the body
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Keywords for the meta tag: category first, then tag names
    pub fn keywords(&self) -> String {
        std::iter::once(self.category.as_str())
            .chain(self.tags.iter().map(|t| t.name.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_tag(&self, tag_slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == tag_slug)
    }
}

/// Author input for a new post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub meta_title: Option<String>,

    #[serde(default)]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub status: Option<PostStatus>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub author_bio: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub featured_image_alt: Option<String>,

    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub canonical_url: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }
}

/// Partial update of an existing post; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub category: Option<Category>,
    pub status: Option<PostStatus>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

/// Posts in one category, for sidebars
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub name: &'static str,
    pub slug: &'static str,
    pub post_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "Test".into(),
            slug: "test-post".into(),
            slug_customized: false,
            excerpt: None,
            body: "one two three".into(),
            category: Category::Psychology,
            status: PostStatus::Draft,
            author: DEFAULT_AUTHOR.into(),
            author_bio: None,
            featured_image: None,
            featured_image_alt: None,
            meta_title: "Test".into(),
            meta_description: "one two three".into(),
            meta_title_customized: false,
            meta_description_customized: false,
            tags: vec![Tag::new("Attachment Styles"), Tag::new("Trust")],
            read_time: 1,
            published_date: now,
            created_date: now,
            updated_date: now,
            views: 0,
            shares: 0,
            is_featured: false,
            canonical_url: None,
            schema_version: POST_SCHEMA_VERSION,
        }
    }

    #[test]
    fn test_category_conversion() {
        assert_eq!(Category::from_str("research"), Some(Category::Research));
        assert_eq!(Category::from_str("TRENDS"), Some(Category::Trends));
        assert_eq!(Category::from_str("dating-apps"), None);
        assert_eq!(Category::Technology.display_name(), "Technology & Dating");
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(PostStatus::from_str("Published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::from_str("archived"), None);
        assert_eq!(PostStatus::default(), PostStatus::Draft);
    }

    #[test]
    fn test_tag_slug() {
        let tag = Tag::new("  Online Dating ");
        assert_eq!(tag.name, "Online Dating");
        assert_eq!(tag.slug, "online-dating");
    }

    #[test]
    fn test_post_helpers() {
        let post = sample_post();
        assert_eq!(post.url(), "/blog/test-post/");
        assert_eq!(post.word_count(), 3);
        assert_eq!(post.keywords(), "psychology, Attachment Styles, Trust");
        assert!(post.has_tag("trust"));
        assert!(!post.is_published());
    }

    #[test]
    fn test_post_json_defaults() {
        let json = r#"{
            "title": "Old",
            "slug": "old",
            "body": "text",
            "author": "A",
            "meta_title": "Old",
            "meta_description": "text",
            "read_time": 1,
            "published_date": "2025-01-01T00:00:00Z",
            "created_date": "2025-01-01T00:00:00Z",
            "updated_date": "2025-01-01T00:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.category, Category::Research);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.schema_version, POST_SCHEMA_VERSION);
        assert!(post.tags.is_empty());
    }
}
