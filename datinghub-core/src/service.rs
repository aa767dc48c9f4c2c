//! Authoring workflow: validate, derive, persist.

use crate::derive::{
    derive_fields, derive_meta_description, derive_meta_title, derive_read_time, DeriveInput,
};
use crate::models::{Post, PostChanges, PostDraft, PostStatus, Tag, DEFAULT_AUTHOR, POST_SCHEMA_VERSION};
use crate::slug::slugify;
use crate::store::{PostStore, StoreError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Input rejected before any derivation runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Body is required")]
    MissingBody,

    #[error("Slug '{0}' is not URL-safe (expected '{1}')")]
    InvalidSlug(String, String),

    #[error("Title '{0}' produces an empty slug; set one explicitly")]
    EmptySlug(String),
}

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Invalid post: {0}")]
    Validation(#[from] ValidationError),

    /// The store refused the write, e.g. a slug already in use
    #[error("Slug already exists: {0}")]
    PersistenceConflict(String),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateSlug(slug) => PostError::PersistenceConflict(slug),
            StoreError::NotFound(slug) => PostError::NotFound(slug),
            other => PostError::Store(other),
        }
    }
}

/// Creates and edits posts on top of a [`PostStore`]
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn PostStore {
        self.store.as_ref()
    }

    /// Validate a draft, fill derived fields and persist it
    pub fn create(&self, draft: PostDraft) -> Result<Post, PostError> {
        require_text(&draft.title, ValidationError::MissingTitle)?;
        require_text(&draft.body, ValidationError::MissingBody)?;

        let custom_slug = non_blank(draft.slug.as_deref());
        if let Some(slug) = custom_slug {
            check_slug(slug)?;
        }
        let excerpt = non_blank(draft.excerpt.as_deref());
        let meta_title = non_blank(draft.meta_title.as_deref());
        let meta_description = non_blank(draft.meta_description.as_deref());

        let derived = derive_fields(&DeriveInput {
            title: &draft.title,
            body: &draft.body,
            excerpt,
            slug: custom_slug,
            meta_title,
            meta_description,
        });
        if derived.slug.is_empty() {
            return Err(ValidationError::EmptySlug(draft.title).into());
        }

        let now = Utc::now();
        let post = Post {
            id: 0,
            title: draft.title.trim().to_string(),
            slug: derived.slug,
            slug_customized: custom_slug.is_some(),
            excerpt: excerpt.map(str::to_string),
            body: draft.body.clone(),
            category: draft.category.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            author: non_blank(draft.author.as_deref())
                .unwrap_or(DEFAULT_AUTHOR)
                .to_string(),
            author_bio: non_blank(draft.author_bio.as_deref()).map(str::to_string),
            featured_image: draft.featured_image,
            featured_image_alt: draft.featured_image_alt,
            meta_title: derived.meta_title,
            meta_description: derived.meta_description,
            meta_title_customized: meta_title.is_some(),
            meta_description_customized: meta_description.is_some(),
            tags: collect_tags(&draft.tags),
            read_time: derived.read_time,
            published_date: draft.published_date.unwrap_or(now),
            created_date: now,
            updated_date: now,
            views: 0,
            shares: 0,
            is_featured: draft.is_featured,
            canonical_url: non_blank(draft.canonical_url.as_deref()).map(str::to_string),
            schema_version: POST_SCHEMA_VERSION,
        };

        let post = self.store.insert(post)?;
        tracing::info!(slug = %post.slug, read_time = post.read_time, "Created post");
        Ok(post)
    }

    /// Apply changes to an existing post and recompute derived fields.
    ///
    /// The slug follows a title change only while it was never customized.
    /// Meta fields follow title/excerpt/body unless the author set them.
    pub fn update(&self, slug: &str, changes: PostChanges) -> Result<Post, PostError> {
        let mut post = self
            .store
            .get_by_slug(slug)
            .ok_or_else(|| PostError::NotFound(slug.to_string()))?;

        let mut title_changed = false;
        if let Some(title) = changes.title {
            require_text(&title, ValidationError::MissingTitle)?;
            let title = title.trim().to_string();
            title_changed = title != post.title;
            post.title = title;
        }
        if let Some(body) = changes.body {
            require_text(&body, ValidationError::MissingBody)?;
            post.body = body;
        }
        if let Some(excerpt) = changes.excerpt {
            post.excerpt = non_blank(Some(&excerpt)).map(str::to_string);
        }
        if let Some(category) = changes.category {
            post.category = category;
        }
        if let Some(status) = changes.status {
            post.status = status;
        }
        if let Some(tags) = changes.tags {
            post.tags = collect_tags(&tags);
        }
        if let Some(is_featured) = changes.is_featured {
            post.is_featured = is_featured;
        }

        match non_blank(changes.slug.as_deref()) {
            Some(new_slug) => {
                check_slug(new_slug)?;
                post.slug = new_slug.to_string();
                post.slug_customized = true;
            }
            None if title_changed && !post.slug_customized => {
                let derived = slugify(&post.title);
                if derived.is_empty() {
                    return Err(ValidationError::EmptySlug(post.title).into());
                }
                post.slug = derived;
            }
            None => {}
        }

        if let Some(meta_title) = changes.meta_title {
            post.meta_title_customized = !meta_title.trim().is_empty();
            post.meta_title = meta_title;
        }
        if !post.meta_title_customized {
            post.meta_title = derive_meta_title(&post.title, None);
        }

        if let Some(meta_description) = changes.meta_description {
            post.meta_description_customized = !meta_description.trim().is_empty();
            post.meta_description = meta_description;
        }
        if !post.meta_description_customized {
            post.meta_description =
                derive_meta_description(post.excerpt.as_deref(), &post.body, None);
        }

        post.read_time = derive_read_time(&post.body);
        post.updated_date = Utc::now();

        let post = self.store.update(post)?;
        tracing::info!(old_slug = %slug, slug = %post.slug, "Updated post");
        Ok(post)
    }

    pub fn publish(&self, slug: &str) -> Result<Post, PostError> {
        self.set_status(slug, PostStatus::Published)
    }

    pub fn unpublish(&self, slug: &str) -> Result<Post, PostError> {
        self.set_status(slug, PostStatus::Draft)
    }

    fn set_status(&self, slug: &str, status: PostStatus) -> Result<Post, PostError> {
        self.update(
            slug,
            PostChanges {
                status: Some(status),
                ..PostChanges::default()
            },
        )
    }

    /// Look up a post visible to readers
    pub fn get_published(&self, slug: &str) -> Result<Post, PostError> {
        self.store
            .get_by_slug(slug)
            .filter(Post::is_published)
            .ok_or_else(|| PostError::NotFound(slug.to_string()))
    }

    /// Count a read of a published post; the store does the increment
    pub fn record_view(&self, slug: &str) -> Result<u64, PostError> {
        Ok(self.store.increment_views(slug)?)
    }
}

fn require_text(value: &str, err: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(())
    }
}

fn check_slug(slug: &str) -> Result<(), ValidationError> {
    let normalized = slugify(slug);
    if normalized != slug {
        return Err(ValidationError::InvalidSlug(slug.to_string(), normalized));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Tags from raw names, dropping blanks and duplicate slugs
fn collect_tags(names: &[String]) -> Vec<Tag> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(Tag::new)
        .filter(|tag| !tag.slug.is_empty() && seen.insert(tag.slug.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::store::MemoryStore;

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStore::new()))
    }

    fn filler(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn test_create_derives_fields() {
        let svc = service();
        let post = svc
            .create(PostDraft::new("Hello, World! 2026", filler(400)))
            .unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.slug, "hello-world-2026");
        assert!(!post.slug_customized);
        assert_eq!(post.meta_title, "Hello, World! 2026");
        assert_eq!(post.read_time, 2);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.category, Category::Research);
        assert_eq!(post.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_create_uses_excerpt_for_description() {
        let svc = service();
        let excerpt = "e".repeat(150);
        let post = svc
            .create(PostDraft {
                excerpt: Some(excerpt.clone()),
                meta_description: Some("".into()),
                ..PostDraft::new("Title", "Body")
            })
            .unwrap();
        assert_eq!(post.meta_description, excerpt);
        assert!(!post.meta_description_customized);
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let svc = service();
        assert!(matches!(
            svc.create(PostDraft::new("  ", "Body")),
            Err(PostError::Validation(ValidationError::MissingTitle))
        ));
        assert!(matches!(
            svc.create(PostDraft::new("Title", "\n\n")),
            Err(PostError::Validation(ValidationError::MissingBody))
        ));
        assert!(matches!(
            svc.create(PostDraft::new("???", "Body")),
            Err(PostError::Validation(ValidationError::EmptySlug(_)))
        ));
    }

    #[test]
    fn test_create_rejects_unsafe_custom_slug() {
        let svc = service();
        let err = svc
            .create(PostDraft {
                slug: Some("Not A Slug".into()),
                ..PostDraft::new("Title", "Body")
            })
            .unwrap_err();
        match err {
            PostError::Validation(ValidationError::InvalidSlug(given, expected)) => {
                assert_eq!(given, "Not A Slug");
                assert_eq!(expected, "not-a-slug");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_slug_is_persistence_conflict() {
        let svc = service();
        svc.create(PostDraft::new("Same Title", "one")).unwrap();
        let err = svc.create(PostDraft::new("Same Title", "two")).unwrap_err();
        assert!(matches!(err, PostError::PersistenceConflict(ref slug) if slug == "same-title"));
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let svc = service();
        let post = svc
            .create(PostDraft {
                tags: vec!["Trust".into(), "trust".into(), " ".into(), "Online Dating".into()],
                ..PostDraft::new("Tagged", "Body")
            })
            .unwrap();
        let slugs: Vec<_> = post.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["trust", "online-dating"]);
    }

    #[test]
    fn test_title_change_rederives_uncustomized_slug() {
        let svc = service();
        svc.create(PostDraft::new("First Title", "Body")).unwrap();

        let updated = svc
            .update(
                "first-title",
                PostChanges {
                    title: Some("Second Title".into()),
                    ..PostChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.slug, "second-title");
        assert_eq!(updated.meta_title, "Second Title");
        assert!(svc.store().get_by_slug("first-title").is_none());
    }

    #[test]
    fn test_title_change_keeps_custom_slug_and_meta() {
        let svc = service();
        svc.create(PostDraft {
            slug: Some("chosen".into()),
            meta_title: Some("Custom Meta".into()),
            ..PostDraft::new("First Title", "Body")
        })
        .unwrap();

        let updated = svc
            .update(
                "chosen",
                PostChanges {
                    title: Some("Second Title".into()),
                    ..PostChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.slug, "chosen");
        assert_eq!(updated.meta_title, "Custom Meta");
    }

    #[test]
    fn test_body_change_recomputes_read_time_and_description() {
        let svc = service();
        svc.create(PostDraft::new("Post", "short")).unwrap();

        let updated = svc
            .update(
                "post",
                PostChanges {
                    body: Some(filler(1000)),
                    ..PostChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.read_time, 5);
        assert!(updated.meta_description.ends_with("..."));
    }

    #[test]
    fn test_clearing_meta_override_restores_derivation() {
        let svc = service();
        svc.create(PostDraft {
            meta_description: Some("Custom".into()),
            ..PostDraft::new("Post", "The body")
        })
        .unwrap();

        let updated = svc
            .update(
                "post",
                PostChanges {
                    meta_description: Some(String::new()),
                    ..PostChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.meta_description, "The body");
        assert!(!updated.meta_description_customized);
    }

    #[test]
    fn test_rename_into_taken_slug_conflicts() {
        let svc = service();
        svc.create(PostDraft::new("Alpha", "Body")).unwrap();
        svc.create(PostDraft::new("Beta", "Body")).unwrap();

        let err = svc
            .update(
                "beta",
                PostChanges {
                    title: Some("Alpha".into()),
                    ..PostChanges::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PostError::PersistenceConflict(_)));
    }

    #[test]
    fn test_publish_and_views() {
        let svc = service();
        svc.create(PostDraft::new("Post", "Body")).unwrap();
        assert!(matches!(svc.get_published("post"), Err(PostError::NotFound(_))));

        svc.publish("post").unwrap();
        assert!(svc.get_published("post").is_ok());
        assert_eq!(svc.record_view("post").unwrap(), 1);
        assert_eq!(svc.record_view("post").unwrap(), 2);

        svc.unpublish("post").unwrap();
        assert!(svc.get_published("post").is_err());
        assert!(matches!(svc.update("nope", PostChanges::default()), Err(PostError::NotFound(_))));
    }
}
