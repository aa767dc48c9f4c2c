//! Post persistence.
//!
//! [`PostStore`] is the seam to whatever durably holds posts. The store owns
//! slug uniqueness and view counting; callers never read-modify-write a
//! counter themselves. [`MemoryStore`] keeps posts in memory and can snapshot
//! them to a JSON file.

use crate::models::{Category, CategoryCount, Post};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable home of posts
pub trait PostStore: Send + Sync {
    /// Insert a new post, assigning its id. Fails on a taken slug.
    fn insert(&self, post: Post) -> Result<Post, StoreError>;

    /// Replace the post with the same id. Fails if the (possibly changed)
    /// slug belongs to another post.
    fn update(&self, post: Post) -> Result<Post, StoreError>;

    fn get_by_slug(&self, slug: &str) -> Option<Post>;

    /// All posts, newest publication date first
    fn all(&self) -> Vec<Post>;

    /// Atomically add one view, returning the new count
    fn increment_views(&self, slug: &str) -> Result<u64, StoreError>;
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    posts: BTreeMap<u64, Post>,
}

impl Inner {
    fn slug_owner(&self, slug: &str) -> Option<u64> {
        self.posts
            .values()
            .find(|p| p.slug == slug)
            .map(|p| p.id)
    }
}

/// In-memory store with optional JSON snapshot file
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a JSON snapshot. A missing file starts empty;
    /// every successful write rewrites the snapshot.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut inner = Inner::default();

        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let posts: Vec<Post> = serde_json::from_str(&contents)?;
            for post in posts {
                inner.next_id = inner.next_id.max(post.id);
                inner.posts.insert(post.id, post);
            }
            tracing::info!("Loaded {} posts from {:?}", inner.posts.len(), path);
        } else {
            tracing::debug!("No snapshot at {:?}, starting empty", path);
        }

        Ok(Self {
            inner: RwLock::new(inner),
            snapshot: Some(path.to_path_buf()),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let posts: Vec<&Post> = inner.posts.values().collect();
        std::fs::write(path, serde_json::to_string_pretty(&posts)?)?;
        Ok(())
    }
}

impl PostStore for MemoryStore {
    fn insert(&self, mut post: Post) -> Result<Post, StoreError> {
        let mut inner = self.inner.write();
        if inner.slug_owner(&post.slug).is_some() {
            return Err(StoreError::DuplicateSlug(post.slug));
        }

        post.id = inner.next_id + 1;
        inner.posts.insert(post.id, post.clone());
        if let Err(err) = self.persist(&inner) {
            inner.posts.remove(&post.id);
            return Err(err);
        }
        inner.next_id = post.id;
        Ok(post)
    }

    fn update(&self, post: Post) -> Result<Post, StoreError> {
        let mut inner = self.inner.write();
        if !inner.posts.contains_key(&post.id) {
            return Err(StoreError::NotFound(post.slug));
        }
        if let Some(owner) = inner.slug_owner(&post.slug) {
            if owner != post.id {
                return Err(StoreError::DuplicateSlug(post.slug));
            }
        }

        let previous = inner.posts.insert(post.id, post.clone());
        if let Err(err) = self.persist(&inner) {
            if let Some(previous) = previous {
                inner.posts.insert(previous.id, previous);
            }
            return Err(err);
        }
        Ok(post)
    }

    fn get_by_slug(&self, slug: &str) -> Option<Post> {
        self.inner
            .read()
            .posts
            .values()
            .find(|p| p.slug == slug)
            .cloned()
    }

    fn all(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.inner.read().posts.values().cloned().collect();
        sort_newest_first(&mut posts);
        posts
    }

    fn increment_views(&self, slug: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.write();
        let post = inner
            .posts
            .values_mut()
            .find(|p| p.slug == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;
        post.views += 1;
        let (id, views) = (post.id, post.views);
        if let Err(err) = self.persist(&inner) {
            if let Some(post) = inner.posts.get_mut(&id) {
                post.views -= 1;
            }
            return Err(err);
        }
        Ok(views)
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.published_date
            .cmp(&a.published_date)
            .then_with(|| b.id.cmp(&a.id))
    });
}

// ---- Queries over published posts ----

/// Published posts, newest first
pub fn published(store: &dyn PostStore) -> Vec<Post> {
    store.all().into_iter().filter(Post::is_published).collect()
}

pub fn published_in_category(store: &dyn PostStore, category: Category) -> Vec<Post> {
    published(store)
        .into_iter()
        .filter(|p| p.category == category)
        .collect()
}

pub fn published_with_tag(store: &dyn PostStore, tag_slug: &str) -> Vec<Post> {
    published(store)
        .into_iter()
        .filter(|p| p.has_tag(tag_slug))
        .collect()
}

/// Published posts in the same category as `post`, excluding it
pub fn related(posts: &[Post], post: &Post, limit: usize) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| p.id != post.id && p.category == post.category)
        .take(limit)
        .cloned()
        .collect()
}

/// Most recent posts other than `exclude`
pub fn recent(posts: &[Post], exclude: Option<u64>, limit: usize) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| Some(p.id) != exclude)
        .take(limit)
        .cloned()
        .collect()
}

/// The nearest older post (shown as "next" when reading newest first)
pub fn next_post(posts: &[Post], post: &Post) -> Option<Post> {
    posts
        .iter()
        .filter(|p| p.published_date < post.published_date)
        .max_by_key(|p| p.published_date)
        .cloned()
}

/// The nearest newer post
pub fn previous_post(posts: &[Post], post: &Post) -> Option<Post> {
    posts
        .iter()
        .filter(|p| p.published_date > post.published_date)
        .min_by_key(|p| p.published_date)
        .cloned()
}

/// Post counts per category, skipping empty categories
pub fn category_counts(posts: &[Post]) -> Vec<CategoryCount> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let post_count = posts.iter().filter(|p| p.category == category).count();
            (post_count > 0).then(|| CategoryCount {
                category,
                name: category.display_name(),
                slug: category.as_str(),
                post_count,
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{PostStatus, Tag, DEFAULT_AUTHOR, POST_SCHEMA_VERSION};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    pub(crate) fn post(slug: &str, category: Category, days: i64) -> Post {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(days);
        Post {
            id: 0,
            title: slug.replace('-', " "),
            slug: slug.into(),
            slug_customized: false,
            excerpt: None,
            body: "body".into(),
            category,
            status: PostStatus::Published,
            author: DEFAULT_AUTHOR.into(),
            author_bio: None,
            featured_image: None,
            featured_image_alt: None,
            meta_title: slug.into(),
            meta_description: "body".into(),
            meta_title_customized: false,
            meta_description_customized: false,
            tags: vec![],
            read_time: 1,
            published_date: date,
            created_date: date,
            updated_date: date,
            views: 0,
            shares: 0,
            is_featured: false,
            canonical_url: None,
            schema_version: POST_SCHEMA_VERSION,
        }
    }

    #[test]
    fn test_insert_assigns_ids_and_rejects_duplicates() {
        let store = MemoryStore::new();
        let a = store.insert(post("a", Category::Research, 0)).unwrap();
        let b = store.insert(post("b", Category::Research, 1)).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        match store.insert(post("a", Category::Trends, 2)) {
            Err(StoreError::DuplicateSlug(slug)) => assert_eq!(slug, "a"),
            other => panic!("expected duplicate slug, got {:?}", other.map(|p| p.slug)),
        }
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_checks_slug_owner() {
        let store = MemoryStore::new();
        store.insert(post("a", Category::Research, 0)).unwrap();
        let mut b = store.insert(post("b", Category::Research, 1)).unwrap();

        b.slug = "a".into();
        assert!(matches!(store.update(b.clone()), Err(StoreError::DuplicateSlug(_))));

        b.slug = "b-renamed".into();
        store.update(b).unwrap();
        assert!(store.get_by_slug("b-renamed").is_some());
        assert!(store.get_by_slug("b").is_none());
    }

    #[test]
    fn test_update_unknown_post() {
        let store = MemoryStore::new();
        let mut p = post("ghost", Category::Research, 0);
        p.id = 42;
        assert!(matches!(store.update(p), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_increment_views() {
        let store = MemoryStore::new();
        store.insert(post("a", Category::Research, 0)).unwrap();
        assert_eq!(store.increment_views("a").unwrap(), 1);
        assert_eq!(store.increment_views("a").unwrap(), 2);
        assert_eq!(store.get_by_slug("a").unwrap().views, 2);
        assert!(store.increment_views("missing").is_err());
    }

    #[test]
    fn test_concurrent_view_increments() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.insert(post("a", Category::Research, 0)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.increment_views("a").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_by_slug("a").unwrap().views, 800);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data/posts.json");

        let store = MemoryStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.insert(post("a", Category::Research, 0)).unwrap();
        store.insert(post("b", Category::Advice, 1)).unwrap();
        drop(store);

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        let c = reopened.insert(post("c", Category::Advice, 2)).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_failed_snapshot_write_rolls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let store = MemoryStore::open(&path).unwrap();
        let kept = store.insert(post("kept", Category::Research, 0)).unwrap();

        // A directory where the snapshot file should be makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.insert(post("hello", Category::Research, 1)),
            Err(StoreError::Io(_))
        ));
        assert!(store.get_by_slug("hello").is_none());
        assert_eq!(store.len(), 1);

        let mut renamed = kept.clone();
        renamed.slug = "renamed".into();
        assert!(store.update(renamed).is_err());
        assert!(store.get_by_slug("kept").is_some());
        assert!(store.get_by_slug("renamed").is_none());

        assert!(store.increment_views("kept").is_err());
        assert_eq!(store.get_by_slug("kept").unwrap().views, 0);

        // Once the snapshot is writable again the retry is not a conflict
        std::fs::remove_dir(&path).unwrap();
        let hello = store.insert(post("hello", Category::Research, 1)).unwrap();
        assert_eq!(hello.id, kept.id + 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_published_queries() {
        let store = MemoryStore::new();
        let mut draft = post("draft", Category::Research, 5);
        draft.status = PostStatus::Draft;
        store.insert(draft).unwrap();
        store.insert(post("old", Category::Research, 0)).unwrap();
        store.insert(post("mid", Category::Advice, 1)).unwrap();
        let mut tagged = post("new", Category::Research, 2);
        tagged.tags = vec![Tag::new("Video Dating")];
        store.insert(tagged).unwrap();

        let slugs = |posts: Vec<Post>| posts.into_iter().map(|p| p.slug).collect::<Vec<_>>();

        assert_eq!(slugs(published(&store)), vec!["new", "mid", "old"]);
        assert_eq!(
            slugs(published_in_category(&store, Category::Research)),
            vec!["new", "old"]
        );
        assert_eq!(slugs(published_with_tag(&store, "video-dating")), vec!["new"]);
    }

    #[test]
    fn test_related_recent_and_neighbors() {
        let store = MemoryStore::new();
        for (slug, category, day) in [
            ("a", Category::Research, 0),
            ("b", Category::Advice, 1),
            ("c", Category::Research, 2),
            ("d", Category::Research, 3),
        ] {
            store.insert(post(slug, category, day)).unwrap();
        }
        let posts = published(&store);
        let c = store.get_by_slug("c").unwrap();

        let related_slugs: Vec<_> = related(&posts, &c, 3).into_iter().map(|p| p.slug).collect();
        assert_eq!(related_slugs, vec!["d", "a"]);

        let recent_slugs: Vec<_> = recent(&posts, Some(c.id), 2).into_iter().map(|p| p.slug).collect();
        assert_eq!(recent_slugs, vec!["d", "b"]);

        assert_eq!(next_post(&posts, &c).unwrap().slug, "b");
        assert_eq!(previous_post(&posts, &c).unwrap().slug, "d");
        let d = store.get_by_slug("d").unwrap();
        assert!(previous_post(&posts, &d).is_none());
    }

    #[test]
    fn test_category_counts_skip_empty() {
        let posts = vec![
            post("a", Category::Advice, 0),
            post("b", Category::Research, 1),
            post("c", Category::Advice, 2),
        ];
        let counts = category_counts(&posts);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].slug, "research");
        assert_eq!(counts[0].post_count, 1);
        assert_eq!(counts[1].name, "Practical Advice");
        assert_eq!(counts[1].post_count, 2);
    }
}
