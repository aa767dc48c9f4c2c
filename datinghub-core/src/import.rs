//! Bulk creation of posts from a directory of markdown files.

use crate::frontmatter::{parse_post, FrontmatterError};
use crate::models::Post;
use crate::service::{PostError, PostService};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error(transparent)]
    Post(#[from] PostError),
}

/// Outcome of an import run. One bad file never stops the others.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub created: Vec<Post>,
    pub failed: Vec<(PathBuf, ImportError)>,
}

/// Markdown files under `dir`, sorted for a stable import order
pub fn discover_markdown_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}

/// Create one post from a markdown file
pub fn import_file(path: &Path, service: &PostService) -> Result<Post, ImportError> {
    let contents = std::fs::read_to_string(path)?;
    let draft = parse_post(&contents)?;
    Ok(service.create(draft)?)
}

/// Create a post for every markdown file under `dir`
pub fn import_dir(dir: &Path, service: &PostService) -> ImportReport {
    let files = discover_markdown_files(dir);
    tracing::info!("Found {} markdown files in {:?}", files.len(), dir);

    let mut report = ImportReport::default();
    for path in files {
        match import_file(&path, service) {
            Ok(post) => {
                tracing::debug!(slug = %post.slug, "Imported {:?}", path);
                report.created.push(post);
            }
            Err(e) => {
                tracing::error!("Failed to import {:?}: {}", path, e);
                report.failed.push((path, e));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_import_dir_collects_failures() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("research");
        fs::create_dir_all(&nested).unwrap();

        fs::write(
            dir.path().join("a.md"),
            "---\ntitle: First Post\nstatus: published\n---\nBody one",
        )
        .unwrap();
        fs::write(nested.join("b.md"), "---\ntitle: Second Post\n---\nBody two").unwrap();
        fs::write(nested.join("dup.md"), "---\ntitle: First Post\n---\nAgain").unwrap();
        fs::write(dir.path().join("broken.md"), "no frontmatter").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let service = PostService::new(Arc::new(MemoryStore::new()));
        let report = import_dir(dir.path(), &service);

        let slugs: Vec<_> = report.created.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first-post", "second-post"]);
        assert_eq!(report.failed.len(), 2);
        assert!(report
            .failed
            .iter()
            .any(|(_, e)| matches!(e, ImportError::Post(PostError::PersistenceConflict(_)))));
        assert!(report
            .failed
            .iter()
            .any(|(_, e)| matches!(e, ImportError::Frontmatter(_))));
    }
}
