//! Import command: create posts from markdown files.

use crate::context::open_site;
use anyhow::{bail, Result};
use datinghub_core::import::import_dir;
use std::path::Path;

pub fn import_posts(config_path: &Path, dir: Option<&Path>) -> Result<()> {
    let site = open_site(config_path)?;
    let dir = dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| site.config.content_dir());

    if !dir.is_dir() {
        bail!("Content directory not found: {:?}", dir);
    }

    let report = import_dir(&dir, &site.service);

    for post in &report.created {
        println!("Created {} ({})", post.slug, post.status.as_str());
    }
    for (path, err) in &report.failed {
        eprintln!("Skipped {:?}: {}", path, err);
    }
    println!(
        "✓ Imported {} posts, {} failed",
        report.created.len(),
        report.failed.len()
    );

    if report.created.is_empty() && !report.failed.is_empty() {
        bail!("No posts imported");
    }
    Ok(())
}
