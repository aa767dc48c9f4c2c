//! Survey submission review: list requests and mark them handled.

use crate::api::envelope;
use crate::context::open_submissions;
use anyhow::{Context, Result};
use datinghub_core::Config;
use std::path::Path;

fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))
}

pub fn list_submissions(config_path: &Path, pending: bool, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let store = open_submissions(&config)?;
    let submissions: Vec<_> = store
        .list()
        .into_iter()
        .filter(|s| !pending || !s.processed)
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&envelope("submission.list", &submissions))?
        );
        return Ok(());
    }

    if submissions.is_empty() {
        println!("No submissions");
        return Ok(());
    }
    for submission in &submissions {
        println!(
            "#{:<4} {}  {:<9} {}  [{}]",
            submission.id,
            submission.submitted_at.format("%Y-%m-%d %H:%M"),
            if submission.processed { "processed" } else { "pending" },
            submission.display_name(),
            submission.survey_type.description(),
        );
        if !submission.notes.is_empty() {
            println!("      notes: {}", submission.notes);
        }
    }
    Ok(())
}

pub fn mark_processed(
    config_path: &Path,
    id: u64,
    processed: bool,
    notes: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let store = open_submissions(&config)?;
    let submission = store.mark_processed(id, processed, notes)?;
    println!(
        "✓ Submission #{} is now {}",
        submission.id,
        if submission.processed { "processed" } else { "pending" }
    );
    Ok(())
}
