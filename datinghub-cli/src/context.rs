//! Loading config and opening the stores for a command.

use anyhow::{Context, Result};
use datinghub_core::survey::SubmissionStore;
use datinghub_core::{Config, MemoryStore, PostService};
use std::path::Path;
use std::sync::Arc;

/// Config plus an authoring service over the configured snapshot
pub struct SiteContext {
    pub config: Config,
    pub service: PostService,
}

pub fn open_site(config_path: &Path) -> Result<SiteContext> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config {:?}", config_path))?;

    let data_path = config.data_path();
    let store = MemoryStore::open(&data_path)
        .with_context(|| format!("Failed to open post store {:?}", data_path))?;

    Ok(SiteContext {
        config,
        service: PostService::new(Arc::new(store)),
    })
}

/// Survey submissions at the configured snapshot
pub fn open_submissions(config: &Config) -> Result<SubmissionStore> {
    let path = config.submissions_path();
    SubmissionStore::open(&path)
        .with_context(|| format!("Failed to open submission store {:?}", path))
}
