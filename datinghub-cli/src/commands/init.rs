//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../datinghub.yml.example");

/// Initialize a new site: config file, content directory and a starter post
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("✓ datinghub initialized in {:?}", root);
    println!("  - Edit datinghub.yml to customize site metadata");
    println!("  - Write posts in content/, then run `datinghub import`");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("datinghub.yml");
    if config_path.exists() {
        println!("datinghub.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let content = root.join("content");
    let data = root.join("data");

    for dir in [&content, &data] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let sample = content.join("welcome.md");
    if !sample.exists() {
        fs::write(&sample, SAMPLE_POST)?;
        println!("Created {:?}", sample);
    }

    Ok(())
}

const SAMPLE_POST: &str = r#"---
title: What Our First Survey Told Us
category: research
status: draft
tags: [surveys, methodology]
---
The Headline Numbers:

Key Finding: Most respondents met their last partner online.

Response rate was 38%: higher than we expected for a voluntary survey.

Paragraphs are separated by a blank line. Lines inside a paragraph
keep their line breaks when rendered.
"#;
