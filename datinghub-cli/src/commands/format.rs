//! Format command: preview how a body will be split into blocks.

use crate::api::envelope;
use crate::FormatOutput;
use anyhow::{Context, Result};
use datinghub_core::format_content;
use datinghub_render::render_blocks;
use std::io::Read;
use std::path::Path;

pub fn format_file(file: Option<&Path>, output: FormatOutput) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let blocks = format_content(&text);
    tracing::debug!("Formatted {} blocks", blocks.len());

    match output {
        FormatOutput::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&envelope("content.blocks", &blocks))?
            );
        }
        FormatOutput::Html => println!("{}", render_blocks(&blocks)),
    }
    Ok(())
}
