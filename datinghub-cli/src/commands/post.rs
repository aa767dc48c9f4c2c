//! Post authoring commands: new, edit, list, show, publish.

use crate::api::{envelope, PostData, PostSummary};
use crate::context::open_site;
use crate::ShowFormat;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use datinghub_core::store::published;
use datinghub_core::{
    format_content, normalize_slug, Category, Post, PostChanges, PostDraft, PostStatus,
};
use datinghub_render::render_body;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct NewPostArgs {
    /// Post title
    pub title: String,

    /// Post body text
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Custom slug (derived from the title when omitted)
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub excerpt: Option<String>,

    /// research, trends, technology, psychology or advice
    #[arg(long, default_value = "research")]
    pub category: String,

    /// draft or published
    #[arg(long, default_value = "draft")]
    pub status: String,

    /// Comma-separated tag names
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long)]
    pub meta_title: Option<String>,

    #[arg(long)]
    pub meta_description: Option<String>,

    #[arg(long)]
    pub featured: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EditPostArgs {
    /// Slug of the post to change
    pub slug: String,

    #[arg(long)]
    pub title: Option<String>,

    /// Replacement body text
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the replacement body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// New custom slug; pins the slug against later title changes
    #[arg(long = "slug")]
    pub new_slug: Option<String>,

    /// New excerpt (empty clears it)
    #[arg(long)]
    pub excerpt: Option<String>,

    /// Custom meta title (empty goes back to the derived one)
    #[arg(long)]
    pub meta_title: Option<String>,

    /// Custom meta description (empty goes back to the derived one)
    #[arg(long)]
    pub meta_description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Replace all tags with this comma-separated list
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    #[arg(long)]
    pub featured: Option<bool>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn read_body(body: Option<String>, body_file: Option<&Path>) -> Result<Option<String>> {
    match (body, body_file) {
        (Some(body), _) => Ok(Some(body)),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Failed to read {:?}", path)),
        (None, None) => Ok(None),
    }
}

fn parse_category(name: &str) -> Result<Category> {
    Category::from_str(name).ok_or_else(|| anyhow!("Unknown category: {}", name))
}

fn print_post(post: &Post, verb: &str, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&envelope("post.full", PostData::from(post)))?
        );
    } else {
        println!("✓ {} {} ({})", verb, post.slug, post.status.as_str());
        println!("  meta title: {}", post.meta_title);
        println!("  read time:  {} min", post.read_time);
    }
    Ok(())
}

pub fn new_post(config_path: &Path, args: NewPostArgs) -> Result<()> {
    let site = open_site(config_path)?;

    let body = read_body(args.body, args.body_file.as_deref())?.unwrap_or_default();
    let category = parse_category(&args.category)?;
    let status = PostStatus::from_str(&args.status)
        .ok_or_else(|| anyhow!("Unknown status: {}", args.status))?;

    let draft = PostDraft {
        slug: args.slug,
        excerpt: args.excerpt,
        meta_title: args.meta_title,
        meta_description: args.meta_description,
        category: Some(category),
        status: Some(status),
        author: Some(site.config.site.author.clone()),
        author_bio: site.config.site.author_bio.clone(),
        tags: args.tags,
        is_featured: args.featured,
        ..PostDraft::new(args.title, body)
    };

    let post = site.service.create(draft)?;
    print_post(&post, "Created", args.json)
}

/// Change an existing post; derived fields are recomputed on save
pub fn edit_post(config_path: &Path, args: EditPostArgs) -> Result<()> {
    let site = open_site(config_path)?;
    let slug = normalize_slug(&args.slug);

    let changes = PostChanges {
        title: args.title,
        body: read_body(args.body, args.body_file.as_deref())?,
        slug: args.new_slug,
        excerpt: args.excerpt,
        meta_title: args.meta_title,
        meta_description: args.meta_description,
        category: args.category.as_deref().map(parse_category).transpose()?,
        status: None,
        tags: args.tags,
        is_featured: args.featured,
    };

    let post = site.service.update(&slug, changes)?;
    if post.slug != slug {
        tracing::info!(from = %slug, to = %post.slug, "Slug changed");
    }
    print_post(&post, "Updated", args.json)
}

pub fn list_posts(
    config_path: &Path,
    all: bool,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let site = open_site(config_path)?;
    let store = site.service.store();

    let category = category.map(parse_category).transpose()?;

    let candidates = if all { store.all() } else { published(store) };
    let posts: Vec<Post> = candidates
        .into_iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect();

    if json {
        let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&envelope("post.list", summaries))?
        );
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts");
        return Ok(());
    }
    for post in &posts {
        println!(
            "{:<10} {}  {}  ({})",
            post.status.as_str(),
            post.published_date.format("%Y-%m-%d"),
            post.slug,
            post.title
        );
    }
    Ok(())
}

pub fn show_post(config_path: &Path, slug: &str, format: ShowFormat) -> Result<()> {
    let site = open_site(config_path)?;
    let slug = normalize_slug(slug);
    let post = site
        .service
        .store()
        .get_by_slug(&slug)
        .ok_or_else(|| anyhow!("Post not found: {}", slug))?;

    match format {
        ShowFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&envelope("post.full", PostData::from(&post)))?
        ),
        ShowFormat::Html => println!("{}", render_body(&post.body)),
        ShowFormat::Blocks => {
            for block in format_content(&post.body) {
                println!("[{}] {}", block.kind().as_str(), block.text().replace('\n', " / "));
            }
        }
        ShowFormat::Raw => println!("{}", post.body),
    }
    Ok(())
}

pub fn set_published(config_path: &Path, slug: &str, publish: bool) -> Result<()> {
    let site = open_site(config_path)?;
    let slug = normalize_slug(slug);
    let post = if publish {
        site.service.publish(&slug)?
    } else {
        site.service.unpublish(&slug)?
    };
    println!("✓ {} is now {}", post.slug, post.status.as_str());
    Ok(())
}
