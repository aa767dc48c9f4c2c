//! Askama template definitions.

use crate::blocks::render_body;
use askama::Template;
use chrono::{Datelike, Utc};
use datinghub_core::pagination::Page;
use datinghub_core::{CategoryCount, Config, Post};

/// Site-wide values every page needs
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub name: String,
    pub description: String,
    pub url: String,
    pub year: i32,
    pub google_analytics_id: Option<String>,
}

impl SiteMeta {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.site.name.clone(),
            description: config.site.description.clone(),
            url: config.site.url.trim_end_matches('/').to_string(),
            year: Utc::now().year(),
            google_analytics_id: config
                .site
                .google_analytics_id
                .clone()
                .filter(|id| !id.is_empty()),
        }
    }
}

/// A post summary for listings and sidebars
#[derive(Debug, Clone)]
pub struct PostCard {
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub category_name: String,
    pub category_url: String,
    pub date: String,
    pub read_time: u32,
    pub featured_image: Option<String>,
    pub featured_image_alt: String,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            url: post.url(),
            title: post.title.clone(),
            excerpt: post
                .excerpt
                .clone()
                .unwrap_or_else(|| post.meta_description.clone()),
            category_name: post.category.display_name().to_string(),
            category_url: category_url(post.category.as_str()),
            date: post.published_date.format("%B %-d, %Y").to_string(),
            read_time: post.read_time,
            featured_image: post.featured_image.clone(),
            featured_image_alt: post
                .featured_image_alt
                .clone()
                .unwrap_or_else(|| post.title.clone()),
        }
    }
}

/// Sidebar category link
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: String,
    pub url: String,
    pub post_count: usize,
}

impl From<&CategoryCount> for CategoryLink {
    fn from(count: &CategoryCount) -> Self {
        Self {
            name: count.name.to_string(),
            url: category_url(count.slug),
            post_count: count.post_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagLink {
    pub name: String,
    pub url: String,
}

fn category_url(slug: &str) -> String {
    format!("/blog/category/{}/", slug)
}

fn tag_url(slug: &str) -> String {
    format!("/blog/tag/{}/", slug)
}

/// Pager links; `base_path` is the listing URL without query
#[derive(Debug, Clone)]
pub struct Pager {
    pub number: usize,
    pub num_pages: usize,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl Pager {
    pub fn new<T>(page: &Page<T>, base_path: &str) -> Self {
        let link = |n: usize| format!("{}?page={}", base_path, n);
        Self {
            number: page.number,
            num_pages: page.num_pages,
            previous_url: page.previous_page_number().map(link),
            next_url: page.next_page_number().map(link),
        }
    }
}

/// Blog index, category and tag listings
#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingTemplate {
    pub site: SiteMeta,
    pub page_title: String,
    pub heading: String,
    pub posts: Vec<PostCard>,
    pub featured: Vec<PostCard>,
    pub pager: Pager,
    pub categories: Vec<CategoryLink>,
    pub recent: Vec<PostCard>,
}

/// Inputs for [`PostTemplate::build`]
pub struct PostContext<'a> {
    pub site: SiteMeta,
    pub post: &'a Post,
    pub related: &'a [Post],
    pub recent: &'a [Post],
    pub categories: &'a [CategoryCount],
    pub next: Option<&'a Post>,
    pub previous: Option<&'a Post>,
}

/// Single post page
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub site: SiteMeta,
    pub page_title: String,

    // SEO
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: String,
    pub canonical_url: String,
    pub structured_data: String,

    // Content
    pub title: String,
    pub author: String,
    pub author_bio: Option<String>,
    pub date: String,
    pub read_time: u32,
    pub category_name: String,
    pub category_url: String,
    pub tags: Vec<TagLink>,
    pub featured_image: Option<String>,
    pub featured_image_alt: String,
    pub content: String,

    // Navigation
    pub related: Vec<PostCard>,
    pub recent: Vec<PostCard>,
    pub categories: Vec<CategoryLink>,
    pub next: Option<PostCard>,
    pub previous: Option<PostCard>,
}

impl PostTemplate {
    pub fn build(ctx: PostContext<'_>) -> Self {
        let post = ctx.post;
        let canonical_url = post
            .canonical_url
            .clone()
            .unwrap_or_else(|| format!("{}{}", ctx.site.url, post.url()));
        let structured_data = serde_json::json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": post.meta_title,
            "description": post.meta_description,
            "author": { "@type": "Organization", "name": post.author },
            "datePublished": post.published_date.to_rfc3339(),
            "dateModified": post.updated_date.to_rfc3339(),
            "wordCount": post.word_count(),
            "keywords": post.keywords(),
            "mainEntityOfPage": canonical_url,
        })
        .to_string()
        // Keep the JSON inert inside a <script> element
        .replace('<', "\\u003c");

        Self {
            page_title: format!("{} - Blog - {}", post.title, ctx.site.name),
            meta_title: post.meta_title.clone(),
            meta_description: post.meta_description.clone(),
            keywords: post.keywords(),
            canonical_url,
            structured_data,
            title: post.title.clone(),
            author: post.author.clone(),
            author_bio: post.author_bio.clone(),
            date: post.published_date.format("%B %-d, %Y").to_string(),
            read_time: post.read_time,
            category_name: post.category.display_name().to_string(),
            category_url: category_url(post.category.as_str()),
            tags: post
                .tags
                .iter()
                .map(|t| TagLink {
                    name: t.name.clone(),
                    url: tag_url(&t.slug),
                })
                .collect(),
            featured_image: post.featured_image.clone(),
            featured_image_alt: post
                .featured_image_alt
                .clone()
                .unwrap_or_else(|| post.title.clone()),
            content: render_body(&post.body),
            related: ctx.related.iter().map(PostCard::from).collect(),
            recent: ctx.recent.iter().map(PostCard::from).collect(),
            categories: ctx.categories.iter().map(CategoryLink::from).collect(),
            next: ctx.next.map(PostCard::from),
            previous: ctx.previous.map(PostCard::from),
            site: ctx.site,
        }
    }
}

/// Survey form, re-rendered with an error on invalid input
#[derive(Template)]
#[template(path = "survey.html")]
pub struct SurveyTemplate {
    pub site: SiteMeta,
    pub error: Option<String>,
    pub email: String,
    pub name: String,
}

#[derive(Template)]
#[template(path = "thank_you.html")]
pub struct ThankYouTemplate {
    pub site: SiteMeta,
    pub response_window_hours: u32,
}

/// 404 error page template
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub site: SiteMeta,
    pub message: String,
}
