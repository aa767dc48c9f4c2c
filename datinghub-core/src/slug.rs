//! Slug generation and normalization.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUN: OnceLock<Regex> = OnceLock::new();

fn hyphen_run() -> &'static Regex {
    HYPHEN_RUN.get_or_init(|| Regex::new(r"-{2,}").unwrap())
}

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Every run of non-alphanumeric characters becomes a single hyphen
/// - Trim leading/trailing hyphens
///
/// Alphanumeric is judged per grapheme cluster, so accented letters written
/// with combining marks survive intact.
///
/// # Examples
///
/// ```
/// use datinghub_core::slugify;
///
/// assert_eq!(slugify("Hello, World! 2026"), "hello-world-2026");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    let separated = lowercased
        .graphemes(true)
        .map(|g| match g.chars().next() {
            Some(c) if c.is_alphanumeric() => g,
            _ => "-",
        })
        .collect::<String>();

    let collapsed = hyphen_run().replace_all(&separated, "-");

    collapsed.trim_matches('-').to_string()
}

/// Keep an explicitly chosen slug, otherwise derive one from the title.
///
/// Uniqueness is not checked here; the store rejects duplicates.
pub fn derive_slug(title: &str, existing_slug: Option<&str>) -> String {
    match existing_slug.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(title),
    }
}

/// Normalize a user-typed slug or post path (e.g. "/blog/Some-Post/")
pub fn normalize_slug(slug: &str) -> String {
    let trimmed = slug.trim().trim_matches('/');
    let trimmed = trimmed.strip_prefix("blog/").unwrap_or(trimmed);
    slugify(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Hello, World! 2026"), "hello-world-2026");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("Node.js Tips"), "node-js-tips");
        assert_eq!(slugify("What's new?"), "what-s-new");
        assert_eq!(slugify("AI Matchmaking: 45% Better?"), "ai-matchmaking-45-better");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café Culture"), "café-culture");
        assert_eq!(slugify("naïve"), "naïve");
    }

    #[test]
    fn test_runs_collapse() {
        assert_eq!(slugify("Hello    World"), "hello-world");
        assert_eq!(slugify("a -- b __ c"), "a-b-c");
    }

    #[test]
    fn test_leading_trailing_hyphens() {
        assert_eq!(slugify("  Hello World  "), "hello-world");
        assert_eq!(slugify("-Leading Hyphen"), "leading-hyphen");
        assert_eq!(slugify("Trailing Hyphen-"), "trailing-hyphen");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_derive_slug_keeps_existing() {
        assert_eq!(derive_slug("New Title", Some("custom-slug")), "custom-slug");
        assert_eq!(derive_slug("New Title", Some("   ")), "new-title");
        assert_eq!(derive_slug("New Title", None), "new-title");
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("/blog-post/"), "blog-post");
        assert_eq!(normalize_slug("Needs_Fixing"), "needs-fixing");
        assert_eq!(normalize_slug(" /blog/Some-Post/ "), "some-post");
        assert_eq!(normalize_slug("blog"), "blog");
    }

    proptest! {
        #[test]
        fn slugify_is_idempotent(title in "[a-zA-Z0-9 ,.!?'&_%:éüß-]{0,60}") {
            let once = slugify(&title);
            prop_assert_eq!(slugify(&once), once.clone());
        }

        #[test]
        fn slugify_output_is_url_safe(title in "[a-zA-Z0-9à-ÿ \t,.!?_&%-]{0,40}") {
            let slug = slugify(&title);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(!slug.chars().any(char::is_whitespace));
        }
    }
}
