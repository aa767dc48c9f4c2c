//! Metadata derivation: slug, SEO meta fields and read time.
//!
//! Everything here is a pure function over text. The authoring service runs
//! [`derive_fields`] before every save so that persisted posts never carry
//! blank derived fields.

use crate::slug::derive_slug;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum length of a derived meta title
pub const META_TITLE_MAX: usize = 200;

/// Maximum length of a meta description taken from the excerpt
pub const META_DESCRIPTION_MAX: usize = 300;

/// Characters of body kept when the meta description falls back to the body
pub const BODY_PREVIEW_LEN: usize = 297;

/// Reading speed assumed by [`derive_read_time`]
pub const WORDS_PER_MINUTE: usize = 200;

const ELLIPSIS: &str = "...";

/// Raw record fields the deriver looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct DeriveInput<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub excerpt: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub meta_title: Option<&'a str>,
    pub meta_description: Option<&'a str>,
}

/// Fully populated derived fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub slug: String,
    pub meta_title: String,
    pub meta_description: String,
    pub read_time: u32,
}

/// Fill every derivable field, keeping non-blank author overrides
pub fn derive_fields(input: &DeriveInput<'_>) -> DerivedFields {
    DerivedFields {
        slug: derive_slug(input.title, input.slug),
        meta_title: derive_meta_title(input.title, input.meta_title),
        meta_description: derive_meta_description(
            input.excerpt,
            input.body,
            input.meta_description,
        ),
        read_time: derive_read_time(input.body),
    }
}

/// Keep a non-blank meta title, otherwise cap the title at [`META_TITLE_MAX`]
///
/// ```
/// use datinghub_core::derive::derive_meta_title;
///
/// assert_eq!(derive_meta_title("Dating in 2026", None), "Dating in 2026");
/// assert_eq!(derive_meta_title("Dating in 2026", Some("Custom")), "Custom");
/// ```
pub fn derive_meta_title(title: &str, existing: Option<&str>) -> String {
    if let Some(existing) = non_blank(existing) {
        return existing.to_string();
    }
    truncate_at_word(title, META_TITLE_MAX).to_string()
}

/// Keep a non-blank meta description, otherwise use the excerpt, otherwise
/// the start of the body.
pub fn derive_meta_description(
    excerpt: Option<&str>,
    body: &str,
    existing: Option<&str>,
) -> String {
    if let Some(existing) = non_blank(existing) {
        return existing.to_string();
    }
    if let Some(excerpt) = non_blank(excerpt) {
        return truncate_graphemes(excerpt, META_DESCRIPTION_MAX).to_string();
    }
    if body.graphemes(true).count() > META_DESCRIPTION_MAX {
        format!("{}{}", truncate_graphemes(body, BODY_PREVIEW_LEN), ELLIPSIS)
    } else {
        body.to_string()
    }
}

/// Minutes to read `body` at [`WORDS_PER_MINUTE`], never less than one.
///
/// There is no override: the value is recomputed on every save.
pub fn derive_read_time(body: &str) -> u32 {
    let minutes = body.split_whitespace().count() / WORDS_PER_MINUTE;
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// First `max` grapheme clusters of `text`
pub fn truncate_graphemes(text: &str, max: usize) -> &str {
    match text.grapheme_indices(true).nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cap `text` at `max` graphemes, backing up to the last word boundary when
/// the cut would land inside a word. A single word longer than `max` is cut
/// hard.
pub fn truncate_at_word(text: &str, max: usize) -> &str {
    let cut = truncate_graphemes(text, max);
    if cut.len() == text.len() {
        return text;
    }

    let next_is_space = text[cut.len()..]
        .chars()
        .next()
        .is_some_and(char::is_whitespace);
    if next_is_space {
        return cut.trim_end();
    }

    match cut.rfind(char::is_whitespace) {
        Some(idx) if !cut[..idx].trim_end().is_empty() => cut[..idx].trim_end(),
        _ => cut,
    }
}
