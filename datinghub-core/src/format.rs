//! Plain text to typed content blocks.
//!
//! Authors write posts as lightly structured text: paragraphs separated by
//! blank lines, short lead-in lines acting as headings, and statistics worth
//! calling out. [`format_content`] turns that text into [`Block`]s. The
//! classification is a heuristic, not a grammar, and is kept exactly as
//! documented on [`classify`] even where it misfires.
//!
//! Block text is passed through verbatim. Escaping is the renderer's job.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Paragraphs with this many words or more are never headings
pub const HEADING_MAX_WORDS: usize = 8;

const KEY_FINDING_MARKER: &str = "Key Finding:";

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();

fn paragraph_break() -> &'static Regex {
    // A line break, optional whitespace-only lines, then another line break
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n\s*\n").unwrap())
}

/// A classified unit of formatted content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Heading { text: String },
    Highlight { text: String },
    /// Lines of a paragraph; a line break belongs between consecutive lines
    Paragraph { lines: Vec<String> },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::Highlight { .. } => BlockKind::Highlight,
            Block::Paragraph { .. } => BlockKind::Paragraph,
        }
    }

    /// Block text with paragraph line breaks as `\n`
    pub fn text(&self) -> String {
        match self {
            Block::Heading { text } | Block::Highlight { text } => text.clone(),
            Block::Paragraph { lines } => lines.join("\n"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Highlight,
    Paragraph,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Highlight => "highlight",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

/// Split `text` into paragraphs and classify each one, preserving order.
///
/// Never fails: empty or whitespace-only input yields no blocks.
///
/// ```
/// use datinghub_core::format::{format_content, Block};
///
/// let blocks = format_content("Key Trends:\n\nMost couples now meet online.");
/// assert_eq!(blocks[0], Block::Heading { text: "Key Trends:".into() });
/// ```
pub fn format_content(text: &str) -> Vec<Block> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match classify(part) {
            BlockKind::Heading => Block::Heading {
                text: part.to_string(),
            },
            BlockKind::Highlight => Block::Highlight {
                text: part.to_string(),
            },
            BlockKind::Paragraph => Block::Paragraph {
                lines: part.lines().map(str::to_string).collect(),
            },
        })
        .collect()
}

/// Classify one trimmed paragraph. First match wins:
///
/// 1. Heading: fewer than [`HEADING_MAX_WORDS`] words and either ends with
///    `:` or starts with `"The "` or `"Key "`.
/// 2. Highlight: contains `"Key Finding:"`, or contains both `%` and `:`.
/// 3. Paragraph otherwise.
pub fn classify(paragraph: &str) -> BlockKind {
    let is_short = paragraph.split_whitespace().count() < HEADING_MAX_WORDS;
    let heading_shaped = paragraph.ends_with(':')
        || paragraph.starts_with("The ")
        || paragraph.starts_with("Key ");

    if is_short && heading_shaped {
        return BlockKind::Heading;
    }

    if paragraph.contains(KEY_FINDING_MARKER) {
        return BlockKind::Highlight;
    }

    if paragraph.contains('%') && paragraph.contains(':') {
        tracing::debug!(
            preview = %preview(paragraph),
            "classified paragraph as highlight from '%' and ':' alone"
        );
        return BlockKind::Highlight;
    }

    BlockKind::Paragraph
}

fn preview(paragraph: &str) -> &str {
    crate::derive::truncate_graphemes(paragraph, 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> Block {
        Block::Heading { text: text.into() }
    }

    fn highlight(text: &str) -> Block {
        Block::Highlight { text: text.into() }
    }

    fn paragraph(lines: &[&str]) -> Block {
        Block::Paragraph {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(format_content("").is_empty());
        assert!(format_content("   \n\n  \t ").is_empty());
    }

    #[test]
    fn test_heading_then_paragraph() {
        let blocks = format_content(
            "The Basics:\n\nThis is a paragraph with more than eight words in it for sure.",
        );
        assert_eq!(
            blocks,
            vec![
                heading("The Basics:"),
                paragraph(&["This is a paragraph with more than eight words in it for sure."]),
            ]
        );
    }

    #[test]
    fn test_statistic_highlight() {
        assert_eq!(
            format_content("Revenue grew 45%: a record year."),
            vec![highlight("Revenue grew 45%: a record year.")]
        );
    }

    #[test]
    fn test_key_finding_highlight() {
        let text = "Key Finding: couples who video chat before meeting report far better first dates overall.";
        assert_eq!(format_content(text), vec![highlight(text)]);
    }

    #[test]
    fn test_heading_takes_precedence_over_highlight() {
        // Short and starts with "Key ", so it is a heading despite the marker
        assert_eq!(format_content("Key Finding: 40%"), vec![heading("Key Finding: 40%")]);
    }

    #[test]
    fn test_heading_rules() {
        assert_eq!(classify("Why video matters:"), BlockKind::Heading);
        assert_eq!(classify("The Video Dating Revolution"), BlockKind::Heading);
        assert_eq!(classify("Key takeaways"), BlockKind::Heading);
        // Eight words is too long
        assert_eq!(
            classify("one two three four five six seven eight:"),
            BlockKind::Paragraph
        );
        // Case sensitive prefixes
        assert_eq!(classify("the basics"), BlockKind::Paragraph);
        assert_eq!(classify("There are many"), BlockKind::Paragraph);
    }

    #[test]
    fn test_percent_without_colon_is_paragraph() {
        assert_eq!(
            classify("Around 40% of couples met online in the last decade alone."),
            BlockKind::Paragraph
        );
    }

    #[test]
    fn test_long_paragraph_with_percent_and_colon_is_highlight() {
        let text = "This is a long paragraph that mentions 12% growth and then explains: a lot more detail.";
        assert_eq!(classify(text), BlockKind::Highlight);
    }

    #[test]
    fn test_single_newlines_become_lines() {
        let blocks = format_content("first line of a long enough paragraph here\nsecond line");
        assert_eq!(
            blocks,
            vec![paragraph(&[
                "first line of a long enough paragraph here",
                "second line"
            ])]
        );
        assert_eq!(blocks[0].text(), "first line of a long enough paragraph here\nsecond line");
    }

    #[test]
    fn test_blank_lines_with_whitespace_split_paragraphs() {
        let blocks = format_content("alpha beta gamma delta\n   \n\n\nepsilon zeta eta theta");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.kind() == BlockKind::Paragraph));
    }

    #[test]
    fn test_crlf_input() {
        let blocks = format_content("The Basics:\r\n\r\nline one of the body text\r\nline two");
        assert_eq!(
            blocks,
            vec![
                heading("The Basics:"),
                paragraph(&["line one of the body text", "line two"]),
            ]
        );
    }

    #[test]
    fn test_order_and_determinism() {
        let text = "The Intro\n\nPlain words with nothing special going on at all.\n\nGrowth: 30%";
        let first = format_content(text);
        assert_eq!(first, format_content(text));
        let kinds: Vec<_> = first.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Heading, BlockKind::Paragraph, BlockKind::Highlight]
        );
    }

    #[test]
    fn test_markup_passes_through() {
        let blocks = format_content("<p>Already <em>formatted</em> html from the editor here.</p>");
        assert_eq!(
            blocks[0].text(),
            "<p>Already <em>formatted</em> html from the editor here.</p>"
        );
    }

    #[test]
    fn test_block_json_shape() {
        let json = serde_json::to_value(heading("The Basics:")).unwrap();
        assert_eq!(json["kind"], "heading");
        assert_eq!(json["text"], "The Basics:");
    }
}
