//! Block to HTML emission.

use datinghub_core::format::{format_content, Block};

/// HTML escape function to prevent XSS
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render one block as an HTML element. Block text is always escaped.
pub fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { text } => {
            format!("<h3 class=\"content-heading\">{}</h3>", html_escape(text))
        }
        Block::Highlight { text } => {
            format!("<div class=\"key-finding\">{}</div>", html_escape(text))
        }
        Block::Paragraph { lines } => {
            let inner = lines
                .iter()
                .map(|line| html_escape(line))
                .collect::<Vec<_>>()
                .join("<br>");
            format!("<p class=\"blog-paragraph\">{}</p>", inner)
        }
    }
}

/// Render blocks in order, one element per line
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format raw post text and render it
pub fn render_body(text: &str) -> String {
    render_blocks(&format_content(text))
}
