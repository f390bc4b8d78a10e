//! Markdown rendering for content pages and blog posts.
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Renders a markdown document to an HTML fragment.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(content, options);
    let mut html_output = String::with_capacity(content.len() * 2);
    html::push_html(&mut html_output, parser);
    html_output
}

/// Extracts the text of the first level-1 heading, used as the page title.
pub fn extract_title(content: &str) -> Option<String> {
    let parser = Parser::new(content);
    let mut in_h1 = false;
    let mut title = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                return Some(title);
            }
            Event::Text(text) | Event::Code(text) if in_h1 => title.push_str(&text),
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Hello\n\nSome *emphasis*.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_render_markdown_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("# Getting Started\n\nbody").as_deref(),
            Some("Getting Started")
        );
    }

    #[test]
    fn test_extract_title_with_inline_code() {
        assert_eq!(
            extract_title("# Using `tosky`\n").as_deref(),
            Some("Using tosky")
        );
    }

    #[test]
    fn test_extract_title_ignores_lower_headings() {
        assert_eq!(extract_title("## Subsection\n\nbody"), None);
    }
}
