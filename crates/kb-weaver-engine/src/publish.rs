//! Conversion of article markdown to Confluence storage-format XHTML.
//!
//! Only the conversion lives here; shipping the result to a wiki is the
//! surrounding system's job. Total: unsupported constructs degrade to
//! warnings, never an error.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub xhtml: String,
    /// Deduplicated notes about constructs the storage format build drops.
    pub warnings: Vec<String>,
}

#[derive(Debug)]
enum ListKind {
    Ordered,
    Unordered,
}

pub fn to_storage_format(markdown: &str) -> Conversion {
    let mut output = String::new();
    let mut warnings = Vec::new();
    let mut list_stack: Vec<ListKind> = Vec::new();
    let mut in_code_block = false;

    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => output.push_str("<p>"),
                Tag::Heading { level, .. } => {
                    output.push_str(&format!("<h{}>", heading_number(level)));
                }
                Tag::BlockQuote(_) => output.push_str("<blockquote>"),
                Tag::CodeBlock(kind) => {
                    in_code_block = true;
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang.to_string(),
                        CodeBlockKind::Indented => "plain".to_string(),
                    };
                    output.push_str(&format!(
                        r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">{}</ac:parameter><ac:plain-text-body><![CDATA["#,
                        escape_text(&lang)
                    ));
                }
                Tag::List(None) => {
                    output.push_str("<ul>");
                    list_stack.push(ListKind::Unordered);
                }
                Tag::List(Some(_)) => {
                    output.push_str("<ol>");
                    list_stack.push(ListKind::Ordered);
                }
                Tag::Item => output.push_str("<li>"),
                Tag::Strong => output.push_str("<strong>"),
                Tag::Emphasis => output.push_str("<em>"),
                Tag::Strikethrough => output.push_str("<del>"),
                Tag::Link { dest_url, .. } => {
                    output.push_str(&format!(r#"<a href="{}">"#, escape_attr(&dest_url)));
                }
                Tag::Image { .. } => {
                    warnings.push("Images are not supported - will be omitted".to_string());
                }
                Tag::Table(_) => {
                    warnings.push(
                        "Tables are not supported - content will be rendered as text".to_string(),
                    );
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph => output.push_str("</p>\n"),
                TagEnd::Heading(level) => {
                    output.push_str(&format!("</h{}>\n", heading_number(level)));
                }
                TagEnd::BlockQuote(_) => output.push_str("</blockquote>\n"),
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    output.push_str("]]></ac:plain-text-body></ac:structured-macro>\n");
                }
                TagEnd::List(_) => {
                    if let Some(kind) = list_stack.pop() {
                        match kind {
                            ListKind::Ordered => output.push_str("</ol>\n"),
                            ListKind::Unordered => output.push_str("</ul>\n"),
                        }
                    }
                }
                TagEnd::Item => output.push_str("</li>"),
                TagEnd::Strong => output.push_str("</strong>"),
                TagEnd::Emphasis => output.push_str("</em>"),
                TagEnd::Strikethrough => output.push_str("</del>"),
                TagEnd::Link => output.push_str("</a>"),
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    // Raw inside CDATA; only the terminator needs care.
                    output.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
                } else {
                    output.push_str(&escape_text(&text));
                }
            }
            Event::Code(code) => {
                output.push_str(&format!("<code>{}</code>", escape_text(&code)));
            }
            Event::SoftBreak => output.push(' '),
            Event::HardBreak => output.push_str("<br/>"),
            Event::Rule => output.push_str("<hr/>\n"),
            Event::TaskListMarker(_) => {
                warnings
                    .push("Task lists are not supported - checkboxes will be omitted".to_string());
            }
            _ => {}
        }
    }

    warnings.sort();
    warnings.dedup();

    Conversion {
        xhtml: output,
        warnings,
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).to_string()
}

fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).to_string()
}
