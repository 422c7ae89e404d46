use std::collections::HashSet;

use log::warn;
use serde::Serialize;

use crate::codec::grammar::Section;
use crate::models::Article;

const UNTITLED: &str = "Untitled Article";

/// Structured fields recovered from a user-edited Markdown document.
///
/// Missing sections come back as empty strings (empty sequence for tags);
/// `title` falls back to `"Untitled Article"` when the document has no level-1
/// heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArticle {
    pub title: String,
    pub problem: String,
    pub solution: String,
    pub expected_result: String,
    pub prerequisites: String,
    pub additional_notes: String,
    pub tags: Vec<String>,
}

impl ParsedArticle {
    /// Lift the parsed fields into an [`Article`], adopting `content_markdown`
    /// as the authoritative document the fields were recovered from.
    pub fn into_article(self, content_markdown: String) -> Article {
        fn opt(value: String) -> Option<String> {
            (!value.is_empty()).then_some(value)
        }

        Article {
            ticket_key: None,
            title: self.title,
            problem: self.problem,
            solution: self.solution,
            expected_result: opt(self.expected_result),
            prerequisites: opt(self.prerequisites),
            additional_notes: opt(self.additional_notes),
            tags: self.tags,
            content_markdown,
            template_id: None,
        }
    }

    fn field_mut(&mut self, section: Section) -> Option<&mut String> {
        match section {
            Section::Problem => Some(&mut self.problem),
            Section::Solution => Some(&mut self.solution),
            Section::ExpectedResult => Some(&mut self.expected_result),
            Section::Prerequisites => Some(&mut self.prerequisites),
            Section::AdditionalNotes => Some(&mut self.additional_notes),
            Section::Tags => None,
        }
    }
}

/// Diagnostic emitted while parsing. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A canonical section was opened a second time, via the same heading or
    /// one of its aliases. Content is appended, not replaced.
    DuplicateSection { heading: String, section: Section },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::DuplicateSection { heading, section } => write!(
                f,
                "duplicate section \"{heading}\", appending content to {}",
                section.canonical_heading()
            ),
        }
    }
}

/// Parse arbitrary Markdown into article fields, logging any diagnostics.
///
/// Total over arbitrary text: unrecognized input degrades to ignored content,
/// never an error.
pub fn parse_markdown(markdown: &str) -> ParsedArticle {
    let (article, warnings) = parse_markdown_with_warnings(markdown);
    for warning in &warnings {
        warn!("{warning}");
    }
    article
}

/// [`parse_markdown`], returning the diagnostics to the caller instead of
/// logging them.
pub fn parse_markdown_with_warnings(markdown: &str) -> (ParsedArticle, Vec<ParseWarning>) {
    let mut article = ParsedArticle::default();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut open: Option<OpenSection> = None;

    for line in markdown.lines() {
        // First level-1 heading anywhere wins the title; later ones are
        // ordinary content of whatever section is open.
        if article.title.is_empty()
            && let Some(text) = heading_text(line, 1)
        {
            article.title = text.to_string();
            continue;
        }

        if let Some(text) = heading_text(line, 2) {
            if let Some(finished) = open.take() {
                finished.close(&mut article, &mut seen, &mut warnings);
            }
            open = Some(OpenSection {
                heading: text.to_string(),
                lines: Vec::new(),
            });
            continue;
        }

        // Verbatim accumulation, blank lines included, so multi-paragraph
        // section content survives.
        if let Some(open) = open.as_mut() {
            open.lines.push(line);
        }
    }

    if let Some(finished) = open.take() {
        finished.close(&mut article, &mut seen, &mut warnings);
    }

    if article.title.is_empty() {
        article.title = UNTITLED.to_string();
    }

    (article, warnings)
}

/// A `##` section currently accumulating lines. The heading is kept as
/// written; alias resolution happens when the section closes.
struct OpenSection<'a> {
    heading: String,
    lines: Vec<&'a str>,
}

impl OpenSection<'_> {
    fn close(
        self,
        article: &mut ParsedArticle,
        seen: &mut HashSet<Section>,
        warnings: &mut Vec<ParseWarning>,
    ) {
        // Sections with no lines at all neither assign nor count as seen.
        if self.lines.is_empty() {
            return;
        }
        // Unrecognized sections are legal; their content is discarded.
        let Some(section) = Section::from_heading(&self.heading) else {
            return;
        };

        let content = self.lines.join("\n").trim().to_string();
        let repeated = !seen.insert(section);
        if repeated {
            warnings.push(ParseWarning::DuplicateSection {
                heading: self.heading,
                section,
            });
        }

        if section == Section::Tags {
            let new_tags = content
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string);
            if repeated {
                article.tags.extend(new_tags);
            } else {
                article.tags = new_tags.collect();
            }
        } else if let Some(field) = article.field_mut(section) {
            if repeated {
                field.push_str("\n\n");
                field.push_str(&content);
            } else {
                *field = content;
            }
        }
    }
}

/// ATX heading detection for exactly `level` markers followed by whitespace.
/// Returns the trimmed heading text. `###` and deeper never match here and so
/// stay inside the open section.
fn heading_text(line: &str, level: usize) -> Option<&str> {
    let mut rest = line;
    for _ in 0..level {
        rest = rest.strip_prefix('#')?;
    }
    if rest.starts_with('#') {
        return None;
    }
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    Some(rest.trim())
}
