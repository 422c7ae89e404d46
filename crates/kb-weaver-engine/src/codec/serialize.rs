use crate::codec::grammar::Section;
use crate::models::Article;

/// Compose the canonical Markdown document for an article's structured fields.
///
/// Always emits the title heading, `## Problem` and `## Solution`; the
/// optional sections follow in fixed order and are omitted entirely when
/// empty. Tags are carried outside the document by the form (the ticket-import
/// pathway emits them as a `## Tags` section instead; the parser accepts
/// both). Total: every well-typed article serializes.
pub fn compose_markdown(article: &Article) -> String {
    let mut out = format!(
        "# {}\n\n## {}\n{}\n\n## {}\n{}\n\n",
        article.title,
        Section::Problem.canonical_heading(),
        article.problem,
        Section::Solution.canonical_heading(),
        article.solution,
    );

    let optional = [
        (Section::ExpectedResult, article.expected_result.as_deref()),
        (Section::Prerequisites, article.prerequisites.as_deref()),
        (Section::AdditionalNotes, article.additional_notes.as_deref()),
    ];
    for (section, value) in optional {
        if let Some(value) = value
            && !value.is_empty()
        {
            out.push_str(&format!("## {}\n{}\n\n", section.canonical_heading(), value));
        }
    }

    out.trim().to_string()
}
