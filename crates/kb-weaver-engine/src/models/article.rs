use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A knowledge-base article as edited in the app.
///
/// `content_markdown` carries the serialized document and is kept consistent
/// with the structured fields by [`crate::compose::FormAssembler`]. The three
/// required fields (`title`, `problem`, `solution`) may be empty while the
/// article is being drafted; completeness is checked at the save boundary via
/// [`Article::validate`], never by the codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub ticket_key: Option<String>,
    pub title: String,
    pub problem: String,
    pub solution: String,
    pub expected_result: Option<String>,
    pub prerequisites: Option<String>,
    pub additional_notes: Option<String>,
    pub tags: Vec<String>,
    pub content_markdown: String,
    pub template_id: Option<String>,
}

impl Article {
    /// Save-boundary validation: title, problem and solution must be non-blank.
    pub fn validate(&self) -> Result<(), IncompleteArticle> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.problem.trim().is_empty() {
            missing.push("problem");
        }
        if self.solution.trim().is_empty() {
            missing.push("solution");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IncompleteArticle { missing })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("article is missing required fields: {}", missing.join(", "))]
pub struct IncompleteArticle {
    pub missing: Vec<&'static str>,
}
