use serde::{Deserialize, Serialize};

/// Advisory completeness score for an article, 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    pub overall: u8,
    pub has_title: bool,
    pub has_problem: bool,
    pub has_solution: bool,
    pub has_expected_result: bool,
    pub has_prerequisites: bool,
    /// Count of numbered-list lines in the solution.
    pub solution_step_count: usize,
    pub word_count: usize,
    pub warnings: Vec<String>,
}

/// A span of article text flagged by the sensitive-data scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub pattern_type: String,
    pub severity: Severity,
    /// Matched text, truncated for display.
    pub matched_text: String,
    /// 1-indexed for user display.
    pub line_number: usize,
    pub start_col: usize,
    pub end_col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
        }
    }
}
