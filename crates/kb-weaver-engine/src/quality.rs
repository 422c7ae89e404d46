//! Heuristic completeness scoring for articles.
//!
//! Advisory only: the score never blocks editing or saving. Weights favor the
//! required fields, with a small bonus for solutions written as numbered
//! steps.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Article, QualityScore};

pub fn score(article: &Article) -> QualityScore {
    let mut overall: u8 = 0;
    let mut warnings = Vec::new();

    // Title (20 points)
    let has_title = !article.title.trim().is_empty() && article.title.len() > 5;
    if has_title {
        overall += 20;
    }
    if article.title.len() > 200 {
        warnings.push("Title is very long (>200 chars)".to_string());
    }

    // Problem (20 points)
    let has_problem = !article.problem.trim().is_empty() && article.problem.len() > 20;
    if has_problem {
        overall += 20;
    }

    // Solution (25 points)
    let has_solution = !article.solution.trim().is_empty() && article.solution.len() > 50;
    if has_solution {
        overall += 25;
    }
    if article.solution.len() < 100 {
        warnings.push("Solution is very short (<100 chars)".to_string());
    }

    // Expected result (15 points)
    let has_expected_result = article
        .expected_result
        .as_ref()
        .is_some_and(|s| !s.trim().is_empty());
    if has_expected_result {
        overall += 15;
    }

    // Prerequisites (10 points)
    let has_prerequisites = article
        .prerequisites
        .as_ref()
        .is_some_and(|s| !s.trim().is_empty());
    if has_prerequisites {
        overall += 10;
    }

    // Additional notes (5 points)
    if article
        .additional_notes
        .as_ref()
        .is_some_and(|s| !s.trim().is_empty())
    {
        overall += 5;
    }

    // Bonus for solutions written as numbered steps
    let solution_step_count = count_numbered_steps(&article.solution);
    if solution_step_count >= 3 {
        overall = overall.saturating_add(5).min(100);
    }

    if !article.content_markdown.contains("```") && !article.content_markdown.contains('`') {
        warnings.push("No code blocks detected".to_string());
    }

    let word_count = article.content_markdown.split_whitespace().count();

    QualityScore {
        overall,
        has_title,
        has_problem,
        has_solution,
        has_expected_result,
        has_prerequisites,
        solution_step_count,
        word_count,
        warnings,
    }
}

fn count_numbered_steps(text: &str) -> usize {
    static STEP_RE: OnceLock<Regex> = OnceLock::new();
    let step_re =
        STEP_RE.get_or_init(|| Regex::new(r"^\s*\d+\.").expect("Invalid step regex"));
    text.lines().filter(|line| step_re.is_match(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_article_scores_full_marks() {
        let article = Article {
            ticket_key: Some("HELP-123".to_string()),
            title: "Fix login timeout".to_string(),
            problem: "Users cannot log in due to a session timeout error".to_string(),
            solution: "1. Clear browser cache\n2. Restart the application\n3. Try logging in again\n\nThe timeout resolves after the restart.".to_string(),
            expected_result: Some("User can log in successfully".to_string()),
            prerequisites: Some("Admin access required".to_string()),
            additional_notes: Some("Known issue since the 4.2 rollout".to_string()),
            tags: vec!["login".to_string(), "timeout".to_string()],
            content_markdown: "# Fix login timeout\n\n```bash\nrm -rf ~/.cache\n```".to_string(),
            template_id: None,
        };

        let score = score(&article);
        assert_eq!(score.overall, 100);
        assert!(score.has_title);
        assert!(score.has_problem);
        assert!(score.has_solution);
        assert!(score.has_expected_result);
        assert!(score.has_prerequisites);
        assert_eq!(score.solution_step_count, 3);
        assert!(score.warnings.is_empty());
    }

    #[test]
    fn minimal_article_scores_low_with_warnings() {
        let article = Article {
            title: "Short".to_string(),
            problem: "Prob".to_string(),
            solution: "Sol".to_string(),
            content_markdown: "Short".to_string(),
            ..Article::default()
        };

        let score = score(&article);
        assert!(score.overall < 50);
        assert!(!score.has_title); // too short
        assert!(!score.has_problem);
        assert!(!score.has_solution);
        assert!(score.warnings.iter().any(|w| w.contains("very short")));
        assert!(score.warnings.iter().any(|w| w.contains("code blocks")));
    }

    #[test]
    fn numbered_steps_are_counted_with_leading_whitespace() {
        let article = Article {
            solution: "  1. first\n2. second\nplain line\n 3. third".to_string(),
            ..Article::default()
        };
        assert_eq!(score(&article).solution_step_count, 3);
    }

    #[test]
    fn word_count_covers_the_whole_document() {
        let article = Article {
            content_markdown: "# Title\n\nsome words here".to_string(),
            ..Article::default()
        };
        assert_eq!(score(&article).word_count, 5);
    }
}
