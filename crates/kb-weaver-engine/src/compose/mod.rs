//! Producer side of the editor synchronization: composes structured field
//! edits into the canonical markdown document and schedules quality scoring.
//!
//! Scoring is debounced: each field edit re-arms a quiescence deadline, and a
//! request is only issued once the form has been quiet for the debounce
//! window. Responses are matched against a monotonically increasing sequence
//! number so that only the most recently issued request can ever land; stale
//! responses from superseded requests are discarded.
//!
//! Time is passed in by the caller, so the debounce contract is testable
//! without sleeping and the engine stays on a single event-driven timeline.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::codec::compose_markdown;
use crate::models::{Article, QualityScore};

/// Quiescence window between the last field edit and the scoring request.
pub const SCORE_DEBOUNCE: Duration = Duration::from_millis(500);

/// A single structured-field mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    Problem(String),
    Solution(String),
    ExpectedResult(String),
    Prerequisites(String),
    AdditionalNotes(String),
    Tags(Vec<String>),
}

/// An outbound scoring request for the external quality collaborator. The
/// response must come back through [`FormAssembler::apply_score`] carrying the
/// same `seq`.
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub seq: u64,
    pub article: Article,
}

pub struct FormAssembler {
    article: Article,
    debounce: Duration,
    /// Pending quiescence deadline; replaced, not queued, by further edits.
    deadline: Option<Instant>,
    next_seq: u64,
    /// Sequence number of the most recently issued request, if unanswered.
    awaiting: Option<u64>,
    score: Option<QualityScore>,
}

impl FormAssembler {
    pub fn new(article: Article) -> Self {
        Self::with_debounce(article, SCORE_DEBOUNCE)
    }

    pub fn with_debounce(mut article: Article, debounce: Duration) -> Self {
        article.content_markdown = compose_markdown(&article);
        Self {
            article,
            debounce,
            deadline: None,
            next_seq: 0,
            awaiting: None,
            score: None,
        }
    }

    /// Apply a field edit, recompute the canonical document, and re-arm the
    /// scoring deadline. Returns the new external value for the editor sync.
    pub fn apply(&mut self, edit: FieldEdit, now: Instant) -> &str {
        fn opt(value: String) -> Option<String> {
            (!value.is_empty()).then_some(value)
        }

        match edit {
            FieldEdit::Title(v) => self.article.title = v,
            FieldEdit::Problem(v) => self.article.problem = v,
            FieldEdit::Solution(v) => self.article.solution = v,
            FieldEdit::ExpectedResult(v) => self.article.expected_result = opt(v),
            FieldEdit::Prerequisites(v) => self.article.prerequisites = opt(v),
            FieldEdit::AdditionalNotes(v) => self.article.additional_notes = opt(v),
            FieldEdit::Tags(v) => self.article.tags = v,
        }

        self.article.content_markdown = compose_markdown(&self.article);
        self.deadline = Some(now + self.debounce);
        &self.article.content_markdown
    }

    /// Replace the whole article (draft load, ticket import). Recomposes the
    /// document and re-arms scoring like any other edit.
    pub fn load(&mut self, article: Article, now: Instant) -> &str {
        self.article = article;
        self.article.content_markdown = compose_markdown(&self.article);
        self.deadline = Some(now + self.debounce);
        &self.article.content_markdown
    }

    /// Fire the scoring request if the form has been quiet past the deadline.
    /// At most one request per quiescent period.
    pub fn poll(&mut self, now: Instant) -> Option<ScoreRequest> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.awaiting = Some(seq);
        Some(ScoreRequest {
            seq,
            article: self.article.clone(),
        })
    }

    /// Deliver a scoring response. Only the response to the most recently
    /// issued request is applied; anything else is discarded. Returns whether
    /// the score was accepted.
    pub fn apply_score(&mut self, seq: u64, score: QualityScore) -> bool {
        if self.awaiting != Some(seq) {
            debug!("discarding stale quality score for request {seq}");
            return false;
        }
        self.awaiting = None;
        self.score = Some(score);
        true
    }

    /// The collaborator failed to score. Non-fatal: logged, and the previous
    /// score stays on display.
    pub fn score_failed(&mut self, seq: u64, reason: &str) {
        if self.awaiting == Some(seq) {
            self.awaiting = None;
        }
        warn!("quality scoring failed for request {seq}: {reason}");
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn markdown(&self) -> &str {
        &self.article.content_markdown
    }

    pub fn score(&self) -> Option<&QualityScore> {
        self.score.as_ref()
    }
}
