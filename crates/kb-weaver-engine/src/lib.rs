pub mod codec;
pub mod compose;
pub mod import;
pub mod models;
pub mod publish;
pub mod quality;
pub mod scan;
pub mod sync;

// Re-export key types for easier usage
pub use codec::{ParseWarning, ParsedArticle, Section, compose_markdown, parse_markdown};
pub use compose::{FieldEdit, FormAssembler, ScoreRequest};
pub use models::{Article, Flag, IncompleteArticle, QualityScore, Severity, SupportTicket};
pub use sync::{EditorOptions, EditorSurface, EditorSync, SyntaxMode, Theme};
