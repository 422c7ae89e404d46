pub mod article;
pub mod quality;
pub mod ticket;

pub use article::{Article, IncompleteArticle};
pub use quality::{Flag, QualityScore, Severity};
pub use ticket::{SupportTicket, TicketComment};
