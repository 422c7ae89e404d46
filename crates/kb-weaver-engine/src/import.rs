//! Seed an article document from a resolved support ticket.
//!
//! The ticket's summary becomes the title, its description the problem, and
//! the last comment, by convention the resolution note, the solution. Labels
//! are emitted as a `## Tags` section; the codec accepts that form alongside
//! the tagless documents the form composer produces.

use crate::models::SupportTicket;

pub const NO_DESCRIPTION: &str = "[No description provided in ticket]";
pub const NO_RESOLUTION: &str = "[No resolution note found in ticket comments]";

pub fn ticket_to_markdown(ticket: &SupportTicket) -> String {
    let problem = ticket.description.as_deref().unwrap_or(NO_DESCRIPTION);
    let solution = ticket
        .comments
        .last()
        .map(|comment| comment.body.as_str())
        .unwrap_or(NO_RESOLUTION);

    format!(
        "# {}\n\n## Problem\n{}\n\n## Solution\n{}\n\n## Tags\n{}",
        ticket.summary,
        problem,
        solution,
        ticket.labels.join(", ")
    )
}
