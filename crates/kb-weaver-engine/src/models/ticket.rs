use serde::{Deserialize, Serialize};

/// A resolved support ticket as handed over by the ticket system integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub resolution: Option<String>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub comments: Vec<TicketComment>,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketComment {
    pub author: String,
    pub body: String,
    pub created: String,
}
