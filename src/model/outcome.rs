use std::fmt;

use super::ticket::TicketId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    /// Jira did not return the issue (missing, or no access).
    NotFound,
    /// Found, but its current status blocked the transition.
    Skipped { status: String },
    /// Jira refused the transition request.
    Rejected { status: u16 },
    Transitioned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReport {
    pub ticket: TicketId,
    pub outcome: TicketOutcome,
}

impl TicketReport {
    pub fn new(ticket: TicketId, outcome: TicketOutcome) -> Self {
        Self { ticket, outcome }
    }
}

impl fmt::Display for TicketOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketOutcome::NotFound => f.write_str("not found"),
            TicketOutcome::Skipped { status } => write!(f, "skipped (status '{status}')"),
            TicketOutcome::Rejected { status } => write!(f, "rejected by Jira (HTTP {status})"),
            TicketOutcome::Transitioned => f.write_str("transitioned"),
        }
    }
}
