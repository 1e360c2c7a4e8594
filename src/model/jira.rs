use super::ticket::TicketId;

/// A release version record in Jira.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraVersion {
    pub id: String,
    /// User-supplied release name, e.g. `1.4.0`
    pub number: String,
}

/// Snapshot of an issue's workflow state at the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraIssue {
    pub key: TicketId,
    pub status: String,
}
