use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::error::Result;
use crate::model::outcome::{TicketOutcome, TicketReport};
use crate::model::ticket::TicketId;
use crate::tracker::{JiraClient, Transition, Transport};

/// Drives the release and verify workflows over a batch of tickets.
///
/// A ticket that is missing, in the wrong status, or refused by Jira is
/// reported and the batch moves on;
/// only transport failures and malformed responses abort the batch.
pub struct ReleaseOrchestrator<T> {
    client: JiraClient<T>,
}

impl<T: Transport> ReleaseOrchestrator<T> {
    pub fn new(client: JiraClient<T>) -> Self {
        Self { client }
    }

    /// Move every found ticket to released-on-staging.
    pub async fn verify(&self, tickets: &BTreeSet<TicketId>) -> Result<Vec<TicketReport>> {
        let mut reports = Vec::with_capacity(tickets.len());

        for ticket in tickets {
            let Some(issue) = self.client.get_issue(ticket).await? else {
                warn!(%ticket, "cannot process ticket, not found in Jira");
                reports.push(TicketReport::new(ticket.clone(), TicketOutcome::NotFound));
                continue;
            };

            let transition = self.client.transition_to_staging(&issue).await?;
            reports.push(TicketReport::new(
                ticket.clone(),
                outcome_of(transition, issue.status),
            ));
        }

        Ok(reports)
    }

    /// Attach `version` to every found ticket and move it to Done where allowed.
    pub async fn release(
        &self,
        version: &str,
        tickets: &BTreeSet<TicketId>,
    ) -> Result<Vec<TicketReport>> {
        let version = self.client.get_or_create_version(version).await?;
        info!(version = %version.number, id = %version.id, tickets = tickets.len(), "releasing");

        let mut reports = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let Some(issue) = self.client.get_issue(ticket).await? else {
                warn!(%ticket, "cannot process ticket, not found in Jira");
                reports.push(TicketReport::new(ticket.clone(), TicketOutcome::NotFound));
                continue;
            };

            self.client.assign_version(&issue, &version).await?;

            let transition = self.client.transition_to_done(&issue).await?;
            reports.push(TicketReport::new(
                ticket.clone(),
                outcome_of(transition, issue.status),
            ));
        }

        Ok(reports)
    }
}

fn outcome_of(transition: Transition, status: String) -> TicketOutcome {
    match transition {
        Transition::Applied => TicketOutcome::Transitioned,
        Transition::Rejected { status } => TicketOutcome::Rejected { status },
        Transition::Blocked => TicketOutcome::Skipped { status },
    }
}
