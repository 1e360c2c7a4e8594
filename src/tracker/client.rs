use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::http::HttpTransport;
use super::transport::{Method, Transport};
use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::model::jira::{JiraIssue, JiraVersion};
use crate::model::ticket::TicketId;

/// Result of asking Jira to move an issue through its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Sent, but Jira answered with a non-2xx status.
    Rejected { status: u16 },
    /// Not sent; the issue's current status does not allow it.
    Blocked,
}

pub struct JiraClient<T> {
    transport: T,
    config: TrackerConfig,
    release_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    status: StatusField,
}

#[derive(Deserialize)]
struct StatusField {
    name: String,
}

#[derive(Deserialize)]
struct VersionSearch {
    #[serde(default)]
    values: Vec<VersionRecord>,
}

#[derive(Deserialize)]
struct VersionRecord {
    id: String,
    name: String,
}

impl From<VersionRecord> for JiraVersion {
    fn from(record: VersionRecord) -> Self {
        JiraVersion {
            id: record.id,
            number: record.name,
        }
    }
}

impl JiraClient<HttpTransport> {
    pub fn connect(config: TrackerConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> JiraClient<T> {
    pub fn new(transport: T, config: TrackerConfig) -> Self {
        Self {
            transport,
            config,
            release_date: None,
        }
    }

    /// Pin the release date used for newly created versions (defaults to today).
    #[cfg(test)]
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Fetch an issue; `None` for any status other than 200.
    pub async fn get_issue(&self, key: &TicketId) -> Result<Option<JiraIssue>> {
        info!(ticket = %key, "fetching issue");
        let path = format!("/rest/api/3/issue/{key}");

        let resp = self.transport.send(Method::Get, &path, None).await?;
        if resp.status != 200 {
            return Ok(None);
        }

        let issue: IssueResponse = resp.parse(&path)?;
        Ok(Some(JiraIssue {
            key: TicketId::new(issue.key),
            status: issue.fields.status.name,
        }))
    }

    /// Find the project version named exactly `number`, creating it if absent.
    ///
    /// Not atomic: two concurrent runs may both create the version.
    pub async fn get_or_create_version(&self, number: &str) -> Result<JiraVersion> {
        let path = format!(
            "/rest/api/3/project/{}/version?query={}",
            self.config.project_key,
            urlencoding::encode(number)
        );

        let resp = self.transport.send(Method::Get, &path, None).await?;
        let search: VersionSearch = resp.parse(&path)?;
        if let Some(found) = search.values.into_iter().find(|v| v.name == number) {
            info!(version = number, id = %found.id, "found existing Jira version");
            return Ok(found.into());
        }

        info!(version = number, "creating Jira version");
        let path = "/rest/api/3/version";
        let release_date = self
            .release_date
            .unwrap_or_else(|| Local::now().date_naive());
        let body = json!({
            "releaseDate": release_date.format("%Y-%m-%d").to_string(),
            "released": true,
            "name": number,
            "projectId": self.config.project_id,
        });

        let resp = self.transport.send(Method::Post, path, Some(&body)).await?;
        if !resp.is_success() {
            return Err(Error::MalformedResponse {
                path: path.to_string(),
                reason: format!("version create returned status {}", resp.status),
            });
        }
        let created: VersionRecord = resp.parse(path)?;
        Ok(created.into())
    }

    /// Add `version` to the issue's fix versions, keeping existing ones.
    pub async fn assign_version(&self, issue: &JiraIssue, version: &JiraVersion) -> Result<()> {
        info!(ticket = %issue.key, version = %version.number, "assigning fix version");
        let path = format!("/rest/api/3/issue/{}", issue.key);
        let body = json!({
            "update": {
                "fixVersions": [
                    { "add": { "id": version.id } }
                ]
            }
        });

        self.transport.send(Method::Put, &path, Some(&body)).await?;
        Ok(())
    }

    /// Move the issue to released-on-staging, whatever its current status.
    pub async fn transition_to_staging(&self, issue: &JiraIssue) -> Result<Transition> {
        info!(ticket = %issue.key, "transitioning to released on staging");
        self.transition(issue, &self.config.released_to_staging_transition_id)
            .await
    }

    /// Move the issue to Done.
    ///
    /// Without a staging transition configured, the issue must currently be
    /// in the ready-for-release status (compared case-insensitively); otherwise
    /// nothing is sent and [`Transition::Blocked`] is returned.
    pub async fn transition_to_done(&self, issue: &JiraIssue) -> Result<Transition> {
        if !self.config.has_staging_transition()
            && issue.status.to_lowercase()
                != self.config.ready_for_release_status_name.to_lowercase()
        {
            warn!(
                ticket = %issue.key,
                status = %issue.status,
                expected = %self.config.ready_for_release_status_name,
                "cannot transition ticket to Done from its current status"
            );
            return Ok(Transition::Blocked);
        }

        info!(ticket = %issue.key, "transitioning to done");
        self.transition(issue, &self.config.done_transition_id).await
    }

    async fn transition(&self, issue: &JiraIssue, transition_id: &str) -> Result<Transition> {
        let path = format!("/rest/api/3/issue/{}/transitions", issue.key);
        let body = json!({ "transition": { "id": transition_id } });

        let resp = self.transport.send(Method::Post, &path, Some(&body)).await?;
        if resp.is_success() {
            Ok(Transition::Applied)
        } else {
            Ok(Transition::Rejected {
                status: resp.status,
            })
        }
    }
}
