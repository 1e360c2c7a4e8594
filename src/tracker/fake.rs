use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::transport::{Method, TrackerResponse, Transport};
use crate::config::TrackerConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory Jira that answers the REST calls the client makes and records
/// every request it receives.
#[derive(Default)]
pub struct FakeJira {
    issues: Mutex<HashMap<String, String>>,
    versions: Mutex<Vec<(String, String)>>,
    transition_status: Option<u16>,
    fail_on: Option<String>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeJira {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(self, key: &str, status: &str) -> Self {
        self.issues
            .lock()
            .unwrap()
            .insert(key.to_string(), status.to_string());
        self
    }

    pub fn with_version(self, id: &str, name: &str) -> Self {
        self.versions
            .lock()
            .unwrap()
            .push((id.to_string(), name.to_string()));
        self
    }

    /// Answer every transition request with `status` instead of 204.
    pub fn rejecting_transitions(mut self, status: u16) -> Self {
        self.transition_status = Some(status);
        self
    }

    /// Fail the request to `path` as if the connection had dropped.
    pub fn failing_on(mut self, path: &str) -> Self {
        self.fail_on = Some(path.to_string());
        self
    }

    /// Handle to the call log that stays usable after the fake is moved.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        self.calls.clone()
    }

    fn respond(&self, method: Method, path: &str, body: Option<&Value>) -> TrackerResponse {
        let segments: Vec<&str> = path
            .trim_start_matches("/rest/api/3/")
            .split('/')
            .collect();

        match (method, segments.as_slice()) {
            (Method::Get, ["issue", key]) => match self.issues.lock().unwrap().get(*key) {
                Some(status) => ok(200, json!({
                    "key": key,
                    "fields": { "status": { "name": status } }
                })),
                None => ok(404, json!({
                    "errorMessages": ["Issue does not exist or you do not have permission to see it."]
                })),
            },
            (Method::Get, ["project", _, query]) => {
                let needle = query
                    .split_once("query=")
                    .map(|(_, q)| urlencoding::decode(q).map(|q| q.into_owned()).unwrap_or_default())
                    .unwrap_or_default();
                let values: Vec<Value> = self
                    .versions
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|(_, name)| name.contains(&needle))
                    .map(|(id, name)| json!({ "id": id, "name": name }))
                    .collect();
                ok(200, json!({ "values": values }))
            }
            (Method::Post, ["version"]) => {
                let name = body
                    .and_then(|b| b["name"].as_str())
                    .unwrap_or_default()
                    .to_string();
                let mut versions = self.versions.lock().unwrap();
                let id = (10_000 + versions.len()).to_string();
                versions.push((id.clone(), name.clone()));
                ok(201, json!({ "id": id, "name": name }))
            }
            (Method::Put, ["issue", _]) => ok(204, json!({})),
            (Method::Post, ["issue", _, "transitions"]) => match self.transition_status {
                Some(status) => ok(status, json!({
                    "errorMessages": ["Transition id is not valid for this issue."]
                })),
                None => ok(204, json!({})),
            },
            _ => ok(404, json!({})),
        }
    }
}

fn ok(status: u16, body: Value) -> TrackerResponse {
    TrackerResponse { status, body }
}

#[async_trait]
impl Transport for FakeJira {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<TrackerResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        if self.fail_on.as_deref() == Some(path) {
            return Err(Error::MalformedResponse {
                path: path.to_string(),
                reason: "connection closed before a response was read".into(),
            });
        }
        Ok(self.respond(method, path, body))
    }
}

pub fn test_config() -> TrackerConfig {
    TrackerConfig {
        url: "acme.atlassian.net".into(),
        project_id: "10001".into(),
        project_key: "ADA".into(),
        user_email: "bot@acme.io".into(),
        user_token: "secret".into(),
        ready_for_release_status_name: "Ready for Release".into(),
        done_transition_id: "31".into(),
        released_to_staging_transition_id: String::new(),
        timeout_secs: None,
    }
}

pub fn count(calls: &Mutex<Vec<RecordedCall>>, method: Method, path: &str) -> usize {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.method == method && c.path == path)
        .count()
}
