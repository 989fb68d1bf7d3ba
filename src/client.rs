use crate::config::Config;
use crate::error::ServiceError;
use crate::logging::sanitize_for_log;
use crate::model::{DueUpdateRequest, ResolvedDueFields};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// The remote authority that resolves due-strings into dates.
#[async_trait]
pub trait RemoteTaskService: Send + Sync {
    /// Sends one update for the task known remotely as `remote_id` and returns the
    /// due attributes the service resolved. Exactly one request, no retries.
    async fn update_due(
        &self,
        remote_id: &str,
        request: &DueUpdateRequest,
    ) -> Result<ResolvedDueFields, ServiceError>;
}

/// HTTP client for a REST task service (`POST {api_url}/tasks/{id}`, bearer auth).
#[derive(Clone, Debug)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TaskClient {
    pub fn new(
        base_url: &str,
        token: &str,
        timeout: Duration,
        insecure: bool,
    ) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(
            &config.api_url,
            &config.api_token,
            Duration::from_secs(config.request_timeout_secs),
            config.allow_insecure_certs,
        )
    }

    fn task_url(&self, remote_id: &str) -> String {
        format!("{}/tasks/{}", self.base_url, remote_id)
    }
}

#[async_trait]
impl RemoteTaskService for TaskClient {
    async fn update_due(
        &self,
        remote_id: &str,
        request: &DueUpdateRequest,
    ) -> Result<ResolvedDueFields, ServiceError> {
        debug!(remote_id = %sanitize_for_log(remote_id), "POST due update");
        let response = self
            .http
            .post(self.task_url(remote_id))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            warn!(
                remote_id = %sanitize_for_log(remote_id),
                status = status.as_u16(),
                "due update refused"
            );
            return Err(status_error(status, &body));
        }

        let task: WireTask = serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        task.into_resolved()
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.without_url().to_string())
}

fn status_error(status: StatusCode, body: &str) -> ServiceError {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        return ServiceError::Transport(format!("HTTP {}", status));
    }
    ServiceError::Rejected {
        status: status.as_u16(),
        message: error_message(status, body),
    }
}

// Prefers a JSON `error` field, then the plain-text body, then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed)
        && let Some(msg) = value.get("error").and_then(|v| v.as_str())
        && !msg.is_empty()
    {
        return msg.to_string();
    }
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request rejected")
        .to_string()
}

#[derive(Debug, Deserialize)]
struct WireTask {
    #[serde(default)]
    due: Option<WireDue>,
    #[serde(default)]
    deadline: Option<WireDeadline>,
}

#[derive(Debug, Deserialize)]
struct WireDue {
    date: String,
    #[serde(default)]
    datetime: Option<String>,
    #[serde(default)]
    is_recurring: bool,
}

#[derive(Debug, Deserialize)]
struct WireDeadline {
    date: String,
}

impl WireTask {
    fn into_resolved(self) -> Result<ResolvedDueFields, ServiceError> {
        let mut fields = ResolvedDueFields::default();
        if let Some(due) = self.due {
            fields.due_date = Some(parse_date(&due.date)?);
            fields.due_datetime = match due.datetime.as_deref() {
                Some(raw) => Some(parse_datetime(raw)?),
                // Some API versions put the time straight into `date`.
                None if due.date.len() > 10 => Some(parse_datetime(&due.date)?),
                None => None,
            };
            fields.is_recurring = due.is_recurring;
        }
        fields.deadline = self
            .deadline
            .map(|d| parse_date(&d.date))
            .transpose()?;
        Ok(fields)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidResponse(format!("bad date {:?}", raw)))
}

// RFC 3339, or a floating local time which is read as UTC.
fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ServiceError::InvalidResponse(format!("bad datetime {:?}", raw)))
}
