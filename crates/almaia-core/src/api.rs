//! Async client for the AlmaIA backend.
//!
//! Every successful body goes through the [`wire`](crate::wire) normalizers
//! before it reaches the rest of the crate. No retries are attempted.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::alert::AlertRequest;
use crate::error::ApiError;
use crate::grouping::{AnsweredRecord, TaskRecord};
use crate::questions::Question;
use crate::session::StudentContext;
use crate::storage::ApiConfig;
use crate::wire::{self, Normalized};

pub struct ApiClient {
    http: Client,
    base: Url,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client for the configured base URL and timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn student_endpoint(&self, path: &str, ctx: &StudentContext) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("alumno_id", &ctx.student_id.to_string());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    async fn get_json(&self, url: Url, token: Option<&str>) -> Result<Value, ApiError> {
        info!(%url, "GET");
        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = self.send(request).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch the wizard's question list.
    ///
    /// The bearer token is attached when a context with one is given.
    pub async fn fetch_questions(
        &self,
        ctx: Option<&StudentContext>,
    ) -> Result<Normalized<Question>, ApiError> {
        let url = self.endpoint(&self.config.questions_path)?;
        let body = self.get_json(url, ctx.and_then(StudentContext::bearer)).await?;
        wire::normalize_questions(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch the student's answered-question rows.
    pub async fn fetch_answers(
        &self,
        ctx: &StudentContext,
    ) -> Result<Normalized<AnsweredRecord>, ApiError> {
        let token = ctx.bearer().ok_or(ApiError::MissingToken)?;
        let url = self.student_endpoint(&self.config.answers_path, ctx)?;
        let body = self.get_json(url, Some(token)).await?;
        wire::normalize_answers(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch the student's homework tasks.
    pub async fn fetch_tasks(
        &self,
        ctx: &StudentContext,
    ) -> Result<Normalized<TaskRecord>, ApiError> {
        let token = ctx.bearer().ok_or(ApiError::MissingToken)?;
        let url = self.student_endpoint(&self.config.tasks_path, ctx)?;
        let body = self.get_json(url, Some(token)).await?;
        wire::normalize_tasks(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Post an SOS alert. Returns the backend's reply body (`Null` when empty).
    pub async fn send_alert(
        &self,
        ctx: &StudentContext,
        alert: &AlertRequest,
    ) -> Result<Value, ApiError> {
        let token = ctx.bearer().ok_or(ApiError::MissingToken)?;
        let url = self.endpoint(&self.config.alerts_path)?;
        info!(%url, student_id = alert.student_id, "POST alert");

        let request = self.http.post(url).bearer_auth(token).json(alert);
        let response = self.send(request).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// `Ok` when the backend answers its health endpoint with a 2xx.
    pub async fn health(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&self.config.health_path)?;
        info!(%url, "GET health");
        self.send(self.http.get(url)).await?;
        Ok(())
    }
}

/// Human message from an error body: `message`, then `error`, then raw text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(msg) = json
                .get(key)
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
            {
                return Some(msg.to_string());
            }
        }
    }
    Some(trimmed.to_string())
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    let code = status.as_u16();
    let message =
        error_message(body).unwrap_or_else(|| format!("request failed with status {code}"));
    match code {
        400 => ApiError::BadRequest(message),
        401 => ApiError::Unauthorized,
        500..=599 => ApiError::Server {
            status: code,
            message,
        },
        _ => ApiError::Http {
            status: code,
            message,
        },
    }
}
