use peek_core::{TaskHandle, TaskStatus};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::error::{PeekError, Result};
use crate::types::{
    Course, CourseInfoRequest, CourseListResponse, SubmitRequest, TaskCreatedResponse,
    TaskSnapshot, TaskStatusResponse,
};

pub struct PeekClient {
    base_url: String,
    client: Client,
}

impl PeekClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create one peek task. Empty inputs are rejected before anything goes
    /// over the wire. Sends exactly one request; duplicate-submission
    /// prevention belongs to the caller.
    pub async fn submit(
        &self,
        token: &str,
        course_id: &str,
        strategy_json: &str,
    ) -> Result<TaskHandle> {
        if course_id.trim().is_empty() {
            return Err(PeekError::InvalidInput(
                "course id must not be empty".to_string(),
            ));
        }
        if strategy_json.trim().is_empty() {
            return Err(PeekError::InvalidInput(
                "strategy payload must not be empty".to_string(),
            ));
        }

        let request = SubmitRequest::new(token, course_id, strategy_json);

        debug!(course_id, "submitting peek task");

        let response = self
            .client
            .post(format!("{}/have_a_peek", self.base_url))
            .json(&request)
            .send()
            .await?;

        let created: TaskCreatedResponse = self.handle_response(response).await?;

        info!(task_id = %created.task_id, course_id, "peek task created");

        Ok(TaskHandle::new(created.task_id))
    }

    /// Fetch the current status snapshot of a task.
    pub async fn task_status(&self, token: &str, task_id: &str) -> Result<TaskSnapshot> {
        let response = self
            .client
            .get(format!("{}/peek_result/{}", self.base_url, task_id))
            .query(&[("token", token)])
            .send()
            .await?;

        let body: TaskStatusResponse = self.handle_response(response).await?;

        let status = TaskStatus::parse(&body.status).ok_or_else(|| {
            PeekError::InvalidResponse(format!("unknown task status: {}", body.status))
        })?;

        debug!(task_id, status = status.as_str(), progress = ?body.progress, "status snapshot");

        Ok(TaskSnapshot {
            status,
            progress: body.progress,
            result: body.result,
        })
    }

    /// Fetch the authenticated user's course catalog.
    pub async fn fetch_courses(&self, token: &str) -> Result<Vec<Course>> {
        let request = CourseInfoRequest {
            token: token.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/fetch_course_info", self.base_url))
            .json(&request)
            .send()
            .await?;

        let list: CourseListResponse = self.handle_response(response).await?;

        debug!(count = list.courses.len(), "fetched course catalog");

        Ok(list.courses)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "session token rejected");
            return Err(PeekError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PeekError::ServiceUnavailable {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PeekClient::new("https://magic.example.com");
        assert_eq!(client.base_url(), "https://magic.example.com");
    }

    #[test]
    fn test_with_client() {
        let inner = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let client = PeekClient::with_client("http://localhost:9", inner);
        assert_eq!(client.base_url(), "http://localhost:9");
    }
}
