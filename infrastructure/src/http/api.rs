//! HTTP adapter for the [`ConsultationApi`] port.
//!
//! | Call | Request | Response |
//! |------|---------|----------|
//! | create session | `POST {base}/api/sessions` | `{"session_id": "…"}` |
//! | submit case | `POST {base}/api/sessions/{id}/case` | `{"status": "…", "round": n}` |

use async_trait::async_trait;
use mdt_application::ports::consultation_api::{
    CaseReceipt, CaseSubmission, ConsultationApi, ConsultationApiError,
};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SessionCreated {
    session_id: String,
}

pub struct HttpConsultationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConsultationApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConsultationApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mdt-consult/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConsultationApiError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sessions_url(&self) -> String {
        format!("{}/api/sessions", self.base_url)
    }

    fn case_url(&self, session_id: &str) -> String {
        format!("{}/api/sessions/{}/case", self.base_url, session_id)
    }

    /// Turn a non-success response into an error, keeping the body for context.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ConsultationApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ConsultationApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ConsultationApi for HttpConsultationApi {
    async fn create_session(&self) -> Result<String, ConsultationApiError> {
        let url = self.sessions_url();
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ConsultationApiError::Request(e.to_string()))?;

        let created: SessionCreated = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ConsultationApiError::InvalidResponse(e.to_string()))?;

        if created.session_id.is_empty() {
            return Err(ConsultationApiError::InvalidResponse(
                "empty session_id".to_string(),
            ));
        }
        Ok(created.session_id)
    }

    async fn submit_case(
        &self,
        session_id: &str,
        submission: &CaseSubmission,
    ) -> Result<CaseReceipt, ConsultationApiError> {
        let url = self.case_url(session_id);
        debug!("POST {} ({} chars)", url, submission.case_text.len());
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| ConsultationApiError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ConsultationApiError::SessionNotFound(session_id.to_string()));
        }

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ConsultationApiError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdt_domain::{AgentRole, ConsultationConfig};
    use serde_json::{Value, json};
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    struct Captured {
        request_line: String,
        body: String,
    }

    /// Serve exactly one HTTP request with a canned JSON response.
    async fn serve_once(
        status: &'static str,
        response_body: Value,
    ) -> (String, tokio::task::JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            let mut reader = BufReader::new(read);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).await.unwrap();

            let mut length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                let line = line.trim();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    length = value.trim().parse().unwrap();
                }
            }
            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).await.unwrap();

            let payload = response_body.to_string();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                payload.len(),
                payload
            );
            write.write_all(response.as_bytes()).await.unwrap();
            write.flush().await.unwrap();

            Captured {
                request_line: request_line.trim().to_string(),
                body: String::from_utf8(body).unwrap(),
            }
        });
        (base, handle)
    }

    fn api(base: &str) -> HttpConsultationApi {
        HttpConsultationApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let api = api("http://localhost:18000/");
        assert_eq!(api.base_url(), "http://localhost:18000");
        assert_eq!(api.sessions_url(), "http://localhost:18000/api/sessions");
        assert_eq!(
            api.case_url("abc"),
            "http://localhost:18000/api/sessions/abc/case"
        );
    }

    #[tokio::test]
    async fn test_create_session() {
        let (base, server) = serve_once("200 OK", json!({"session_id": "a1b2c3d4e5"})).await;

        let id = api(&base).create_session().await.unwrap();

        assert_eq!(id, "a1b2c3d4e5");
        let captured = server.await.unwrap();
        assert!(captured.request_line.starts_with("POST /api/sessions "));
    }

    #[tokio::test]
    async fn test_create_session_rejects_missing_id() {
        let (base, _server) = serve_once("200 OK", json!({"id": "wrong-field"})).await;
        let result = api(&base).create_session().await;
        assert!(matches!(result, Err(ConsultationApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_submit_case_posts_selection_and_models() {
        let (base, server) =
            serve_once("200 OK", json!({"status": "processing", "round": 1})).await;
        let config = ConsultationConfig::default()
            .with_agents(vec![AgentRole::CaseOrganizer, AgentRole::Moderator])
            .with_model(AgentRole::Moderator, "gpt-5.1");
        let submission = CaseSubmission::new("62F, progressive dyspnea", &config);

        let receipt = api(&base).submit_case("abc", &submission).await.unwrap();

        assert_eq!(receipt.status, "processing");
        assert_eq!(receipt.round, 1);
        let captured = server.await.unwrap();
        assert!(captured.request_line.starts_with("POST /api/sessions/abc/case "));
        let body: Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(
            body,
            json!({
                "case_text": "62F, progressive dyspnea",
                "selected_agents": ["Case Organizer", "Moderator"],
                "model_configs": {"Moderator": "gpt-5.1"}
            })
        );
    }

    #[tokio::test]
    async fn test_submit_case_unknown_session() {
        let (base, _server) = serve_once("404 Not Found", json!({"detail": "Session not found"})).await;
        let submission = CaseSubmission::new("case", &ConsultationConfig::default());

        let result = api(&base).submit_case("gone", &submission).await;

        assert!(matches!(
            result,
            Err(ConsultationApiError::SessionNotFound(id)) if id == "gone"
        ));
    }

    #[tokio::test]
    async fn test_server_error_keeps_body() {
        let (base, _server) = serve_once("500 Internal Server Error", json!({"detail": "boom"})).await;

        let result = api(&base).create_session().await;

        match result {
            Err(ConsultationApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let result = api(&base).create_session().await;
        assert!(matches!(result, Err(ConsultationApiError::Request(_))));
    }
}
