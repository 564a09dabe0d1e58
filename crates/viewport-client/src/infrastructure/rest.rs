//! The backend's request/response surface.
//!
//! Everything that is not push frame delivery goes through here: session
//! lifecycle, navigation, tab bookkeeping, input command dispatch, the
//! screenshot pull used while degraded, and suggestion lookups.  The same
//! client therefore implements three application-layer traits:
//! [`CommandSink`], [`FramePuller`], and [`SuggestionBackend`].

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use viewport_core::{RemoteCommand, SessionId, StreamEvent, TabId, ViewportFrame};

use crate::application::connection::{FramePuller, TransportError};
use crate::application::dispatch::CommandSink;
use crate::application::suggest::SuggestionBackend;

/// Errors from the backend's request/response surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (DNS, refused, timeout).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.  Carries the
    /// `detail` message when the body had one.
    #[error("backend rejected {endpoint}: {detail}")]
    Rejected { endpoint: String, detail: String },

    /// The response body was not the expected JSON shape.
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A created or looked-up session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    #[serde(default)]
    pub active_tab: Option<TabId>,
}

/// Backend-side session health.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub active: bool,
}

/// One tab as reported by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TabInfo {
    pub tab_id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// Error body the backend attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TabsBody {
    tabs: Vec<TabInfo>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsBody {
    #[serde(default)]
    suggestions: Vec<String>,
}

/// REST client for the remote automation backend.
#[derive(Debug, Clone)]
pub struct BackendApi {
    http: reqwest::Client,
    base_url: String,
}

impl BackendApi {
    /// Creates a client for the backend at `base_url` (including any API
    /// prefix; a trailing slash is tolerated).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turns a non-success response into [`ApiError::Rejected`], pulling
    /// the backend's `detail` message out of the body when present.
    async fn ensure_success(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| format!("status {status}"));
        Err(ApiError::Rejected {
            endpoint: endpoint.to_string(),
            detail,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Self::ensure_success(endpoint, response)
            .await?
            .json()
            .await
            .map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    async fn post(&self, endpoint: &str, body: Option<&serde_json::Value>) -> Result<(), ApiError> {
        let mut request = self.http.post(self.url(endpoint));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Self::ensure_success(endpoint, response).await?;
        Ok(())
    }

    // ── Session lifecycle ─────────────────────────────────────────────────────

    /// Creates a new browser session.
    pub async fn create_session(&self) -> Result<SessionInfo, ApiError> {
        let endpoint = "browser/session";
        let response = self
            .http
            .post(self.url(endpoint))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Self::ensure_success(endpoint, response)
            .await?
            .json()
            .await
            .map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Tears a session down.  Terminal for that session's channels.
    pub async fn close_session(&self, session: &SessionId) -> Result<(), ApiError> {
        let endpoint = format!("browser/session/{session}");
        let response = self
            .http
            .delete(self.url(&endpoint))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        Self::ensure_success(&endpoint, response).await?;
        Ok(())
    }

    pub async fn session_status(&self, session: &SessionId) -> Result<SessionStatus, ApiError> {
        self.get_json(&format!("browser/session/{session}/status"), &[])
            .await
    }

    // ── Navigation ────────────────────────────────────────────────────────────

    pub async fn navigate(
        &self,
        session: &SessionId,
        url: &str,
        tab: Option<&TabId>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "url": url,
            "tab_id": tab.map(|t| t.0.clone()),
        });
        self.post(&format!("browser/{session}/navigate"), Some(&body))
            .await
    }

    pub async fn back(&self, session: &SessionId) -> Result<(), ApiError> {
        self.post(&format!("browser/{session}/back"), None).await
    }

    pub async fn forward(&self, session: &SessionId) -> Result<(), ApiError> {
        self.post(&format!("browser/{session}/forward"), None).await
    }

    pub async fn refresh(&self, session: &SessionId) -> Result<(), ApiError> {
        self.post(&format!("browser/{session}/refresh"), None).await
    }

    // ── Frames ────────────────────────────────────────────────────────────────

    /// Pulls the latest rendered frame, optionally for a specific tab.
    pub async fn screenshot(
        &self,
        session: &SessionId,
        tab: Option<&TabId>,
    ) -> Result<ViewportFrame, ApiError> {
        let endpoint = format!("browser/{session}/screenshot");
        match tab {
            Some(tab) => self.get_json(&endpoint, &[("tab_id", tab.0.as_str())]).await,
            None => self.get_json(&endpoint, &[]).await,
        }
    }

    // ── Tabs ──────────────────────────────────────────────────────────────────

    pub async fn list_tabs(&self, session: &SessionId) -> Result<Vec<TabInfo>, ApiError> {
        let body: TabsBody = self
            .get_json(&format!("browser/session/{session}/tabs"), &[])
            .await?;
        Ok(body.tabs)
    }

    pub async fn create_tab(
        &self,
        session: &SessionId,
        url: Option<&str>,
        make_active: bool,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "url": url, "make_active": make_active });
        self.post(&format!("browser/session/{session}/tabs"), Some(&body))
            .await
    }

    pub async fn activate_tab(&self, session: &SessionId, tab: &TabId) -> Result<(), ApiError> {
        self.post(
            &format!("browser/session/{session}/tabs/{tab}/activate"),
            None,
        )
        .await
    }

    pub async fn close_tab(&self, session: &SessionId, tab: &TabId) -> Result<(), ApiError> {
        let endpoint = format!("browser/session/{session}/tabs/{tab}");
        let response = self
            .http
            .delete(self.url(&endpoint))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        Self::ensure_success(&endpoint, response).await?;
        Ok(())
    }

    // ── Input dispatch ────────────────────────────────────────────────────────

    /// Routes one remote command to its endpoint.
    pub async fn dispatch_input(
        &self,
        session: &SessionId,
        command: &RemoteCommand,
    ) -> Result<(), ApiError> {
        let endpoint = format!("browser/{session}/{}", command.endpoint());
        let body = serde_json::to_value(command).expect("commands always serialize");
        debug!(%session, endpoint = command.endpoint(), "posting input command");
        self.post(&endpoint, Some(&body)).await
    }

    // ── Suggestions ───────────────────────────────────────────────────────────

    pub async fn suggestions(&self, query: &str, limit: usize) -> Result<Vec<String>, ApiError> {
        let limit = limit.to_string();
        let body: SuggestionsBody = self
            .get_json("search/suggestions", &[("q", query), ("limit", limit.as_str())])
            .await?;
        Ok(body.suggestions)
    }
}

// ── Trait wiring ──────────────────────────────────────────────────────────────

#[async_trait]
impl CommandSink for BackendApi {
    async fn send_command(
        &self,
        session: &SessionId,
        command: RemoteCommand,
    ) -> Result<(), String> {
        self.dispatch_input(session, &command)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl FramePuller for BackendApi {
    async fn fetch_latest(&self, session: &SessionId) -> Result<StreamEvent, TransportError> {
        self.screenshot(session, None)
            .await
            .map(StreamEvent::Frame)
            .map_err(|e| TransportError::Pull(e.to_string()))
    }
}

#[async_trait]
impl SuggestionBackend for BackendApi {
    async fn fetch_suggestions(&self, query: &str, limit: usize) -> Result<Vec<String>, String> {
        self.suggestions(query, limit).await.map_err(|e| e.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_tolerates_trailing_and_leading_slashes() {
        let api = BackendApi::new("http://127.0.0.1:8001/api/");
        assert_eq!(
            api.url("/browser/session"),
            "http://127.0.0.1:8001/api/browser/session"
        );
        assert_eq!(
            api.url("browser/session"),
            "http://127.0.0.1:8001/api/browser/session"
        );
    }

    #[test]
    fn test_error_body_detail_is_optional() {
        let with_detail: ErrorBody = serde_json::from_str(r#"{"detail":"no such session"}"#).unwrap();
        assert_eq!(with_detail.detail.as_deref(), Some("no such session"));

        let without: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(without.detail.is_none());
    }

    #[test]
    fn test_tabs_body_deserializes_backend_shape() {
        let json = r#"{"tabs":[{"tab_id":"t1","url":"https://example.com","active":true}]}"#;
        let body: TabsBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.tabs.len(), 1);
        assert_eq!(body.tabs[0].tab_id, TabId("t1".to_string()));
        assert!(body.tabs[0].active);
        assert!(body.tabs[0].title.is_none());
    }

    #[test]
    fn test_screenshot_response_deserializes_as_frame() {
        let json = r#"{"tab_id":"t1","data":"aGVsbG8="}"#;
        let frame: ViewportFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.data, "aGVsbG8=");
    }

    #[test]
    fn test_suggestions_body_defaults_to_empty() {
        let body: SuggestionsBody = serde_json::from_str("{}").unwrap();
        assert!(body.suggestions.is_empty());
    }
}
