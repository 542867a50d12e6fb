use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

use super::{ChatMessage, ChatPoster};
use crate::consts::DEFAULT_CHAT_URL;

/// Posts messages through the Slack Web API with a bot token.
pub struct SlackClient {
    url: String,
    token: String,
    client: reqwest::Client,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, url: Option<String>) -> Self {
        Self {
            url: url.unwrap_or_else(|| DEFAULT_CHAT_URL.to_string()),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatPoster for SlackClient {
    async fn post(&self, message: &ChatMessage) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.token))
            .json(message)
            .send()
            .await
            .context("chat.postMessage request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Slack API error ({}): {}", status, text);
        }

        // Slack reports most failures as 200 with `ok: false`.
        let api_resp: ApiResponse = resp.json().await.context("unreadable Slack response")?;
        if !api_resp.ok {
            bail!(
                "Slack API error: {}",
                api_resp.error.as_deref().unwrap_or("unknown")
            );
        }
        Ok(())
    }
}

// --- API types ---

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use std::sync::{Arc, Mutex};

    /// (authorization header, content type, body) of each request received.
    type Seen = Arc<Mutex<Vec<(Option<String>, Option<String>, String)>>>;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn header(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn record(seen: &Seen, headers: &HeaderMap, body: String) {
        seen.lock().unwrap().push((
            header(headers, "authorization"),
            header(headers, "content-type"),
            body,
        ));
    }

    async fn accept(State(seen): State<Seen>, headers: HeaderMap, body: String) -> Response {
        record(&seen, &headers, body);
        r#"{"ok": true, "ts": "1.2"}"#.into_response()
    }

    async fn refuse(State(seen): State<Seen>, headers: HeaderMap, body: String) -> Response {
        record(&seen, &headers, body);
        r#"{"ok": false, "error": "channel_not_found"}"#.into_response()
    }

    async fn explode(State(seen): State<Seen>, headers: HeaderMap, body: String) -> Response {
        record(&seen, &headers, body);
        (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
    }

    async fn fake_slack() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/post", post(accept))
            .route("/refuse", post(refuse))
            .route("/explode", post(explode))
            .with_state(seen.clone());
        (serve(app).await, seen)
    }

    fn message(thread_ts: Option<&str>) -> ChatMessage {
        ChatMessage {
            channel: "C1".to_string(),
            text: "hi".to_string(),
            thread_ts: thread_ts.map(str::to_string),
        }
    }

    #[test]
    fn defaults_to_slack_endpoint() {
        let client = SlackClient::new("xoxb-1", None);
        assert_eq!(client.url, "https://slack.com/api/chat.postMessage");
        assert_eq!(client.token, "xoxb-1");
    }

    #[test]
    fn parse_error_response() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("channel_not_found"));
    }

    #[tokio::test]
    async fn post_sends_bearer_token_and_json() {
        let (base, seen) = fake_slack().await;
        let client = SlackClient::new("xoxb-T", Some(format!("{base}/post")));

        client.post(&message(None)).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        let (auth, content_type, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer xoxb-T"));
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body, serde_json::json!({"channel": "C1", "text": "hi"}));
    }

    #[tokio::test]
    async fn post_includes_thread_when_set() {
        let (base, seen) = fake_slack().await;
        let client = SlackClient::new("xoxb-T", Some(format!("{base}/post")));

        client.post(&message(Some("123.456"))).await.unwrap();

        let (_, _, body) = seen.lock().unwrap()[0].clone();
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"channel": "C1", "text": "hi", "thread_ts": "123.456"})
        );
    }

    #[tokio::test]
    async fn not_ok_reply_is_an_error() {
        let (base, seen) = fake_slack().await;
        let client = SlackClient::new("xoxb-T", Some(format!("{base}/refuse")));

        let err = client.post(&message(None)).await.unwrap_err();
        assert!(err.to_string().contains("channel_not_found"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let (base, _seen) = fake_slack().await;
        let client = SlackClient::new("xoxb-T", Some(format!("{base}/explode")));

        let err = client.post(&message(None)).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SlackClient::new("xoxb-T", Some(format!("http://{addr}/post")));
        assert!(client.post(&message(None)).await.is_err());
    }
}
