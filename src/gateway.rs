//! The webhook endpoint Slack's Events API calls.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::instructions::InstructionFetcher;
use crate::slack::signature::{SignatureVerifier, unix_now};
use crate::slack::{Challenge, ChatMessage, ChatPoster, EventEnvelope};

/// Everything a request needs. Built once, never mutated.
pub struct AppState {
    pub verifier: SignatureVerifier,
    pub fetcher: InstructionFetcher,
    pub poster: Arc<dyn ChatPoster>,
}

impl AppState {
    pub fn new(config: &BotConfig, fetcher: InstructionFetcher, poster: Arc<dyn ChatPoster>) -> Self {
        Self {
            verifier: SignatureVerifier::new(config.secret.clone()),
            fetcher,
            poster,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handle_event))
        .with_state(state)
}

/// Authenticate, then answer challenges and mentions. Everything past
/// authentication is a 200, whatever happens downstream.
pub async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = state.verifier.verify_headers(&headers, &body, unix_now()) {
        warn!(reason = %e, "rejected webhook call");
        return (StatusCode::FORBIDDEN, e.to_string()).into_response();
    }

    if let Some(challenge) = Challenge::from_body(&body) {
        debug!("answering url verification challenge");
        return challenge.into_response();
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "unreadable event payload");
            return StatusCode::OK.into_response();
        }
    };

    let Some(mention) = envelope.into_mention() else {
        return StatusCode::OK.into_response();
    };

    let query = mention.query();
    info!(channel = %mention.channel, query = %query, "mentioned");

    let text = state.fetcher.fetch(&query).await;
    let reply = ChatMessage::reply(&mention, text);
    if let Err(e) = state.poster.post(&reply).await {
        warn!(channel = %reply.channel, error = %e, "failed to post reply");
    }

    StatusCode::OK.into_response()
}
