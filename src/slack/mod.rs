pub mod api;
pub mod mock;
pub mod signature;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Event type sent when someone @-mentions the bot.
pub const APP_MENTION: &str = "app_mention";

/// The one-off URL verification token. Decoded apart from
/// [`EventEnvelope`] so a malformed `event` or `authed_users` cannot hide it.
#[derive(Debug, Default, Deserialize)]
pub struct Challenge {
    #[serde(default)]
    pub challenge: String,
}

impl Challenge {
    /// The challenge in `body`, if there is a non-empty one.
    pub fn from_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Challenge>(body)
            .ok()
            .map(|c| c.challenge)
            .filter(|c| !c.is_empty())
    }
}

/// The outer payload of an Events API callback.
#[derive(Debug, Default, Deserialize)]
pub struct EventEnvelope {
    #[serde(default)]
    pub event: Event,
    #[serde(default)]
    pub authed_users: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Event {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

/// Someone asked the bot something.
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub text: String,
    pub channel: String,
    pub thread_ts: Option<String>,
    /// The bot's own user ID, if Slack told us.
    pub bot_user: Option<String>,
}

impl EventEnvelope {
    /// The mention carried by this payload, if it is one.
    pub fn into_mention(self) -> Option<Mention> {
        if self.event.kind != APP_MENTION {
            return None;
        }
        Some(Mention {
            text: self.event.text,
            channel: self.event.channel,
            thread_ts: self.event.thread_ts,
            bot_user: self.authed_users.into_iter().next(),
        })
    }
}

impl Mention {
    /// The question with the bot's own `<@U…>` tags removed.
    ///
    /// `"<@U123abc> how do you make scrambled eggs?"` becomes
    /// `"how do you make scrambled eggs?"`.
    pub fn query(&self) -> String {
        let text = match &self.bot_user {
            Some(user) => self.text.replace(&format!("<@{user}>"), ""),
            None => self.text.clone(),
        };
        text.trim().to_string()
    }
}

/// An outbound `chat.postMessage` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl ChatMessage {
    /// A reply to `mention`, in its thread when it has one.
    pub fn reply(mention: &Mention, text: String) -> Self {
        Self {
            channel: mention.channel.clone(),
            text,
            thread_ts: mention.thread_ts.clone().filter(|ts| !ts.is_empty()),
        }
    }
}

/// Delivers messages to a chat channel.
#[async_trait]
pub trait ChatPoster: Send + Sync {
    async fn post(&self, message: &ChatMessage) -> Result<()>;
}
