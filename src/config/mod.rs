//! Bot configuration, built once at startup and shared read-only.

use anyhow::{Result, bail};

/// Credentials the gateway needs to talk to Slack.
#[derive(Clone)]
pub struct BotConfig {
    /// OAuth bot token used for outbound `chat.postMessage` calls.
    pub token: String,
    /// Signing secret used to authenticate inbound webhook calls.
    pub secret: String,
}

impl BotConfig {
    /// Build a config. Fails when the signing secret is empty, since every
    /// inbound request would then be checked against an empty key.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            bail!("missing signing secret, unable to authenticate requests");
        }
        Ok(Self {
            token: token.into(),
            secret,
        })
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &redact(&self.token))
            .field("secret", &redact(&self.secret))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<empty>" } else { "<redacted>" }
}
