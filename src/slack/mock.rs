use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;

use super::{ChatMessage, ChatPoster};

/// Keeps every posted message for tests. Can be told to fail each post.
#[derive(Default)]
pub struct RecordingPoster {
    sent: Mutex<Vec<ChatMessage>>,
    fail: bool,
}

impl RecordingPoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poster that records the attempt, then errors.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<ChatMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPoster for RecordingPoster {
    async fn post(&self, message: &ChatMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            bail!("RecordingPoster: delivery failed");
        }
        Ok(())
    }
}
