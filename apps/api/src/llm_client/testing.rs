//! Test doubles for `CompletionClient`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{CompletionClient, CompletionError};

/// Replays canned replies in order and records every (system, prompt) pair.
/// Once the script runs out it answers with an empty string.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        credential: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        if credential.trim().is_empty() {
            return Err(CompletionError::MissingCredential);
        }
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
