//! Chat-completion proxy.
//!
//! Labs and the `/api/chat` route talk to an OpenAI-compatible
//! `/chat/completions` endpoint through the `ChatBackend` trait so the
//! server can run (and be tested) without a key.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub system: Option<String>,
    pub prompt: String,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Used when no API key is set; every call fails with `ChatUnavailable`.
pub struct Disabled;

#[async_trait]
impl ChatBackend for Disabled {
    async fn complete(&self, _request: ChatRequest) -> Result<String> {
        Err(AppError::ChatUnavailable)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn messages(request: &ChatRequest) -> Vec<Message<'_>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = request.system.as_deref().filter(|s| !s.trim().is_empty()) {
        messages.push(Message {
            role: "system",
            content: system,
        });
    }
    messages.push(Message {
        role: "user",
        content: &request.prompt,
    });
    messages
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        if request.prompt.trim().is_empty() {
            return Err(AppError::EmptyPrompt);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages: messages(&request),
        };
        debug!("Sending {} chars to {}", request.prompt.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, text)));
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::Upstream("response has no choices".to_string()))
    }
}

pub fn backend_from_config(config: &Config) -> Result<Arc<dyn ChatBackend>> {
    match &config.openai_api_key {
        Some(key) => {
            let client = OpenAiClient::new(
                &config.openai_base_url,
                &config.openai_model,
                key,
                config.chat_timeout,
            )?;
            info!("Chat completions via {} ({})", config.openai_base_url, client.model());
            Ok(Arc::new(client))
        }
        None => {
            info!("OPENAI_API_KEY not set, chat completions disabled");
            Ok(Arc::new(Disabled))
        }
    }
}
