//! Mistral chat-completions client with retry logic

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use muselink_shared_config::MistralConfig;

use crate::error::{MistralError, MistralResult};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Tool, ToolChoice};

/// Maximum error body size carried in error variants
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Default retry configuration
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// Mistral API client
#[derive(Clone)]
pub struct MistralClient {
    http_client: Client,
    config: MistralConfig,
    retry_attempts: u32,
    retry_base_delay_ms: u64,
}

impl fmt::Debug for MistralClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MistralClient")
            .field("url", &self.config.url)
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl MistralClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    /// Returns `MistralError::MissingApiKey` if the API key is empty.
    pub fn new(config: &MistralConfig) -> MistralResult<Self> {
        if config.api_key.is_empty() {
            return Err(MistralError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("muselink/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        })
    }

    /// Create a client from `MISTRAL_*` environment variables
    pub fn from_env() -> MistralResult<Self> {
        let config = MistralConfig::from_env().map_err(|_| MistralError::MissingApiKey)?;
        Self::new(&config)
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, attempts: u32, base_delay_ms: u64) -> Self {
        self.retry_attempts = attempts;
        self.retry_base_delay_ms = base_delay_ms;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &MistralConfig {
        &self.config
    }

    /// Execute an async operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> MistralResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = MistralResult<T>>,
    {
        if self.retry_attempts == 0 {
            return operation().await;
        }

        let mut last_error = None;

        for attempt in 0..self.retry_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempt < self.retry_attempts - 1 {
                        let delay = self.retry_base_delay_ms * 2_u64.pow(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = self.retry_attempts,
                            delay_ms = delay,
                            error = %e,
                            "Retrying Mistral request after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(MistralError::RetriesExhausted {
            attempts: self.retry_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Truncate a response body kept in an error variant
    fn truncate_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }
        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);
        format!("{}... (truncated)", &body[..truncate_at])
    }

    /// Single chat request, no retry
    async fn chat_internal(&self, request: &ChatRequest) -> MistralResult<ChatMessage> {
        let response = self
            .http_client
            .post(self.config.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MistralError::Timeout
                } else {
                    MistralError::Http(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Mistral API rate limited");
            return Err(MistralError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = Self::truncate_body(response.text().await.unwrap_or_default());
            return Err(MistralError::Api { status, body });
        }

        let completion: ChatResponse = serde_json::from_str(&response.text().await?)?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(MistralError::EmptyResponse)
    }

    /// Complete a plain conversation without tools
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> MistralResult<ChatMessage> {
        self.chat_with_tools(messages, None, None).await
    }

    /// Complete a conversation, optionally offering tools
    ///
    /// The returned assistant message may carry `tool_calls` the caller
    /// is expected to execute and answer with tool-result messages.
    pub async fn chat_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
        tool_choice: Option<ToolChoice>,
    ) -> MistralResult<ChatMessage> {
        debug!(
            model = %self.config.model,
            message_count = messages.len(),
            tool_count = tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "Sending chat completion request"
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            tools,
            tool_choice,
        };

        let message = self
            .with_retry(|| async { self.chat_internal(&request).await })
            .await?;

        debug!(
            has_tool_calls = message.tool_calls.is_some(),
            response_len = message.content_or_empty().len(),
            "Chat completion received"
        );

        Ok(message)
    }
}
