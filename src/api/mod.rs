use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod types;

use crate::config::{Config, RequestSettings, RetrySettings};
use crate::errors::{ParseError, QuizError, Result};
use crate::quiz::{extract, GenerationRequest};
use crate::redact::{redact_secrets, redact_url};
use types::*;

/// Raw outcome of one HTTP attempt.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam under the generation client, enabling test mocking.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// POST `body` as JSON to `url` and return whatever the server answered.
    /// Only transport failures are errors; HTTP error statuses are replies.
    async fn post_json(&self, url: &str, body: &GenerateContentRequest) -> Result<HttpReply>;
}

pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    pub fn new(settings: &RequestSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| QuizError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GenerationBackend for ReqwestBackend {
    async fn post_json(&self, url: &str, body: &GenerateContentRequest) -> Result<HttpReply> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        Ok(HttpReply {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn network_error(e: reqwest::Error) -> QuizError {
    let kind = if e.is_timeout() {
        "request timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    QuizError::Network(format!(
        "{}: {}",
        kind,
        redact_secrets(&e.without_url().to_string())
    ))
}

/// Retry configuration for generation calls
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Additional attempts after the first
    pub max_retries: u32,
    /// Delay before the first retry (doubles each retry)
    pub initial_delay_ms: u64,
    /// Maximum delay between retries
    pub max_delay_ms: u64,
    /// HTTP status codes that should trigger a retry
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 1000,
            max_delay_ms: 30000,
            retryable_status_codes: vec![429, 500, 503],
        }
    }
}

impl RetryConfig {
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_delay_ms: settings.base_delay_ms,
            max_delay_ms: settings.max_delay_ms,
            ..Self::default()
        }
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Backoff before retry number `retry` (1-based): 1s, 2s, 4s, ...
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(20);
        let ms = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Builds generation requests, performs them with bounded retry, and hands
/// successful payloads to the response extractor.
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    retry_config: RetryConfig,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Result<Self> {
        let backend = ReqwestBackend::new(&config.request)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: &Config, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            retry_config: RetryConfig::from_settings(&config.retry),
        }
    }

    fn url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        )
    }

    /// Generate raw question records for `request`.
    ///
    /// Records are returned unvalidated; the quiz controller filters them.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Value>> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(QuizError::missing_api_key)?;

        let url = self.url(api_key);
        let payload = GenerateContentRequest::json_prompt(build_prompt(request));
        let attempts = self.retry_config.total_attempts();
        let mut last_status = 0;

        info!(
            topic = request.topic(),
            count = request.count(),
            difficulty = %request.difficulty(),
            "Requesting questions"
        );

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.retry_config.delay_for_retry(attempt);
                warn!(
                    "Retry attempt {}/{} after {}ms delay",
                    attempt,
                    self.retry_config.max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            debug!("Sending request to {} (attempt {})", redact_url(&url), attempt + 1);
            let reply = self.backend.post_json(&url, &payload).await?;

            if reply.is_success() {
                debug!("API response body ({} chars)", reply.body.len());
                return parse_success(&reply.body);
            }

            if self.retry_config.is_retryable(reply.status) {
                warn!("Retryable error ({}): {}", reply.status, reply.status_text);
                last_status = reply.status;
                continue;
            }

            return Err(permanent_error(&reply));
        }

        Err(QuizError::ExhaustedRetries {
            attempts,
            last_status,
        })
    }
}

/// Instruction sent to the model for one quiz.
pub fn build_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"Generate exactly {count} multiple-choice questions on the topic "{topic}" with a difficulty level of "{difficulty}".
Respond ONLY with a valid raw JSON array of objects, without markdown or explanation.
Each MCQ must include:
{{
  "question": "string",
  "options": {{
    "A": "string",
    "B": "string",
    "C": "string",
    "D": "string"
  }},
  "answer": "A"
}}"#,
        count = request.count(),
        topic = request.topic(),
        difficulty = request.difficulty(),
    )
}

fn parse_success(body: &str) -> Result<Vec<Value>> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "JSON parse error in response envelope");
        ParseError::MalformedJson(format!("response envelope: {}", e))
    })?;
    let text = response
        .first_text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ParseError::EmptyResponse)?;
    Ok(extract(text)?)
}

fn permanent_error(reply: &HttpReply) -> QuizError {
    let server_message = serde_json::from_str::<ApiErrorBody>(&reply.body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty());
    let message = match server_message {
        Some(m) => m,
        None if !reply.status_text.is_empty() => reply.status_text.clone(),
        None => format!("HTTP {}", reply.status),
    };
    QuizError::PermanentServer {
        status: reply.status,
        message,
    }
}

/// Scripted backend for tests and offline demos.
///
/// Each call pops the next queued reply; calls are counted and their
/// (tokio) timestamps recorded so backoff can be asserted on a paused clock.
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use tokio::time::Instant;

    #[derive(Default)]
    pub struct MockBackend {
        replies: Mutex<VecDeque<HttpReply>>,
        calls: Mutex<Vec<MockCall>>,
    }

    /// One recorded `post_json` call.
    #[derive(Debug, Clone)]
    pub struct MockCall {
        pub at: Instant,
        pub url: String,
        pub body: GenerateContentRequest,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_replies(replies: Vec<HttpReply>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from(replies)),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        pub fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().iter().map(|c| c.at).collect()
        }

        pub fn urls(&self) -> Vec<String> {
            self.calls.lock().iter().map(|c| c.url.clone()).collect()
        }

        /// Request bodies in the order they were sent.
        pub fn bodies(&self) -> Vec<GenerateContentRequest> {
            self.calls.lock().iter().map(|c| c.body.clone()).collect()
        }
    }

    /// A 200 reply whose candidate text is `text`.
    pub fn ok_reply(text: &str) -> HttpReply {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        });
        HttpReply {
            status: 200,
            status_text: "OK".to_string(),
            body: body.to_string(),
        }
    }

    pub fn status_reply(status: u16, status_text: &str, body: &str) -> HttpReply {
        HttpReply {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        async fn post_json(
            &self,
            url: &str,
            body: &GenerateContentRequest,
        ) -> Result<HttpReply> {
            self.calls.lock().push(MockCall {
                at: Instant::now(),
                url: url.to_string(),
                body: body.clone(),
            });
            self.replies
                .lock()
                .pop_front()
                .ok_or_else(|| QuizError::Network("MockBackend: no more replies in queue".into()))
        }
    }
}
