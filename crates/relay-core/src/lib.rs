use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },
    #[serde(rename = "user")]
    Human { content: String },
    #[serde(rename = "assistant")]
    AI { content: String },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::AI {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content } => content,
            Message::Human { content } => content,
            Message::AI { content } => content,
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Message::System { .. } => "system",
            Message::Human { .. } => "user",
            Message::AI { .. } => "assistant",
        }
    }
}

/// Hint to the upstream service about the desired completion shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            response_format: None,
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Total byte length of all message contents, used for cache diagnostics.
    pub fn input_bytes(&self) -> usize {
        self.messages.iter().map(|m| m.content().len()).sum()
    }
}

/// Where a resolved response came from. Callers surface this in logs and
/// metrics to distinguish cached, upstream, and degraded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Cache,
    PrimaryModel,
    SecondaryModel,
    LocalFallback,
}

/// The value handed back to callers of the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResponse {
    pub payload: Value,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    TransportError,
    InvalidOutput,
}

/// One upstream model attempt, recorded for observability. Transient;
/// never persisted.
#[derive(Debug, Clone)]
pub struct CallAttempt {
    pub model_id: String,
    pub outcome: AttemptOutcome,
    pub latency: Duration,
}

/// Diagnostic fields stored alongside a cached result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Byte length of the request text that produced the entry.
    pub input_bytes: usize,
    /// True when the entry holds a local-fallback result rather than
    /// upstream output.
    pub degraded: bool,
}

/// A fresh cache entry returned by [`ResultCache::get`].
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub result: Value,
    pub metadata: CacheMetadata,
    /// Age of the entry at read time, so callers can apply stricter
    /// freshness policies than the one passed to `get`.
    pub age: Duration,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("rate limit: {0}")]
    RateLimit(String),
    #[error("parsing error: {0}")]
    Parsing(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("contract violation: {0}")]
    ContractViolation(String),
}

/// Client for an upstream text-completion service. One client serves every
/// model id; the fallback chain picks which id each attempt targets.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(
        &self,
        model_id: &str,
        request: &CompletionRequest,
    ) -> Result<String, GatewayError>;
}

/// Fingerprint-keyed result store with read-time freshness.
///
/// Entries are scoped by `(fingerprint, service)` so identical text used by
/// different operations never collides. Freshness is evaluated lazily at
/// read time: an entry is returned only while `age <= max_age` (inclusive
/// boundary). Entries are immutable once written; `put` replaces the whole
/// entry with a fresh timestamp. Concurrent `put`s to one key are
/// last-writer-wins by design.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(
        &self,
        fingerprint: &str,
        service: &str,
        max_age: Duration,
    ) -> Result<Option<CacheHit>, GatewayError>;

    async fn put(
        &self,
        fingerprint: &str,
        service: &str,
        result: &Value,
        metadata: CacheMetadata,
    ) -> Result<(), GatewayError>;

    async fn clear(&self) -> Result<(), GatewayError>;
}

/// Deterministic local substitute for upstream output. The guaranteed
/// terminal branch of the fallback chain: pure, synchronous, infallible.
pub trait FallbackGenerator: Send + Sync {
    fn generate(&self, request: &CompletionRequest) -> Value;
}

impl<F> FallbackGenerator for F
where
    F: Fn(&CompletionRequest) -> Value + Send + Sync,
{
    fn generate(&self, request: &CompletionRequest) -> Value {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roles() {
        assert_eq!(Message::system("s").role(), "system");
        assert_eq!(Message::human("h").role(), "user");
        assert_eq!(Message::ai("a").role(), "assistant");
    }

    #[test]
    fn input_bytes_sums_contents() {
        let request = CompletionRequest::new(vec![Message::system("abc"), Message::human("de")]);
        assert_eq!(request.input_bytes(), 5);
    }

    #[test]
    fn source_serializes_kebab_case() {
        let json = serde_json::to_string(&Source::LocalFallback).unwrap();
        assert_eq!(json, "\"local-fallback\"");
    }

    #[test]
    fn closure_is_a_fallback_generator() {
        let generator = |_req: &CompletionRequest| serde_json::json!({ "ok": true });
        let request = CompletionRequest::new(vec![Message::human("x")]);
        assert_eq!(generator.generate(&request)["ok"], true);
    }
}
