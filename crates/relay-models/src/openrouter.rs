use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{CompletionRequest, GatewayError, Message, ModelClient, ResponseFormat};
use serde_json::{json, Value};

use crate::backend::{ProviderBackend, ProviderRequest, ProviderResponse};

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Chat-completions client for an OpenRouter-compatible endpoint. One client
/// serves every model id, so a fallback chain can route successive attempts
/// to different models without reconnecting.
pub struct OpenRouterClient {
    config: OpenRouterConfig,
    backend: Arc<dyn ProviderBackend>,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig, backend: Arc<dyn ProviderBackend>) -> Self {
        Self { config, backend }
    }

    fn build_request(&self, model_id: &str, request: &CompletionRequest) -> ProviderRequest {
        let messages: Vec<Value> = request.messages.iter().map(message_to_wire).collect();

        let mut body = json!({
            "model": model_id,
            "messages": messages,
        });

        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temp) = self.config.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(ResponseFormat::JsonObject) = request.response_format {
            body["response_format"] = json!({"type": "json_object"});
        }

        ProviderRequest {
            url: format!("{}/chat/completions", self.config.base_url),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }
}

fn message_to_wire(msg: &Message) -> Value {
    json!({
        "role": msg.role(),
        "content": msg.content(),
    })
}

fn parse_response(resp: &ProviderResponse) -> Result<String, GatewayError> {
    check_error_status(resp)?;

    resp.body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            GatewayError::Parsing("completion response carried no message content".to_string())
        })
}

fn check_error_status(resp: &ProviderResponse) -> Result<(), GatewayError> {
    if resp.status == 429 {
        let msg = resp.body["error"]["message"]
            .as_str()
            .unwrap_or("rate limited")
            .to_string();
        return Err(GatewayError::RateLimit(msg));
    }
    if resp.status >= 400 {
        let message = resp.body["error"]["message"]
            .as_str()
            .unwrap_or("unknown API error")
            .to_string();
        return Err(GatewayError::Status {
            status: resp.status,
            message,
        });
    }
    Ok(())
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn complete(
        &self,
        model_id: &str,
        request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        let provider_req = self.build_request(model_id, request);
        let resp = self.backend.send(provider_req).await?;
        parse_response(&resp)
    }
}
