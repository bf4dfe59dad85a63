use std::sync::Arc;
use std::time::Instant;

use relay_core::{
    AttemptOutcome, CallAttempt, CompletionRequest, FallbackGenerator, GatewayError, ModelClient,
    Source,
};
use serde_json::Value;

/// Result of one fallback-chain run, with every attempt recorded for
/// logging and cost accounting.
#[derive(Debug)]
pub struct InvokerOutcome {
    pub payload: Value,
    pub source: Source,
    pub attempts: Vec<CallAttempt>,
}

/// Calls upstream models strictly in priority order and degrades to a
/// deterministic local fallback when every model fails.
///
/// Each model gets exactly one attempt per `invoke` call; retry loops and
/// backoff are deliberately out of scope, as is speculative parallelism
/// (sequential attempts keep upstream cost bounded). Timeouts belong to the
/// transport layer beneath the [`ModelClient`].
pub struct FallbackInvoker {
    client: Arc<dyn ModelClient>,
    require_structured: bool,
}

impl FallbackInvoker {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            require_structured: true,
        }
    }

    /// Accept free-text completions instead of requiring a JSON object;
    /// the payload becomes a JSON string of the raw text.
    pub fn plain_text(mut self) -> Self {
        self.require_structured = false;
        self
    }

    pub async fn invoke(
        &self,
        request: &CompletionRequest,
        models: &[String],
        fallback: Option<&dyn FallbackGenerator>,
    ) -> Result<InvokerOutcome, GatewayError> {
        if models.is_empty() && fallback.is_none() {
            return Err(GatewayError::ContractViolation(
                "empty model priority list and no local fallback supplied".to_string(),
            ));
        }

        let mut attempts = Vec::with_capacity(models.len());
        for (position, model_id) in models.iter().enumerate() {
            let started = Instant::now();
            match self.client.complete(model_id, request).await {
                Ok(text) => match self.reduce(&text) {
                    Some(payload) => {
                        let latency = started.elapsed();
                        tracing::debug!(model = %model_id, ?latency, "model attempt succeeded");
                        attempts.push(CallAttempt {
                            model_id: model_id.clone(),
                            outcome: AttemptOutcome::Success,
                            latency,
                        });
                        let source = if position == 0 {
                            Source::PrimaryModel
                        } else {
                            Source::SecondaryModel
                        };
                        return Ok(InvokerOutcome {
                            payload,
                            source,
                            attempts,
                        });
                    }
                    None => {
                        tracing::warn!(model = %model_id, "model returned no recoverable structured output");
                        attempts.push(CallAttempt {
                            model_id: model_id.clone(),
                            outcome: AttemptOutcome::InvalidOutput,
                            latency: started.elapsed(),
                        });
                    }
                },
                Err(error) => {
                    tracing::warn!(model = %model_id, %error, "model attempt failed");
                    attempts.push(CallAttempt {
                        model_id: model_id.clone(),
                        outcome: AttemptOutcome::TransportError,
                        latency: started.elapsed(),
                    });
                }
            }
        }

        match fallback {
            Some(generator) => {
                tracing::warn!(
                    models = models.len(),
                    "all upstream models failed; serving local fallback"
                );
                Ok(InvokerOutcome {
                    payload: generator.generate(request),
                    source: Source::LocalFallback,
                    attempts,
                })
            }
            None => Err(GatewayError::ContractViolation(
                "model priority list exhausted and no local fallback supplied".to_string(),
            )),
        }
    }

    fn reduce(&self, text: &str) -> Option<Value> {
        if self.require_structured {
            relay_extract::extract(text)
        } else {
            Some(Value::String(text.to_string()))
        }
    }
}
