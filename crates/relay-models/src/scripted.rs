use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{CompletionRequest, GatewayError, ModelClient};
use tokio::sync::Mutex;

/// Test double with per-model scripted outcomes and a call counter.
///
/// Each model id has its own queue of results; a call for a model with an
/// empty queue fails with a transport error, which makes "this model must
/// never be invoked" assertions possible via [`ScriptedClient::calls`].
#[derive(Clone, Default)]
pub struct ScriptedClient {
    outcomes: Arc<Mutex<HashMap<String, VecDeque<Result<String, GatewayError>>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, model_id: impl Into<String>, text: impl Into<String>) -> &Self {
        self.outcomes
            .try_lock()
            .expect("not concurrent during setup")
            .entry(model_id.into())
            .or_default()
            .push_back(Ok(text.into()));
        self
    }

    pub fn push_error(&self, model_id: impl Into<String>, error: GatewayError) -> &Self {
        self.outcomes
            .try_lock()
            .expect("not concurrent during setup")
            .entry(model_id.into())
            .or_default()
            .push_back(Err(error));
        self
    }

    /// Number of `complete` calls observed across all models.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn complete(
        &self,
        model_id: &str,
        _request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut outcomes = self.outcomes.lock().await;
        outcomes
            .get_mut(model_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(GatewayError::Transport(format!(
                    "scripted client exhausted responses for {model_id}"
                )))
            })
    }
}
