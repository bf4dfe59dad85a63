use std::sync::Arc;
use std::time::Duration;

use relay_cache::fingerprint_request;
use relay_core::{
    CacheMetadata, CompletionRequest, FallbackGenerator, GatewayError, ModelClient,
    ResolvedResponse, ResultCache, Source,
};

use crate::invoker::FallbackInvoker;

#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// How long a cached local-fallback result stays servable. `None` (the
    /// default) disables caching degraded results entirely, so a transient
    /// upstream outage is never masked for the full cache window.
    pub fallback_cache_age: Option<Duration>,
}

impl GatewayConfig {
    pub fn with_fallback_cache_age(mut self, age: Duration) -> Self {
        self.fallback_cache_age = Some(age);
        self
    }
}

/// One cacheable resolution: what to ask, on behalf of which logical
/// operation, against which models, and how stale a cached answer may be.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub service: String,
    pub request: CompletionRequest,
    pub models: Vec<String>,
    pub max_cache_age: Duration,
}

impl ResolveRequest {
    pub fn new(service: impl Into<String>, request: CompletionRequest) -> Self {
        Self {
            service: service.into(),
            request,
            models: Vec::new(),
            // Matches the source product's default result TTL.
            max_cache_age: Duration::from_secs(3600),
        }
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_cache_age(mut self, max_age: Duration) -> Self {
        self.max_cache_age = max_age;
        self
    }
}

/// Composition root: fingerprint, cache lookup, fallback-chain invocation,
/// and write-back.
///
/// `resolve` never fails on upstream trouble; total outage degrades to the
/// caller's local fallback. The only error it returns is
/// [`GatewayError::ContractViolation`] for caller misconfiguration. Cache
/// store failures are absorbed too: a failed read resolves as a miss and a
/// failed write-back is logged and dropped, since the chain already
/// produced a usable result.
pub struct Gateway {
    invoker: FallbackInvoker,
    cache: Arc<dyn ResultCache>,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(client: Arc<dyn ModelClient>, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            invoker: FallbackInvoker::new(client),
            cache,
            config: GatewayConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn resolve(
        &self,
        req: &ResolveRequest,
        fallback: Option<&dyn FallbackGenerator>,
    ) -> Result<ResolvedResponse, GatewayError> {
        if req.models.is_empty() && fallback.is_none() {
            return Err(GatewayError::ContractViolation(
                "empty model priority list and no local fallback supplied".to_string(),
            ));
        }

        let fp = fingerprint_request(&req.request, &req.service);

        match self.cache.get(&fp, &req.service, req.max_cache_age).await {
            Ok(Some(hit)) if self.hit_is_servable(&hit) => {
                tracing::debug!(service = %req.service, "cache hit");
                return Ok(ResolvedResponse {
                    payload: hit.result,
                    source: Source::Cache,
                });
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(service = %req.service, %error, "cache read failed; treating as miss");
            }
        }

        let outcome = self
            .invoker
            .invoke(&req.request, &req.models, fallback)
            .await?;

        let metadata = CacheMetadata {
            input_bytes: req.request.input_bytes(),
            degraded: outcome.source == Source::LocalFallback,
        };
        let cache_this = outcome.source != Source::LocalFallback
            || self.config.fallback_cache_age.is_some();
        if cache_this {
            if let Err(error) = self
                .cache
                .put(&fp, &req.service, &outcome.payload, metadata)
                .await
            {
                tracing::warn!(service = %req.service, %error, "cache write-back failed");
            }
        }

        Ok(ResolvedResponse {
            payload: outcome.payload,
            source: outcome.source,
        })
    }

    /// Degraded entries obey the stricter fallback age cap, not the
    /// caller's max age.
    fn hit_is_servable(&self, hit: &relay_core::CacheHit) -> bool {
        if !hit.metadata.degraded {
            return true;
        }
        match self.config.fallback_cache_age {
            Some(cap) => hit.age <= cap,
            None => false,
        }
    }
}
