//! Relay — a resilient cached remote-call gateway for LLM-backed features.
//!
//! Relay deduplicates identical requests to a text-generation service with a
//! content fingerprint, walks a model priority list on failure, recovers
//! structured output from noisy completions, and degrades to a deterministic
//! local fallback when every upstream attempt fails. Callers always get a
//! usable [`core::ResolvedResponse`]; its [`core::Source`] says whether it
//! came from cache, a primary or secondary model, or the local fallback.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use relay::cache::InMemoryCache;
//! use relay::core::{CompletionRequest, Message, ResponseFormat};
//! use relay::gateway::{Gateway, ResolveRequest};
//! use relay::models::{HttpBackend, OpenRouterClient, OpenRouterConfig};
//!
//! let client = OpenRouterClient::new(
//!     OpenRouterConfig::new(api_key),
//!     Arc::new(HttpBackend::new()),
//! );
//! let gateway = Gateway::new(Arc::new(client), Arc::new(InMemoryCache::new()));
//!
//! let request = CompletionRequest::new(vec![Message::human(resume_text)])
//!     .with_response_format(ResponseFormat::JsonObject);
//! let resolve = ResolveRequest::new("bullet-rewrite", request)
//!     .with_models(["openai/gpt-4o-mini", "anthropic/claude-3-haiku"]);
//! let resolved = gateway.resolve(&resolve, Some(&template_fallback)).await?;
//! ```

/// Core traits and types: ModelClient, ResultCache, FallbackGenerator,
/// ResolvedResponse, Source, GatewayError.
pub use relay_core as core;

/// Content fingerprinting and the in-memory result cache.
pub use relay_cache as cache;

/// Structured-output extraction from raw model text.
pub use relay_extract as extract;

/// Transport layer: ProviderBackend, OpenRouter adapter, test doubles.
pub use relay_models as models;

/// Fallback-chain invoker and the Gateway composition root.
pub use relay_gateway as gateway;
