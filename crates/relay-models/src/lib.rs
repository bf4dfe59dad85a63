mod backend;
mod openrouter;
mod scripted;

pub use backend::{FakeBackend, HttpBackend, ProviderBackend, ProviderRequest, ProviderResponse};
pub use openrouter::{OpenRouterClient, OpenRouterConfig};
pub use scripted::ScriptedClient;
