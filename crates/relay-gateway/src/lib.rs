mod gateway;
mod invoker;

pub use gateway::{Gateway, GatewayConfig, ResolveRequest};
pub use invoker::{FallbackInvoker, InvokerOutcome};
