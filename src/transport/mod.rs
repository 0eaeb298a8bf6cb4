// Gateway module for transport - follows the Train Station Pattern
// One HTTP exchange per invocation; no knowledge of resources

mod exchange;
mod gateway;
mod render;

pub use exchange::{ApiRequest, Exchange, Outcome};
#[cfg(test)]
pub use gateway::MockGateway;
pub use gateway::{Gateway, HttpGateway};
pub use render::{pretty_body, render_exchange, status_line};
