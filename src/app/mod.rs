// Gateway module for app - follows the Train Station Pattern
// All external access must go through this gateway

mod config;

pub use config::{load_config, ServerConfig};
