pub mod app;
pub mod cli;
pub mod constants;
pub mod dispatch;
pub mod schema;
pub mod transport;
pub mod utils;

pub use app::{load_config, ServerConfig};
pub use dispatch::{CommandCall, Dispatcher, Invocation};
pub use schema::{CommandSpec, CommandTable};
pub use transport::{Gateway, HttpGateway};
pub use utils::BankingError;
