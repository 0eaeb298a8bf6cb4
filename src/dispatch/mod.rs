// Gateway module for dispatch
// Turns a parsed command line into zero or one transport call

mod dispatcher;
mod invocation;

pub use dispatcher::Dispatcher;
pub use invocation::{CommandCall, Invocation};
