/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{
    Cli, ClientsCommand, Commands, GroupsCommand, LoanTransaction, LoansCommand, SavingsCommand,
    SavingsTransaction,
};
pub use commands::execute;
