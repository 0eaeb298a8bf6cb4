// Gateway module for the command table
// Every (resource, verb) contract is declared here and nowhere else

mod spec;
mod table;

pub use spec::{
    bind, is_supplied, is_worth_sending, placeholders, Binding, Body, CommandSpec, DefaultValue,
    HttpMethod, OptionKind, OptionSpec, OptionValue, Requirement, Resource,
};
pub use table::CommandTable;
