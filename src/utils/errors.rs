use thiserror::Error;

/// Errors raised while resolving or sending a single command
#[derive(Error, Debug)]
pub enum BankingError {
    #[error("missing <{argument}> argument for `{command}`")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },

    #[error("unexpected argument '{value}' for `{command}`")]
    UnexpectedArgument { command: String, value: String },

    #[error("<{argument}> cannot be '{value}' for `{command}`")]
    UnroutableArgument {
        command: String,
        argument: &'static str,
        value: String,
    },

    #[error("--{option} is required")]
    MissingOption {
        command: String,
        option: &'static str,
    },

    #[error("no command registered for `{resource} {verb}`")]
    UnknownCommand { resource: String, verb: String },

    #[error("option --{option} is not declared for `{command}`")]
    UndeclaredOption { command: String, option: String },

    #[error("option --{option} of `{command}` expects a {expected} value")]
    MistypedOption {
        command: String,
        option: &'static str,
        expected: &'static str,
    },

    #[error("Failed to encode request: {0}")]
    EncodingFailure(String),

    #[error("Connection failed: is the server running at {base_url}?\n    {source}")]
    TransportFailure {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl BankingError {
    /// Whether the error was raised before any network I/O was attempted
    pub fn is_local(&self) -> bool {
        !matches!(self, BankingError::TransportFailure { .. })
    }
}
