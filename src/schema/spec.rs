use serde_json::{Number, Value};
use std::fmt;

use crate::constants::ZERO_MEANS_ABSENT;
use crate::utils::BankingError;

/// Top-level nouns (and singleton actions) exposed by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Clients,
    Groups,
    Loans,
    Savings,
    Ask,
    Route,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Clients => "clients",
            Resource::Groups => "groups",
            Resource::Loans => "loans",
            Resource::Savings => "savings",
            Resource::Ask => "ask",
            Resource::Route => "route",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// Value type an option accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Text,
    Integer,
    Float,
    Bool,
    IntegerList,
}

impl OptionKind {
    pub fn describe(&self) -> &'static str {
        match self {
            OptionKind::Text => "string",
            OptionKind::Integer => "integer",
            OptionKind::Float => "floating-point",
            OptionKind::Bool => "boolean",
            OptionKind::IntegerList => "integer list",
        }
    }
}

/// A concrete option value, already converted by the argument parser
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    IntegerList(Vec<i64>),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Text(_) => OptionKind::Text,
            OptionValue::Integer(_) => OptionKind::Integer,
            OptionValue::Float(_) => OptionKind::Float,
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::IntegerList(_) => OptionKind::IntegerList,
        }
    }

    /// JSON form used in request bodies; non-finite floats cannot be encoded
    pub fn to_json(&self) -> Result<Value, BankingError> {
        Ok(match self {
            OptionValue::Text(s) => Value::String(s.clone()),
            OptionValue::Integer(n) => Value::from(*n),
            OptionValue::Float(x) => Number::from_f64(*x).map(Value::Number).ok_or_else(|| {
                BankingError::EncodingFailure(format!("{} is not a representable JSON number", x))
            })?,
            OptionValue::Bool(b) => Value::Bool(*b),
            OptionValue::IntegerList(ids) => Value::from(ids.clone()),
        })
    }

    /// Form used in query strings (encoding is left to the transport)
    pub fn to_query_value(&self) -> String {
        match self {
            OptionValue::Text(s) => s.clone(),
            OptionValue::Integer(n) => n.to_string(),
            OptionValue::Float(x) => x.to_string(),
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::IntegerList(ids) => ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<Vec<i64>> for OptionValue {
    fn from(value: Vec<i64>) -> Self {
        OptionValue::IntegerList(value)
    }
}

/// Presence check for required option values.
///
/// Empty strings and empty lists are never "supplied". Numeric zero is
/// treated the same way while [`ZERO_MEANS_ABSENT`] is set, which rejects
/// zero-amount transactions. Defaulted options never go through this: an
/// explicit `--reason 0` or `--note ""` is sent as given.
pub fn is_supplied(value: &OptionValue) -> bool {
    match value {
        OptionValue::Text(s) => !s.is_empty(),
        OptionValue::IntegerList(ids) => !ids.is_empty(),
        OptionValue::Integer(n) => !(ZERO_MEANS_ABSENT && *n == 0),
        OptionValue::Float(x) => !(ZERO_MEANS_ABSENT && *x == 0.0),
        OptionValue::Bool(_) => true,
    }
}

/// Whether an optional value goes on the wire at all.
///
/// Empty text and empty lists are left out, and so are numbers that are not
/// positive: an override amount of zero or below means "no override".
pub fn is_worth_sending(value: &OptionValue) -> bool {
    match value {
        OptionValue::Text(s) => !s.is_empty(),
        OptionValue::IntegerList(ids) => !ids.is_empty(),
        OptionValue::Integer(n) => *n > 0,
        OptionValue::Float(x) => *x > 0.0,
        OptionValue::Bool(_) => true,
    }
}

/// Compile-time default for an option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> OptionValue {
        match self {
            DefaultValue::Text(s) => OptionValue::Text(s.to_string()),
            DefaultValue::Integer(n) => OptionValue::Integer(n),
            DefaultValue::Bool(b) => OptionValue::Bool(b),
        }
    }

    fn kind(&self) -> OptionKind {
        match self {
            DefaultValue::Text(_) => OptionKind::Text,
            DefaultValue::Integer(_) => OptionKind::Integer,
            DefaultValue::Bool(_) => OptionKind::Bool,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    /// Must be supplied; absence is a `MissingOption`
    Required,
    /// Left out of the request when not supplied
    Optional,
    /// Substituted when not supplied
    Defaulted(DefaultValue),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub requirement: Requirement,
}

impl OptionSpec {
    pub const fn required(name: &'static str, kind: OptionKind) -> Self {
        Self { name, kind, requirement: Requirement::Required }
    }

    pub const fn optional(name: &'static str, kind: OptionKind) -> Self {
        Self { name, kind, requirement: Requirement::Optional }
    }

    pub const fn defaulted(name: &'static str, kind: OptionKind, default: DefaultValue) -> Self {
        Self { name, kind, requirement: Requirement::Defaulted(default) }
    }
}

/// Maps a resolved option onto a wire key (JSON field or query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: &'static str,
    pub option: &'static str,
}

pub const fn bind(key: &'static str, option: &'static str) -> Binding {
    Binding { key, option }
}

/// How the request body is built from resolved options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// Pure reads send nothing
    Absent,
    /// A JSON object; an empty field list still sends `{}`
    Document(&'static [Binding]),
}

/// Declarative contract for one (resource, verb) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandSpec {
    pub resource: Resource,
    pub verb: &'static str,
    pub method: HttpMethod,
    /// Path with `{name}` placeholders, one per positional
    pub path: &'static str,
    pub positionals: &'static [&'static str],
    pub options: &'static [OptionSpec],
    pub query: &'static [Binding],
    pub body: Body,
}

impl CommandSpec {
    /// `resource verb` as typed on the command line; singletons have no verb
    pub fn display_name(&self) -> String {
        if self.verb.is_empty() {
            self.resource.name().to_string()
        } else {
            format!("{} {}", self.resource, self.verb)
        }
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|option| option.name == name)
    }

    pub fn placeholders(&self) -> Vec<&'static str> {
        placeholders(self.path)
    }

    /// Check the structural invariants of the entry
    pub fn validate(&self) -> Result<(), String> {
        let name = self.display_name();

        let placeholders = self.placeholders();
        if placeholders != self.positionals {
            return Err(format!(
                "`{}`: path placeholders {:?} do not match positionals {:?}",
                name, placeholders, self.positionals
            ));
        }

        let body_bindings: &[Binding] = match self.body {
            Body::Absent => &[],
            Body::Document(fields) => fields,
        };
        for binding in self.query.iter().chain(body_bindings) {
            if self.option(binding.option).is_none() {
                return Err(format!(
                    "`{}`: '{}' is bound to undeclared option --{}",
                    name, binding.key, binding.option
                ));
            }
        }

        for option in self.options {
            if let Requirement::Defaulted(default) = option.requirement {
                if default.kind() != option.kind {
                    return Err(format!(
                        "`{}`: default for --{} is not a {} value",
                        name,
                        option.name,
                        option.kind.describe()
                    ));
                }
            }
        }

        match (self.method, self.body) {
            (HttpMethod::Get, Body::Document(_)) => {
                Err(format!("`{}`: GET requests carry no body", name))
            }
            (HttpMethod::Post | HttpMethod::Put, Body::Absent) => {
                Err(format!("`{}`: mutating requests always send a body", name))
            }
            _ => Ok(()),
        }
    }
}

/// Placeholder names of a path template, in order
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}
