use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Map;
use std::collections::BTreeMap;

use crate::schema::{Body, CommandSpec, OptionValue, Resource};
use crate::transport::ApiRequest;
use crate::utils::BankingError;

// Characters that would end or split a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A parsed command line: which leaf was chosen and the values given to it
#[derive(Debug, Clone, PartialEq)]
pub struct CommandCall {
    pub resource: Resource,
    pub verb: &'static str,
    pub positionals: Vec<String>,
    pub options: BTreeMap<&'static str, OptionValue>,
}

impl CommandCall {
    pub fn new(resource: Resource, verb: &'static str) -> Self {
        Self {
            resource,
            verb,
            positionals: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positionals.push(value.into());
        self
    }

    /// Record an option value; `None` means the flag was not given
    pub fn option<V: Into<OptionValue>>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.options.insert(name, value.into());
        }
        self
    }
}

/// A validated call: positionals bound to placeholders, defaults substituted
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub spec: &'static CommandSpec,
    pub positionals: BTreeMap<&'static str, String>,
    pub options: BTreeMap<&'static str, OptionValue>,
}

impl Invocation {
    /// Substitute every `{placeholder}` with its positional value, encoded
    /// so that it stays a single path segment
    pub fn resolved_path(&self) -> String {
        self.positionals
            .iter()
            .fold(self.spec.path.to_string(), |path, (name, value)| {
                let segment = utf8_percent_encode(value, SEGMENT).to_string();
                path.replace(&format!("{{{}}}", name), &segment)
            })
    }

    /// Build the request the transport will send
    pub fn to_request(&self) -> Result<ApiRequest, BankingError> {
        let query = self
            .spec
            .query
            .iter()
            .filter_map(|binding| {
                self.options
                    .get(binding.option)
                    .map(|value| (binding.key.to_string(), value.to_query_value()))
            })
            .collect();

        let body = match self.spec.body {
            Body::Absent => None,
            Body::Document(fields) => {
                let mut document = Map::new();
                for field in fields {
                    if let Some(value) = self.options.get(field.option) {
                        document.insert(field.key.to_string(), value.to_json()?);
                    }
                }
                Some(document)
            }
        };

        Ok(ApiRequest {
            method: self.spec.method,
            path: self.resolved_path(),
            query,
            body,
        })
    }
}
