use bytes::Bytes;
use serde_json::{Map, Value};

use crate::schema::HttpMethod;

/// A fully resolved request, ready to hand to a [`Gateway`](super::Gateway)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the gateway base URL, placeholders already substituted
    pub path: String,
    /// Unencoded query parameters
    pub query: Vec<(String, String)>,
    /// `None` for bodyless reads; `Some` (possibly empty) for every mutation
    pub body: Option<Map<String, Value>>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Serialized body bytes, if the request carries one
    pub fn encoded_body(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        self.body.as_ref().map(serde_json::to_vec).transpose()
    }
}

/// How a received response is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The gateway answered with a status of 400 or above
    ServerError,
}

impl Outcome {
    pub fn from_status(status: u16) -> Self {
        if status >= 400 {
            Outcome::ServerError
        } else {
            Outcome::Success
        }
    }
}

/// Status code and raw body of one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub status: u16,
    pub body: Bytes,
}

impl Exchange {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_status(self.status)
    }
}
