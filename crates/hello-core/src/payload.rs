//! Fixed response payloads
//!
//! Both bodies are rendered once at startup and shared by every request
//! through cheap `Bytes` clones.

use crate::Result;
use bytes::Bytes;
use http::HeaderValue;
use serde::Serialize;

/// Plaintext response body
pub const HELLO_WORLD: &str = "Hello, world!";

/// Value of the `message` field in the JSON response body
pub const JSON_MESSAGE: &str = "Hello, World!";

pub const CONTENT_TYPE_PLAIN: &str = "text/plain";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The JSON response document
#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub message: &'a str,
}

/// An immutable response body paired with its content headers
#[derive(Debug, Clone)]
pub struct Payload {
    body: Bytes,
    content_type: HeaderValue,
    content_length: HeaderValue,
}

impl Payload {
    /// `Hello, world!` as `text/plain`
    pub fn plaintext() -> Self {
        Self::new(
            Bytes::from_static(HELLO_WORLD.as_bytes()),
            HeaderValue::from_static(CONTENT_TYPE_PLAIN),
        )
    }

    /// `{"message":"Hello, World!"}` as `application/json`
    pub fn json() -> Result<Self> {
        let body = serde_json::to_vec(&Message {
            message: JSON_MESSAGE,
        })?;
        Ok(Self::new(
            Bytes::from(body),
            HeaderValue::from_static(CONTENT_TYPE_JSON),
        ))
    }

    fn new(body: Bytes, content_type: HeaderValue) -> Self {
        let content_length = HeaderValue::from(body.len());
        Self {
            body,
            content_type,
            content_length,
        }
    }

    /// Shared handle to the body bytes
    #[inline]
    pub fn body(&self) -> Bytes {
        self.body.clone()
    }

    #[inline]
    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    /// Pre-rendered `Content-Length` value
    #[inline]
    pub fn content_length(&self) -> &HeaderValue {
        &self.content_length
    }
}
