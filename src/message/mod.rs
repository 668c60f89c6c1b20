//! The bus's wire type: an address, an opaque body, and the handful of
//! optional fields `publish`/`send`/`request` need to route and correlate
//! deliveries.
//!
//! The source system this crate is modeled on carries a dynamically typed
//! payload field. A systems implementation has no equivalent to a universal
//! variant type without either boxing every message or paying for a large
//! enum of known shapes, so `body` here is an opaque byte buffer plus an
//! optional content-type hint, with [`Message::encode`]/[`Message::decode`]
//! as the typed boundary helpers.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// A single bus message.
///
/// # Example
/// ```rust
/// use reactant_rt::message::Message;
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Greeting { name: String }
///
/// let msg = Message::encode("/greet", &Greeting { name: "World".into() }).unwrap();
/// let payload: Greeting = msg.decode().unwrap();
/// assert_eq!(payload.name, "World");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    address: String,
    body: Bytes,
    content_type: Option<String>,
    reply_to: Option<String>,
    correlation_id: Option<String>,
    headers: HashMap<String, String>,
}

/// Errors raised by the typed `encode`/`decode` helpers.
#[derive(Debug, Error)]
pub enum MessageError {
    /// `serde_json` failed to serialize the outgoing payload.
    #[error("failed to encode message body: {0}")]
    Encode(#[source] serde_json::Error),

    /// `serde_json` failed to deserialize the message body into the
    /// requested type.
    #[error("failed to decode message body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Message {
    /// Construct a message with a raw, already-encoded body.
    pub fn new(address: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            content_type: None,
            reply_to: None,
            correlation_id: None,
            headers: HashMap::new(),
        }
    }

    /// Construct a message by JSON-encoding `value`, tagging the
    /// content type as `application/json`.
    pub fn encode<T: Serialize>(address: impl Into<String>, value: &T) -> Result<Self, MessageError> {
        let body = serde_json::to_vec(value).map_err(MessageError::Encode)?;
        Ok(Self::new(address, body).with_content_type("application/json"))
    }

    /// Decode the body as JSON into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, MessageError> {
        serde_json::from_slice(&self.body).map_err(MessageError::Decode)
    }

    /// Attach a reply-to address; `request` sets this to the ephemeral
    /// reply address it allocates.
    pub fn with_reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Attach a correlation id used to match a reply to its request.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Tag the body's content type (e.g. `application/json`).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attach a single header, replacing any prior value for the same key.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// The destination address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The raw, opaque body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The content-type hint, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The reply-to address, if this message expects exactly one reply.
    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    /// The correlation id, if one was attached.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// All attached headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Build a reply to this message: copies the correlation id forward
    /// (generating one if the original had none) and targets the
    /// original's `reply_to` address. Returns `None` if the original
    /// carried no `reply_to` (nothing expects a reply).
    pub fn reply_with(&self, body: impl Into<Bytes>) -> Option<Message> {
        let reply_to = self.reply_to()?;
        let mut reply = Message::new(reply_to, body);
        if let Some(correlation_id) = self.correlation_id() {
            reply = reply.with_correlation_id(correlation_id);
        }
        Some(reply)
    }
}
