// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Opaque UUID-backed identifier.
///
/// Callers must treat the rendered form (via `Display`) as opaque; the only
/// supported operations are generation, equality, and printing. Used for
/// deployment ids, request ids, and as the suffix of generated reply
/// addresses (`reply.<opaque-uuid>`).
///
/// # Example
/// ```rust
/// use reactant_rt::util::OpaqueId;
///
/// let a = OpaqueId::new();
/// let b = OpaqueId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpaqueId(Uuid);

impl OpaqueId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OpaqueId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of a single `Runtime::deploy` call, returned to the caller so it can
/// later `undeploy` the same component.
pub type DeploymentId = OpaqueId;

/// Id of an in-flight HTTP request.
///
/// Unlike [`OpaqueId`], this isn't UUID-only: a client may supply an
/// arbitrary `X-Request-ID` header value, which must be echoed back
/// verbatim rather than coerced into a UUID. A UUID is only generated when
/// the header is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh id, used when no `X-Request-ID` header is present.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a caller-supplied id verbatim, e.g. an `X-Request-ID` header
    /// value that may or may not be a UUID.
    pub fn from_header_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the reply address for an `EventBus::request` call: `reply.<uuid>`.
///
/// Reply addresses are opaque and single-use; nothing in the core ever
/// reuses one once its `request` call has returned.
pub fn new_reply_address() -> String {
    format!("reply.{}", Uuid::new_v4())
}
