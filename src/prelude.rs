//! Convenient glob-import of the crate's most commonly used types.
//!
//! ```rust
//! use reactant_rt::prelude::*;
//! ```

// Reactor
pub use crate::reactor::{Reactor, ReactorConfig, ReactorError, ReactorRegistry, ReactorState};

// Event bus
pub use crate::bus::{BusError, EventBus, Subscription};

// Runtime
pub use crate::runtime::{Component, ComponentContext, Runtime, RuntimeConfig, RuntimeError, RuntimeState};

// Worker pool
pub use crate::worker_pool::WorkerPool;

// HTTP
pub use crate::http::{HttpConfig, HttpError, HttpResponse, HttpServer, RequestContext, Router};

// Messaging
pub use crate::message::{Message, MessageError};

// Mailbox
pub use crate::mailbox::{channel, MailboxError, MailboxReceiver, MailboxSender};

// Utilities
pub use crate::util::{new_reply_address, DeploymentId, OpaqueId, RequestId};
