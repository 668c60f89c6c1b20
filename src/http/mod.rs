//! The HTTP intake path: accept → admission (backpressure + bounded queue)
//! → worker → router dispatch → handler, fronting the Reactor/Bus/Runtime
//! core with explicit, observable backpressure.

pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod response;
pub mod router;
#[allow(clippy::module_inception)]
pub mod server;

pub use config::{HttpConfig, HttpConfigBuilder};
pub use context::RequestContext;
pub use error::HttpError;
pub use metrics::{BackpressureController, CapacitySlot, MetricsSnapshot};
pub use response::HttpResponse;
pub use router::{Handler, HandlerFuture, Middleware, Router};
pub use server::HttpServer;
