//! # reactant-rt — a reactive application runtime
//!
//! A small "verticle"-flavored runtime: deployable [`Component`]s talk to
//! each other exclusively through an address-keyed [`EventBus`], each bound
//! to its own single-threaded [`Reactor`], fronted by a backpressure-aware
//! HTTP intake path.
//!
//! # Quick start
//!
//! ```rust
//! use async_trait::async_trait;
//! use reactant_rt::prelude::*;
//! use std::time::Duration;
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Component for Greeter {
//!     async fn on_start(&mut self, ctx: &ComponentContext, bus: &EventBus) -> Result<(), RuntimeError> {
//!         let reactor = ctx.reactor().clone();
//!         bus.subscribe(
//!             "/greet",
//!             ctx.name(),
//!             reactor,
//!             std::sync::Arc::new(|msg: Message| {
//!                 Box::pin(async move {
//!                     if let Some(reply) = msg.reply_with(bytes::Bytes::from_static(b"hello")) {
//!                         let _ = reply;
//!                     }
//!                 })
//!             }),
//!         );
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let runtime = Runtime::new(RuntimeConfig::default());
//! runtime.deploy("greeter", Greeter).await.unwrap();
//! runtime.start().await.unwrap();
//! runtime.stop(Duration::from_secs(5)).await.unwrap();
//! # }
//! ```
//!
//! # Module organization
//!
//! - [`reactor`] — the single-consumer bounded-mailbox executor each
//!   component owns.
//! - [`bus`] — `publish`/`send`/`request` routing onto component reactors.
//! - [`runtime`] — deploy/start/stop/undeploy lifecycle management.
//! - [`worker_pool`] — fixed-size offload pool for blocking/CPU-bound work.
//! - [`http`] — the backpressure-aware HTTP admission path and router.
//! - [`mailbox`] — the generic bounded-channel primitive the above are
//!   built on.
//! - [`message`] — the bus's wire type.
//! - [`util`] — small shared building blocks (opaque ids, serde helpers).
//!
//! # Standards followed throughout
//!
//! - 3-layer import organization (std → third-party → internal) in every
//!   module.
//! - `chrono::DateTime<Utc>` for every timestamp; `Uuid` v4 wrapped in
//!   [`util::OpaqueId`] for every internally generated opaque identifier
//!   ([`util::RequestId`] is the one exception, since it may carry a
//!   caller-supplied, non-UUID `X-Request-ID` value verbatim).
//! - One `thiserror`-derived error enum per subsystem; no `anyhow` or
//!   `Box<dyn Error>` in a public library contract.
//! - `tracing` for structured logging; no interpolated user payload bodies
//!   above `trace`.

pub mod bus;
pub mod http;
pub mod mailbox;
pub mod message;
pub mod prelude;
pub mod reactor;
pub mod runtime;
pub mod util;
pub mod worker_pool;

pub use bus::{BusError, EventBus};
pub use http::{HttpConfig, HttpError, HttpServer, Router};
pub use mailbox::{channel, MailboxError, MailboxReceiver, MailboxSender};
pub use message::{Message, MessageError};
pub use reactor::{Reactor, ReactorConfig, ReactorError, ReactorRegistry};
pub use runtime::{Component, ComponentContext, Runtime, RuntimeConfig, RuntimeError, RuntimeState};
pub use worker_pool::WorkerPool;
