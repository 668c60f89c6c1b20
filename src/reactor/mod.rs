//! The Reactor: a single-consumer bounded mailbox of jobs, drained
//! serially, with non-blocking submission and panic isolation.
//!
//! ```rust
//! use reactant_rt::reactor::{Reactor, ReactorConfig};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let reactor = Reactor::new("greeter", ReactorConfig::default());
//! reactor.start().await;
//! reactor.submit(async { println!("hello from the reactor") }).unwrap();
//! reactor.stop(Duration::from_secs(1)).await.unwrap();
//! # }
//! ```

pub mod config;
pub mod error;
#[allow(clippy::module_inception)]
pub mod reactor;
pub mod registry;

pub use config::ReactorConfig;
pub use error::ReactorError;
pub use reactor::{Job, Reactor, ReactorState};
pub use registry::ReactorRegistry;
