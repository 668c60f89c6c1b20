//! `Mailbox[T]`: the one bounded-FIFO-channel primitive the rest of the
//! crate is built on.
//!
//! A mailbox has exactly one consumer. `send`/`try_send` never block the
//! producer's thread; `recv` suspends the consumer until an item is
//! available or the mailbox has been closed and fully drained. This module
//! is deliberately generic over `T` rather than constrained to a `Message`
//! trait — the same primitive backs the Reactor's job queue, the HTTP
//! server's `RequestMailbox`, and the event bus's ephemeral reply mailbox.
//!
//! # Example
//! ```rust
//! use reactant_rt::mailbox::channel;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, mut rx) = channel::<u32>(8);
//! tx.try_send(1).unwrap();
//! assert_eq!(rx.recv().await, Some(1));
//! # }
//! ```

pub mod bounded;
pub mod error;

pub use bounded::{channel, MailboxReceiver, MailboxSender};
pub use error::MailboxError;
