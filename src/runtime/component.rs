// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::context::ComponentContext;
use super::error::RuntimeError;
use crate::bus::EventBus;

/// A deployable unit. Each component owns exactly one reactor and talks to
/// the rest of the system only through the [`EventBus`] it's handed.
///
/// `on_start` runs on the component's own reactor before any user message
/// is delivered to it; `on_stop` runs after the last in-flight message has
/// been processed and before the reactor is torn down.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use reactant_rt::bus::EventBus;
/// use reactant_rt::runtime::{Component, ComponentContext, RuntimeError};
///
/// struct Greeter;
///
/// #[async_trait]
/// impl Component for Greeter {
///     async fn on_start(&mut self, ctx: &ComponentContext, bus: &EventBus) -> Result<(), RuntimeError> {
///         let ctx = ctx.clone();
///         let _subscription = bus.subscribe(
///             "/greet",
///             ctx.name(),
///             ctx.reactor().clone(),
///             std::sync::Arc::new(|_msg| Box::pin(async {})),
///         );
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Runs once, on this component's reactor, before the component
    /// receives any bus deliveries. Typically used to `subscribe` to the
    /// addresses this component handles.
    async fn on_start(&mut self, _ctx: &ComponentContext, _bus: &EventBus) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Runs once, on this component's reactor, after its last in-flight
    /// message has been processed and before the reactor is destroyed.
    async fn on_stop(&mut self, _ctx: &ComponentContext) -> Result<(), RuntimeError> {
        Ok(())
    }
}
