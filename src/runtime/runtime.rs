//! The Runtime: deploys components, assigns them reactors, and drives the
//! start/stop lifecycle for the whole process.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use futures::future::join_all;
use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

// Layer 3: Internal module imports
use super::component::Component;
use super::config::RuntimeConfig;
use super::context::ComponentContext;
use super::error::RuntimeError;
use crate::bus::EventBus;
use crate::message::Message;
use crate::reactor::{Reactor, ReactorConfig, ReactorRegistry};
use crate::util::DeploymentId;
use crate::worker_pool::WorkerPool;

/// Address the runtime publishes a zero-body message to once `start`
/// completes and every component's `on_start` has run.
pub const READINESS_ADDRESS: &str = "runtime.ready";

/// Lifecycle state of a [`Runtime`]. Monotonic: a `Stopped` runtime cannot
/// be restarted, a fresh `Runtime` must be built instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// Constructed, nothing running yet.
    Idle,
    /// `start` is in progress.
    Starting,
    /// All components and the worker pool are running.
    Started,
    /// `stop` is in progress.
    Stopping,
    /// Every component and the worker pool has been torn down.
    Stopped,
}

struct Deployment {
    id: DeploymentId,
    context: ComponentContext,
    component: Arc<AsyncMutex<dyn Component>>,
}

/// Deploys components, assigns each its own [`Reactor`], and orchestrates
/// start/stop across the whole set.
///
/// # Example
/// ```rust
/// use reactant_rt::runtime::{Component, Runtime, RuntimeConfig};
/// use std::time::Duration;
///
/// struct Noop;
/// impl Component for Noop {}
///
/// # #[tokio::main]
/// # async fn main() {
/// let runtime = Runtime::new(RuntimeConfig::default());
/// let _id = runtime.deploy("noop", Noop).await.unwrap();
/// runtime.start().await.unwrap();
/// runtime.stop(Duration::from_secs(5)).await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct Runtime {
    config: RuntimeConfig,
    state: Arc<RwLock<RuntimeState>>,
    bus: EventBus,
    reactors: ReactorRegistry,
    worker_pool: WorkerPool,
    deployments: Arc<DashMap<String, Deployment>>,
    by_id: Arc<DashMap<DeploymentId, String>>,
}

impl Runtime {
    /// Build a runtime from `config`. Nothing is running until [`Runtime::start`].
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            worker_pool: WorkerPool::new(config.worker_count(), config.worker_queue_capacity()),
            config,
            state: Arc::new(RwLock::new(RuntimeState::Idle)),
            bus: EventBus::new(),
            reactors: ReactorRegistry::new(),
            deployments: Arc::new(DashMap::new()),
            by_id: Arc::new(DashMap::new()),
        }
    }

    /// The event bus every deployed component shares.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RuntimeState {
        *self.state.read()
    }

    /// The worker pool backing offloaded blocking work.
    pub fn worker_pool(&self) -> &WorkerPool {
        &self.worker_pool
    }

    /// Register `component` under `name`: allocates a fresh reactor, wires
    /// up a [`ComponentContext`], and stores it. If the runtime is already
    /// `started`, the new component's `on_start` runs immediately on its
    /// new reactor. Deploys are accepted in any state except `stopping`/
    /// `stopped`.
    pub async fn deploy<C: Component>(&self, name: impl Into<String>, component: C) -> Result<DeploymentId, RuntimeError> {
        let name = name.into();
        let current_state = self.state();
        if matches!(current_state, RuntimeState::Stopping | RuntimeState::Stopped) {
            return Err(RuntimeError::ShuttingDown);
        }
        if self.deployments.contains_key(&name) {
            return Err(RuntimeError::DuplicateComponent(name));
        }

        let reactor_config = ReactorConfig::builder()
            .with_mailbox_capacity(self.config.default_mailbox_capacity())
            .build()
            .map_err(|_| RuntimeError::InvalidConfig("default_mailbox_capacity".into()))?;
        let reactor = Reactor::new(name.clone(), reactor_config);
        self.reactors.add(name.clone(), reactor.clone())?;

        let id = DeploymentId::new();
        let context = ComponentContext::new(name.clone(), id, reactor.clone());
        let component = Arc::new(AsyncMutex::new(component));

        self.deployments.insert(
            name.clone(),
            Deployment {
                id,
                context: context.clone(),
                component: component.clone(),
            },
        );
        self.by_id.insert(id, name.clone());

        if current_state == RuntimeState::Started {
            reactor.start().await;
            self.run_on_start(&name, &context, &component).await?;
        }

        Ok(id)
    }

    /// Idempotent transition `idle` -> `starting` -> `started`: starts the
    /// worker pool, starts every deployed reactor, runs every component's
    /// `on_start`, then publishes a zero-body readiness message to
    /// [`READINESS_ADDRESS`].
    pub async fn start(&self) -> Result<(), RuntimeError> {
        {
            let mut state = self.state.write();
            if *state != RuntimeState::Idle {
                return Ok(());
            }
            *state = RuntimeState::Starting;
        }

        self.worker_pool.start();

        for entry in self.deployments.iter() {
            entry.context.reactor().start().await;
        }

        let names: Vec<String> = self.deployments.iter().map(|e| e.key().clone()).collect();
        for name in names {
            let Some(entry) = self.deployments.get(&name) else { continue };
            let context = entry.context.clone();
            let component = entry.component.clone();
            drop(entry);
            self.run_on_start(&name, &context, &component).await?;
        }

        *self.state.write() = RuntimeState::Started;
        self.bus.publish(Message::new(READINESS_ADDRESS, bytes::Bytes::new())).await;
        info!(components = self.deployments.len(), "runtime started");
        Ok(())
    }

    /// Transition `started` -> `stopping` -> `stopped`: for every component,
    /// runs `on_stop` on its reactor and then stops that reactor, in
    /// parallel across components; then stops the worker pool. The whole
    /// operation is bounded by `timeout`.
    pub async fn stop(&self, timeout: Duration) -> Result<(), RuntimeError> {
        {
            let mut state = self.state.write();
            if matches!(*state, RuntimeState::Stopping | RuntimeState::Stopped) {
                return Ok(());
            }
            *state = RuntimeState::Stopping;
        }

        let deadline = tokio::time::Instant::now() + timeout;
        let entries: Vec<(String, ComponentContext, Arc<AsyncMutex<dyn Component>>)> = self
            .deployments
            .iter()
            .map(|e| (e.key().clone(), e.context.clone(), e.component.clone()))
            .collect();

        let shutdowns = entries.into_iter().map(|(name, context, component)| async move {
            let mut guard = component.lock().await;
            if let Err(err) = guard.on_stop(&context).await {
                warn!(component = %name, error = %err, "on_stop returned an error; continuing shutdown");
            }
            drop(guard);
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            context.reactor().stop(remaining).await
        });

        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        let result = tokio::time::timeout(remaining, join_all(shutdowns)).await;

        let worker_remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        let _ = self.worker_pool.stop(worker_remaining).await;

        *self.state.write() = RuntimeState::Stopped;

        match result {
            Ok(_) => {
                info!("runtime stopped");
                Ok(())
            }
            Err(_) => Err(RuntimeError::ShutdownTimeout(timeout)),
        }
    }

    /// Undeploy a single component: runs its `on_stop`, stops its reactor,
    /// and removes it from the registry. Analogous to `stop` but scoped to
    /// one component.
    pub async fn undeploy(&self, id: DeploymentId) -> Result<(), RuntimeError> {
        let Some((_, name)) = self.by_id.remove(&id) else {
            return Err(RuntimeError::ComponentNotFound(id.to_string()));
        };
        let Some((_, deployment)) = self.deployments.remove(&name) else {
            return Err(RuntimeError::ComponentNotFound(name));
        };

        let mut guard = deployment.component.lock().await;
        if let Err(err) = guard.on_stop(&deployment.context).await {
            warn!(component = %name, error = %err, "on_stop returned an error during undeploy");
        }
        drop(guard);

        let timeout = self.config.shutdown_timeout();
        deployment.context.reactor().stop(timeout).await?;
        self.reactors.remove(&name);
        Ok(())
    }

    /// Number of currently deployed components.
    pub fn component_count(&self) -> usize {
        self.deployments.len()
    }

    async fn run_on_start(
        &self,
        name: &str,
        context: &ComponentContext,
        component: &Arc<AsyncMutex<dyn Component>>,
    ) -> Result<(), RuntimeError> {
        let mut guard = component.lock().await;
        guard.on_start(context, &self.bus).await.map_err(|err| {
            warn!(component = %name, error = %err, "on_start failed");
            err
        })
    }
}
