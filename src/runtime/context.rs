// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use crate::reactor::Reactor;
use crate::util::DeploymentId;

/// Per-component handle passed to `on_start`/`on_stop`: the component's
/// name, its deployment id, the reactor it owns, and when it was deployed.
#[derive(Clone)]
pub struct ComponentContext {
    name: String,
    deployment_id: DeploymentId,
    reactor: Reactor,
    created_at: DateTime<Utc>,
}

impl ComponentContext {
    pub(crate) fn new(name: impl Into<String>, deployment_id: DeploymentId, reactor: Reactor) -> Self {
        Self {
            name: name.into(),
            deployment_id,
            reactor,
            created_at: Utc::now(),
        }
    }

    /// The component's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The id returned by the `Runtime::deploy` call that created this
    /// component.
    pub fn deployment_id(&self) -> DeploymentId {
        self.deployment_id
    }

    /// The reactor this component owns.
    pub fn reactor(&self) -> &Reactor {
        &self.reactor
    }

    /// When this component was deployed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
