// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Collaborator registration and the startup report.
//!
//! Collaborators are the feature integrations (keyboard, HTTP, web view, ...)
//! that hook into the application when it is created. Each one is set up
//! exactly once, during `Create`. Setup is best-effort: every collaborator is
//! attempted even if an earlier one failed, and the outcomes are gathered in
//! a [`StartupReport`] so the host can decide whether a partial start is
//! acceptable.

use crate::capability::{CapabilityKey, CapabilityTable};
use crate::context::HostContext;
use crate::error::SetupError;
use std::sync::Arc;

/// How much the application depends on a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Criticality {
    /// The application cannot work correctly without it.
    Required,
    /// The feature it provides is simply unavailable if it fails.
    #[default]
    Optional,
}

/// What a collaborator gets to see during setup.
pub struct SetupContext<'a> {
    host: &'a HostContext,
    capabilities: &'a mut CapabilityTable,
}

impl<'a> SetupContext<'a> {
    /// Creates a setup context over the host context and the capability table
    /// owned by the application handle.
    pub fn new(host: &'a HostContext, capabilities: &'a mut CapabilityTable) -> Self {
        Self { host, capabilities }
    }

    /// The host context delivered with `Create`.
    pub fn host(&self) -> &HostContext {
        self.host
    }

    /// Registers a capability so it can later be found with `get_system`.
    pub fn register<T>(&mut self, key: CapabilityKey<T>, component: Arc<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.register(key, component)
    }

    /// Read access to what has been registered so far.
    pub fn capabilities(&self) -> &CapabilityTable {
        self.capabilities
    }
}

/// A feature integration set up once when the application is created.
pub trait Collaborator {
    /// A short name used in logs and in the startup report.
    fn name(&self) -> &str;

    /// Whether a failed setup should count as fatal in the report.
    fn criticality(&self) -> Criticality {
        Criticality::Optional
    }

    /// Hooks the collaborator into the application.
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), SetupError>;
}

/// The outcome of one collaborator's setup.
#[derive(Debug)]
pub struct SetupOutcome {
    /// The collaborator's name.
    pub name: String,
    /// The collaborator's declared criticality.
    pub criticality: Criticality,
    /// `Ok` if setup completed.
    pub result: Result<(), SetupError>,
}

impl SetupOutcome {
    /// Returns `true` if setup completed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// The aggregated outcome of every setup attempted during `Create`.
#[derive(Debug, Default)]
pub struct StartupReport {
    outcomes: Vec<SetupOutcome>,
}

impl StartupReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome, logging it if it failed.
    pub fn record(&mut self, outcome: SetupOutcome) {
        if let Err(e) = &outcome.result {
            match outcome.criticality {
                Criticality::Required => {
                    log::error!("Required collaborator '{}' failed: {e}", outcome.name)
                }
                Criticality::Optional => {
                    log::warn!("Optional collaborator '{}' failed: {e}", outcome.name)
                }
            }
        } else {
            log::debug!("Collaborator '{}' set up.", outcome.name);
        }
        self.outcomes.push(outcome);
    }

    /// Sets up every collaborator in order and records each outcome.
    ///
    /// A failure never stops the remaining collaborators from being attempted.
    pub fn setup_all(
        &mut self,
        collaborators: &mut [Box<dyn Collaborator>],
        ctx: &mut SetupContext<'_>,
    ) {
        for collaborator in collaborators.iter_mut() {
            let result = collaborator.setup(ctx);
            self.record(SetupOutcome {
                name: collaborator.name().to_string(),
                criticality: collaborator.criticality(),
                result,
            });
        }
    }

    /// All outcomes in the order they were attempted.
    pub fn outcomes(&self) -> &[SetupOutcome] {
        &self.outcomes
    }

    /// The outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &SetupOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// Returns `true` if any setup failed.
    pub fn is_degraded(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Returns `true` if a [`Criticality::Required`] setup failed.
    pub fn has_fatal_failure(&self) -> bool {
        self.failures().any(|o| o.criticality == Criticality::Required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{KeyboardCapability, KEYBOARD};

    struct Keyboard;

    impl KeyboardCapability for Keyboard {
        fn set_hardware_keyboard_open(&self) {}
        fn set_hardware_keyboard_closed(&self) {}
    }

    struct KeyboardCollaborator;

    impl Collaborator for KeyboardCollaborator {
        fn name(&self) -> &str {
            "keyboard"
        }
        fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), SetupError> {
            ctx.register(KEYBOARD, Arc::new(Keyboard) as Arc<dyn KeyboardCapability>);
            Ok(())
        }
    }

    struct Failing {
        name: &'static str,
        criticality: Criticality,
    }

    impl Collaborator for Failing {
        fn name(&self) -> &str {
            self.name
        }
        fn criticality(&self) -> Criticality {
            self.criticality
        }
        fn setup(&mut self, _: &mut SetupContext<'_>) -> Result<(), SetupError> {
            Err(SetupError::Unavailable("power-service".to_string()))
        }
    }

    #[test]
    fn test_failures_do_not_stop_later_collaborators() {
        let host = HostContext::new("test");
        let mut table = CapabilityTable::new();
        let mut collaborators: Vec<Box<dyn Collaborator>> = vec![
            Box::new(Failing {
                name: "wake-lock",
                criticality: Criticality::Optional,
            }),
            Box::new(KeyboardCollaborator),
        ];

        let mut report = StartupReport::new();
        report.setup_all(&mut collaborators, &mut SetupContext::new(&host, &mut table));

        assert_eq!(report.outcomes().len(), 2);
        assert!(report.is_degraded());
        assert!(!report.has_fatal_failure());
        assert!(table.get(KEYBOARD).is_some());
    }

    #[test]
    fn test_required_failure_is_fatal() {
        let host = HostContext::new("test");
        let mut table = CapabilityTable::new();
        let mut collaborators: Vec<Box<dyn Collaborator>> = vec![Box::new(Failing {
            name: "storage",
            criticality: Criticality::Required,
        })];

        let mut report = StartupReport::new();
        report.setup_all(&mut collaborators, &mut SetupContext::new(&host, &mut table));

        assert!(report.has_fatal_failure());
        let names: Vec<_> = report.failures().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["storage"]);
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = StartupReport::new();
        assert!(!report.is_degraded());
        assert!(!report.has_fatal_failure());
    }
}
