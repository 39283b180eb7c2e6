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

//! The application handle: the one owner of the native application.
//!
//! An [`ApplicationHandle`] is built exactly once, by the bridge, while it
//! applies `Create`, and consumed by [`destroy`](ApplicationHandle::destroy)
//! while it applies `Destroy`. It is handed by reference to whatever needs
//! it; there is no global lookup.

use std::sync::Arc;
use tether_core::application::NativeApplication;
use tether_core::capability::{CapabilityId, CapabilityKey, CapabilityTable};
use tether_core::collaborator::{
    Collaborator, Criticality, SetupContext, SetupOutcome, StartupReport,
};
use tether_core::context::HostContext;
use tether_core::lifecycle::LifecycleState;
use tether_core::request::ExternalRequest;

/// The name the application's own creation is recorded under in the
/// [`StartupReport`].
pub const APPLICATION_OUTCOME: &str = "application";

/// Owns the native application and its capability table.
pub struct ApplicationHandle {
    app: Box<dyn NativeApplication>,
    capabilities: CapabilityTable,
    state: LifecycleState,
}

impl ApplicationHandle {
    /// Builds the handle and calls the application's `create`.
    ///
    /// The outcome of `create` is recorded in `report` as a required setup.
    pub fn create(
        mut app: Box<dyn NativeApplication>,
        host: &HostContext,
        report: &mut StartupReport,
    ) -> Self {
        log::info!("Creating application '{}'...", host.app_name);
        let mut capabilities = CapabilityTable::new();
        let result = app.create(&mut SetupContext::new(host, &mut capabilities));
        report.record(SetupOutcome {
            name: APPLICATION_OUTCOME.to_string(),
            criticality: Criticality::Required,
            result,
        });
        Self {
            app,
            capabilities,
            state: LifecycleState::Created,
        }
    }

    /// Sets up every collaborator against this handle's capability table.
    pub fn setup_collaborators(
        &mut self,
        collaborators: &mut [Box<dyn Collaborator>],
        host: &HostContext,
        report: &mut StartupReport,
    ) {
        let mut ctx = SetupContext::new(host, &mut self.capabilities);
        report.setup_all(collaborators, &mut ctx);
    }

    /// A foreground session begins.
    pub fn resume(&mut self) {
        self.app.resume();
    }

    /// The current foreground session ends.
    pub fn suspend(&mut self) {
        self.app.suspend();
    }

    /// The application became visible and focused.
    pub fn foreground(&mut self) {
        self.app.foreground();
    }

    /// The application stopped being visible and focused.
    pub fn background(&mut self) {
        self.app.background();
    }

    /// Forwards an external request.
    pub fn activity_intent(&mut self, request: &ExternalRequest) {
        self.app.activity_intent(request);
    }

    /// Forwards the result of a sub-task.
    pub fn activity_result(
        &mut self,
        request_code: i32,
        result_code: i32,
        data: Option<&ExternalRequest>,
    ) {
        self.app.activity_result(request_code, result_code, data);
    }

    /// Forwards a low-memory notification.
    pub fn memory_warning(&mut self) {
        self.app.memory_warning();
    }

    /// Destroys the application. The handle cannot be used afterwards.
    pub fn destroy(mut self) {
        log::info!("Destroying application...");
        self.app.destroy();
    }

    /// Looks up a registered capability.
    ///
    /// `None` means the feature is unavailable; it is never an error.
    pub fn get_system<T>(&self, key: CapabilityKey<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.get(key)
    }

    /// Returns `true` if something is registered under `id`.
    pub fn has_system(&self, id: CapabilityId) -> bool {
        self.capabilities.contains(id)
    }

    /// The full capability table.
    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// The lifecycle state last applied by the bridge.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }
}
