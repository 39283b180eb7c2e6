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

//! The native application behind the bridge.
//!
//! [`NativeApplication`] is what the lifecycle bridge forwards host
//! notifications to. Most applications are built from an ordered list of
//! [`AppSystem`]s, which [`SystemsApplication`] fans notifications out to:
//! systems are brought up in registration order and wound down in reverse.

use crate::collaborator::SetupContext;
use crate::error::SetupError;
use crate::request::ExternalRequest;

/// The long-lived native runtime driven by the lifecycle bridge.
///
/// Every method is called on the host callback thread and must return
/// quickly. Work that needs the render thread goes through the task queue.
pub trait NativeApplication {
    /// Called once, right after the application handle is constructed.
    fn create(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), SetupError>;

    /// A foreground session begins.
    fn resume(&mut self) {}

    /// The current foreground session ends.
    fn suspend(&mut self) {}

    /// The application became the visible, focused one.
    fn foreground(&mut self) {}

    /// The application stopped being the visible, focused one.
    fn background(&mut self) {}

    /// Final notification. Nothing is called afterwards.
    fn destroy(&mut self) {}

    /// A new external request arrived (including the launch request).
    fn activity_intent(&mut self, _request: &ExternalRequest) {}

    /// A sub-task started by the application returned.
    fn activity_result(
        &mut self,
        _request_code: i32,
        _result_code: i32,
        _data: Option<&ExternalRequest>,
    ) {
    }

    /// The host is low on memory; caches should be dropped.
    fn memory_warning(&mut self) {}
}

/// A subsystem of a [`SystemsApplication`].
pub trait AppSystem {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Called once when the application is created.
    fn on_init(&mut self, _ctx: &mut SetupContext<'_>) {}
    /// See [`NativeApplication::resume`].
    fn on_resume(&mut self) {}
    /// See [`NativeApplication::foreground`].
    fn on_foreground(&mut self) {}
    /// See [`NativeApplication::background`].
    fn on_background(&mut self) {}
    /// See [`NativeApplication::suspend`].
    fn on_suspend(&mut self) {}
    /// See [`NativeApplication::destroy`].
    fn on_destroy(&mut self) {}
    /// See [`NativeApplication::memory_warning`].
    fn on_memory_warning(&mut self) {}
    /// See [`NativeApplication::activity_intent`].
    fn on_activity_intent(&mut self, _request: &ExternalRequest) {}
    /// See [`NativeApplication::activity_result`].
    fn on_activity_result(
        &mut self,
        _request_code: i32,
        _result_code: i32,
        _data: Option<&ExternalRequest>,
    ) {
    }
}

/// A [`NativeApplication`] made of ordered [`AppSystem`]s.
#[derive(Default)]
pub struct SystemsApplication {
    systems: Vec<Box<dyn AppSystem>>,
}

impl SystemsApplication {
    /// Creates an application with no systems.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a system. Registration order is the bring-up order.
    pub fn with_system(mut self, system: impl AppSystem + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Appends an already boxed system.
    pub fn add_system(&mut self, system: Box<dyn AppSystem>) {
        self.systems.push(system);
    }

    /// Returns the number of systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if there are no systems.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl NativeApplication for SystemsApplication {
    fn create(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), SetupError> {
        log::info!(
            "Initialising {} application systems for '{}'.",
            self.systems.len(),
            ctx.host().app_name
        );
        for system in &mut self.systems {
            system.on_init(ctx);
        }
        Ok(())
    }

    fn resume(&mut self) {
        log::debug!("App resuming...");
        for system in &mut self.systems {
            system.on_resume();
        }
    }

    fn foreground(&mut self) {
        for system in &mut self.systems {
            system.on_foreground();
        }
    }

    fn background(&mut self) {
        for system in &mut self.systems {
            system.on_background();
        }
    }

    fn suspend(&mut self) {
        log::debug!("App suspending...");
        for system in self.systems.iter_mut().rev() {
            system.on_suspend();
        }
    }

    fn destroy(&mut self) {
        for system in self.systems.iter_mut().rev() {
            system.on_destroy();
        }
        self.systems.clear();
    }

    fn activity_intent(&mut self, request: &ExternalRequest) {
        for system in &mut self.systems {
            system.on_activity_intent(request);
        }
    }

    fn activity_result(
        &mut self,
        request_code: i32,
        result_code: i32,
        data: Option<&ExternalRequest>,
    ) {
        for system in &mut self.systems {
            system.on_activity_result(request_code, result_code, data);
        }
    }

    fn memory_warning(&mut self) {
        log::debug!("Memory warning. Notifying application systems...");
        for system in &mut self.systems {
            system.on_memory_warning();
        }
    }
}

/// Handles the hardware back signal on the render thread.
///
/// This is the extension point for back navigation. The bridge queues a task
/// that calls [`on_back_signal`](Self::on_back_signal) on the render thread
/// every time the signal fires.
pub trait BackSignalHandler: Send + Sync {
    /// Called on the render thread for each back signal.
    fn on_back_signal(&self);
}

/// The default [`BackSignalHandler`]: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreBackSignal;

impl BackSignalHandler for IgnoreBackSignal {
    fn on_back_signal(&self) {}
}
