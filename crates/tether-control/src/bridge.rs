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

//! The lifecycle bridge: the only component that commands the resources, the
//! render surface and the application.
//!
//! The host calls [`LifecycleBridge::handle`] from its callback thread for
//! every notification. The bridge asks the pure [`step`] function what the
//! event means in the current state, executes the resulting commands
//! synchronously, and hands anything that must run on the render thread to
//! the task queue. Nothing here blocks on render work except `Destroy`,
//! which waits for the render thread to finish its current frame.

use crate::application::ApplicationHandle;
use crate::config::BridgeConfig;
use crate::configuration::apply_configuration;
use crate::dispatcher::{task_queue, TaskReceiver, TaskSender};
use crate::resource_guard::{ResourceGuard, ResourceStats};
use crate::state_machine::{step, Command, MachineState, Transition};
use crate::surface::SurfaceRendererPair;
use std::sync::Arc;
use tether_core::application::{BackSignalHandler, IgnoreBackSignal, NativeApplication};
use tether_core::capability::CapabilityKey;
use tether_core::collaborator::{Collaborator, Criticality, SetupOutcome, StartupReport};
use tether_core::context::HostContext;
use tether_core::lifecycle::{LifecycleEvent, LifecycleState};
use tether_core::renderer::Renderer;
use tether_core::resource::{AudioDevice, WakeLockProvider};

/// The name a failed render thread spawn is recorded under in the
/// [`StartupReport`].
pub const SURFACE_OUTCOME: &str = "render-surface";

/// Everything the bridge needs, handed over before the first event.
pub struct BridgeParts {
    /// The native application, created on `Create`.
    pub application: Box<dyn NativeApplication>,
    /// The renderer, moved onto the render thread on `Create`.
    pub renderer: Box<dyn Renderer>,
    /// The audio output device.
    pub audio: Box<dyn AudioDevice>,
    /// The host's wake-lock service.
    pub wake_lock: Box<dyn WakeLockProvider>,
    /// Feature integrations set up on `Create`, in order.
    pub collaborators: Vec<Box<dyn Collaborator>>,
    /// Runs on the render thread for every back signal.
    pub back_handler: Arc<dyn BackSignalHandler>,
}

impl BridgeParts {
    /// Bundles the required parts, with no collaborators and a back handler
    /// that ignores the signal.
    pub fn new(
        application: Box<dyn NativeApplication>,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioDevice>,
        wake_lock: Box<dyn WakeLockProvider>,
    ) -> Self {
        Self {
            application,
            renderer,
            audio,
            wake_lock,
            collaborators: Vec::new(),
            back_handler: Arc::new(IgnoreBackSignal),
        }
    }

    /// Appends a collaborator. Setup runs in the order they were added.
    pub fn with_collaborator(mut self, collaborator: impl Collaborator + 'static) -> Self {
        self.collaborators.push(Box::new(collaborator));
        self
    }

    /// Replaces the back-signal handler.
    pub fn with_back_handler(mut self, handler: Arc<dyn BackSignalHandler>) -> Self {
        self.back_handler = handler;
        self
    }
}

/// Parts waiting for `Create`.
struct Pending {
    application: Box<dyn NativeApplication>,
    renderer: Box<dyn Renderer>,
    collaborators: Vec<Box<dyn Collaborator>>,
    tasks: TaskReceiver,
}

/// What exists between `Create` and `Destroy`.
struct Runtime {
    app: ApplicationHandle,
    surface: Option<SurfaceRendererPair>,
    collaborators: Vec<Box<dyn Collaborator>>,
}

/// Turns host lifecycle notifications into an ordered state machine.
pub struct LifecycleBridge {
    config: BridgeConfig,
    machine: MachineState,
    resources: ResourceGuard,
    tasks: TaskSender,
    back_handler: Arc<dyn BackSignalHandler>,
    pending: Option<Pending>,
    runtime: Option<Runtime>,
    startup: Option<StartupReport>,
}

impl LifecycleBridge {
    /// Creates a bridge in the `Uninitialized` state.
    pub fn new(config: BridgeConfig, parts: BridgeParts) -> Self {
        let (tasks, receiver) = task_queue();
        let resources = ResourceGuard::new(parts.audio, parts.wake_lock, config.wake_lock_type());
        Self {
            config,
            machine: MachineState::default(),
            resources,
            tasks,
            back_handler: parts.back_handler,
            pending: Some(Pending {
                application: parts.application,
                renderer: parts.renderer,
                collaborators: parts.collaborators,
                tasks: receiver,
            }),
            runtime: None,
            startup: None,
        }
    }

    /// Applies one host notification and returns what it did.
    ///
    /// Never fails: events with no meaning in the current state are ignored.
    pub fn handle(&mut self, event: LifecycleEvent) -> Transition {
        let kind = event.kind();
        let from = self.machine;
        let step = step(from, kind);

        if step.is_noop(from) {
            log::trace!("{kind:?} ignored in state {}.", from.lifecycle);
            return Transition {
                event: kind,
                from: from.lifecycle,
                to: from.lifecycle,
                commands: Vec::new(),
            };
        }

        for &command in &step.commands {
            self.execute(command, &event);
        }
        self.machine = step.next;
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.app.set_state(step.next.lifecycle);
        }

        log::debug!(
            "{kind:?}: {} -> {} {:?}",
            from.lifecycle,
            step.next.lifecycle,
            step.commands
        );
        Transition {
            event: kind,
            from: from.lifecycle,
            to: step.next.lifecycle,
            commands: step.commands,
        }
    }

    fn execute(&mut self, command: Command, event: &LifecycleEvent) {
        match command {
            Command::CreateRuntime => {
                if let LifecycleEvent::Create(host) = event {
                    self.create_runtime(host);
                }
            }
            Command::OpenSession => {
                self.resources.start_audio();
                if let Some(runtime) = self.runtime.as_mut() {
                    if let Some(surface) = &runtime.surface {
                        surface.on_resume();
                    }
                }
                self.resources.acquire_wake_lock();
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.app.resume();
                }
            }
            Command::CloseSession => {
                if let Some(surface) = self.runtime.as_ref().and_then(|r| r.surface.as_ref()) {
                    surface.on_pause();
                }
                if self.resources.is_audio_running() {
                    self.resources.stop_audio();
                }
                if self.resources.is_wake_lock_held() {
                    self.resources.release_wake_lock();
                }
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.app.suspend();
                }
            }
            Command::EnterForeground => {
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.app.foreground();
                }
            }
            Command::EnterBackground => {
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.app.background();
                }
            }
            Command::ObserveStop => log::debug!("Application stopped by the host."),
            Command::ForwardIntent => {
                if let (Some(runtime), LifecycleEvent::NewExternalRequest(request)) =
                    (self.runtime.as_mut(), event)
                {
                    runtime.app.activity_intent(request);
                }
            }
            Command::ForwardResult => {
                if let (Some(runtime), LifecycleEvent::SubTaskResult(result)) =
                    (self.runtime.as_mut(), event)
                {
                    runtime.app.activity_result(
                        result.request_code,
                        result.result_code,
                        result.data.as_ref(),
                    );
                }
            }
            Command::ApplyConfiguration => {
                if let (Some(runtime), LifecycleEvent::ConfigurationChanged(config)) =
                    (self.runtime.as_ref(), event)
                {
                    apply_configuration(&runtime.app, config);
                }
            }
            Command::QueueBackSignal => {
                // The handler body is the extension point; the default ignores it.
                let handler = Arc::clone(&self.back_handler);
                self.tasks.enqueue(move || handler.on_back_signal());
            }
            Command::ForwardMemoryWarning => {
                if let Some(runtime) = self.runtime.as_mut() {
                    runtime.app.memory_warning();
                }
            }
            Command::Teardown => self.teardown(),
        }
    }

    fn create_runtime(&mut self, host: &HostContext) {
        let Some(pending) = self.pending.take() else {
            log::error!("Create applied twice; the runtime already exists.");
            return;
        };
        let Pending {
            application,
            renderer,
            mut collaborators,
            tasks,
        } = pending;

        let mut report = StartupReport::new();
        let surface = match SurfaceRendererPair::spawn(renderer, tasks, self.config.render_loop())
        {
            Ok(surface) => Some(surface),
            Err(e) => {
                report.record(SetupOutcome {
                    name: SURFACE_OUTCOME.to_string(),
                    criticality: Criticality::Required,
                    result: Err(e.into()),
                });
                None
            }
        };

        let mut app = ApplicationHandle::create(application, host, &mut report);
        if let Some(request) = &host.launch_request {
            app.activity_intent(request);
        }
        app.setup_collaborators(&mut collaborators, host, &mut report);

        if report.is_degraded() {
            log::warn!(
                "Startup of '{}' finished degraded ({} failure(s)).",
                host.app_name,
                report.failures().count()
            );
        } else {
            log::info!("Startup of '{}' complete.", host.app_name);
        }

        self.runtime = Some(Runtime {
            app,
            surface,
            collaborators,
        });
        self.startup = Some(report);
    }

    fn teardown(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let Runtime {
                app,
                surface,
                collaborators,
            } = runtime;
            app.destroy();
            if let Some(mut surface) = surface {
                surface.destroy();
            }
            drop(collaborators);
        }
        self.resources.release_all();
        log::info!("Teardown complete.");
    }

    /// Queues `task` for the render thread. Returns immediately.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.enqueue(task);
    }

    /// Number of tasks waiting for the render thread.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.machine.lifecycle
    }

    /// Returns `true` while a foreground session is open.
    pub fn is_session_open(&self) -> bool {
        self.machine.session_open
    }

    /// The application handle, between `Create` and `Destroy`.
    pub fn application(&self) -> Option<&ApplicationHandle> {
        self.runtime.as_ref().map(|r| &r.app)
    }

    /// Looks up a registered capability. `None` before `Create`, after
    /// `Destroy`, or when nothing was registered under `key`.
    pub fn get_system<T>(&self, key: CapabilityKey<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.application()?.get_system(key)
    }

    /// The report produced by `Create`, once it has been applied.
    pub fn startup_report(&self) -> Option<&StartupReport> {
        self.startup.as_ref()
    }

    /// Resource operation counters.
    pub fn resource_stats(&self) -> ResourceStats {
        self.resources.stats()
    }

    /// Returns `true` while the render surface is producing frames.
    pub fn is_surface_active(&self) -> bool {
        self.runtime
            .as_ref()
            .and_then(|r| r.surface.as_ref())
            .is_some_and(SurfaceRendererPair::is_active)
    }

    /// Frames rendered so far, or 0 when there is no surface.
    pub fn frames_rendered(&self) -> u64 {
        self.runtime
            .as_ref()
            .and_then(|r| r.surface.as_ref())
            .map_or(0, SurfaceRendererPair::frames_rendered)
    }

    /// The configuration the bridge was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl Drop for LifecycleBridge {
    fn drop(&mut self) {
        if self.machine.lifecycle.is_live() {
            log::warn!("LifecycleBridge dropped without Destroy; tearing down.");
            self.handle(LifecycleEvent::Destroy);
        }
    }
}
