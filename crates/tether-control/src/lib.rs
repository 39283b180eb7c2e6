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

//! # Tether Control
//!
//! The lifecycle bridge between a host operating system and a native
//! application: a pure transition function, the render-thread task queue,
//! resource pairing and the [`LifecycleBridge`] that drives them all.

#![warn(missing_docs)]

pub mod application;
pub mod bridge;
pub mod config;
pub mod configuration;
pub mod dispatcher;
pub mod resource_guard;
pub mod state_machine;
pub mod surface;

pub use application::ApplicationHandle;
pub use bridge::{BridgeParts, LifecycleBridge};
pub use config::{BridgeConfig, ConfigError};
pub use configuration::{apply_configuration, KeyboardNotice};
pub use dispatcher::{task_queue, Task, TaskReceiver, TaskSender};
pub use resource_guard::{ResourceGuard, ResourceStats};
pub use state_machine::{step, Command, MachineState, Step, Transition};
pub use surface::{RenderLoopSettings, SurfaceRendererPair, MIN_FRAME_INTERVAL};
