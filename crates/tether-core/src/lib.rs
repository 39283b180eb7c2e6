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

//! # Tether Core
//!
//! Foundational crate containing the lifecycle vocabulary, collaborator and
//! capability contracts, and resource traits shared by the lifecycle bridge
//! and its host-specific implementations.

#![warn(missing_docs)]

pub mod application;
pub mod capability;
pub mod collaborator;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod renderer;
pub mod request;
pub mod resource;

pub use application::{
    AppSystem, BackSignalHandler, IgnoreBackSignal, NativeApplication, SystemsApplication,
};
pub use capability::{CapabilityId, CapabilityKey, CapabilityTable, KeyboardCapability, KEYBOARD};
pub use collaborator::{Collaborator, Criticality, SetupContext, SetupOutcome, StartupReport};
pub use context::HostContext;
pub use error::SetupError;
pub use lifecycle::{EventKind, LifecycleEvent, LifecycleState};
pub use renderer::{FrameInfo, Renderer};
pub use request::{
    ActivityResult, ConfigurationDescriptor, ExternalRequest, HardKeyboard, Orientation,
};
pub use resource::{AudioDevice, WakeLockProvider, WakeLockType};
