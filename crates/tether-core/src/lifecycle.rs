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

//! Lifecycle vocabulary: the states the bridge can be in and the host
//! notifications that move it between them.

use crate::context::HostContext;
use crate::request::{ActivityResult, ConfigurationDescriptor, ExternalRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of the native application as seen by the bridge.
///
/// Exactly one state is current at any instant. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// No application handle exists yet.
    #[default]
    Uninitialized,
    /// The handle, surface and collaborators exist but nothing is visible.
    Created,
    /// The application is visible and interactive.
    Foreground,
    /// The application is partially or fully hidden.
    Background,
    /// Reserved for hosts that distinguish a frozen process. No transition of
    /// the current table produces it, but it is treated as a live state.
    Suspended,
    /// The application has been torn down. No further transition is valid.
    Destroyed,
}

impl LifecycleState {
    /// Returns `true` while an application handle exists.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            Self::Created | Self::Foreground | Self::Background | Self::Suspended
        )
    }

    /// Returns `true` once the state can no longer change.
    pub fn is_terminal(self) -> bool {
        self == Self::Destroyed
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A payload-free discriminant of [`LifecycleEvent`].
///
/// The transition function only needs to know *which* event arrived; the
/// payload is consumed by whoever executes the resulting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`LifecycleEvent::Create`].
    Create,
    /// See [`LifecycleEvent::Resume`].
    Resume,
    /// [`LifecycleEvent::FocusChanged`] with focus gained.
    FocusGained,
    /// [`LifecycleEvent::FocusChanged`] with focus lost.
    FocusLost,
    /// See [`LifecycleEvent::Pause`].
    Pause,
    /// See [`LifecycleEvent::Stop`].
    Stop,
    /// See [`LifecycleEvent::Destroy`].
    Destroy,
    /// See [`LifecycleEvent::NewExternalRequest`].
    ExternalRequest,
    /// See [`LifecycleEvent::SubTaskResult`].
    SubTaskResult,
    /// See [`LifecycleEvent::ConfigurationChanged`].
    ConfigurationChanged,
    /// See [`LifecycleEvent::BackPressed`].
    BackPressed,
    /// See [`LifecycleEvent::LowMemory`].
    LowMemory,
}

impl EventKind {
    /// Every kind, in declaration order. Handy for exhaustive table checks.
    pub const ALL: [EventKind; 12] = [
        EventKind::Create,
        EventKind::Resume,
        EventKind::FocusGained,
        EventKind::FocusLost,
        EventKind::Pause,
        EventKind::Stop,
        EventKind::Destroy,
        EventKind::ExternalRequest,
        EventKind::SubTaskResult,
        EventKind::ConfigurationChanged,
        EventKind::BackPressed,
        EventKind::LowMemory,
    ];
}

/// A lifecycle notification delivered by the host on its callback thread.
///
/// The host guarantees these arrive serially. The serde representation is
/// internally tagged (`{"event": "resume"}`) so event scripts stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The application process was launched.
    Create(HostContext),
    /// The application became visible.
    Resume,
    /// The window gained or lost input focus. Its order relative to
    /// `Resume`/`Pause` is not defined by the host.
    FocusChanged {
        /// Whether the window now has focus.
        has_focus: bool,
    },
    /// The application is no longer wholly visible.
    Pause,
    /// The application is no longer visible at all.
    Stop,
    /// The application is being torn down.
    Destroy,
    /// Another component delivered a new request to the running application.
    NewExternalRequest(ExternalRequest),
    /// A sub-task started by the application returned.
    SubTaskResult(ActivityResult),
    /// The device configuration changed (keyboard, orientation, ...).
    ConfigurationChanged(ConfigurationDescriptor),
    /// The hardware back signal fired.
    BackPressed,
    /// The host asked the process to shed memory.
    LowMemory,
}

impl LifecycleEvent {
    /// Returns the payload-free kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Create(_) => EventKind::Create,
            Self::Resume => EventKind::Resume,
            Self::FocusChanged { has_focus: true } => EventKind::FocusGained,
            Self::FocusChanged { has_focus: false } => EventKind::FocusLost,
            Self::Pause => EventKind::Pause,
            Self::Stop => EventKind::Stop,
            Self::Destroy => EventKind::Destroy,
            Self::NewExternalRequest(_) => EventKind::ExternalRequest,
            Self::SubTaskResult(_) => EventKind::SubTaskResult,
            Self::ConfigurationChanged(_) => EventKind::ConfigurationChanged,
            Self::BackPressed => EventKind::BackPressed,
            Self::LowMemory => EventKind::LowMemory,
        }
    }
}
