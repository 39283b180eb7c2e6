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

//! Exclusive device resources held while the application is in the
//! foreground: the audio output device and the wake lock.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The abstract contract for the audio output device.
///
/// Mixing and decoding happen elsewhere; the bridge only decides *when* the
/// device runs. Implementations may assume `start` and `stop` alternate: the
/// caller never starts a running device or stops a stopped one.
pub trait AudioDevice {
    /// Starts (or restarts) the audio stream.
    fn start(&mut self) -> Result<()>;

    /// Stops the audio stream, keeping the device ready for a later `start`.
    fn stop(&mut self) -> Result<()>;
}

/// The kinds of wake lock a host can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeLockType {
    /// Keep the screen on, possibly dimmed.
    #[default]
    ScreenDim,
    /// Keep the screen on at full brightness.
    ScreenBright,
    /// Keep the CPU running with the screen off.
    Partial,
}

impl WakeLockType {
    /// The tag the lock is registered under with the host.
    pub fn tag(self) -> &'static str {
        match self {
            Self::ScreenDim => "screen-dim-inhibit",
            Self::ScreenBright => "screen-bright-inhibit",
            Self::Partial => "cpu-partial",
        }
    }
}

impl fmt::Display for WakeLockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The host's power management service.
///
/// Each lock type is binary: it is either held or not. Callers pair every
/// request with exactly one release.
pub trait WakeLockProvider {
    /// Acquires the lock of the given type.
    fn request_wake_lock(&mut self, lock: WakeLockType) -> Result<()>;

    /// Releases a lock previously acquired with `request_wake_lock`.
    fn release_lock(&mut self, lock: WakeLockType) -> Result<()>;
}
