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

//! Payloads carried by host notifications.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request delivered to the application by the host or another component
/// (a launch request, a deep link, a share target, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalRequest {
    /// The action the sender asked for, e.g. `"view"`.
    pub action: Option<String>,
    /// The URI the request refers to, if any.
    pub data: Option<String>,
    /// Free-form key/value extras.
    pub extras: BTreeMap<String, String>,
}

impl ExternalRequest {
    /// Creates a request with the given action and no data.
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Default::default()
        }
    }

    /// Attaches a data URI to the request.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Adds an extra.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// The result of a sub-task the application started earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityResult {
    /// The code the application used when it started the sub-task.
    pub request_code: i32,
    /// The code the sub-task finished with.
    pub result_code: i32,
    /// Any data the sub-task returned.
    #[serde(default)]
    pub data: Option<ExternalRequest>,
}

/// Presence of a hardware keyboard as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardKeyboard {
    /// The host did not report the field.
    #[default]
    Undefined,
    /// A hardware keyboard is available (not hidden).
    Visible,
    /// The hardware keyboard is hidden or detached.
    Hidden,
}

/// Screen orientation as reported by the host. Carried for completeness;
/// the bridge itself only inspects [`HardKeyboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// The host did not report the field.
    #[default]
    Undefined,
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
}

/// A device configuration snapshot delivered on configuration changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationDescriptor {
    /// Hardware keyboard presence.
    pub hard_keyboard: HardKeyboard,
    /// Screen orientation.
    pub orientation: Orientation,
}

impl ConfigurationDescriptor {
    /// A descriptor with only the keyboard field set.
    pub fn with_keyboard(hard_keyboard: HardKeyboard) -> Self {
        Self {
            hard_keyboard,
            ..Default::default()
        }
    }
}
