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

//! Host-provided context handed to the application at creation.

use crate::request::ExternalRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the host knows about the process when it delivers `Create`.
///
/// This is passed by reference to the native application and to every
/// collaborator's setup. It is not a global: whoever needs it is handed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    /// Human readable application name, used in logs.
    pub app_name: String,
    /// The request that launched the process, if any.
    #[serde(default)]
    pub launch_request: Option<ExternalRequest>,
    /// A writable directory private to the application.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl HostContext {
    /// Creates a context with only the application name set.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    /// Sets the launching request.
    pub fn with_launch_request(mut self, request: ExternalRequest) -> Self {
        self.launch_request = Some(request);
        self
    }

    /// Sets the private data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}
