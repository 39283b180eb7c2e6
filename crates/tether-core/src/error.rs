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

//! Error types shared across the bridge.

use thiserror::Error;

/// Why a collaborator's setup did not complete.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A host service the collaborator depends on is missing.
    #[error("host service '{0}' is unavailable")]
    Unavailable(String),
    /// The collaborator refused to start with the given context.
    #[error("setup rejected: {0}")]
    Rejected(String),
    /// An I/O failure, e.g. the render thread could not be spawned.
    #[error("i/o failure during setup: {0}")]
    Io(#[from] std::io::Error),
    /// Any other failure reported by the collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
