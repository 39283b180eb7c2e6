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

//! Bridge configuration.

use crate::surface::RenderLoopSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tether_core::resource::WakeLockType;
use thiserror::Error;

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The contents are not a valid configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the bridge cannot run with.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Configuration of a [`LifecycleBridge`](crate::LifecycleBridge).
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Target time between frames while the surface is active.
    pub frame_interval_ms: u64,
    /// The wake lock held during a foreground session.
    pub wake_lock: WakeLockType,
    /// When `false`, no wake lock is requested at all.
    pub keep_screen_on: bool,
    /// Name of the render thread.
    pub render_thread_name: String,
    /// Default log filter for binaries that initialise a logger.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            wake_lock: WakeLockType::ScreenDim,
            keep_screen_on: true,
            render_thread_name: "tether-render".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot rule out on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_interval_ms",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The wake lock to hold, if any.
    pub fn wake_lock_type(&self) -> Option<WakeLockType> {
        self.keep_screen_on.then_some(self.wake_lock)
    }

    /// Render loop settings derived from this configuration.
    pub fn render_loop(&self) -> RenderLoopSettings {
        RenderLoopSettings {
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            thread_name: self.render_thread_name.clone(),
        }
    }
}
