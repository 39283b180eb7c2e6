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

use anyhow::{bail, Result};
use std::collections::HashSet;
use tether_core::resource::{WakeLockProvider, WakeLockType};

/// A `WakeLockProvider` for hosts without a power service.
///
/// Tracks which locks are held and logs every change. Requesting a lock that
/// is already held, or releasing one that is not, is an error.
#[derive(Debug, Default)]
pub struct LoggingWakeLock {
    held: HashSet<WakeLockType>,
}

impl LoggingWakeLock {
    /// Creates a provider holding no locks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `kind` is currently held.
    pub fn is_held(&self, kind: WakeLockType) -> bool {
        self.held.contains(&kind)
    }
}

impl WakeLockProvider for LoggingWakeLock {
    fn request_wake_lock(&mut self, kind: WakeLockType) -> Result<()> {
        if !self.held.insert(kind) {
            bail!("wake lock '{}' is already held", kind.tag());
        }
        log::info!("Wake lock '{}' acquired.", kind.tag());
        Ok(())
    }

    fn release_lock(&mut self, kind: WakeLockType) -> Result<()> {
        if !self.held.remove(&kind) {
            bail!("wake lock '{}' is not held", kind.tag());
        }
        log::info!("Wake lock '{}' released.", kind.tag());
        Ok(())
    }
}
