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

//! Contains the `SilentAudioDevice` struct.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tether_core::resource::AudioDevice;

/// An `AudioDevice` that produces no sound.
///
/// Used where no output device exists (headless hosts, tests) and the session
/// still needs something to start and stop.
#[derive(Debug, Default)]
pub struct SilentAudioDevice {
    running: Arc<AtomicBool>,
}

impl SilentAudioDevice {
    /// Creates a stopped device.
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag that mirrors whether the device is running, readable after the
    /// device has been handed to the bridge.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

impl AudioDevice for SilentAudioDevice {
    fn start(&mut self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        log::debug!("Silent audio started.");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        log::debug!("Silent audio stopped.");
        Ok(())
    }
}
