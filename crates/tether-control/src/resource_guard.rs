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

//! Pairing of the exclusive foreground resources.
//!
//! The [`ResourceGuard`] owns the audio device and the wake-lock provider and
//! remembers whether each is currently held. Starting a running device or
//! releasing a lock that is not held is refused before it reaches the device,
//! so every start has exactly one stop and every acquire exactly one release.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tether_core::resource::{AudioDevice, WakeLockProvider, WakeLockType};

/// Resource operation counters.
///
/// A start or acquire counts once it succeeded. A stop or release counts as
/// soon as it is issued for a held resource, since the guard treats the
/// resource as released either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Successful `AudioDevice::start` calls.
    pub audio_starts: u32,
    /// `AudioDevice::stop` calls issued for a running device.
    pub audio_stops: u32,
    /// Successful wake-lock acquisitions.
    pub wake_acquires: u32,
    /// Releases issued for a held wake lock.
    pub wake_releases: u32,
    /// Device or provider calls that returned an error.
    pub device_failures: u32,
}

impl ResourceStats {
    /// Returns `true` if every start has a stop and every acquire a release.
    pub fn is_balanced(&self) -> bool {
        self.audio_starts == self.audio_stops && self.wake_acquires == self.wake_releases
    }
}

/// Owns the audio device and the wake lock and keeps their use paired.
pub struct ResourceGuard {
    audio: Box<dyn AudioDevice>,
    power: Box<dyn WakeLockProvider>,
    lock_type: Option<WakeLockType>,
    audio_running: bool,
    wake_lock_held: Arc<AtomicBool>,
    stats: ResourceStats,
}

impl ResourceGuard {
    /// Creates a guard. With `lock_type` set to `None` no wake lock is ever
    /// requested.
    pub fn new(
        audio: Box<dyn AudioDevice>,
        power: Box<dyn WakeLockProvider>,
        lock_type: Option<WakeLockType>,
    ) -> Self {
        Self {
            audio,
            power,
            lock_type,
            audio_running: false,
            wake_lock_held: Arc::new(AtomicBool::new(false)),
            stats: ResourceStats::default(),
        }
    }

    /// Starts the audio device unless it is already running.
    pub fn start_audio(&mut self) {
        if self.audio_running {
            log::warn!("Audio device already running; refusing a second start.");
            return;
        }
        match self.audio.start() {
            Ok(()) => {
                self.audio_running = true;
                self.stats.audio_starts += 1;
                log::debug!("Audio device started.");
            }
            Err(e) => {
                self.stats.device_failures += 1;
                log::error!("Failed to start audio device: {e:#}");
            }
        }
    }

    /// Stops the audio device if it is running.
    pub fn stop_audio(&mut self) {
        if !self.audio_running {
            log::warn!("Audio device not running; refusing a stop.");
            return;
        }
        self.audio_running = false;
        self.stats.audio_stops += 1;
        match self.audio.stop() {
            Ok(()) => log::debug!("Audio device stopped."),
            Err(e) => {
                self.stats.device_failures += 1;
                log::error!("Failed to stop audio device: {e:#}");
            }
        }
    }

    /// Acquires the configured wake lock unless it is already held.
    pub fn acquire_wake_lock(&mut self) {
        let Some(lock) = self.lock_type else {
            return;
        };
        if self.wake_lock_held.load(Ordering::Acquire) {
            log::warn!("Wake lock '{lock}' already held; refusing a second acquire.");
            return;
        }
        match self.power.request_wake_lock(lock) {
            Ok(()) => {
                self.wake_lock_held.store(true, Ordering::Release);
                self.stats.wake_acquires += 1;
                log::debug!("Wake lock '{lock}' acquired.");
            }
            Err(e) => {
                self.stats.device_failures += 1;
                log::error!("Failed to acquire wake lock '{lock}': {e:#}");
            }
        }
    }

    /// Releases the configured wake lock if it is held.
    pub fn release_wake_lock(&mut self) {
        let Some(lock) = self.lock_type else {
            return;
        };
        if !self.wake_lock_held.swap(false, Ordering::AcqRel) {
            log::warn!("Wake lock '{lock}' not held; refusing a release.");
            return;
        }
        self.stats.wake_releases += 1;
        match self.power.release_lock(lock) {
            Ok(()) => log::debug!("Wake lock '{lock}' released."),
            Err(e) => {
                self.stats.device_failures += 1;
                log::error!("Failed to release wake lock '{lock}': {e:#}");
            }
        }
    }

    /// Stops audio and releases the wake lock if either is still held.
    ///
    /// Returns `true` if anything had to be released.
    pub fn release_all(&mut self) -> bool {
        let mut released = false;
        if self.audio_running {
            self.stop_audio();
            released = true;
        }
        if self.is_wake_lock_held() {
            self.release_wake_lock();
            released = true;
        }
        if released {
            log::info!("Foreground resources were still held at teardown; released them.");
        }
        released
    }

    /// Returns `true` while the audio device runs.
    pub fn is_audio_running(&self) -> bool {
        self.audio_running
    }

    /// Returns `true` while the wake lock is held.
    pub fn is_wake_lock_held(&self) -> bool {
        self.wake_lock_held.load(Ordering::Acquire)
    }

    /// A shared flag mirroring the wake-lock state, readable from any thread.
    pub fn wake_lock_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.wake_lock_held)
    }

    /// Operation counters.
    pub fn stats(&self) -> ResourceStats {
        self.stats
    }
}
