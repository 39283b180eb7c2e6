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

//! Replays a JSON script of host lifecycle events through a
//! [`LifecycleBridge`] and logs what every event did.
//!
//! Usage: `tether-sim [script.json]`. Without an argument the bundled
//! `scripts/session.json` is used.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs, thread};
use tether_control::{BridgeConfig, BridgeParts, LifecycleBridge, ResourceStats};
use tether_core::application::{AppSystem, BackSignalHandler, SystemsApplication};
use tether_core::capability::{KeyboardCapability, KEYBOARD};
use tether_core::collaborator::{Collaborator, SetupContext};
use tether_core::error::SetupError;
use tether_core::renderer::{FrameInfo, Renderer};
use tether_core::request::ExternalRequest;
use tether_core::resource::AudioDevice;
use tether_core::{LifecycleEvent, LifecycleState};
use tether_infra::{init_logger, LoggingWakeLock};

const DEFAULT_SCRIPT: &str = include_str!("../scripts/session.json");

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Script {
    config: BridgeConfig,
    /// How long to let the render thread run after each event.
    frame_wait_ms: u64,
    events: Vec<LifecycleEvent>,
}

/// An application system that only reports its hooks.
struct TraceSystem {
    name: &'static str,
}

impl AppSystem for TraceSystem {
    fn name(&self) -> &str {
        self.name
    }
    fn on_init(&mut self, ctx: &mut SetupContext<'_>) {
        log::info!("[{}] init for '{}'", self.name, ctx.host().app_name);
    }
    fn on_resume(&mut self) {
        log::info!("[{}] resume", self.name);
    }
    fn on_foreground(&mut self) {
        log::info!("[{}] foreground", self.name);
    }
    fn on_background(&mut self) {
        log::info!("[{}] background", self.name);
    }
    fn on_suspend(&mut self) {
        log::info!("[{}] suspend", self.name);
    }
    fn on_destroy(&mut self) {
        log::info!("[{}] destroy", self.name);
    }
    fn on_memory_warning(&mut self) {
        log::info!("[{}] memory warning", self.name);
    }
    fn on_activity_intent(&mut self, request: &ExternalRequest) {
        log::info!(
            "[{}] intent '{}' {:?}",
            self.name,
            request.action.as_deref().unwrap_or("-"),
            request.data
        );
    }
    fn on_activity_result(
        &mut self,
        request_code: i32,
        result_code: i32,
        _data: Option<&ExternalRequest>,
    ) {
        log::info!("[{}] result {request_code} -> {result_code}", self.name);
    }
}

struct FrameCounter {
    every: u64,
}

impl Renderer for FrameCounter {
    fn render_frame(&mut self, frame: &FrameInfo) -> Result<()> {
        if frame.index % self.every == 0 {
            log::debug!(
                "frame {} ({:?}, {} task(s))",
                frame.index,
                frame.delta,
                frame.tasks_run
            );
        }
        Ok(())
    }
    fn surface_resumed(&mut self) {
        log::info!("surface resumed");
    }
    fn surface_paused(&mut self) {
        log::info!("surface paused");
    }
}

#[derive(Default)]
struct SoftKeyboard {
    toggles: AtomicU32,
}

impl KeyboardCapability for SoftKeyboard {
    fn set_hardware_keyboard_open(&self) {
        self.toggles.fetch_add(1, Ordering::Relaxed);
        log::info!("soft keyboard hidden: hardware keyboard attached");
    }
    fn set_hardware_keyboard_closed(&self) {
        self.toggles.fetch_add(1, Ordering::Relaxed);
        log::info!("soft keyboard available: hardware keyboard removed");
    }
}

struct KeyboardSupport {
    keyboard: Arc<SoftKeyboard>,
}

impl Collaborator for KeyboardSupport {
    fn name(&self) -> &str {
        "keyboard"
    }
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), SetupError> {
        ctx.register(
            KEYBOARD,
            Arc::clone(&self.keyboard) as Arc<dyn KeyboardCapability>,
        );
        Ok(())
    }
}

struct LogBack;

impl BackSignalHandler for LogBack {
    fn on_back_signal(&self) {
        log::info!("back signal handled on the render thread");
    }
}

#[cfg(feature = "cpal")]
fn audio_device() -> Box<dyn AudioDevice> {
    Box::new(tether_infra::CpalAudioDevice::new())
}

#[cfg(not(feature = "cpal"))]
fn audio_device() -> Box<dyn AudioDevice> {
    Box::new(tether_infra::SilentAudioDevice::new())
}

fn load_script() -> Result<Script> {
    let json = match env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("reading script '{path}'"))?
        }
        None => DEFAULT_SCRIPT.to_string(),
    };
    serde_json::from_str(&json).context("parsing event script")
}

/// What a replay ended with.
#[derive(Debug)]
struct Summary {
    state: LifecycleState,
    frames: u64,
    keyboard_changes: u32,
    stats: ResourceStats,
}

fn replay(script: Script) -> Result<Summary> {
    script.config.validate()?;

    let application = SystemsApplication::new()
        .with_system(TraceSystem { name: "game" })
        .with_system(TraceSystem { name: "audio-mixer" });
    let keyboard = Arc::new(SoftKeyboard::default());
    let parts = BridgeParts::new(
        Box::new(application),
        Box::new(FrameCounter { every: 30 }),
        audio_device(),
        Box::new(LoggingWakeLock::new()),
    )
    .with_collaborator(KeyboardSupport {
        keyboard: Arc::clone(&keyboard),
    })
    .with_back_handler(Arc::new(LogBack));

    let mut bridge = LifecycleBridge::new(script.config, parts);
    let wait = Duration::from_millis(script.frame_wait_ms);
    let mut frames = 0;

    for event in script.events {
        let transition = bridge.handle(event);
        if transition.is_noop() {
            log::info!("{:?} ignored in {}", transition.event, transition.from);
        } else {
            log::info!(
                "{:?}: {} -> {} {:?}",
                transition.event,
                transition.from,
                transition.to,
                transition.commands
            );
        }
        thread::sleep(wait);
        frames = frames.max(bridge.frames_rendered());
    }

    if let Some(report) = bridge.startup_report() {
        for failure in report.failures() {
            log::warn!("Collaborator '{}' did not start.", failure.name);
        }
    }
    Ok(Summary {
        state: bridge.state(),
        frames,
        keyboard_changes: keyboard.toggles.load(Ordering::Relaxed),
        stats: bridge.resource_stats(),
    })
}

fn main() -> Result<()> {
    let script = load_script()?;
    init_logger(&script.config.log_filter);

    let summary = replay(script)?;
    log::info!(
        "Final state {} after {} frame(s), {} keyboard change(s); {:?}",
        summary.state,
        summary.frames,
        summary.keyboard_changes,
        summary.stats
    );
    ensure!(
        summary.stats.is_balanced(),
        "resources left unbalanced: {:?}",
        summary.stats
    );
    Ok(())
}
