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

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tether_control::{BridgeConfig, BridgeParts, Command, LifecycleBridge, ResourceStats};
use tether_core::application::{BackSignalHandler, NativeApplication};
use tether_core::capability::{KeyboardCapability, KEYBOARD};
use tether_core::collaborator::{Collaborator, Criticality, SetupContext};
use tether_core::error::SetupError;
use tether_core::renderer::{FrameInfo, Renderer};
use tether_core::request::{ConfigurationDescriptor, ExternalRequest, HardKeyboard};
use tether_core::resource::{AudioDevice, WakeLockProvider, WakeLockType};
use tether_core::{HostContext, LifecycleEvent, LifecycleState};

type Journal = Arc<Mutex<Vec<String>>>;

fn note(journal: &Journal, entry: impl Into<String>) {
    journal.lock().unwrap().push(entry.into());
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

fn position(journal: &[String], entry: &str) -> usize {
    journal
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("'{entry}' missing from {journal:?}"))
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

struct RecordingApp {
    journal: Journal,
}

impl NativeApplication for RecordingApp {
    fn create(&mut self, _: &mut SetupContext<'_>) -> Result<(), SetupError> {
        note(&self.journal, "app.create");
        Ok(())
    }
    fn resume(&mut self) {
        note(&self.journal, "app.resume");
    }
    fn suspend(&mut self) {
        note(&self.journal, "app.suspend");
    }
    fn foreground(&mut self) {
        note(&self.journal, "app.foreground");
    }
    fn background(&mut self) {
        note(&self.journal, "app.background");
    }
    fn destroy(&mut self) {
        note(&self.journal, "app.destroy");
    }
    fn activity_intent(&mut self, request: &ExternalRequest) {
        let action = request.action.as_deref().unwrap_or("");
        note(&self.journal, format!("app.intent:{action}"));
    }
    fn activity_result(&mut self, request_code: i32, result_code: i32, _: Option<&ExternalRequest>) {
        note(
            &self.journal,
            format!("app.result:{request_code}:{result_code}"),
        );
    }
    fn memory_warning(&mut self) {
        note(&self.journal, "app.memory_warning");
    }
}

struct RecordingRenderer {
    journal: Journal,
}

impl Renderer for RecordingRenderer {
    fn render_frame(&mut self, _: &FrameInfo) -> Result<()> {
        Ok(())
    }
    fn surface_resumed(&mut self) {
        note(&self.journal, "surface.resumed");
    }
    fn surface_paused(&mut self) {
        note(&self.journal, "surface.paused");
    }
    fn surface_destroyed(&mut self) {
        note(&self.journal, "surface.destroyed");
    }
}

struct RecordingAudio {
    journal: Journal,
}

impl AudioDevice for RecordingAudio {
    fn start(&mut self) -> Result<()> {
        note(&self.journal, "audio.start");
        Ok(())
    }
    fn stop(&mut self) -> Result<()> {
        note(&self.journal, "audio.stop");
        Ok(())
    }
}

struct RecordingWakeLock {
    journal: Journal,
}

impl WakeLockProvider for RecordingWakeLock {
    fn request_wake_lock(&mut self, kind: WakeLockType) -> Result<()> {
        note(&self.journal, format!("wake.acquire:{}", kind.tag()));
        Ok(())
    }
    fn release_lock(&mut self, kind: WakeLockType) -> Result<()> {
        note(&self.journal, format!("wake.release:{}", kind.tag()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingKeyboard {
    opened: AtomicU32,
    closed: AtomicU32,
}

impl KeyboardCapability for RecordingKeyboard {
    fn set_hardware_keyboard_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
    }
    fn set_hardware_keyboard_closed(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

struct KeyboardCollaborator {
    keyboard: Arc<RecordingKeyboard>,
}

impl Collaborator for KeyboardCollaborator {
    fn name(&self) -> &str {
        "keyboard"
    }
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), SetupError> {
        ctx.register(KEYBOARD, Arc::clone(&self.keyboard) as Arc<dyn KeyboardCapability>);
        Ok(())
    }
}

struct BrokenCollaborator {
    criticality: Criticality,
}

impl Collaborator for BrokenCollaborator {
    fn name(&self) -> &str {
        "broken"
    }
    fn criticality(&self) -> Criticality {
        self.criticality
    }
    fn setup(&mut self, _: &mut SetupContext<'_>) -> Result<(), SetupError> {
        Err(SetupError::Unavailable("no such service".to_string()))
    }
}

struct ThreadRecordingBack {
    threads: Mutex<Vec<String>>,
}

impl BackSignalHandler for ThreadRecordingBack {
    fn on_back_signal(&self) {
        let name = thread::current().name().unwrap_or("unnamed").to_string();
        self.threads.lock().unwrap().push(name);
    }
}

fn fast_config() -> BridgeConfig {
    BridgeConfig {
        frame_interval_ms: 1,
        ..BridgeConfig::default()
    }
}

fn recording_parts(journal: &Journal) -> BridgeParts {
    BridgeParts::new(
        Box::new(RecordingApp {
            journal: journal.clone(),
        }),
        Box::new(RecordingRenderer {
            journal: journal.clone(),
        }),
        Box::new(RecordingAudio {
            journal: journal.clone(),
        }),
        Box::new(RecordingWakeLock {
            journal: journal.clone(),
        }),
    )
}

fn created_bridge(journal: &Journal) -> LifecycleBridge {
    let mut bridge = LifecycleBridge::new(fast_config(), recording_parts(journal));
    bridge.handle(LifecycleEvent::Create(HostContext::new("scenario")));
    bridge
}

fn count(journal: &Journal, entry: &str) -> usize {
    entries(journal).iter().filter(|e| *e == entry).count()
}

#[test]
fn test_interrupted_session_pairs_every_resource() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);

    for event in [
        LifecycleEvent::Resume,
        LifecycleEvent::FocusChanged { has_focus: false },
        LifecycleEvent::Pause,
        LifecycleEvent::Resume,
        LifecycleEvent::FocusChanged { has_focus: true },
        LifecycleEvent::Destroy,
    ] {
        bridge.handle(event);
    }

    assert_eq!(bridge.state(), LifecycleState::Destroyed);
    assert_eq!(
        bridge.resource_stats(),
        ResourceStats {
            audio_starts: 1,
            audio_stops: 1,
            wake_acquires: 1,
            wake_releases: 1,
            device_failures: 0,
        }
    );
    assert_eq!(count(&journal, "audio.start"), 1);
    assert_eq!(count(&journal, "audio.stop"), 1);
    assert_eq!(count(&journal, "wake.acquire:screen-dim-inhibit"), 1);
    assert_eq!(count(&journal, "wake.release:screen-dim-inhibit"), 1);
    assert!(bridge.application().is_none());
}

#[test]
fn test_resume_twice_opens_one_session() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);

    let first = bridge.handle(LifecycleEvent::Resume);
    let second = bridge.handle(LifecycleEvent::Resume);

    assert_eq!(first.commands, vec![Command::OpenSession, Command::EnterForeground]);
    assert!(second.is_noop());
    assert_eq!(bridge.resource_stats().audio_starts, 1);
    assert_eq!(bridge.resource_stats().wake_acquires, 1);
    assert!(wait_until(|| bridge.is_surface_active()));
}

#[test]
fn test_session_order_and_teardown_order() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);

    bridge.handle(LifecycleEvent::Resume);
    bridge.handle(LifecycleEvent::Pause);
    bridge.handle(LifecycleEvent::Stop);
    bridge.handle(LifecycleEvent::Destroy);

    let log = entries(&journal);
    // Open: audio, then surface, then wake lock, then the application.
    assert!(position(&log, "audio.start") < position(&log, "wake.acquire:screen-dim-inhibit"));
    assert!(position(&log, "wake.acquire:screen-dim-inhibit") < position(&log, "app.resume"));
    // Pause backgrounds before it closes the session.
    assert!(position(&log, "app.background") < position(&log, "audio.stop"));
    assert!(position(&log, "audio.stop") < position(&log, "wake.release:screen-dim-inhibit"));
    assert!(position(&log, "wake.release:screen-dim-inhibit") < position(&log, "app.suspend"));
    // The application goes before its surface.
    assert!(position(&log, "app.destroy") < position(&log, "surface.destroyed"));
    assert_eq!(count(&journal, "app.destroy"), 1);
}

#[test]
fn test_events_after_destroy_are_ignored() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);
    bridge.handle(LifecycleEvent::Resume);
    bridge.handle(LifecycleEvent::Destroy);
    let before = entries(&journal);

    for event in [
        LifecycleEvent::Resume,
        LifecycleEvent::Pause,
        LifecycleEvent::BackPressed,
        LifecycleEvent::LowMemory,
        LifecycleEvent::Destroy,
        LifecycleEvent::Create(HostContext::new("again")),
    ] {
        assert!(bridge.handle(event).is_noop());
    }

    assert_eq!(bridge.state(), LifecycleState::Destroyed);
    assert_eq!(entries(&journal), before);
}

#[test]
fn test_back_signal_runs_on_the_render_thread() {
    let journal = Journal::default();
    let back = Arc::new(ThreadRecordingBack {
        threads: Mutex::new(Vec::new()),
    });
    let parts = recording_parts(&journal).with_back_handler(back.clone());
    let mut bridge = LifecycleBridge::new(fast_config(), parts);
    bridge.handle(LifecycleEvent::Create(HostContext::new("back")));
    bridge.handle(LifecycleEvent::Resume);

    let transition = bridge.handle(LifecycleEvent::BackPressed);

    assert_eq!(transition.commands, vec![Command::QueueBackSignal]);
    assert!(wait_until(|| !back.threads.lock().unwrap().is_empty()));
    assert_eq!(
        back.threads.lock().unwrap().as_slice(),
        &["tether-render".to_string()]
    );
}

#[test]
fn test_keyboard_changes_reach_the_registered_capability() {
    let journal = Journal::default();
    let keyboard = Arc::new(RecordingKeyboard::default());
    let parts = recording_parts(&journal).with_collaborator(KeyboardCollaborator {
        keyboard: keyboard.clone(),
    });
    let mut bridge = LifecycleBridge::new(fast_config(), parts);
    bridge.handle(LifecycleEvent::Create(HostContext::new("keyboard")));

    bridge.handle(LifecycleEvent::ConfigurationChanged(
        ConfigurationDescriptor::with_keyboard(HardKeyboard::Visible),
    ));
    bridge.handle(LifecycleEvent::ConfigurationChanged(
        ConfigurationDescriptor::with_keyboard(HardKeyboard::Hidden),
    ));
    bridge.handle(LifecycleEvent::ConfigurationChanged(
        ConfigurationDescriptor::default(),
    ));

    assert_eq!(keyboard.opened.load(Ordering::SeqCst), 1);
    assert_eq!(keyboard.closed.load(Ordering::SeqCst), 1);
    assert!(bridge.get_system(KEYBOARD).is_some());
}

#[test]
fn test_keyboard_change_without_capability_is_harmless() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);

    let transition = bridge.handle(LifecycleEvent::ConfigurationChanged(
        ConfigurationDescriptor::with_keyboard(HardKeyboard::Visible),
    ));

    assert_eq!(transition.commands, vec![Command::ApplyConfiguration]);
    assert_eq!(bridge.state(), LifecycleState::Created);
    assert!(bridge.get_system(KEYBOARD).is_none());
}

#[test]
fn test_failing_collaborator_degrades_startup_but_continues() {
    let journal = Journal::default();
    let keyboard = Arc::new(RecordingKeyboard::default());
    let parts = recording_parts(&journal)
        .with_collaborator(BrokenCollaborator {
            criticality: Criticality::Optional,
        })
        .with_collaborator(KeyboardCollaborator { keyboard });
    let mut bridge = LifecycleBridge::new(fast_config(), parts);

    bridge.handle(LifecycleEvent::Create(HostContext::new("degraded")));
    bridge.handle(LifecycleEvent::Resume);

    let report = bridge.startup_report().expect("create ran");
    assert!(report.is_degraded());
    assert!(!report.has_fatal_failure());
    assert_eq!(report.failures().count(), 1);
    assert!(bridge.get_system(KEYBOARD).is_some());
    assert_eq!(bridge.state(), LifecycleState::Foreground);
}

#[test]
fn test_required_collaborator_failure_is_fatal_in_the_report() {
    let journal = Journal::default();
    let parts = recording_parts(&journal).with_collaborator(BrokenCollaborator {
        criticality: Criticality::Required,
    });
    let mut bridge = LifecycleBridge::new(fast_config(), parts);

    bridge.handle(LifecycleEvent::Create(HostContext::new("fatal")));

    let report = bridge.startup_report().expect("create ran");
    assert!(report.has_fatal_failure());
    assert_eq!(bridge.state(), LifecycleState::Created);
}

#[test]
fn test_launch_request_is_forwarded_before_collaborators_run() {
    let journal = Journal::default();
    let mut bridge = LifecycleBridge::new(fast_config(), recording_parts(&journal));
    let host = HostContext::new("launch")
        .with_launch_request(ExternalRequest::with_action("android.intent.action.VIEW"));

    bridge.handle(LifecycleEvent::Create(host));
    bridge.handle(LifecycleEvent::NewExternalRequest(ExternalRequest::with_action(
        "share",
    )));

    let log = entries(&journal);
    assert!(
        position(&log, "app.create") < position(&log, "app.intent:android.intent.action.VIEW")
    );
    assert!(position(&log, "app.intent:android.intent.action.VIEW") < position(&log, "app.intent:share"));
}

#[test]
fn test_results_and_memory_warnings_are_forwarded() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);

    bridge.handle(LifecycleEvent::SubTaskResult(
        tether_core::request::ActivityResult {
            request_code: 7,
            result_code: -1,
            data: None,
        },
    ));
    bridge.handle(LifecycleEvent::LowMemory);

    let log = entries(&journal);
    assert!(log.contains(&"app.result:7:-1".to_string()));
    assert!(log.contains(&"app.memory_warning".to_string()));
}

#[test]
fn test_wake_lock_can_be_disabled() {
    let journal = Journal::default();
    let config = BridgeConfig {
        keep_screen_on: false,
        ..fast_config()
    };
    let mut bridge = LifecycleBridge::new(config, recording_parts(&journal));
    bridge.handle(LifecycleEvent::Create(HostContext::new("no-wake")));

    bridge.handle(LifecycleEvent::Resume);
    bridge.handle(LifecycleEvent::Pause);

    assert_eq!(bridge.resource_stats().wake_acquires, 0);
    assert_eq!(bridge.resource_stats().audio_starts, 1);
    assert_eq!(bridge.resource_stats().audio_stops, 1);
}

#[test]
fn test_dropping_a_live_bridge_tears_down() {
    let journal = Journal::default();
    {
        let mut bridge = created_bridge(&journal);
        bridge.handle(LifecycleEvent::Resume);
    }

    assert_eq!(count(&journal, "audio.stop"), 1);
    assert_eq!(count(&journal, "app.destroy"), 1);
    assert_eq!(count(&journal, "surface.destroyed"), 1);
}

#[test]
fn test_host_tasks_run_on_the_render_thread() {
    let journal = Journal::default();
    let mut bridge = created_bridge(&journal);
    bridge.handle(LifecycleEvent::Resume);

    let seen = journal.clone();
    bridge.enqueue(move || note(&seen, "task.ran"));

    assert!(wait_until(|| count(&journal, "task.ran") == 1));
    assert!(wait_until(|| bridge.frames_rendered() > 0));
}

struct FailingAudio;

impl AudioDevice for FailingAudio {
    fn start(&mut self) -> Result<()> {
        bail!("device busy")
    }
    fn stop(&mut self) -> Result<()> {
        bail!("device busy")
    }
}

#[test]
fn test_audio_failure_does_not_stop_the_session() {
    let journal = Journal::default();
    let mut parts = recording_parts(&journal);
    parts.audio = Box::new(FailingAudio);
    let mut bridge = LifecycleBridge::new(fast_config(), parts);
    bridge.handle(LifecycleEvent::Create(HostContext::new("mute")));

    bridge.handle(LifecycleEvent::Resume);
    bridge.handle(LifecycleEvent::Pause);

    let stats = bridge.resource_stats();
    assert_eq!(stats.audio_starts, 0);
    assert_eq!(stats.audio_stops, 0);
    assert_eq!(stats.device_failures, 1);
    assert_eq!(stats.wake_acquires, 1);
    assert_eq!(stats.wake_releases, 1);
    assert_eq!(count(&journal, "app.resume"), 1);
    assert_eq!(count(&journal, "app.suspend"), 1);
}
