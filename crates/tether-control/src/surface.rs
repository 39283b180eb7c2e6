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

//! The drawing surface and its persistent render thread.
//!
//! A [`SurfaceRendererPair`] is created once, when the application is
//! created, and destroyed once, when it is destroyed. In between, pausing and
//! resuming only flips an `active` flag: the thread and the surface stay
//! alive, the loop simply idles until it is woken again.
//!
//! Each active frame first drains the task queue, then asks the renderer to
//! draw. Tasks left in the queue when the pair is destroyed are drained one
//! last time before the renderer is told its surface is gone. A panicking
//! renderer hook is logged and the loop carries on.

use crate::dispatcher::{contain, TaskReceiver};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tether_core::renderer::{FrameInfo, Renderer};

/// Shortest frame interval the render loop honours; smaller values are raised
/// to it.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Settings for the render loop.
#[derive(Debug, Clone)]
pub struct RenderLoopSettings {
    /// Target time between frame starts while active.
    pub frame_interval: Duration,
    /// Name given to the render thread.
    pub thread_name: String,
}

impl Default for RenderLoopSettings {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            thread_name: "tether-render".to_string(),
        }
    }
}

/// Flags shared between the host thread and the render thread.
#[derive(Debug, Default)]
struct LoopFlags {
    running: AtomicBool,
    active: AtomicBool,
    frames: AtomicU64,
}

/// Owns the render thread, and through it the renderer and its surface.
pub struct SurfaceRendererPair {
    flags: Arc<LoopFlags>,
    wake: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl SurfaceRendererPair {
    /// Spawns the render thread. The pair starts inactive.
    pub fn spawn(
        renderer: Box<dyn Renderer>,
        tasks: TaskReceiver,
        settings: RenderLoopSettings,
    ) -> io::Result<Self> {
        let flags = Arc::new(LoopFlags::default());
        flags.running.store(true, Ordering::SeqCst);
        let (wake, wake_rx) = crossbeam_channel::bounded(1);

        let loop_flags = Arc::clone(&flags);
        let interval = settings.frame_interval.max(MIN_FRAME_INTERVAL);
        let handle = thread::Builder::new()
            .name(settings.thread_name)
            .spawn(move || render_loop(renderer, tasks, &loop_flags, &wake_rx, interval))?;

        Ok(Self {
            flags,
            wake,
            handle: Some(handle),
        })
    }

    /// Lets the render thread produce frames again.
    pub fn on_resume(&self) {
        self.flags.active.store(true, Ordering::Release);
        self.wake();
    }

    /// Makes the render thread idle after its current frame.
    pub fn on_pause(&self) {
        self.flags.active.store(false, Ordering::Release);
        self.wake();
    }

    /// Returns `true` if frames are currently requested.
    pub fn is_active(&self) -> bool {
        self.flags.active.load(Ordering::Acquire)
    }

    /// Returns the number of frames rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.flags.frames.load(Ordering::Acquire)
    }

    /// Returns `true` until [`destroy`](Self::destroy) has completed.
    pub fn is_alive(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the render thread and waits for it to finish its current frame.
    ///
    /// Calling it again is a no-op.
    pub fn destroy(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.flags.active.store(false, Ordering::Release);
        self.flags.running.store(false, Ordering::Release);
        self.wake();
        if handle.join().is_err() {
            log::error!("Render thread panicked before shutdown.");
        }
    }

    fn wake(&self) {
        match self.wake.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                log::trace!("Render thread already gone; wake-up dropped.")
            }
        }
    }
}

impl Drop for SurfaceRendererPair {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn render_loop(
    mut renderer: Box<dyn Renderer>,
    tasks: TaskReceiver,
    flags: &LoopFlags,
    wake: &Receiver<()>,
    interval: Duration,
) {
    log::info!("Render thread started.");
    if let Some(Err(e)) = contain("surface_created", || renderer.surface_created()) {
        log::error!("Renderer failed to take the surface: {e:#}");
    }

    let mut was_active = false;
    let mut index = 0u64;
    let mut last_frame = Instant::now();

    while flags.running.load(Ordering::Acquire) {
        let is_active = flags.active.load(Ordering::Acquire);
        if is_active != was_active {
            if is_active {
                contain("surface_resumed", || renderer.surface_resumed());
                last_frame = Instant::now();
            } else {
                contain("surface_paused", || renderer.surface_paused());
            }
            was_active = is_active;
        }

        if !is_active {
            if wake.recv().is_err() {
                break;
            }
            continue;
        }

        let frame_start = Instant::now();
        let tasks_run = tasks.drain();
        let frame = FrameInfo {
            index,
            delta: frame_start.duration_since(last_frame),
            tasks_run,
        };
        if let Some(Err(e)) = contain("render_frame", || renderer.render_frame(&frame)) {
            log::error!("Rendering error on frame {index}: {e:#}");
        }
        last_frame = frame_start;
        index += 1;
        flags.frames.store(index, Ordering::Release);

        let elapsed = frame_start.elapsed();
        if elapsed < interval {
            if let Err(RecvTimeoutError::Disconnected) = wake.recv_timeout(interval - elapsed) {
                break;
            }
        }
    }

    let leftover = tasks.drain();
    if leftover > 0 {
        log::debug!("Ran {leftover} task(s) queued before shutdown.");
    }
    if was_active {
        contain("surface_paused", || renderer.surface_paused());
    }
    contain("surface_destroyed", || renderer.surface_destroyed());
    log::info!("Render thread stopped after {index} frame(s).");
}
