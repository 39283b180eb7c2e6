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

//! The renderer contract driven by the render thread.
//!
//! The graphics pipeline itself lives outside the bridge. The render thread
//! only needs to tell the renderer when its surface appears, when a frame is
//! due, and when the surface is paused or goes away.

use anyhow::Result;
use std::time::Duration;

/// Timing information for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Monotonic frame counter, starting at 0.
    pub index: u64,
    /// Time elapsed since the previous frame started.
    pub delta: Duration,
    /// Number of queued tasks executed before this frame.
    pub tasks_run: usize,
}

/// A renderer bound to the drawing surface.
///
/// Every method is called on the render thread, never on the host thread.
pub trait Renderer: Send {
    /// The drawing surface has been created.
    fn surface_created(&mut self) -> Result<()> {
        Ok(())
    }

    /// Draws one frame.
    fn render_frame(&mut self, frame: &FrameInfo) -> Result<()>;

    /// Frame production is about to stop until the next resume.
    fn surface_paused(&mut self) {}

    /// Frame production is about to start again.
    fn surface_resumed(&mut self) {}

    /// The drawing surface is being destroyed. Last call the renderer receives.
    fn surface_destroyed(&mut self) {}
}
