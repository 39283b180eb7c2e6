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

//! Contains the `CpalAudioDevice` struct.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tether_core::resource::AudioDevice;

/// Format of the output stream handed to the mix callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Interleaved channel count.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
}

/// Fills one output buffer of interleaved `f32` samples.
pub type MixCallback = Box<dyn FnMut(&mut [f32], &StreamInfo) + Send>;

/// An `AudioDevice` that uses the host's default output device via CPAL.
///
/// The stream is built on the first `start` and kept for the device's
/// lifetime; `stop` pauses it rather than dropping it.
pub struct CpalAudioDevice {
    mix: Option<MixCallback>,
    stream: Option<cpal::Stream>,
}

impl CpalAudioDevice {
    /// Creates a device that outputs silence.
    pub fn new() -> Self {
        Self::with_mixer(Box::new(|buffer: &mut [f32], _: &StreamInfo| buffer.fill(0.0)))
    }

    /// Creates a device that calls `mix` whenever the stream needs samples.
    pub fn with_mixer(mix: MixCallback) -> Self {
        Self {
            mix: Some(mix),
            stream: None,
        }
    }

    fn build_stream(&mut self) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No default output device available"))?;
        let config = device.default_output_config()?;

        let stream_info = StreamInfo {
            channels: config.channels(),
            sample_rate: config.sample_rate(),
        };
        let mut mix = self
            .mix
            .take()
            .ok_or_else(|| anyhow!("Audio stream was already built once"))?;

        let audio_callback = move |output: &mut [f32], _: &cpal::OutputCallbackInfo| {
            mix(output, &stream_info);
        };
        let error_callback = |err| {
            log::error!("An error occurred on the audio stream: {err}");
        };

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                device.build_output_stream(&config.into(), audio_callback, error_callback, None)?
            }
            format => return Err(anyhow!("Unsupported sample format: {}", format)),
        };
        log::info!(
            "Audio stream ready: {} channel(s) at {} Hz.",
            stream_info.channels,
            stream_info.sample_rate
        );
        Ok(stream)
    }
}

impl Default for CpalAudioDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDevice for CpalAudioDevice {
    fn start(&mut self) -> Result<()> {
        if self.stream.is_none() {
            self.stream = Some(self.build_stream()?);
        }
        match &self.stream {
            Some(stream) => Ok(stream.play()?),
            None => Err(anyhow!("Audio stream unavailable")),
        }
    }

    fn stop(&mut self) -> Result<()> {
        match &self.stream {
            Some(stream) => Ok(stream.pause()?),
            None => Err(anyhow!("Audio stream was never started")),
        }
    }
}
