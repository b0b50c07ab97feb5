//! Rendering backend that replays scripted input without opening a window.

use std::time::Duration;

use anyhow::{ensure, Result};
use maze_runner_core::FrameInput;
use maze_runner_rendering::{Presentation, RenderingBackend, Scene};

/// Feeds a fixed sequence of inputs at a fixed frame delta.
#[derive(Clone, Debug)]
pub(crate) struct HeadlessBackend {
    frames: Vec<FrameInput>,
    frame_time: Duration,
}

impl HeadlessBackend {
    /// Creates a backend stepping `frames_per_second` times per simulated second.
    pub(crate) fn new(frames: Vec<FrameInput>, frames_per_second: u32) -> Result<Self> {
        ensure!(frames_per_second > 0, "frame rate must be positive");
        Ok(Self {
            frames,
            frame_time: Duration::from_secs(1) / frames_per_second,
        })
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<Scene>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool,
    {
        let mut scene = presentation.scene;
        tracing::debug!(
            title = %presentation.window_title,
            frames = self.frames.len(),
            "headless run started"
        );

        let mut presented = 0_usize;
        for input in self.frames {
            presented += 1;
            if !update_scene(self.frame_time, input, &mut scene) {
                break;
            }
        }

        tracing::debug!(presented, "headless run finished");
        Ok(scene)
    }
}
