//! Headless surface and scripted input, for tests and dry runs.

use std::collections::VecDeque;
use std::time::Instant;

use anyhow::Result;
use embedded_graphics::pixelcolor::Rgb888;

use super::{InputSource, Surface};
use crate::canvas::{ButtonFace, Canvas};
use crate::layout::Cell;
use crate::menu::InputEvent;

pub struct MemorySurface {
    canvas: Canvas,
    frames: usize,
}

impl MemorySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            frames: 0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Number of completed `present()` calls.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn fill(&mut self, color: Rgb888) {
        self.canvas.fill(color);
    }

    fn blit(&mut self, face: &ButtonFace<'_>, cell: Cell) {
        self.canvas.draw_face(face, cell);
    }

    fn present(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

/// Hands out pre-recorded batches, one per poll, without waiting.
/// Once the script runs out every poll reports `Quit`.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<InputEvent>>,
    polls: usize,
}

impl ScriptedInput {
    pub fn new<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<InputEvent>>,
    {
        Self {
            batches: batches.into_iter().collect(),
            polls: 0,
        }
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _deadline: Instant) -> Result<Vec<InputEvent>> {
        self.polls += 1;
        Ok(self
            .batches
            .pop_front()
            .unwrap_or_else(|| vec![InputEvent::Quit]))
    }
}
