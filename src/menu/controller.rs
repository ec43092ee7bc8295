use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::Rgb888;
use tracing::{debug, info};

use crate::config::MenuConfig;
use crate::error::LayoutError;
use crate::layout::layout;
use crate::menu::button::{dispatch, Button};
use crate::menu::event::InputEvent;
use crate::menu::render::render;
use crate::platform::{InputSource, Surface};
use crate::style::Theme;

pub const FRAME_RATE: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResult {
    /// The activated button's `cmd`, or its `text` when no command is set.
    Activated(String),
    Quit,
}

impl MenuResult {
    pub fn command(&self) -> Option<&str> {
        match self {
            MenuResult::Activated(cmd) => Some(cmd),
            MenuResult::Quit => None,
        }
    }
}

/// Hands out per-frame deadlines at a fixed rate without piling up debt
/// when a frame runs long.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            next: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The instant the current frame's input wait must end by; never more
    /// than one period from now.
    pub fn next_deadline(&mut self) -> Instant {
        let now = Instant::now();
        let target = self.next + self.period;
        self.next = if target < now {
            now
        } else {
            target.min(now + self.period)
        };
        self.next
    }
}

pub struct Menu<S, I> {
    surface: S,
    input: I,
    buttons: Vec<Button>,
    background: Rgb888,
    done: bool,
    activated: Option<usize>,
}

impl<S: Surface, I: InputSource> Menu<S, I> {
    pub fn new(config: &MenuConfig, surface: S, input: I) -> Result<Self, LayoutError> {
        let (width, height) = surface.size();
        let cells = layout(config.buttons.len(), config.layout, width, height)?;
        let theme = Theme::from_config(config);

        let buttons = cells
            .into_iter()
            .zip(&config.buttons)
            .map(|(cell, spec)| {
                info!(
                    text = %spec.text,
                    x = cell.x,
                    y = cell.y,
                    width = cell.width,
                    height = cell.height,
                    "button"
                );
                let palette = theme.palette_for(config, spec.style.as_deref());
                Button::new(cell, spec.clone(), palette)
            })
            .collect();

        Ok(Self {
            surface,
            input,
            buttons,
            background: theme.background,
            done: false,
            activated: None,
        })
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Runs frames until a button is clicked or the input source quits.
    pub fn run(&mut self) -> Result<MenuResult> {
        let mut clock = FrameClock::new(FRAME_RATE);
        self.draw().context("draw first frame")?;

        while !self.done {
            let deadline = clock.next_deadline();
            let events = self.input.poll(deadline).context("poll input")?;
            if !events.is_empty() {
                debug!(count = events.len(), "input batch");
            }
            self.handle_events(&events);
            self.draw().context("draw frame")?;
        }

        Ok(self.result())
    }

    /// Applies a batch in order. Events after the menu is done are dropped.
    pub fn handle_events(&mut self, events: &[InputEvent]) {
        for event in events {
            if self.done {
                break;
            }
            match event {
                InputEvent::Quit => {
                    info!("quit requested");
                    self.done = true;
                }
                InputEvent::Pointer(pointer) => {
                    let activated = &mut self.activated;
                    dispatch(&mut self.buttons, pointer, &mut self.done, |index, spec| {
                        info!(index, text = %spec.text, command = %spec.command(), "button clicked");
                        *activated = Some(index);
                    });
                }
            }
        }
    }

    pub fn draw(&mut self) -> Result<()> {
        render(&mut self.surface, &self.buttons, self.background)
    }

    pub fn result(&self) -> MenuResult {
        match self.activated.and_then(|i| self.buttons.get(i)) {
            Some(button) => MenuResult::Activated(button.spec.command().to_string()),
            None => MenuResult::Quit,
        }
    }
}
