use embedded_graphics::pixelcolor::Rgb888;
use tracing::debug;

use crate::config::ButtonSpec;
use crate::layout::Cell;
use crate::menu::event::{PointerEvent, PointerKind};
use crate::style::Palette;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Normal,
    Hover,
    Pressed,
}

#[derive(Debug, Clone)]
pub struct Button {
    pub cell: Cell,
    pub spec: ButtonSpec,
    pub palette: Palette,
    state: ButtonState,
    was_pressed: bool,
}

impl Button {
    pub fn new(cell: Cell, spec: ButtonSpec, palette: Palette) -> Self {
        Self {
            cell,
            spec,
            palette,
            state: ButtonState::Normal,
            was_pressed: false,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// True while a press that started on this button has not been released.
    pub fn was_pressed(&self) -> bool {
        self.was_pressed
    }

    pub fn background(&self) -> Rgb888 {
        match self.state {
            ButtonState::Normal => self.palette.normal,
            ButtonState::Hover => self.palette.hover,
            ButtonState::Pressed => self.palette.down,
        }
    }

    /// Applies one pointer event. Returns `true` when the event completes a
    /// click: press and release both inside this button.
    pub fn handle_event(&mut self, event: &PointerEvent) -> bool {
        let inside = self.cell.contains(event.x, event.y);
        let before = self.state;
        let mut activated = false;

        match (self.state, event.kind) {
            (ButtonState::Pressed, PointerKind::Up) => {
                self.was_pressed = false;
                if inside {
                    self.state = ButtonState::Hover;
                    activated = true;
                } else {
                    self.state = ButtonState::Normal;
                }
            }
            // Motion and repeated downs are ignored until release.
            (ButtonState::Pressed, PointerKind::Move | PointerKind::Down) => {}
            (_, PointerKind::Down) => {
                if inside {
                    self.state = ButtonState::Pressed;
                    self.was_pressed = true;
                } else {
                    self.state = ButtonState::Normal;
                }
            }
            (_, PointerKind::Move) => {
                self.state = if inside {
                    ButtonState::Hover
                } else {
                    ButtonState::Normal
                };
            }
            (_, PointerKind::Up) => {}
        }

        if before != self.state {
            debug!(
                button = %self.spec.text,
                ?before,
                after = ?self.state,
                ?event,
                "button state"
            );
        }
        activated
    }
}

/// Routes one event to every button in order.
///
/// `done` is checked before each button and set by the first activation;
/// once set, nothing further is mutated and `on_click` never runs again.
pub fn dispatch<F>(buttons: &mut [Button], event: &PointerEvent, done: &mut bool, mut on_click: F)
where
    F: FnMut(usize, &ButtonSpec),
{
    for (index, button) in buttons.iter_mut().enumerate() {
        if *done {
            return;
        }
        if button.handle_event(event) {
            *done = true;
            on_click(index, &button.spec);
        }
    }
}
