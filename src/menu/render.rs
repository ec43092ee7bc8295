use anyhow::Result;
use embedded_graphics::pixelcolor::Rgb888;

use crate::canvas::ButtonFace;
use crate::menu::button::Button;
use crate::platform::Surface;

/// Draws one full frame: background, every button in its current state, present.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    buttons: &[Button],
    background: Rgb888,
) -> Result<()> {
    surface.fill(background);
    for button in buttons {
        let face = ButtonFace {
            label: &button.spec.text,
            background: button.background(),
            foreground: button.palette.text,
        };
        surface.blit(&face, button.cell);
    }
    surface.present()
}
