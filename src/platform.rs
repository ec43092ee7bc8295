use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use embedded_graphics::pixelcolor::Rgb888;

use crate::canvas::ButtonFace;
use crate::config::TouchCalibration;
use crate::layout::Cell;
use crate::menu::InputEvent;

/// Raster sink the menu draws on once per frame.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn fill(&mut self, color: Rgb888);
    fn blit(&mut self, face: &ButtonFace<'_>, cell: Cell);
    /// Makes everything drawn since the last call visible.
    fn present(&mut self) -> Result<()>;
}

pub trait InputSource {
    /// Collects events until `deadline`. Must not block past it.
    fn poll(&mut self, deadline: Instant) -> Result<Vec<InputEvent>>;
}

impl<T: Surface + ?Sized> Surface for Box<T> {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn fill(&mut self, color: Rgb888) {
        (**self).fill(color)
    }

    fn blit(&mut self, face: &ButtonFace<'_>, cell: Cell) {
        (**self).blit(face, cell)
    }

    fn present(&mut self) -> Result<()> {
        (**self).present()
    }
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self, deadline: Instant) -> Result<Vec<InputEvent>> {
        (**self).poll(deadline)
    }
}

pub mod memory;

#[cfg(target_os = "linux")]
pub mod evdev;
#[cfg(target_os = "linux")]
pub mod fbdev;
#[cfg(target_os = "linux")]
pub mod signals;

pub fn open_surface(path: &Path) -> Result<Box<dyn Surface>> {
    #[cfg(target_os = "linux")]
    {
        return Ok(Box::new(fbdev::Framebuffer::open(path)?));
    }

    #[cfg(not(target_os = "linux"))]
    {
        use anyhow::bail;
        let _ = path;
        bail!("Unsupported OS (framebuffer output needs Linux).");
    }
}

pub fn open_input(
    path: &Path,
    calibration: Option<TouchCalibration>,
    screen: (u32, u32),
) -> Result<Box<dyn InputSource>> {
    #[cfg(target_os = "linux")]
    {
        return Ok(Box::new(evdev::EvdevSource::open(path, calibration, screen)?));
    }

    #[cfg(not(target_os = "linux"))]
    {
        use anyhow::bail;
        let _ = (path, calibration, screen);
        bail!("Unsupported OS (touch input needs Linux evdev).");
    }
}
