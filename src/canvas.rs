//! In-memory RGB frame that surfaces draw into before presenting.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::layout::Cell;

/// What a button looks like in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonFace<'a> {
    pub label: &'a str,
    pub background: Rgb888,
    pub foreground: Rgb888,
}

pub struct Canvas {
    pixels: Vec<Rgb888>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Rgb888::BLACK; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(color);
    }

    pub fn fill_cell(&mut self, cell: Cell, color: Rgb888) {
        let x_end = (cell.x + cell.width).min(self.width);
        let y_end = (cell.y + cell.height).min(self.height);
        if cell.x >= x_end {
            return;
        }
        for y in cell.y..y_end {
            let row = (y * self.width) as usize;
            self.pixels[row + cell.x as usize..row + x_end as usize].fill(color);
        }
    }

    /// Flat background with the label centered and clipped to the cell.
    pub fn draw_face(&mut self, face: &ButtonFace<'_>, cell: Cell) {
        self.fill_cell(cell, face.background);
        if face.label.is_empty() || cell.width == 0 || cell.height == 0 {
            return;
        }

        let area = Rectangle::new(
            Point::new(cell.x as i32, cell.y as i32),
            Size::new(cell.width, cell.height),
        );
        let character_style = MonoTextStyle::new(&FONT_10X20, face.foreground);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let mut clipped = self.clipped(&area);
        let _ = Text::with_text_style(face.label, area.center(), character_style, text_style)
            .draw(&mut clipped);
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as u32) < self.width
                && (coord.y as u32) < self.height
            {
                let idx = (coord.y as u32 * self.width + coord.x as u32) as usize;
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_cell_clips_to_canvas() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_cell(Cell::new(8, 8, 5, 5), Rgb888::RED);
        assert_eq!(canvas.pixel(9, 9), Some(Rgb888::RED));
        assert_eq!(canvas.pixel(7, 7), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(10, 9), None);
    }

    #[test]
    fn face_label_stays_inside_cell() {
        let mut canvas = Canvas::new(200, 100);
        canvas.fill(Rgb888::BLACK);
        let face = ButtonFace {
            label: "A very long label that cannot fit",
            background: Rgb888::BLUE,
            foreground: Rgb888::WHITE,
        };
        canvas.draw_face(&face, Cell::new(0, 0, 100, 100));

        let white_inside = (0..100)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(Rgb888::WHITE))
            .count();
        assert!(white_inside > 0);
        for y in 0..100 {
            for x in 100..200 {
                assert_eq!(canvas.pixel(x, y), Some(Rgb888::BLACK));
            }
        }
    }
}
