use std::{
    fs::{self, File, OpenOptions},
    os::unix::fs::FileExt,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use tracing::info;

use super::Surface;
use crate::canvas::{ButtonFace, Canvas};
use crate::error::SetupError;
use crate::layout::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb565,
    Bgr888,
    Xrgb8888,
}

impl PixelFormat {
    pub fn from_bits_per_pixel(bpp: u32) -> Option<Self> {
        match bpp {
            16 => Some(PixelFormat::Rgb565),
            24 => Some(PixelFormat::Bgr888),
            32 => Some(PixelFormat::Xrgb8888),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Bgr888 => 3,
            PixelFormat::Xrgb8888 => 4,
        }
    }
}

/// Geometry of a Linux framebuffer as published under `/sys/class/graphics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbGeometry {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Bytes per scanline.
    pub stride: usize,
}

impl FbGeometry {
    pub fn read(sysfs_dir: &Path) -> Result<Self> {
        let size = read_attr(sysfs_dir, "virtual_size")?;
        let (virtual_width, virtual_height) = parse_pair(&size, ',')
            .with_context(|| format!("unexpected virtual_size '{size}'"))?;
        // Double-buffered devices report a taller virtual area than is shown.
        let (width, height) = visible_mode(sysfs_dir)
            .map(|(w, h)| (w.min(virtual_width), h.min(virtual_height)))
            .unwrap_or((virtual_width, virtual_height));

        let bpp: u32 = read_attr(sysfs_dir, "bits_per_pixel")?
            .parse()
            .context("bits_per_pixel")?;
        let format = PixelFormat::from_bits_per_pixel(bpp)
            .with_context(|| format!("unsupported pixel depth {bpp} bpp"))?;

        let packed = virtual_width as usize * format.bytes_per_pixel();
        let stride = match read_attr(sysfs_dir, "stride") {
            Ok(s) => s.parse::<usize>().unwrap_or(packed).max(packed),
            Err(_) => packed,
        };

        Ok(Self {
            width,
            height,
            format,
            stride,
        })
    }
}

fn parse_pair(value: &str, sep: char) -> Option<(u32, u32)> {
    let (a, b) = value.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// Current video mode from `mode`, or the first of `modes`, e.g. `U:320x240p-0`.
fn visible_mode(dir: &Path) -> Option<(u32, u32)> {
    let mode = read_attr(dir, "mode")
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let modes = read_attr(dir, "modes").ok()?;
            modes.lines().next().map(str::to_string)
        })?;
    let spec = mode.split_once(':').map_or(mode.as_str(), |(_, rest)| rest);
    let end = spec
        .find(|c: char| !(c.is_ascii_digit() || c == 'x'))
        .unwrap_or(spec.len());
    parse_pair(&spec[..end], 'x')
}

fn read_attr(dir: &Path, name: &str) -> Result<String> {
    let path = dir.join(name);
    let s = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(s.trim().to_string())
}

pub struct Framebuffer {
    path: PathBuf,
    file: File,
    geometry: FbGeometry,
    canvas: Canvas,
    scratch: Vec<u8>,
}

impl Framebuffer {
    pub fn open(path: &Path) -> Result<Self, SetupError> {
        let display_err = |reason: String| SetupError::Display {
            path: path.to_path_buf(),
            reason,
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| display_err("not a framebuffer device path".to_string()))?;
        let sysfs = Path::new("/sys/class/graphics").join(name);
        let geometry = FbGeometry::read(&sysfs).map_err(|e| display_err(format!("{e:#}")))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| display_err(e.to_string()))?;

        info!(
            device = %path.display(),
            width = geometry.width,
            height = geometry.height,
            format = ?geometry.format,
            stride = geometry.stride,
            "framebuffer opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            geometry,
            canvas: Canvas::new(geometry.width, geometry.height),
            scratch: vec![0; geometry.stride * geometry.height as usize],
        })
    }

    pub fn geometry(&self) -> FbGeometry {
        self.geometry
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.geometry.width, self.geometry.height)
    }

    fn fill(&mut self, color: Rgb888) {
        self.canvas.fill(color);
    }

    fn blit(&mut self, face: &ButtonFace<'_>, cell: Cell) {
        self.canvas.draw_face(face, cell);
    }

    fn present(&mut self) -> Result<()> {
        encode_frame(&self.canvas, &self.geometry, &mut self.scratch);
        self.file
            .write_all_at(&self.scratch, 0)
            .with_context(|| format!("writing frame to {}", self.path.display()))
    }
}

/// Converts the canvas into the device's native pixel layout.
pub fn encode_frame(canvas: &Canvas, geometry: &FbGeometry, out: &mut [u8]) {
    let bpp = geometry.format.bytes_per_pixel();
    let width = canvas.width() as usize;
    for (y, row) in canvas.pixels().chunks(width.max(1)).enumerate() {
        let start = y * geometry.stride;
        let Some(line) = out.get_mut(start..start + width * bpp) else {
            break;
        };
        for (px, dst) in row.iter().zip(line.chunks_exact_mut(bpp)) {
            encode_pixel(*px, geometry.format, dst);
        }
    }
}

fn encode_pixel(color: Rgb888, format: PixelFormat, dst: &mut [u8]) {
    let (r, g, b) = (color.r(), color.g(), color.b());
    match format {
        PixelFormat::Rgb565 => {
            let v = (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3);
            dst.copy_from_slice(&v.to_le_bytes());
        }
        PixelFormat::Bgr888 => dst.copy_from_slice(&[b, g, r]),
        PixelFormat::Xrgb8888 => dst.copy_from_slice(&[b, g, r, 0xff]),
    }
}
