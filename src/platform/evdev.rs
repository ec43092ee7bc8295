//! Touchscreen input from a Linux `/dev/input/event*` node.

use std::{
    fs::File,
    io::{self, ErrorKind, Read},
    mem::size_of,
    os::unix::io::AsRawFd,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use tracing::{debug, info, trace};

use super::{signals, InputSource};
use crate::config::TouchCalibration;
use crate::error::SetupError;
use crate::menu::{InputEvent, PointerEvent};

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;

pub const SYN_REPORT: u16 = 0x00;

pub const KEY_ESC: u16 = 1;
pub const KEY_Q: u16 = 16;
pub const BTN_LEFT: u16 = 0x110;
pub const BTN_TOUCH: u16 = 0x14a;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;

/// One `struct input_event` as the kernel lays it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub sec: i64,
    pub usec: i64,
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    /// Size of a record: two native `long`s, two `u16`s and an `i32`.
    pub const SIZE: usize = 2 * size_of::<libc::c_long>() + 8;

    pub fn decode(buf: &[u8]) -> Option<Self> {
        Self::decode_with_word(buf, size_of::<libc::c_long>())
    }

    fn decode_with_word(buf: &[u8], word: usize) -> Option<Self> {
        if buf.len() < 2 * word + 8 {
            return None;
        }
        let long_at = |off: usize| -> i64 {
            if word == 8 {
                i64::from_ne_bytes(buf[off..off + 8].try_into().unwrap_or([0; 8]))
            } else {
                i64::from(i32::from_ne_bytes(buf[off..off + 4].try_into().unwrap_or([0; 4])))
            }
        };
        let tail = 2 * word;
        Some(Self {
            sec: long_at(0),
            usec: long_at(word),
            kind: u16::from_ne_bytes([buf[tail], buf[tail + 1]]),
            code: u16::from_ne_bytes([buf[tail + 2], buf[tail + 3]]),
            value: i32::from_ne_bytes([buf[tail + 4], buf[tail + 5], buf[tail + 6], buf[tail + 7]]),
        })
    }

    pub fn is_separator(&self) -> bool {
        self.kind == EV_SYN && self.code == SYN_REPORT && self.value == 0
    }

    /// Blocking read of one record; `None` at end of file.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Option<Self>> {
        let mut buf = [0u8; Self::SIZE];
        match reader.read_exact(&mut buf) {
            Ok(()) => Ok(Self::decode(&buf)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Folds raw records into pointer events, one batch per `SYN_REPORT`.
#[derive(Debug, Clone)]
pub struct TouchTracker {
    calibration: Option<TouchCalibration>,
    screen: (u32, u32),
    raw_x: i32,
    raw_y: i32,
    touching: bool,
    reported_touching: bool,
    reported_pos: Option<(i32, i32)>,
    quit: bool,
}

impl TouchTracker {
    pub fn new(calibration: Option<TouchCalibration>, screen: (u32, u32)) -> Self {
        Self {
            calibration,
            screen,
            raw_x: 0,
            raw_y: 0,
            touching: false,
            reported_touching: false,
            reported_pos: None,
            quit: false,
        }
    }

    /// Feeds one record, appending any completed events to `out`.
    pub fn push(&mut self, ev: &RawEvent, out: &mut Vec<InputEvent>) {
        match (ev.kind, ev.code) {
            (EV_ABS, ABS_X) => self.raw_x = ev.value,
            (EV_ABS, ABS_Y) => self.raw_y = ev.value,
            (EV_KEY, BTN_TOUCH | BTN_LEFT) => self.touching = ev.value != 0,
            (EV_KEY, KEY_ESC | KEY_Q) if ev.value == 1 => self.quit = true,
            (EV_SYN, SYN_REPORT) => self.flush(out),
            _ => {}
        }
    }

    fn flush(&mut self, out: &mut Vec<InputEvent>) {
        if self.quit {
            self.quit = false;
            out.push(InputEvent::Quit);
        }

        let (x, y) = self.screen_position();
        let moved = self.reported_pos != Some((x, y));

        match (self.reported_touching, self.touching) {
            (false, true) => out.push(PointerEvent::down(x, y).into()),
            (true, false) => out.push(PointerEvent::up(x, y).into()),
            _ if moved => out.push(PointerEvent::moved(x, y).into()),
            _ => return,
        }
        self.reported_touching = self.touching;
        self.reported_pos = Some((x, y));
    }

    pub fn screen_position(&self) -> (i32, i32) {
        map_point(self.calibration.as_ref(), self.raw_x, self.raw_y, self.screen)
    }
}

/// Raw controller coordinates to screen pixels. Without calibration the raw
/// values are taken as pixels.
pub fn map_point(
    calibration: Option<&TouchCalibration>,
    raw_x: i32,
    raw_y: i32,
    (width, height): (u32, u32),
) -> (i32, i32) {
    let Some(cal) = calibration else {
        return (raw_x, raw_y);
    };
    let (rx, ry) = if cal.swap_xy {
        (raw_y, raw_x)
    } else {
        (raw_x, raw_y)
    };
    let x = scale_axis(rx, cal.min_x, cal.max_x, width, cal.invert_x);
    let y = scale_axis(ry, cal.min_y, cal.max_y, height, cal.invert_y);
    (x, y)
}

fn scale_axis(value: i32, min: i32, max: i32, extent: u32, invert: bool) -> i32 {
    let span = i64::from(max) - i64::from(min);
    if span == 0 || extent == 0 {
        return value;
    }
    let extent = i64::from(extent);
    let clamped = i64::from(value).clamp(min.min(max) as i64, min.max(max) as i64);
    let mut pos = (clamped - i64::from(min)) * (extent - 1) / span;
    if invert {
        pos = extent - 1 - pos;
    }
    pos.clamp(0, extent - 1) as i32
}

pub struct EvdevSource {
    path: PathBuf,
    file: File,
    tracker: TouchTracker,
    pending: Vec<u8>,
}

impl EvdevSource {
    pub fn open(
        path: &Path,
        calibration: Option<TouchCalibration>,
        screen: (u32, u32),
    ) -> Result<Self, SetupError> {
        let file = File::open(path).map_err(|source| SetupError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            device = %path.display(),
            calibrated = calibration.is_some(),
            "touch input opened"
        );
        Ok(Self {
            path: path.to_path_buf(),
            file,
            tracker: TouchTracker::new(calibration, screen),
            pending: Vec::with_capacity(RawEvent::SIZE * 64),
        })
    }

    /// Waits up to `timeout_ms` for the device to become readable.
    fn wait_readable(&self, timeout_ms: i32) -> Result<bool> {
        let mut fds = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `fds` is a valid, exclusively borrowed pollfd for the call.
        let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err).with_context(|| format!("poll {}", self.path.display()));
        }
        if fds.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            anyhow::bail!("input device {} went away", self.path.display());
        }
        Ok(rc > 0 && fds.revents & libc::POLLIN != 0)
    }

    fn read_available(&mut self, out: &mut Vec<InputEvent>) -> Result<()> {
        let mut buf = [0u8; RawEvent::SIZE * 64];
        let n = self
            .file
            .read(&mut buf)
            .with_context(|| format!("read {}", self.path.display()))?;
        self.pending.extend_from_slice(&buf[..n]);

        let whole = self.pending.len() / RawEvent::SIZE * RawEvent::SIZE;
        for record in self.pending[..whole].chunks_exact(RawEvent::SIZE) {
            if let Some(ev) = RawEvent::decode(record) {
                trace!(kind = ev.kind, code = ev.code, value = ev.value, "raw input");
                self.tracker.push(&ev, out);
            }
        }
        self.pending.drain(..whole);
        Ok(())
    }
}

impl InputSource for EvdevSource {
    fn poll(&mut self, deadline: Instant) -> Result<Vec<InputEvent>> {
        let mut out = Vec::new();
        loop {
            if signals::quit_requested() {
                debug!("quit signal received");
                out.push(InputEvent::Quit);
                return Ok(out);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(out);
            }
            let timeout_ms = remaining.as_millis().clamp(1, i32::MAX as u128) as i32;
            if self.wait_readable(timeout_ms)? {
                self.read_available(&mut out)?;
            }
        }
    }
}
