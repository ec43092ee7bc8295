use std::collections::HashMap;

use embedded_graphics::pixelcolor::Rgb888;
use serde::Deserialize;
use tracing::warn;

use crate::config::{MenuConfig, StyleSpec};
use crate::error::StyleWarning;

/// A color as written in the menu file: a name, `#rrggbb` / `#rgb`, or `[r, g, b]`.
///
/// Any other JSON value lands in `Other` so a bad color never fails the
/// whole file; it is rejected later by [`ColorSpec::parse`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Rgb([u8; 3]),
    Name(String),
    Other(serde_json::Value),
}

impl ColorSpec {
    pub fn parse(&self) -> Option<Rgb888> {
        match self {
            ColorSpec::Rgb([r, g, b]) => Some(Rgb888::new(*r, *g, *b)),
            ColorSpec::Name(name) => parse_color(name),
            ColorSpec::Other(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            ColorSpec::Rgb([r, g, b]) => format!("[{r}, {g}, {b}]"),
            ColorSpec::Name(name) => name.clone(),
            ColorSpec::Other(value) => value.to_string(),
        }
    }
}

pub const DEFAULT_BACKGROUND: Rgb888 = Rgb888::new(30, 30, 30);
pub const DEFAULT_TEXT: Rgb888 = Rgb888::new(255, 255, 255);

/// Colors for one button in each of its states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub normal: Rgb888,
    pub hover: Rgb888,
    pub down: Rgb888,
    pub text: Rgb888,
}

impl Palette {
    /// dodgerblue1 / lightskyblue / aquamarine1 with white labels.
    pub const DEFAULT: Palette = Palette {
        normal: Rgb888::new(30, 144, 255),
        hover: Rgb888::new(135, 206, 250),
        down: Rgb888::new(127, 255, 212),
        text: DEFAULT_TEXT,
    };
}

const NAMED_COLORS: &[(&str, Rgb888)] = &[
    ("black", Rgb888::new(0, 0, 0)),
    ("white", Rgb888::new(255, 255, 255)),
    ("red", Rgb888::new(255, 0, 0)),
    ("green", Rgb888::new(0, 255, 0)),
    ("blue", Rgb888::new(0, 0, 255)),
    ("yellow", Rgb888::new(255, 255, 0)),
    ("orange", Rgb888::new(255, 165, 0)),
    ("gray", Rgb888::new(128, 128, 128)),
    ("grey", Rgb888::new(128, 128, 128)),
    ("darkgray", Rgb888::new(64, 64, 64)),
    ("dodgerblue", Rgb888::new(30, 144, 255)),
    ("dodgerblue1", Rgb888::new(30, 144, 255)),
    ("lightskyblue", Rgb888::new(135, 206, 250)),
    ("aquamarine", Rgb888::new(127, 255, 212)),
    ("aquamarine1", Rgb888::new(127, 255, 212)),
    ("firebrick", Rgb888::new(178, 34, 34)),
    ("tomato", Rgb888::new(255, 99, 71)),
    ("salmon", Rgb888::new(250, 128, 114)),
    ("seagreen", Rgb888::new(46, 139, 87)),
    ("limegreen", Rgb888::new(50, 205, 50)),
    ("gold", Rgb888::new(255, 215, 0)),
];

pub fn parse_color(value: &str) -> Option<Rgb888> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
}

fn parse_hex(hex: &str) -> Option<Rgb888> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb888::new(r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgb888::new(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Looks up the palette for a button's `style`.
///
/// A button without a style uses the `"default"` entry of `styles` if one
/// exists and the built-in palette otherwise. Every fallback taken for a
/// named style is reported as a warning.
pub fn resolve_palette(
    styles: &HashMap<String, StyleSpec>,
    style: Option<&str>,
    text_fallback: Rgb888,
) -> (Palette, Vec<StyleWarning>) {
    let mut warnings = Vec::new();
    let base = Palette {
        text: text_fallback,
        ..Palette::DEFAULT
    };

    let (name, spec) = match style {
        Some(name) => match styles.get(name) {
            Some(spec) => (name, spec),
            None => {
                warnings.push(StyleWarning::UnknownStyle {
                    style: name.to_string(),
                });
                return (base, warnings);
            }
        },
        None => match styles.get("default") {
            Some(spec) => ("default", spec),
            None => return (base, warnings),
        },
    };

    let mut pick = |state: &'static str, color: &Option<ColorSpec>, fallback: Rgb888| {
        match color {
            Some(color) => color.parse().unwrap_or_else(|| {
                warnings.push(StyleWarning::BadColor {
                    role: format!("style '{name}' state '{state}'"),
                    value: color.describe(),
                });
                fallback
            }),
            None => {
                warnings.push(StyleWarning::MissingState {
                    style: name.to_string(),
                    state,
                });
                fallback
            }
        }
    };

    let normal = pick("normal", &spec.normal, base.normal);
    let hover = pick("hover", &spec.hover, base.hover);
    let down = pick("down", &spec.down, base.down);
    // Label color is optional per style.
    let text = match &spec.text {
        Some(_) => pick("text", &spec.text, base.text),
        None => base.text,
    };

    (
        Palette {
            normal,
            hover,
            down,
            text,
        },
        warnings,
    )
}

/// Resolves an optional top-level color, falling back with a warning when it
/// cannot be parsed.
pub fn resolve_color(
    role: &str,
    color: Option<&ColorSpec>,
    fallback: Rgb888,
) -> (Rgb888, Option<StyleWarning>) {
    match color {
        None => (fallback, None),
        Some(spec) => match spec.parse() {
            Some(c) => (c, None),
            None => (
                fallback,
                Some(StyleWarning::BadColor {
                    role: role.to_string(),
                    value: spec.describe(),
                }),
            ),
        },
    }
}

/// Screen-wide colors for a menu, logging any fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb888,
    pub text: Rgb888,
}

impl Theme {
    pub fn from_config(cfg: &MenuConfig) -> Self {
        let (background, w1) =
            resolve_color("background", cfg.background.as_ref(), DEFAULT_BACKGROUND);
        let (text, w2) = resolve_color("text_color", cfg.text_color.as_ref(), DEFAULT_TEXT);
        for warning in w1.into_iter().chain(w2) {
            warn!(%warning, "style lookup");
        }
        Self { background, text }
    }

    pub fn palette_for(&self, cfg: &MenuConfig, style: Option<&str>) -> Palette {
        let (palette, warnings) = resolve_palette(&cfg.styles, style, self.text);
        for warning in warnings {
            warn!(%warning, "style lookup");
        }
        palette
    }
}
