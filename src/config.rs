use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::style::ColorSpec;

#[derive(Debug, Clone, Deserialize)]
pub struct MenuConfig {
    #[serde(default)]
    pub layout: LayoutMode,

    #[serde(default)]
    pub buttons: Vec<ButtonSpec>,

    #[serde(default)]
    pub styles: HashMap<String, StyleSpec>,

    /// Screen fill behind the buttons.
    #[serde(default)]
    pub background: Option<ColorSpec>,

    /// Label color used when a style does not set its own.
    #[serde(default)]
    pub text_color: Option<ColorSpec>,

    #[serde(default)]
    pub touch: Option<TouchCalibration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ButtonSpec {
    #[serde(default = "default_button_text")]
    pub text: String,

    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub style: Option<String>,
}

impl ButtonSpec {
    /// What gets printed when this button is activated.
    pub fn command(&self) -> &str {
        self.cmd.as_deref().unwrap_or(&self.text)
    }
}

fn default_button_text() -> String {
    "unknown text".to_string()
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct StyleSpec {
    #[serde(default)]
    pub normal: Option<ColorSpec>,
    #[serde(default)]
    pub hover: Option<ColorSpec>,
    #[serde(default)]
    pub down: Option<ColorSpec>,
    #[serde(default)]
    pub text: Option<ColorSpec>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
    Grid,
}

impl From<String> for LayoutMode {
    fn from(value: String) -> Self {
        let value = value.trim().to_ascii_lowercase();
        if value.starts_with('v') {
            LayoutMode::Vertical
        } else if value.starts_with('g') || value.starts_with("2d") {
            LayoutMode::Grid
        } else {
            LayoutMode::Horizontal
        }
    }
}

/// Maps raw touch controller coordinates onto screen pixels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TouchCalibration {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    #[serde(default)]
    pub swap_xy: bool,
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default)]
    pub invert_y: bool,
}

pub fn load(path: &Path) -> Result<MenuConfig, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse(&bytes, path)?;
    info!(
        path = %path.display(),
        layout = ?cfg.layout,
        buttons = cfg.buttons.len(),
        "loaded menu config"
    );
    Ok(cfg)
}

pub fn from_str(s: &str) -> Result<MenuConfig, ConfigError> {
    parse(s.as_bytes(), Path::new("<inline>"))
}

fn parse(bytes: &[u8], path: &Path) -> Result<MenuConfig, ConfigError> {
    let cfg: MenuConfig = serde_json::from_slice(bytes).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if cfg.buttons.is_empty() {
        return Err(ConfigError::NoButtons);
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::StyleWarning;
    use crate::style::{resolve_palette, Palette, Theme, DEFAULT_BACKGROUND, DEFAULT_TEXT};

    #[test]
    fn parses_minimal_menu() {
        let cfg = from_str(r#"{"layout": "h", "buttons": [{"text": "A", "cmd": "go-a"}, {"text": "B"}]}"#)
            .unwrap();
        assert_eq!(cfg.layout, LayoutMode::Horizontal);
        assert_eq!(cfg.buttons.len(), 2);
        assert_eq!(cfg.buttons[0].command(), "go-a");
        assert_eq!(cfg.buttons[1].command(), "B");
        assert!(cfg.styles.is_empty());
        assert!(cfg.touch.is_none());
    }

    #[test]
    fn layout_strings_follow_prefix_rules() {
        assert_eq!(LayoutMode::from("v".to_string()), LayoutMode::Vertical);
        assert_eq!(LayoutMode::from("Vertical".to_string()), LayoutMode::Vertical);
        assert_eq!(LayoutMode::from("grid".to_string()), LayoutMode::Grid);
        assert_eq!(LayoutMode::from("2d".to_string()), LayoutMode::Grid);
        assert_eq!(LayoutMode::from("2d-grid".to_string()), LayoutMode::Grid);
        assert_eq!(LayoutMode::from("h".to_string()), LayoutMode::Horizontal);
        assert_eq!(LayoutMode::from("sideways".to_string()), LayoutMode::Horizontal);
    }

    #[test]
    fn missing_layout_defaults_to_horizontal() {
        let cfg = from_str(r#"{"buttons": [{"text": "only"}]}"#).unwrap();
        assert_eq!(cfg.layout, LayoutMode::Horizontal);
    }

    #[test]
    fn missing_text_gets_placeholder() {
        let cfg = from_str(r#"{"buttons": [{"cmd": "reboot"}]}"#).unwrap();
        assert_eq!(cfg.buttons[0].text, "unknown text");
        assert_eq!(cfg.buttons[0].command(), "reboot");
    }

    #[test]
    fn empty_button_list_is_rejected() {
        assert!(matches!(from_str(r#"{"buttons": []}"#), Err(ConfigError::NoButtons)));
        assert!(matches!(from_str(r#"{"layout": "v"}"#), Err(ConfigError::NoButtons)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            from_str(r#"{"buttons": [{"text": 5}]}"#),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(from_str("not json"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn parses_styles_and_calibration() {
        let cfg = from_str(
            r##"{
                "layout": "grid",
                "buttons": [{"text": "Off", "cmd": "poweroff", "style": "danger"}],
                "styles": {"danger": {"normal": "#aa0000", "hover": [255, 64, 64]}},
                "background": "black",
                "touch": {"min_x": 200, "max_x": 3900, "min_y": 300, "max_y": 3800, "swap_xy": true}
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.layout, LayoutMode::Grid);
        let danger = &cfg.styles["danger"];
        assert_eq!(danger.normal, Some(ColorSpec::Name("#aa0000".to_string())));
        assert_eq!(danger.hover, Some(ColorSpec::Rgb([255, 64, 64])));
        assert!(danger.down.is_none());
        let touch = cfg.touch.unwrap();
        assert!(touch.swap_xy);
        assert!(!touch.invert_x);
        assert_eq!(touch.max_y, 3800);
    }

    #[test]
    fn out_of_range_and_mistyped_colors_still_load() {
        let cfg = from_str(
            r#"{
                "buttons": [{"text": "A", "style": "s"}],
                "styles": {"s": {"normal": [300, 0, 0], "hover": {"r": 1}}},
                "background": 5
            }"#,
        )
        .unwrap();
        let theme = Theme::from_config(&cfg);
        assert_eq!(theme.background, DEFAULT_BACKGROUND);
        let palette = theme.palette_for(&cfg, Some("s"));
        assert_eq!(palette.normal, Palette::DEFAULT.normal);
        assert_eq!(palette.hover, Palette::DEFAULT.hover);

        let (_, warnings) = resolve_palette(&cfg.styles, Some("s"), DEFAULT_TEXT);
        assert!(matches!(warnings[0], StyleWarning::BadColor { .. }));
        assert!(matches!(warnings[1], StyleWarning::BadColor { .. }));
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"layout": "v", "buttons": [{{"text": "Shell", "cmd": "sh"}}]}}"#).unwrap();
        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.layout, LayoutMode::Vertical);
        assert_eq!(cfg.buttons[0].command(), "sh");
    }
}
