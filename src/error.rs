use std::{io, path::PathBuf};

use thiserror::Error;

/// Menu description could not be turned into a usable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading menu config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing menu config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("menu config has no buttons; at least one entry in `buttons` is required")]
    NoButtons,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cannot lay out a menu with zero buttons")]
    NoButtons,

    #[error("a {rows}x{columns} grid cannot place {buttons} buttons")]
    Capacity {
        buttons: usize,
        rows: usize,
        columns: usize,
    },

    #[error("screen size {width}x{height} has no drawable area")]
    EmptyScreen { width: u32, height: u32 },
}

/// Display or pointer device could not be acquired.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("framebuffer {path}: {reason}")]
    Display { path: PathBuf, reason: String },

    #[error("opening input device {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("installing handler for signal {signal}: {source}")]
    Signal {
        signal: i32,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal style lookup problem; the default color is used instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleWarning {
    #[error("style '{style}' is not defined; using the default palette")]
    UnknownStyle { style: String },

    #[error("style '{style}' has no '{state}' color; using the default")]
    MissingState { style: String, state: &'static str },

    #[error("unrecognized color '{value}' for {role}; using the default")]
    BadColor { role: String, value: String },
}
