pub mod canvas;
pub mod config;
pub mod error;
pub mod layout;
pub mod menu;
pub mod platform;
pub mod style;
