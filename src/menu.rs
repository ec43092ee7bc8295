pub mod button;
pub mod controller;
pub mod event;
pub mod render;

pub use button::{dispatch, Button, ButtonState};
pub use controller::{FrameClock, Menu, MenuResult, FRAME_RATE};
pub use event::{InputEvent, PointerEvent, PointerKind};
pub use render::render;
