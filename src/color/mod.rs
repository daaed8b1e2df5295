mod blend;

use smart_leds::RGB8;

pub use blend::{linear_blend, scale_color};

pub type Rgb = RGB8;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
