//! Solid color fill effect

use fastrand::Rng;

use super::Effect;
use crate::color::Rgb;

/// Warm orange used by the solid mode
pub const SOLID_COLOR: Rgb = Rgb { r: 255, g: 64, b: 0 };

/// Fills all LEDs with one color
#[derive(Debug, Clone)]
pub struct SolidEffect {
    color: Rgb,
}

impl SolidEffect {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Effect for SolidEffect {
    fn render(&mut self, _rng: &mut Rng, leds: &mut [Rgb]) {
        for led in leds {
            *led = self.color;
        }
    }
}
