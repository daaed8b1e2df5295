//! Flickering flame effects
//!
//! Every frame each pixel draws a random red/orange color and moves 23% of
//! the way towards it from its previous value. The history is kept inside
//! the effect, so anything drawn over the frame buffer afterwards (accent
//! pixels, fade-out tints) does not leak into the next frame.

use fastrand::Rng;

use super::Effect;
use crate::color::{BLACK, Rgb, linear_blend};

/// Share of the freshly drawn color mixed into each pixel per frame
pub const FLICKER_BLEND: f32 = 0.23;

/// Pilot-light color drawn by the night flame
pub const NIGHT_ACCENT_COLOR: Rgb = Rgb { r: 255, g: 0, b: 50 };

/// Pixels overwritten with [`NIGHT_ACCENT_COLOR`]
pub const NIGHT_ACCENT_PIXELS: [usize; 3] = [0, 8, 16];

const RED_RANGE: core::ops::Range<u8> = 120..255;
const GREEN_RANGE: core::ops::Range<u8> = 0..20;
const FLICKER_RANGE: core::ops::Range<u8> = 0..140;

/// Randomized flame flicker
#[derive(Debug, Clone)]
pub struct FlameEffect<const N: usize> {
    previous: [Rgb; N],
}

impl<const N: usize> Default for FlameEffect<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FlameEffect<N> {
    pub const fn new() -> Self {
        Self {
            previous: [BLACK; N],
        }
    }

    /// Colors produced by the last frame
    pub const fn previous(&self) -> &[Rgb; N] {
        &self.previous
    }

    /// Draw a new target color for one pixel
    pub fn spark(rng: &mut Rng) -> Rgb {
        let red = rng.u8(RED_RANGE);
        let green = rng.u8(GREEN_RANGE);
        let flicker = rng.u8(FLICKER_RANGE);
        Rgb {
            r: red.saturating_add(flicker),
            g: green.saturating_add(flicker),
            b: 0,
        }
    }
}

impl<const N: usize> Effect for FlameEffect<N> {
    fn render(&mut self, rng: &mut Rng, leds: &mut [Rgb]) {
        for (led, previous) in leds.iter_mut().zip(self.previous.iter_mut()) {
            let blended = linear_blend(*previous, Self::spark(rng), FLICKER_BLEND);
            *previous = blended;
            *led = blended;
        }
    }
}

/// Flame with a few fixed pilot-light pixels
#[derive(Debug, Clone)]
pub struct NightFlameEffect<const N: usize> {
    flame: FlameEffect<N>,
}

impl<const N: usize> Default for NightFlameEffect<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NightFlameEffect<N> {
    pub const fn new() -> Self {
        Self {
            flame: FlameEffect::new(),
        }
    }

    /// Colors produced by the last flame pass, before the accents
    pub const fn previous(&self) -> &[Rgb; N] {
        self.flame.previous()
    }
}

impl<const N: usize> Effect for NightFlameEffect<N> {
    fn render(&mut self, rng: &mut Rng, leds: &mut [Rgb]) {
        self.flame.render(rng, leds);
        for index in NIGHT_ACCENT_PIXELS {
            if let Some(led) = leds.get_mut(index) {
                *led = NIGHT_ACCENT_COLOR;
            }
        }
    }
}
