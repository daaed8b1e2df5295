//! Render effects for the continuous animation slot
//!
//! Effects write raw, unscaled colors; brightness, power and gamma are
//! applied later by the renderer. All effects are stored side by side so
//! flicker history survives mode switches.

mod flame;
mod solid;

use fastrand::Rng;

pub use flame::{FLICKER_BLEND, FlameEffect, NIGHT_ACCENT_COLOR, NIGHT_ACCENT_PIXELS, NightFlameEffect};
pub use solid::{SOLID_COLOR, SolidEffect};

use crate::color::Rgb;

const MODE_NAME_FLAME: &str = "flame";
const MODE_NAME_SOLID: &str = "solid";
const MODE_NAME_NIGHT_FLAME: &str = "night_flame";

const MODE_ID_FLAME: u8 = 0;
const MODE_ID_SOLID: u8 = 1;
const MODE_ID_NIGHT_FLAME: u8 = 2;

pub trait Effect {
    /// Render a single frame into `leds`
    fn render(&mut self, rng: &mut Rng, leds: &mut [Rgb]);
}

/// Animation mode selected with the right pad
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum AnimationMode {
    #[default]
    Flame = MODE_ID_FLAME,
    Solid = MODE_ID_SOLID,
    NightFlame = MODE_ID_NIGHT_FLAME,
}

impl AnimationMode {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_FLAME => Self::Flame,
            MODE_ID_SOLID => Self::Solid,
            MODE_ID_NIGHT_FLAME => Self::NightFlame,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Next mode in the cycle, wrapping around
    pub const fn next(self) -> Self {
        match self {
            Self::Flame => Self::Solid,
            Self::Solid => Self::NightFlame,
            Self::NightFlame => Self::Flame,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flame => MODE_NAME_FLAME,
            Self::Solid => MODE_NAME_SOLID,
            Self::NightFlame => MODE_NAME_NIGHT_FLAME,
        }
    }
}

/// One instance of every effect, for a strip of `N` pixels
#[derive(Debug, Clone)]
pub struct EffectSet<const N: usize> {
    flame: FlameEffect<N>,
    solid: SolidEffect,
    night_flame: NightFlameEffect<N>,
}

impl<const N: usize> Default for EffectSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EffectSet<N> {
    pub const fn new() -> Self {
        Self {
            flame: FlameEffect::new(),
            solid: SolidEffect::new(SOLID_COLOR),
            night_flame: NightFlameEffect::new(),
        }
    }

    /// Render the effect for `mode`
    pub fn render(&mut self, mode: AnimationMode, rng: &mut Rng, leds: &mut [Rgb]) {
        match mode {
            AnimationMode::Flame => self.flame.render(rng, leds),
            AnimationMode::Solid => self.solid.render(rng, leds),
            AnimationMode::NightFlame => self.night_flame.render(rng, leds),
        }
    }
}
