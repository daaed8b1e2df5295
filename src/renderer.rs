//! Output stage of the render pipeline
//!
//! Scales the raw frame by brightness and power, applies gamma correction
//! and hands the result to the LED driver. This is the only place where the
//! applied brightness and the power coefficient take effect.

use crate::OutputDriver;
use crate::color::{BLACK, Rgb, scale_color};
use crate::gamma::gamma_correct;

/// Combined output scale, clamped to `0.0..=1.0`
pub fn output_scale(brightness: f32, power_coefficient: f32) -> f32 {
    let brightness = if brightness.is_nan() { 0.0 } else { brightness };
    let power = if power_coefficient.is_nan() { 0.0 } else { power_coefficient };
    (brightness.clamp(0.0, 1.0) * power.clamp(0.0, 1.0)).clamp(0.0, 1.0)
}

/// Scale a raw color for output, without gamma correction
pub fn scale_pixel(color: Rgb, brightness: f32, power_coefficient: f32) -> Rgb {
    scale_color(color, output_scale(brightness, power_coefficient))
}

/// Renderer - turns raw frames into driver output
pub struct Renderer<const N: usize> {
    output: [Rgb; N],
}

impl<const N: usize> Default for Renderer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Renderer<N> {
    pub const fn new() -> Self {
        Self { output: [BLACK; N] }
    }

    /// Last frame handed to the driver
    pub const fn output(&self) -> &[Rgb; N] {
        &self.output
    }

    /// Compose the output frame
    pub fn compose(&mut self, frame: &[Rgb; N], brightness: f32, power_coefficient: f32) -> &[Rgb] {
        let scale = output_scale(brightness, power_coefficient);
        for (out, pixel) in self.output.iter_mut().zip(frame.iter()) {
            *out = gamma_correct(scale_color(*pixel, scale));
        }
        &self.output
    }

    /// Compose the output frame and transmit it
    ///
    /// Transmission is best-effort; drivers report no errors.
    pub fn render<O: OutputDriver>(
        &mut self,
        driver: &mut O,
        frame: &[Rgb; N],
        brightness: f32,
        power_coefficient: f32,
    ) {
        self.compose(frame, brightness, power_coefficient);
        driver.write(&self.output);
    }
}
