//! Ambient light sensing and automatic brightness
//!
//! Raw readings from an analog light sensor (TEMT6000-style phototransistor)
//! are averaged over a sliding window, converted to lux with a linear
//! calibration and mapped to a target brightness on a logarithmic curve.

use heapless::HistoryBuffer;
use libm::{fabsf, log10f};

/// Number of samples averaged by the reference smoother
pub const SMOOTHING_WINDOW: usize = 300;

/// Analog light sensor driver
pub trait AmbientSensor {
    /// Prepare the sensor
    fn begin(&mut self) {}

    /// Read one raw sample
    ///
    /// Returns `None` on a read fault; the sample is then skipped.
    fn read_raw(&mut self) -> Option<u16>;
}

/// Calibration and policy for automatic brightness
#[derive(Debug, Clone, Copy)]
pub struct AmbientConfig {
    /// Lux per raw ADC count
    pub lux_per_count: f32,
    /// At or above this level the lamp runs at full brightness
    pub bright_lux: f32,
    /// At or below this level the lamp runs at `floor`
    pub dim_lux: f32,
    /// Lowest brightness chosen automatically
    pub floor: f32,
    /// Minimum target change that triggers a new fade
    pub deadband: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            // 1000 lux over a 10-bit range
            lux_per_count: 1000.0 / 1024.0,
            bright_lux: 150.0,
            dim_lux: 25.0,
            floor: 0.2,
            deadband: 0.05,
        }
    }
}

impl AmbientConfig {
    /// Convert a (smoothed) raw reading to lux
    pub fn lux(&self, raw: f32) -> f32 {
        (raw * self.lux_per_count).max(0.0)
    }

    /// Map an ambient light level to a target brightness
    ///
    /// Full brightness at or above `bright_lux`, `floor` at or below
    /// `dim_lux`, and a log10 interpolation in between.
    pub fn target_brightness(&self, lux: f32) -> f32 {
        if lux.is_nan() {
            return self.floor;
        }
        if lux >= self.bright_lux {
            return 1.0;
        }
        if lux <= self.dim_lux {
            return self.floor;
        }
        let position = log10f(lux / self.dim_lux) / log10f(self.bright_lux / self.dim_lux);
        (self.floor + (1.0 - self.floor) * position).clamp(self.floor, 1.0)
    }
}

/// Moving average over the last `WINDOW` samples
///
/// Until the window fills up, the average covers the samples seen so far.
#[derive(Debug)]
pub struct LightSmoother<const WINDOW: usize = SMOOTHING_WINDOW> {
    samples: HistoryBuffer<f32, WINDOW>,
}

impl<const WINDOW: usize> Default for LightSmoother<WINDOW> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WINDOW: usize> LightSmoother<WINDOW> {
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Add a raw sample
    pub fn add_sample(&mut self, raw: u16) {
        self.samples.write(f32::from(raw));
    }

    /// Number of samples currently averaged
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    /// Average of the samples in the window, `0.0` before the first sample
    #[allow(clippy::cast_precision_loss)]
    pub fn smoothed(&self) -> f32 {
        let count = self.samples.len();
        if count == 0 {
            return 0.0;
        }
        self.samples.as_slice().iter().sum::<f32>() / count as f32
    }
}

/// Deadband filter for automatic brightness targets
///
/// Remembers the last target that was acted upon and only reports a new
/// one when it differs by more than the configured deadband.
#[derive(Debug, Clone, Copy)]
pub struct AutoBrightness {
    config: AmbientConfig,
    baseline: f32,
}

impl AutoBrightness {
    pub const fn new(config: AmbientConfig, baseline: f32) -> Self {
        Self { config, baseline }
    }

    pub const fn config(&self) -> &AmbientConfig {
        &self.config
    }

    /// Last target acted upon
    pub const fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Replace the baseline, e.g. with the brightness shown when
    /// automatic mode is entered
    pub fn reset(&mut self, baseline: f32) {
        self.baseline = baseline.clamp(0.0, 1.0);
    }

    /// Evaluate a smoothed raw reading
    ///
    /// Returns the new target if it escapes the deadband and records it as
    /// the new baseline.
    pub fn evaluate(&mut self, smoothed_raw: f32) -> Option<f32> {
        let lux = self.config.lux(smoothed_raw);
        let target = self.config.target_brightness(lux);
        if fabsf(target - self.baseline) <= self.config.deadband {
            return None;
        }
        self.baseline = target;
        Some(target)
    }
}
