#![no_std]

pub mod ambient;
pub mod brightness;
pub mod color;
pub mod config;
pub mod ease;
pub mod effect;
pub mod frame_scheduler;
pub mod gamma;
pub mod lamp;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod touch;

pub use ambient::{AmbientConfig, AmbientSensor, AutoBrightness, LightSmoother};
pub use brightness::BrightnessStep;
pub use config::{LampConfig, LampTimings, STRIP_LEN};
pub use effect::{AnimationMode, EffectSet};
pub use frame_scheduler::{FrameResult, FrameScheduler, Peripherals};
pub use gamma::ws2812_lut;
pub use lamp::{Animation, Lamp, LampState, Power};
pub use renderer::Renderer;
pub use scheduler::{AnimationParam, AnimationScheduler, AnimationState, TaskKind};
pub use settings::{PersistedSettings, SettingsError, SettingsStore};
pub use touch::{TouchDebouncer, TouchEvents, TouchInput, TouchSensor};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The lamp is generic over this trait.
pub trait OutputDriver {
    /// Prepare the strip
    fn begin(&mut self) {}

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
