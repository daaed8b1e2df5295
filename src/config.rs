use embassy_time::Duration;

use crate::ambient::AmbientConfig;
use crate::touch::DEBOUNCE_INTERVAL;

/// Number of LEDs on the reference lamp
pub const STRIP_LEN: usize = 25;

/// Durations of the lamp's animations and loop
#[derive(Debug, Clone, Copy)]
pub struct LampTimings {
    /// Power on/off fade
    pub power_fade: Duration,
    /// Fade-in after boot
    pub boot_fade: Duration,
    /// Fade between two manual brightness steps
    pub brightness_fade: Duration,
    /// Fade towards a new automatic brightness target
    pub ambient_fade: Duration,
    /// One cycle of the continuous render animation
    pub render_cycle: Duration,
    /// Main loop period
    pub tick: Duration,
    /// Minimum time between two presses on the same pad
    pub debounce: Duration,
}

impl Default for LampTimings {
    fn default() -> Self {
        Self {
            power_fade: Duration::from_millis(750),
            boot_fade: Duration::from_millis(1000),
            brightness_fade: Duration::from_millis(500),
            ambient_fade: Duration::from_millis(1000),
            render_cycle: Duration::from_millis(2000),
            tick: Duration::from_millis(10),
            debounce: DEBOUNCE_INTERVAL,
        }
    }
}

/// Configuration for the lamp
#[derive(Debug, Clone, Copy)]
pub struct LampConfig {
    pub timings: LampTimings,
    pub ambient: AmbientConfig,
    /// Seed of the flicker random generator
    pub seed: u64,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            timings: LampTimings::default(),
            ambient: AmbientConfig::default(),
            seed: 0x0CA1_C1FE,
        }
    }
}
