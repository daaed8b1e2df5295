//! Main loop and frame pacing
//!
//! Provides the lamp's tick without async/await or platform-specific timers.
//! The caller is responsible for sleeping between ticks.

use embassy_time::{Duration, Instant};
use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::ambient::{AmbientSensor, LightSmoother, SMOOTHING_WINDOW};
use crate::color::BLACK;
use crate::config::LampConfig;
use crate::lamp::Lamp;
use crate::renderer::Renderer;
use crate::settings::{PersistedSettings, SettingsStore};
use crate::touch::{TouchDebouncer, TouchInput};
use crate::OutputDriver;

/// Result of a tick
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether settings were written during this tick.
    pub saved: bool,
}

/// Board collaborators the lamp talks to
pub struct Peripherals<T, A, O, S> {
    pub touch: T,
    pub ambient: A,
    pub strip: O,
    pub storage: S,
}

/// Portable tick loop that owns the lamp and its peripherals.
///
/// Each tick:
/// 1. samples the ambient sensor and the touch pads
/// 2. debounces touches
/// 3. runs the state machine and advances animations
/// 4. renders and transmits the frame
/// 5. persists settings if the user changed any
///
/// # Usage
///
/// ```ignore
/// let mut lamp = FrameScheduler::<_, _, _, _, STRIP_LEN>::boot(peripherals, 0, &config, now());
///
/// loop {
///     let result = lamp.tick(now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<T, A, O, S, const N: usize>
where
    T: TouchInput,
    A: AmbientSensor,
    O: OutputDriver,
    S: Storage,
{
    touch: T,
    ambient: A,
    strip: O,
    settings: SettingsStore<S>,

    lamp: Lamp<N>,
    renderer: Renderer<N>,
    debouncer: TouchDebouncer,
    smoother: LightSmoother<SMOOTHING_WINDOW>,

    next_frame: Instant,
    frame_duration: Duration,
}

impl<T, A, O, S, const N: usize> FrameScheduler<T, A, O, S, N>
where
    T: TouchInput,
    A: AmbientSensor,
    O: OutputDriver,
    S: Storage,
{
    /// Initialize peripherals, restore settings and start the boot fade.
    ///
    /// The settings record lives at `settings_offset` within the storage.
    pub fn boot(
        peripherals: Peripherals<T, A, O, S>,
        settings_offset: u32,
        config: &LampConfig,
        now: Instant,
    ) -> Self {
        let Peripherals {
            mut touch,
            mut ambient,
            mut strip,
            storage,
        } = peripherals;

        strip.begin();
        strip.write(&[BLACK; N]);
        touch.begin();
        ambient.begin();

        let mut settings = SettingsStore::new(storage, settings_offset);
        let restored = settings.load_or_default();

        Self {
            touch,
            ambient,
            strip,
            settings,
            lamp: Lamp::new(config, &restored, now),
            renderer: Renderer::new(),
            debouncer: TouchDebouncer::new(config.timings.debounce),
            smoother: LightSmoother::new(),
            next_frame: now,
            frame_duration: config.timings.tick,
        }
    }

    /// Process one tick and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to now
        let max_drift = Duration::from_millis(self.frame_duration.as_millis() * 2);
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        if let Some(raw) = self.ambient.read_raw() {
            self.smoother.add_sample(raw);
        }
        let touches = self.debouncer.poll(&mut self.touch, now);
        let ambient = (!self.smoother.is_empty()).then(|| self.smoother.smoothed());

        let dirty = self.lamp.update(touches, ambient, now);

        self.renderer.render(
            &mut self.strip,
            self.lamp.frame(),
            self.lamp.brightness(),
            self.lamp.power_coefficient(),
        );

        let saved = dirty && {
            let settings = self.lamp.settings();
            self.persist(&settings)
        };

        self.next_frame += self.frame_duration;
        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            saved,
        }
    }

    fn persist(&mut self, settings: &PersistedSettings) -> bool {
        match self.settings.save(settings) {
            Ok(()) => true,
            Err(_) => {
                #[cfg(feature = "esp32-log")]
                println!("[FrameScheduler.persist] failed to save settings");
                false
            }
        }
    }

    pub const fn lamp(&self) -> &Lamp<N> {
        &self.lamp
    }

    pub const fn renderer(&self) -> &Renderer<N> {
        &self.renderer
    }

    pub const fn touch_mut(&mut self) -> &mut T {
        &mut self.touch
    }

    pub const fn ambient_mut(&mut self) -> &mut A {
        &mut self.ambient
    }

    pub const fn strip(&self) -> &O {
        &self.strip
    }

    pub const fn settings(&self) -> &SettingsStore<S> {
        &self.settings
    }
}
