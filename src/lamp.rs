//! Power, brightness and mode state machine
//!
//! Interprets debounced touches and ambient light, and drives the
//! animation scheduler. It is the only writer of the power state, the
//! brightness step and the animation mode; the scheduler's callbacks are
//! the only writers of the applied brightness, the power coefficient and
//! the frame buffer.

use embassy_time::{Duration, Instant};
use fastrand::Rng;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::ambient::AutoBrightness;
use crate::brightness::BrightnessStep;
use crate::color::{BLACK, Rgb, linear_blend};
use crate::config::LampConfig;
use crate::ease::{cubic_in_out, interpolate};
use crate::effect::{AnimationMode, EffectSet};
use crate::scheduler::{AnimationParam, AnimationScheduler, TaskKind};
use crate::settings::{PersistedSettings, finite_brightness};
use crate::touch::{TouchEvents, TouchSensor};

/// Number of animation slots
pub const ANIMATION_SLOTS: usize = 4;
/// Slot of the continuous render effect
pub const SLOT_RENDER: usize = 0;
/// Slot of the power on/off fade
pub const SLOT_POWER: usize = 1;
/// Slot of the brightness fade
pub const SLOT_BRIGHTNESS: usize = 2;

/// Tint blended over the night flame while it powers off
pub const SOFT_STOP_TINT: Rgb = Rgb { r: 0, g: 255, b: 255 };
/// Share of [`SOFT_STOP_TINT`] blended in per frame
pub const SOFT_STOP_TINT_BLEND: f32 = 0.4;

/// Animations the lamp schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// Continuous effect rendering
    Render(AnimationMode),
    /// Power coefficient 0 to 1
    SoftStart,
    /// Power coefficient 1 to 0
    SoftStop,
    /// Applied brightness from the fade source to the fade target
    BrightnessFade,
}

/// Soft power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Off,
    On,
}

/// Observable lamp state
#[derive(Debug, Clone, Copy)]
pub struct LampState {
    pub power: Power,
    pub step: BrightnessStep,
    pub previous_step: BrightnessStep,
    pub mode: AnimationMode,
    /// Brightness applied to the frame, `0.0..=1.0`
    pub brightness: f32,
    /// Brightness the current fade started from
    pub fade_from: f32,
    /// Brightness the current fade ends at
    pub fade_to: f32,
    /// Soft power multiplier, `0.0..=1.0`
    pub power_coefficient: f32,
}

/// The lamp core
///
/// Owns all mutable lamp state. Drive it with [`Lamp::update`] once per tick,
/// then hand [`Lamp::frame`] to the renderer.
pub struct Lamp<const N: usize> {
    config: LampConfig,
    state: LampState,
    scheduler: AnimationScheduler<Animation, ANIMATION_SLOTS>,
    effects: EffectSet<N>,
    frame: [Rgb; N],
    auto: AutoBrightness,
    rng: Rng,
}

impl<const N: usize> Lamp<N> {
    /// Boot the lamp from restored settings
    ///
    /// The lamp starts powered on with a soft start fade. Non-finite
    /// brightness values fall back to the step's table value.
    pub fn new(config: &LampConfig, settings: &PersistedSettings, now: Instant) -> Self {
        let step_value = settings.current_step.value().unwrap_or(1.0);
        let brightness = finite_brightness(settings.current_value, step_value);
        let mut lamp = Self {
            config: *config,
            state: LampState {
                power: Power::On,
                step: settings.current_step,
                previous_step: settings.previous_step,
                mode: settings.mode,
                brightness,
                fade_from: finite_brightness(settings.previous_value, brightness),
                fade_to: brightness,
                power_coefficient: 0.0,
            },
            scheduler: AnimationScheduler::new(),
            effects: EffectSet::new(),
            frame: [BLACK; N],
            auto: AutoBrightness::new(config.ambient, brightness),
            rng: Rng::with_seed(config.seed),
        };
        lamp.start_with(
            SLOT_POWER,
            now,
            config.timings.boot_fade,
            TaskKind::OneShot,
            Animation::SoftStart,
        );
        lamp.rearm_render(now);
        lamp
    }

    pub const fn state(&self) -> &LampState {
        &self.state
    }

    pub const fn power(&self) -> Power {
        self.state.power
    }

    pub const fn brightness_step(&self) -> BrightnessStep {
        self.state.step
    }

    pub const fn mode(&self) -> AnimationMode {
        self.state.mode
    }

    /// Brightness applied to the frame
    pub const fn brightness(&self) -> f32 {
        self.state.brightness
    }

    pub const fn power_coefficient(&self) -> f32 {
        self.state.power_coefficient
    }

    /// Raw colors of the current frame, before brightness and gamma
    pub const fn frame(&self) -> &[Rgb; N] {
        &self.frame
    }

    pub const fn scheduler(&self) -> &AnimationScheduler<Animation, ANIMATION_SLOTS> {
        &self.scheduler
    }

    pub const fn auto_brightness(&self) -> &AutoBrightness {
        &self.auto
    }

    /// Settings record reflecting the current state
    pub fn settings(&self) -> PersistedSettings {
        PersistedSettings {
            current_step: self.state.step,
            previous_step: self.state.previous_step,
            current_value: self.state.fade_to,
            previous_value: self.state.fade_from,
            mode: self.state.mode,
        }
    }

    /// Run the state machine for one tick
    ///
    /// Order: touches, automatic brightness, render re-arm, animation
    /// advance. Returns `true` if a user change should be persisted.
    pub fn update(&mut self, touches: TouchEvents, ambient: Option<f32>, now: Instant) -> bool {
        let mut dirty = false;
        for sensor in touches.iter() {
            dirty |= self.handle_touch(sensor, now);
        }
        if let Some(smoothed_raw) = ambient {
            self.apply_ambient(smoothed_raw, now);
        }
        self.rearm_render(now);
        self.advance(now);
        dirty
    }

    /// React to an accepted press
    ///
    /// Returns `true` if the change should be persisted.
    pub fn handle_touch(&mut self, sensor: TouchSensor, now: Instant) -> bool {
        match sensor {
            TouchSensor::Front => {
                self.toggle_power(now);
                false
            }
            TouchSensor::Left => {
                self.next_brightness(now);
                true
            }
            TouchSensor::Right => {
                self.next_mode(now);
                true
            }
        }
    }

    /// Toggle power with a soft fade
    pub fn toggle_power(&mut self, now: Instant) {
        match self.state.power {
            Power::On => {
                self.state.power = Power::Off;
                if self.state.mode == AnimationMode::NightFlame {
                    let stopped = self.scheduler.stop(SLOT_RENDER);
                    debug_assert!(stopped.is_ok(), "render slot outside the scheduler");
                }
                self.start(SLOT_POWER, now, TaskKind::OneShot, Animation::SoftStop);
            }
            Power::Off => {
                self.state.power = Power::On;
                self.start(SLOT_POWER, now, TaskKind::OneShot, Animation::SoftStart);
            }
        }
        #[cfg(feature = "esp32-log")]
        println!("[Lamp.toggle_power] power {:?}", self.state.power);
    }

    /// Advance to the next brightness step
    ///
    /// Fixed steps fade from the currently applied brightness to the step's
    /// table value. Entering automatic mode leaves brightness to ambient light.
    pub fn next_brightness(&mut self, now: Instant) {
        let step = self.state.step.next();
        self.state.step = step;
        self.state.previous_step = step.previous();
        self.state.fade_from = self.state.brightness;

        if let Some(target) = step.value() {
            self.state.fade_to = target;
            self.start_fade(now, false);
        } else {
            self.state.fade_to = self.state.brightness;
            self.auto.reset(self.state.brightness);
        }
        #[cfg(feature = "esp32-log")]
        println!("[Lamp.next_brightness] step {:?}", step);
    }

    /// Advance to the next animation mode and restart the render slot
    pub fn next_mode(&mut self, now: Instant) {
        self.state.mode = self.state.mode.next();
        self.start(
            SLOT_RENDER,
            now,
            TaskKind::Continuous,
            Animation::Render(self.state.mode),
        );
        #[cfg(feature = "esp32-log")]
        println!("[Lamp.next_mode] mode {}", self.state.mode.as_str());
    }

    /// Evaluate automatic brightness against a smoothed raw sensor reading
    ///
    /// Does nothing unless the automatic step is selected.
    pub fn apply_ambient(&mut self, smoothed_raw: f32, now: Instant) {
        if !self.state.step.is_auto() {
            return;
        }
        let Some(target) = self.auto.evaluate(smoothed_raw) else {
            return;
        };
        self.state.fade_from = self.state.brightness;
        self.state.fade_to = target;
        self.start_fade(now, true);
        #[cfg(feature = "esp32-log")]
        println!("[Lamp.apply_ambient] new target {}", target);
    }

    /// Restart the render slot if it is idle
    pub fn rearm_render(&mut self, now: Instant) {
        if self.scheduler.is_active(SLOT_RENDER) {
            return;
        }
        self.start(
            SLOT_RENDER,
            now,
            TaskKind::Continuous,
            Animation::Render(self.state.mode),
        );
    }

    /// Advance all animations and run their callbacks
    pub fn advance(&mut self, now: Instant) {
        let Self {
            scheduler,
            state,
            effects,
            frame,
            rng,
            ..
        } = self;

        scheduler.update(now, |animation, param: AnimationParam| match animation {
            Animation::Render(mode) => effects.render(mode, rng, &mut frame[..]),
            Animation::SoftStart => {
                state.power_coefficient = cubic_in_out(param.progress);
            }
            Animation::SoftStop => {
                if state.mode == AnimationMode::NightFlame {
                    for led in frame.iter_mut() {
                        *led = linear_blend(*led, SOFT_STOP_TINT, SOFT_STOP_TINT_BLEND);
                    }
                }
                state.power_coefficient = cubic_in_out(1.0 - param.progress);
            }
            Animation::BrightnessFade => {
                state.brightness =
                    interpolate(state.fade_from, state.fade_to, param.progress, cubic_in_out)
                        .clamp(0.0, 1.0);
            }
        });
    }

    fn start_fade(&mut self, now: Instant, ambient: bool) {
        let duration = if ambient {
            self.config.timings.ambient_fade
        } else {
            self.config.timings.brightness_fade
        };
        self.start_with(
            SLOT_BRIGHTNESS,
            now,
            duration,
            TaskKind::OneShot,
            Animation::BrightnessFade,
        );
    }

    fn start(&mut self, slot: usize, now: Instant, kind: TaskKind, animation: Animation) {
        let timings = &self.config.timings;
        let duration = match animation {
            Animation::Render(_) => timings.render_cycle,
            Animation::SoftStart | Animation::SoftStop => timings.power_fade,
            Animation::BrightnessFade => timings.brightness_fade,
        };
        self.start_with(slot, now, duration, kind, animation);
    }

    fn start_with(
        &mut self,
        slot: usize,
        now: Instant,
        duration: Duration,
        kind: TaskKind,
        animation: Animation,
    ) {
        let started = self.scheduler.start(slot, now, duration, kind, animation);
        debug_assert!(started.is_ok(), "slot {} outside the scheduler", slot);
    }
}
