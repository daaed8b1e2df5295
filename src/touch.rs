//! Capacitive touch input with time-gated debouncing.
//!
//! The lamp has three touch pads: front (power), left (brightness) and
//! right (animation mode).

use embassy_time::{Duration, Instant};

/// Minimum time between two accepted presses on the same pad
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(350);

const SENSOR_COUNT: usize = 3;

/// Touch pad position on the lamp body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TouchSensor {
    /// Toggles power
    Front = 0,
    /// Cycles brightness
    Left = 1,
    /// Cycles animation mode
    Right = 2,
}

impl TouchSensor {
    /// All pads, in evaluation order
    pub const ALL: [Self; SENSOR_COUNT] = [Self::Front, Self::Left, Self::Right];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Touch controller driver
///
/// Implement this trait on top of the board's touch peripheral. A failed
/// read must be reported as "not touched".
pub trait TouchInput {
    /// Prepare the touch controller
    fn begin(&mut self) {}

    /// Sample all pads once; called at the start of every tick
    fn update(&mut self) {}

    /// Raw touch level of a pad as of the last `update`
    fn is_raw_touched(&mut self, sensor: TouchSensor) -> bool;
}

/// Pads whose press was accepted during one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchEvents {
    pressed: [bool; SENSOR_COUNT],
}

impl TouchEvents {
    /// Check if a press on `sensor` was accepted
    pub const fn is_pressed(self, sensor: TouchSensor) -> bool {
        self.pressed[sensor.index()]
    }

    /// Check if any press was accepted
    pub fn any(self) -> bool {
        self.pressed.iter().any(|pressed| *pressed)
    }

    /// Iterate over accepted presses in evaluation order
    pub fn iter(self) -> impl Iterator<Item = TouchSensor> {
        TouchSensor::ALL
            .into_iter()
            .filter(move |sensor| self.is_pressed(*sensor))
    }
}

/// Per-pad debouncer
///
/// A press is accepted when the pad reads touched and more than
/// `interval` has passed since the last accepted press on that pad.
#[derive(Debug, Clone)]
pub struct TouchDebouncer {
    interval: Duration,
    last_accepted: [Option<Instant>; SENSOR_COUNT],
}

impl Default for TouchDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_INTERVAL)
    }
}

impl TouchDebouncer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: [None; SENSOR_COUNT],
        }
    }

    /// Gate a raw reading
    ///
    /// Returns `true` if the press is accepted; only then is the pad's
    /// timestamp updated.
    pub fn accept(&mut self, sensor: TouchSensor, touched: bool, now: Instant) -> bool {
        if !touched {
            return false;
        }
        let last = &mut self.last_accepted[sensor.index()];
        if let Some(last_time) = *last {
            if now.saturating_duration_since(last_time) <= self.interval {
                return false;
            }
        }
        *last = Some(now);
        true
    }

    /// Sample the touch controller and debounce every pad
    pub fn poll<T: TouchInput>(&mut self, input: &mut T, now: Instant) -> TouchEvents {
        input.update();

        let mut events = TouchEvents::default();
        for sensor in TouchSensor::ALL {
            let touched = input.is_raw_touched(sensor);
            events.pressed[sensor.index()] = self.accept(sensor, touched, now);
        }
        events
    }
}
