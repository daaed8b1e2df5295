//! Persistent user settings
//!
//! The record has a fixed layout of five 4-byte little-endian fields:
//!
//! | offset | field                    | encoding |
//! |--------|--------------------------|----------|
//! | 0      | current brightness step  | `i32`    |
//! | 4      | previous brightness step | `i32`    |
//! | 8      | current brightness       | `f32`    |
//! | 12     | previous brightness      | `f32`    |
//! | 16     | animation mode           | `i32`    |
//!
//! Loaded values are validated: unknown steps and modes fall back to
//! defaults, brightness values are clamped to `0.0..=1.0`.

use embedded_storage::Storage;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::brightness::BrightnessStep;
use crate::effect::AnimationMode;

/// Size of the encoded record in bytes
pub const RECORD_SIZE: usize = 20;

const OFFSET_CURRENT_STEP: usize = 0;
const OFFSET_PREVIOUS_STEP: usize = 4;
const OFFSET_CURRENT_VALUE: usize = 8;
const OFFSET_PREVIOUS_VALUE: usize = 12;
const OFFSET_MODE: usize = 16;

/// Byte value of erased flash
const ERASED: u8 = 0xFF;

/// Error returned by the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError<E> {
    /// Reading from storage failed
    Read(E),
    /// Writing to storage failed
    Write(E),
    /// The record does not fit into the storage region
    OutOfBounds,
}

/// Settings that survive a power cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedSettings {
    pub current_step: BrightnessStep,
    pub previous_step: BrightnessStep,
    /// Brightness applied when the settings were saved
    pub current_value: f32,
    /// Brightness the last fade started from
    pub previous_value: f32,
    pub mode: AnimationMode,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            current_step: BrightnessStep::Full,
            previous_step: BrightnessStep::ThreeQuarters,
            current_value: 1.0,
            previous_value: 1.0,
            mode: AnimationMode::Flame,
        }
    }
}

impl PersistedSettings {
    /// Encode into the fixed record layout
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        put(&mut bytes, OFFSET_CURRENT_STEP, i32::from(self.current_step.as_raw()).to_le_bytes());
        put(&mut bytes, OFFSET_PREVIOUS_STEP, i32::from(self.previous_step.as_raw()).to_le_bytes());
        put(&mut bytes, OFFSET_CURRENT_VALUE, self.current_value.to_le_bytes());
        put(&mut bytes, OFFSET_PREVIOUS_VALUE, self.previous_value.to_le_bytes());
        put(&mut bytes, OFFSET_MODE, i32::from(self.mode.as_raw()).to_le_bytes());
        bytes
    }

    /// Decode a record, replacing anything out of range with defaults
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let defaults = Self::default();
        if bytes.iter().all(|byte| *byte == ERASED) {
            return defaults;
        }

        let current_step =
            decode_step(get(bytes, OFFSET_CURRENT_STEP)).unwrap_or(defaults.current_step);
        let previous_step =
            decode_step(get(bytes, OFFSET_PREVIOUS_STEP)).unwrap_or(defaults.previous_step);
        let fallback = current_step.value().unwrap_or(defaults.current_value);
        let mode = u8::try_from(i32::from_le_bytes(get(bytes, OFFSET_MODE)))
            .ok()
            .and_then(AnimationMode::from_raw)
            .unwrap_or(defaults.mode);

        Self {
            current_step,
            previous_step,
            current_value: decode_value(get(bytes, OFFSET_CURRENT_VALUE), fallback),
            previous_value: decode_value(get(bytes, OFFSET_PREVIOUS_VALUE), fallback),
            mode,
        }
    }
}

fn put(bytes: &mut [u8; RECORD_SIZE], offset: usize, field: [u8; 4]) {
    bytes[offset..offset + 4].copy_from_slice(&field);
}

fn get(bytes: &[u8; RECORD_SIZE], offset: usize) -> [u8; 4] {
    let mut field = [0u8; 4];
    field.copy_from_slice(&bytes[offset..offset + 4]);
    field
}

fn decode_step(field: [u8; 4]) -> Option<BrightnessStep> {
    let raw = i32::from_le_bytes(field);
    let raw = u8::try_from(raw).ok()?;
    match BrightnessStep::from_raw(raw) {
        Some(step) => Some(step),
        // A stored automatic step on a build without it keeps full brightness
        None if raw == BrightnessStep::Auto.as_raw() => Some(BrightnessStep::Full),
        None => None,
    }
}

fn decode_value(field: [u8; 4], fallback: f32) -> f32 {
    finite_brightness(f32::from_le_bytes(field), fallback)
}

/// Clamp a brightness value to `0.0..=1.0`, replacing NaN and infinities
/// with `fallback`
pub(crate) fn finite_brightness(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback.clamp(0.0, 1.0)
    }
}

/// Settings record stored at a fixed offset of a storage region
pub struct SettingsStore<S: Storage> {
    storage: S,
    offset: u32,
}

impl<S: Storage> SettingsStore<S> {
    /// Create a store writing the record at `offset`
    pub const fn new(storage: S, offset: u32) -> Self {
        Self { storage, offset }
    }

    /// Access the underlying storage
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Release the underlying storage
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn check_bounds(&self) -> Result<(), SettingsError<S::Error>> {
        match (self.offset as usize).checked_add(RECORD_SIZE) {
            Some(end) if end <= self.storage.capacity() => Ok(()),
            _ => Err(SettingsError::OutOfBounds),
        }
    }

    /// Read and validate the stored record
    pub fn load(&mut self) -> Result<PersistedSettings, SettingsError<S::Error>> {
        self.check_bounds()?;
        let mut bytes = [0u8; RECORD_SIZE];
        self.storage
            .read(self.offset, &mut bytes)
            .map_err(SettingsError::Read)?;
        let settings = PersistedSettings::from_bytes(&bytes);
        #[cfg(feature = "esp32-log")]
        println!("[SettingsStore.load] loaded {:?}", settings);
        Ok(settings)
    }

    /// Load the record, falling back to defaults if storage fails
    pub fn load_or_default(&mut self) -> PersistedSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(_) => {
                #[cfg(feature = "esp32-log")]
                println!("[SettingsStore.load] storage error, using defaults");
                PersistedSettings::default()
            }
        }
    }

    /// Encode and commit the record in a single write
    pub fn save(&mut self, settings: &PersistedSettings) -> Result<(), SettingsError<S::Error>> {
        self.check_bounds()?;
        self.storage
            .write(self.offset, &settings.to_bytes())
            .map_err(SettingsError::Write)
    }
}
