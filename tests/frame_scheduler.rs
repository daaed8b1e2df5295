mod common;

mod tests {
    use calcifer_lamp::color::BLACK;
    use calcifer_lamp::settings::RECORD_SIZE;
    use calcifer_lamp::{
        AnimationMode, BrightnessStep, Duration, FrameScheduler, Instant, LampConfig,
        PersistedSettings, Peripherals, Power, Rgb, STRIP_LEN, TouchSensor,
    };

    use super::common::{FixedAmbient, MemoryStorage, RecordingStrip, ScriptedTouch};

    type TestLamp = FrameScheduler<ScriptedTouch, FixedAmbient, RecordingStrip, MemoryStorage, STRIP_LEN>;

    const SETTINGS_OFFSET: u32 = 16;

    fn at(millis: u64) -> Instant {
        Instant::from_millis(millis)
    }

    fn boot_with(storage: MemoryStorage, ambient: Option<u16>) -> TestLamp {
        let peripherals = Peripherals {
            touch: ScriptedTouch::default(),
            ambient: FixedAmbient { raw: ambient },
            strip: RecordingStrip::default(),
            storage,
        };
        TestLamp::boot(peripherals, SETTINGS_OFFSET, &LampConfig::default(), at(0))
    }

    fn stored(settings: &PersistedSettings) -> MemoryStorage {
        MemoryStorage::with_record(SETTINGS_OFFSET as usize, &settings.to_bytes())
    }

    fn stored_record(lamp: &TestLamp) -> PersistedSettings {
        let start = SETTINGS_OFFSET as usize;
        let mut bytes = [0u8; RECORD_SIZE];
        bytes.copy_from_slice(&lamp.settings().storage().bytes[start..start + RECORD_SIZE]);
        PersistedSettings::from_bytes(&bytes)
    }

    #[test]
    fn test_boot_clears_strip() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);
        assert!(lamp.touch_mut().started);
        assert_eq!(lamp.strip().frames, 1);
        assert_eq!(lamp.strip().last, [BLACK; STRIP_LEN]);
        assert_eq!(lamp.lamp().power(), Power::On);
        assert_eq!(lamp.lamp().mode(), AnimationMode::Flame);
        assert_eq!(lamp.lamp().brightness_step(), BrightnessStep::Full);
    }

    #[test]
    fn test_boot_restores_settings() {
        let settings = PersistedSettings {
            current_step: BrightnessStep::Half,
            previous_step: BrightnessStep::Quarter,
            current_value: 0.5,
            previous_value: 0.25,
            mode: AnimationMode::Solid,
        };
        let lamp = boot_with(stored(&settings), None);
        assert_eq!(lamp.lamp().mode(), AnimationMode::Solid);
        assert_eq!(lamp.lamp().brightness_step(), BrightnessStep::Half);
        assert_eq!(lamp.lamp().brightness(), 0.5);
    }

    #[test]
    fn test_boot_survives_storage_failure() {
        let mut storage = MemoryStorage::erased();
        storage.fail_reads = true;
        let lamp = boot_with(storage, None);
        assert_eq!(lamp.lamp().settings(), PersistedSettings::default());
    }

    #[test]
    fn test_tick_pacing() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);

        let result = lamp.tick(at(0));
        assert_eq!(result.next_deadline, at(10));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));

        let result = lamp.tick(at(15));
        assert_eq!(result.next_deadline, at(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(5));

        let result = lamp.tick(at(35));
        assert_eq!(result.next_deadline, at(30));
        assert_eq!(result.sleep_duration, Duration::from_millis(0));
    }

    #[test]
    fn test_tick_drift_resets_deadline() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);
        lamp.tick(at(0));

        let result = lamp.tick(at(100));
        assert_eq!(result.next_deadline, at(110));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));
    }

    #[test]
    fn test_every_tick_writes_strip() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);
        for t in [0, 10, 20] {
            lamp.tick(at(t));
        }
        assert_eq!(lamp.strip().frames, 4);
        assert_eq!(lamp.strip().last.len(), STRIP_LEN);
    }

    #[test]
    fn test_output_fades_in() {
        let settings = PersistedSettings {
            mode: AnimationMode::Solid,
            ..PersistedSettings::default()
        };
        let mut lamp = boot_with(stored(&settings), None);

        lamp.tick(at(0));
        assert_eq!(lamp.strip().last, [BLACK; STRIP_LEN]);

        for t in (10..=1000).step_by(10) {
            lamp.tick(at(t));
        }
        assert_eq!(lamp.strip().last, [Rgb { r: 255, g: 12, b: 0 }; STRIP_LEN]);
    }

    #[test]
    fn test_mode_press_is_persisted() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);
        lamp.touch_mut().hold(TouchSensor::Right, true);

        let result = lamp.tick(at(0));
        assert!(result.saved);
        assert_eq!(lamp.settings().storage().writes, 1);
        let start = SETTINGS_OFFSET as usize + 16;
        assert_eq!(lamp.settings().storage().bytes[start..start + 4], [1, 0, 0, 0]);

        // Holding the pad does not repeat within the debounce interval
        let result = lamp.tick(at(10));
        assert!(!result.saved);
        assert_eq!(lamp.settings().storage().writes, 1);
    }

    #[test]
    fn test_power_press_is_not_persisted() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);
        lamp.touch_mut().hold(TouchSensor::Front, true);

        let result = lamp.tick(at(0));
        assert!(!result.saved);
        assert_eq!(lamp.lamp().power(), Power::Off);
        assert_eq!(lamp.settings().storage().writes, 0);
    }

    #[test]
    fn test_debounce_across_ticks() {
        let mut lamp = boot_with(MemoryStorage::erased(), None);
        lamp.touch_mut().hold(TouchSensor::Right, true);

        lamp.tick(at(0));
        assert_eq!(lamp.lamp().mode(), AnimationMode::Solid);
        lamp.tick(at(340));
        assert_eq!(lamp.lamp().mode(), AnimationMode::Solid);
        lamp.tick(at(360));
        assert_eq!(lamp.lamp().mode(), AnimationMode::NightFlame);
        assert_eq!(stored_record(&lamp).mode, AnimationMode::NightFlame);
    }

    #[test]
    fn test_brightness_press_persists_target() {
        let settings = PersistedSettings {
            current_step: BrightnessStep::Quarter,
            current_value: 0.25,
            ..PersistedSettings::default()
        };
        let mut lamp = boot_with(stored(&settings), None);
        lamp.touch_mut().hold(TouchSensor::Left, true);

        assert!(lamp.tick(at(0)).saved);
        let record = stored_record(&lamp);
        assert_eq!(record.current_step, BrightnessStep::Half);
        assert_eq!(record.current_value, 0.5);
        assert_eq!(record.previous_value, 0.25);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let mut storage = MemoryStorage::erased();
        storage.fail_writes = true;
        let mut lamp = boot_with(storage, None);
        lamp.touch_mut().hold(TouchSensor::Right, true);

        let result = lamp.tick(at(0));
        assert!(!result.saved);
        assert_eq!(lamp.lamp().mode(), AnimationMode::Solid);
    }

    #[cfg(feature = "auto-brightness")]
    #[test]
    fn test_ambient_drives_auto_brightness() {
        let settings = PersistedSettings {
            current_step: BrightnessStep::Auto,
            ..PersistedSettings::default()
        };
        let mut lamp = boot_with(stored(&settings), Some(0));

        for t in (0..=1000).step_by(10) {
            lamp.tick(at(t));
        }
        assert_eq!(lamp.lamp().brightness(), 0.2);
    }

    #[test]
    fn test_missing_ambient_reading_is_ignored() {
        let settings = PersistedSettings {
            current_step: BrightnessStep::Auto,
            ..PersistedSettings::default()
        };
        let mut lamp = boot_with(stored(&settings), None);
        for t in (0..=1000).step_by(10) {
            lamp.tick(at(t));
        }
        assert_eq!(lamp.lamp().brightness(), 1.0);
    }
}
