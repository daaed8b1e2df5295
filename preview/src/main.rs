//! Desktop simulator for the calcifer lamp
//!
//! Runs the real tick loop against simulated peripherals: three buttons
//! stand in for the touch pads, a slider for the light sensor and a RAM
//! buffer for the settings flash. The strip is drawn on screen.

use std::convert::Infallible;
use std::time::Instant as StdInstant;

use calcifer_lamp::{
    AmbientSensor, FrameScheduler, Instant, LampConfig, OutputDriver, Peripherals, Power,
    Rgb, STRIP_LEN, TouchInput, TouchSensor,
};
use eframe::egui::{self};
use embedded_storage::{ReadStorage, Storage};

/// Size of the simulated flash region
const FLASH_SIZE: usize = 64;

/// Offset of the settings record within the flash region
const SETTINGS_OFFSET: u32 = 0;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 24.0;

/// Gap between LEDs
const LED_GAP: f32 = 4.0;

type SimulatedLamp = FrameScheduler<ButtonPads, SliderSensor, ScreenStrip, RamFlash, STRIP_LEN>;

/// Touch pads driven by UI buttons
///
/// A click latches a touch that is visible for exactly one controller
/// update, like a short tap on the real pad.
#[derive(Default)]
struct ButtonPads {
    latched: [bool; 3],
    touched: [bool; 3],
}

impl ButtonPads {
    fn tap(&mut self, sensor: TouchSensor) {
        self.latched[sensor.index()] = true;
    }
}

impl TouchInput for ButtonPads {
    fn update(&mut self) {
        self.touched = self.latched;
        self.latched = [false; 3];
    }

    fn is_raw_touched(&mut self, sensor: TouchSensor) -> bool {
        self.touched[sensor.index()]
    }
}

/// Light sensor reading a slider
struct SliderSensor {
    raw: u16,
}

impl AmbientSensor for SliderSensor {
    fn read_raw(&mut self) -> Option<u16> {
        Some(self.raw)
    }
}

/// Strip that keeps the last frame for drawing
#[derive(Default)]
struct ScreenStrip {
    pixels: Vec<Rgb>,
}

impl OutputDriver for ScreenStrip {
    fn write(&mut self, colors: &[Rgb]) {
        self.pixels.clear();
        self.pixels.extend_from_slice(colors);
    }
}

/// Settings flash kept in memory, erased on start
struct RamFlash {
    bytes: [u8; FLASH_SIZE],
    writes: usize,
}

impl ReadStorage for RamFlash {
    type Error = Infallible;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        bytes.copy_from_slice(&self.bytes[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        FLASH_SIZE
    }
}

impl Storage for RamFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 400.0])
            .with_title("Calcifer Lamp Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "calcifer-lamp-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    lamp: SimulatedLamp,
    /// Deadline of the next lamp tick
    next_tick: Instant,
    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether time is running
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// Raw ambient reading fed to the sensor
    ambient_raw: u16,
    /// LED pixel size for display
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Self {
        let ambient_raw = 512;
        let peripherals = Peripherals {
            touch: ButtonPads::default(),
            ambient: SliderSensor { raw: ambient_raw },
            strip: ScreenStrip::default(),
            storage: RamFlash {
                bytes: [0xFF; FLASH_SIZE],
                writes: 0,
            },
        };
        let now = Instant::from_millis(0);
        let lamp = SimulatedLamp::boot(peripherals, SETTINGS_OFFSET, &LampConfig::default(), now);

        Self {
            lamp,
            next_tick: now,
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            ambient_raw,
            led_size: LED_SIZE,
        }
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            let delta_ms_f64 = if delta_ms_f64.is_finite() {
                #[allow(clippy::cast_precision_loss)]
                delta_ms_f64.clamp(0.0, u64::MAX as f64)
            } else {
                0.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = delta_ms_f64 as u64;
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }
    }

    /// Run every tick that is due at the current synthetic time
    fn run_ticks(&mut self) {
        let now = Instant::from_millis(self.t_ms);
        while self.next_tick <= now {
            let result = self.lamp.tick(self.next_tick);
            self.next_tick = result.next_deadline;
        }
    }

    fn tap(&mut self, sensor: TouchSensor) {
        self.lamp.touch_mut().tap(sensor);
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();
        self.lamp.ambient_mut().raw = self.ambient_raw;
        self.run_ticks();

        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                    });

                    ui.add_space(4.0);

                    let secs = self.t_ms / 1000;
                    let ms = self.t_ms % 1000;
                    ui.label(format!("Time: {secs}.{ms:03}s"));

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                    });

                    ui.horizontal(|ui| {
                        ui.label("Size: ");
                        ui.add(egui::Slider::new(&mut self.led_size, 4.0..=48.0));
                    });
                });
                // </PlaybackControls>
                ui.add_space(16.0);
                // <TouchPads>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Front (power)").clicked() {
                            self.tap(TouchSensor::Front);
                        }
                        if ui.button("Left (brightness)").clicked() {
                            self.tap(TouchSensor::Left);
                        }
                        if ui.button("Right (mode)").clicked() {
                            self.tap(TouchSensor::Right);
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Ambient:");
                        ui.add(egui::Slider::new(&mut self.ambient_raw, 0..=1023));
                        let lux = LampConfig::default().ambient.lux(f32::from(self.ambient_raw));
                        ui.label(format!("{lux:.0} lux"));
                    });
                });
                // </TouchPads>
            });

            ui.add_space(16.0);

            let lamp = self.lamp.lamp();
            let power = match lamp.power() {
                Power::On => "on",
                Power::Off => "off",
            };
            ui.label(format!(
                "Power: {power}  Mode: {}  Step: {:?}  Brightness: {:.2}  Fade: {:.2}  Saved: {}",
                lamp.mode().as_str(),
                lamp.brightness_step(),
                lamp.brightness(),
                lamp.power_coefficient(),
                self.lamp.settings().storage().writes,
            ));

            ui.add_space(16.0);

            // === LED Display ===
            let available_width = ui.available_width();
            let led_pitch = self.led_size + LED_GAP;
            let pixels = &self.lamp.strip().pixels;

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;
            let rows = pixels.len().div_ceil(leds_per_row);
            #[allow(clippy::cast_precision_loss)]
            let height = rows as f32 * led_pitch;

            let (response, painter) =
                ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, pixel) in pixels.iter().enumerate() {
                let row = i / leds_per_row;
                let col = i % leds_per_row;
                let x = origin.x + col as f32 * led_pitch;
                let y = origin.y + row as f32 * led_pitch;

                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                let color = egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b);
                painter.rect_filled(rect, 3.0, color);
            }
        });
    }
}
