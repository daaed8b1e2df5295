#![allow(dead_code)]

use calcifer_lamp::{AmbientSensor, OutputDriver, Rgb, TouchInput, TouchSensor};
use embedded_storage::{ReadStorage, Storage};

pub const STORAGE_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageFault;

/// Flash region kept in RAM
pub struct MemoryStorage {
    pub bytes: [u8; STORAGE_SIZE],
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl MemoryStorage {
    pub fn erased() -> Self {
        Self {
            bytes: [0xFF; STORAGE_SIZE],
            fail_reads: false,
            fail_writes: false,
            writes: 0,
        }
    }

    pub fn with_record(offset: usize, record: &[u8]) -> Self {
        let mut storage = Self::erased();
        storage.bytes[offset..offset + record.len()].copy_from_slice(record);
        storage
    }
}

impl ReadStorage for MemoryStorage {
    type Error = StorageFault;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(StorageFault);
        }
        let start = offset as usize;
        bytes.copy_from_slice(&self.bytes[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        STORAGE_SIZE
    }
}

impl Storage for MemoryStorage {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(StorageFault);
        }
        let start = offset as usize;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

/// Touch pads held down by the test
#[derive(Default)]
pub struct ScriptedTouch {
    pub held: [bool; 3],
    pub updates: usize,
    pub started: bool,
}

impl ScriptedTouch {
    pub fn hold(&mut self, sensor: TouchSensor, held: bool) {
        self.held[sensor.index()] = held;
    }
}

impl TouchInput for ScriptedTouch {
    fn begin(&mut self) {
        self.started = true;
    }

    fn update(&mut self) {
        self.updates += 1;
    }

    fn is_raw_touched(&mut self, sensor: TouchSensor) -> bool {
        self.held[sensor.index()]
    }
}

/// Light sensor returning a fixed reading
pub struct FixedAmbient {
    pub raw: Option<u16>,
}

impl AmbientSensor for FixedAmbient {
    fn read_raw(&mut self) -> Option<u16> {
        self.raw
    }
}

/// Strip recording what it was sent
#[derive(Default)]
pub struct RecordingStrip {
    pub frames: usize,
    pub last: Vec<Rgb>,
}

impl OutputDriver for RecordingStrip {
    fn write(&mut self, colors: &[Rgb]) {
        self.frames += 1;
        self.last = colors.to_vec();
    }
}
