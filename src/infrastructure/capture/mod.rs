//! Microphone capture adapters

mod cpal_capture;

pub use cpal_capture::{
    list_input_devices, CpalCapture, CpalStream, InputDeviceInfo, TARGET_SAMPLE_RATE,
};
