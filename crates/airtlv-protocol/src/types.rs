//! Decoded reading and result types.

use serde::{Deserialize, Serialize};

/// Whether a reading is a current-moment sample or one entry of a
/// buffered history batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Single current-moment sample.
    Event,
    /// One sample from a previously buffered batch.
    Data,
}

/// One decoded sensor sample.
///
/// Sparse by design: a decoder sets only the channels its layout
/// carries, and zero is a legitimate value for several of them, so
/// absence is always `None` rather than a sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Event or history sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// Sample time, unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u32>,
    /// Temperature, °C.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Pressure, raw device units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<u16>,
    /// CO₂, ppm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2: Option<u16>,
    /// PM2.5, µg/m³.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm25: Option<u16>,
    /// PM10, µg/m³.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm10: Option<u16>,
    /// TVOC, raw device units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvoc: Option<u16>,
    /// Noise level, raw device units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise: Option<u16>,
    /// Illuminance, raw device units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<u32>,
    /// Battery level, 0–100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<u8>,
    /// Valve opening, percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valve_open_percent: Option<f64>,
    /// Signal strength, dBm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i8>,
}

/// Result of decoding one uplink frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TlvDecodeResult {
    /// Command byte of the frame.
    pub cmd: u8,
    /// Declared payload length.
    pub declared_len: u16,
    /// Readings in discovery order; history batches are chronological
    /// by their synthesized timestamps.
    pub readings: Vec<SensorReading>,
    /// Product id learned from the frame, if it carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u32>,
    /// Report interval echoed by the device, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_interval_secs: Option<u32>,
    /// Collect interval echoed by the device, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_interval_secs: Option<u32>,
    /// Firmware version echoed by the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    /// Disconnect/end flag echoed by the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_flag: Option<bool>,
}
