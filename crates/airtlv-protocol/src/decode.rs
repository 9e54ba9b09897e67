//! Uplink frame decoding.
//!
//! Walks the sub-packets of a frame in discovery order and dispatches
//! on the key byte. Three keys produce readings (realtime, history,
//! history v2), two capture frame-wide attributes that are patched
//! onto every reading after the walk (battery, rssi), and one carries
//! the product id that selects between payload layouts for the same
//! key. Unknown keys are skipped so that newer firmware never breaks
//! older decoders.

use crate::constants::*;
use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::types::{DataType, SensorReading, TlvDecodeResult};
use crate::wire;

/// Decode one uplink frame into readings.
///
/// The input is the complete raw frame; any bytes past the declared
/// payload (such as the checksum trailer the firmware appends) are
/// ignored and never verified.
pub fn decode_frame(bytes: &[u8]) -> Result<TlvDecodeResult, ProtocolError> {
    let frame = Frame::unpack(bytes)?;

    let mut result = TlvDecodeResult {
        cmd: frame.cmd,
        declared_len: frame.declared_len,
        ..Default::default()
    };

    // Product id learned in-frame; 0 selects the generic layouts.
    let mut product_id: u32 = 0;
    let mut readings: Vec<SensorReading> = Vec::new();
    let mut frame_battery: Option<u8> = None;
    let mut frame_rssi: Option<i8> = None;

    for pack in frame.sub_packets() {
        let pack = pack?;
        match pack.key {
            KEY_PRODUCT_ID => {
                product_id = wire::uint_le(pack.value) as u32;
                result.product_id = Some(product_id);
            }

            KEY_REALTIME => {
                // Only one realtime sample is expected per frame; it
                // supersedes anything decoded earlier.
                readings = vec![decode_realtime(pack.value, product_id)?];
            }

            KEY_HISTORY => {
                readings = decode_history(pack.value, product_id);
            }

            KEY_HISTORY_V2 => {
                if let Some(reading) = decode_history_v2(pack.value) {
                    readings.push(reading);
                }
            }

            KEY_BATTERY => {
                frame_battery = pack.value.first().copied();
            }

            KEY_RSSI => {
                frame_rssi = pack.value.first().map(|b| wire::i8_from_raw(*b));
            }

            KEY_REPORT_INTERVAL => {
                result.report_interval_secs =
                    wire::u16_at(pack.value, 0).map(|minutes| minutes as u32 * 60);
            }

            KEY_COLLECT_INTERVAL => {
                result.collect_interval_secs = wire::u16_at(pack.value, 0).map(u32::from);
            }

            KEY_FIRMWARE_VERSION => {
                result.firmware_version =
                    Some(String::from_utf8_lossy(pack.value).into_owned());
            }

            KEY_END_FLAG => {
                result.end_flag = Some(wire::uint_le(pack.value) != 0);
            }

            other => {
                log::debug!(
                    "skipping unknown sub-packet key 0x{:02X} ({} bytes)",
                    other,
                    pack.len
                );
            }
        }
    }

    apply_frame_attributes(&mut readings, frame_battery, frame_rssi);
    result.readings = readings;
    Ok(result)
}

/// Decode a realtime/event sample.
///
/// Layout: `timestamp(4) + sample + rssi(1) + trailer(1)`, where the
/// sample is 6 bytes for the generic temperature/humidity layout and
/// 5 bytes for the valve-controller layout.
fn decode_realtime(value: &[u8], product_id: u32) -> Result<SensorReading, ProtocolError> {
    let sample_size = if product_id == PRODUCT_ID_VALVE {
        VALVE_SAMPLE_SIZE
    } else {
        TH_SAMPLE_SIZE
    };

    let min = 4 + sample_size + 2;
    if value.len() < min.max(REALTIME_MIN_SIZE) {
        return Err(ProtocolError::RealtimeTooShort {
            expected: min.max(REALTIME_MIN_SIZE),
            actual: value.len(),
        });
    }

    let timestamp = wire::u32_at(value, 0).unwrap_or(0);
    let sample = &value[4..4 + sample_size];

    let mut reading = if product_id == PRODUCT_ID_VALVE {
        decode_valve_sample(sample)
    } else {
        decode_th_sample(sample)
    };

    reading.data_type = Some(DataType::Event);
    reading.timestamp = Some(timestamp);
    reading.rssi = Some(wire::i8_from_raw(value[value.len() - 2]));
    Ok(reading)
}

/// Decode the generic 6-byte temperature/humidity sample.
///
/// The first three bytes pack temperature and humidity into 24 bits:
/// the high 12 bits are temperature ×10 offset by +500, the low 12
/// bits are humidity ×10.
fn decode_th_sample(sample: &[u8]) -> SensorReading {
    let packed = wire::u24_at(sample, 0).unwrap_or(0);

    let mut reading = SensorReading {
        temperature: Some(((packed >> 12) as f64 - 500.0) / 10.0),
        humidity: Some((packed & 0xFFF) as f64 / 10.0),
        battery: Some(sample[5]),
        ..Default::default()
    };

    // Zero pressure means the device has no pressure sensor fitted.
    if let Some(pressure) = wire::u16_at(sample, 3).filter(|p| *p > 0) {
        reading.pressure = Some(pressure);
    }

    reading
}

/// Decode the 5-byte valve-controller sample.
fn decode_valve_sample(sample: &[u8]) -> SensorReading {
    let raw_temp = wire::u16_at(sample, 0).unwrap_or(0);
    let raw_open = wire::u16_at(sample, 2).unwrap_or(0);

    SensorReading {
        temperature: Some((raw_temp as f64 - 500.0) / 10.0),
        valve_open_percent: Some(raw_open as f64 / 10.0),
        battery: Some(sample[4]),
        ..Default::default()
    }
}

/// Decode a history batch: `base_timestamp(4) + spacing(2)` followed
/// by fixed-size records.
///
/// Record `i` gets `base_timestamp + spacing * i`. Only complete
/// records are consumed; a short trailing remainder is ignored rather
/// than read as a truncated record.
fn decode_history(value: &[u8], product_id: u32) -> Vec<SensorReading> {
    if value.len() < HISTORY_HEADER_SIZE {
        return Vec::new();
    }

    let base_timestamp = wire::u32_at(value, 0).unwrap_or(0);
    let spacing = wire::u16_at(value, 4).unwrap_or(0) as u32;

    let unit = if product_id == PRODUCT_ID_VALVE {
        VALVE_SAMPLE_SIZE
    } else {
        TH_SAMPLE_SIZE
    };

    let mut readings = Vec::with_capacity((value.len() - HISTORY_HEADER_SIZE) / unit);
    let mut offset = HISTORY_HEADER_SIZE;
    let mut index: u32 = 0;

    while offset + unit <= value.len() {
        let sample = &value[offset..offset + unit];
        let mut reading = if product_id == PRODUCT_ID_VALVE {
            decode_valve_sample(sample)
        } else {
            decode_th_sample(sample)
        };

        reading.data_type = Some(DataType::Data);
        reading.timestamp = Some(base_timestamp.wrapping_add(spacing.wrapping_mul(index)));
        readings.push(reading);

        offset += unit;
        index += 1;
    }

    readings
}

/// Decode one v2 history record: `timestamp(4) + selector(1)` followed
/// by a selector-chosen run of little-endian fields.
///
/// Temperature and humidity are ×10 on the wire; the remaining
/// channels are raw unsigned. Fields the value buffer cannot fully
/// hold stay unset.
fn decode_history_v2(value: &[u8]) -> Option<SensorReading> {
    if value.len() < 5 {
        return None;
    }

    let mut reading = SensorReading {
        data_type: Some(DataType::Data),
        timestamp: wire::u32_at(value, 0),
        temperature: wire::u16_at(value, 5).map(|t| t as f64 / 10.0),
        ..Default::default()
    };

    match value[4] {
        1 => {
            reading.humidity = wire::u16_at(value, 7).map(|h| h as f64 / 10.0);
        }
        2 => {}
        3 => {
            reading.humidity = wire::u16_at(value, 7).map(|h| h as f64 / 10.0);
            reading.pressure = wire::u16_at(value, 9);
        }
        4 => {
            reading.humidity = wire::u16_at(value, 7).map(|h| h as f64 / 10.0);
            reading.co2 = wire::u16_at(value, 9);
        }
        10 => {
            reading.humidity = wire::u16_at(value, 7).map(|h| h as f64 / 10.0);
            reading.co2 = wire::u16_at(value, 9);
            reading.pm25 = wire::u16_at(value, 11);
            reading.pm10 = wire::u16_at(value, 13);
            reading.tvoc = wire::u16_at(value, 15);
            reading.noise = wire::u16_at(value, 17);
            reading.light = wire::u32_at(value, 19);
        }
        _ => {}
    }

    Some(reading)
}

/// Patch frame-wide attributes onto every reading.
///
/// Battery applies whenever the frame carried one. Rssi applies only
/// when the decoded value is negative; the firmware reports positive
/// placeholder values that must not overwrite per-reading rssi. The
/// asymmetry is part of the deployed protocol.
fn apply_frame_attributes(
    readings: &mut [SensorReading],
    battery: Option<u8>,
    rssi: Option<i8>,
) {
    if let Some(level) = battery {
        for reading in readings.iter_mut() {
            reading.battery = Some(level);
        }
    }

    if let Some(signal) = rssi.filter(|r| *r < 0) {
        for reading in readings.iter_mut() {
            reading.rssi = Some(signal);
        }
    }
}
