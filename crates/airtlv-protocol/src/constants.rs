//! Protocol constants
//!
//! Sub-packet keys, command type bytes, and fixed sizes used by the
//! sensor TLV protocol.

// ============================================================================
// Frame layout
// ============================================================================

/// First byte of the downlink frame marker.
pub const FRAME_MARK_0: u8 = 0x43;
/// Second byte of the downlink frame marker.
pub const FRAME_MARK_1: u8 = 0x47;

/// Bytes before the payload: 2 marker bytes + 1 cmd byte + 2 length bytes.
pub const FRAME_HEADER_SIZE: usize = 5;

/// Key byte + 2 length bytes in front of every sub-packet value.
pub const SUB_PACKET_HEADER_SIZE: usize = 3;

// ============================================================================
// Sub-packet keys (uplink)
// ============================================================================

/// History batch (fixed-size records after a shared header).
pub const KEY_HISTORY: u8 = 0x03;
/// Report interval, u16 minutes.
pub const KEY_REPORT_INTERVAL: u8 = 0x04;
/// Collect interval, u16 seconds.
pub const KEY_COLLECT_INTERVAL: u8 = 0x05;
/// Firmware version, UTF-8 text.
pub const KEY_FIRMWARE_VERSION: u8 = 0x11;
/// Realtime/event sample.
pub const KEY_REALTIME: u8 = 0x14;
/// Disconnect/end flag.
pub const KEY_END_FLAG: u8 = 0x1D;
/// Product id of the reporting device.
pub const KEY_PRODUCT_ID: u8 = 0x38;
/// Frame-wide battery level, applied to every reading in the frame.
pub const KEY_BATTERY: u8 = 0x64;
/// Frame-wide signal strength, applied to every reading in the frame.
pub const KEY_RSSI: u8 = 0x65;
/// History batch, v2 variable layout (one reading per occurrence).
pub const KEY_HISTORY_V2: u8 = 0x85;

// ============================================================================
// Sub-packet keys (downlink)
// ============================================================================

/// MQTT broker settings as a space-joined text payload.
pub const KEY_MQTT: u8 = 0x25;
/// Valve opening, u16, percent scaled by 10.
pub const KEY_VALVE_OPEN: u8 = 0x72;
/// Valve self-check trigger, 1-byte payload, always zero.
pub const KEY_VALVE_SELF_CHECK: u8 = 0x73;

// ============================================================================
// Command type bytes (downlink)
// ============================================================================

/// Default downlink command type.
pub const CMD_TYPE_CONFIG: u8 = 0x32;
/// Downlink command type when a valve item is present.
pub const CMD_TYPE_VALVE: u8 = 0x3D;

// ============================================================================
// Product ids
// ============================================================================

/// Product id of the valve-controller device class. Readings from this
/// model use the valve payload layout instead of the generic
/// temperature/humidity layout.
pub const PRODUCT_ID_VALVE: u32 = 0x42;

// ============================================================================
// Payload sizes
// ============================================================================

/// Minimum realtime value: 4 timestamp + 5 valve sample + 1 rssi + 1 trailer.
pub const REALTIME_MIN_SIZE: usize = 11;
/// Generic temperature/humidity inner sample.
pub const TH_SAMPLE_SIZE: usize = 6;
/// Valve inner sample.
pub const VALVE_SAMPLE_SIZE: usize = 5;
/// History header: 4 base timestamp + 2 sample spacing.
pub const HISTORY_HEADER_SIZE: usize = 6;
