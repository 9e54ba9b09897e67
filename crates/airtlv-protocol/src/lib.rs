//! Sensor TLV protocol codec
//!
//! This crate encodes and decodes the compact binary TLV protocol that
//! environmental sensor devices use to report telemetry and receive
//! configuration. It is pure computation: bytes in, structures out.
//! Transport, persistence, and device identity live elsewhere.
//!
//! # Wire format
//!
//! All multi-byte integers are little-endian.
//!
//! ```text
//! Uplink frame:   [2 reserved][1 cmd][2 len][len bytes of TLV items]
//! TLV item:       [1 key][2 len][len bytes value]
//! Downlink frame: [0x43 0x47][1 cmd type][2 len][items][2 checksum]
//! ```
//!
//! Uplink payloads carry sensor readings (realtime samples and history
//! batches) plus frame-wide attributes; downlink frames carry
//! configuration items and end with an additive 16-bit checksum. The
//! decoder never verifies a checksum; deployed firmware only ever
//! computes one when encoding.
//!
//! # Example
//!
//! ```rust,ignore
//! use airtlv_protocol::{decode_frame, Command};
//!
//! let result = decode_frame(&raw_bytes)?;
//! for reading in &result.readings {
//!     println!("{:?} {:?}", reading.timestamp, reading.temperature);
//! }
//!
//! let frame = Command {
//!     report_interval_secs: Some(3600),
//!     ..Default::default()
//! }
//! .encode();
//! ```

mod commands;
mod constants;
mod decode;
mod error;
mod frame;
mod types;
mod wire;

pub use commands::*;
pub use constants::*;
pub use decode::decode_frame;
pub use error::*;
pub use frame::*;
pub use types::*;
pub use wire::{checksum, from_hex, to_hex, uint_le};
