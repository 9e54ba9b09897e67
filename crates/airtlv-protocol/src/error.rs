//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding a sensor TLV frame.
///
/// All of these are terminal, structural failures of a single decode
/// call; nothing is retriable and no partial result is returned.
/// Unknown sub-packet keys are not errors; they are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer is shorter than the fixed frame header.
    #[error("truncated header: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Buffer ends before the declared payload does.
    #[error("truncated payload: declared {declared} bytes, only {available} available")]
    TruncatedPayload {
        /// Payload length declared in the frame header.
        declared: usize,
        /// Payload bytes actually present.
        available: usize,
    },

    /// Payload ended where a sub-packet key byte was expected.
    #[error("malformed sub-packet: no key byte at offset {offset}")]
    MalformedKey {
        /// Payload offset at which the key was expected.
        offset: usize,
    },

    /// Payload ended inside a sub-packet length field.
    #[error("malformed sub-packet: incomplete length for key 0x{key:02X} at offset {offset}")]
    MalformedLength {
        /// Key of the sub-packet being read.
        key: u8,
        /// Payload offset of the length field.
        offset: usize,
    },

    /// A sub-packet value runs past the end of the payload.
    #[error("sub-packet overrun: key 0x{key:02X} declares {declared} bytes, only {available} remain")]
    SubPacketOverrun {
        /// Key of the offending sub-packet.
        key: u8,
        /// Value length declared by the sub-packet.
        declared: usize,
        /// Bytes remaining in the payload.
        available: usize,
    },

    /// Realtime sub-packet value is too short for its layout.
    #[error("realtime value too short: expected at least {expected} bytes, got {actual}")]
    RealtimeTooShort {
        /// Minimum length for the selected layout.
        expected: usize,
        /// Actual value length.
        actual: usize,
    },
}
