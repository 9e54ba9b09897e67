//! Frame and sub-packet layer.
//!
//! Both directions share the same outer shape:
//!
//! ```text
//! +------+------+-----+--------+--------+------------------+
//! | mark | mark | cmd | len_lo | len_hi | payload[0..len]  |
//! +------+------+-----+--------+--------+------------------+
//! ```
//!
//! The payload is a run of TLV sub-packets, each `key(1) + len(2, LE) +
//! value(len)`, and the run must tile the declared length exactly.
//! Downlink frames additionally carry a 2-byte additive checksum after
//! the payload; uplink frames may carry one too, but the decode path
//! never verifies it (the deployed firmware never has).

use bytes::BufMut;

use crate::constants::*;
use crate::error::ProtocolError;
use crate::wire;

/// An unpacked outer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Command byte at offset 2. The two marker bytes in front of it
    /// are consumed but treated as opaque on the decode path.
    pub cmd: u8,
    /// Payload length declared in the header.
    pub declared_len: u16,
    /// Exactly `declared_len` bytes of TLV sub-packets.
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Split a raw buffer into command byte and payload slice.
    ///
    /// Bytes past `5 + declared_len` (such as a trailing checksum) are
    /// ignored.
    pub fn unpack(bytes: &'a [u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < FRAME_HEADER_SIZE {
            return Err(ProtocolError::TruncatedHeader {
                expected: FRAME_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let cmd = bytes[2];
        let declared_len = u16::from_le_bytes([bytes[3], bytes[4]]);

        let end = FRAME_HEADER_SIZE + declared_len as usize;
        if bytes.len() < end {
            return Err(ProtocolError::TruncatedPayload {
                declared: declared_len as usize,
                available: bytes.len() - FRAME_HEADER_SIZE,
            });
        }

        Ok(Frame {
            cmd,
            declared_len,
            payload: &bytes[FRAME_HEADER_SIZE..end],
        })
    }

    /// Iterate over the payload's sub-packets.
    pub fn sub_packets(&self) -> SubPackets<'a> {
        SubPackets {
            payload: self.payload,
            pos: 0,
        }
    }
}

/// One TLV item inside a frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubPacket<'a> {
    /// Item key.
    pub key: u8,
    /// Declared value length. Always equals `value.len()`.
    pub len: u16,
    /// Value bytes.
    pub value: &'a [u8],
}

/// Iterator over the sub-packets of a payload.
///
/// Yields an error and then stops if the items do not tile the payload
/// exactly: a sub-packet whose end does not line up with the declared
/// length surfaces as a failure on the following iteration.
#[derive(Debug)]
pub struct SubPackets<'a> {
    payload: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for SubPackets<'a> {
    type Item = Result<SubPacket<'a>, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.payload.len() {
            return None;
        }

        let key = self.payload[self.pos];
        let len_offset = self.pos + 1;
        let Some(len) = wire::u16_at(self.payload, len_offset) else {
            self.pos = self.payload.len();
            return Some(Err(ProtocolError::MalformedLength {
                key,
                offset: len_offset,
            }));
        };

        let value_start = self.pos + SUB_PACKET_HEADER_SIZE;
        let value_end = value_start + len as usize;
        if value_end > self.payload.len() {
            self.pos = self.payload.len();
            return Some(Err(ProtocolError::SubPacketOverrun {
                key,
                declared: len as usize,
                available: self.payload.len() - value_start,
            }));
        }

        let value = &self.payload[value_start..value_end];
        self.pos = value_end;

        Some(Ok(SubPacket { key, len, value }))
    }
}

/// Assemble a downlink frame around pre-encoded TLV items and append
/// the checksum trailer.
pub fn seal_frame(cmd_type: u8, items: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + items.len() + 2);
    buf.push(FRAME_MARK_0);
    buf.push(FRAME_MARK_1);
    buf.push(cmd_type);
    buf.put_u16_le(items.len() as u16);
    buf.extend_from_slice(items);

    let crc = wire::checksum(&buf);
    buf.put_u16_le(crc);
    buf
}

/// Append one TLV item to an encode buffer.
pub fn put_item(buf: &mut Vec<u8>, key: u8, value: &[u8]) {
    buf.push(key);
    buf.put_u16_le(value.len() as u16);
    buf.extend_from_slice(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_payload(payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![0x43, 0x47, 0x34];
        buf.put_u16_le(payload.len() as u16);
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn test_unpack_reads_cmd_and_payload() {
        let raw = frame_with_payload(&[0x1D, 0x01, 0x00, 0x01]);
        let frame = Frame::unpack(&raw).unwrap();
        assert_eq!(frame.cmd, 0x34);
        assert_eq!(frame.declared_len, 4);
        assert_eq!(frame.payload, &[0x1D, 0x01, 0x00, 0x01]);
    }

    #[test]
    fn test_unpack_ignores_trailing_checksum_bytes() {
        let mut raw = frame_with_payload(&[0x1D, 0x01, 0x00, 0x01]);
        raw.extend_from_slice(&[0xAB, 0xCD]);
        let frame = Frame::unpack(&raw).unwrap();
        assert_eq!(frame.payload.len(), 4);
    }

    #[test]
    fn test_unpack_short_header() {
        let err = Frame::unpack(&[0x43, 0x47, 0x34]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::TruncatedHeader {
                expected: 5,
                actual: 3
            }
        );
    }

    #[test]
    fn test_unpack_short_payload() {
        let mut raw = frame_with_payload(&[0x01, 0x02]);
        // Claim more payload than is present.
        raw[3] = 10;
        let err = Frame::unpack(&raw).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::TruncatedPayload {
                declared: 10,
                available: 2
            }
        );
    }

    #[test]
    fn test_sub_packets_tile_payload_exactly() {
        let payload = [
            0x38, 0x02, 0x00, 0x29, 0x00, // product id
            0x1D, 0x01, 0x00, 0x01, // end flag
        ];
        let raw = frame_with_payload(&payload);
        let frame = Frame::unpack(&raw).unwrap();

        let packs: Vec<_> = frame
            .sub_packets()
            .collect::<Result<_, _>>()
            .expect("well-formed payload");
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].key, 0x38);
        assert_eq!(packs[0].value, &[0x29, 0x00]);
        assert_eq!(packs[1].key, 0x1D);
        assert_eq!(packs[1].value, &[0x01]);

        let consumed: usize = packs.iter().map(|p| 3 + p.len as usize).sum();
        assert_eq!(consumed, frame.declared_len as usize);
    }

    #[test]
    fn test_sub_packet_truncated_length_field() {
        // Key present but only one length byte follows.
        let raw = frame_with_payload(&[0x14, 0x05]);
        let frame = Frame::unpack(&raw).unwrap();
        let err = frame.sub_packets().next().unwrap().unwrap_err();
        assert_eq!(err, ProtocolError::MalformedLength { key: 0x14, offset: 1 });
    }

    #[test]
    fn test_sub_packet_value_overrun() {
        let raw = frame_with_payload(&[0x14, 0x05, 0x00, 0xAA]);
        let frame = Frame::unpack(&raw).unwrap();
        let err = frame.sub_packets().next().unwrap().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::SubPacketOverrun {
                key: 0x14,
                declared: 5,
                available: 1
            }
        );
    }

    #[test]
    fn test_misaligned_final_sub_packet_detected_next_iteration() {
        // First item is fine; the second starts 1 byte before the end,
        // so its length field cannot be read.
        let raw = frame_with_payload(&[0x1D, 0x01, 0x00, 0x01, 0x64]);
        let frame = Frame::unpack(&raw).unwrap();
        let mut iter = frame.sub_packets();
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err, ProtocolError::MalformedLength { key: 0x64, offset: 5 });
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_seal_frame_checksum_trailer() {
        let mut items = Vec::new();
        put_item(&mut items, 0x1D, &[0x01]);
        let frame = seal_frame(CMD_TYPE_CONFIG, &items);

        assert_eq!(&frame[..2], &[0x43, 0x47]);
        assert_eq!(frame[2], CMD_TYPE_CONFIG);
        assert_eq!(u16::from_le_bytes([frame[3], frame[4]]), 4);

        let body = &frame[..frame.len() - 2];
        let crc = u16::from_le_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
        assert_eq!(crc, wire::checksum(body));
    }
}
