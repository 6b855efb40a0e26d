use bytes::{BufMut, BytesMut};

use crate::error::{Result, TransportError};

/// Frame header: magic (2) + length (4) + flags (1) = 7 bytes.
pub const HEADER_SIZE: usize = 7;

/// Magic bytes: "MR" (0x4D 0x52).
pub const MAGIC: [u8; 2] = [0x4D, 0x52];

/// Flags bit 0: at least one more frame of the same message follows.
pub const FLAG_MORE: u8 = 0x01;

/// Default maximum frame payload size: 16 MiB.
pub const DEFAULT_MAX_FRAME: usize = 16 * 1024 * 1024;

/// Encode one frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────┬───────────┬─────────────────┐
/// │ Magic (2B)   │ Length    │ Flags     │ Payload          │
/// │ 0x4D 0x52    │ (4B LE)  │ (1B)      │ (Length bytes)   │
/// │ "MR"         │          │ bit0=MORE │                  │
/// └──────────────┴───────────┴───────────┴─────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], more: bool, dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(TransportError::FrameTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u32_le(payload.len() as u32);
    dst.put_u8(if more { FLAG_MORE } else { 0 });
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame header.
///
/// Returns the payload length and the continuation flag. Reserved flag bits
/// are ignored on receive.
pub fn decode_header(header: &[u8; HEADER_SIZE], max_frame: usize) -> Result<(usize, bool)> {
    if header[0..2] != MAGIC {
        return Err(TransportError::InvalidMagic);
    }

    let payload_len = u32::from_le_bytes(header[2..6].try_into().unwrap()) as usize;
    let more = header[6] & FLAG_MORE != 0;

    if payload_len > max_frame {
        return Err(TransportError::FrameTooLarge {
            size: payload_len,
            max: max_frame,
        });
    }

    Ok((payload_len, more))
}
