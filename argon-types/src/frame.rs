//! The 8-byte AMQP frame header and the performative-plus-payload envelope
//! it wraps, per §3/§4.3.

use argon_codec::{parse_data, Buffer};

use crate::error::{Error, Result};
use crate::performatives::Performative;

/// The frame header's `doff` field, in 4-byte words. This client neither
/// reads nor writes frame extensions, so every frame it emits carries the
/// minimum legal value.
const DATA_OFFSET_WORDS: u8 = 2;

/// AMQP frame type byte for a frame carrying a performative (as opposed to
/// an SASL frame, type `0x01`, which this client never emits or expects).
const FRAME_TYPE_AMQP: u8 = 0x00;

/// One AMQP frame: a channel, a performative, and an optional binary
/// payload (used only by `Transfer`, which carries a message's encoded
/// bytes as payload rather than as a field of the performative itself).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The channel this frame addresses.
    pub channel: u16,
    /// The control performative this frame carries.
    pub performative: Performative,
    /// The frame's payload, if any (always empty except for `Transfer`).
    pub payload: Vec<u8>,
}

impl Frame {
    /// Builds a frame with no payload.
    pub fn new(channel: u16, performative: Performative) -> Self {
        Self {
            channel,
            performative,
            payload: Vec::new(),
        }
    }

    /// Builds a frame carrying `payload`.
    pub fn with_payload(channel: u16, performative: Performative, payload: Vec<u8>) -> Self {
        Self {
            channel,
            performative,
            payload,
        }
    }
}

/// Encodes `frame` at `offset`, returning the offset just past it.
///
/// Follows §4.3's emit procedure exactly: reserve the 4-byte size field,
/// pack the fixed `doff`/type/channel header, emit the performative through
/// the type codec, append the payload verbatim, then back-patch the size
/// field with the total frame length.
pub fn emit_frame(buf: &mut Buffer, offset: usize, frame: &Frame) -> Result<usize> {
    let (offset, size_slot) = buf.skip(offset, 4);

    let offset = buf.pack_u8(offset, DATA_OFFSET_WORDS);
    let offset = buf.pack_u8(offset, FRAME_TYPE_AMQP);
    let offset = buf.pack_u16(offset, frame.channel);

    let offset = parse_performative_emit(buf, offset, frame)?;
    let offset = buf.write(offset, &frame.payload);

    let size = (offset - size_slot.offset()) as u32;
    buf.commit_u32(size_slot, size);

    Ok(offset)
}

fn parse_performative_emit(buf: &mut Buffer, offset: usize, frame: &Frame) -> Result<usize> {
    let value = frame.performative.to_value();
    argon_codec::emit_data(buf, offset, &value).map_err(Error::from)
}

/// Parses one frame starting at `offset`.
///
/// Per the reader invariant in §4.3: if fewer than `size` bytes are
/// present after the header, this returns `Ok(None)` and leaves `offset`
/// untouched so the caller can retry once more bytes have arrived. Any
/// other failure (a malformed performative, an unrecognized descriptor, an
/// out-of-range `doff`) is a hard error — the frame that produced it is
/// fatal to the connection per §7.
pub fn parse_frame(buf: &Buffer, offset: usize) -> Result<Option<(usize, Frame)>> {
    // The fixed header (size + doff + type + channel) is 8 bytes; if we
    // don't even have that much buffered yet, there's nothing to parse.
    let header = match buf.unpack_u32(offset) {
        Ok(pair) => pair,
        Err(_) => return Ok(None),
    };
    let (after_size, size) = header;
    let size = size as usize;

    let (after_doff, doff) = buf.unpack_u8(after_size)?;
    if doff < DATA_OFFSET_WORDS {
        return Err(Error::InvalidDataOffset(doff));
    }
    let (after_type, _frame_type) = buf.unpack_u8(after_doff)?;
    let (after_channel, channel) = buf.unpack_u16(after_type)?;

    let end = offset + size;
    // We can't know whether the full frame is buffered until we know
    // `size`, which we just read; if the buffer doesn't reach `end`, any
    // attempt to read the performative or payload below would hit
    // `UnexpectedEnd` — treat that identically to "not enough yet".
    if buf.len() < end {
        return Ok(None);
    }

    let body_offset = offset + (doff as usize) * 4;
    let (after_performative, value) = match parse_data(buf, body_offset) {
        Ok(pair) => pair,
        Err(err) => return Err(Error::from(err)),
    };
    let performative = Performative::from_value(value)?;

    let (end2, payload) = buf.read(after_performative, end - after_performative)?;
    debug_assert_eq!(end2, end);
    let _ = after_channel;

    Ok(Some((
        end,
        Frame::with_payload(channel, performative, payload.to_vec()),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performatives::Open;

    #[test]
    fn open_frame_with_one_field_encodes_byte_for_byte() {
        let mut buf = Buffer::new();
        let performative = Performative::Open(Open::new("abc"));
        let frame = Frame::new(0, performative);
        let end = emit_frame(&mut buf, 0, &frame).unwrap();

        let hex: String = buf.as_slice()[..end]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        // size=19, doff=2, type=0, channel=0, descriptor 0x10 via 0x53 0x10,
        // a one-element short list holding "abc" as a Str8.
        assert_eq!(hex, "00 00 00 13 02 00 00 00 00 53 10 C0 06 01 A1 03 61 62 63");
        assert_eq!(end, 19);
    }

    #[test]
    fn frame_round_trips() {
        let mut buf = Buffer::new();
        let performative = Performative::Open(Open::new("container-a"));
        let frame = Frame::with_payload(3, performative, vec![1, 2, 3]);
        let end = emit_frame(&mut buf, 0, &frame).unwrap();

        let (parsed_end, parsed) = parse_frame(&buf, 0).unwrap().unwrap();
        assert_eq!(parsed_end, end);
        assert_eq!(parsed, frame);
    }

    #[test]
    fn short_buffer_returns_none_without_consuming_offset() {
        let mut buf = Buffer::new();
        let performative = Performative::Open(Open::new("abc"));
        let frame = Frame::new(0, performative);
        let mut full = Buffer::new();
        emit_frame(&mut full, 0, &frame).unwrap();

        // Only the first 5 bytes are "arrived".
        buf.write(0, &full.as_slice()[..5]);
        let result = parse_frame(&buf, 0).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn doff_below_minimum_is_rejected() {
        let mut buf = Buffer::new();
        buf.pack_u32(0, 8);
        buf.pack_u8(4, 1); // doff = 1, below the minimum of 2
        buf.pack_u8(5, 0);
        buf.pack_u16(6, 0);
        let err = parse_frame(&buf, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidDataOffset(1)));
    }
}
