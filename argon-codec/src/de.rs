//! Decoding: bytes → `Value`.
//!
//! `parse_data` mirrors [`crate::ser::emit_data`] step for step: read the
//! constructor byte (or the `0x00` described-value marker), then dispatch
//! the body on the decoded [`EncodingCodes`]. Compound bodies read their
//! size/count header, decode children until the size-bounded region runs
//! out, and compare the number of children actually found against the
//! declared count — the declared count is informational on the wire (a
//! reader could recover without it by watching `size` alone), but a
//! mismatch between the two is exactly the kind of malformed input this
//! layer exists to catch cleanly rather than silently tolerate.

use std::convert::TryFrom;

use ordered_float::OrderedFloat;

use crate::buffer::Buffer;
use crate::descriptor::{value_to_descriptor, MAX_DEPTH};
use crate::error::{Error, Result};
use crate::format_code::EncodingCodes;
use crate::value::{Described, Symbol, Value};

/// Decodes one value starting at `offset`, returning the offset just past
/// it and the decoded value.
pub fn parse_data(buf: &Buffer, offset: usize) -> Result<(usize, Value)> {
    parse_data_depth(buf, offset, 0)
}

fn parse_data_depth(buf: &Buffer, offset: usize, depth: usize) -> Result<(usize, Value)> {
    if depth > MAX_DEPTH {
        return Err(Error::DepthExceeded { limit: MAX_DEPTH });
    }

    let (offset, code_byte) = buf.unpack_u8(offset)?;
    if code_byte == EncodingCodes::DescribedType.to_u8() {
        let (offset, descriptor_value) = parse_data_depth(buf, offset, depth + 1)?;
        let descriptor = value_to_descriptor(descriptor_value)?;
        let (offset, value) = parse_data_depth(buf, offset, depth + 1)?;
        return Ok((
            offset,
            Value::Described(Described {
                descriptor,
                value: Box::new(value),
            }),
        ));
    }

    let code = EncodingCodes::try_from(code_byte)?;
    parse_body(buf, offset, code, depth)
}

fn parse_body(
    buf: &Buffer,
    offset: usize,
    code: EncodingCodes,
    depth: usize,
) -> Result<(usize, Value)> {
    use EncodingCodes::*;

    let result = match code {
        DescribedType => unreachable!("handled by parse_data_depth"),

        Null => (offset, Value::Null),

        BooleanTrue => (offset, Value::Bool(true)),
        BooleanFalse => (offset, Value::Bool(false)),
        Boolean => {
            let (offset, v) = buf.unpack_u8(offset)?;
            (offset, Value::Bool(v != 0))
        }

        UByte => {
            let (offset, v) = buf.unpack_u8(offset)?;
            (offset, Value::UByte(v))
        }
        UShort => {
            let (offset, v) = buf.unpack_u16(offset)?;
            (offset, Value::UShort(v))
        }
        Uint0 => (offset, Value::UInt(0)),
        SmallUint => {
            let (offset, v) = buf.unpack_u8(offset)?;
            (offset, Value::UInt(v as u32))
        }
        UInt => {
            let (offset, v) = buf.unpack_u32(offset)?;
            (offset, Value::UInt(v))
        }
        Ulong0 => (offset, Value::ULong(0)),
        SmallUlong => {
            let (offset, v) = buf.unpack_u8(offset)?;
            (offset, Value::ULong(v as u64))
        }
        ULong => {
            let (offset, v) = buf.unpack_u64(offset)?;
            (offset, Value::ULong(v))
        }

        Byte => {
            let (offset, v) = buf.unpack_i8(offset)?;
            (offset, Value::Byte(v))
        }
        Short => {
            let (offset, v) = buf.unpack_i16(offset)?;
            (offset, Value::Short(v))
        }
        SmallInt => {
            let (offset, v) = buf.unpack_i8(offset)?;
            (offset, Value::Int(v as i32))
        }
        Int => {
            let (offset, v) = buf.unpack_i32(offset)?;
            (offset, Value::Int(v))
        }
        SmallLong => {
            let (offset, v) = buf.unpack_i8(offset)?;
            (offset, Value::Long(v as i64))
        }
        Long => {
            let (offset, v) = buf.unpack_i64(offset)?;
            (offset, Value::Long(v))
        }

        Float => {
            let (offset, v) = buf.unpack_f32(offset)?;
            (offset, Value::Float(OrderedFloat(v)))
        }
        Double => {
            let (offset, v) = buf.unpack_f64(offset)?;
            (offset, Value::Double(OrderedFloat(v)))
        }

        Decimal32 => {
            let (offset, bytes) = buf.read(offset, 4)?;
            let mut octets = [0u8; 4];
            octets.copy_from_slice(bytes);
            (offset, Value::Decimal32(octets))
        }
        Decimal64 => {
            let (offset, bytes) = buf.read(offset, 8)?;
            let mut octets = [0u8; 8];
            octets.copy_from_slice(bytes);
            (offset, Value::Decimal64(octets))
        }
        Decimal128 => {
            let (offset, bytes) = buf.read(offset, 16)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            (offset, Value::Decimal128(octets))
        }

        Char => {
            let (offset, v) = buf.unpack_u32(offset)?;
            let c = char::from_u32(v).ok_or(Error::InvalidCodePoint(v))?;
            (offset, Value::Char(c))
        }
        Timestamp => {
            let (offset, v) = buf.unpack_i64(offset)?;
            (offset, Value::Timestamp(v))
        }
        Uuid => {
            let (offset, bytes) = buf.read(offset, 16)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            (offset, Value::Uuid(octets))
        }

        VBin8 => {
            let (offset, len) = buf.unpack_u8(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Binary(bytes.to_vec()))
        }
        VBin32 => {
            let (offset, len) = buf.unpack_u32(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Binary(bytes.to_vec()))
        }

        Str8 => {
            let (offset, len) = buf.unpack_u8(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::String(std::str::from_utf8(bytes)?.to_string()))
        }
        Str32 => {
            let (offset, len) = buf.unpack_u32(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::String(std::str::from_utf8(bytes)?.to_string()))
        }

        Sym8 => {
            let (offset, len) = buf.unpack_u8(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Symbol(Symbol(std::str::from_utf8(bytes)?.to_string())))
        }
        Sym32 => {
            let (offset, len) = buf.unpack_u32(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Symbol(Symbol(std::str::from_utf8(bytes)?.to_string())))
        }

        List0 => (offset, Value::List(Vec::new())),
        List8 => parse_compound_list(buf, offset, 1, depth)?,
        List32 => parse_compound_list(buf, offset, 4, depth)?,

        Map8 => parse_compound_map(buf, offset, 1, depth)?,
        Map32 => parse_compound_map(buf, offset, 4, depth)?,

        Array8 => parse_array(buf, offset, 1, depth)?,
        Array32 => parse_array(buf, offset, 4, depth)?,
    };

    Ok(result)
}

/// Reads a compound header (`size`, `count`) at `offset` in either its
/// 1-byte (`List8`/`Map8`/`Array8`) or 4-byte (`List32`/`Map32`/`Array32`)
/// form. Returns the offset just past the header alongside both fields.
fn parse_compound_header(buf: &Buffer, offset: usize, width: usize) -> Result<(usize, usize, usize)> {
    if width == 1 {
        let (offset, size) = buf.unpack_u8(offset)?;
        let (offset, count) = buf.unpack_u8(offset)?;
        Ok((offset, size as usize, count as usize))
    } else {
        let (offset, size) = buf.unpack_u32(offset)?;
        let (offset, count) = buf.unpack_u32(offset)?;
        Ok((offset, size as usize, count as usize))
    }
}

fn parse_compound_list(buf: &Buffer, offset: usize, width: usize, depth: usize) -> Result<(usize, Value)> {
    let (offset, size, count) = parse_compound_header(buf, offset, width)?;
    let end = offset + size - width;
    let mut offset = offset;
    let mut items = Vec::new();
    while offset < end {
        let (next, item) = parse_data_depth(buf, offset, depth + 1)?;
        offset = next;
        items.push(item);
    }
    if items.len() != count {
        return Err(Error::CountMismatch {
            declared: count,
            actual: items.len(),
        });
    }
    Ok((offset, Value::List(items)))
}

fn parse_compound_map(buf: &Buffer, offset: usize, width: usize, depth: usize) -> Result<(usize, Value)> {
    let (offset, size, count) = parse_compound_header(buf, offset, width)?;
    let end = offset + size - width;
    let mut offset = offset;
    let mut entries: Vec<(Value, Value)> = Vec::new();
    while offset < end {
        let (next, key) = parse_data_depth(buf, offset, depth + 1)?;
        offset = next;
        let (next, val) = parse_data_depth(buf, offset, depth + 1)?;
        offset = next;
        if entries.iter().any(|(existing, _)| existing == &key) {
            return Err(Error::DuplicateMapKey);
        }
        entries.push((key, val));
    }
    if 2 * entries.len() != count {
        return Err(Error::CountMismatch {
            declared: count,
            actual: 2 * entries.len(),
        });
    }
    Ok((offset, Value::Map(entries)))
}

/// Reads an array body: the header, the one shared element constructor
/// byte, then elements in their unparameterized ("long") form via
/// [`parse_long_element`] until the size-bounded region is exhausted.
fn parse_array(buf: &Buffer, offset: usize, width: usize, depth: usize) -> Result<(usize, Value)> {
    let (offset, size, count) = parse_compound_header(buf, offset, width)?;
    let end = offset + size - width;
    let (offset, element_code_byte) = buf.unpack_u8(offset)?;
    let element_code = EncodingCodes::try_from(element_code_byte)?;

    let mut offset = offset;
    let mut items = Vec::with_capacity(count);
    while offset < end {
        let (next, item) = parse_long_element(buf, offset, element_code, depth + 1)?;
        offset = next;
        items.push(item);
    }
    if items.len() != count {
        return Err(Error::CountMismatch {
            declared: count,
            actual: items.len(),
        });
    }
    Ok((offset, Value::Array(items)))
}

/// Reads one array element's body in the unparameterized form `code`
/// implies, with no per-element constructor byte to read first. Mirrors
/// [`crate::ser::emit_long_element`].
fn parse_long_element(
    buf: &Buffer,
    offset: usize,
    code: EncodingCodes,
    depth: usize,
) -> Result<(usize, Value)> {
    use EncodingCodes::*;

    if depth > MAX_DEPTH {
        return Err(Error::DepthExceeded { limit: MAX_DEPTH });
    }

    let result = match code {
        Null => (offset, Value::Null),
        Boolean => {
            let (offset, v) = buf.unpack_u8(offset)?;
            (offset, Value::Bool(v != 0))
        }
        UByte => {
            let (offset, v) = buf.unpack_u8(offset)?;
            (offset, Value::UByte(v))
        }
        UShort => {
            let (offset, v) = buf.unpack_u16(offset)?;
            (offset, Value::UShort(v))
        }
        UInt => {
            let (offset, v) = buf.unpack_u32(offset)?;
            (offset, Value::UInt(v))
        }
        ULong => {
            let (offset, v) = buf.unpack_u64(offset)?;
            (offset, Value::ULong(v))
        }
        Byte => {
            let (offset, v) = buf.unpack_i8(offset)?;
            (offset, Value::Byte(v))
        }
        Short => {
            let (offset, v) = buf.unpack_i16(offset)?;
            (offset, Value::Short(v))
        }
        Int => {
            let (offset, v) = buf.unpack_i32(offset)?;
            (offset, Value::Int(v))
        }
        Long => {
            let (offset, v) = buf.unpack_i64(offset)?;
            (offset, Value::Long(v))
        }
        Float => {
            let (offset, v) = buf.unpack_f32(offset)?;
            (offset, Value::Float(OrderedFloat(v)))
        }
        Double => {
            let (offset, v) = buf.unpack_f64(offset)?;
            (offset, Value::Double(OrderedFloat(v)))
        }
        Decimal32 => {
            let (offset, bytes) = buf.read(offset, 4)?;
            let mut octets = [0u8; 4];
            octets.copy_from_slice(bytes);
            (offset, Value::Decimal32(octets))
        }
        Decimal64 => {
            let (offset, bytes) = buf.read(offset, 8)?;
            let mut octets = [0u8; 8];
            octets.copy_from_slice(bytes);
            (offset, Value::Decimal64(octets))
        }
        Decimal128 => {
            let (offset, bytes) = buf.read(offset, 16)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            (offset, Value::Decimal128(octets))
        }
        Char => {
            let (offset, v) = buf.unpack_u32(offset)?;
            let c = char::from_u32(v).ok_or(Error::InvalidCodePoint(v))?;
            (offset, Value::Char(c))
        }
        Timestamp => {
            let (offset, v) = buf.unpack_i64(offset)?;
            (offset, Value::Timestamp(v))
        }
        Uuid => {
            let (offset, bytes) = buf.read(offset, 16)?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            (offset, Value::Uuid(octets))
        }
        VBin8 => {
            let (offset, len) = buf.unpack_u8(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Binary(bytes.to_vec()))
        }
        VBin32 => {
            let (offset, len) = buf.unpack_u32(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Binary(bytes.to_vec()))
        }
        Str8 => {
            let (offset, len) = buf.unpack_u8(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::String(std::str::from_utf8(bytes)?.to_string()))
        }
        Str32 => {
            let (offset, len) = buf.unpack_u32(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::String(std::str::from_utf8(bytes)?.to_string()))
        }
        Sym8 => {
            let (offset, len) = buf.unpack_u8(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Symbol(Symbol(std::str::from_utf8(bytes)?.to_string())))
        }
        Sym32 => {
            let (offset, len) = buf.unpack_u32(offset)?;
            let (offset, bytes) = buf.read(offset, len as usize)?;
            (offset, Value::Symbol(Symbol(std::str::from_utf8(bytes)?.to_string())))
        }
        List32 => parse_compound_list(buf, offset, 4, depth)?,
        Map32 => parse_compound_map(buf, offset, 4, depth)?,
        Array32 => parse_array(buf, offset, 4, depth)?,

        other => {
            return Err(Error::UnexpectedFormatCode {
                code: other.to_u8(),
                expected: "array element",
            });
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::emit_data;

    #[test]
    fn rejects_truncated_string_length() {
        let mut buf = Buffer::new();
        buf.write(0, &[EncodingCodes::Str8.to_u8(), 0x05]);
        let err = parse_data(&buf, 0).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEnd { .. }));
    }

    #[test]
    fn rejects_duplicate_map_keys() {
        let mut buf = Buffer::new();
        let mut scratch = Buffer::new();
        let mut offset = 0;
        offset = emit_data(&mut scratch, offset, &Value::Symbol(Symbol("k".into()))).unwrap();
        offset = emit_data(&mut scratch, offset, &Value::Bool(true)).unwrap();
        offset = emit_data(&mut scratch, offset, &Value::Symbol(Symbol("k".into()))).unwrap();
        emit_data(&mut scratch, offset, &Value::Bool(false)).unwrap();

        let offset = buf.pack_u8(0, EncodingCodes::Map8.to_u8());
        let offset = buf.pack_u8(offset, (1 + scratch.len()) as u8);
        let offset = buf.pack_u8(offset, 4);
        buf.write(offset, scratch.as_slice());

        let err = parse_data(&buf, 0).unwrap_err();
        assert!(matches!(err, Error::DuplicateMapKey));
    }

    #[test]
    fn rejects_unrecognized_format_code() {
        let mut buf = Buffer::new();
        buf.write(0, &[0x99]);
        let err = parse_data(&buf, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidFormatCode(0x99)));
    }

    #[test]
    fn described_value_round_trips() {
        let value = Value::Described(Described::new(0x13, Value::List(vec![Value::UInt(1)])));
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &value).unwrap();
        let (_, parsed) = parse_data(&buf, 0).unwrap();
        assert_eq!(parsed, value);
    }
}
