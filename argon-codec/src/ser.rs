//! Encoding: `Value` → bytes.
//!
//! `emit_data` is the single recursive entry point described in §4.2: every
//! value, described or not, goes through the same three-step dance —
//! reserve one byte for the constructor, emit the body (which picks and
//! returns the most compact format code that fits), then back-patch the
//! reserved byte. Compound bodies (list/map/array) apply the same
//! reserve-then-backpatch idiom one level deeper for their size/count
//! header, using the "encode into a scratch buffer first" strategy the
//! design notes recommend over optimistic short-then-promote: it avoids a
//! conditional re-encode and a forward copy.

use crate::buffer::Buffer;
use crate::descriptor::{descriptor_to_value, MAX_DEPTH};
use crate::error::{Error, Result};
use crate::format_code::EncodingCodes;
use crate::value::{Described, Value};

/// Encodes `value` at `offset`, returning the offset just past the encoded
/// bytes.
pub fn emit_data(buf: &mut Buffer, offset: usize, value: &Value) -> Result<usize> {
    emit_data_depth(buf, offset, value, 0)
}

fn emit_data_depth(buf: &mut Buffer, offset: usize, value: &Value, depth: usize) -> Result<usize> {
    if depth > MAX_DEPTH {
        return Err(Error::DepthExceeded { limit: MAX_DEPTH });
    }

    if let Value::Described(Described { descriptor, value }) = value {
        let offset = buf.write(offset, &[0x00]);
        let descriptor_value = descriptor_to_value(descriptor);
        let offset = emit_data_depth(buf, offset, &descriptor_value, depth + 1)?;
        return emit_data_depth(buf, offset, value, depth + 1);
    }

    let (offset, slot) = buf.skip(offset, 1);
    let (offset, code) = emit_body(buf, offset, value, depth)?;
    buf.commit_u8(slot, code.to_u8());
    Ok(offset)
}

fn emit_body(
    buf: &mut Buffer,
    offset: usize,
    value: &Value,
    depth: usize,
) -> Result<(usize, EncodingCodes)> {
    use EncodingCodes::*;

    let result = match value {
        Value::Described(_) => unreachable!("handled by emit_data_depth"),

        Value::Null => (offset, Null),

        Value::Bool(true) => (offset, BooleanTrue),
        Value::Bool(false) => (offset, BooleanFalse),

        Value::UByte(v) => (buf.pack_u8(offset, *v), UByte),
        Value::UShort(v) => (buf.pack_u16(offset, *v), UShort),
        Value::UInt(v) => match *v {
            0 => (offset, Uint0),
            1..=255 => (buf.pack_u8(offset, *v as u8), SmallUint),
            _ => (buf.pack_u32(offset, *v), UInt),
        },
        Value::ULong(v) => match *v {
            0 => (offset, Ulong0),
            1..=255 => (buf.pack_u8(offset, *v as u8), SmallUlong),
            _ => (buf.pack_u64(offset, *v), ULong),
        },

        Value::Byte(v) => (buf.pack_i8(offset, *v), Byte),
        Value::Short(v) => (buf.pack_i16(offset, *v), Short),
        Value::Int(v) => match *v {
            -128..=127 => (buf.pack_i8(offset, *v as i8), SmallInt),
            _ => (buf.pack_i32(offset, *v), Int),
        },
        Value::Long(v) => match *v {
            -128..=127 => (buf.pack_i8(offset, *v as i8), SmallLong),
            _ => (buf.pack_i64(offset, *v), Long),
        },

        Value::Float(v) => (buf.pack_f32(offset, v.into_inner()), Float),
        Value::Double(v) => (buf.pack_f64(offset, v.into_inner()), Double),

        Value::Decimal32(octets) => (buf.write(offset, octets), Decimal32),
        Value::Decimal64(octets) => (buf.write(offset, octets), Decimal64),
        Value::Decimal128(octets) => (buf.write(offset, octets), Decimal128),

        Value::Char(c) => (buf.pack_u32(offset, *c as u32), Char),
        Value::Timestamp(ms) => (buf.pack_i64(offset, *ms), Timestamp),
        Value::Uuid(octets) => (buf.write(offset, octets), Uuid),

        Value::Binary(octets) => {
            if octets.len() < 256 {
                let offset = buf.pack_u8(offset, octets.len() as u8);
                (buf.write(offset, octets), VBin8)
            } else {
                let offset = buf.pack_u32(offset, octets.len() as u32);
                (buf.write(offset, octets), VBin32)
            }
        }
        Value::String(s) => {
            let bytes = s.as_bytes();
            if bytes.len() < 256 {
                let offset = buf.pack_u8(offset, bytes.len() as u8);
                (buf.write(offset, bytes), Str8)
            } else {
                let offset = buf.pack_u32(offset, bytes.len() as u32);
                (buf.write(offset, bytes), Str32)
            }
        }
        Value::Symbol(sym) => {
            let bytes = sym.0.as_bytes();
            if bytes.len() < 256 {
                let offset = buf.pack_u8(offset, bytes.len() as u8);
                (buf.write(offset, bytes), Sym8)
            } else {
                let offset = buf.pack_u32(offset, bytes.len() as u32);
                (buf.write(offset, bytes), Sym32)
            }
        }

        Value::List(items) => {
            if items.is_empty() {
                (offset, List0)
            } else {
                let mut scratch = Buffer::new();
                let mut scratch_offset = 0;
                for item in items {
                    scratch_offset = emit_data_depth(&mut scratch, scratch_offset, item, depth + 1)?;
                }
                emit_compound(buf, offset, scratch.as_slice(), items.len(), List8, List32)
            }
        }
        Value::Map(entries) => {
            let mut scratch = Buffer::new();
            let mut scratch_offset = 0;
            for (key, val) in entries {
                scratch_offset = emit_data_depth(&mut scratch, scratch_offset, key, depth + 1)?;
                scratch_offset = emit_data_depth(&mut scratch, scratch_offset, val, depth + 1)?;
            }
            emit_compound(buf, offset, scratch.as_slice(), 2 * entries.len(), Map8, Map32)
        }
        Value::Array(items) => {
            return emit_array(buf, offset, items, depth);
        }
    };

    Ok(result)
}

/// Emits the size/count header for a list or map body, choosing the short
/// or long form by the thresholds in §4.2, then appends the pre-encoded
/// child bytes.
fn emit_compound(
    buf: &mut Buffer,
    offset: usize,
    children: &[u8],
    count: usize,
    short_code: EncodingCodes,
    long_code: EncodingCodes,
) -> (usize, EncodingCodes) {
    let short_size = 1 + children.len();
    if short_size >= 256 || count >= 256 {
        let long_size = (4 + children.len()) as u32;
        let offset = buf.pack_u32(offset, long_size);
        let offset = buf.pack_u32(offset, count as u32);
        (buf.write(offset, children), long_code)
    } else {
        let offset = buf.pack_u8(offset, short_size as u8);
        let offset = buf.pack_u8(offset, count as u8);
        (buf.write(offset, children), short_code)
    }
}

/// Emits an array body: one shared element constructor, then each
/// element's *body* only (no per-element constructor), per §4.2.
///
/// Because the constructor is written once for the whole array, an
/// element can't use a magnitude-dependent compact form the way a
/// top-level value would — a `uint` array holding both `0` and `300`
/// cannot mix `Uint0`/`SmallUint`/`UInt` bodies under one code. Every
/// element is therefore written in its type's single unparameterized
/// body form via [`emit_long_element`], chosen once by
/// [`choose_array_element_code`].
fn emit_array(
    buf: &mut Buffer,
    offset: usize,
    items: &[Value],
    depth: usize,
) -> Result<(usize, EncodingCodes)> {
    use EncodingCodes::*;

    if items.is_empty() {
        return Err(Error::Message(
            "cannot encode an empty array: no element type to choose a shared constructor from"
                .to_string(),
        ));
    }

    let code = choose_array_element_code(items)?;

    let mut scratch = Buffer::new();
    let (mut scratch_offset, slot) = scratch.skip(0, 1);
    scratch.commit_u8(slot, code.to_u8());
    for item in items {
        scratch_offset = emit_long_element(&mut scratch, scratch_offset, item, code, depth + 1)?;
    }

    Ok(emit_compound(
        buf,
        offset,
        scratch.as_slice(),
        items.len(),
        Array8,
        Array32,
    ))
}

/// Picks the one format code every element of `items` will share, per the
/// element kind. All elements must agree on kind; a per-element descriptor
/// is not supported (an array's descriptor, if any, wraps the whole array).
fn choose_array_element_code(items: &[Value]) -> Result<EncodingCodes> {
    use EncodingCodes::*;

    let kind = items[0].kind_name();
    if let Some(mismatch) = items.iter().find(|v| v.kind_name() != kind) {
        return Err(Error::Message(format!(
            "array elements must share one type: found both {} and {}",
            kind,
            mismatch.kind_name()
        )));
    }

    let code = match &items[0] {
        Value::Null => Null,
        Value::Bool(_) => Boolean,
        Value::UByte(_) => UByte,
        Value::UShort(_) => UShort,
        Value::UInt(_) => UInt,
        Value::ULong(_) => ULong,
        Value::Byte(_) => Byte,
        Value::Short(_) => Short,
        Value::Int(_) => Int,
        Value::Long(_) => Long,
        Value::Float(_) => Float,
        Value::Double(_) => Double,
        Value::Decimal32(_) => Decimal32,
        Value::Decimal64(_) => Decimal64,
        Value::Decimal128(_) => Decimal128,
        Value::Char(_) => Char,
        Value::Timestamp(_) => Timestamp,
        Value::Uuid(_) => Uuid,
        Value::Binary(_) => {
            let max = items
                .iter()
                .map(|v| match v {
                    Value::Binary(b) => b.len(),
                    _ => 0,
                })
                .max()
                .unwrap_or(0);
            if max < 256 { VBin8 } else { VBin32 }
        }
        Value::String(_) => {
            let max = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.len(),
                    _ => 0,
                })
                .max()
                .unwrap_or(0);
            if max < 256 { Str8 } else { Str32 }
        }
        Value::Symbol(_) => {
            let max = items
                .iter()
                .map(|v| match v {
                    Value::Symbol(s) => s.0.len(),
                    _ => 0,
                })
                .max()
                .unwrap_or(0);
            if max < 256 { Sym8 } else { Sym32 }
        }
        // Nested compounds always use the long form inside an array: the
        // short/long choice would otherwise have to be made per element,
        // which the shared constructor can't express.
        Value::List(_) => List32,
        Value::Map(_) => Map32,
        Value::Array(_) => Array32,
        Value::Described(_) => {
            return Err(Error::Message(
                "array elements may not carry individual descriptors".to_string(),
            ));
        }
    };
    Ok(code)
}

/// Writes one array element's body in the unparameterized form `code`
/// requires, with no per-element constructor byte.
fn emit_long_element(
    buf: &mut Buffer,
    offset: usize,
    value: &Value,
    code: EncodingCodes,
    depth: usize,
) -> Result<usize> {
    use EncodingCodes::*;

    if depth > MAX_DEPTH {
        return Err(Error::DepthExceeded { limit: MAX_DEPTH });
    }

    let offset = match (code, value) {
        (Null, Value::Null) => offset,
        (Boolean, Value::Bool(b)) => buf.pack_u8(offset, if *b { 1 } else { 0 }),
        (UByte, Value::UByte(v)) => buf.pack_u8(offset, *v),
        (UShort, Value::UShort(v)) => buf.pack_u16(offset, *v),
        (UInt, Value::UInt(v)) => buf.pack_u32(offset, *v),
        (ULong, Value::ULong(v)) => buf.pack_u64(offset, *v),
        (Byte, Value::Byte(v)) => buf.pack_i8(offset, *v),
        (Short, Value::Short(v)) => buf.pack_i16(offset, *v),
        (Int, Value::Int(v)) => buf.pack_i32(offset, *v),
        (Long, Value::Long(v)) => buf.pack_i64(offset, *v),
        (Float, Value::Float(v)) => buf.pack_f32(offset, v.into_inner()),
        (Double, Value::Double(v)) => buf.pack_f64(offset, v.into_inner()),
        (Decimal32, Value::Decimal32(octets)) => buf.write(offset, octets),
        (Decimal64, Value::Decimal64(octets)) => buf.write(offset, octets),
        (Decimal128, Value::Decimal128(octets)) => buf.write(offset, octets),
        (Char, Value::Char(c)) => buf.pack_u32(offset, *c as u32),
        (Timestamp, Value::Timestamp(ms)) => buf.pack_i64(offset, *ms),
        (Uuid, Value::Uuid(octets)) => buf.write(offset, octets),

        (VBin8, Value::Binary(b)) => {
            let offset = buf.pack_u8(offset, b.len() as u8);
            buf.write(offset, b)
        }
        (VBin32, Value::Binary(b)) => {
            let offset = buf.pack_u32(offset, b.len() as u32);
            buf.write(offset, b)
        }
        (Str8, Value::String(s)) => {
            let bytes = s.as_bytes();
            let offset = buf.pack_u8(offset, bytes.len() as u8);
            buf.write(offset, bytes)
        }
        (Str32, Value::String(s)) => {
            let bytes = s.as_bytes();
            let offset = buf.pack_u32(offset, bytes.len() as u32);
            buf.write(offset, bytes)
        }
        (Sym8, Value::Symbol(sym)) => {
            let bytes = sym.0.as_bytes();
            let offset = buf.pack_u8(offset, bytes.len() as u8);
            buf.write(offset, bytes)
        }
        (Sym32, Value::Symbol(sym)) => {
            let bytes = sym.0.as_bytes();
            let offset = buf.pack_u32(offset, bytes.len() as u32);
            buf.write(offset, bytes)
        }

        (List32, Value::List(children)) => {
            let mut scratch = Buffer::new();
            let mut scratch_offset = 0;
            for child in children {
                scratch_offset = emit_data_depth(&mut scratch, scratch_offset, child, depth + 1)?;
            }
            let offset = buf.pack_u32(offset, (4 + scratch.len()) as u32);
            let offset = buf.pack_u32(offset, children.len() as u32);
            buf.write(offset, scratch.as_slice())
        }
        (Map32, Value::Map(entries)) => {
            let mut scratch = Buffer::new();
            let mut scratch_offset = 0;
            for (key, val) in entries {
                scratch_offset = emit_data_depth(&mut scratch, scratch_offset, key, depth + 1)?;
                scratch_offset = emit_data_depth(&mut scratch, scratch_offset, val, depth + 1)?;
            }
            let offset = buf.pack_u32(offset, (4 + scratch.len()) as u32);
            let offset = buf.pack_u32(offset, (2 * entries.len()) as u32);
            buf.write(offset, scratch.as_slice())
        }
        (Array32, Value::Array(children)) => {
            if children.is_empty() {
                return Err(Error::Message(
                    "cannot encode an empty array: no element type to choose a shared constructor from"
                        .to_string(),
                ));
            }
            let element_code = choose_array_element_code(children)?;
            let mut scratch = Buffer::new();
            let (mut scratch_offset, slot) = scratch.skip(0, 1);
            scratch.commit_u8(slot, element_code.to_u8());
            for child in children {
                scratch_offset =
                    emit_long_element(&mut scratch, scratch_offset, child, element_code, depth + 1)?;
            }
            let offset = buf.pack_u32(offset, (4 + scratch.len()) as u32);
            let offset = buf.pack_u32(offset, children.len() as u32);
            buf.write(offset, scratch.as_slice())
        }

        (code, value) => {
            return Err(Error::Message(format!(
                "array element {} does not match shared constructor {}",
                value.kind_name(),
                code
            )));
        }
    };

    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::parse_data;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn null_is_0x40() {
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::Null).unwrap();
        assert_eq!(hex(buf.as_slice()), "40");
    }

    #[test]
    fn booleans_use_compact_codes() {
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::Bool(true)).unwrap();
        assert_eq!(hex(buf.as_slice()), "41");

        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::Bool(false)).unwrap();
        assert_eq!(hex(buf.as_slice()), "42");
    }

    #[test]
    fn uint_schedule_matches_spec() {
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::UInt(0)).unwrap();
        assert_eq!(hex(buf.as_slice()), "43");

        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::UInt(128)).unwrap();
        assert_eq!(hex(buf.as_slice()), "52 80");

        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::UInt(0xFFFF_FFFF)).unwrap();
        assert_eq!(hex(buf.as_slice()), "70 FF FF FF FF");
    }

    #[test]
    fn string_with_multibyte_utf8() {
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::String("Hello, \u{1F34B}!".to_string())).unwrap();
        assert_eq!(
            hex(buf.as_slice()),
            "A1 0B 48 65 6C 6C 6F 2C 20 F0 9F 8D 8B 21"
        );
    }

    #[test]
    fn empty_list_is_list0() {
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &Value::List(vec![])).unwrap();
        assert_eq!(hex(buf.as_slice()), "45");
    }

    #[test]
    fn short_list_of_uints() {
        let mut buf = Buffer::new();
        let list = Value::List(vec![Value::UInt(0), Value::UInt(1), Value::UInt(2)]);
        emit_data(&mut buf, 0, &list).unwrap();
        // C0 <size> 03 43 52 01 52 02
        assert_eq!(hex(buf.as_slice()), "C0 06 03 43 52 01 52 02");
    }

    #[test]
    fn round_trips_nested_structures() {
        let value = Value::List(vec![
            Value::String("a".into()),
            Value::Map(vec![(Value::Symbol("k".into()), Value::Bool(true))]),
            Value::Binary(vec![1, 2, 3]),
        ]);
        let mut buf = Buffer::new();
        let end = emit_data(&mut buf, 0, &value).unwrap();
        let (parsed_end, parsed) = parse_data(&buf, 0).unwrap();
        assert_eq!(end, parsed_end);
        assert_eq!(parsed, value);
    }

    #[test]
    fn long_form_promotion_for_large_lists() {
        let items: Vec<Value> = (0..300).map(Value::UInt).collect();
        let value = Value::List(items.clone());
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &value).unwrap();
        assert_eq!(buf.as_slice()[0], EncodingCodes::List32.to_u8());

        let (_, parsed) = parse_data(&buf, 0).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn array_shares_one_constructor() {
        let value = Value::Array(vec![Value::UInt(0), Value::UInt(1), Value::UInt(300)]);
        let mut buf = Buffer::new();
        emit_data(&mut buf, 0, &value).unwrap();
        let (_, parsed) = parse_data(&buf, 0).unwrap();
        assert_eq!(parsed, value);
    }
}
