//! Small, lossy conversions between [`Value`] and the Rust types field
//! accessors present to callers. These are deliberately permissive on
//! decode (an unexpected shape becomes `None`/a default rather than an
//! error) because a short or oddly-typed field list is valid AMQP, not
//! malformed input — malformed input is caught earlier, at the codec
//! layer.

use argon_codec::{Symbol, Value};

pub fn value_to_opt_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Symbol(Symbol(s)) => Some(s.clone()),
        _ => None,
    }
}

pub fn opt_string_to_value(value: Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s),
        None => Value::Null,
    }
}

pub fn opt_symbol_to_value(value: Option<String>) -> Value {
    match value {
        Some(s) => Value::Symbol(Symbol(s)),
        None => Value::Null,
    }
}

pub fn value_to_opt_u32(value: &Value) -> Option<u32> {
    match value {
        Value::UInt(v) => Some(*v),
        Value::UByte(v) => Some(*v as u32),
        Value::UShort(v) => Some(*v as u32),
        _ => None,
    }
}

pub fn opt_u32_to_value(value: Option<u32>) -> Value {
    match value {
        Some(v) => Value::UInt(v),
        None => Value::Null,
    }
}

pub fn value_to_opt_u16(value: &Value) -> Option<u16> {
    match value {
        Value::UShort(v) => Some(*v),
        Value::UByte(v) => Some(*v as u16),
        _ => None,
    }
}

pub fn opt_u16_to_value(value: Option<u16>) -> Value {
    match value {
        Some(v) => Value::UShort(v),
        None => Value::Null,
    }
}

pub fn value_to_opt_u8(value: &Value) -> Option<u8> {
    match value {
        Value::UByte(v) => Some(*v),
        _ => None,
    }
}

pub fn opt_u8_to_value(value: Option<u8>) -> Value {
    match value {
        Some(v) => Value::UByte(v),
        None => Value::Null,
    }
}

pub fn value_to_opt_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

pub fn opt_bool_to_value(value: Option<bool>) -> Value {
    match value {
        Some(b) => Value::Bool(b),
        None => Value::Null,
    }
}

pub fn bool_to_value(value: bool) -> Value {
    Value::Bool(value)
}

pub fn value_to_bool(value: &Value, default: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        _ => default,
    }
}

pub fn value_to_opt_u64(value: &Value) -> Option<u64> {
    match value {
        Value::ULong(v) => Some(*v),
        Value::UInt(v) => Some(*v as u64),
        _ => None,
    }
}

pub fn opt_u64_to_value(value: Option<u64>) -> Value {
    match value {
        Some(v) => Value::ULong(v),
        None => Value::Null,
    }
}

pub fn value_to_opt_binary(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Binary(b) => Some(b.clone()),
        _ => None,
    }
}

pub fn opt_binary_to_value(value: Option<Vec<u8>>) -> Value {
    match value {
        Some(b) => Value::Binary(b),
        None => Value::Null,
    }
}
