//! Conversions between [`Descriptor`] and the [`Value`] it's carried as on
//! the wire, and the shared recursion-depth limit for the codec.

use crate::error::{Error, Result};
use crate::value::{Descriptor, Symbol, Value};

/// The deepest a described-value/list/map/array nesting may go before
/// [`crate::ser::emit_data`]/[`crate::de::parse_data`] give up with
/// [`Error::DepthExceeded`]. Chosen generously above anything a real
/// performative or message nests to; its purpose is to turn a cyclic or
/// adversarial input into an error instead of a stack overflow.
pub const MAX_DEPTH: usize = 32;

/// Encodes a descriptor as the `Value` the wire carries it as: a `ulong`
/// for a numeric descriptor, a `symbol` for a named one.
pub fn descriptor_to_value(descriptor: &Descriptor) -> Value {
    match descriptor {
        Descriptor::Code(code) => Value::ULong(*code),
        Descriptor::Name(name) => Value::Symbol(Symbol(name.clone())),
    }
}

/// The inverse of [`descriptor_to_value`]: recovers a descriptor from the
/// value a decoded `0x00` constructor was followed by.
pub fn value_to_descriptor(value: Value) -> Result<Descriptor> {
    match value {
        Value::ULong(code) => Ok(Descriptor::Code(code)),
        Value::UInt(code) => Ok(Descriptor::Code(code as u64)),
        Value::Symbol(Symbol(name)) => Ok(Descriptor::Name(name)),
        Value::String(name) => Ok(Descriptor::Name(name)),
        other => Err(Error::Message(format!(
            "descriptor must be a ulong or symbol, found {}",
            other.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_descriptor_round_trips() {
        let descriptor = Descriptor::Code(0x10);
        let value = descriptor_to_value(&descriptor);
        assert_eq!(value, Value::ULong(0x10));
        assert_eq!(value_to_descriptor(value).unwrap(), descriptor);
    }

    #[test]
    fn named_descriptor_round_trips() {
        let descriptor = Descriptor::Name("amqp:open:list".to_string());
        let value = descriptor_to_value(&descriptor);
        assert_eq!(value, Value::Symbol(Symbol("amqp:open:list".to_string())));
        assert_eq!(value_to_descriptor(value).unwrap(), descriptor);
    }

    #[test]
    fn non_descriptor_value_is_rejected() {
        let err = value_to_descriptor(Value::Bool(true)).unwrap_err();
        assert!(matches!(err, Error::Message(_)));
    }
}
