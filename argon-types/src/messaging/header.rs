//! <type name="header" class="composite" source="list" provides="section">
//!     <descriptor name="amqp:header:list" code="0x00000000:0x00000070"/>
//! </type>

use argon_codec::Value;

use crate::definitions::HEADER;
use crate::field_list::FieldList;
use crate::value_conv::{opt_u32_to_value, value_to_bool, value_to_opt_u32};

/// Transport-level delivery hints attached to a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    fields: FieldList,
}

impl Header {
    /// The descriptor code for this section.
    pub const DESCRIPTOR: u64 = HEADER;

    /// An empty `Header`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-decoded field list.
    pub fn from_fields(fields: FieldList) -> Self {
        Self { fields }
    }

    /// The field list to encode (trailing nulls trimmed).
    pub fn into_fields(self) -> FieldList {
        self.fields
    }

    /// `durable`, default `false`.
    pub fn durable(&self) -> bool {
        value_to_bool(&self.fields.get(0), false)
    }

    /// Sets `durable`.
    pub fn set_durable(&mut self, value: bool) {
        self.fields.set(0, Value::Bool(value));
    }

    /// `priority`, default `4`.
    pub fn priority(&self) -> u8 {
        match self.fields.get(1) {
            Value::UByte(v) => v,
            _ => 4,
        }
    }

    /// Sets `priority`.
    pub fn set_priority(&mut self, value: u8) {
        self.fields.set(1, Value::UByte(value));
    }

    /// `ttl`, milliseconds.
    pub fn ttl(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(2))
    }

    /// Sets `ttl`.
    pub fn set_ttl(&mut self, value: Option<u32>) {
        self.fields.set(2, opt_u32_to_value(value));
    }

    /// `first-acquirer`, default `false`.
    pub fn first_acquirer(&self) -> bool {
        value_to_bool(&self.fields.get(3), false)
    }

    /// Sets `first-acquirer`.
    pub fn set_first_acquirer(&mut self, value: bool) {
        self.fields.set(3, Value::Bool(value));
    }

    /// `delivery-count`, default `0`.
    pub fn delivery_count(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(4)).unwrap_or(0)
    }

    /// Sets `delivery-count`.
    pub fn set_delivery_count(&mut self, value: u32) {
        self.fields.set(4, Value::UInt(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_wire_schema() {
        let header = Header::new();
        assert!(!header.durable());
        assert_eq!(header.priority(), 4);
        assert_eq!(header.delivery_count(), 0);
        assert_eq!(header.ttl(), None);
    }

    #[test]
    fn set_durable_trims_to_one_slot() {
        let mut header = Header::new();
        header.set_durable(true);
        assert_eq!(header.into_fields().trimmed(), vec![Value::Bool(true)]);
    }
}
