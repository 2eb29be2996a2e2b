//! <type name="attach" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:attach:list" code="0x00000000:0x00000012"/>
//! </type>

use argon_codec::Value;

use crate::definitions::ATTACH;
use crate::field_list::FieldList;
use crate::messaging::{Source, Target};
use crate::value_conv::{
    opt_u32_to_value, opt_u8_to_value, value_to_bool, value_to_opt_string, value_to_opt_u32, value_to_opt_u8,
};

/// Attach a link to a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attach {
    fields: FieldList,
}

impl Attach {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = ATTACH;

    /// Builds an `Attach` for a sending link (`role = false`).
    pub fn new_sender(name: impl Into<String>, handle: u32) -> Self {
        let mut fields = FieldList::new();
        fields.set(0, Value::String(name.into()));
        fields.set(1, Value::UInt(handle));
        fields.set(2, Value::Bool(false));
        Self { fields }
    }

    /// Wraps an already-decoded field list.
    pub fn from_fields(fields: FieldList) -> Self {
        Self { fields }
    }

    /// The field list to encode (trailing nulls trimmed).
    pub fn into_fields(self) -> FieldList {
        self.fields
    }

    /// `name`, the link name that scopes it within a session.
    pub fn name(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(0))
    }

    /// `handle`.
    pub fn handle(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(1))
    }

    /// `role`: `false` = sender, `true` = receiver.
    pub fn role(&self) -> bool {
        value_to_bool(&self.fields.get(2), false)
    }

    /// `snd-settle-mode`.
    pub fn snd_settle_mode(&self) -> Option<u8> {
        value_to_opt_u8(&self.fields.get(3))
    }

    /// Sets `snd-settle-mode`.
    pub fn set_snd_settle_mode(&mut self, value: u8) {
        self.fields.set(3, opt_u8_to_value(Some(value)));
    }

    /// `rcv-settle-mode`.
    pub fn rcv_settle_mode(&self) -> Option<u8> {
        value_to_opt_u8(&self.fields.get(4))
    }

    /// `source`.
    pub fn source(&self) -> Option<Source> {
        match self.fields.get(5) {
            Value::Null => None,
            other => Some(Source::from(other)),
        }
    }

    /// `target`.
    pub fn target(&self) -> Option<Target> {
        match self.fields.get(6) {
            Value::Null => None,
            other => Some(Target::from(other)),
        }
    }

    /// Sets `target`.
    pub fn set_target(&mut self, target: Option<Target>) {
        let value = match target {
            Some(target) => Value::List(target.into_fields().trimmed()),
            None => Value::Null,
        };
        self.fields.set(6, value);
    }

    /// `initial-delivery-count`, mandatory when `role` is sender.
    pub fn initial_delivery_count(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(9))
    }

    /// Sets `initial-delivery-count`.
    pub fn set_initial_delivery_count(&mut self, value: u32) {
        self.fields.set(9, opt_u32_to_value(Some(value)));
    }
}
