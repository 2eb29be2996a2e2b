//! <type name="flow" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:flow:list" code="0x00000000:0x00000013"/>
//! </type>

use argon_codec::Value;

use crate::definitions::FLOW;
use crate::field_list::FieldList;
use crate::value_conv::{opt_u32_to_value, value_to_bool, value_to_opt_u32};

/// Update link/session flow-control state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flow {
    fields: FieldList,
}

impl Flow {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = FLOW;

    /// Wraps an already-decoded field list.
    pub fn from_fields(fields: FieldList) -> Self {
        Self { fields }
    }

    /// The field list to encode (trailing nulls trimmed).
    pub fn into_fields(self) -> FieldList {
        self.fields
    }

    /// `incoming-window`.
    pub fn incoming_window(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(1)).unwrap_or(0)
    }

    /// `next-outgoing-id`.
    pub fn next_outgoing_id(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(2)).unwrap_or(0)
    }

    /// `outgoing-window`.
    pub fn outgoing_window(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(3)).unwrap_or(0)
    }

    /// `handle`; `None` means this Flow targets the session, not a link.
    pub fn handle(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(4))
    }

    /// Sets `handle`.
    pub fn set_handle(&mut self, value: Option<u32>) {
        self.fields.set(4, opt_u32_to_value(value));
    }

    /// `delivery-count`.
    pub fn delivery_count(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(5))
    }

    /// `link-credit`, the quota a sender may consume before waiting for
    /// another `Flow`.
    pub fn link_credit(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(6))
    }

    /// Sets `link-credit`.
    pub fn set_link_credit(&mut self, value: u32) {
        self.fields.set(6, Value::UInt(value));
    }

    /// `drain`.
    pub fn drain(&self) -> bool {
        value_to_bool(&self.fields.get(8), false)
    }

    /// `echo`.
    pub fn echo(&self) -> bool {
        value_to_bool(&self.fields.get(9), false)
    }
}
