//! <type name="begin" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:begin:list" code="0x00000000:0x00000011"/>
//! </type>

use argon_codec::Value;

use crate::definitions::BEGIN;
use crate::field_list::FieldList;
use crate::value_conv::{opt_u16_to_value, opt_u32_to_value, value_to_opt_u16, value_to_opt_u32};

/// Begin a session on a channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Begin {
    fields: FieldList,
}

impl Begin {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = BEGIN;

    /// Builds a `Begin` with the three mandatory window fields set.
    pub fn new(next_outgoing_id: u32, incoming_window: u32, outgoing_window: u32) -> Self {
        let mut fields = FieldList::new();
        fields.set(1, Value::UInt(next_outgoing_id));
        fields.set(2, Value::UInt(incoming_window));
        fields.set(3, Value::UInt(outgoing_window));
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

    /// `remote-channel`, set only by the peer that did not initiate.
    pub fn remote_channel(&self) -> Option<u16> {
        value_to_opt_u16(&self.fields.get(0))
    }

    /// Sets `remote-channel`.
    pub fn set_remote_channel(&mut self, value: Option<u16>) {
        self.fields.set(0, opt_u16_to_value(value));
    }

    /// `next-outgoing-id`.
    pub fn next_outgoing_id(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(1)).unwrap_or(0)
    }

    /// `incoming-window`.
    pub fn incoming_window(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(2)).unwrap_or(0)
    }

    /// `outgoing-window`.
    pub fn outgoing_window(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(3)).unwrap_or(0)
    }

    /// `handle-max`, default `u32::MAX` if unset.
    pub fn handle_max(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(4)).unwrap_or(u32::MAX)
    }

    /// Sets `handle-max`.
    pub fn set_handle_max(&mut self, value: u32) {
        self.fields.set(4, opt_u32_to_value(Some(value)));
    }
}
