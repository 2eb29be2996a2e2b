//! <type name="transfer" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:transfer:list" code="0x00000000:0x00000014"/>
//! </type>

use argon_codec::Value;

use crate::definitions::TRANSFER;
use crate::field_list::FieldList;
use crate::value_conv::{opt_binary_to_value, value_to_bool, value_to_opt_binary, value_to_opt_u32};

/// Carry one delivery's payload, in whole or in part, to the peer.
///
/// This client is presettled-sender-only (per §4.5): every `Transfer` it
/// emits carries `settled = true` and `more = false`, so fields that only
/// matter for unsettled or multi-frame deliveries (`state`, `resume`,
/// `aborted`, `rcv-settle-mode`, `batchable`) are not exposed here; a
/// decoded frame carrying them simply leaves the corresponding slot in the
/// underlying field list, reachable once this type grows receive support.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transfer {
    fields: FieldList,
}

impl Transfer {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = TRANSFER;

    /// Builds a presettled `Transfer` for `handle`/`delivery_id`, tagged
    /// with `delivery_tag`.
    pub fn new(handle: u32, delivery_id: u32, delivery_tag: Vec<u8>) -> Self {
        let mut fields = FieldList::new();
        fields.set(0, Value::UInt(handle));
        fields.set(1, Value::UInt(delivery_id));
        fields.set(2, Value::Binary(delivery_tag));
        fields.set(3, Value::UInt(0));
        fields.set(4, Value::Bool(true));
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

    /// `handle`.
    pub fn handle(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(0))
    }

    /// `delivery-id`.
    pub fn delivery_id(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(1))
    }

    /// `delivery-tag`.
    pub fn delivery_tag(&self) -> Option<Vec<u8>> {
        value_to_opt_binary(&self.fields.get(2))
    }

    /// Sets `delivery-tag`.
    pub fn set_delivery_tag(&mut self, tag: Option<Vec<u8>>) {
        self.fields.set(2, opt_binary_to_value(tag));
    }

    /// `message-format`.
    pub fn message_format(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(3)).unwrap_or(0)
    }

    /// `settled`.
    pub fn settled(&self) -> bool {
        value_to_bool(&self.fields.get(4), false)
    }

    /// `more`: whether another `Transfer` continues this delivery.
    pub fn more(&self) -> bool {
        value_to_bool(&self.fields.get(5), false)
    }
}
