//! <type name="detach" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:detach:list" code="0x00000000:0x00000016"/>
//! </type>

use argon_codec::Value;

use crate::definitions::DETACH;
use crate::field_list::FieldList;
use crate::value_conv::{value_to_bool, value_to_opt_u32};

/// Detach a link from a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detach {
    fields: FieldList,
}

impl Detach {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = DETACH;

    /// Builds a `Detach` for `handle`, requesting that the link also close.
    pub fn new(handle: u32, closed: bool) -> Self {
        let mut fields = FieldList::new();
        fields.set(0, Value::UInt(handle));
        fields.set(1, Value::Bool(closed));
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

    /// `closed`.
    pub fn closed(&self) -> bool {
        value_to_bool(&self.fields.get(1), false)
    }
}
