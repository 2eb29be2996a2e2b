//! <type name="disposition" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:disposition:list" code="0x00000000:0x00000015"/>
//! </type>

use crate::definitions::DISPOSITION;
use crate::field_list::FieldList;
use crate::value_conv::{value_to_bool, value_to_opt_u32};

/// Convey the sender's or receiver's settlement state for a delivery range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Disposition {
    fields: FieldList,
}

impl Disposition {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = DISPOSITION;

    /// Wraps an already-decoded field list.
    pub fn from_fields(fields: FieldList) -> Self {
        Self { fields }
    }

    /// The field list to encode (trailing nulls trimmed).
    pub fn into_fields(self) -> FieldList {
        self.fields
    }

    /// `role`: `false` = sender, `true` = receiver.
    pub fn role(&self) -> bool {
        value_to_bool(&self.fields.get(0), false)
    }

    /// `first`, the low end of the affected delivery-id range.
    pub fn first(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(1))
    }

    /// `last`, the high end (inclusive); absent means a single delivery.
    pub fn last(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(2))
    }

    /// `settled`.
    pub fn settled(&self) -> bool {
        value_to_bool(&self.fields.get(3), false)
    }
}
