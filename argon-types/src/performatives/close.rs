//! <type name="close" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:close:list" code="0x00000000:0x00000018"/>
//! </type>

use crate::definitions::CLOSE;
use crate::field_list::FieldList;

/// Close a connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Close {
    fields: FieldList,
}

impl Close {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = CLOSE;

    /// A `Close` carrying no error.
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

    /// `error`, present when the connection closed abnormally.
    pub fn has_error(&self) -> bool {
        !self.fields.get(0).kind_name().eq("null")
    }
}
