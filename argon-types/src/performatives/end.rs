//! <type name="end" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:end:list" code="0x00000000:0x00000017"/>
//! </type>

use crate::definitions::END;
use crate::field_list::FieldList;

/// End a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct End {
    fields: FieldList,
}

impl End {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = END;

    /// An `End` carrying no error.
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

    /// `error`, present when the session closed abnormally.
    pub fn has_error(&self) -> bool {
        !self.fields.get(0).kind_name().eq("null")
    }
}
