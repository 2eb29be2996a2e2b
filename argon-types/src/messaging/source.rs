//! <type name="source" class="composite" source="list" provides="source">
//!     <descriptor name="amqp:source:list" code="0x00000000:0x00000028"/>
//! </type>

use argon_codec::Value;

use crate::definitions::SOURCE;
use crate::field_list::FieldList;
use crate::value_conv::{opt_string_to_value, value_to_opt_string};

/// The terminus of a link a sender pulls messages from (unused by this
/// client, which only ever attaches a sending link, but present so a peer's
/// Attach performative — which may echo a source — decodes structurally).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Source {
    fields: FieldList,
}

impl Source {
    /// The descriptor code for this terminus.
    pub const DESCRIPTOR: u64 = SOURCE;

    /// Wraps an already-decoded field list.
    pub fn from_fields(fields: FieldList) -> Self {
        Self { fields }
    }

    /// The field list to encode (trailing nulls trimmed).
    pub fn into_fields(self) -> FieldList {
        self.fields
    }

    /// `address`.
    pub fn address(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(0))
    }

    /// Sets `address`.
    pub fn set_address(&mut self, value: Option<String>) {
        self.fields.set(0, opt_string_to_value(value));
    }
}

impl From<FieldList> for Source {
    fn from(fields: FieldList) -> Self {
        Self::from_fields(fields)
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        match value.as_list() {
            Some(items) => Self::from_fields(FieldList::from_values(items.to_vec())),
            None => Self::default(),
        }
    }
}
