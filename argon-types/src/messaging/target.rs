//! <type name="target" class="composite" source="list" provides="target">
//!     <descriptor name="amqp:target:list" code="0x00000000:0x00000029"/>
//! </type>

use argon_codec::Value;

use crate::definitions::TARGET;
use crate::field_list::FieldList;
use crate::value_conv::{opt_string_to_value, value_to_opt_string};

/// The terminus of a link messages are delivered to — for this client's
/// one sending link, the address the broker routes `Transfer`s to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    fields: FieldList,
}

impl Target {
    /// The descriptor code for this terminus.
    pub const DESCRIPTOR: u64 = TARGET;

    /// Builds a `Target` addressing `address`.
    pub fn new(address: impl Into<String>) -> Self {
        let mut target = Self::default();
        target.set_address(Some(address.into()));
        target
    }

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

impl From<FieldList> for Target {
    fn from(fields: FieldList) -> Self {
        Self::from_fields(fields)
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        match value.as_list() {
            Some(items) => Self::from_fields(FieldList::from_values(items.to_vec())),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_address() {
        let target = Target::new("queue.a");
        assert_eq!(target.address(), Some("queue.a".to_string()));
    }
}
