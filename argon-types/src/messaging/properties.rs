//! <type name="properties" class="composite" source="list" provides="section">
//!     <descriptor name="amqp:properties:list" code="0x00000000:0x00000073"/>
//! </type>

use argon_codec::Value;

use crate::definitions::PROPERTIES;
use crate::field_list::FieldList;
use crate::value_conv::{
    opt_binary_to_value, opt_string_to_value, opt_symbol_to_value, value_to_opt_binary, value_to_opt_string,
};

/// Immutable properties of a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    fields: FieldList,
}

impl Properties {
    /// The descriptor code for this section.
    pub const DESCRIPTOR: u64 = PROPERTIES;

    /// An empty `Properties`.
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

    /// `message-id`.
    pub fn message_id(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(0))
    }

    /// Sets `message-id`.
    pub fn set_message_id(&mut self, value: Option<String>) {
        self.fields.set(0, opt_string_to_value(value));
    }

    /// `user-id`.
    pub fn user_id(&self) -> Option<Vec<u8>> {
        value_to_opt_binary(&self.fields.get(1))
    }

    /// Sets `user-id`.
    pub fn set_user_id(&mut self, value: Option<Vec<u8>>) {
        self.fields.set(1, opt_binary_to_value(value));
    }

    /// `to`, the destination address.
    pub fn to(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(2))
    }

    /// Sets `to`.
    pub fn set_to(&mut self, value: Option<String>) {
        self.fields.set(2, opt_string_to_value(value));
    }

    /// `subject`.
    pub fn subject(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(3))
    }

    /// Sets `subject`.
    pub fn set_subject(&mut self, value: Option<String>) {
        self.fields.set(3, opt_string_to_value(value));
    }

    /// `reply-to`.
    pub fn reply_to(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(4))
    }

    /// Sets `reply-to`.
    pub fn set_reply_to(&mut self, value: Option<String>) {
        self.fields.set(4, opt_string_to_value(value));
    }

    /// `correlation-id`.
    pub fn correlation_id(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(5))
    }

    /// Sets `correlation-id`.
    pub fn set_correlation_id(&mut self, value: Option<String>) {
        self.fields.set(5, opt_string_to_value(value));
    }

    /// `content-type`.
    pub fn content_type(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(6))
    }

    /// Sets `content-type`.
    pub fn set_content_type(&mut self, value: Option<String>) {
        self.fields.set(6, opt_symbol_to_value(value));
    }

    /// `content-encoding`.
    pub fn content_encoding(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(7))
    }

    /// Sets `content-encoding`.
    pub fn set_content_encoding(&mut self, value: Option<String>) {
        self.fields.set(7, opt_symbol_to_value(value));
    }
}

impl From<&Value> for Properties {
    fn from(value: &Value) -> Self {
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
    fn set_then_get_round_trips_strings() {
        let mut properties = Properties::new();
        properties.set_to(Some("queue.a".to_string()));
        properties.set_subject(Some("greeting".to_string()));
        assert_eq!(properties.to(), Some("queue.a".to_string()));
        assert_eq!(properties.subject(), Some("greeting".to_string()));
    }

    #[test]
    fn content_type_is_encoded_as_symbol() {
        let mut properties = Properties::new();
        properties.set_content_type(Some("text/plain".to_string()));
        assert_eq!(
            properties.into_fields().get(6),
            Value::Symbol(argon_codec::Symbol("text/plain".to_string()))
        );
    }
}
