//! <type name="open" class="composite" source="list" provides="frame">
//!     <descriptor name="amqp:open:list" code="0x00000000:0x00000010"/>
//! </type>

use argon_codec::Value;

use crate::definitions::OPEN;
use crate::field_list::FieldList;
use crate::value_conv::{opt_string_to_value, opt_u16_to_value, opt_u32_to_value, value_to_opt_string, value_to_opt_u16, value_to_opt_u32};

/// Negotiate connection parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Open {
    fields: FieldList,
}

impl Open {
    /// The descriptor code for this performative.
    pub const DESCRIPTOR: u64 = OPEN;

    /// Builds an `Open` whose only mandatory field, `container_id`, is set.
    pub fn new(container_id: impl Into<String>) -> Self {
        let mut fields = FieldList::new();
        fields.set(0, Value::String(container_id.into()));
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

    /// `container-id`, mandatory.
    pub fn container_id(&self) -> String {
        value_to_opt_string(&self.fields.get(0)).unwrap_or_default()
    }

    /// Sets `container-id`.
    pub fn set_container_id(&mut self, value: impl Into<String>) {
        self.fields.set(0, Value::String(value.into()));
    }

    /// `hostname`.
    pub fn hostname(&self) -> Option<String> {
        value_to_opt_string(&self.fields.get(1))
    }

    /// Sets `hostname`.
    pub fn set_hostname(&mut self, value: Option<String>) {
        self.fields.set(1, opt_string_to_value(value));
    }

    /// `max-frame-size`, default `u32::MAX` if unset.
    pub fn max_frame_size(&self) -> u32 {
        value_to_opt_u32(&self.fields.get(2)).unwrap_or(u32::MAX)
    }

    /// Sets `max-frame-size`.
    pub fn set_max_frame_size(&mut self, value: u32) {
        self.fields.set(2, opt_u32_to_value(Some(value)));
    }

    /// `channel-max`, default `u16::MAX` if unset.
    pub fn channel_max(&self) -> u16 {
        value_to_opt_u16(&self.fields.get(3)).unwrap_or(u16::MAX)
    }

    /// Sets `channel-max`.
    pub fn set_channel_max(&mut self, value: u16) {
        self.fields.set(3, opt_u16_to_value(Some(value)));
    }

    /// `idle-time-out`, milliseconds.
    pub fn idle_time_out(&self) -> Option<u32> {
        value_to_opt_u32(&self.fields.get(4))
    }

    /// Sets `idle-time-out`.
    pub fn set_idle_time_out(&mut self, value: Option<u32>) {
        self.fields.set(4, opt_u32_to_value(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_wire_schema() {
        let open = Open::new("abc");
        assert_eq!(open.container_id(), "abc");
        assert_eq!(open.max_frame_size(), u32::MAX);
        assert_eq!(open.channel_max(), u16::MAX);
        assert_eq!(open.hostname(), None);
    }

    #[test]
    fn trims_trailing_unset_fields_on_encode() {
        let open = Open::new("abc");
        assert_eq!(open.into_fields().trimmed(), vec![Value::String("abc".to_string())]);
    }
}
