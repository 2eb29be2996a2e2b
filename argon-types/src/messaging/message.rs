//! The seven standardized, independently-encoded sections of an AMQP
//! message (§3/§4.4), assembled and disassembled in their fixed order:
//! Header, DeliveryAnnotations, MessageAnnotations, Properties,
//! ApplicationProperties, a body section, Footer.

use argon_codec::{Buffer, Described, Value};

use crate::definitions::{
    AMQP_VALUE, APPLICATION_PROPERTIES, DELIVERY_ANNOTATIONS, FOOTER, MESSAGE_ANNOTATIONS,
};
use crate::error::{Error, Result};
use crate::field_list::FieldList;
use crate::messaging::{Header, Properties};

/// An AMQP message: the lazily-allocated sections described in §4.4, plus
/// the convenience accessors over the Header/Properties slots that the
/// system this crate was distilled from exposes directly on `Message`
/// rather than requiring a caller to reach into a section first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    header: Option<Header>,
    delivery_annotations: Option<Vec<(Value, Value)>>,
    message_annotations: Option<Vec<(Value, Value)>>,
    properties: Option<Properties>,
    application_properties: Option<Vec<(Value, Value)>>,
    body: Option<Value>,
    footer: Option<Vec<(Value, Value)>>,
}

impl Message {
    /// An empty message: no sections allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a message whose body is `value`, wrapped under the
    /// `AmqpValue` descriptor on encode.
    pub fn with_body(value: Value) -> Self {
        let mut message = Self::new();
        message.set_body(value);
        message
    }

    /// The body value, if a body section has been set.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Sets the body to `value`.
    pub fn set_body(&mut self, value: Value) {
        self.body = Some(value);
    }

    /// The `Header` section, allocating a default one on first access if
    /// a caller asks to mutate it.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// A mutable `Header`, lazily allocated.
    pub fn header_mut(&mut self) -> &mut Header {
        self.header.get_or_insert_with(Header::new)
    }

    /// The `Properties` section.
    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    /// A mutable `Properties`, lazily allocated.
    pub fn properties_mut(&mut self) -> &mut Properties {
        self.properties.get_or_insert_with(Properties::new)
    }

    /// `delivery-annotations`, a map, empty until first written.
    pub fn delivery_annotations(&self) -> &[(Value, Value)] {
        self.delivery_annotations.as_deref().unwrap_or(&[])
    }

    /// Sets `delivery-annotations`.
    pub fn set_delivery_annotations(&mut self, entries: Vec<(Value, Value)>) {
        self.delivery_annotations = Some(entries);
    }

    /// `message-annotations`, a map, empty until first written.
    pub fn message_annotations(&self) -> &[(Value, Value)] {
        self.message_annotations.as_deref().unwrap_or(&[])
    }

    /// Sets `message-annotations`.
    pub fn set_message_annotations(&mut self, entries: Vec<(Value, Value)>) {
        self.message_annotations = Some(entries);
    }

    /// `application-properties`, a map, empty until first written.
    pub fn application_properties(&self) -> &[(Value, Value)] {
        self.application_properties.as_deref().unwrap_or(&[])
    }

    /// Sets `application-properties`.
    pub fn set_application_properties(&mut self, entries: Vec<(Value, Value)>) {
        self.application_properties = Some(entries);
    }

    /// `footer`, a map, empty until first written.
    pub fn footer(&self) -> &[(Value, Value)] {
        self.footer.as_deref().unwrap_or(&[])
    }

    /// Sets `footer`.
    pub fn set_footer(&mut self, entries: Vec<(Value, Value)>) {
        self.footer = Some(entries);
    }

    /// `id` (`Properties.message-id`), lazily allocating `Properties`.
    pub fn id(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::message_id)
    }

    /// Sets `id`.
    pub fn set_id(&mut self, value: impl Into<String>) {
        self.properties_mut().set_message_id(Some(value.into()));
    }

    /// `user_id` (`Properties.user-id`).
    pub fn user_id(&self) -> Option<Vec<u8>> {
        self.properties.as_ref().and_then(Properties::user_id)
    }

    /// Sets `user_id`.
    pub fn set_user_id(&mut self, value: Vec<u8>) {
        self.properties_mut().set_user_id(Some(value));
    }

    /// `to` (`Properties.to`).
    pub fn to(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::to)
    }

    /// Sets `to`.
    pub fn set_to(&mut self, value: impl Into<String>) {
        self.properties_mut().set_to(Some(value.into()));
    }

    /// `subject` (`Properties.subject`).
    pub fn subject(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::subject)
    }

    /// Sets `subject`.
    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.properties_mut().set_subject(Some(value.into()));
    }

    /// `reply_to` (`Properties.reply-to`).
    pub fn reply_to(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::reply_to)
    }

    /// Sets `reply_to`.
    pub fn set_reply_to(&mut self, value: impl Into<String>) {
        self.properties_mut().set_reply_to(Some(value.into()));
    }

    /// `correlation_id` (`Properties.correlation-id`).
    pub fn correlation_id(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::correlation_id)
    }

    /// Sets `correlation_id`.
    pub fn set_correlation_id(&mut self, value: impl Into<String>) {
        self.properties_mut().set_correlation_id(Some(value.into()));
    }

    /// `content_type` (`Properties.content-type`).
    pub fn content_type(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::content_type)
    }

    /// Sets `content_type`.
    pub fn set_content_type(&mut self, value: impl Into<String>) {
        self.properties_mut().set_content_type(Some(value.into()));
    }

    /// `content_encoding` (`Properties.content-encoding`).
    pub fn content_encoding(&self) -> Option<String> {
        self.properties.as_ref().and_then(Properties::content_encoding)
    }

    /// Sets `content_encoding`.
    pub fn set_content_encoding(&mut self, value: impl Into<String>) {
        self.properties_mut().set_content_encoding(Some(value.into()));
    }

    /// `durable` (`Header.durable`).
    pub fn durable(&self) -> bool {
        self.header.as_ref().map(Header::durable).unwrap_or(false)
    }

    /// Sets `durable`.
    pub fn set_durable(&mut self, value: bool) {
        self.header_mut().set_durable(value);
    }

    /// `priority` (`Header.priority`).
    pub fn priority(&self) -> u8 {
        self.header.as_ref().map(Header::priority).unwrap_or(4)
    }

    /// Sets `priority`.
    pub fn set_priority(&mut self, value: u8) {
        self.header_mut().set_priority(value);
    }

    /// `ttl` (`Header.ttl`).
    pub fn ttl(&self) -> Option<u32> {
        self.header.as_ref().and_then(Header::ttl)
    }

    /// Sets `ttl`.
    pub fn set_ttl(&mut self, value: u32) {
        self.header_mut().set_ttl(Some(value));
    }

    /// `first_acquirer` (`Header.first-acquirer`).
    pub fn first_acquirer(&self) -> bool {
        self.header.as_ref().map(Header::first_acquirer).unwrap_or(false)
    }

    /// `delivery_count` (`Header.delivery-count`).
    pub fn delivery_count(&self) -> u32 {
        self.header.as_ref().map(Header::delivery_count).unwrap_or(0)
    }

    /// Encodes this message's present sections, in §4.4's fixed order, as
    /// a flat sequence of described values.
    pub fn to_values(&self) -> Vec<Value> {
        let mut values = Vec::new();

        if let Some(header) = &self.header {
            values.push(Value::Described(Described::new(
                Header::DESCRIPTOR,
                Value::List(header.clone().into_fields().trimmed()),
            )));
        }
        if let Some(entries) = &self.delivery_annotations {
            values.push(Value::Described(Described::new(
                DELIVERY_ANNOTATIONS,
                Value::Map(entries.clone()),
            )));
        }
        if let Some(entries) = &self.message_annotations {
            values.push(Value::Described(Described::new(
                MESSAGE_ANNOTATIONS,
                Value::Map(entries.clone()),
            )));
        }
        if let Some(properties) = &self.properties {
            values.push(Value::Described(Described::new(
                Properties::DESCRIPTOR,
                Value::List(properties.clone().into_fields().trimmed()),
            )));
        }
        if let Some(entries) = &self.application_properties {
            values.push(Value::Described(Described::new(
                APPLICATION_PROPERTIES,
                Value::Map(entries.clone()),
            )));
        }
        if let Some(body) = &self.body {
            values.push(Value::Described(Described::new(AMQP_VALUE, body.clone())));
        }
        if let Some(entries) = &self.footer {
            values.push(Value::Described(Described::new(FOOTER, Value::Map(entries.clone()))));
        }

        values
    }

    /// Encodes this message's present sections as the flat byte run a
    /// `Transfer`'s payload carries: each value from [`Self::to_values`],
    /// emitted back-to-back with no outer framing.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Buffer::new();
        let mut offset = 0;
        for value in self.to_values() {
            offset = argon_codec::emit_data(&mut buf, offset, &value)?;
        }
        Ok(buf.as_slice()[..offset].to_vec())
    }

    /// The inverse of [`Self::encode`]: parses a flat run of described
    /// section values out of a `Transfer` payload and assembles a
    /// `Message` from them.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let buf = Buffer::from_bytes(bytes);
        let mut offset = 0;
        let mut values = Vec::new();
        while offset < buf.len() {
            let (next, value) = argon_codec::parse_data(&buf, offset)?;
            offset = next;
            values.push(value);
        }
        Self::from_values(values)
    }

    /// Rebuilds a `Message` from a sequence of described section values,
    /// requiring §3's fixed ordering and rejecting any descriptor this
    /// crate does not recognize as a message section.
    pub fn from_values(values: Vec<Value>) -> Result<Self> {
        let mut message = Self::new();
        let mut last_seen: Option<&'static str> = None;

        for value in values {
            let (code, body) = value
                .described_code()
                .ok_or(Error::NotDescribed("message section"))?;
            let body = body.clone();

            let name = match code {
                Header::DESCRIPTOR => "header",
                DELIVERY_ANNOTATIONS => "delivery-annotations",
                MESSAGE_ANNOTATIONS => "message-annotations",
                Properties::DESCRIPTOR => "properties",
                APPLICATION_PROPERTIES => "application-properties",
                AMQP_VALUE => "body",
                FOOTER => "footer",
                other => return Err(Error::UnrecognizedDescriptor(other)),
            };

            if let Some(previous) = last_seen {
                if section_rank(name) <= section_rank(previous) {
                    return Err(Error::SectionOutOfOrder(name, previous));
                }
            }
            last_seen = Some(name);

            match name {
                "header" => {
                    let items = body.as_list().unwrap_or(&[]).to_vec();
                    message.header = Some(Header::from_fields(FieldList::from_values(items)));
                }
                "delivery-annotations" => {
                    message.delivery_annotations = Some(body.as_map().unwrap_or(&[]).to_vec());
                }
                "message-annotations" => {
                    message.message_annotations = Some(body.as_map().unwrap_or(&[]).to_vec());
                }
                "properties" => {
                    let items = body.as_list().unwrap_or(&[]).to_vec();
                    message.properties = Some(Properties::from_fields(FieldList::from_values(items)));
                }
                "application-properties" => {
                    message.application_properties = Some(body.as_map().unwrap_or(&[]).to_vec());
                }
                "body" => {
                    message.body = Some(body);
                }
                "footer" => {
                    message.footer = Some(body.as_map().unwrap_or(&[]).to_vec());
                }
                _ => unreachable!(),
            }
        }

        Ok(message)
    }
}

fn section_rank(name: &str) -> u8 {
    match name {
        "header" => 0,
        "delivery-annotations" => 1,
        "message-annotations" => 2,
        "properties" => 3,
        "application-properties" => 4,
        "body" => 5,
        "footer" => 6,
        _ => u8::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_only_message_round_trips() {
        let message = Message::with_body(Value::String("hello".to_string()));
        let values = message.to_values();
        let parsed = Message::from_values(values).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn convenience_accessors_lazily_allocate_sections() {
        let mut message = Message::new();
        assert!(message.header().is_none());
        message.set_durable(true);
        assert!(message.header().is_some());
        assert!(message.durable());
    }

    #[test]
    fn full_message_round_trips_every_section() {
        let mut message = Message::new();
        message.set_durable(true);
        message.set_delivery_annotations(vec![(Value::Symbol("x".into()), Value::UInt(1))]);
        message.set_message_annotations(vec![(Value::Symbol("y".into()), Value::UInt(2))]);
        message.set_to("queue.a");
        message.set_application_properties(vec![(Value::String("k".into()), Value::Bool(true))]);
        message.set_body(Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)]));
        message.set_footer(vec![(Value::Symbol("z".into()), Value::UInt(3))]);

        let values = message.to_values();
        assert_eq!(values.len(), 7);
        let parsed = Message::from_values(values).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn out_of_order_sections_are_rejected() {
        let body = Value::Described(Described::new(AMQP_VALUE, Value::Null));
        let header = Value::Described(Described::new(Header::DESCRIPTOR, Value::List(vec![])));
        let err = Message::from_values(vec![body, header]).unwrap_err();
        assert!(matches!(err, Error::SectionOutOfOrder(_, _)));
    }

    #[test]
    fn unrecognized_descriptor_at_message_scope_is_surfaced() {
        let value = Value::Described(Described::new(0x99, Value::Null));
        let err = Message::from_values(vec![value]).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedDescriptor(0x99)));
    }
}
