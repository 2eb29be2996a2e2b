//! The nine AMQP 1.0 control performatives, dispatched by descriptor.

mod attach;
mod begin;
mod close;
mod detach;
mod disposition;
mod end;
mod flow;
mod open;
mod transfer;

pub use attach::Attach;
pub use begin::Begin;
pub use close::Close;
pub use detach::Detach;
pub use disposition::Disposition;
pub use end::End;
pub use flow::Flow;
pub use open::Open;
pub use transfer::Transfer;

use argon_codec::{Described, Value};

use crate::definitions;
use crate::error::{Error, Result};
use crate::field_list::FieldList;

/// One of the nine performatives a frame may carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Performative {
    /// `amqp:open:list`.
    Open(Open),
    /// `amqp:begin:list`.
    Begin(Begin),
    /// `amqp:attach:list`.
    Attach(Attach),
    /// `amqp:flow:list`.
    Flow(Flow),
    /// `amqp:transfer:list`.
    Transfer(Transfer),
    /// `amqp:disposition:list`.
    Disposition(Disposition),
    /// `amqp:detach:list`.
    Detach(Detach),
    /// `amqp:end:list`.
    End(End),
    /// `amqp:close:list`.
    Close(Close),
}

impl Performative {
    /// The descriptor code this performative carries on the wire.
    pub fn descriptor_code(&self) -> u64 {
        match self {
            Performative::Open(_) => Open::DESCRIPTOR,
            Performative::Begin(_) => Begin::DESCRIPTOR,
            Performative::Attach(_) => Attach::DESCRIPTOR,
            Performative::Flow(_) => Flow::DESCRIPTOR,
            Performative::Transfer(_) => Transfer::DESCRIPTOR,
            Performative::Disposition(_) => Disposition::DESCRIPTOR,
            Performative::Detach(_) => Detach::DESCRIPTOR,
            Performative::End(_) => End::DESCRIPTOR,
            Performative::Close(_) => Close::DESCRIPTOR,
        }
    }

    /// Encodes this performative as the described value the frame codec
    /// expects: descriptor = [`Self::descriptor_code`], body = the
    /// field list, trailing nulls trimmed.
    pub fn to_value(&self) -> Value {
        let fields = match self {
            Performative::Open(p) => p.clone().into_fields(),
            Performative::Begin(p) => p.clone().into_fields(),
            Performative::Attach(p) => p.clone().into_fields(),
            Performative::Flow(p) => p.clone().into_fields(),
            Performative::Transfer(p) => p.clone().into_fields(),
            Performative::Disposition(p) => p.clone().into_fields(),
            Performative::Detach(p) => p.clone().into_fields(),
            Performative::End(p) => p.clone().into_fields(),
            Performative::Close(p) => p.clone().into_fields(),
        };
        Value::Described(Described::new(self.descriptor_code(), Value::List(fields.trimmed())))
    }

    /// The inverse of [`Self::to_value`]: classifies a described value by
    /// its descriptor and builds the matching performative.
    pub fn from_value(value: Value) -> Result<Self> {
        let (code, body) = value
            .described_code()
            .ok_or(Error::NotDescribed("performative"))?;
        let body = body.clone();
        let items = body
            .as_list()
            .ok_or_else(|| Error::PerformativeBodyNotList(body.kind_name()))?
            .to_vec();
        let fields = FieldList::from_values(items);

        let performative = match code {
            definitions::OPEN => Performative::Open(Open::from_fields(fields)),
            definitions::BEGIN => Performative::Begin(Begin::from_fields(fields)),
            definitions::ATTACH => Performative::Attach(Attach::from_fields(fields)),
            definitions::FLOW => Performative::Flow(Flow::from_fields(fields)),
            definitions::TRANSFER => Performative::Transfer(Transfer::from_fields(fields)),
            definitions::DISPOSITION => Performative::Disposition(Disposition::from_fields(fields)),
            definitions::DETACH => Performative::Detach(Detach::from_fields(fields)),
            definitions::END => Performative::End(End::from_fields(fields)),
            definitions::CLOSE => Performative::Close(Close::from_fields(fields)),
            other => return Err(Error::UnrecognizedDescriptor(other)),
        };
        Ok(performative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trips_through_value() {
        let performative = Performative::Open(Open::new("container-a"));
        let value = performative.to_value();
        let parsed = Performative::from_value(value).unwrap();
        assert_eq!(parsed, performative);
    }

    #[test]
    fn unrecognized_descriptor_is_an_error() {
        let value = Value::Described(Described::new(0x99, Value::List(vec![])));
        let err = Performative::from_value(value).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedDescriptor(0x99)));
    }
}
