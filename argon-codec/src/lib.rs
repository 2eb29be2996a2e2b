//! A self-describing binary codec for the AMQP 1.0 type system.
//!
//! This crate has no notion of frames, performatives, or connections — it
//! only knows how to turn a [`Value`] into bytes and back. [`argon_types`]
//! builds the performative and message vocabulary on top of it; `argon`
//! builds the endpoint state machine and transport on top of that.

mod buffer;
mod descriptor;
mod de;
mod error;
mod format_code;
mod ser;
mod value;

pub use buffer::{Buffer, SizeSlot};
pub use de::parse_data;
pub use descriptor::{descriptor_to_value, value_to_descriptor, MAX_DEPTH};
pub use error::{Error, Result};
pub use format_code::EncodingCodes;
pub use ser::emit_data;
pub use value::{Decimal128, Decimal32, Decimal64, Described, Descriptor, Symbol, Timestamp, Uuid, Value};
