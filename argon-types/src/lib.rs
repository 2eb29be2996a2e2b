//! Frame, performative, and message types for the AMQP 1.0 wire protocol.
//!
//! This crate sits between [`argon_codec`], which only knows how to turn a
//! [`argon_codec::Value`] into bytes and back, and `argon`, which drives
//! the connection/session/link state machine over a socket. It supplies
//! the vocabulary in between: the descriptor table (§3), the nine control
//! performatives wrapped in an 8-byte frame (§4.3), the link termini
//! (`Source`/`Target`), and the seven-section message representation
//! (§4.4).

mod definitions;
mod error;
mod field_list;
mod frame;
pub mod messaging;
pub mod performatives;
mod value_conv;

pub use error::{Error, Result};
pub use frame::{emit_frame, parse_frame, Frame};
pub use performatives::Performative;
