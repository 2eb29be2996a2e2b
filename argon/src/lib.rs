//! The connection/session/link endpoint state machine and the TCP
//! transport that drives it over a socket, sitting on top of
//! [`argon_types`]'s frame and message codecs.
//!
//! The entity tree (§3) splits cleanly in two: [`Connection`], [`Session`],
//! and [`Link`] are a pure state machine over `Frame` values in and out —
//! no socket, deterministically testable — while [`Transport`] is the
//! single piece of I/O, a `libc::poll` loop that feeds frames to a
//! `Connection` and writes back whatever it queues.

mod connection;
mod error;
mod link;
mod sequence;
mod session;
mod state;
mod transport;

pub use connection::{Connection, Event};
pub use error::{Error, Result};
pub use link::Link;
pub use session::Session;
pub use state::EndpointState;
pub use transport::Transport;
