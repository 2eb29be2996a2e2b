//! Message sections and link termini: the vocabulary §3/§4.4 builds on top
//! of the bare performatives in [`crate::performatives`].

mod header;
mod message;
mod properties;
mod source;
mod target;

pub use header::Header;
pub use message::Message;
pub use properties::Properties;
pub use source::Source;
pub use target::Target;
