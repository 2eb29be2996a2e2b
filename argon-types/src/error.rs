//! Errors produced while interpreting frames, performatives, and messages.

/// Errors from the frame/performative/message layer.
///
/// Wraps [`argon_codec::Error`] for the type-codec failures that bubble up
/// through `parse_data`, and adds the frame/performative-scoped failures
/// that only make sense once a descriptor is involved.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A failure from the underlying value codec.
    #[error(transparent)]
    Codec(#[from] argon_codec::Error),

    /// A frame's `doff` was smaller than the minimum of 2.
    #[error("frame data offset {0} is smaller than the minimum of 2")]
    InvalidDataOffset(u8),

    /// A described value at frame scope carried a descriptor this crate
    /// does not recognize as a performative or message section.
    #[error("unrecognized descriptor 0x{0:08x} at frame scope")]
    UnrecognizedDescriptor(u64),

    /// The outermost value of a frame or message section was not a
    /// described value at all.
    #[error("expected a described value, found {0}")]
    NotDescribed(&'static str),

    /// A performative's body was not a list (every performative's body is
    /// a positional field list).
    #[error("performative body must be a list, found {0}")]
    PerformativeBodyNotList(&'static str),

    /// Message sections were not presented in the fixed order fixed by
    /// the wire format (Header, DeliveryAnnotations, MessageAnnotations,
    /// Properties, ApplicationProperties, body, Footer).
    #[error("message sections out of order: {0} appeared after {1}")]
    SectionOutOfOrder(&'static str, &'static str),
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
