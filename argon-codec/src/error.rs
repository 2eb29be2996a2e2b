//! Errors produced while packing, unpacking, or tagging AMQP values.

/// Errors produced by the buffer and type codec layers.
///
/// Every variant here maps onto the *MalformedInput* error kind described at
/// the system level; higher layers (`argon-types`, `argon`) wrap this error
/// and add the *ProtocolViolation* / *TransportError* / *UsageError* kinds
/// that only make sense once a performative or socket is involved.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fewer bytes were available than the operation required.
    #[error("unexpected end of buffer: needed {needed} bytes, had {available}")]
    UnexpectedEnd {
        /// Bytes the operation needed.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// A byte did not match any entry in the format-code table.
    #[error("invalid format code: 0x{0:02x}")]
    InvalidFormatCode(u8),

    /// A format code was structurally valid but not legal for the value
    /// being decoded (e.g. a string code where a map was expected).
    #[error("unexpected format code 0x{code:02x} for {expected}")]
    UnexpectedFormatCode {
        /// The code that was found.
        code: u8,
        /// What the caller expected to decode.
        expected: &'static str,
    },

    /// A compound's declared `count` did not agree with the number of
    /// children actually present in its `size` bytes.
    #[error("compound count mismatch: header said {declared}, found {actual}")]
    CountMismatch {
        /// Count declared in the header.
        declared: usize,
        /// Count actually decoded.
        actual: usize,
    },

    /// A map encoding contained the same key twice.
    #[error("duplicate map key")]
    DuplicateMapKey,

    /// Bytes claimed to be UTF-8 (string) or US-ASCII (symbol) were not.
    #[error("invalid text encoding: {0}")]
    InvalidText(#[from] std::str::Utf8Error),

    /// Recursion (list/map/array nesting, or described-value nesting) went
    /// deeper than the configured limit.
    #[error("nesting depth exceeded limit of {limit}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A `char` value did not decode to a valid Unicode scalar value.
    #[error("invalid UTF-32 code point: 0x{0:08x}")]
    InvalidCodePoint(u32),

    /// Catch-all for a value that can't be represented on the wire, e.g. a
    /// `list`/`map` too long to fit a `u32` size or count field.
    #[error("{0}")]
    Message(String),
}

/// Result alias used throughout the codec crate.
pub type Result<T> = std::result::Result<T, Error>;
