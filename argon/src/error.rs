//! The four error kinds from §7, layered over the lower crates' errors.

/// Errors surfaced by the connection/session/link state machine and the
/// transport that drives it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A frame failed to decode: unknown format code, truncated length,
    /// inconsistent size/count, duplicate map key, bad UTF-8, or depth
    /// exceeded. Fatal: the caller must emit `on_stop` and drop the
    /// connection.
    #[error("malformed input: {0}")]
    MalformedInput(argon_types::Error),

    /// A performative arrived in a state that forbids it, carried an
    /// unrecognized descriptor, or an `Attach` named a link that already
    /// exists on its session. Fatal, like `MalformedInput`.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// The socket failed, the poll reported `POLLERR`/`POLLHUP`, or EOF
    /// arrived before a frame completed. Fatal.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The caller violated a local precondition — e.g. `send` before the
    /// link has received its peer `Attach`. Not fatal: surfaced
    /// synchronously to the caller, the endpoint keeps running.
    #[error("usage error: {0}")]
    Usage(String),
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Hand-written rather than `#[from]`: an unrecognized descriptor at frame
/// scope is a *ProtocolViolation* per §7, not *MalformedInput* — the frame
/// was perfectly well-formed, it just named a performative/section this
/// crate doesn't recognize. Every other `argon_types::Error` variant is a
/// genuine decode failure and stays `MalformedInput`.
impl From<argon_types::Error> for Error {
    fn from(err: argon_types::Error) -> Self {
        match err {
            argon_types::Error::UnrecognizedDescriptor(code) => Error::ProtocolViolation(format!(
                "unrecognized descriptor 0x{code:08x} at frame scope"
            )),
            other => Error::MalformedInput(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_descriptor_at_frame_scope_is_a_protocol_violation() {
        let err = Error::from(argon_types::Error::UnrecognizedDescriptor(0x99));
        assert!(matches!(err, Error::ProtocolViolation(_)));
    }

    #[test]
    fn other_codec_failures_stay_malformed_input() {
        let err = Error::from(argon_types::Error::InvalidDataOffset(1));
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
