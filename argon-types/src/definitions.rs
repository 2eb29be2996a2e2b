//! The descriptor code table from §3: every performative, terminus, and
//! message section this crate knows how to read and write, keyed by the
//! low 32 bits of its `ulong` descriptor.

/// `amqp:open:list`.
pub const OPEN: u64 = 0x10;
/// `amqp:begin:list`.
pub const BEGIN: u64 = 0x11;
/// `amqp:attach:list`.
pub const ATTACH: u64 = 0x12;
/// `amqp:flow:list`.
pub const FLOW: u64 = 0x13;
/// `amqp:transfer:list`.
pub const TRANSFER: u64 = 0x14;
/// `amqp:disposition:list`.
pub const DISPOSITION: u64 = 0x15;
/// `amqp:detach:list`.
pub const DETACH: u64 = 0x16;
/// `amqp:end:list`.
pub const END: u64 = 0x17;
/// `amqp:close:list`.
pub const CLOSE: u64 = 0x18;

/// `amqp:source:list`.
pub const SOURCE: u64 = 0x28;
/// `amqp:target:list`.
pub const TARGET: u64 = 0x29;

/// `amqp:header:list`.
pub const HEADER: u64 = 0x70;
/// `amqp:delivery-annotations:map`.
pub const DELIVERY_ANNOTATIONS: u64 = 0x71;
/// `amqp:message-annotations:map`.
pub const MESSAGE_ANNOTATIONS: u64 = 0x72;
/// `amqp:properties:list`.
pub const PROPERTIES: u64 = 0x73;
/// `amqp:application-properties:map`.
pub const APPLICATION_PROPERTIES: u64 = 0x74;
/// `amqp:amqp-value:*` — the body section.
pub const AMQP_VALUE: u64 = 0x77;
/// `amqp:footer:map`.
pub const FOOTER: u64 = 0x78;
