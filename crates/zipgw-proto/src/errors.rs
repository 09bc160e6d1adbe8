//! Error types for the Z/IP wire codec.
//!
//! All errors are structured and carry the byte-level context a caller needs
//! to log or assert on. Decoding an *unknown* command is not an error - that
//! path yields [`crate::command::RawCommand`] - only structurally malformed
//! input lands here.

use thiserror::Error;

/// Errors that can occur while decoding datagrams and command bodies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Datagram is shorter than the fixed Z/IP envelope prefix
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum size in bytes
        expected: usize,
        /// Actual size received
        actual: usize,
    },

    /// Datagram does not start with the Z/IP command class (0x23)
    #[error("not a Z/IP frame: leading command class {0:#04x}")]
    NotZipFrame(u8),

    /// Z/IP command byte is neither packet (0x02) nor keep-alive (0x03)
    #[error("unknown Z/IP command: {0:#04x}")]
    UnknownZipCommand(u8),

    /// Header-extension block length disagrees with the available bytes
    #[error("truncated header extensions: block claims {claimed} bytes, {available} available")]
    TruncatedExtensions {
        /// Length the block's first byte claims
        claimed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Command body ended before a required field
    #[error("body too short for {context}: expected at least {expected} bytes, got {actual}")]
    BodyTooShort {
        /// Decoder that was parsing
        context: &'static str,
        /// Expected minimum size in bytes
        expected: usize,
        /// Actual size available
        actual: usize,
    },

    /// A precision/scale/size field declared a size other than 1, 2 or 4
    #[error("invalid value size: {0} (must be 1, 2 or 4)")]
    InvalidValueSize(u8),

    /// A field carried a value outside its defined set
    #[error("invalid {context} value: {value:#04x}")]
    InvalidField {
        /// Field being decoded
        context: &'static str,
        /// The offending byte
        value: u8,
    },

    /// A DSK field carried a length other than 0 or 16
    #[error("invalid DSK length: {0} (must be 0 or 16 bytes)")]
    InvalidDskLength(usize),

    /// A textual DSK group was not a decimal number in 0..=65535
    #[error("invalid DSK group: {0:?}")]
    InvalidDskGroup(String),

    /// Node id outside the Z-Wave range 1..=232
    #[error("invalid node id: {0} (must be 1..=232)")]
    InvalidNodeId(u8),
}

/// Convenient Result type alias for codec operations
pub type Result<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    /// Shorthand used by body decoders when slicing fixed fields.
    pub(crate) fn short(context: &'static str, expected: usize, actual: usize) -> Self {
        DecodeError::BodyTooShort { context, expected, actual }
    }
}
