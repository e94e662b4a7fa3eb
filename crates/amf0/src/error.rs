//! AMF0 error type.

use std::io;
use std::num::TryFromIntError;

use crate::Amf0Marker;

/// Result type.
pub type Result<T> = std::result::Result<T, Amf0Error>;

/// AMF0 error.
#[derive(thiserror::Error, Debug)]
pub enum Amf0Error {
    /// A length, count or fixed-size field needs more bytes than remain.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        /// The number of bytes the field requires.
        needed: usize,
        /// The number of bytes left in the input.
        remaining: usize,
    },
    /// Unknown marker.
    #[error("unknown marker: {0:#04x}")]
    UnknownMarker(u8),
    /// This marker is reserved and cannot be decoded.
    #[error("this marker cannot be decoded: {0:?}")]
    UnsupportedMarker(Amf0Marker),
    /// A property key overran the input or the body ended before the object end marker.
    #[error("malformed {0:?} body: missing or truncated property")]
    MalformedComposite(Amf0Marker),
    /// Composite values are nested deeper than the decoder allows.
    #[error("nesting depth exceeds the limit of {0}")]
    DepthExceeded(usize),
    /// An object end marker appeared where a value was expected.
    #[error("unexpected object end marker")]
    UnexpectedObjectEnd,
    /// Unexpected type.
    #[error("unexpected type: expected one of {expected:?}, got {got:?}")]
    UnexpectedType {
        /// The expected types.
        expected: &'static [Amf0Marker],
        /// The actual type.
        got: Amf0Marker,
    },
    /// Element (string or sequence) is too long for its length field.
    #[error("element is too long: {0}")]
    TooLong(#[from] TryFromIntError),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
