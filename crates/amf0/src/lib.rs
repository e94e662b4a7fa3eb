//! A pure-rust, order-preserving implementation of the AMF0 encoder and decoder.
//!
//! AMF0 is the tag-prefixed binary value format carried by RTMP command and
//! data messages. This crate turns a message body into the flat sequence of
//! values it contains and back.
//!
//! The decoder is built to survive hostile input: every length is checked
//! against the bytes that are actually left, nesting is bounded by
//! [`Amf0Decoder::with_max_depth`], and composite values are decoded with an
//! explicit stack instead of native recursion.
//!
//! # Limitations
//!
//! - References are surfaced as an opaque index and never resolved.
//! - Does not support the AVM+ Type Marker. (see AMF 0 spec, 3.1)
//!
//! # Examples
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn std::error::Error>> {
//! use rtmp_amf0::{Amf0Value, marshal, unmarshal};
//!
//! #[rustfmt::skip]
//! let bytes = [
//!     0x02, 0x00, 0x04, b'p', b'l', b'a', b'y',
//!     0x00, 0x40, 0x08, 0, 0, 0, 0, 0, 0,
//!     0x05,
//! ];
//!
//! let values = unmarshal(&bytes)?;
//! assert_eq!(values, vec![Amf0Value::from("play"), Amf0Value::Number(3.0), Amf0Value::Null]);
//!
//! assert_eq!(marshal(&values)?, bytes);
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod value;

pub use decoder::{Amf0Decoder, DEFAULT_MAX_DEPTH};
pub use encoder::Amf0Encoder;
pub use error::{Amf0Error, Result};
pub use value::{Amf0Object, Amf0String, Amf0Value};

/// AMF0 marker types.
///
/// Defined by:
/// - AMF 0 spec, 2.1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, num_derive::FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    /// number-marker
    Number = 0x00,
    /// boolean-marker
    Boolean = 0x01,
    /// string-marker
    String = 0x02,
    /// object-marker
    Object = 0x03,
    /// movieclip-marker
    ///
    /// reserved, not supported
    MovieClip = 0x04,
    /// null-marker
    Null = 0x05,
    /// undefined-marker
    Undefined = 0x06,
    /// reference-marker
    Reference = 0x07,
    /// ecma-array-marker
    EcmaArray = 0x08,
    /// object-end-marker
    ObjectEnd = 0x09,
    /// strict-array-marker
    StrictArray = 0x0a,
    /// date-marker
    Date = 0x0b,
    /// long-string-marker
    LongString = 0x0c,
    /// unsupported-marker
    Unsupported = 0x0d,
    /// recordset-marker
    ///
    /// reserved, not supported
    Recordset = 0x0e,
    /// xml-document-marker
    XmlDocument = 0x0f,
    /// typed-object-marker
    TypedObject = 0x10,
}

/// Decode every top-level value in `buf`.
///
/// The whole buffer must be consumed. Any error discards the values decoded so far.
pub fn unmarshal(buf: &[u8]) -> Result<Vec<Amf0Value>> {
    Amf0Decoder::new(buf).decode_all()
}

/// Encode `values` back to back into one buffer.
pub fn marshal(values: &[Amf0Value]) -> Result<Vec<u8>> {
    let mut encoder = Amf0Encoder::new(Vec::new());
    encoder.encode_all(values)?;
    Ok(encoder.into_inner())
}
