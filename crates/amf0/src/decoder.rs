//! AMF0 decoder

use bytes::Buf;
use num_traits::FromPrimitive;

use crate::{Amf0Error, Amf0Marker, Amf0Object, Amf0String, Amf0Value};

/// Nesting limit used by [`Amf0Decoder::new`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// AMF0 decoder.
///
/// Decodes AMF0 values from any [`bytes::Buf`]. Decoding from [`Bytes`](bytes::Bytes)
/// is zero-copy: string payloads are slices of the input.
///
/// Every length and count read from the input is checked against the bytes that are
/// left before it is used, and composite values are decoded with an explicit stack that
/// is bounded by [`Amf0Decoder::max_depth`].
#[derive(Debug, Clone)]
pub struct Amf0Decoder<B> {
    buf: B,
    max_depth: usize,
}

/// A composite value whose body is still being read.
#[derive(Debug)]
enum Composite {
    /// Object, ECMA array or typed object, closed by the object end marker.
    Properties {
        header: PropertiesHeader,
        properties: Amf0Object,
        key: Option<Amf0String>,
    },
    /// Strict array, closed once `remaining` elements have been read.
    Elements { elements: Vec<Amf0Value>, remaining: u32 },
}

#[derive(Debug)]
enum PropertiesHeader {
    Object,
    EcmaArray,
    TypedObject { class_name: Amf0String },
}

impl PropertiesHeader {
    fn marker(&self) -> Amf0Marker {
        match self {
            Self::Object => Amf0Marker::Object,
            Self::EcmaArray => Amf0Marker::EcmaArray,
            Self::TypedObject { .. } => Amf0Marker::TypedObject,
        }
    }

    fn finish(self, properties: Amf0Object) -> Amf0Value {
        match self {
            Self::Object => Amf0Value::Object(properties),
            Self::EcmaArray => Amf0Value::EcmaArray(properties),
            Self::TypedObject { class_name } => Amf0Value::TypedObject { class_name, properties },
        }
    }
}

impl Composite {
    fn properties(header: PropertiesHeader) -> Self {
        Self::Properties {
            header,
            properties: Amf0Object::new(),
            key: None,
        }
    }

    fn push(&mut self, value: Amf0Value) {
        match self {
            Self::Properties { properties, key, .. } => {
                if let Some(key) = key.take() {
                    properties.push(key, value);
                }
            }
            Self::Elements { elements, remaining } => {
                elements.push(value);
                *remaining = remaining.saturating_sub(1);
            }
        }
    }
}

/// Result of reading one marker and its fixed payload.
enum Step {
    Value(Amf0Value),
    Open(Composite),
}

impl<B> Amf0Decoder<B>
where
    B: Buf,
{
    /// Create a new decoder from a buffer.
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set how many composite values may be nested inside each other.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Check if there are remaining bytes to read.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.buf.has_remaining()
    }

    /// Number of bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Consumes the decoder and returns the unread part of the buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Decode all values from the buffer until the end.
    ///
    /// Fails if any value fails; values decoded before the failure are discarded.
    pub fn decode_all(&mut self) -> Result<Vec<Amf0Value>, Amf0Error> {
        let start = self.buf.remaining();
        let mut values = Vec::new();

        while self.buf.has_remaining() {
            match self.decode_value() {
                Ok(value) => values.push(value),
                Err(err) => {
                    tracing::trace!(
                        offset = start - self.buf.remaining(),
                        decoded = values.len(),
                        error = %err,
                        "amf0 decode failed"
                    );
                    return Err(err);
                }
            }
        }

        tracing::trace!(count = values.len(), "decoded amf0 values");

        Ok(values)
    }

    /// Decode a single [`Amf0Value`] from the buffer.
    pub fn decode_value(&mut self) -> Result<Amf0Value, Amf0Error> {
        let mut stack: Vec<Composite> = Vec::new();

        loop {
            let value = match stack.pop() {
                // Awaiting a key or the object end marker.
                Some(Composite::Properties {
                    header,
                    properties,
                    key: None,
                }) => match self.decode_object_key(header.marker())? {
                    Some(key) => {
                        stack.push(Composite::Properties {
                            header,
                            properties,
                            key: Some(key),
                        });
                        continue;
                    }
                    None => header.finish(properties),
                },
                // All elements read.
                Some(Composite::Elements { elements, remaining: 0 }) => Amf0Value::StrictArray(elements),
                // Awaiting a value.
                top => {
                    stack.extend(top);

                    match self.decode_step()? {
                        Step::Value(value) => value,
                        Step::Open(composite) => {
                            if stack.len() >= self.max_depth {
                                return Err(Amf0Error::DepthExceeded(self.max_depth));
                            }

                            stack.push(composite);
                            continue;
                        }
                    }
                }
            };

            match stack.last_mut() {
                Some(parent) => parent.push(value),
                None => return Ok(value),
            }
        }
    }

    fn decode_step(&mut self) -> Result<Step, Amf0Error> {
        let marker = self.read_marker()?;

        let step = match marker {
            Amf0Marker::Number => Step::Value(Amf0Value::Number(self.read_f64()?)),
            Amf0Marker::Boolean => Step::Value(Amf0Value::Boolean(self.read_u8()? != 0)),
            Amf0Marker::String => Step::Value(Amf0Value::String(self.read_normal_string()?)),
            Amf0Marker::LongString => Step::Value(Amf0Value::LongString(self.read_long_string()?)),
            Amf0Marker::XmlDocument => Step::Value(Amf0Value::XmlDocument(self.read_long_string()?)),
            Amf0Marker::Null => Step::Value(Amf0Value::Null),
            Amf0Marker::Undefined => Step::Value(Amf0Value::Undefined),
            Amf0Marker::Unsupported => Step::Value(Amf0Value::Unsupported),
            Amf0Marker::Reference => Step::Value(Amf0Value::Reference(self.read_u16()?)),
            Amf0Marker::Date => {
                let timestamp = self.read_f64()?;
                let timezone = self.read_i16()?;
                Step::Value(Amf0Value::Date { timestamp, timezone })
            }
            Amf0Marker::Object => Step::Open(Composite::properties(PropertiesHeader::Object)),
            Amf0Marker::TypedObject => {
                let class_name = self.read_normal_string()?;
                Step::Open(Composite::properties(PropertiesHeader::TypedObject { class_name }))
            }
            Amf0Marker::EcmaArray => {
                // The count is ignored, the body is closed by the object end marker.
                let _size = self.read_u32()?;
                Step::Open(Composite::properties(PropertiesHeader::EcmaArray))
            }
            Amf0Marker::StrictArray => {
                let size = self.read_u32()?;

                // Every element takes at least 1 byte.
                self.ensure(size as usize)?;

                // Nested arrays check their count against the same bytes, so the
                // count never sizes an allocation. Elements grow as they are decoded.
                Step::Open(Composite::Elements {
                    elements: Vec::new(),
                    remaining: size,
                })
            }
            Amf0Marker::ObjectEnd => return Err(Amf0Error::UnexpectedObjectEnd),
            Amf0Marker::MovieClip | Amf0Marker::Recordset => return Err(Amf0Error::UnsupportedMarker(marker)),
        };

        Ok(step)
    }

    /// Reads a property key, returning `None` at the object end marker.
    fn decode_object_key(&mut self, container: Amf0Marker) -> Result<Option<Amf0String>, Amf0Error> {
        // Object keys are not preceeded with a marker and are always normal strings
        let key = self.read_normal_string().map_err(|err| match err {
            Amf0Error::TruncatedInput { .. } => Amf0Error::MalformedComposite(container),
            err => err,
        })?;

        // The object end marker is preceeded by an empty string
        if key.is_empty() {
            let next = self.buf.chunk().first().copied();

            match next {
                Some(byte) if byte == Amf0Marker::ObjectEnd as u8 => {
                    self.buf.advance(1);
                    return Ok(None);
                }
                None => return Err(Amf0Error::MalformedComposite(container)),
                Some(_) => {}
            }
        }

        Ok(Some(key))
    }

    // --- Typed readers ---

    /// Decode a number.
    pub fn decode_number(&mut self) -> Result<f64, Amf0Error> {
        match self.decode_value()? {
            Amf0Value::Number(value) => Ok(value),
            other => Err(unexpected(&[Amf0Marker::Number], &other)),
        }
    }

    /// Decode a boolean.
    pub fn decode_boolean(&mut self) -> Result<bool, Amf0Error> {
        match self.decode_value()? {
            Amf0Value::Boolean(value) => Ok(value),
            other => Err(unexpected(&[Amf0Marker::Boolean], &other)),
        }
    }

    /// Decode a string.
    ///
    /// This function can decode both normal strings and long strings.
    pub fn decode_string(&mut self) -> Result<Amf0String, Amf0Error> {
        match self.decode_value()? {
            Amf0Value::String(value) | Amf0Value::LongString(value) => Ok(value),
            other => Err(unexpected(&[Amf0Marker::String, Amf0Marker::LongString], &other)),
        }
    }

    /// Decode a null value.
    ///
    /// This function can also decode undefined values.
    pub fn decode_null(&mut self) -> Result<(), Amf0Error> {
        match self.decode_value()? {
            Amf0Value::Null | Amf0Value::Undefined => Ok(()),
            other => Err(unexpected(&[Amf0Marker::Null, Amf0Marker::Undefined], &other)),
        }
    }

    /// Decode the properties of an object.
    ///
    /// This function can decode normal objects, typed objects and ECMA arrays.
    pub fn decode_object(&mut self) -> Result<Amf0Object, Amf0Error> {
        match self.decode_value()? {
            Amf0Value::Object(properties) | Amf0Value::EcmaArray(properties) => Ok(properties),
            Amf0Value::TypedObject { properties, .. } => Ok(properties),
            other => Err(unexpected(
                &[Amf0Marker::Object, Amf0Marker::EcmaArray, Amf0Marker::TypedObject],
                &other,
            )),
        }
    }

    // --- Primitives ---

    fn ensure(&self, needed: usize) -> Result<(), Amf0Error> {
        let remaining = self.buf.remaining();

        if remaining < needed {
            Err(Amf0Error::TruncatedInput { needed, remaining })
        } else {
            Ok(())
        }
    }

    fn read_marker(&mut self) -> Result<Amf0Marker, Amf0Error> {
        let marker = self.read_u8()?;
        Amf0Marker::from_u8(marker).ok_or(Amf0Error::UnknownMarker(marker))
    }

    fn read_u8(&mut self) -> Result<u8, Amf0Error> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16, Amf0Error> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    fn read_i16(&mut self) -> Result<i16, Amf0Error> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    fn read_u32(&mut self) -> Result<u32, Amf0Error> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    fn read_f64(&mut self) -> Result<f64, Amf0Error> {
        self.ensure(8)?;
        Ok(self.buf.get_f64())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Amf0String, Amf0Error> {
        self.ensure(len)?;
        Ok(Amf0String::from(self.buf.copy_to_bytes(len)))
    }

    fn read_normal_string(&mut self) -> Result<Amf0String, Amf0Error> {
        let len = self.read_u16()? as usize;
        self.read_bytes(len)
    }

    fn read_long_string(&mut self) -> Result<Amf0String, Amf0Error> {
        let len = self.read_u32()? as usize;
        self.read_bytes(len)
    }
}

fn unexpected(expected: &'static [Amf0Marker], got: &Amf0Value) -> Amf0Error {
    Amf0Error::UnexpectedType {
        expected,
        got: got.marker(),
    }
}
