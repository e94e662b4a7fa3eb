//! AMF0 value types.

use std::borrow::Cow;
use std::fmt;
use std::io;

use bytes::Bytes;

use crate::{Amf0Encoder, Amf0Error, Amf0Marker};

/// AMF0 text payload.
///
/// AMF0 does not require strings to be valid UTF-8, so the raw bytes are kept as they
/// appeared on the wire. Use [`Amf0String::as_str`] or [`Amf0String::to_str_lossy`] to
/// get at the text.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amf0String(Bytes);

impl Amf0String {
    /// Creates an empty string.
    pub const fn new() -> Self {
        Self(Bytes::new())
    }

    /// Creates a string from a static slice without copying.
    pub const fn from_static(value: &'static str) -> Self {
        Self(Bytes::from_static(value.as_bytes()))
    }

    /// Returns the text if the payload is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Returns the text, replacing invalid UTF-8 sequences.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Returns the raw payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the string and returns the raw payload.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Length of the payload in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Amf0String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => fmt::Debug::fmt(s, f),
            None => fmt::Debug::fmt(&self.0, f),
        }
    }
}

impl From<Bytes> for Amf0String {
    fn from(value: Bytes) -> Self {
        Self(value)
    }
}

impl From<Vec<u8>> for Amf0String {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<String> for Amf0String {
    fn from(value: String) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<&str> for Amf0String {
    fn from(value: &str) -> Self {
        Self(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl PartialEq<str> for Amf0String {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Amf0String {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Ordered properties of an AMF0 object, ECMA array or typed object.
///
/// Properties keep their wire order and duplicate keys are retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amf0Object(Vec<(Amf0String, Amf0Value)>);

impl Amf0Object {
    /// Creates an empty object.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates an empty object with room for `capacity` properties.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a property. An existing property with the same key is kept.
    pub fn push(&mut self, key: impl Into<Amf0String>, value: impl Into<Amf0Value>) {
        self.0.push((key.into(), value.into()));
    }

    /// Returns the value of the first property named `key`.
    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the values of every property named `key`, in wire order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Amf0Value> + 'a {
        self.0.iter().filter(move |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates over the keys in wire order.
    pub fn keys(&self) -> impl Iterator<Item = &Amf0String> {
        self.0.iter().map(|(k, _)| k)
    }

    /// Iterates over the properties in wire order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Amf0String, Amf0Value)> {
        self.0.iter()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the object and returns its properties.
    pub fn into_vec(self) -> Vec<(Amf0String, Amf0Value)> {
        self.0
    }
}

impl From<Vec<(Amf0String, Amf0Value)>> for Amf0Object {
    fn from(value: Vec<(Amf0String, Amf0Value)>) -> Self {
        Self(value)
    }
}

impl<K, V> FromIterator<(K, V)> for Amf0Object
where
    K: Into<Amf0String>,
    V: Into<Amf0Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Amf0Object {
    type IntoIter = std::vec::IntoIter<(Amf0String, Amf0Value)>;
    type Item = (Amf0String, Amf0Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Amf0Object {
    type IntoIter = std::slice::Iter<'a, (Amf0String, Amf0Value)>;
    type Item = &'a (Amf0String, Amf0Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Represents any AMF0 value.
#[derive(Debug, PartialEq, Clone)]
pub enum Amf0Value {
    /// AMF0 Number.
    Number(f64),
    /// AMF0 Boolean.
    Boolean(bool),
    /// AMF0 String, at most 65535 bytes.
    String(Amf0String),
    /// AMF0 Object.
    Object(Amf0Object),
    /// AMF0 Null.
    Null,
    /// AMF0 Undefined.
    Undefined,
    /// AMF0 Reference, an index into previously sent complex values.
    ///
    /// The index is not resolved.
    Reference(u16),
    /// AMF0 ECMA array.
    EcmaArray(Amf0Object),
    /// AMF0 Strict array.
    StrictArray(Vec<Amf0Value>),
    /// AMF0 Date.
    Date {
        /// Milliseconds since the unix epoch.
        timestamp: f64,
        /// Timezone offset, carried verbatim.
        timezone: i16,
    },
    /// AMF0 Long string.
    LongString(Amf0String),
    /// AMF0 Unsupported.
    Unsupported,
    /// AMF0 XML document.
    XmlDocument(Amf0String),
    /// AMF0 Typed object.
    TypedObject {
        /// The registered class name.
        class_name: Amf0String,
        /// The object's properties.
        properties: Amf0Object,
    },
}

impl Amf0Value {
    /// The marker this value is encoded with.
    pub fn marker(&self) -> Amf0Marker {
        match self {
            Amf0Value::Number(_) => Amf0Marker::Number,
            Amf0Value::Boolean(_) => Amf0Marker::Boolean,
            Amf0Value::String(_) => Amf0Marker::String,
            Amf0Value::Object(_) => Amf0Marker::Object,
            Amf0Value::Null => Amf0Marker::Null,
            Amf0Value::Undefined => Amf0Marker::Undefined,
            Amf0Value::Reference(_) => Amf0Marker::Reference,
            Amf0Value::EcmaArray(_) => Amf0Marker::EcmaArray,
            Amf0Value::StrictArray(_) => Amf0Marker::StrictArray,
            Amf0Value::Date { .. } => Amf0Marker::Date,
            Amf0Value::LongString(_) => Amf0Marker::LongString,
            Amf0Value::Unsupported => Amf0Marker::Unsupported,
            Amf0Value::XmlDocument(_) => Amf0Marker::XmlDocument,
            Amf0Value::TypedObject { .. } => Amf0Marker::TypedObject,
        }
    }

    /// Returns the number, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Amf0Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Amf0Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string, if this is a string or a long string.
    pub fn as_string(&self) -> Option<&Amf0String> {
        match self {
            Amf0Value::String(s) | Amf0Value::LongString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the properties of an object, ECMA array or typed object.
    pub fn as_object(&self) -> Option<&Amf0Object> {
        match self {
            Amf0Value::Object(o) | Amf0Value::EcmaArray(o) => Some(o),
            Amf0Value::TypedObject { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Returns the elements, if this is a strict array.
    pub fn as_array(&self) -> Option<&[Amf0Value]> {
        match self {
            Amf0Value::StrictArray(a) => Some(a),
            _ => None,
        }
    }

    /// Returns `true` for null and undefined.
    pub fn is_null(&self) -> bool {
        matches!(self, Amf0Value::Null | Amf0Value::Undefined)
    }

    /// Encode this value with the given [`Amf0Encoder`].
    pub fn encode<W: io::Write>(&self, encoder: &mut Amf0Encoder<W>) -> Result<(), Amf0Error> {
        encoder.encode_value(self)
    }
}

impl From<f64> for Amf0Value {
    fn from(value: f64) -> Self {
        Amf0Value::Number(value)
    }
}

impl From<bool> for Amf0Value {
    fn from(value: bool) -> Self {
        Amf0Value::Boolean(value)
    }
}

impl From<Amf0String> for Amf0Value {
    fn from(value: Amf0String) -> Self {
        if value.len() <= u16::MAX as usize {
            Amf0Value::String(value)
        } else {
            Amf0Value::LongString(value)
        }
    }
}

impl From<String> for Amf0Value {
    fn from(value: String) -> Self {
        Amf0String::from(value).into()
    }
}

impl From<&str> for Amf0Value {
    fn from(value: &str) -> Self {
        Amf0String::from(value).into()
    }
}

impl From<Amf0Object> for Amf0Value {
    fn from(value: Amf0Object) -> Self {
        Amf0Value::Object(value)
    }
}

impl From<Vec<Amf0Value>> for Amf0Value {
    fn from(value: Vec<Amf0Value>) -> Self {
        Amf0Value::StrictArray(value)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_impl {
    use serde::ser::{Serialize, SerializeMap, SerializeSeq};

    use super::{Amf0Object, Amf0String, Amf0Value};

    impl Serialize for Amf0String {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(&self.to_str_lossy())
        }
    }

    impl Serialize for Amf0Object {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            let mut map = serializer.serialize_map(Some(self.len()))?;

            for (key, value) in self {
                map.serialize_entry(key, value)?;
            }

            map.end()
        }
    }

    impl Serialize for Amf0Value {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            match self {
                Amf0Value::Number(v) => serializer.serialize_f64(*v),
                Amf0Value::Boolean(v) => serializer.serialize_bool(*v),
                Amf0Value::String(v) | Amf0Value::LongString(v) | Amf0Value::XmlDocument(v) => v.serialize(serializer),
                Amf0Value::Object(v) | Amf0Value::EcmaArray(v) => v.serialize(serializer),
                Amf0Value::TypedObject { properties, .. } => properties.serialize(serializer),
                Amf0Value::Null | Amf0Value::Undefined | Amf0Value::Unsupported => serializer.serialize_unit(),
                Amf0Value::Reference(v) => serializer.serialize_u16(*v),
                Amf0Value::Date { timestamp, .. } => serializer.serialize_f64(*timestamp),
                Amf0Value::StrictArray(v) => {
                    let mut seq = serializer.serialize_seq(Some(v.len()))?;

                    for value in v {
                        seq.serialize_element(value)?;
                    }

                    seq.end()
                }
            }
        }
    }
}
