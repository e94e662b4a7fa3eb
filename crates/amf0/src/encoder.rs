//! AMF0 encoder

use std::io;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{Amf0Error, Amf0Marker, Amf0Object, Amf0Value};

/// AMF0 encoder.
///
/// Provides various functions to encode different types of AMF0 values into a writer.
#[derive(Debug)]
pub struct Amf0Encoder<W> {
    writer: W,
}

impl<W> Amf0Encoder<W> {
    /// Create a new encoder from a writer.
    pub fn new(writer: W) -> Self {
        Amf0Encoder { writer }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the encoder and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Amf0Encoder<W>
where
    W: io::Write,
{
    /// Encode every value in `values`, in order.
    pub fn encode_all(&mut self, values: &[Amf0Value]) -> Result<(), Amf0Error> {
        for value in values {
            self.encode_value(value)?;
        }

        Ok(())
    }

    /// Encode an [`Amf0Value`] with the marker of its variant.
    pub fn encode_value(&mut self, value: &Amf0Value) -> Result<(), Amf0Error> {
        match value {
            Amf0Value::Number(v) => self.encode_number(*v),
            Amf0Value::Boolean(v) => self.encode_boolean(*v),
            Amf0Value::String(v) => self.encode_short_string(v.as_bytes()),
            Amf0Value::LongString(v) => self.encode_long_string(v.as_bytes()),
            Amf0Value::XmlDocument(v) => self.encode_xml_document(v.as_bytes()),
            Amf0Value::Null => self.encode_null(),
            Amf0Value::Undefined => self.encode_undefined(),
            Amf0Value::Unsupported => self.encode_unsupported(),
            Amf0Value::Reference(v) => self.encode_reference(*v),
            Amf0Value::Date { timestamp, timezone } => self.encode_date(*timestamp, *timezone),
            Amf0Value::Object(v) => self.encode_object(v),
            Amf0Value::EcmaArray(v) => self.encode_ecma_array(v),
            Amf0Value::TypedObject { class_name, properties } => {
                self.encode_typed_object(class_name.as_bytes(), properties)
            }
            Amf0Value::StrictArray(v) => self.encode_strict_array(v),
        }
    }

    /// Encode a [`bool`] as a AMF0 boolean value.
    pub fn encode_boolean(&mut self, value: bool) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Boolean as u8)?;
        self.writer.write_u8(value as u8)?;
        Ok(())
    }

    /// Encode a [`f64`] as a AMF0 number value.
    pub fn encode_number(&mut self, value: f64) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Number as u8)?;
        self.writer.write_f64::<BigEndian>(value)?;
        Ok(())
    }

    /// Encode a [`&str`](str) as a AMF0 string value.
    ///
    /// This function decides based on the length of the given string slice whether to use a normal string or a long string.
    pub fn encode_string(&mut self, value: &str) -> Result<(), Amf0Error> {
        if value.len() <= (u16::MAX as usize) {
            self.encode_short_string(value.as_bytes())
        } else {
            self.encode_long_string(value.as_bytes())
        }
    }

    /// Encode raw bytes as a AMF0 string value.
    ///
    /// Fails with [`Amf0Error::TooLong`] if `value` is longer than 65535 bytes.
    pub fn encode_short_string(&mut self, value: &[u8]) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::String as u8)?;
        self.write_normal_string(value)
    }

    /// Encode raw bytes as a AMF0 long string value.
    pub fn encode_long_string(&mut self, value: &[u8]) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::LongString as u8)?;
        self.write_long_string(value)
    }

    /// Encode raw bytes as a AMF0 XML document value.
    pub fn encode_xml_document(&mut self, value: &[u8]) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::XmlDocument as u8)?;
        self.write_long_string(value)
    }

    /// Encode AMF0 Null value.
    pub fn encode_null(&mut self) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Null as u8)?;
        Ok(())
    }

    /// Encode AMF0 Undefined value.
    pub fn encode_undefined(&mut self) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Undefined as u8)?;
        Ok(())
    }

    /// Encode AMF0 Unsupported value.
    pub fn encode_unsupported(&mut self) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Unsupported as u8)?;
        Ok(())
    }

    /// Encode a AMF0 reference to a previously sent complex value.
    pub fn encode_reference(&mut self, index: u16) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Reference as u8)?;
        self.writer.write_u16::<BigEndian>(index)?;
        Ok(())
    }

    /// Encode a AMF0 date.
    pub fn encode_date(&mut self, timestamp: f64, timezone: i16) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Date as u8)?;
        self.writer.write_f64::<BigEndian>(timestamp)?;
        self.writer.write_i16::<BigEndian>(timezone)?;
        Ok(())
    }

    /// Encode a slice of values as an AMF0 StrictArray value.
    pub fn encode_strict_array(&mut self, values: &[Amf0Value]) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::StrictArray as u8)?;
        self.writer.write_u32::<BigEndian>(values.len().try_into()?)?;

        self.encode_all(values)
    }

    /// Encode an [`Amf0Object`] as an AMF0 Object value.
    pub fn encode_object(&mut self, properties: &Amf0Object) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::Object as u8)?;
        self.encode_properties(properties)
    }

    /// Encode an [`Amf0Object`] as an AMF0 ECMA array value.
    ///
    /// The size field is the number of properties.
    pub fn encode_ecma_array(&mut self, properties: &Amf0Object) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::EcmaArray as u8)?;
        self.writer.write_u32::<BigEndian>(properties.len().try_into()?)?;
        self.encode_properties(properties)
    }

    /// Encode an [`Amf0Object`] as an AMF0 typed object with the given class name.
    pub fn encode_typed_object(&mut self, class_name: &[u8], properties: &Amf0Object) -> Result<(), Amf0Error> {
        self.writer.write_u8(Amf0Marker::TypedObject as u8)?;
        self.write_normal_string(class_name)?;
        self.encode_properties(properties)
    }

    fn encode_properties(&mut self, properties: &Amf0Object) -> Result<(), Amf0Error> {
        for (key, value) in properties {
            // Object keys are not preceeded with a marker
            self.write_normal_string(key.as_bytes())?;
            self.encode_value(value)?;
        }

        self.encode_object_trailer()
    }

    fn encode_object_trailer(&mut self) -> Result<(), Amf0Error> {
        self.writer.write_u24::<BigEndian>(Amf0Marker::ObjectEnd as u32)?;
        Ok(())
    }

    fn write_normal_string(&mut self, value: &[u8]) -> Result<(), Amf0Error> {
        self.writer.write_u16::<BigEndian>(value.len().try_into()?)?;
        self.writer.write_all(value)?;
        Ok(())
    }

    fn write_long_string(&mut self, value: &[u8]) -> Result<(), Amf0Error> {
        self.writer.write_u32::<BigEndian>(value.len().try_into()?)?;
        self.writer.write_all(value)?;
        Ok(())
    }
}
