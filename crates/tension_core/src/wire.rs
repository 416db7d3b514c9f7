//! Length-delimited field codec for animation messages
//!
//! Each field is written as a varint key `(field_number << 3) | wire_type`
//! followed by its payload. Doubles travel as little-endian fixed64, and a
//! field equal to its declared default is omitted entirely, so an all-default
//! message encodes to zero bytes.

use crate::error::{Result, WireError};

/// How a field's payload is laid out on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            other => Err(WireError::UnknownWireType(other)),
        }
    }
}

/// A decoded field key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub tag: u32,
    pub wire_type: WireType,
}

impl Field {
    pub fn new(tag: u32, wire_type: WireType) -> Self {
        Self { tag, wire_type }
    }

    /// The varint key written before the payload
    pub fn key(&self) -> u64 {
        ((self.tag as u64) << 3) | self.wire_type as u64
    }
}

/// Appends encoded fields to a growable buffer
#[derive(Debug, Default)]
pub struct WireEncoder {
    buffer: Vec<u8>,
}

impl WireEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    pub fn encode_fixed64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn encode_fixed32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a double field unless it equals `default`
    pub fn double_field(&mut self, tag: u32, value: f64, default: f64) {
        if value == default {
            return;
        }
        self.encode_varint(Field::new(tag, WireType::Fixed64).key());
        self.encode_fixed64(value.to_bits());
    }

    /// Write an unsigned varint field unless it equals `default`
    pub fn varint_field(&mut self, tag: u32, value: u64, default: u64) {
        if value == default {
            return;
        }
        self.encode_varint(Field::new(tag, WireType::Varint).key());
        self.encode_varint(value);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Reads fields from an encoded buffer
#[derive(Debug)]
pub struct WireDecoder<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> WireDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Next field key, or `None` at end of input
    pub fn next_field(&mut self) -> Result<Option<Field>> {
        if self.position >= self.bytes.len() {
            return Ok(None);
        }
        let key = self.decode_varint()?;
        let tag = (key >> 3) as u32;
        if tag == 0 {
            return Err(WireError::ZeroTag);
        }
        let wire_type = WireType::from_raw((key & 0x7) as u8)?;
        Ok(Some(Field::new(tag, wire_type)))
    }

    pub fn decode_varint(&mut self) -> Result<u64> {
        let start = self.position;
        let mut result = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = *self
                .bytes
                .get(self.position)
                .ok_or(WireError::Truncated {
                    offset: self.position,
                })?;
            self.position += 1;
            result |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(WireError::MalformedVarint { offset: start })
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.position + N;
        let slice = self
            .bytes
            .get(self.position..end)
            .ok_or(WireError::Truncated {
                offset: self.position,
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.position = end;
        Ok(out)
    }

    /// Read a double payload; fixed32 payloads are widened from `f32`
    pub fn double_field(&mut self, field: Field) -> Result<f64> {
        match field.wire_type {
            WireType::Fixed64 => Ok(f64::from_bits(u64::from_le_bytes(self.take::<8>()?))),
            WireType::Fixed32 => Ok(f32::from_bits(u32::from_le_bytes(self.take::<4>()?)) as f64),
            other => Err(WireError::UnexpectedWireType {
                tag: field.tag,
                wire_type: other as u8,
            }),
        }
    }

    pub fn varint_field(&mut self, field: Field) -> Result<u64> {
        match field.wire_type {
            WireType::Varint => self.decode_varint(),
            other => Err(WireError::UnexpectedWireType {
                tag: field.tag,
                wire_type: other as u8,
            }),
        }
    }

    /// Skip the payload of a field this message does not know
    pub fn skip_field(&mut self, field: Field) -> Result<()> {
        match field.wire_type {
            WireType::Varint => {
                self.decode_varint()?;
            }
            WireType::Fixed64 => {
                self.take::<8>()?;
            }
            WireType::Fixed32 => {
                self.take::<4>()?;
            }
            WireType::LengthDelimited => {
                let length = self.decode_varint()? as usize;
                let end = self
                    .position
                    .checked_add(length)
                    .filter(|end| *end <= self.bytes.len())
                    .ok_or(WireError::Truncated {
                        offset: self.position,
                    })?;
                self.position = end;
            }
        }
        Ok(())
    }
}

/// A message with a fixed field layout
pub trait WireMessage: Sized {
    fn encode(&self, encoder: &mut WireEncoder);

    fn decode(decoder: &mut WireDecoder<'_>) -> Result<Self>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = WireEncoder::new();
        self.encode(&mut encoder);
        encoder.into_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(&mut WireDecoder::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_layout() {
        let mut encoder = WireEncoder::new();
        encoder.encode_varint(1);
        encoder.encode_varint(300);
        assert_eq!(encoder.as_bytes(), &[0x01, 0xAC, 0x02]);

        let mut decoder = WireDecoder::new(encoder.as_bytes());
        assert_eq!(decoder.decode_varint(), Ok(1));
        assert_eq!(decoder.decode_varint(), Ok(300));
    }

    #[test]
    fn test_double_field_key_and_payload() {
        let mut encoder = WireEncoder::new();
        encoder.double_field(2, 1.5, 0.0);
        let bytes = encoder.into_bytes();

        // (2 << 3) | 1
        assert_eq!(bytes[0], 0x11);
        assert_eq!(&bytes[1..], &1.5f64.to_le_bytes());
    }

    #[test]
    fn test_default_valued_field_is_omitted() {
        let mut encoder = WireEncoder::new();
        encoder.double_field(1, 100.0, 100.0);
        encoder.varint_field(2, 0, 0);
        assert!(encoder.as_bytes().is_empty());
    }

    #[test]
    fn test_fixed32_double_is_widened() {
        let mut bytes = vec![(3 << 3) | 5];
        bytes.extend_from_slice(&0.25f32.to_le_bytes());

        let mut decoder = WireDecoder::new(&bytes);
        let field = decoder.next_field().unwrap().unwrap();
        assert_eq!(field, Field::new(3, WireType::Fixed32));
        assert_eq!(decoder.double_field(field), Ok(0.25));
        assert_eq!(decoder.next_field(), Ok(None));
    }

    #[test]
    fn test_skip_unknown_fields() {
        let mut encoder = WireEncoder::new();
        encoder.varint_field(9, 42, 0);
        encoder.encode_varint(Field::new(10, WireType::LengthDelimited).key());
        encoder.encode_varint(4);
        encoder.encode_fixed32(0xDEAD_BEEF);
        encoder.double_field(1, 2.0, 0.0);
        let bytes = encoder.into_bytes();

        let mut decoder = WireDecoder::new(&bytes);
        let first = decoder.next_field().unwrap().unwrap();
        assert_eq!(first, Field::new(9, WireType::Varint));
        decoder.skip_field(first).unwrap();
        let second = decoder.next_field().unwrap().unwrap();
        assert_eq!(second, Field::new(10, WireType::LengthDelimited));
        decoder.skip_field(second).unwrap();

        let third = decoder.next_field().unwrap().unwrap();
        assert_eq!(third, Field::new(1, WireType::Fixed64));
        assert_eq!(decoder.double_field(third), Ok(2.0));
        assert_eq!(decoder.next_field(), Ok(None));
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let bytes = [0x09, 0x00, 0x00];
        let mut decoder = WireDecoder::new(&bytes);
        let field = decoder.next_field().unwrap().unwrap();
        assert_eq!(
            decoder.double_field(field),
            Err(WireError::Truncated { offset: 1 })
        );
    }

    #[test]
    fn test_zero_tag_is_rejected() {
        let bytes = [0x01];
        assert_eq!(WireDecoder::new(&bytes).next_field(), Err(WireError::ZeroTag));
    }

    #[test]
    fn test_wrong_wire_type_for_double() {
        let bytes = [0x08, 0x05];
        let mut decoder = WireDecoder::new(&bytes);
        let field = decoder.next_field().unwrap().unwrap();
        assert_eq!(
            decoder.double_field(field),
            Err(WireError::UnexpectedWireType { tag: 1, wire_type: 0 })
        );
    }
}
