//! Conversion between field values and the fixed width, most significant
//! bit first, bit layout of the chunk stream.

use crate::error::Error;

/// Returns `value` unchanged if it can be stored in a field that is `width`
/// bits wide, and an error otherwise.
pub fn encode_unsigned(value: u32, width: u8) -> Result<u32, Error> {
  let fits = match width {
    0..=31 => value >> width == 0,
    32 => true,
    _ => false,
  };

  if !fits {
    return Err(Error::FieldOverflow { value: i64::from(value), width });
  }

  Ok(value)
}

/// Stores a signed `value` as the unsigned `value + bias` in a field that is
/// `width` bits wide. QOI's difference chunks store their values this way
/// rather than as two's complement.
pub fn encode_signed(value: i32, width: u8, bias: i32) -> Result<u32, Error> {
  let overflow = || Error::FieldOverflow { value: i64::from(value), width };
  let biased = u32::try_from(i64::from(value) + i64::from(bias)).map_err(|_| overflow())?;

  encode_unsigned(biased, width).map_err(|_| overflow())
}

/// Inverse of [`encode_signed`].
pub fn decode_signed(bits: u32, bias: i32) -> i32 {
  (bits as i32).wrapping_sub(bias)
}

/// Packs fixed width fields into bytes, most significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
  bytes: Vec<u8>,
  // Bits that don't make up a whole byte yet, right aligned.
  acc: u64,
  acc_len: u32,
}

impl BitWriter {
  /// Creates an empty writer.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates an empty writer with room for `capacity` bytes.
  pub fn with_capacity(capacity: usize) -> Self {
    Self { bytes: Vec::with_capacity(capacity), acc: 0, acc_len: 0 }
  }

  /// Appends the lowest `width` bits of `value`. Fails rather than truncating
  /// if `value` needs more than `width` bits.
  pub fn write_bits(&mut self, value: u32, width: u8) -> Result<(), Error> {
    let value = encode_unsigned(value, width)?;
    self.push(value, width);
    Ok(())
  }

  /// Appends `value + bias` as a `width` bit unsigned field.
  pub fn write_signed(&mut self, value: i32, width: u8, bias: i32) -> Result<(), Error> {
    let value = encode_signed(value, width, bias)?;
    self.push(value, width);
    Ok(())
  }

  /// Appends whole bytes, 8 bits each.
  pub fn write_bytes(&mut self, bytes: &[u8]) {
    if self.acc_len == 0 {
      self.bytes.extend_from_slice(bytes);
      return;
    }

    for &byte in bytes {
      self.push(u32::from(byte), 8);
    }
  }

  /// Number of bits written so far.
  pub fn bit_len(&self) -> usize {
    self.bytes.len() * 8 + self.acc_len as usize
  }

  /// Returns the packed bytes, padding a partial final byte with zero bits.
  pub fn finish(mut self) -> Vec<u8> {
    if self.acc_len > 0 {
      self.bytes.push((self.acc << (8 - self.acc_len)) as u8);
    }

    self.bytes
  }

  // `value` must already be known to fit in `width` bits.
  fn push(&mut self, value: u32, width: u8) {
    self.acc = (self.acc << width) | u64::from(value);
    self.acc_len += u32::from(width);

    while self.acc_len >= 8 {
      self.acc_len -= 8;
      self.bytes.push((self.acc >> self.acc_len) as u8);
    }

    self.acc &= (1 << self.acc_len) - 1;
  }
}

/// Reads fixed width fields out of bytes, most significant bit first.
#[derive(Debug)]
pub struct BitReader<'a> {
  bytes: &'a [u8],
  bit_pos: usize,
}

impl<'a> BitReader<'a> {
  /// Creates a reader positioned at the first bit of `bytes`.
  pub fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, bit_pos: 0 }
  }

  /// Returns the next `width` bits without consuming them.
  pub fn peek_bits(&self, width: u8) -> Result<u32, Error> {
    let width = usize::from(width);

    if width > 32 || self.bit_pos + width > self.bytes.len() * 8 {
      return Err(Error::UnexpectedEof { offset: self.byte_offset() });
    }

    if width == 8 && self.bit_pos % 8 == 0 {
      return Ok(u32::from(self.bytes[self.bit_pos / 8]));
    }

    let mut value = 0;

    for pos in self.bit_pos..self.bit_pos + width {
      let bit = (self.bytes[pos / 8] >> (7 - pos % 8)) & 1;
      value = (value << 1) | u32::from(bit);
    }

    Ok(value)
  }

  /// Reads and consumes the next `width` bits.
  pub fn read_bits(&mut self, width: u8) -> Result<u32, Error> {
    let value = self.peek_bits(width)?;
    self.bit_pos += usize::from(width);
    Ok(value)
  }

  /// Reads a `width` bit field and removes `bias` from it.
  pub fn read_signed(&mut self, width: u8, bias: i32) -> Result<i32, Error> {
    Ok(decode_signed(self.read_bits(width)?, bias))
  }

  /// Offset of the byte holding the next unread bit.
  pub fn byte_offset(&self) -> usize {
    self.bit_pos / 8
  }

  /// Whether every bit has been consumed.
  pub fn is_empty(&self) -> bool {
    self.bit_pos >= self.bytes.len() * 8
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_encoding_unsigned_fields() {
    assert_eq!(encode_unsigned(63, 6).unwrap(), 63);
    assert_eq!(encode_unsigned(u32::MAX, 32).unwrap(), u32::MAX);
    assert!(matches!(
      encode_unsigned(64, 6),
      Err(Error::FieldOverflow { value: 64, width: 6 })
    ));
  }

  #[test]
  fn test_encoding_signed_fields() {
    assert_eq!(encode_signed(-2, 2, 2).unwrap(), 0);
    assert_eq!(encode_signed(1, 2, 2).unwrap(), 3);
    assert_eq!(encode_signed(-32, 6, 32).unwrap(), 0);
    assert_eq!(encode_signed(7, 4, 8).unwrap(), 15);

    assert!(matches!(
      encode_signed(2, 2, 2),
      Err(Error::FieldOverflow { value: 2, width: 2 })
    ));
    assert!(matches!(
      encode_signed(-9, 4, 8),
      Err(Error::FieldOverflow { value: -9, width: 4 })
    ));
  }

  #[test]
  fn test_decoding_signed_fields() {
    assert_eq!(decode_signed(0, 2), -2);
    assert_eq!(decode_signed(3, 2), 1);
    assert_eq!(decode_signed(42, 32), 10);
  }

  #[test]
  fn test_writing_packs_msb_first() {
    let mut writer = BitWriter::new();

    writer.write_bits(0b01, 2).unwrap();
    writer.write_signed(1, 2, 2).unwrap();
    writer.write_signed(-1, 2, 2).unwrap();
    writer.write_signed(0, 2, 2).unwrap();
    writer.write_bytes(&[0xab, 0xcd]);

    assert_eq!(writer.bit_len(), 24);
    assert_eq!(writer.finish(), vec![0b0111_0110, 0xab, 0xcd]);
  }

  #[test]
  fn test_writing_pads_final_byte() {
    let mut writer = BitWriter::new();

    writer.write_bits(0b101, 3).unwrap();
    writer.write_bytes(&[0xff]);

    assert_eq!(writer.bit_len(), 11);
    assert_eq!(writer.finish(), vec![0b1011_1111, 0b1110_0000]);
  }

  #[test]
  fn test_writing_rejects_oversized_values() {
    let mut writer = BitWriter::new();

    assert!(writer.write_bits(4, 2).is_err());
    assert!(writer.write_signed(-3, 2, 2).is_err());
    assert_eq!(writer.bit_len(), 0);
  }

  #[test]
  fn test_reading_fields() {
    let bytes = [0b1010_1010, 0b1011_1000];
    let mut reader = BitReader::new(&bytes);

    assert_eq!(reader.peek_bits(8).unwrap(), 0b1010_1010);
    assert_eq!(reader.read_bits(2).unwrap(), 0b10);
    assert_eq!(reader.read_signed(6, 32).unwrap(), 10);
    assert_eq!(reader.byte_offset(), 1);
    assert_eq!(reader.read_signed(4, 8).unwrap(), 3);
    assert_eq!(reader.read_signed(4, 8).unwrap(), 0);
    assert!(reader.is_empty());
  }

  #[test]
  fn test_reading_past_the_end() {
    let bytes = [0xfe, 0x01];
    let mut reader = BitReader::new(&bytes);

    reader.read_bits(8).unwrap();
    reader.read_bits(4).unwrap();

    assert!(matches!(reader.read_bits(8), Err(Error::UnexpectedEof { offset: 1 })));
    assert_eq!(reader.read_bits(4).unwrap(), 1);
  }
}
