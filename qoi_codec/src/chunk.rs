use crate::bits::{BitReader, BitWriter};
use crate::error::Error;
use crate::meta::QOI_MAX_RUN;

/// An enumeration of each possible QOI encoding "chunk". Difference chunks
/// hold the signed differences from the previous pixel, the biases of the
/// encoded form are applied when a chunk is written or read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Chunk {
  /// `QOI_OP_RGB`, the red, green, and blue values of a pixel. Alpha is
  /// carried over from the previous pixel.
  ///
  /// ```text
  /// | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 |
  /// |------------------------|------|------|------|
  /// | 1  1  1  1  1  1  1  0 |   r  |   g  |   b  |
  /// ```
  Rgb { r: u8, g: u8, b: u8 },

  /// `QOI_OP_RGBA`, the red, green, blue, and alpha values of a pixel.
  ///
  /// ```text
  /// | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 | 7..0 |
  /// |------------------------|------|------|------|------|
  /// | 1  1  1  1  1  1  1  1 |   r  |   g  |   b  |   a  |
  /// ```
  Rgba { r: u8, g: u8, b: u8, a: u8 },

  /// `QOI_OP_INDEX`, index into the pixel cache.
  ///
  /// ```text
  /// | 7 6   5  4  3  2  1  0 |
  /// |------------------------|
  /// | 0 0 |      index       |
  /// ```
  Index(u8),

  /// `QOI_OP_DIFF`, the red, green, and blue differences from the previous
  /// pixel, each within -2..=1 and stored with a bias of 2.
  ///
  /// ```text
  /// | 7 6   5  4  3  2  1  0 |
  /// |------------------------|
  /// | 0 1 |  dr |  dg |  db  |
  /// ```
  Diff { dr: i8, dg: i8, db: i8 },

  /// `QOI_OP_LUMA`, the green difference from the previous pixel within
  /// -32..=31 (bias 32), and the red and blue differences minus the green
  /// difference within -8..=7 (bias 8).
  ///
  /// ```text
  /// | 7 6   5  4  3  2  1  0 | 7  6  5  4   3  2  1  0 |
  /// |------------------------|-------------------------|
  /// | 1 0 |       dg         |   dr - dg  |   db - dg  |
  /// ```
  Luma { dg: i8, dr_dg: i8, db_dg: i8 },

  /// `QOI_OP_RUN`, repeats the previous pixel 1 to 62 times. The length is
  /// stored minus one, 63 and 64 would clash with the RGB and RGBA tags.
  ///
  /// ```text
  /// | 7 6   5  4  3  2  1  0 |
  /// |------------------------|
  /// | 1 1 |      run - 1     |
  /// ```
  Run(u8),
}

impl Chunk {
  const TAG_INDEX: u32 = 0b00;
  const TAG_DIFF: u32 = 0b01;
  const TAG_LUMA: u32 = 0b10;
  const TAG_RUN: u32 = 0b11;
  const TAG_RGB: u32 = 0xfe;
  const TAG_RGBA: u32 = 0xff;

  const BIAS_DIFF: i32 = 2;
  const BIAS_LUMA_G: i32 = 32;
  const BIAS_LUMA_RB: i32 = 8;

  /// Number of bytes the chunk occupies once written.
  pub fn encoded_len(&self) -> usize {
    match self {
      Chunk::Rgb { .. } => 4,
      Chunk::Rgba { .. } => 5,
      Chunk::Luma { .. } => 2,
      Chunk::Index(_) | Chunk::Diff { .. } | Chunk::Run(_) => 1,
    }
  }

  /// Encodes the chunk into `writer`. A payload that doesn't fit its field
  /// is an error, never truncated.
  pub fn write(&self, writer: &mut BitWriter) -> Result<(), Error> {
    match *self {
      Chunk::Rgb { r, g, b } => {
        writer.write_bits(Chunk::TAG_RGB, 8)?;
        writer.write_bytes(&[r, g, b]);
      }
      Chunk::Rgba { r, g, b, a } => {
        writer.write_bits(Chunk::TAG_RGBA, 8)?;
        writer.write_bytes(&[r, g, b, a]);
      }
      Chunk::Index(index) => {
        writer.write_bits(Chunk::TAG_INDEX, 2)?;
        writer.write_bits(u32::from(index), 6)?;
      }
      Chunk::Diff { dr, dg, db } => {
        writer.write_bits(Chunk::TAG_DIFF, 2)?;
        writer.write_signed(i32::from(dr), 2, Chunk::BIAS_DIFF)?;
        writer.write_signed(i32::from(dg), 2, Chunk::BIAS_DIFF)?;
        writer.write_signed(i32::from(db), 2, Chunk::BIAS_DIFF)?;
      }
      Chunk::Luma { dg, dr_dg, db_dg } => {
        writer.write_bits(Chunk::TAG_LUMA, 2)?;
        writer.write_signed(i32::from(dg), 6, Chunk::BIAS_LUMA_G)?;
        writer.write_signed(i32::from(dr_dg), 4, Chunk::BIAS_LUMA_RB)?;
        writer.write_signed(i32::from(db_dg), 4, Chunk::BIAS_LUMA_RB)?;
      }
      Chunk::Run(length) => {
        if !(1..=QOI_MAX_RUN).contains(&length) {
          return Err(Error::InvalidRunLength(length));
        }

        writer.write_bits(Chunk::TAG_RUN, 2)?;
        writer.write_bits(u32::from(length - 1), 6)?;
      }
    }

    Ok(())
  }

  /// Decodes the next chunk from `reader`. The full first byte tells RGB and
  /// RGBA apart from runs, every other chunk is told apart by its top two
  /// bits.
  pub fn read(reader: &mut BitReader) -> Result<Self, Error> {
    match reader.peek_bits(8)? {
      Chunk::TAG_RGB => {
        reader.read_bits(8)?;

        Ok(Chunk::Rgb {
          r: read_u8(reader)?,
          g: read_u8(reader)?,
          b: read_u8(reader)?,
        })
      }
      Chunk::TAG_RGBA => {
        reader.read_bits(8)?;

        Ok(Chunk::Rgba {
          r: read_u8(reader)?,
          g: read_u8(reader)?,
          b: read_u8(reader)?,
          a: read_u8(reader)?,
        })
      }
      _ => match reader.read_bits(2)? {
        Chunk::TAG_INDEX => Ok(Chunk::Index(reader.read_bits(6)? as u8)),
        Chunk::TAG_DIFF => Ok(Chunk::Diff {
          dr: reader.read_signed(2, Chunk::BIAS_DIFF)? as i8,
          dg: reader.read_signed(2, Chunk::BIAS_DIFF)? as i8,
          db: reader.read_signed(2, Chunk::BIAS_DIFF)? as i8,
        }),
        Chunk::TAG_LUMA => Ok(Chunk::Luma {
          dg: reader.read_signed(6, Chunk::BIAS_LUMA_G)? as i8,
          dr_dg: reader.read_signed(4, Chunk::BIAS_LUMA_RB)? as i8,
          db_dg: reader.read_signed(4, Chunk::BIAS_LUMA_RB)? as i8,
        }),
        // Two bits leave `TAG_RUN` as the only remaining tag.
        _ => Ok(Chunk::Run(reader.read_bits(6)? as u8 + 1)),
      },
    }
  }
}

fn read_u8(reader: &mut BitReader) -> Result<u8, Error> {
  Ok(reader.read_bits(8)? as u8)
}
