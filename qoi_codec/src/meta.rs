use crate::error::Error;

pub const QOI_BYTES_END: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub const QOI_BYTES_MAGIC: &[u8; 4] = b"qoif";
pub const QOI_MAX_RUN: u8 = 62;
pub const QOI_HEADER_LEN: usize = 14;

/// Metadata describing an image, stored in the 14 byte QOI header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImageMeta {
  /// The image's width.
  pub width: u32,
  /// The image's height.
  pub height: u32,
  /// The number of color channels per pixel, see [Channels].
  pub channels: Channels,
  /// The image's colorspace, see [Colorspace].
  pub colorspace: Colorspace,
}

impl ImageMeta {
  pub fn new(width: u32, height: u32, channels: Channels, colorspace: Colorspace) -> Self {
    Self { width, height, channels, colorspace }
  }

  /// Builds metadata from raw header values, rejecting a channel count other
  /// than 3 or 4 and a colorspace other than 0 or 1.
  pub fn try_new(width: u32, height: u32, channels: u8, colorspace: u8) -> Result<Self, Error> {
    Ok(Self {
      width,
      height,
      channels: Channels::try_from(channels)?,
      colorspace: Colorspace::try_from(colorspace)?,
    })
  }

  /// Returns the total number of pixels that make up the image, or an error
  /// if that number doesn't fit into a `usize`.
  pub fn num_pixels(&self) -> Result<usize, Error> {
    let invalid = || Error::InvalidDimensions { width: self.width, height: self.height };
    let width = usize::try_from(self.width).map_err(|_| invalid())?;
    let height = usize::try_from(self.height).map_err(|_| invalid())?;

    width.checked_mul(height).ok_or_else(invalid)
  }

  /// Returns the number of bytes the image's raw pixel data occupies.
  pub fn raw_len(&self) -> Result<usize, Error> {
    self
      .num_pixels()?
      .checked_mul(self.channels.count())
      .ok_or(Error::InvalidDimensions { width: self.width, height: self.height })
  }

  /// The largest number of bytes an encoded image with this metadata can
  /// take up: every pixel stored as a literal RGB or RGBA chunk.
  pub fn encoded_size_limit(&self) -> Result<usize, Error> {
    self
      .num_pixels()?
      .checked_mul(self.channels.count() + 1)
      .and_then(|size| size.checked_add(QOI_HEADER_LEN + QOI_BYTES_END.len()))
      .ok_or(Error::InvalidDimensions { width: self.width, height: self.height })
  }

  // Serializes the header, integers big-endian.
  pub(crate) fn to_header(self) -> [u8; QOI_HEADER_LEN] {
    let mut header = [0; QOI_HEADER_LEN];

    header[..4].copy_from_slice(QOI_BYTES_MAGIC);
    header[4..8].copy_from_slice(&self.width.to_be_bytes());
    header[8..12].copy_from_slice(&self.height.to_be_bytes());
    header[12] = self.channels as u8;
    header[13] = self.colorspace as u8;

    header
  }
}

/// The number of color channels an image's pixels contain. Color channels
/// are assumed to not be pre-multiplied with the alpha channel
/// ("un-premultiplied alpha").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Channels {
  /// Red, green, and blue. Alpha is implicitly opaque.
  Rgb = 3,
  /// Red, green, blue, and alpha.
  Rgba = 4,
}

impl Channels {
  /// Number of bytes per pixel.
  pub fn count(self) -> usize {
    self as usize
  }
}

/// A `TryFrom` implementation for converting a channel count into `Channels`.
/// Only `3` and `4` are valid.
impl TryFrom<u8> for Channels {
  type Error = Error;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      3 => Ok(Channels::Rgb),
      4 => Ok(Channels::Rgba),
      _ => Err(Error::InvalidChannels(byte)),
    }
  }
}

/// How an image's colors are meant to be interpreted. Purely informative, it
/// doesn't change how pixels are encoded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Colorspace {
  /// sRGB color channels with a linear alpha channel.
  #[default]
  Srgb = 0,
  /// Every channel is linear.
  Linear = 1,
}

/// A `TryFrom` implementation for converting any `u8` into a `Colorspace`.
/// `0` maps to `Colorspace::Srgb`, and `1` maps to `Colorspace::Linear`. All
/// other `u8` values are invalid.
impl TryFrom<u8> for Colorspace {
  type Error = Error;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      0 => Ok(Colorspace::Srgb),
      1 => Ok(Colorspace::Linear),
      _ => Err(Error::InvalidColorspace(byte)),
    }
  }
}
