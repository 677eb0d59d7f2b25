use std::io;

use thiserror::Error;

/// An enumeration of all error values this crate may produce.
///
/// Variants fall into the broad groups described by [`ErrorKind`], see
/// [`Error::kind`].
#[derive(Debug, Error)]
pub enum Error {
  /// The image metadata names a channel count other than 3 (RGB) or 4 (RGBA).
  #[error("invalid channel count {0}, expected 3 for RGB or 4 for RGBA")]
  InvalidChannels(u8),
  /// The image metadata names a colorspace other than 0 (sRGB) or 1 (linear).
  #[error("invalid image colorspace {0}, expected 0 for sRGB or 1 for linear")]
  InvalidColorspace(u8),
  /// The image's `width * height` can't be represented on this platform.
  #[error("invalid image dimensions {width}x{height}")]
  InvalidDimensions { width: u32, height: u32 },
  /// The raw pixel buffer handed to the encoder doesn't match the size
  /// described by the image's metadata.
  #[error("pixel buffer holds {actual} bytes, expected {expected}")]
  PixelBufferLength { expected: usize, actual: usize },
  /// The image exceeds the limits configured in `DecodeOptions`.
  #[error("image dimensions {width}x{height} exceed the configured limit of {max_width}x{max_height}")]
  TooLarge {
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
  },

  /// A value doesn't fit into the fixed width field it was meant for.
  #[error("value {value} does not fit in a {width} bit field")]
  FieldOverflow { value: i64, width: u8 },
  /// A run chunk was asked to carry a length outside of 1..=62.
  #[error("invalid run length {0}, expected 1 to 62")]
  InvalidRunLength(u8),

  /// The stream doesn't start with the `qoif` magic bytes.
  #[error("invalid magic bytes {0:?}, expected \"qoif\"")]
  InvalidMagic([u8; 4]),
  /// A header field holds a value outside of its valid range.
  #[error("invalid header field `{field}` with value {value}")]
  InvalidHeader { field: &'static str, value: u8 },
  /// Unexpectedly reached the end of the stream.
  #[error("unexpectedly reached end of stream at byte offset {offset}")]
  UnexpectedEof { offset: usize },
  /// A run chunk produces more pixels than the image has left.
  #[error("run chunk at byte offset {offset} overflows the image by {excess} pixels")]
  RunOverflow { offset: usize, excess: usize },
  /// The stream doesn't end with the 8 byte end marker.
  #[error("stream does not end with the end marker")]
  MissingTerminator,
  /// The chunk stream ran into the end marker with pixels still missing.
  #[error("reached the end marker at byte offset {offset} with {remaining} pixels left to decode")]
  PrematureTerminator { offset: usize, remaining: usize },
  /// Chunks are left over after the final pixel was decoded.
  #[error("{remaining} bytes of chunk data left at byte offset {offset} after the final pixel")]
  TrailingData { offset: usize, remaining: usize },

  /// Any `std::io::Error` raised by the streaming entry points while reading
  /// an image source or writing to an image destination.
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Broad groups of [`Error`] values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
  /// Invalid image metadata or pixel buffer, detected before any encoding or
  /// decoding work is done.
  Configuration,
  /// A computed value would not fit into its fixed width field. The encoder's
  /// range checks make this a broken invariant rather than bad input.
  EncodingRange,
  /// The encoded stream is malformed. Never recoverable since QOI has no
  /// resynchronization points.
  Corruption,
  /// Failure of the underlying reader or writer.
  Io,
}

impl Error {
  /// Returns the group this error belongs to.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::InvalidChannels(_)
      | Error::InvalidColorspace(_)
      | Error::InvalidDimensions { .. }
      | Error::PixelBufferLength { .. }
      | Error::TooLarge { .. } => ErrorKind::Configuration,
      Error::FieldOverflow { .. } | Error::InvalidRunLength(_) => ErrorKind::EncodingRange,
      Error::InvalidMagic(_)
      | Error::InvalidHeader { .. }
      | Error::UnexpectedEof { .. }
      | Error::RunOverflow { .. }
      | Error::MissingTerminator
      | Error::PrematureTerminator { .. }
      | Error::TrailingData { .. } => ErrorKind::Corruption,
      Error::Io(_) => ErrorKind::Io,
    }
  }

  /// Returns the byte offset into the encoded stream at which the error was
  /// detected, if known.
  pub fn offset(&self) -> Option<usize> {
    match self {
      Error::UnexpectedEof { offset }
      | Error::RunOverflow { offset, .. }
      | Error::PrematureTerminator { offset, .. }
      | Error::TrailingData { offset, .. } => Some(*offset),
      Error::InvalidMagic(_) | Error::InvalidHeader { .. } => Some(0),
      _ => None,
    }
  }
}
