use std::io;

use crate::bits::BitReader;
use crate::chunk::Chunk;
use crate::error::Error;
use crate::meta::{
  Channels, Colorspace, ImageMeta, QOI_BYTES_END, QOI_BYTES_MAGIC, QOI_HEADER_LEN, QOI_MAX_RUN,
};
use crate::options::DecodeOptions;
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Decodes a QOI image with the default [`DecodeOptions`], returning the
/// image's metadata and raw pixel data. The pixel data is laid out row by
/// row with as many bytes per pixel as the header's channel count.
pub fn decode(data: &[u8]) -> Result<(ImageMeta, Vec<u8>), Error> {
  decode_with_options(data, &DecodeOptions::default())
}

/// Decodes a QOI image, respecting the limits set in `options`.
///
/// Fails with a corruption error if the header is malformed, the chunk
/// stream doesn't produce exactly `width * height` pixels, or the stream
/// doesn't end with the end marker right after the final chunk.
pub fn decode_with_options(
  data: &[u8],
  options: &DecodeOptions,
) -> Result<(ImageMeta, Vec<u8>), Error> {
  let meta = read_header(data, options)?;

  if meta.width > options.max_width() || meta.height > options.max_height() {
    return Err(Error::TooLarge {
      width: meta.width,
      height: meta.height,
      max_width: options.max_width(),
      max_height: options.max_height(),
    });
  }

  let chunk_data = data[QOI_HEADER_LEN..]
    .strip_suffix(&QOI_BYTES_END)
    .ok_or(Error::MissingTerminator)?;

  let pixels = decode_pixels(chunk_data, &meta)?;

  log::debug!(
    "Decoded {}x{} image from {} bytes into {} bytes of pixels",
    meta.width,
    meta.height,
    data.len(),
    pixels.len()
  );

  Ok((meta, pixels))
}

/// Decodes a QOI encoded image. The decoded pixel data is written to the
/// provided `writer`, and upon success, the image's `ImageMeta` data is
/// returned.
///
/// This function supports reading and writing to in-memory structures or IO
/// streams by accepting a generic trait bound of `std::io::Read` for the
/// encoded image source, and `std::io::Write` for the decoded pixel data
/// destination. The whole source is read before decoding starts, since the
/// end marker has to be located first.
pub fn decode_image<R: io::Read, W: io::Write>(
  mut reader: R,
  mut writer: W,
) -> Result<ImageMeta, Error> {
  let mut data = Vec::new();
  reader.read_to_end(&mut data)?;

  let (meta, pixels) = decode(&data)?;

  writer.write_all(&pixels)?;
  writer.flush()?;

  Ok(meta)
}

/// Decodes only the 14 byte header of a QOI image.
pub fn decode_header(data: &[u8]) -> Result<ImageMeta, Error> {
  read_header(data, &DecodeOptions::default())
}

fn read_header(data: &[u8], options: &DecodeOptions) -> Result<ImageMeta, Error> {
  if data.len() < QOI_HEADER_LEN {
    return Err(Error::UnexpectedEof { offset: data.len() });
  }

  let magic = [data[0], data[1], data[2], data[3]];

  if &magic != QOI_BYTES_MAGIC {
    return Err(Error::InvalidMagic(magic));
  }

  let width = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
  let height = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);

  let channels = Channels::try_from(data[12])
    .map_err(|_| Error::InvalidHeader { field: "channels", value: data[12] })?;

  let colorspace = match Colorspace::try_from(data[13]) {
    Ok(colorspace) => colorspace,
    Err(_) if !options.strict_mode() => {
      log::warn!("Unknown colorspace value {}, expected 0 or 1, treating as sRGB", data[13]);
      Colorspace::Srgb
    }
    Err(_) => {
      return Err(Error::InvalidHeader { field: "colorspace", value: data[13] });
    }
  };

  log::trace!("Image width: {}", width);
  log::trace!("Image height: {}", height);
  log::trace!("Image channels: {:?}", channels);
  log::trace!("Image colorspace: {:?}", colorspace);

  Ok(ImageMeta { width, height, channels, colorspace })
}

// Decodes the chunks between the header and the end marker into raw pixel
// data. `chunk_data` must produce exactly the number of pixels `meta` calls
// for, nothing more and nothing less.
fn decode_pixels(chunk_data: &[u8], meta: &ImageMeta) -> Result<Vec<u8>, Error> {
  let mut remaining = meta.num_pixels()?;
  // Each chunk byte yields at most one full run of pixels.
  let capacity = chunk_data
    .len()
    .saturating_mul(usize::from(QOI_MAX_RUN) * meta.channels.count())
    .min(meta.raw_len()?);
  let mut pixels = Vec::with_capacity(capacity);
  let mut reader = BitReader::new(chunk_data);
  let mut state = State::new();

  while remaining > 0 {
    let offset = QOI_HEADER_LEN + reader.byte_offset();

    let chunk = Chunk::read(&mut reader).map_err(|err| match err {
      Error::UnexpectedEof { .. } => Error::PrematureTerminator { offset, remaining },
      err => err,
    })?;

    let pixel = match chunk {
      Chunk::Run(length) => {
        let length = usize::from(length);

        if length > remaining {
          return Err(Error::RunOverflow { offset, excess: length - remaining });
        }

        let pixel = state.prev_pixel;
        state.advance(pixel);

        for _ in 0..length {
          push_pixel(&mut pixels, pixel, meta.channels);
        }

        remaining -= length;
        continue;
      }
      // A slot nothing was stored in yet reads as transparent black.
      Chunk::Index(index) => state
        .cache
        .get(usize::from(index))
        .unwrap_or(Pixel::new(0, 0, 0, 0)),
      Chunk::Diff { dr, dg, db } => {
        Pixel::from_diff(PixelDiff::Small(dr, dg, db), &state.prev_pixel)
      }
      Chunk::Luma { dg, dr_dg, db_dg } => {
        Pixel::from_diff(PixelDiff::Luma(dg, dr_dg, db_dg), &state.prev_pixel)
      }
      Chunk::Rgb { r, g, b } => Pixel { r, g, b, a: state.prev_pixel.a },
      Chunk::Rgba { r, g, b, a } => Pixel { r, g, b, a },
    };

    state.advance(pixel);
    push_pixel(&mut pixels, pixel, meta.channels);
    remaining -= 1;
  }

  if !reader.is_empty() {
    let consumed = reader.byte_offset();

    return Err(Error::TrailingData {
      offset: QOI_HEADER_LEN + consumed,
      remaining: chunk_data.len() - consumed,
    });
  }

  Ok(pixels)
}

fn push_pixel(pixels: &mut Vec<u8>, pixel: Pixel, channels: Channels) {
  match channels {
    Channels::Rgb => pixels.extend_from_slice(&[pixel.r, pixel.g, pixel.b]),
    Channels::Rgba => pixels.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]),
  }
}
