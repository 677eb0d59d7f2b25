use std::io::{self, Read};

use crate::bits::BitWriter;
use crate::chunk::Chunk;
use crate::error::Error;
use crate::meta::{Channels, ImageMeta, QOI_BYTES_END, QOI_MAX_RUN};
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Encodes an image's raw pixel data, described by `meta`, into a QOI image.
///
/// `pixels` holds the image row by row, 3 (RGB) or 4 (RGBA) bytes per pixel
/// depending on `meta.channels`. Its length must be exactly
/// `width * height * channels`. An image without any pixels is encoded as
/// just the header and end marker.
pub fn encode(pixels: &[u8], meta: &ImageMeta) -> Result<Vec<u8>, Error> {
  check_pixel_buffer(pixels, meta)?;

  let mut writer = BitWriter::with_capacity(meta.encoded_size_limit()?);
  let mut num_chunks = 0;

  writer.write_bytes(&meta.to_header());

  encode_pixels(pixels, meta.channels, |chunk| {
    num_chunks += 1;
    chunk.write(&mut writer)
  })?;

  writer.write_bytes(&QOI_BYTES_END);

  let encoded = writer.finish();

  log::debug!(
    "Encoded {}x{} image ({} bytes of pixels) into {} chunks, {} bytes",
    meta.width,
    meta.height,
    pixels.len(),
    num_chunks,
    encoded.len()
  );

  Ok(encoded)
}

/// Returns the chunks `encode` would produce for an image's raw pixel data,
/// in stream order. Useful for inspecting how an image compresses.
pub fn encode_chunks(pixels: &[u8], meta: &ImageMeta) -> Result<Vec<Chunk>, Error> {
  check_pixel_buffer(pixels, meta)?;

  let mut chunks = Vec::new();

  encode_pixels(pixels, meta.channels, |chunk| {
    chunks.push(chunk);
    Ok(())
  })?;

  Ok(chunks)
}

/// Encodes an image's raw pixel data and `ImageMeta` data into a QOI encoded
/// image.
///
/// This function supports reading and writing to in-memory structures or IO
/// streams by accepting a generic trait bound of `std::io::Read` for the
/// image's pixel data, and `std::io::Write` for the encoded image's
/// destination. Exactly `width * height * channels` bytes are read, and the
/// whole source is read before encoding starts.
pub fn encode_image<R: io::Read, W: io::Write>(
  reader: R,
  mut writer: W,
  meta: &ImageMeta,
) -> Result<(), Error> {
  let raw_len = meta.raw_len()?;
  let mut pixels = Vec::new();

  reader.take(raw_len as u64).read_to_end(&mut pixels)?;

  writer.write_all(&encode(&pixels, meta)?)?;
  writer.flush()?;

  Ok(())
}

fn check_pixel_buffer(pixels: &[u8], meta: &ImageMeta) -> Result<(), Error> {
  let expected = meta.raw_len()?;

  if pixels.len() != expected {
    return Err(Error::PixelBufferLength { expected, actual: pixels.len() });
  }

  Ok(())
}

// Walks the pixels in order and hands every chunk to `emit`. A run of pixels
// equal to the previous one is always flushed completely before the pixel
// that ends it is looked at.
fn encode_pixels<F>(pixels: &[u8], channels: Channels, mut emit: F) -> Result<(), Error>
where
  F: FnMut(Chunk) -> Result<(), Error>,
{
  let mut state = State::new();
  let mut pixels = pixels
    .chunks_exact(channels.count())
    .map(Pixel::from_channels)
    .peekable();

  while let Some(pixel) = pixels.next() {
    if pixel == state.prev_pixel {
      let mut run = 1;

      while run < QOI_MAX_RUN && pixels.next_if_eq(&pixel).is_some() {
        run += 1;
      }

      emit(Chunk::Run(run))?;
    } else {
      emit(encode_pixel(&state, pixel))?;
    }

    state.advance(pixel);
  }

  Ok(())
}

// Picks the chunk for a pixel that differs from the previous one. The first
// of diff, luma, cache index, and literal that can hold the pixel wins.
fn encode_pixel(state: &State, pixel: Pixel) -> Chunk {
  match pixel.diff(&state.prev_pixel) {
    Some(PixelDiff::Small(dr, dg, db)) => return Chunk::Diff { dr, dg, db },
    Some(PixelDiff::Luma(dg, dr_dg, db_dg)) => return Chunk::Luma { dg, dr_dg, db_dg },
    None => {}
  }

  if let (Some(cached), index) = state.cache.lookup(pixel) {
    if cached == pixel {
      return Chunk::Index(index as u8);
    }
  }

  let Pixel { r, g, b, a } = pixel;

  if a == state.prev_pixel.a {
    Chunk::Rgb { r, g, b }
  } else {
    Chunk::Rgba { r, g, b, a }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::meta::{Colorspace, QOI_HEADER_LEN};

  fn rgb_meta(width: u32, height: u32) -> ImageMeta {
    ImageMeta::new(width, height, Channels::Rgb, Colorspace::Srgb)
  }

  #[test]
  fn test_encoding_rgb_chunk() {
    let state = State::new();
    let pixel = Pixel::rgb(101, 102, 103);

    assert_eq!(encode_pixel(&state, pixel), Chunk::Rgb { r: 101, g: 102, b: 103 });
  }

  #[test]
  fn test_encoding_rgba_chunk() {
    let state = State::new();
    let pixel = Pixel::new(101, 102, 103, 104);

    assert_eq!(encode_pixel(&state, pixel), Chunk::Rgba { r: 101, g: 102, b: 103, a: 104 });
  }

  #[test]
  fn test_encoding_index_chunk() {
    let mut state = State::new();
    let pixel = Pixel::new(101, 102, 103, 104);

    state.cache.store(pixel);

    // Chunk::Index(pixel.hash_index() = 54)
    assert_eq!(encode_pixel(&state, pixel), Chunk::Index(54));
  }

  #[test]
  fn test_encoding_diff_chunk() {
    let mut state = State::new();

    state.prev_pixel = Pixel::rgb(100, 100, 100);
    assert_eq!(
      encode_pixel(&state, Pixel::rgb(101, 101, 101)),
      Chunk::Diff { dr: 1, dg: 1, db: 1 }
    );

    state.prev_pixel = Pixel::rgb(101, 101, 101);
    assert_eq!(
      encode_pixel(&state, Pixel::rgb(99, 99, 99)),
      Chunk::Diff { dr: -2, dg: -2, db: -2 }
    );
  }

  #[test]
  fn test_encoding_luma_chunk() {
    let mut state = State::new();

    state.prev_pixel = Pixel::rgb(100, 100, 100);
    assert_eq!(
      encode_pixel(&state, Pixel::rgb(113, 110, 110)),
      Chunk::Luma { dg: 10, dr_dg: 3, db_dg: 0 }
    );
  }

  #[test]
  fn test_diff_takes_precedence_over_index() {
    let mut state = State::new();
    let pixel = Pixel::rgb(101, 100, 100);

    state.prev_pixel = Pixel::rgb(100, 100, 100);
    state.cache.store(pixel);

    assert_eq!(encode_pixel(&state, pixel), Chunk::Diff { dr: 1, dg: 0, db: 0 });
  }

  #[test]
  fn test_encoding_single_pixel_image() {
    let encoded = encode(&[10, 20, 30], &rgb_meta(1, 1)).expect("Failed to encode image");

    assert_eq!(
      encoded,
      vec![
        b'q', b'o', b'i', b'f', 0, 0, 0, 1, 0, 0, 0, 1, 3, 0,
        // Chunk::Rgb
        0xfe, 10, 20, 30,
        0, 0, 0, 0, 0, 0, 0, 1,
      ]
    );
  }

  #[test]
  fn test_encoding_trailing_run() {
    let source = [101, 102, 103, 101, 102, 103];
    let encoded = encode(&source, &rgb_meta(2, 1)).expect("Failed to encode image");

    let range_start = QOI_HEADER_LEN + 4; // Header length + Chunk::Rgb
    assert_eq!(&encoded[range_start..range_start + 1], &[0xc0]); // Chunk::Run(1)
    assert_eq!(encoded.len(), range_start + 1 + QOI_BYTES_END.len());
  }

  #[test]
  fn test_encoding_leading_black_as_run() {
    let chunks = encode_chunks(&[0; 9], &rgb_meta(3, 1)).expect("Failed to encode image");
    assert_eq!(chunks, vec![Chunk::Run(3)]);
  }

  #[test]
  fn test_encoding_max_run() {
    let chunks = encode_chunks(&[0; 130 * 3], &rgb_meta(130, 1)).expect("Failed to encode image");
    assert_eq!(chunks, vec![Chunk::Run(62), Chunk::Run(62), Chunk::Run(6)]);
  }

  #[test]
  fn test_run_is_flushed_before_index() {
    let a: [u8; 3] = [200, 10, 50];
    let b = [10, 200, 90];
    let source = [a, b, b, b, a].concat();

    let chunks = encode_chunks(&source, &rgb_meta(5, 1)).expect("Failed to encode image");

    assert_eq!(
      chunks,
      vec![
        Chunk::Rgb { r: 200, g: 10, b: 50 },
        Chunk::Rgb { r: 10, g: 200, b: 90 },
        Chunk::Run(2),
        Chunk::Index(Pixel::rgb(200, 10, 50).hash_index() as u8),
      ]
    );
  }

  #[test]
  fn test_encoding_rejects_mismatched_buffer() {
    assert!(matches!(
      encode(&[1, 2, 3, 4], &rgb_meta(1, 1)),
      Err(Error::PixelBufferLength { expected: 3, actual: 4 })
    ));
  }
}
