use std::io;

use pretty_assertions::assert_eq;
use qoi_codec::{
  decode, decode_header, decode_image, encode, Channels, Colorspace, Error, ErrorKind, ImageMeta,
};

// Covers literals, runs, diffs and a cache index. The final chunk is a diff.
fn sample_image() -> (ImageMeta, Vec<u8>) {
  let meta = ImageMeta::new(4, 2, Channels::Rgb, Colorspace::Linear);
  let pixels = vec![
    12, 200, 37, 12, 200, 37, 13, 199, 37, 120, 30, 45,
    12, 200, 37, 90, 14, 250, 90, 14, 250, 91, 14, 250,
  ];

  (meta, pixels)
}

#[test]
fn test_decoding_blank_image() {
  let meta = ImageMeta::new(0, 0, Channels::Rgb, Colorspace::Linear);
  let source = encode(&[], &meta).expect("Failed to encode image");
  let mut dest = Vec::new();

  let decoded_meta = decode_image(source.as_slice(), &mut dest).expect("Failed to decode image");

  assert_eq!(dest.len(), 0);
  assert_eq!(decoded_meta, meta);
}

#[test]
fn test_decoding_sample_image() {
  let (meta, pixels) = sample_image();
  let source = encode(&pixels, &meta).expect("Failed to encode image");

  assert_eq!(decode_header(&source).expect("Failed to decode header"), meta);
  assert_eq!(decode(&source).expect("Failed to decode image"), (meta, pixels));
}

#[test]
fn test_decoding_without_terminator() {
  let (meta, pixels) = sample_image();
  let mut source = encode(&pixels, &meta).expect("Failed to encode image");

  source.truncate(source.len() - 8);

  let err = decode(&source).expect_err("Expected decoding to fail");
  assert_eq!(err.kind(), ErrorKind::Corruption);
  assert!(matches!(err, Error::MissingTerminator));
}

#[test]
fn test_decoding_incomplete_image() {
  let (meta, pixels) = sample_image();
  let source = encode(&pixels, &meta).expect("Failed to encode image");

  // Drop the final chunk but keep the end marker.
  let mut truncated = source[..source.len() - 9].to_vec();
  truncated.extend_from_slice(&source[source.len() - 8..]);

  let err = decode(&truncated).expect_err("Expected decoding to fail");
  assert_eq!(err.kind(), ErrorKind::Corruption);
  assert!(err.offset().is_some());
}

#[test]
fn test_decoding_invalid_magic() {
  let (meta, pixels) = sample_image();
  let mut source = encode(&pixels, &meta).expect("Failed to encode image");

  source[0] = b'x';

  let err = decode(&source).expect_err("Expected decoding to fail");
  assert_eq!(err.kind(), ErrorKind::Corruption);
  assert_eq!(err.offset(), Some(0));
}

#[test]
fn test_decoding_rgba_image_into_writer() {
  let meta = ImageMeta::new(2, 2, Channels::Rgba, Colorspace::Srgb);
  let pixels = vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 255, 0, 0, 0, 0];
  let source = encode(&pixels, &meta).expect("Failed to encode image");
  let mut dest = Vec::new();

  let decoded_meta = decode_image(&mut source.as_slice(), &mut dest).expect("Failed to decode image");

  assert_eq!(decoded_meta, meta);
  assert_eq!(dest, pixels);
}

#[test]
fn test_decoding_index_into_unwritten_slot() {
  // A fully transparent first pixel, written as a reference to cache slot 0
  // before anything was stored there.
  let mut source = Vec::new();
  source.extend_from_slice(b"qoif");
  source.extend_from_slice(&1u32.to_be_bytes());
  source.extend_from_slice(&1u32.to_be_bytes());
  source.extend_from_slice(&[4, 0]);
  source.push(0x00);
  source.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);

  let (meta, pixels) = decode(&source).expect("Failed to decode image");

  assert_eq!(meta, ImageMeta::new(1, 1, Channels::Rgba, Colorspace::Srgb));
  assert_eq!(pixels, vec![0, 0, 0, 0]);
}

struct FailingReader;

impl io::Read for FailingReader {
  fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
    Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
  }
}

#[test]
fn test_decoding_from_failing_reader() {
  let err = decode_image(FailingReader, io::sink()).expect_err("Expected decoding to fail");

  assert_eq!(err.kind(), ErrorKind::Io);
  assert!(matches!(err, Error::Io(_)));
}
