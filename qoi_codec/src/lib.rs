//! This crate implements a lossless encoder and decoder for the
//! [QOI image format](https://qoiformat.org).
//!
//! An encoded image is a 14 byte header, followed by a stream of chunks, and
//! terminated by a fixed 8 byte end marker. Each chunk describes one pixel,
//! or a run of pixels, relative to the previously seen pixels: as a small or
//! larger difference from the previous pixel, a reference into a 64 slot
//! cache of recently seen pixels, a repeat of the previous pixel, or as
//! literal channel values.
//!
//! The primary exports are the `encode` and `decode` functions that work on
//! in-memory buffers, and the `encode_image` and `decode_image` functions
//! that accept any `std::io::Read` source and `std::io::Write` destination.
//!
//! To keep this crate simple, it does not support decoding other image
//! formats. To encode an image, it will first need to be decoded into raw
//! RGB or RGBA pixel data using another method.
//!
//! # In-memory example
//!
//! ```rust
//! use qoi_codec::{decode, encode, Channels, Colorspace, ImageMeta};
//!
//! // A 2x1 image made up of a red and a slightly darker red pixel.
//! let pixels = vec![200, 0, 0, 199, 0, 0];
//! let meta = ImageMeta::new(2, 1, Channels::Rgb, Colorspace::Srgb);
//!
//! let encoded = encode(&pixels, &meta).expect("Failed to encode image");
//! let (decoded_meta, decoded) = decode(&encoded).expect("Failed to decode image");
//!
//! assert_eq!(decoded_meta, meta);
//! assert_eq!(decoded, pixels);
//! ```
//!
//! # Streaming example
//!
//! ```rust
//! use std::io::{BufWriter, sink};
//! use qoi_codec::{decode_image, encode_image, Channels, Colorspace, ImageMeta};
//!
//! // A 1x1 representation of an image's pixel data made up of an opaque black pixel.
//! let image_source: [u8; 4] = [0, 0, 0, 255];
//! let meta = ImageMeta::new(1, 1, Channels::Rgba, Colorspace::Srgb);
//!
//! let mut encoded = Vec::new();
//! encode_image(image_source.as_slice(), &mut encoded, &meta).expect("Failed to encode image");
//!
//! // For example purposes, write decoded bytes into the void.
//! let writer = BufWriter::new(sink());
//!
//! match decode_image(encoded.as_slice(), writer) {
//!   Ok(image_meta) => {
//!     assert_eq!(image_meta, meta);
//!   }
//!   Err(e) => {
//!     // See `error.rs` for all possible errors.
//!     panic!("{}", e);
//!   }
//! }
//! ```

pub use crate::cache::PixelCache;
pub use crate::chunk::Chunk;
pub use crate::decode::{decode, decode_header, decode_image, decode_with_options};
pub use crate::encode::{encode, encode_chunks, encode_image};
pub use crate::error::{Error, ErrorKind};
pub use crate::meta::{Channels, Colorspace, ImageMeta};
pub use crate::options::DecodeOptions;
pub use crate::pixel::Pixel;

pub mod bits;
mod cache;
mod chunk;
mod decode;
mod encode;
mod error;
mod meta;
mod options;
mod pixel;
mod state;
