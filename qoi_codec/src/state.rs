use crate::cache::PixelCache;
use crate::pixel::Pixel;

// Stateful properties maintained during a single encoding or decoding pass.
// Created fresh for every image and never shared between passes.
pub struct State {
  // Previously seen pixels, indexed by their hash.
  pub cache: PixelCache,
  // The previously decoded/encoded pixel, opaque black before the first one.
  pub prev_pixel: Pixel,
}

impl State {
  pub fn new() -> Self {
    Self {
      cache: PixelCache::new(),
      prev_pixel: Pixel::default(),
    }
  }

  // Records `pixel` as the latest pixel of the pass. Every pixel goes through
  // here, whichever chunk carried it, so the encoder's and decoder's caches
  // stay identical.
  pub fn advance(&mut self, pixel: Pixel) {
    self.cache.store(pixel);
    self.prev_pixel = pixel;
  }
}
