use crate::pixel::Pixel;

pub const QOI_CACHE_SIZE: usize = 64;

/// The 64 slot table of previously seen pixels shared by the encoder and
/// decoder. Each pixel maps to exactly one slot, see [`Pixel::hash_index`],
/// and storing a pixel overwrites whatever that slot held before.
#[derive(Clone, Debug)]
pub struct PixelCache {
  slots: [Option<Pixel>; QOI_CACHE_SIZE],
}

impl Default for PixelCache {
  fn default() -> Self {
    Self { slots: [None; QOI_CACHE_SIZE] }
  }
}

impl PixelCache {
  /// Creates a cache with every slot empty.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the current occupant of the slot `pixel` hashes to, along with
  /// that slot's index.
  pub fn lookup(&self, pixel: Pixel) -> (Option<Pixel>, usize) {
    let index = pixel.hash_index();
    (self.slots[index], index)
  }

  /// Stores `pixel` in the slot it hashes to and returns that slot's index.
  pub fn store(&mut self, pixel: Pixel) -> usize {
    let index = pixel.hash_index();
    self.slots[index] = Some(pixel);
    index
  }

  /// Returns the occupant of slot `index`, `None` for an empty or out of
  /// range slot.
  pub fn get(&self, index: usize) -> Option<Pixel> {
    self.slots.get(index).copied().flatten()
  }
}
