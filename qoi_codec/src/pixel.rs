// An enumeration of the possible pixel "diffs" against the previous pixel.
// Values are the signed differences, biases are applied by the chunk codec.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelDiff {
  // Every channel difference is within -2..=1, a `QOI_OP_DIFF`.
  Small(i8, i8, i8),
  // Green difference within -32..=31 and the red and blue differences, relative
  // to the green difference, within -8..=7, a `QOI_OP_LUMA`.
  Luma(i8, i8, i8),
}

/// A single RGBA pixel. Three channel images are represented with an opaque
/// alpha channel.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Pixel {
  /// Red channel value.
  pub r: u8,
  /// Green channel value.
  pub g: u8,
  /// Blue channel value.
  pub b: u8,
  /// Alpha channel value.
  pub a: u8,
}

impl Default for Pixel {
  fn default() -> Self {
    Self { r: 0, g: 0, b: 0, a: 255 }
  }
}

impl Pixel {
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 255 }
  }

  // Reads a pixel out of a 3 or 4 byte slice of raw channel values.
  pub(crate) fn from_channels(channels: &[u8]) -> Self {
    Self {
      r: channels[0],
      g: channels[1],
      b: channels[2],
      a: channels.get(3).copied().unwrap_or(255),
    }
  }

  // Attempts to produce a `PixelDiff` against the provided `prev` pixel.
  // Returns `None` when the alpha channel changed or the difference is too
  // large for either diff chunk. Channel differences wrap around.
  pub(crate) fn diff(&self, prev: &Pixel) -> Option<PixelDiff> {
    if self.a != prev.a {
      return None;
    }

    let diff_r = self.r.wrapping_sub(prev.r) as i8;
    let diff_g = self.g.wrapping_sub(prev.g) as i8;
    let diff_b = self.b.wrapping_sub(prev.b) as i8;

    let small = -2..=1;

    if small.contains(&diff_r) && small.contains(&diff_g) && small.contains(&diff_b) {
      return Some(PixelDiff::Small(diff_r, diff_g, diff_b));
    }

    if !(-32..=31).contains(&diff_g) {
      return None;
    }

    let luma_rg = i16::from(diff_r) - i16::from(diff_g);
    let luma_bg = i16::from(diff_b) - i16::from(diff_g);
    let luma = -8..=7;

    if luma.contains(&luma_rg) && luma.contains(&luma_bg) {
      return Some(PixelDiff::Luma(diff_g, luma_rg as i8, luma_bg as i8));
    }

    None
  }

  // Recreates a `Pixel` from the provided `diff` against `prev`. Channel
  // arithmetic wraps modulo 256.
  pub(crate) fn from_diff(diff: PixelDiff, prev: &Pixel) -> Self {
    let (diff_r, diff_g, diff_b) = match diff {
      PixelDiff::Small(diff_r, diff_g, diff_b) => (diff_r, diff_g, diff_b),
      PixelDiff::Luma(diff_g, luma_rg, luma_bg) => (
        luma_rg.wrapping_add(diff_g),
        diff_g,
        luma_bg.wrapping_add(diff_g),
      ),
    };

    Self {
      r: prev.r.wrapping_add(diff_r as u8),
      g: prev.g.wrapping_add(diff_g as u8),
      b: prev.b.wrapping_add(diff_b as u8),
      a: prev.a,
    }
  }

  /// The slot this pixel occupies in the 64 entry pixel cache,
  /// `(r * 3 + g * 5 + b * 7 + a * 11) % 64`.
  pub fn hash_index(&self) -> usize {
    let r = usize::from(self.r);
    let g = usize::from(self.g);
    let b = usize::from(self.b);
    let a = usize::from(self.a);

    (r * 3 + g * 5 + b * 7 + a * 11) % 64
  }
}
