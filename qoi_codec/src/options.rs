/// Options that restrict what the decoder accepts.
///
/// Modify them with the builder style `set_*` methods:
///
/// ```rust
/// use qoi_codec::DecodeOptions;
///
/// // Only decode images up to 1024x1024, and accept unknown colorspaces.
/// let options = DecodeOptions::default()
///   .set_max_width(1024)
///   .set_max_height(1024)
///   .set_strict_mode(false);
///
/// assert_eq!(options.max_width(), 1024);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeOptions {
  max_width: u32,
  max_height: u32,
  strict: bool,
}

impl Default for DecodeOptions {
  fn default() -> Self {
    Self {
      max_width: u32::MAX,
      max_height: u32::MAX,
      strict: true,
    }
  }
}

impl DecodeOptions {
  /// Maximum width the decoder accepts before allocating any pixel memory.
  ///
  /// - Default value: `u32::MAX`, no limit
  pub fn max_width(&self) -> u32 {
    self.max_width
  }

  /// Maximum height the decoder accepts before allocating any pixel memory.
  ///
  /// - Default value: `u32::MAX`, no limit
  pub fn max_height(&self) -> u32 {
    self.max_height
  }

  /// Whether the decoder rejects header values the format doesn't define.
  /// When disabled, an unknown colorspace byte is logged and treated as sRGB.
  ///
  /// - Default value: true
  pub fn strict_mode(&self) -> bool {
    self.strict
  }

  /// Sets the maximum accepted width, see [`DecodeOptions::max_width`].
  pub fn set_max_width(mut self, width: u32) -> Self {
    self.max_width = width;
    self
  }

  /// Sets the maximum accepted height.
  pub fn set_max_height(mut self, height: u32) -> Self {
    self.max_height = height;
    self
  }

  pub fn set_strict_mode(mut self, strict: bool) -> Self {
    self.strict = strict;
    self
  }
}
