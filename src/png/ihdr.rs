use super::*;

/// The 13 data bytes of an `IHDR` chunk, exactly as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct IhdrBytes {
  width: U32BE,
  height: U32BE,
  bit_depth: u8,
  color_type: u8,
  compression_method: u8,
  filter_method: u8,
  interlace_method: u8,
}

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }
  /// If the last channel of each pixel is alpha.
  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::YA | Self::RGBA)
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PadError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PadError::UnsupportedVariant),
    })
  }
}

/// Image Header
///
/// Parsing only checks that the bytes are shaped like a header. Use
/// [`check_supported`](Self::check_supported) to see if the image is
/// something the padding engine will rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced.
  pub is_interlaced: bool,
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PadError;
  /// Fails with `MalformedContainer` if the data isn't exactly 13 bytes, and
  /// with `UnsupportedVariant` if any of the enumerated fields hold a value
  /// PNG doesn't define.
  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    let raw: &IhdrBytes =
      bytemuck::try_from_bytes(data).map_err(|_| PadError::MalformedContainer)?;
    if raw.compression_method != 0 || raw.filter_method != 0 {
      return Err(PadError::UnsupportedVariant);
    }
    Ok(Self {
      width: raw.width.to_u32(),
      height: raw.height.to_u32(),
      bit_depth: raw.bit_depth,
      color_type: PngColorType::try_from(raw.color_type)?,
      is_interlaced: match raw.interlace_method {
        0 => false,
        1 => true,
        _ => return Err(PadError::UnsupportedVariant),
      },
    })
  }
}
impl IHDR {
  /// Encodes the header back into its 13 data bytes.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let raw = IhdrBytes {
      width: U32BE::from_u32(self.width),
      height: U32BE::from_u32(self.height),
      bit_depth: self.bit_depth,
      color_type: self.color_type as u8,
      compression_method: 0,
      filter_method: 0,
      interlace_method: self.is_interlaced as u8,
    };
    let mut out = [0_u8; 13];
    out.copy_from_slice(bytemuck::bytes_of(&raw));
    out
  }

  /// The same header with a different height.
  #[inline]
  #[must_use]
  pub const fn with_height(self, height: u32) -> Self {
    Self { height, ..self }
  }

  /// Checks that this is an image the padding engine can rewrite.
  ///
  /// That means non-interlaced, 8 bits per channel, not indexed color, and
  /// non-zero width and height.
  pub fn check_supported(&self) -> Result<(), PadError> {
    if self.is_interlaced || self.bit_depth != 8 || self.color_type == PngColorType::Index {
      return Err(PadError::UnsupportedVariant);
    }
    if self.width == 0 || self.height == 0 {
      return Err(PadError::MalformedContainer);
    }
    Ok(())
  }

  /// Bytes per complete pixel, assuming the 8-bit depth the padding engine
  /// supports.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    self.color_type.channel_count()
  }

  /// Bytes of pixel data in one line, not counting the filter byte.
  #[inline]
  pub fn bytes_per_row(&self) -> Result<usize, PadError> {
    (self.width as usize).checked_mul(self.bytes_per_pixel()).ok_or(PadError::DimensionsTooLarge)
  }

  /// Bytes in one filtered line: the filter byte then the pixel data.
  #[inline]
  pub fn bytes_per_filterline(&self) -> Result<usize, PadError> {
    self.bytes_per_row()?.checked_add(1).ok_or(PadError::DimensionsTooLarge)
  }

  /// Size of the whole image once it's been decompressed (but not yet
  /// unfiltered).
  #[inline]
  pub fn filtered_len(&self) -> Result<usize, PadError> {
    self
      .bytes_per_filterline()?
      .checked_mul(self.height as usize)
      .ok_or(PadError::DimensionsTooLarge)
  }
}

/// Gets the [IHDR] out of the PNG bytes.
///
/// The header must be the very first chunk.
pub fn png_get_header(bytes: &[u8]) -> Result<IHDR, PadError> {
  if !is_png_header_correct(bytes) {
    return Err(PadError::MalformedContainer);
  }
  match PngRawChunkIter::new(bytes).next() {
    Some(raw) if raw.chunk_ty == ChunkType::IHDR => IHDR::try_from(raw.data),
    _ => Err(PadError::MalformedContainer),
  }
}

#[test]
fn test_ihdr_round_trip_bytes() {
  let data = [0, 0, 0, 100, 0, 0, 0, 50, 8, 2, 0, 0, 0];
  let ihdr = IHDR::try_from(&data[..]).unwrap();
  assert_eq!(ihdr.width, 100);
  assert_eq!(ihdr.height, 50);
  assert_eq!(ihdr.color_type, PngColorType::RGB);
  assert!(!ihdr.is_interlaced);
  assert_eq!(ihdr.to_bytes(), data);
  assert_eq!(ihdr.with_height(67).to_bytes()[4..8], [0, 0, 0, 67]);
}

#[test]
fn test_ihdr_rejects() {
  // short
  assert_eq!(IHDR::try_from(&[0_u8; 12][..]), Err(PadError::MalformedContainer));
  // bad color type
  let data = [0, 0, 0, 1, 0, 0, 0, 1, 8, 5, 0, 0, 0];
  assert_eq!(IHDR::try_from(&data[..]), Err(PadError::UnsupportedVariant));
  // bad interlace method
  let data = [0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 2];
  assert_eq!(IHDR::try_from(&data[..]), Err(PadError::UnsupportedVariant));
}

#[test]
fn test_ihdr_check_supported() {
  let base = IHDR {
    width: 4,
    height: 4,
    bit_depth: 8,
    color_type: PngColorType::RGBA,
    is_interlaced: false,
  };
  assert_eq!(base.check_supported(), Ok(()));
  assert_eq!(
    IHDR { is_interlaced: true, ..base }.check_supported(),
    Err(PadError::UnsupportedVariant)
  );
  assert_eq!(IHDR { bit_depth: 16, ..base }.check_supported(), Err(PadError::UnsupportedVariant));
  assert_eq!(
    IHDR { color_type: PngColorType::Index, ..base }.check_supported(),
    Err(PadError::UnsupportedVariant)
  );
  assert_eq!(IHDR { width: 0, ..base }.check_supported(), Err(PadError::MalformedContainer));
  assert_eq!(base.bytes_per_filterline(), Ok(17));
  assert_eq!(base.filtered_len(), Ok(68));
}
