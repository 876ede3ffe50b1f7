//! Deciding how many rows to add, and what goes in them.

use core::{fmt, num::NonZeroU32, str::FromStr};

use crate::PadError;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A target aspect ratio, as `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
  pub width: NonZeroU32,
  pub height: NonZeroU32,
}
impl Ratio {
  /// 3:2
  pub const THREE_TWO: Self = Self::from_consts(3, 2);
  /// 4:3
  pub const FOUR_THREE: Self = Self::from_consts(4, 3);
  /// 16:9
  pub const SIXTEEN_NINE: Self = Self::from_consts(16, 9);

  /// The ratios a server is expected to accept from its users.
  ///
  /// The padding engine itself takes any ratio, this list is for the caller
  /// to check against first.
  pub const ALLOWED: [Self; 3] = [Self::THREE_TWO, Self::FOUR_THREE, Self::SIXTEEN_NINE];

  const fn from_consts(width: u32, height: u32) -> Self {
    match (NonZeroU32::new(width), NonZeroU32::new(height)) {
      (Some(width), Some(height)) => Self { width, height },
      _ => panic!("ratio constants must be non-zero"),
    }
  }

  /// Makes a ratio, `None` if either side is 0.
  #[inline]
  #[must_use]
  pub const fn new(width: u32, height: u32) -> Option<Self> {
    match (NonZeroU32::new(width), NonZeroU32::new(height)) {
      (Some(width), Some(height)) => Some(Self { width, height }),
      _ => None,
    }
  }

  /// The same ratio in lowest terms.
  #[must_use]
  pub const fn reduced(self) -> Self {
    let (mut x, mut y) = (self.width.get(), self.height.get());
    while y != 0 {
      let t = x % y;
      x = y;
      y = t;
    }
    // x is the gcd, and it can't be zero since both sides are non-zero
    Self::from_consts(self.width.get() / x, self.height.get() / x)
  }

  /// If this ratio (in lowest terms) is one of the [`ALLOWED`](Self::ALLOWED)
  /// ratios.
  #[must_use]
  pub fn is_allowed(self) -> bool {
    let r = self.reduced();
    Self::ALLOWED.contains(&r)
  }

  /// The height an image of `width` must have to meet this ratio, rounding
  /// up.
  #[inline]
  #[must_use]
  pub const fn target_height(self, width: u32) -> u64 {
    let num = width as u64 * self.height.get() as u64;
    let den = self.width.get() as u64;
    num.div_ceil(den)
  }
}
impl fmt::Display for Ratio {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.width, self.height)
  }
}
/// A string wasn't a `W:H` ratio with two non-zero sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseRatioError;
impl fmt::Display for ParseRatioError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("expected a ratio like `3:2`")
  }
}
#[cfg(feature = "std")]
impl std::error::Error for ParseRatioError {}

impl FromStr for Ratio {
  type Err = ParseRatioError;
  /// Parses `"W:H"`, such as `"3:2"`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (w, h) = s.trim().split_once(':').ok_or(ParseRatioError)?;
    let w: u32 = w.trim().parse().map_err(|_| ParseRatioError)?;
    let h: u32 = h.trim().parse().map_err(|_| ParseRatioError)?;
    Self::new(w, h).ok_or(ParseRatioError)
  }
}

/// What to put in the rows added above the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TopFill {
  /// Every byte is `0xFF`: white, and fully opaque when there's alpha.
  #[default]
  OpaqueWhite,
  /// White color channels, but alpha channels are `0x00`. Same as
  /// `OpaqueWhite` for images without alpha.
  TransparentWhite,
}

/// Settings for [`pad_with`](crate::pad_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadOptions {
  /// What goes in the rows above the image.
  pub top_fill: TopFill,
  /// Zlib level for the new image data, 0 through 10.
  pub compression_level: u8,
  /// Largest padded scanline buffer (filter bytes included) the engine will
  /// allocate.
  pub max_output_bytes: usize,
}
impl PadOptions {
  /// 256 MiB
  pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 256 * 1024 * 1024;
}
impl Default for PadOptions {
  #[inline]
  fn default() -> Self {
    Self {
      top_fill: TopFill::OpaqueWhite,
      compression_level: crate::png::DEFAULT_COMPRESSION_LEVEL,
      max_output_bytes: Self::DEFAULT_MAX_OUTPUT_BYTES,
    }
  }
}

/// How an image gets taller.
///
/// `top_rows` always gets the extra row when the split is uneven, so
/// `bottom_rows <= top_rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadPlan {
  pub target_height: u32,
  pub rows_to_add: u32,
  pub top_rows: u32,
  pub bottom_rows: u32,
}
impl PadPlan {
  /// Works out the padding for an image of the given size.
  ///
  /// ## Failure
  /// * `AlreadyTall` if `height` is already at least the target height.
  /// * `DimensionsTooLarge` if the target height doesn't fit in a `u32`.
  pub fn compute(width: u32, height: u32, ratio: Ratio) -> Result<Self, PadError> {
    let target_height = ratio.target_height(width);
    if u64::from(height) >= target_height {
      return Err(PadError::AlreadyTall);
    }
    let target_height = u32::try_from(target_height)?;
    let rows_to_add = target_height - height;
    let top_rows = rows_to_add - rows_to_add / 2;
    let bottom_rows = rows_to_add - top_rows;
    Ok(Self { target_height, rows_to_add, top_rows, bottom_rows })
  }

  /// Pads None-filtered scanlines.
  ///
  /// `scanlines` is whole lines of a filter byte then `top_row.len()` pixel
  /// bytes, every filter byte already None (as [`unfilter_in_place`] leaves
  /// them). The output is the top rows (all `top_row`), then the original
  /// lines, then the bottom rows, each a copy of the last original line, and
  /// it's ready to compress as is.
  ///
  /// [`unfilter_in_place`]: crate::png::unfilter_in_place
  #[cfg(feature = "alloc")]
  pub fn pad_scanlines(&self, scanlines: &[u8], top_row: &[u8]) -> Result<Vec<u8>, PadError> {
    let line_len = top_row.len().checked_add(1).ok_or(PadError::DimensionsTooLarge)?;
    if top_row.is_empty() || scanlines.len() % line_len != 0 {
      return Err(PadError::MalformedContainer);
    }
    let last_line = match scanlines.len().checked_sub(line_len) {
      Some(start) => &scanlines[start..],
      None => return Err(PadError::MalformedContainer),
    };
    let total = (self.target_height as usize)
      .checked_mul(line_len)
      .ok_or(PadError::DimensionsTooLarge)?;
    let mut out = Vec::new();
    out.try_reserve_exact(total)?;
    for _ in 0..self.top_rows {
      out.push(crate::png::FILTER_NONE);
      out.extend_from_slice(top_row);
    }
    out.extend_from_slice(scanlines);
    for _ in 0..self.bottom_rows {
      out.extend_from_slice(last_line);
    }
    Ok(out)
  }
}

/// Builds one line of top padding.
#[cfg(feature = "alloc")]
pub fn fill_row(
  width: u32, channels: usize, has_alpha: bool, fill: TopFill,
) -> Result<Vec<u8>, PadError> {
  let len = (width as usize).checked_mul(channels).ok_or(PadError::DimensionsTooLarge)?;
  let mut row = Vec::new();
  row.try_reserve_exact(len)?;
  row.resize(len, 0xFF);
  if fill == TopFill::TransparentWhite && has_alpha && channels > 0 {
    row.chunks_exact_mut(channels).for_each(|px| px[channels - 1] = 0);
  }
  Ok(row)
}

#[test]
fn test_plan_three_two() {
  let plan = PadPlan::compute(100, 50, Ratio::THREE_TWO).unwrap();
  assert_eq!(plan, PadPlan { target_height: 67, rows_to_add: 17, top_rows: 9, bottom_rows: 8 });
  assert_eq!(PadPlan::compute(100, 67, Ratio::THREE_TWO), Err(PadError::AlreadyTall));
  assert_eq!(PadPlan::compute(100, 68, Ratio::THREE_TWO), Err(PadError::AlreadyTall));
}

#[test]
fn test_plan_split_invariants() {
  for ratio in Ratio::ALLOWED {
    for width in 1..60 {
      for height in 1..60 {
        match PadPlan::compute(width, height, ratio) {
          Ok(plan) => {
            assert_eq!(u64::from(plan.target_height), ratio.target_height(width));
            assert_eq!(plan.top_rows + plan.bottom_rows, plan.target_height - height);
            assert!(plan.bottom_rows <= plan.top_rows);
            assert!(plan.top_rows - plan.bottom_rows <= 1);
          }
          Err(e) => {
            assert_eq!(e, PadError::AlreadyTall);
            assert!(u64::from(height) >= ratio.target_height(width));
          }
        }
      }
    }
  }
}

#[test]
fn test_ratio_parse_and_reduce() {
  assert_eq!("3:2".parse::<Ratio>(), Ok(Ratio::THREE_TWO));
  assert_eq!(" 16 : 9 ".parse::<Ratio>(), Ok(Ratio::SIXTEEN_NINE));
  assert!("3:0".parse::<Ratio>().is_err());
  assert!("3".parse::<Ratio>().is_err());
  assert!("a:b".parse::<Ratio>().is_err());
  assert_eq!(Ratio::new(6, 4).unwrap().reduced(), Ratio::THREE_TWO);
  assert!(Ratio::new(8, 6).unwrap().is_allowed());
  assert!(!Ratio::new(5, 4).unwrap().is_allowed());
  assert_eq!(Ratio::THREE_TWO.target_height(1), 1);
  assert_eq!(Ratio::FOUR_THREE.target_height(100), 75);
  assert_eq!(Ratio::SIXTEEN_NINE.target_height(u32::MAX), 2_415_919_104);
}

#[cfg(feature = "alloc")]
#[test]
fn test_pad_scanlines_and_fill_row() {
  let plan = PadPlan { target_height: 5, rows_to_add: 3, top_rows: 2, bottom_rows: 1 };
  let top = fill_row(2, 1, false, TopFill::OpaqueWhite).unwrap();
  let out = plan.pad_scanlines(&[0, 1, 2, 0, 3, 4], &top).unwrap();
  assert_eq!(out, [0, 255, 255, 0, 255, 255, 0, 1, 2, 0, 3, 4, 0, 3, 4]);

  assert_eq!(fill_row(2, 2, true, TopFill::OpaqueWhite).unwrap(), [255; 4]);
  assert_eq!(fill_row(2, 2, true, TopFill::TransparentWhite).unwrap(), [255, 0, 255, 0]);
  assert_eq!(fill_row(1, 3, false, TopFill::TransparentWhite).unwrap(), [255; 3]);
  assert_eq!(plan.pad_scanlines(&[], &top), Err(PadError::MalformedContainer));
  // a partial line
  assert_eq!(plan.pad_scanlines(&[0, 1, 2, 0], &top), Err(PadError::MalformedContainer));
  assert_eq!(plan.pad_scanlines(&[0, 1, 2], &[]), Err(PadError::MalformedContainer));
}
