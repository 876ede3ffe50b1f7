use core::{fmt, num::TryFromIntError};

/// The reasons that [`pad`](crate::pad) can decline to produce new bytes.
///
/// Every variant means the same thing to a caller: serve the original image
/// unmodified. The variants only exist so that the decision can be logged or
/// counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PadError {
  /// The bytes aren't a PNG we can frame: wrong signature, a truncated chunk,
  /// no header as the first chunk, or no image data at all.
  MalformedContainer,

  /// The PNG is one we deliberately don't rewrite: interlaced, indexed color,
  /// or a bit depth other than 8.
  UnsupportedVariant,

  /// The image data didn't inflate, or inflated to less data than the header
  /// says the image has.
  CompressionFailure,

  /// The image is already at least as tall as the target ratio asks for.
  AlreadyTall,

  /// Some dimension math overflowed, or the padded image would be larger
  /// than the configured output limit.
  DimensionsTooLarge,

  /// The allocator couldn't give us enough space.
  #[cfg(feature = "alloc")]
  Alloc,
}

/// Every [`PadError`] means "not applicable, use the original".
pub type NotApplicable = PadError;

impl PadError {
  /// Always `true`: no pad failure is ever shown to an end user.
  #[inline]
  #[must_use]
  pub const fn is_not_applicable(self) -> bool {
    true
  }
}

impl fmt::Display for PadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::MalformedContainer => "not a well formed PNG datastream",
      Self::UnsupportedVariant => "PNG variant not supported for padding",
      Self::CompressionFailure => "PNG image data failed to (de)compress",
      Self::AlreadyTall => "image already meets the target ratio",
      Self::DimensionsTooLarge => "padded image dimensions are too large",
      #[cfg(feature = "alloc")]
      Self::Alloc => "allocation failure",
    })
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PadError {}

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for PadError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for PadError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::DimensionsTooLarge
  }
}
