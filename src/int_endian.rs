//! Big-endian integers as they're laid out inside PNG data.

use bytemuck::{Pod, Zeroable};

/// A `u32` stored as big-endian bytes.
///
/// This stores only an array of bytes, so unlike a normal `u32` it has an
/// alignment of 1 and can sit at any offset of a `#[repr(C)]` byte struct.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct U32BE([u8; 4]);
impl U32BE {
  /// Convert this value to a native `u32`
  #[inline]
  #[must_use]
  pub const fn to_u32(self) -> u32 {
    u32::from_be_bytes(self.0)
  }
  /// Make a value from a native `u32`
  #[inline]
  #[must_use]
  pub const fn from_u32(u: u32) -> Self {
    Self(u.to_be_bytes())
  }
  /// Reads the first four bytes of a slice, if there are that many.
  #[inline]
  #[must_use]
  pub fn read(bytes: &[u8]) -> Option<Self> {
    match bytes {
      [a, b, c, d, ..] => Some(Self([*a, *b, *c, *d])),
      _ => None,
    }
  }
  /// The raw big-endian bytes.
  #[inline]
  #[must_use]
  pub const fn to_bytes(self) -> [u8; 4] {
    self.0
  }
}
impl core::fmt::Debug for U32BE {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("U32BE").field(&self.to_u32()).finish()
  }
}
impl From<u32> for U32BE {
  #[inline]
  fn from(value: u32) -> Self {
    Self::from_u32(value)
  }
}
impl From<U32BE> for u32 {
  #[inline]
  fn from(value: U32BE) -> Self {
    value.to_u32()
  }
}

#[test]
fn test_u32be_read() {
  assert_eq!(U32BE::read(&[0, 0, 1, 2, 99]), Some(U32BE::from_u32(258)));
  assert_eq!(U32BE::read(&[0, 0, 1]), None);
  assert_eq!(U32BE::from_u32(0xAABB_CCDD).to_bytes(), [0xAA, 0xBB, 0xCC, 0xDD]);
  assert_eq!(u32::from(U32BE::from(0x0102_0304_u32)), 0x0102_0304);
}
