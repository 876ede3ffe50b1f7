use super::*;

/// The filter type byte values that PNG defines.
pub const FILTER_NONE: u8 = 0;
pub const FILTER_SUB: u8 = 1;
pub const FILTER_UP: u8 = 2;
pub const FILTER_AVERAGE: u8 = 3;
pub const FILTER_PAETH: u8 = 4;

#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: the order of these tests is fixed by the PNG spec, don't reorder
  // them.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses one line's filter, in place.
///
/// * `prev` is the already unfiltered line above, or an empty slice for the
///   first line of the image (all of its bytes count as 0).
/// * Unknown filter types leave the line untouched.
fn unfilter_line(filter: u8, bytes_per_pixel: usize, line: &mut [u8], prev: &[u8]) {
  let up = |i: usize| prev.get(i).copied().unwrap_or(0);
  match filter {
    FILTER_SUB => {
      for i in bytes_per_pixel..line.len() {
        line[i] = line[i].wrapping_add(line[i - bytes_per_pixel]);
      }
    }
    FILTER_UP => {
      line.iter_mut().zip(prev.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
    }
    FILTER_AVERAGE => {
      for i in 0..line.len() {
        let a = if i >= bytes_per_pixel { line[i - bytes_per_pixel] } else { 0 };
        let b = up(i);
        line[i] = line[i].wrapping_add(((a as u16 + b as u16) >> 1) as u8);
      }
    }
    FILTER_PAETH => {
      for i in 0..line.len() {
        let (a, c) = if i >= bytes_per_pixel {
          (line[i - bytes_per_pixel], up(i - bytes_per_pixel))
        } else {
          (0, 0)
        };
        line[i] = line[i].wrapping_add(paeth_predict(a, up(i), c));
      }
    }
    _ => (),
  }
}

/// Unfilters decompressed PNG data in place.
///
/// The buffer is split into lines of `bytes_per_filterline` bytes (a filter
/// byte then the pixel bytes). Lines are processed strictly top to bottom
/// since each one can depend on the line above. Afterwards every filter byte
/// is reset to "None", so the buffer is also a valid None-filtered encoding
/// of the same pixels.
///
/// Any partial line at the end of the buffer is left alone.
pub fn unfilter_in_place(
  bytes_per_pixel: usize, bytes_per_filterline: usize, filtered: &mut [u8],
) -> Result<(), PadError> {
  if bytes_per_pixel == 0 || bytes_per_filterline < 2 {
    return Err(PadError::MalformedContainer);
  }
  let mut prev: &[u8] = &[];
  for line in filtered.chunks_exact_mut(bytes_per_filterline) {
    let (f, pixels) = line.split_at_mut(1);
    unfilter_line(f[0], bytes_per_pixel, pixels, prev);
    f[0] = FILTER_NONE;
    prev = pixels;
  }
  Ok(())
}

/// Unfilters decompressed image data and returns just the pixel bytes, one
/// line of `width * bytes_per_pixel` after another.
#[cfg(feature = "alloc")]
pub fn unfilter_to_pixels(ihdr: &IHDR, filtered: &mut [u8]) -> Result<Vec<u8>, PadError> {
  let bytes_per_filterline = ihdr.bytes_per_filterline()?;
  if filtered.len() < ihdr.filtered_len()? {
    return Err(PadError::CompressionFailure);
  }
  unfilter_in_place(ihdr.bytes_per_pixel(), bytes_per_filterline, filtered)?;
  let mut pixels = Vec::new();
  pixels.try_reserve_exact(ihdr.bytes_per_row()?.saturating_mul(ihdr.height as usize))?;
  filtered
    .chunks_exact(bytes_per_filterline)
    .take(ihdr.height as usize)
    .for_each(|line| pixels.extend_from_slice(&line[1..]));
  Ok(pixels)
}

/// Encodes pixel lines with the "None" filter on every line.
///
/// This is always correct and fully deterministic, at the cost of a little
/// compression. A trailing partial line is dropped.
#[cfg(feature = "alloc")]
pub fn encode_none_filter(pixels: &[u8], bytes_per_row: usize) -> Result<Vec<u8>, PadError> {
  if bytes_per_row == 0 {
    return Err(PadError::MalformedContainer);
  }
  let lines = pixels.len() / bytes_per_row;
  let total = lines
    .checked_mul(bytes_per_row + 1)
    .ok_or(PadError::DimensionsTooLarge)?;
  let mut out = Vec::new();
  out.try_reserve_exact(total)?;
  for line in pixels.chunks_exact(bytes_per_row) {
    out.push(FILTER_NONE);
    out.extend_from_slice(line);
  }
  Ok(out)
}

#[test]
fn test_paeth_predict() {
  assert_eq!(paeth_predict(0, 0, 0), 0);
  // p = a + b - c, closest wins, ties go a then b
  assert_eq!(paeth_predict(10, 20, 10), 20);
  assert_eq!(paeth_predict(20, 10, 10), 20);
  assert_eq!(paeth_predict(10, 10, 10), 10);
  assert_eq!(paeth_predict(100, 50, 200), 50);
  assert_eq!(paeth_predict(255, 255, 0), 255);
}

#[test]
fn test_unfilter_each_type() {
  // 2 lines of 2 pixels, 1 byte per pixel
  let mut buf = [
    FILTER_NONE, 10, 20, //
    FILTER_SUB, 5, 5, //
  ];
  unfilter_in_place(1, 3, &mut buf).unwrap();
  assert_eq!(buf, [0, 10, 20, 0, 5, 10]);

  let mut buf = [
    FILTER_NONE, 10, 20, //
    FILTER_UP, 1, 255, //
  ];
  unfilter_in_place(1, 3, &mut buf).unwrap();
  assert_eq!(buf, [0, 10, 20, 0, 11, 19]);

  let mut buf = [
    FILTER_NONE, 10, 20, //
    FILTER_AVERAGE, 1, 1, //
  ];
  unfilter_in_place(1, 3, &mut buf).unwrap();
  // (0 + 10) >> 1 = 5, then (6 + 20) >> 1 = 13
  assert_eq!(buf, [0, 10, 20, 0, 6, 14]);

  let mut buf = [
    FILTER_NONE, 10, 20, //
    FILTER_PAETH, 1, 1, //
  ];
  unfilter_in_place(1, 3, &mut buf).unwrap();
  // paeth(0, 10, 0) = 10, then paeth(11, 20, 10) = 20
  assert_eq!(buf, [0, 10, 20, 0, 11, 21]);
}

#[test]
fn test_unfilter_first_line_uses_zero_above() {
  let mut buf = [FILTER_UP, 7, 8, 9, 10];
  unfilter_in_place(2, 5, &mut buf).unwrap();
  assert_eq!(buf, [0, 7, 8, 9, 10]);

  let mut buf = [FILTER_AVERAGE, 8, 8, 8, 8];
  unfilter_in_place(2, 5, &mut buf).unwrap();
  assert_eq!(buf, [0, 8, 8, 12, 12]);
}

#[test]
fn test_unfilter_unknown_type_passes_through() {
  let mut buf = [5, 1, 2, 3];
  unfilter_in_place(1, 4, &mut buf).unwrap();
  assert_eq!(buf, [0, 1, 2, 3]);
}
