//! The CRC-32 used by PNG chunks (reflected, polynomial `0xEDB88320`).

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

/// Feeds more bytes into a running (not yet complemented) CRC value.
#[inline]
#[must_use]
pub fn update_crc(mut crc: u32, iter: impl IntoIterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the CRC of some bytes.
#[inline]
#[must_use]
pub fn crc32(bytes: &[u8]) -> u32 {
  update_crc(u32::MAX, bytes.iter().copied()) ^ u32::MAX
}

/// Computes the CRC of a PNG chunk, which covers the type tag and the data
/// (but not the length).
#[inline]
#[must_use]
pub fn png_chunk_crc(chunk_ty: [u8; 4], data: &[u8]) -> u32 {
  update_crc(u32::MAX, chunk_ty.into_iter().chain(data.iter().copied())) ^ u32::MAX
}

#[test]
fn test_crc32_check_value() {
  // the standard check value for this polynomial
  assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
  assert_eq!(crc32(b""), 0);
}

#[test]
fn test_png_chunk_crc() {
  // every valid PNG ends with this exact chunk
  assert_eq!(png_chunk_crc(*b"IEND", &[]), 0xAE42_6082);
  assert_eq!(png_chunk_crc(*b"IEND", &[]), crc32(b"IEND"));
}
