use super::*;

use miniz_oxide::{
  deflate::compress_to_vec_zlib,
  inflate::{decompress_to_vec_zlib_with_limit, TINFLStatus},
};

/// Gets an iterator over all the `IDAT` slices in a chunk list.
///
/// PNG allows for more than one `IDAT` chunk within an image, and they should
/// be treated as one long Zlib stream.
pub fn idat_slices<'a>(chunks: &'a [PngChunk<'_>]) -> impl Iterator<Item = &'a [u8]> + 'a {
  chunks.iter().filter(|c| c.chunk_ty == ChunkType::IDAT).map(|c| &*c.data)
}

/// Joins all the `IDAT` data, in order, into one buffer.
///
/// Fails if there's no `IDAT` data at all.
pub fn concat_idat(chunks: &[PngChunk<'_>]) -> Result<Vec<u8>, PadError> {
  let total = idat_slices(chunks)
    .try_fold(0_usize, |acc, s| acc.checked_add(s.len()))
    .ok_or(PadError::DimensionsTooLarge)?;
  if total == 0 {
    return Err(PadError::MalformedContainer);
  }
  let mut out = Vec::new();
  out.try_reserve_exact(total)?;
  idat_slices(chunks).for_each(|s| out.extend_from_slice(s));
  Ok(out)
}

/// Decompresses a Zlib stream, producing at most `limit` bytes.
///
/// A stream holding more than `limit` bytes isn't an error, the output is
/// just cut off at the limit.
pub fn zlib_decompress(data: &[u8], limit: usize) -> Result<Vec<u8>, PadError> {
  match decompress_to_vec_zlib_with_limit(data, limit) {
    Ok(out) => Ok(out),
    Err(e) if e.status == TINFLStatus::HasMoreOutput => Ok(e.output),
    Err(e) => {
      log::debug!("zlib stream failed to inflate: {:?}", e.status);
      Err(PadError::CompressionFailure)
    }
  }
}

/// Compresses bytes into a Zlib stream.
///
/// Levels go from 0 (store) to 10 (slowest), higher values are clamped.
#[inline]
#[must_use]
pub fn zlib_compress(data: &[u8], level: u8) -> Vec<u8> {
  compress_to_vec_zlib(data, level.min(10))
}

/// Inflates all of the image data in a chunk list.
///
/// The output is exactly [`filtered_len`](IHDR::filtered_len) bytes. Streams
/// that inflate to less than that are an error, any excess past that is
/// dropped.
pub fn inflate_idat(ihdr: &IHDR, chunks: &[PngChunk<'_>]) -> Result<Vec<u8>, PadError> {
  let expected = ihdr.filtered_len()?;
  let zlib_data = concat_idat(chunks)?;
  let mut inflated = zlib_decompress(&zlib_data, expected)?;
  if inflated.len() < expected {
    log::debug!("image data inflated to {} bytes, expected {expected}", inflated.len());
    return Err(PadError::CompressionFailure);
  }
  inflated.truncate(expected);
  Ok(inflated)
}
