//! Putting the chunk list back together around new image data.

use alloc::{borrow::Cow, vec::Vec};

use crate::{
  png::{ChunkType, PngChunk, IHDR},
  PadError,
};

/// Builds the chunk list for the padded image.
///
/// * The `IHDR` chunk is replaced with `ihdr` (which holds the new height).
/// * The first `IDAT` chunk is replaced with one chunk holding `new_idat`,
///   every later `IDAT` chunk is dropped since its data was already part of
///   the stream that got recompressed.
/// * Every other chunk is kept, unchanged and in its original order.
pub fn rebuild_chunks<'b>(
  chunks: &[PngChunk<'b>], ihdr: &IHDR, new_idat: Vec<u8>,
) -> Result<Vec<PngChunk<'b>>, PadError> {
  let mut out = Vec::new();
  out.try_reserve_exact(chunks.len())?;
  let mut new_idat = Some(new_idat);
  for chunk in chunks {
    match chunk.chunk_ty {
      ChunkType::IHDR => {
        out.push(PngChunk::owned(ChunkType::IHDR, ihdr.to_bytes().to_vec()));
      }
      ChunkType::IDAT => {
        if let Some(data) = new_idat.take() {
          out.push(PngChunk::owned(ChunkType::IDAT, data));
        }
      }
      _ => out.push(PngChunk { chunk_ty: chunk.chunk_ty, data: Cow::clone(&chunk.data) }),
    }
  }
  if new_idat.is_some() {
    // there was no IDAT to replace
    return Err(PadError::MalformedContainer);
  }
  Ok(out)
}

#[test]
fn test_rebuild_keeps_order_and_merges_idat() {
  use crate::png::PngColorType;
  let ihdr = IHDR {
    width: 1,
    height: 9,
    bit_depth: 8,
    color_type: PngColorType::Y,
    is_interlaced: false,
  };
  let chunks = [
    PngChunk::from_borrowed(ChunkType::IHDR, &[0; 13]),
    PngChunk::from_borrowed(ChunkType::tEXt, b"a\0b"),
    PngChunk::from_borrowed(ChunkType::IDAT, &[1]),
    PngChunk::from_borrowed(ChunkType::IDAT, &[2]),
    PngChunk::from_borrowed(ChunkType(*b"zzZz"), &[3]),
    PngChunk::from_borrowed(ChunkType::IEND, &[]),
  ];
  let out = rebuild_chunks(&chunks, &ihdr, alloc::vec![7, 7]).unwrap();
  let types: Vec<ChunkType> = out.iter().map(|c| c.chunk_ty).collect();
  assert_eq!(
    types,
    [ChunkType::IHDR, ChunkType::tEXt, ChunkType::IDAT, ChunkType(*b"zzZz"), ChunkType::IEND]
  );
  assert_eq!(&*out[0].data, &ihdr.to_bytes()[..]);
  assert_eq!(&*out[1].data, b"a\0b");
  assert_eq!(&*out[2].data, &[7, 7]);

  let no_idat = [PngChunk::from_borrowed(ChunkType::IHDR, &[0; 13])];
  assert_eq!(rebuild_chunks(&no_idat, &ihdr, Vec::new()), Err(PadError::MalformedContainer));
}
