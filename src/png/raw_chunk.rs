use super::*;

/// The four byte type tag of a PNG chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tEXt: Self = Self(*b"tEXt");
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG, borrowing from the source bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub chunk_ty: ChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl PngRawChunk<'_> {
  /// The CRC that this chunk *should* have.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_chunk_crc(self.chunk_ty.0, self.data)
  }
  /// If the declared CRC matches the chunk's content.
  ///
  /// Decoding never checks this on its own.
  #[inline]
  #[must_use]
  pub fn crc_matches(&self) -> bool {
    self.actual_crc() == self.declared_crc
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Stops at the first chunk that doesn't fully fit in the remaining bytes,
/// leaving those bytes in place so that [`remaining`](Self::remaining) can
/// report them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkIter<'b>(&'b [u8]);
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  ///
  /// The signature isn't checked, use [`is_png_header_correct`] for that.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
  /// Bytes not yet turned into chunks.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.0
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = PngRawChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let chunk_len = U32BE::read(self.0)?.to_u32() as usize;
    let rest = self.0.get(4..)?;
    let chunk_ty = ChunkType(U32BE::read(rest)?.to_bytes());
    let rest = rest.get(4..)?;
    if rest.len() < chunk_len {
      return None;
    }
    let (data, rest) = rest.split_at(chunk_len);
    let declared_crc = U32BE::read(rest)?.to_u32();
    self.0 = &rest[4..];
    Some(PngRawChunk { chunk_ty, data, declared_crc })
  }
}

/// A chunk that can either borrow its data from the source bytes or own
/// freshly built data.
#[cfg(feature = "alloc")]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PngChunk<'b> {
  pub chunk_ty: ChunkType,
  pub data: Cow<'b, [u8]>,
}
#[cfg(feature = "alloc")]
impl Debug for PngChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngChunk")
      .field("chunk_ty", &self.chunk_ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .finish()
  }
}
#[cfg(feature = "alloc")]
impl<'b> From<PngRawChunk<'b>> for PngChunk<'b> {
  #[inline]
  fn from(raw: PngRawChunk<'b>) -> Self {
    Self { chunk_ty: raw.chunk_ty, data: Cow::Borrowed(raw.data) }
  }
}
#[cfg(feature = "alloc")]
impl<'b> PngChunk<'b> {
  /// Makes a chunk that owns its data.
  #[inline]
  #[must_use]
  pub fn owned(chunk_ty: ChunkType, data: Vec<u8>) -> Self {
    Self { chunk_ty, data: Cow::Owned(data) }
  }
  /// Makes a chunk that borrows its data.
  #[inline]
  #[must_use]
  pub const fn from_borrowed(chunk_ty: ChunkType, data: &'b [u8]) -> Self {
    Self { chunk_ty, data: Cow::Borrowed(data) }
  }
  /// The CRC this chunk gets when encoded.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_chunk_crc(self.chunk_ty.0, &self.data)
  }
  /// Bytes this chunk takes up once encoded: length, type, data, and CRC.
  #[inline]
  #[must_use]
  pub fn encoded_len(&self) -> usize {
    self.data.len().saturating_add(12)
  }
}

/// Splits PNG bytes into an ordered list of chunks.
///
/// * The 8 byte signature must be correct.
/// * Decoding stops after the `IEND` chunk, any trailing bytes after it are
///   ignored.
/// * Running out of bytes partway through a chunk (before `IEND` was seen) is
///   an error. Running out of bytes exactly on a chunk boundary is accepted,
///   the list just won't end with `IEND`.
/// * Declared CRC values are not checked.
#[cfg(feature = "alloc")]
pub fn decode_chunks(bytes: &[u8]) -> Result<Vec<PngChunk<'_>>, PadError> {
  if !is_png_header_correct(bytes) {
    return Err(PadError::MalformedContainer);
  }
  let mut it = PngRawChunkIter::new(bytes);
  let mut out = Vec::new();
  for raw in it.by_ref() {
    let is_end = raw.chunk_ty == ChunkType::IEND;
    out.try_reserve(1)?;
    out.push(PngChunk::from(raw));
    if is_end {
      return Ok(out);
    }
  }
  if it.remaining().is_empty() {
    Ok(out)
  } else {
    Err(PadError::MalformedContainer)
  }
}

/// Writes a list of chunks out as PNG bytes, starting with the signature.
///
/// Each chunk gets a length, type, data, and a freshly computed CRC, in the
/// order given.
#[cfg(feature = "alloc")]
pub fn encode_chunks(chunks: &[PngChunk<'_>]) -> Result<Vec<u8>, PadError> {
  let total = chunks
    .iter()
    .try_fold(PNG_SIGNATURE.len(), |acc, chunk| acc.checked_add(chunk.encoded_len()))
    .ok_or(PadError::DimensionsTooLarge)?;
  let mut out = Vec::new();
  out.try_reserve_exact(total)?;
  out.extend_from_slice(&PNG_SIGNATURE);
  for chunk in chunks {
    let len = u32::try_from(chunk.data.len())?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&chunk.chunk_ty.0);
    out.extend_from_slice(&chunk.data);
    out.extend_from_slice(&chunk.actual_crc().to_be_bytes());
  }
  Ok(out)
}
