#![no_std]
#![forbid(unsafe_code)]

//! Pads PNG images out to a target aspect ratio.
//!
//! Given PNG bytes and a `width:height` ratio, [`pad`] produces a new PNG with
//! the same width and a greater height. The extra rows are split between the
//! top (solid white) and the bottom (copies of the image's last row). The
//! existing pixels are never altered.
//!
//! When padding isn't possible or isn't needed, you get a [`PadError`]
//! instead. Every error means the same thing: serve the original bytes.
//!
//! ```no_run
//! # fn serve(png: &[u8]) -> Vec<u8> {
//! use padpng::{pad, Ratio};
//! match pad(png, Ratio::THREE_TWO) {
//!   Ok(padded) => padded,
//!   Err(_not_applicable) => png.to_vec(),
//! }
//! # }
//! ```
//!
//! Only non-interlaced, 8 bits per channel, non-indexed images are padded.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod crc32;

pub mod int_endian;

mod error;
pub use error::*;

pub mod png;

pub mod plan;
pub use plan::{PadOptions, PadPlan, Ratio, TopFill};

#[cfg(feature = "alloc")]
pub mod rebuild;

/// Checks if PNG bytes would get padded, without decompressing anything.
///
/// This runs the same signature, header, and height checks as [`pad`]. An
/// `Ok` here can still be followed by a `pad` failure: the image data can turn
/// out to be broken, and the size limit in
/// [`max_output_bytes`](PadOptions::max_output_bytes) isn't checked here, so
/// `pad` can still give `DimensionsTooLarge`.
pub fn plan_for(bytes: &[u8], ratio: Ratio) -> Result<PadPlan, PadError> {
  let ihdr = png::png_get_header(bytes)?;
  ihdr.check_supported()?;
  PadPlan::compute(ihdr.width, ihdr.height, ratio)
}

/// Pads PNG bytes to the given ratio using the default [`PadOptions`].
///
/// See [`pad_with`].
#[cfg(feature = "alloc")]
#[inline]
pub fn pad(bytes: &[u8], ratio: Ratio) -> Result<Vec<u8>, NotApplicable> {
  pad_with(bytes, ratio, &PadOptions::default())
}

/// Pads PNG bytes to the given ratio.
///
/// The output has the same width, a height of `ceil(width * h / w)`, freshly
/// compressed image data, and every other chunk of the input carried over in
/// the same order.
///
/// ## Failure
/// Any error means the original bytes should be used as-is:
/// * The bytes aren't a well framed PNG.
/// * The PNG is interlaced, indexed color, or not 8 bits per channel.
/// * The image data doesn't decompress.
/// * The image is already tall enough.
/// * The result would exceed [`max_output_bytes`](PadOptions::max_output_bytes).
#[cfg(feature = "alloc")]
pub fn pad_with(
  bytes: &[u8], ratio: Ratio, options: &PadOptions,
) -> Result<Vec<u8>, NotApplicable> {
  let result = pad_inner(bytes, ratio, options);
  if let Err(e) = &result {
    log::debug!("not padding {} byte image to {ratio}: {e}", bytes.len());
  }
  result
}

#[cfg(feature = "alloc")]
fn pad_inner(bytes: &[u8], ratio: Ratio, options: &PadOptions) -> Result<Vec<u8>, PadError> {
  let chunks = png::decode_chunks(bytes)?;
  let ihdr = match chunks.first() {
    Some(first) if first.chunk_ty == png::ChunkType::IHDR => png::IHDR::try_from(&*first.data)?,
    _ => return Err(PadError::MalformedContainer),
  };
  ihdr.check_supported()?;
  let plan = PadPlan::compute(ihdr.width, ihdr.height, ratio)?;
  let new_ihdr = ihdr.with_height(plan.target_height);
  if new_ihdr.filtered_len()? > options.max_output_bytes {
    return Err(PadError::DimensionsTooLarge);
  }
  log::trace!("padding {}x{} to {ratio}: {plan:?}", ihdr.width, ihdr.height);

  let mut scanlines = png::inflate_idat(&ihdr, &chunks)?;
  png::unfilter_in_place(ihdr.bytes_per_pixel(), ihdr.bytes_per_filterline()?, &mut scanlines)?;

  let top_row = crate::plan::fill_row(
    ihdr.width,
    ihdr.bytes_per_pixel(),
    ihdr.color_type.has_alpha(),
    options.top_fill,
  )?;
  let padded = plan.pad_scanlines(&scanlines, &top_row)?;
  drop(scanlines);
  let idat = png::zlib_compress(&padded, options.compression_level);
  drop(padded);

  let out_chunks = rebuild::rebuild_chunks(&chunks, &new_ihdr, idat)?;
  png::encode_chunks(&out_chunks)
}
