#![forbid(unsafe_code)]

//! The PNG plumbing that padding needs.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! A PNG is an 8 byte signature followed by "chunks". Each chunk is a length,
//! a four byte type tag, the data, and a CRC of the type and data. Only three
//! chunk types matter here:
//! * **Header** (`IHDR`) - The image's dimensions, pixel format, and if the
//!   image is interlaced or not. This is always the first chunk.
//! * **Image Data** (`IDAT`) - One or more chunks of compressed data. All of
//!   the image data chunks together form a single Zlib data stream.
//! * **End** (`IEND`) - The last chunk.
//!
//! Everything else gets carried along as opaque bytes.
//!
//! When storing the PNG, the raw pixel values are first "filtered" (to try and
//! make them more compression-friendly), and then compressed into a Zlib data
//! stream. To get at the pixels you have to reverse both steps: decompress,
//! then unfilter. Going back the other way this module always writes the
//! "None" filter, which is trivially correct.
//!
//! ## Parsing Leniency
//!
//! Chunk CRCs and chunk ordering rules are not checked when decoding (the
//! chunks are kept in the order found either way). The signature and the
//! framing of each chunk *are* checked, since there's no sensible output
//! without them.

use core::fmt::{Debug, Write};

#[cfg(feature = "alloc")]
use alloc::{borrow::Cow, vec::Vec};

use bytemuck::{Pod, Zeroable};

use crate::{crc32::png_chunk_crc, int_endian::U32BE, PadError};

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

#[cfg(feature = "alloc")]
mod idat;
#[cfg(feature = "alloc")]
pub use idat::*;

mod unfilter;
pub use unfilter::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// The default Zlib level used when writing new image data.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not* PNG
///   data.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}
