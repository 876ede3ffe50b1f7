use padpng::{
  pad, pad_with, plan_for,
  png::{decode_chunks, ChunkType, PngColorType, IHDR},
  PadError, PadOptions, PadPlan, Ratio, TopFill,
};

use super::{decode_pixels, rand_bytes, Fixture};

#[test]
fn test_pad_100x50_rgb_to_three_two() {
  let fixture = Fixture::new(100, 50, PngColorType::RGB);
  let png = fixture.to_png();
  assert_eq!(
    plan_for(&png, Ratio::THREE_TWO),
    Ok(PadPlan { target_height: 67, rows_to_add: 17, top_rows: 9, bottom_rows: 8 })
  );
  let padded = pad(&png, Ratio::THREE_TWO).unwrap();
  let (ihdr, pixels) = decode_pixels(&padded);
  assert_eq!(ihdr.width, 100);
  assert_eq!(ihdr.height, 67);
  assert_eq!(ihdr.color_type, PngColorType::RGB);

  let row_len = fixture.row_len();
  let rows: Vec<&[u8]> = pixels.chunks_exact(row_len).collect();
  assert_eq!(rows.len(), 67);
  for row in &rows[..9] {
    assert!(row.iter().all(|&b| b == 0xFF));
  }
  assert_eq!(rows[9..59].concat(), fixture.pixels);
  let last = &fixture.pixels[fixture.pixels.len() - row_len..];
  for row in &rows[59..] {
    assert_eq!(*row, last);
  }

  // the new image data is written with the None filter on every line
  let chunks = decode_chunks(&padded).unwrap();
  let scanlines = padpng::png::inflate_idat(&ihdr, &chunks).unwrap();
  assert!(scanlines.chunks_exact(row_len + 1).all(|line| line[0] == 0));
}

#[test]
fn test_pad_already_tall() {
  let png = Fixture::new(100, 67, PngColorType::RGB).to_png();
  assert_eq!(plan_for(&png, Ratio::THREE_TWO), Err(PadError::AlreadyTall));
  assert_eq!(pad(&png, Ratio::THREE_TWO), Err(PadError::AlreadyTall));
  let png = Fixture::new(10, 40, PngColorType::Y).to_png();
  for ratio in Ratio::ALLOWED {
    assert_eq!(pad(&png, ratio), Err(PadError::AlreadyTall));
  }
}

#[test]
fn test_pad_height_matches_ratio_for_every_model() {
  for color_type in [PngColorType::Y, PngColorType::YA, PngColorType::RGB, PngColorType::RGBA] {
    for ratio in Ratio::ALLOWED {
      for (width, height) in [(1, 0_u32), (3, 1), (16, 5), (31, 7)] {
        let height = height.max(1);
        let fixture = Fixture::new(width, height, color_type);
        let expected = ratio.target_height(width);
        match pad(&fixture.to_png(), ratio) {
          Ok(padded) => {
            let (ihdr, pixels) = decode_pixels(&padded);
            assert_eq!(u64::from(ihdr.height), expected);
            assert_eq!(ihdr.width, width);
            assert_eq!(pixels.len(), fixture.row_len() * ihdr.height as usize);
          }
          Err(e) => {
            assert_eq!(e, PadError::AlreadyTall);
            assert!(u64::from(height) >= expected);
          }
        }
      }
    }
  }
}

#[test]
fn test_pad_alpha_top_rows() {
  let fixture = Fixture::new(4, 1, PngColorType::RGBA);
  let png = fixture.to_png();
  // 4:3 on width 4 is 3 rows tall, so 1 on top and 1 on the bottom
  let padded = pad(&png, Ratio::FOUR_THREE).unwrap();
  let (_, pixels) = decode_pixels(&padded);
  assert_eq!(&pixels[..16], &[0xFF; 16]);

  let options = PadOptions { top_fill: TopFill::TransparentWhite, ..PadOptions::default() };
  let padded = pad_with(&png, Ratio::FOUR_THREE, &options).unwrap();
  let (_, pixels) = decode_pixels(&padded);
  for px in pixels[..16].chunks_exact(4) {
    assert_eq!(px, &[0xFF, 0xFF, 0xFF, 0x00]);
  }
  assert_eq!(&pixels[16..32], &fixture.pixels[..]);
  assert_eq!(&pixels[32..], &fixture.pixels[..]);
}

#[test]
fn test_pad_keeps_other_chunks_in_order() {
  let mut fixture = Fixture::new(12, 4, PngColorType::YA);
  fixture.idat_pieces = 3;
  fixture.before_idat = vec![
    (ChunkType(*b"gAMA"), vec![0, 0, 0xB1, 0x8F]),
    (ChunkType::tEXt, b"Title\0padded".to_vec()),
  ];
  fixture.after_idat = vec![(ChunkType(*b"zzZz"), vec![9, 9, 9])];
  let png = fixture.to_png();
  let padded = pad(&png, Ratio::THREE_TWO).unwrap();

  let before = decode_chunks(&png).unwrap();
  let after = decode_chunks(&padded).unwrap();
  let types: Vec<ChunkType> = after.iter().map(|c| c.chunk_ty).collect();
  assert_eq!(
    types,
    [
      ChunkType::IHDR,
      ChunkType(*b"gAMA"),
      ChunkType::tEXt,
      ChunkType::IDAT,
      ChunkType(*b"zzZz"),
      ChunkType::IEND
    ]
  );
  assert_eq!(after[1], before[1]);
  assert_eq!(after[2], before[2]);
  assert_eq!(after[4].data, before[6].data);

  // only the height changed in the header
  let old = IHDR::try_from(&*before[0].data).unwrap();
  let new = IHDR::try_from(&*after[0].data).unwrap();
  assert_eq!(new, old.with_height(8));

  // every CRC in the output is right
  assert!(padpng::png::PngRawChunkIter::new(&padded).all(|raw| raw.crc_matches()));
}

#[test]
fn test_pad_is_deterministic() {
  let png = Fixture::new(20, 5, PngColorType::RGB).to_png();
  assert_eq!(pad(&png, Ratio::SIXTEEN_NINE), pad(&png, Ratio::SIXTEEN_NINE));
}

/// Rewrites the IHDR data of a fixture PNG (fixing up its CRC).
fn with_header_bytes(png: &[u8], edit: impl FnOnce(&mut [u8])) -> Vec<u8> {
  let mut chunks = decode_chunks(png).unwrap();
  let mut data = chunks[0].data.to_vec();
  edit(&mut data);
  chunks[0] = padpng::png::PngChunk::owned(ChunkType::IHDR, data);
  padpng::png::encode_chunks(&chunks).unwrap()
}

#[test]
fn test_pad_unsupported_variants() {
  let png = Fixture::new(8, 2, PngColorType::RGB).to_png();
  // interlaced
  let interlaced = with_header_bytes(&png, |d| d[12] = 1);
  assert_eq!(pad(&interlaced, Ratio::THREE_TWO), Err(PadError::UnsupportedVariant));
  // indexed color
  let indexed = with_header_bytes(&png, |d| d[9] = 3);
  assert_eq!(pad(&indexed, Ratio::THREE_TWO), Err(PadError::UnsupportedVariant));
  // 16 bit
  let deep = with_header_bytes(&png, |d| d[8] = 16);
  assert_eq!(pad(&deep, Ratio::THREE_TWO), Err(PadError::UnsupportedVariant));
  // zero height
  let empty = with_header_bytes(&png, |d| d[4..8].copy_from_slice(&[0; 4]));
  assert!(pad(&empty, Ratio::THREE_TWO).is_err());
  for bytes in [&interlaced, &indexed, &deep] {
    assert_eq!(plan_for(bytes, Ratio::THREE_TWO), Err(PadError::UnsupportedVariant));
  }
}

#[test]
fn test_pad_malformed_containers() {
  let png = Fixture::new(8, 2, PngColorType::RGB).to_png();
  let mut bad_sig = png.clone();
  bad_sig[1] = b'J';
  assert_eq!(pad(&bad_sig, Ratio::THREE_TWO), Err(PadError::MalformedContainer));
  assert_eq!(pad(&[], Ratio::THREE_TWO), Err(PadError::MalformedContainer));
  assert_eq!(pad(&png[..8], Ratio::THREE_TWO), Err(PadError::MalformedContainer));
  // short header chunk
  let mut chunks = decode_chunks(&png).unwrap();
  chunks[0] = padpng::png::PngChunk::owned(ChunkType::IHDR, vec![0; 12]);
  let short = padpng::png::encode_chunks(&chunks).unwrap();
  assert_eq!(pad(&short, Ratio::THREE_TWO), Err(PadError::MalformedContainer));
  // header not first
  chunks.swap(0, 1);
  let swapped = padpng::png::encode_chunks(&chunks).unwrap();
  assert_eq!(pad(&swapped, Ratio::THREE_TWO), Err(PadError::MalformedContainer));
  // broken image data
  let mut chunks = decode_chunks(&png).unwrap();
  chunks[1] = padpng::png::PngChunk::owned(ChunkType::IDAT, vec![0x78, 0x9C, 0xFF, 0xFF]);
  let broken = padpng::png::encode_chunks(&chunks).unwrap();
  assert_eq!(pad(&broken, Ratio::THREE_TWO), Err(PadError::CompressionFailure));
}

#[test]
fn test_pad_output_limit() {
  let png = Fixture::new(100, 50, PngColorType::RGBA).to_png();
  let options = PadOptions { max_output_bytes: 1000, ..PadOptions::default() };
  assert_eq!(pad_with(&png, Ratio::THREE_TWO, &options), Err(PadError::DimensionsTooLarge));
  // planning alone doesn't know about the limit
  assert!(plan_for(&png, Ratio::THREE_TWO).is_ok());
  // 67 lines of 1 + 400 bytes
  let options = PadOptions { max_output_bytes: 67 * 401, ..PadOptions::default() };
  assert!(pad_with(&png, Ratio::THREE_TWO, &options).is_ok());
  let options = PadOptions { max_output_bytes: 67 * 401 - 1, ..PadOptions::default() };
  assert_eq!(pad_with(&png, Ratio::THREE_TWO, &options), Err(PadError::DimensionsTooLarge));
}

#[test]
fn test_pad_compression_levels() {
  let png = Fixture::new(30, 10, PngColorType::RGBA).to_png();
  let default = pad(&png, Ratio::SIXTEEN_NINE).unwrap();
  let (default_ihdr, default_pixels) = decode_pixels(&default);

  let stored = PadOptions { compression_level: 0, ..PadOptions::default() };
  let stored = pad_with(&png, Ratio::SIXTEEN_NINE, &stored).unwrap();
  // clamped to 10
  let best = PadOptions { compression_level: 255, ..PadOptions::default() };
  let best = pad_with(&png, Ratio::SIXTEEN_NINE, &best).unwrap();
  let ten = PadOptions { compression_level: 10, ..PadOptions::default() };
  assert_eq!(best, pad_with(&png, Ratio::SIXTEEN_NINE, &ten).unwrap());

  for padded in [&stored, &best] {
    let (ihdr, pixels) = decode_pixels(padded);
    assert_eq!(ihdr, default_ihdr);
    assert_eq!(pixels, default_pixels);
  }
  // level 0 only stores, so it can't be smaller
  assert!(stored.len() > default.len());
}

#[test]
fn test_pad_random_bytes_never_panic() {
  let png = Fixture::new(6, 2, PngColorType::RGBA).to_png();
  for _ in 0..50 {
    let v = rand_bytes(512);
    assert!(pad(&v, Ratio::THREE_TWO).is_err());
    // random bytes behind a real signature
    let mut w = png[..8].to_vec();
    w.extend_from_slice(&v);
    let _ = pad(&w, Ratio::THREE_TWO);
    // random damage to a real PNG
    let mut x = png.clone();
    let i = (v[0] as usize * 256 + v[1] as usize) % x.len();
    x[i] ^= v[2] | 1;
    let _ = pad(&x, Ratio::THREE_TWO);
    // truncations
    let _ = pad(&png[..(v[3] as usize).min(png.len())], Ratio::THREE_TWO);
  }
}
