use enough::Unstoppable;
use planarform::chunk::{ChunkReader, ChunkWriter};
use planarform::planes::{Geometry, PlaneWriter};
use planarform::*;

#[test]
fn chunk_writer_backpatches_nested_lengths() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"LIST");
    w.start_chunk(*b"AAAA");
    w.write_bytes(&[1, 2, 3]);
    assert_eq!(w.end_chunk(), 11);
    w.start_chunk(*b"BBBB");
    w.write_u8(4);
    assert_eq!(w.end_chunk(), 9);
    w.end_chunk();
    let data = w.into_inner();

    let mut outer = ChunkReader::new(&data);
    let (tag, mut list) = outer.read_chunk().unwrap();
    assert_eq!(&tag, b"LIST");
    assert!(outer.eof());

    let (tag, a) = list.read_chunk().unwrap();
    assert_eq!(&tag, b"AAAA");
    assert_eq!(a.bytes(), &[1, 2, 3]);

    let (tag, mut b) = list.read_chunk().unwrap();
    assert_eq!(&tag, b"BBBB");
    assert_eq!(b.read_u8().unwrap(), 4);
    assert!(list.eof());
}

#[test]
fn chunk_reader_tolerates_missing_pad() {
    // "AAAA" has an odd payload and no pad byte before "BBBB".
    let mut data = Vec::new();
    data.extend_from_slice(b"AAAA");
    data.extend_from_slice(&3u32.to_be_bytes());
    data.extend_from_slice(&[1, 2, 3]);
    data.extend_from_slice(b"BBBB");
    data.extend_from_slice(&0u32.to_be_bytes());

    let mut r = ChunkReader::new(&data);
    let (tag, _) = r.read_chunk().unwrap();
    assert_eq!(&tag, b"AAAA");
    let (tag, _) = r.read_chunk().unwrap();
    assert_eq!(&tag, b"BBBB");
    assert!(r.eof());
}

#[test]
fn chunk_reader_skips_present_pad() {
    let mut data = Vec::new();
    data.extend_from_slice(b"AAAA");
    data.extend_from_slice(&3u32.to_be_bytes());
    data.extend_from_slice(&[1, 2, 3, 0]); // padded to even
    data.extend_from_slice(b"BBBB");
    data.extend_from_slice(&0u32.to_be_bytes());

    let mut r = ChunkReader::new(&data);
    r.read_chunk().unwrap();
    let (tag, _) = r.read_chunk().unwrap();
    assert_eq!(&tag, b"BBBB");
}

#[test]
fn chunk_peek_does_not_advance() {
    let mut data = Vec::new();
    data.extend_from_slice(b"AAAA");
    data.extend_from_slice(&1u32.to_be_bytes());
    data.push(9);

    let mut r = ChunkReader::new(&data);
    let (tag, len) = r.peek_chunk().unwrap();
    assert_eq!(&tag, b"AAAA");
    assert_eq!(len, 1);
    let (tag, payload) = r.read_chunk().unwrap();
    assert_eq!(&tag, b"AAAA");
    assert_eq!(payload.bytes(), &[9]);
}

#[test]
fn chunk_declared_length_past_end_is_eof_error() {
    let mut data = Vec::new();
    data.extend_from_slice(b"AAAA");
    data.extend_from_slice(&100u32.to_be_bytes());
    data.push(1);

    let mut r = ChunkReader::new(&data);
    let err = r.read_chunk().unwrap_err();
    assert!(matches!(err, FormError::UnexpectedEof), "{err:?}");
}

#[test]
#[should_panic(expected = "end_chunk without matching start_chunk")]
fn end_chunk_without_start_panics() {
    let mut w = ChunkWriter::new();
    w.end_chunk();
}

fn write_bmhd(w: &mut ChunkWriter, width: u16, height: u16, planes: u8, mask: u8, compression: u8) {
    w.start_chunk(*b"BMHD");
    w.write_u16(width);
    w.write_u16(height);
    w.write_i16(0);
    w.write_i16(0);
    w.write_u8(planes);
    w.write_u8(mask);
    w.write_u8(compression);
    w.write_u8(0);
    w.write_u16(0);
    w.write_u8(10);
    w.write_u8(11);
    w.write_i16(width as i16);
    w.write_i16(height as i16);
    w.end_chunk();
}

#[test]
fn ham_base_then_hold_green() {
    // 2-pixel row, 6 planes: pixel 0 selects base entry 3, pixel 1 holds
    // everything but green and loads 0x80 into it.
    let mut body = vec![0u8; 12];
    {
        let mut pw = PlaneWriter::new(&mut body, Geometry::line_interleaved(16, 6));
        pw.write(3).unwrap();
        pw.write(0x38).unwrap();
        pw.advance(14);
    }

    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 2, 1, 6, 0, 0);
    w.start_chunk(*b"CAMG");
    w.write_u32(ModeFlags::HOLD_AND_MODIFY);
    w.end_chunk();
    w.start_chunk(*b"CMAP");
    for i in 0..16u8 {
        w.write_u8(i);
        w.write_u8(20);
        w.write_u8(100 + i);
    }
    w.end_chunk();
    w.start_chunk(*b"BODY");
    w.write_bytes(&body);
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.pixels(), &[3, 20, 103, 255, 3, 0x80, 103, 255]);
}

#[test]
fn ham_rejects_too_few_planes() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 1, 2, 0, 0);
    w.start_chunk(*b"CAMG");
    w.write_u32(ModeFlags::HOLD_AND_MODIFY);
    w.end_chunk();
    w.start_chunk(*b"CMAP");
    w.write_bytes(&[0; 12]);
    w.end_chunk();
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0; 4]);
    w.end_chunk();
    w.end_chunk();

    let err = DecodeRequest::new(&w.into_inner())
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, FormError::UnsupportedVariant(_)), "{err:?}");
}

#[test]
fn extra_half_brite_doubles_cmap() {
    // 6 planes, every pixel index 32: the half-intensity copy of entry 0.
    let mut body = vec![0u8; 12];
    body[10] = 0xFF; // plane 5
    body[11] = 0xFF;

    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 1, 6, 0, 0);
    w.start_chunk(*b"CAMG");
    w.write_u32(ModeFlags::EXTRA_HALF_BRITE);
    w.end_chunk();
    w.start_chunk(*b"CMAP");
    w.write_bytes(&[100, 60, 30]); // entry 0
    for i in 1..32u8 {
        w.write_bytes(&[i, i, i]);
    }
    w.end_chunk();
    w.start_chunk(*b"BODY");
    w.write_bytes(&body);
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    for px in decoded.pixels().chunks_exact(4) {
        assert_eq!(px, &[50, 30, 15, 127]);
    }
}

#[test]
fn extra_half_brite_needs_32_cmap_entries() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 1, 6, 0, 0);
    w.start_chunk(*b"CAMG");
    w.write_u32(ModeFlags::EXTRA_HALF_BRITE);
    w.end_chunk();
    w.start_chunk(*b"CMAP");
    w.write_bytes(&[0; 30]); // only 10 entries
    w.end_chunk();
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0; 12]);
    w.end_chunk();
    w.end_chunk();

    let err = DecodeRequest::new(&w.into_inner())
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, FormError::BufferTooSmall { .. }), "{err:?}");
}

/// 16-color raster record with entry 1 set to the given 0x0RGB word.
fn raster_record(entry1: u16) -> [u8; 32] {
    let mut record = [0u8; 32];
    record[2..4].copy_from_slice(&entry1.to_be_bytes());
    record
}

#[test]
fn ctbl_palette_per_scanline() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 2, 1, 0, 0);
    w.start_chunk(*b"CTBL");
    w.write_bytes(&raster_record(0x0F00)); // row 0: entry 1 is red
    w.write_bytes(&raster_record(0x000F)); // row 1: entry 1 is blue
    w.end_chunk();
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0xFF; 4]); // every pixel index 1
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    let pixels = decoded.pixels();
    for px in pixels[..16 * 4].chunks_exact(4) {
        assert_eq!(px, &[255, 0, 0, 255]);
    }
    for px in pixels[16 * 4..].chunks_exact(4) {
        assert_eq!(px, &[0, 0, 255, 255]);
    }
}

#[test]
fn sham_skips_version_word() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 2, 1, 0, 0);
    w.start_chunk(*b"SHAM");
    w.write_u16(0); // version
    w.write_bytes(&raster_record(0x00F0)); // row 0: entry 1 is green
    w.write_bytes(&raster_record(0x0F0F)); // row 1: entry 1 is magenta
    w.end_chunk();
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0xFF; 4]);
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    let pixels = decoded.pixels();
    assert_eq!(&pixels[..4], &[0, 255, 0, 255]);
    assert_eq!(&pixels[16 * 4..16 * 4 + 4], &[255, 0, 255, 255]);
}

#[test]
fn rast_side_channel_outside_form() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 1, 1, 0, 0);
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0xFF, 0xFF]);
    w.end_chunk();
    w.end_chunk();
    let mut data = w.into_inner();

    // Trailing RAST chunk: 200 records of one marker byte + 16 RGB-332
    // colors, appended after the FORM rather than nested inside it.
    let mut rast = vec![0u8; 200 * 17];
    rast[2] = 0b0000_0011; // record 0, color 1: full blue
    data.extend_from_slice(b"RAST");
    data.extend_from_slice(&(rast.len() as u32).to_be_bytes());
    data.extend_from_slice(&rast);

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    for px in decoded.pixels().chunks_exact(4) {
        assert_eq!(px, &[0, 0, 255, 255]);
    }
}

#[test]
fn rast_with_wrong_size_is_ignored() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 1, 1, 0, 0);
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0x00, 0x00]);
    w.end_chunk();
    w.end_chunk();
    let mut data = w.into_inner();

    data.extend_from_slice(b"RAST");
    data.extend_from_slice(&16u32.to_be_bytes());
    data.extend_from_slice(&[0; 16]);

    // Falls back to the monochrome palette: index 0 is white.
    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    assert_eq!(&decoded.pixels()[..4], &[255, 255, 255, 255]);
}

#[test]
fn vdat_strip_compressed_body() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 2, 1, 0, 2);
    w.start_chunk(*b"BODY");
    w.start_chunk(*b"VDAT");
    // Repeat 0xF0F0 down the single column: both scanlines identical.
    w.write_u8(2);
    w.write_u16(0xF0F0);
    w.end_chunk();
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    let pixels = decoded.pixels();
    let black = [0u8, 0, 0, 255];
    let white = [255u8, 255, 255, 255];
    for row in 0..2 {
        for x in 0..16 {
            let expected = if (x / 4) % 2 == 0 { black } else { white };
            let off = (row * 16 + x) * 4;
            assert_eq!(&pixels[off..off + 4], &expected, "row {row} x {x}");
        }
    }
}

#[test]
fn mask_plane_is_skipped() {
    // One color plane plus an interleaved mask plane per scanline.
    let body = [
        0xFF, 0xFF, // row 0, plane 0
        0xAA, 0x55, // row 0, mask
        0x00, 0x00, // row 1, plane 0
        0x12, 0x34, // row 1, mask
    ];
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 2, 1, 1, 0);
    w.start_chunk(*b"BODY");
    w.write_bytes(&body);
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    let pixels = decoded.pixels();
    for px in pixels[..16 * 4].chunks_exact(4) {
        assert_eq!(px, &[0, 0, 0, 255]);
    }
    for px in pixels[16 * 4..].chunks_exact(4) {
        assert_eq!(px, &[255, 255, 255, 255]);
    }
}

#[test]
fn chunk_order_is_not_assumed() {
    // BODY before BMHD before CMAP still decodes.
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0xFF, 0xFF]);
    w.end_chunk();
    write_bmhd(&mut w, 16, 1, 1, 0, 0);
    w.start_chunk(*b"CMAP");
    w.write_bytes(&[10, 20, 30, 40, 50, 60]);
    w.end_chunk();
    w.end_chunk();
    let data = w.into_inner();

    let decoded = DecodeRequest::new(&data).decode(Unstoppable).unwrap();
    assert_eq!(&decoded.pixels()[..4], &[40, 50, 60, 255]);
}

#[test]
fn unknown_chunks_are_skipped() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    w.start_chunk(*b"ANNO");
    w.write_bytes(b"made by hand!"); // odd length, writer pads
    w.end_chunk();
    write_bmhd(&mut w, 16, 1, 1, 0, 0);
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0x00, 0x00]);
    w.end_chunk();
    w.end_chunk();

    let decoded = DecodeRequest::new(&w.into_inner())
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded.width, 16);
}

#[test]
fn missing_bmhd_is_invalid() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0; 2]);
    w.end_chunk();
    w.end_chunk();

    let err = DecodeRequest::new(&w.into_inner())
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, FormError::InvalidChunk(_)), "{err:?}");
}

#[test]
fn unknown_compression_code_is_rejected() {
    let mut w = ChunkWriter::new();
    w.start_chunk(*b"FORM");
    w.write_tag(*b"ILBM");
    write_bmhd(&mut w, 16, 1, 1, 0, 3);
    w.start_chunk(*b"BODY");
    w.write_bytes(&[0; 2]);
    w.end_chunk();
    w.end_chunk();

    let err = DecodeRequest::new(&w.into_inner())
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, FormError::UnsupportedVariant(_)), "{err:?}");
}

#[test]
fn not_a_form_is_unrecognized() {
    let err = DecodeRequest::new(b"RIFF\x00\x00\x00\x04WAVE")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, FormError::UnrecognizedForm), "{err:?}");
}
