use planarform::{packbits, vdat, FormError, Palette};
use planarform::{planes_for_colors, read_packed_palette, write_packed_palette};

fn pseudo_random_bytes(len: usize, seed: u32) -> Vec<u8> {
    // Small LCG; runs and literals both show up at these parameters.
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            ((state >> 24) & 0x03) as u8
        })
        .collect()
}

#[test]
fn packbits_roundtrip_arbitrary_data() {
    let data = pseudo_random_bytes(1000, 42);
    for line_len in [1usize, 5, 40, 128, 1000] {
        let packed = packbits::pack(&data, line_len);
        let unpacked = packbits::depack(&packed, data.len()).unwrap();
        assert_eq!(unpacked, data, "line_len {line_len}");
    }
}

#[test]
fn packbits_depack_control_bytes() {
    // -2 as a control byte: repeat the next byte 3 times.
    assert_eq!(packbits::depack(&[0xFE, 0xAA], 3).unwrap(), &[0xAA; 3]);
    // 2: copy the next 3 bytes literally.
    assert_eq!(packbits::depack(&[0x02, 1, 2, 3], 3).unwrap(), &[1, 2, 3]);
    // -128 is a no-op and contributes nothing.
    assert_eq!(packbits::depack(&[0x80, 0x00, 0x41], 1).unwrap(), &[0x41]);
}

#[test]
fn packbits_depack_truncates_overshoot() {
    // A run of 6 against a 4-byte output stops at the output size.
    assert_eq!(packbits::depack(&[0xFB, 7], 4).unwrap(), &[7; 4]);
}

#[test]
fn packbits_depack_short_input_is_eof() {
    let err = packbits::depack(&[0xFE], 3).unwrap_err();
    assert!(matches!(err, FormError::UnexpectedEof), "{err:?}");
    let err = packbits::depack(&[0x02, 1], 3).unwrap_err();
    assert!(matches!(err, FormError::UnexpectedEof), "{err:?}");
}

#[test]
fn packbits_runs_do_not_cross_lines() {
    let data = [9u8; 256];
    let packed = packbits::pack(&data, 128);
    // Two independent full-length runs, one per scanline.
    assert_eq!(packed, &[0x81, 9, 0x81, 9]);
}

#[test]
fn packbits_run_length_caps_at_128() {
    let data = [9u8; 200];
    let packed = packbits::pack(&data, 200);
    assert_eq!(packed, &[0x81, 9, 0xB9, 9]);
    assert_eq!(packbits::depack(&packed, 200).unwrap(), &data[..]);
}

#[test]
fn packbits_literal_dump_caps_at_128() {
    let data: Vec<u8> = (0..200u8).collect();
    let packed = packbits::pack(&data, 200);
    assert_eq!(packed[0], 127); // 128 literal bytes
    assert_eq!(packed[129], 71); // then the remaining 72
    assert_eq!(packbits::depack(&packed, 200).unwrap(), data);
}

#[test]
fn vdat_run_fills_down_the_column() {
    let mut plane = [0u8; 4];
    // bytes_per_line 2: a single column, two scanlines.
    vdat::depack_strips(&[2, 0xF0, 0xF0], &mut plane, 2, 2);
    assert_eq!(plane, [0xF0, 0xF0, 0xF0, 0xF0]);
}

#[test]
fn vdat_copy_wraps_to_next_column() {
    let mut plane = [0u8; 8];
    // Four raw words over a 4-byte-wide, 2-line plane: the first two fill
    // column 0 top to bottom, the next two fill column 1.
    let src = [0xFC_u8, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    vdat::depack_strips(&src, &mut plane, 4, 2);
    assert_eq!(plane, [0x11, 0x22, 0x55, 0x66, 0x33, 0x44, 0x77, 0x88]);
}

#[test]
fn vdat_explicit_count_commands() {
    let mut plane = [0u8; 4];
    // Command 0: 16-bit copy count, then raw words.
    vdat::depack_strips(&[0, 0, 2, 0xAB, 0xCD, 0x12, 0x34], &mut plane, 2, 2);
    assert_eq!(plane, [0xAB, 0xCD, 0x12, 0x34]);

    let mut plane = [0u8; 4];
    // Command 1: 16-bit run length, then one word to repeat.
    vdat::depack_strips(&[1, 0, 2, 0x5A, 0xA5], &mut plane, 2, 2);
    assert_eq!(plane, [0x5A, 0xA5, 0x5A, 0xA5]);
}

#[test]
fn vdat_tolerates_malformed_streams() {
    // Truncated after the command byte.
    let mut plane = [0u8; 4];
    vdat::depack_strips(&[2], &mut plane, 2, 2);
    assert_eq!(plane, [0; 4]);

    // Run length far past the plane capacity stops at the last column.
    let mut plane = [0u8; 4];
    vdat::depack_strips(&[100, 0xEE, 0xEE], &mut plane, 2, 2);
    assert_eq!(plane, [0xEE; 4]);

    // Copy count with no data words behind it.
    let mut plane = [0u8; 4];
    vdat::depack_strips(&[0, 0, 9, 0x01, 0x02], &mut plane, 2, 2);
    assert_eq!(plane, [0x01, 0x02, 0, 0]);
}

#[test]
fn packed_palette_base_words() {
    let mut pal = Palette::new(2, 3);
    pal.set_rgb(0, 7, 3, 1);
    pal.set_rgb(1, 0, 0, 0);

    let bytes = write_packed_palette(&pal).unwrap();
    assert_eq!(bytes, [0x07, 0x31, 0x00, 0x00]);

    let back = read_packed_palette(&bytes).unwrap();
    assert_eq!(back.bits_per_channel(), 3);
    assert_eq!(back, pal);
}

#[test]
fn packed_palette_extended_roundtrip() {
    // Odd channel values set the rotated low bit, which is what flags the
    // 4-bit variant on read.
    let mut pal = Palette::new(3, 4);
    pal.set_rgb(0, 9, 5, 15);
    pal.set_rgb(1, 1, 14, 7);
    pal.set_rgb(2, 0, 3, 8);

    let bytes = write_packed_palette(&pal).unwrap();
    let back = read_packed_palette(&bytes).unwrap();
    assert_eq!(back.bits_per_channel(), 4);
    assert_eq!(back, pal);
}

#[test]
fn packed_palette_even_values_read_as_base_variant() {
    // All-even 4-bit channels leave every rotated high bit clear, so the
    // bytes are indistinguishable from the 3-bit encoding.
    let mut pal = Palette::new(1, 4);
    pal.set_rgb(0, 8, 4, 2);
    let bytes = write_packed_palette(&pal).unwrap();
    let back = read_packed_palette(&bytes).unwrap();
    assert_eq!(back.bits_per_channel(), 3);
    assert_eq!(back.color(0).unwrap().r, 4); // 8 >> 1
}

#[test]
fn packed_palette_rejects_odd_length() {
    assert!(read_packed_palette(&[0x07, 0x31, 0x00]).is_err());
}

#[test]
fn packed_palette_rejects_other_depths() {
    let pal = Palette::new(2, 8);
    assert!(write_packed_palette(&pal).is_err());
}

#[test]
fn plane_counts_for_palette_sizes() {
    assert_eq!(planes_for_colors(0), 1);
    assert_eq!(planes_for_colors(1), 1);
    assert_eq!(planes_for_colors(2), 1);
    assert_eq!(planes_for_colors(3), 2);
    assert_eq!(planes_for_colors(16), 4);
    assert_eq!(planes_for_colors(17), 5);
    assert_eq!(planes_for_colors(256), 8);
}
