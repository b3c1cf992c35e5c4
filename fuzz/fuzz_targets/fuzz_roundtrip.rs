#![no_main]
use libfuzzer_sys::fuzz_target;
use planarform::*;

fuzz_target!(|data: &[u8]| {
    // If it decodes, re-encoding as a plain indexed image and decoding
    // again must reproduce the pixels exactly.
    let Ok(decoded) = DecodeRequest::new(data).decode(enough::Unstoppable) else {
        return;
    };

    // CMAP entries carry no alpha, so pixels with translucent alpha
    // (half-brite output) cannot survive a plain re-encode.
    if decoded.pixels().chunks_exact(4).any(|px| px[3] != 255) {
        return;
    }

    let palette = Palette::from_rgba_pixels(decoded.pixels());
    if palette.len() > 256 {
        return; // more colors than 8 planes can index
    }

    let request = match decoded.kind {
        FormKind::Acbm => EncodeRequest::acbm(),
        _ => EncodeRequest::ilbm(),
    };
    // Unaligned widths are rejected at encode time; that is not a bug.
    let Ok(reencoded) = request.encode(
        decoded.pixels(),
        decoded.width,
        decoded.height,
        &palette,
        enough::Unstoppable,
    ) else {
        return;
    };

    let decoded2 = DecodeRequest::new(&reencoded)
        .decode(enough::Unstoppable)
        .expect("re-encoded data failed to decode");
    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
});
