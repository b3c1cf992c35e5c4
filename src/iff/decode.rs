//! FORM decode: chunk scan, body decompression, pixel assembly.
//!
//! Decoding runs in two phases. A single linear scan over the FORM's
//! chunks populates local state — chunk order in the wild does not follow
//! the nominal layout, so body data may be buffered before the header is
//! seen. Once geometry, palette, and plane bytes are all known, exactly
//! one of three assembly strategies runs: Hold-and-Modify, per-scanline
//! raster palettes, or plain indexed lookup.

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::chunk::ChunkReader;
use crate::decode::DecodeOutput;
use crate::error::FormError;
use crate::iff::{
    ABIT, BMHD, BODY, Bmhd, CAMG, CMAP, CTBL, Compression, FORM, FormKind, ModeFlags, RAST, SHAM,
    TYPE_ACBM, TYPE_ILBM, VDAT,
};
use crate::limits::Limits;
use crate::palette::Palette;
use crate::pixels::PixelWriter;
use crate::planes::{Geometry, PlaneReader};
use crate::vdat::depack_strips;

/// The legacy raster side-channel is exactly 200 records of 17 bytes.
const RAST_RECORD: usize = 17;
const RAST_LEN: usize = 200 * RAST_RECORD;

#[derive(Default)]
struct FormScan<'a> {
    header: Option<Bmhd>,
    camg: Option<u32>,
    cmap: Option<Palette>,
    rasters: Vec<Palette>,
    body: Option<(&'a [u8], [u8; 4])>,
}

pub(crate) fn decode_form(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, FormError> {
    let mut outer = ChunkReader::new(data);
    let (tag, mut form) = outer.read_chunk().map_err(|_| FormError::UnrecognizedForm)?;
    if tag != FORM {
        return Err(FormError::UnrecognizedForm);
    }
    let kind = match form.read_tag()? {
        t if t == TYPE_ILBM => FormKind::Ilbm,
        t if t == TYPE_ACBM => FormKind::Acbm,
        t => {
            return Err(FormError::UnsupportedVariant(alloc::format!(
                "unknown FORM type {:?}",
                core::str::from_utf8(&t).unwrap_or("????")
            )));
        }
    };

    // Phase one: linear chunk scan, order-independent.
    let mut scan = FormScan::default();
    while !form.eof() {
        let (tag, mut sub) = form.read_chunk()?;
        match tag {
            t if t == BMHD => scan.header = Some(Bmhd::parse(&mut sub)?),
            t if t == CAMG => scan.camg = Some(sub.read_u32()?),
            t if t == CMAP => scan.cmap = Some(read_cmap(sub.bytes())),
            t if t == SHAM => {
                // Leading version word, then 16-color 4-bit tables.
                scan.rasters = read_raster_words(sub.bytes().get(2..).unwrap_or(&[]));
            }
            t if t == CTBL => scan.rasters = read_raster_words(sub.bytes()),
            t if t == BODY || t == ABIT => scan.body = Some((sub.bytes(), tag)),
            _ => {} // unrecognized chunks are skipped, not fatal
        }
    }

    // Legacy raster side-channel trailing the FORM chunk. Probe without
    // committing; consume only on an exact tag and size match.
    if scan.rasters.is_empty() {
        if let Some((tag, len)) = outer.peek_chunk() {
            if tag == RAST && len == RAST_LEN {
                let (_, sub) = outer.read_chunk()?;
                scan.rasters = read_rast_records(sub.bytes());
            }
        }
    }

    stop.check()?;
    assemble(kind, scan, limits, stop)
}

fn assemble(
    kind: FormKind,
    scan: FormScan<'_>,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, FormError> {
    let bmhd = scan
        .header
        .ok_or_else(|| FormError::InvalidChunk("missing BMHD header".into()))?;
    let (body, body_tag) = scan
        .body
        .ok_or_else(|| FormError::InvalidChunk("missing body chunk".into()))?;

    let width = u32::from(bmhd.width);
    let height = u32::from(bmhd.height);
    if let Some(limits) = limits {
        limits.check(width, height)?;
        limits.check_memory(width as usize * height as usize * 4)?;
    }

    let flags = ModeFlags(scan.camg.unwrap_or(0));
    let mut palette = match scan.cmap {
        Some(p) => p,
        None if bmhd.planes == 1 => Palette::monochrome(),
        None => return Err(FormError::InvalidChunk("missing CMAP palette".into())),
    };
    if flags.extra_half_brite() {
        // Some encoders pad CMAP past 32 entries for compatibility.
        palette = Palette::extend_half_brite(&palette.truncated(32))?;
    }

    let bytes_per_line = bmhd.bytes_per_line();
    let padded_width = width.div_ceil(16) * 16;
    let h = height as usize;
    let has_mask = bmhd.mask == 1;
    let total_planes = usize::from(bmhd.planes) + usize::from(has_mask);
    let expected = bytes_per_line * h * total_planes;

    // Decompress the body and pick the geometry it implies.
    let (plane_data, geometry): (Cow<'_, [u8]>, Geometry) = match bmhd.compression {
        Compression::Strips => {
            let plane_size = bytes_per_line * h;
            let mut planes_buf = vec![0u8; plane_size * usize::from(bmhd.planes)];
            let mut r = ChunkReader::new(body);
            for plane in 0..usize::from(bmhd.planes) {
                if r.eof() {
                    break; // tolerate short bodies; missing planes stay zero
                }
                let (tag, sub) = r.read_chunk()?;
                if tag != VDAT {
                    return Err(FormError::InvalidChunk(alloc::format!(
                        "expected VDAT strip chunk, got {:?}",
                        core::str::from_utf8(&tag).unwrap_or("????")
                    )));
                }
                let dst = &mut planes_buf[plane * plane_size..(plane + 1) * plane_size];
                depack_strips(sub.bytes(), dst, bytes_per_line, h);
            }
            (
                Cow::Owned(planes_buf),
                Geometry::contiguous(padded_width, height, bmhd.planes),
            )
        }
        compression => {
            let raw: Cow<'_, [u8]> = match compression {
                Compression::None => Cow::Borrowed(body),
                Compression::PackBits => Cow::Owned(crate::packbits::depack(body, expected)?),
                Compression::Strips => unreachable!(),
            };
            let geometry = if body_tag == ABIT {
                Geometry::contiguous(padded_width, height, bmhd.planes)
            } else if has_mask {
                // The mask plane rides along in each scanline group; skip
                // it by stretching the line step past the color planes.
                Geometry {
                    bytes_per_block: bytes_per_line,
                    block_step: 0,
                    blocks_per_line: 1,
                    line_step: bytes_per_line * total_planes,
                    plane_step: bytes_per_line,
                    plane_count: usize::from(bmhd.planes),
                }
            } else {
                Geometry::line_interleaved(padded_width, bmhd.planes)
            };
            (raw, geometry)
        }
    };

    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    let reader = PlaneReader::new(&plane_data, geometry);
    let pad = (padded_width - width) as usize;

    if flags.hold_and_modify() {
        decode_ham(reader, &mut pixels, &bmhd, &palette, &scan.rasters, pad, stop)?;
    } else if !scan.rasters.is_empty() {
        decode_rastered(reader, &mut pixels, &bmhd, &scan.rasters, pad, stop)?;
    } else {
        decode_indexed(reader, &mut pixels, &bmhd, &palette, pad, stop)?;
    }

    Ok(DecodeOutput::new(pixels, width, height, kind))
}

fn decode_indexed(
    mut src: PlaneReader<'_>,
    pixels: &mut [u8],
    bmhd: &Bmhd,
    palette: &Palette,
    pad: usize,
    stop: &dyn Stop,
) -> Result<(), FormError> {
    let mut dst = PixelWriter::new(pixels, palette)?;
    for row in 0..usize::from(bmhd.height) {
        if row % 16 == 0 {
            stop.check()?;
        }
        for _ in 0..bmhd.width {
            dst.write(src.read()?)?;
        }
        src.advance(pad);
    }
    Ok(())
}

fn decode_rastered(
    mut src: PlaneReader<'_>,
    pixels: &mut [u8],
    bmhd: &Bmhd,
    rasters: &[Palette],
    pad: usize,
    stop: &dyn Stop,
) -> Result<(), FormError> {
    let height = usize::from(bmhd.height);
    let mut dst = PixelWriter::new(pixels, raster_for_row(rasters, 0, height))?;
    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        if row > 0 {
            dst.set_palette(raster_for_row(rasters, row, height))?;
        }
        for _ in 0..bmhd.width {
            dst.write(src.read()?)?;
        }
        src.advance(pad);
    }
    Ok(())
}

/// Hold-and-Modify assembly: each pixel either resets the running color
/// from the base palette or patches one of its channels.
fn decode_ham(
    mut src: PlaneReader<'_>,
    pixels: &mut [u8],
    bmhd: &Bmhd,
    palette: &Palette,
    rasters: &[Palette],
    pad: usize,
    stop: &dyn Stop,
) -> Result<(), FormError> {
    if bmhd.planes < 3 {
        return Err(FormError::UnsupportedVariant(alloc::format!(
            "Hold-and-Modify needs at least 3 planes, got {}",
            bmhd.planes
        )));
    }
    let base_bits = u32::from(bmhd.planes) - 2;
    let base_count = 1usize << base_bits;
    let hold_shift = 8 - base_bits;
    let height = usize::from(bmhd.height);

    let mut base = palette.resample(8).to_values(true)?;
    if !rasters.is_empty() {
        base = raster_for_row(rasters, 0, height).resample(8).to_values(true)?;
    }

    let mut dst = PixelWriter::new(pixels, palette)?;
    // The running color starts at the border color and deliberately
    // carries across scanline boundaries, matching the display hardware.
    let mut current: u32 = base.first().copied().unwrap_or(0x0000_00ff);

    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        if row > 0 && !rasters.is_empty() {
            // A per-scanline base palette swap does not reset the
            // running color.
            base = raster_for_row(rasters, row, height).resample(8).to_values(true)?;
        }
        for _ in 0..bmhd.width {
            let raw = src.read()?;
            if raw < base_count {
                current = *base
                    .get(raw)
                    .ok_or(FormError::BadPaletteIndex { index: raw })?;
            } else {
                let value = ((raw & (base_count - 1)) as u32) << hold_shift;
                match raw >> base_bits {
                    1 => current = (current & !0x0000_ff00) | (value << 8), // blue
                    2 => current = (current & !0xff00_0000) | (value << 24), // red
                    _ => current = (current & !0x00ff_0000) | (value << 16), // green
                }
            }
            dst.write_value(current)?;
        }
        src.advance(pad);
    }
    Ok(())
}

/// Nearest-below raster table selection for tables shorter than the
/// image: `rasters[row * count / height]`.
fn raster_for_row(rasters: &[Palette], row: usize, height: usize) -> &Palette {
    &rasters[row * rasters.len() / height]
}

fn read_cmap(data: &[u8]) -> Palette {
    let count = data.len() / 3;
    let mut pal = Palette::new(count, 8);
    for (i, rgb) in data.chunks_exact(3).enumerate() {
        pal.set_rgb(i, rgb[0], rgb[1], rgb[2]);
    }
    pal
}

/// 16-color raster tables packed as big-endian `0x0RGB` words with plain
/// 4-bit channels (no STE rotation).
fn read_raster_words(data: &[u8]) -> Vec<Palette> {
    data.chunks_exact(32)
        .map(|record| {
            let mut pal = Palette::new(16, 4);
            for (i, w) in record.chunks_exact(2).enumerate() {
                let word = u16::from_be_bytes([w[0], w[1]]);
                pal.set_rgb(
                    i,
                    ((word >> 8) & 0xf) as u8,
                    ((word >> 4) & 0xf) as u8,
                    (word & 0xf) as u8,
                );
            }
            pal
        })
        .collect()
}

/// RAST side-channel records: one marker byte, then 16 RGB-332 colors.
fn read_rast_records(data: &[u8]) -> Vec<Palette> {
    data.chunks_exact(RAST_RECORD)
        .map(|record| {
            let mut pal = Palette::new(16, 8);
            for (i, &b) in record[1..].iter().enumerate() {
                let r = (b >> 5) & 7;
                let g = (b >> 2) & 7;
                let bl = b & 3;
                pal.set_rgb(i, r * 255 / 7, g * 255 / 7, bl * 85);
            }
            pal
        })
        .collect()
}
