//! FORM encode: plane build, optional packbits pass, chunk tree emission.

use alloc::vec::Vec;

use enough::Stop;

use crate::chunk::ChunkWriter;
use crate::error::FormError;
use crate::iff::{ABIT, BMHD, BODY, CAMG, CMAP, Compression, FORM, FormKind, ModeFlags};
use crate::packbits;
use crate::packed::planes_for_colors;
use crate::palette::Palette;
use crate::planes::{self, EncodeOptions, PlaneLayout};

pub(crate) struct EncodeParams {
    pub kind: FormKind,
    pub planes: Option<u8>,
    pub compression: Compression,
    pub mode_flags: Option<ModeFlags>,
}

pub(crate) fn encode_form(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &Palette,
    params: &EncodeParams,
    stop: &dyn Stop,
) -> Result<Vec<u8>, FormError> {
    if params.compression == Compression::Strips {
        return Err(FormError::UnsupportedVariant(
            "strip compression is decode-only".into(),
        ));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(FormError::DimensionsTooLarge { width, height });
    }
    let planes = params
        .planes
        .unwrap_or_else(|| planes_for_colors(palette.len()));
    let layout = match params.kind {
        FormKind::Ilbm => PlaneLayout::Line,
        FormKind::Acbm => PlaneLayout::Contiguous,
    };

    // Rejects unaligned widths and undersized buffers before any write.
    let plane_data = planes::encode(
        pixels,
        width,
        height,
        palette,
        &EncodeOptions {
            planes: Some(planes),
            layout,
        },
    )?;
    stop.check()?;

    let bytes_per_line = width.div_ceil(16) as usize * 2;
    let body = match params.compression {
        Compression::PackBits => packbits::pack(&plane_data, bytes_per_line),
        _ => plane_data,
    };
    stop.check()?;

    let cmap = palette.resample(8);
    let mut w = ChunkWriter::new();
    w.start_chunk(FORM);
    w.write_tag(params.kind.type_tag());

    w.start_chunk(BMHD);
    w.write_u16(width as u16);
    w.write_u16(height as u16);
    w.write_i16(0); // x origin
    w.write_i16(0); // y origin
    w.write_u8(planes);
    w.write_u8(0); // no mask plane
    w.write_u8(params.compression.to_u8());
    w.write_u8(0); // pad
    w.write_u16(0); // transparent color
    w.write_u8(10); // x aspect
    w.write_u8(11); // y aspect
    w.write_i16(width.min(i16::MAX as u32) as i16);
    w.write_i16(height.min(i16::MAX as u32) as i16);
    w.end_chunk();

    if let Some(flags) = params.mode_flags {
        w.start_chunk(CAMG);
        w.write_u32(flags.0);
        w.end_chunk();
    }

    w.start_chunk(CMAP);
    for i in 0..cmap.len() {
        let c = cmap.color(i)?;
        w.write_u8(c.r);
        w.write_u8(c.g);
        w.write_u8(c.b);
    }
    w.end_chunk();

    let body_tag = match params.kind {
        FormKind::Ilbm => BODY,
        FormKind::Acbm => ABIT,
    };
    w.start_chunk(body_tag);
    w.write_bytes(&body);
    w.end_chunk();

    w.end_chunk();
    Ok(w.into_inner())
}
