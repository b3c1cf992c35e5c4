//! Generic bit-plane pixel codec (internal geometry + public entry points).
//!
//! Converts between RGBA8 pixel buffers and raw planar data in any of the
//! three standard interleavings. The container orchestrator in
//! [`crate::iff`] drives the same reader/writer pair with its own row
//! handling; these free functions are the standalone surface.

mod geometry;
mod reader;
mod writer;

pub use geometry::{Cursor, Geometry};
pub use reader::PlaneReader;
pub use writer::PlaneWriter;

use alloc::vec;
use alloc::vec::Vec;

use crate::error::FormError;
use crate::packed::planes_for_colors;
use crate::palette::Palette;
use crate::pixels::{PixelReader, PixelWriter};

/// Physical on-disk interleaving of the bit planes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaneLayout {
    /// Whole plane after whole plane (ACBM).
    Contiguous,
    /// A scanline of every plane, then the next scanline (ILBM).
    #[default]
    Line,
    /// 16-bit words of each plane alternating within a scanline (Atari ST).
    Word,
}

impl PlaneLayout {
    /// Geometry preset for this layout.
    pub fn geometry(self, width: u32, height: u32, planes: u8) -> Geometry {
        match self {
            PlaneLayout::Contiguous => Geometry::contiguous(width, height, planes),
            PlaneLayout::Line => Geometry::line_interleaved(width, planes),
            PlaneLayout::Word => Geometry::word_interleaved(width, planes),
        }
    }

    /// Width rounded up to this layout's natural word size.
    pub fn padded_width(self, width: u32) -> u32 {
        match self {
            PlaneLayout::Contiguous | PlaneLayout::Line => width.div_ceil(8) * 8,
            PlaneLayout::Word => width.div_ceil(16) * 16,
        }
    }
}

/// Options for [`encode`]. `planes` defaults to the smallest count able
/// to index the palette.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodeOptions {
    pub planes: Option<u8>,
    pub layout: PlaneLayout,
}

/// Options for [`decode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeOptions {
    pub planes: Option<u8>,
    pub layout: PlaneLayout,
}

/// Encode an RGBA8 pixel buffer into planar data.
///
/// The width must be a multiple of 16; every pixel color must be present
/// in the palette exactly. Output is `width / 8 * height * planes` bytes.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &Palette,
    options: &EncodeOptions,
) -> Result<Vec<u8>, FormError> {
    if width % 16 != 0 {
        return Err(FormError::UnalignedWidth(width));
    }
    let needed = width as usize * height as usize * 4;
    if pixels.len() < needed {
        return Err(FormError::BufferTooSmall {
            needed,
            actual: pixels.len(),
        });
    }
    let planes = options
        .planes
        .unwrap_or_else(|| planes_for_colors(palette.len()));
    let out_size = width as usize / 8 * height as usize * usize::from(planes);
    let mut out = vec![0u8; out_size];

    let mut src = PixelReader::new(pixels, palette)?;
    let mut dst = PlaneWriter::new(&mut out, options.layout.geometry(width, height, planes));
    for _ in 0..width as usize * height as usize {
        dst.write(src.read()?)?;
    }
    Ok(out)
}

/// Decode planar data into a fresh RGBA8 pixel buffer.
///
/// Rows narrower than the layout's natural word size carry padding pixels
/// on disk; they are skipped, not emitted.
pub fn decode(
    data: &[u8],
    palette: &Palette,
    width: u32,
    height: u32,
    options: &DecodeOptions,
) -> Result<Vec<u8>, FormError> {
    let planes = options
        .planes
        .unwrap_or_else(|| planes_for_colors(palette.len()));
    let padded = options.layout.padded_width(width);
    let pad = (padded - width) as usize;

    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    let mut src = PlaneReader::new(data, options.layout.geometry(padded, height, planes));
    let mut dst = PixelWriter::new(&mut pixels, palette)?;
    for _ in 0..height {
        for _ in 0..width {
            dst.write(src.read()?)?;
        }
        src.advance(pad);
    }
    Ok(pixels)
}
