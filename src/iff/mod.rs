//! IFF `FORM` container orchestration for planar images (internal).
//!
//! Use the top-level [`crate::DecodeRequest`] and [`crate::EncodeRequest`].

pub(crate) mod decode;
pub(crate) mod encode;

use crate::chunk::ChunkReader;
use crate::error::FormError;

pub(crate) const FORM: [u8; 4] = *b"FORM";
pub(crate) const TYPE_ILBM: [u8; 4] = *b"ILBM";
pub(crate) const TYPE_ACBM: [u8; 4] = *b"ACBM";
pub(crate) const BMHD: [u8; 4] = *b"BMHD";
pub(crate) const CAMG: [u8; 4] = *b"CAMG";
pub(crate) const CMAP: [u8; 4] = *b"CMAP";
pub(crate) const BODY: [u8; 4] = *b"BODY";
pub(crate) const ABIT: [u8; 4] = *b"ABIT";
pub(crate) const SHAM: [u8; 4] = *b"SHAM";
pub(crate) const CTBL: [u8; 4] = *b"CTBL";
pub(crate) const RAST: [u8; 4] = *b"RAST";
pub(crate) const VDAT: [u8; 4] = *b"VDAT";

/// Container variant, named by the FORM type tag that selects it.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Line-interleaved body (`BODY` chunk).
    Ilbm,
    /// Contiguous body, one whole plane after another (`ABIT` chunk).
    Acbm,
}

impl FormKind {
    pub(crate) fn type_tag(self) -> [u8; 4] {
        match self {
            FormKind::Ilbm => TYPE_ILBM,
            FormKind::Acbm => TYPE_ACBM,
        }
    }
}

/// Body compression declared in the header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    /// Generic byte run-length encoding, one scanline at a time.
    PackBits,
    /// Vertical 16-bit strip runs in nested `VDAT` chunks (decode only).
    Strips,
}

impl Compression {
    pub(crate) fn from_u8(v: u8) -> Result<Self, FormError> {
        match v {
            0 => Ok(Compression::None),
            1 => Ok(Compression::PackBits),
            2 => Ok(Compression::Strips),
            other => Err(FormError::UnsupportedVariant(alloc::format!(
                "unknown compression mode {other}"
            ))),
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Compression::None => 0,
            Compression::PackBits => 1,
            Compression::Strips => 2,
        }
    }
}

/// Display mode bitmask from the `CAMG` chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeFlags(pub u32);

impl ModeFlags {
    pub const INTERLACE: u32 = 1 << 2;
    pub const EXTRA_HALF_BRITE: u32 = 1 << 7;
    pub const HOLD_AND_MODIFY: u32 = 1 << 11;
    pub const HIRES: u32 = 1 << 15;

    pub fn interlace(self) -> bool {
        self.0 & Self::INTERLACE != 0
    }

    pub fn extra_half_brite(self) -> bool {
        self.0 & Self::EXTRA_HALF_BRITE != 0
    }

    pub fn hold_and_modify(self) -> bool {
        self.0 & Self::HOLD_AND_MODIFY != 0
    }

    pub fn hires(self) -> bool {
        self.0 & Self::HIRES != 0
    }
}

/// Parsed `BMHD` header. Field order and widths follow the on-disk
/// big-endian layout exactly.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bmhd {
    pub width: u16,
    pub height: u16,
    pub x_origin: i16,
    pub y_origin: i16,
    pub planes: u8,
    pub mask: u8,
    pub compression: Compression,
    pub transparent_color: u16,
    pub x_aspect: u8,
    pub y_aspect: u8,
    pub page_width: i16,
    pub page_height: i16,
}

impl Bmhd {
    pub(crate) fn parse(r: &mut ChunkReader<'_>) -> Result<Self, FormError> {
        let width = r.read_u16()?;
        let height = r.read_u16()?;
        let x_origin = r.read_i16()?;
        let y_origin = r.read_i16()?;
        let planes = r.read_u8()?;
        let mask = r.read_u8()?;
        let compression = Compression::from_u8(r.read_u8()?)?;
        let _pad = r.read_u8()?;
        let transparent_color = r.read_u16()?;
        let x_aspect = r.read_u8()?;
        let y_aspect = r.read_u8()?;
        let page_width = r.read_i16()?;
        let page_height = r.read_i16()?;

        if width == 0 || height == 0 {
            return Err(FormError::InvalidChunk(alloc::format!(
                "degenerate dimensions {width}x{height}"
            )));
        }
        if planes == 0 || planes > 8 {
            return Err(FormError::UnsupportedVariant(alloc::format!(
                "plane count {planes} out of range"
            )));
        }

        Ok(Self {
            width,
            height,
            x_origin,
            y_origin,
            planes,
            mask,
            compression,
            transparent_color,
            x_aspect,
            y_aspect,
            page_width,
            page_height,
        })
    }

    /// Word-aligned bytes per scanline of one plane.
    pub(crate) fn bytes_per_line(&self) -> usize {
        u32::from(self.width).div_ceil(16) as usize * 2
    }
}
