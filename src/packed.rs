//! Packed hardware palette words (Atari ST / STE).
//!
//! Palettes travel as 16-bit big-endian words, one per color. The base
//! variant carries 3 bits per channel in the low bits of each nibble
//! (`0x0RGB`). The STE variant adds a fourth bit per channel in the
//! nibble's high bit, stored rotated: bit 3 of the nibble is the *low*
//! bit of the 4-bit value. A set high bit anywhere in the table is what
//! identifies the extended variant.

use alloc::vec::Vec;

use crate::error::FormError;
use crate::palette::Palette;

/// High nibble-bits across all three channels of a word.
const EXTENDED_MASK: u16 = 0x0888;

fn unrotate(nibble: u16) -> u8 {
    (((nibble & 7) << 1) | ((nibble >> 3) & 1)) as u8
}

fn rotate(value: u8) -> u16 {
    (u16::from(value) >> 1) | (u16::from(value & 1) << 3)
}

/// Read a packed palette, auto-detecting the 3-bit or extended 4-bit
/// variant. The returned palette keeps the native channel depth; callers
/// resample as needed.
pub fn read_packed_palette(data: &[u8]) -> Result<Palette, FormError> {
    if data.len() % 2 != 0 {
        return Err(FormError::InvalidChunk(alloc::format!(
            "packed palette length {} is not word-aligned",
            data.len()
        )));
    }
    let words: Vec<u16> = data
        .chunks_exact(2)
        .map(|w| u16::from_be_bytes([w[0], w[1]]))
        .collect();

    let extended = words.iter().any(|w| w & EXTENDED_MASK != 0);
    let bits = if extended { 4 } else { 3 };
    let mut pal = Palette::new(words.len(), bits);
    for (i, &w) in words.iter().enumerate() {
        let (r, g, b) = if extended {
            (unrotate(w >> 8), unrotate(w >> 4), unrotate(w))
        } else {
            (((w >> 8) & 7) as u8, ((w >> 4) & 7) as u8, (w & 7) as u8)
        };
        pal.set_rgb(i, r, g, b);
    }
    Ok(pal)
}

/// Write a palette as packed words. The palette depth picks the variant:
/// 3 bits per channel for the base format, 4 for the extended rotated
/// encoding. Other depths must be resampled first.
pub fn write_packed_palette(palette: &Palette) -> Result<Vec<u8>, FormError> {
    let bits = palette.bits_per_channel();
    if bits != 3 && bits != 4 {
        return Err(FormError::UnsupportedVariant(alloc::format!(
            "packed palettes hold 3- or 4-bit channels, got {bits}"
        )));
    }
    let mut out = Vec::with_capacity(palette.len() * 2);
    for i in 0..palette.len() {
        let c = palette.color(i)?;
        let word = if bits == 4 {
            rotate(c.r) << 8 | rotate(c.g) << 4 | rotate(c.b)
        } else {
            u16::from(c.r) << 8 | u16::from(c.g) << 4 | u16::from(c.b)
        };
        out.extend_from_slice(&word.to_be_bytes());
    }
    Ok(out)
}

/// Minimum bit-plane count able to index `colors` palette entries.
pub fn planes_for_colors(colors: usize) -> u8 {
    let planes = usize::BITS - colors.saturating_sub(1).leading_zeros();
    planes.max(1) as u8
}
