//! Bridge between 32-bit RGBA pixel buffers and palette indices.
//!
//! Lookup is exact: the palette must cover every color in the image, and a
//! miss surfaces the offending RGBA value instead of snapping to the
//! nearest entry. Both sides support swapping the palette mid-pass for
//! per-scanline or per-effect palette changes without restarting the
//! cursor — the packed-value view is replaced, the position is not.

use alloc::vec::Vec;

use crate::error::FormError;
use crate::palette::Palette;

/// Reads RGBA8 pixels and resolves each to its palette index.
pub struct PixelReader<'a> {
    pixels: &'a [u8],
    pos: usize,
    values: Vec<u32>,
}

impl<'a> PixelReader<'a> {
    pub fn new(pixels: &'a [u8], palette: &Palette) -> Result<Self, FormError> {
        Ok(Self {
            pixels,
            pos: 0,
            values: packed_values(palette)?,
        })
    }

    /// Swap the active palette without disturbing the cursor.
    pub fn set_palette(&mut self, palette: &Palette) -> Result<(), FormError> {
        self.values = packed_values(palette)?;
        Ok(())
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.pixels.len()
    }

    /// Resolve the next pixel to a palette index.
    pub fn read(&mut self) -> Result<usize, FormError> {
        let px = self
            .pixels
            .get(self.pos..self.pos + 4)
            .ok_or(FormError::UnexpectedEof)?;
        self.pos += 4;
        let value = u32::from_be_bytes([px[0], px[1], px[2], px[3]]);
        self.values
            .iter()
            .position(|&v| v == value)
            .ok_or(FormError::ColorNotFound { value })
    }

    /// Skip `n` pixels (4 bytes each).
    pub fn advance(&mut self, n: usize) {
        self.pos += n * 4;
    }
}

/// Writes palette entries (or raw packed values) as RGBA8 pixels.
pub struct PixelWriter<'a> {
    pixels: &'a mut [u8],
    pos: usize,
    values: Vec<u32>,
}

impl<'a> PixelWriter<'a> {
    pub fn new(pixels: &'a mut [u8], palette: &Palette) -> Result<Self, FormError> {
        Ok(Self {
            pixels,
            pos: 0,
            values: packed_values(palette)?,
        })
    }

    /// Swap the active palette without disturbing the cursor.
    pub fn set_palette(&mut self, palette: &Palette) -> Result<(), FormError> {
        self.values = packed_values(palette)?;
        Ok(())
    }

    /// Write `palette[index]` to the next pixel slot.
    pub fn write(&mut self, index: usize) -> Result<(), FormError> {
        let value = *self
            .values
            .get(index)
            .ok_or(FormError::BadPaletteIndex { index })?;
        self.write_value(value)
    }

    /// Write a raw packed RGBA value, bypassing the palette. Used by the
    /// Hold-and-Modify decoder, whose colors are not palette entries.
    pub fn write_value(&mut self, value: u32) -> Result<(), FormError> {
        let len = self.pixels.len();
        let slot = self
            .pixels
            .get_mut(self.pos..self.pos + 4)
            .ok_or(FormError::OutOfBounds {
                offset: self.pos,
                len,
            })?;
        slot.copy_from_slice(&value.to_be_bytes());
        self.pos += 4;
        Ok(())
    }

    /// Skip `n` pixels (4 bytes each).
    pub fn advance(&mut self, n: usize) {
        self.pos += n * 4;
    }
}

fn packed_values(palette: &Palette) -> Result<Vec<u32>, FormError> {
    palette.resample(8).to_values(true)
}
