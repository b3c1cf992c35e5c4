//! Indexed color tables with arbitrary channel bit depth (1–8 bits).
//!
//! A [`Palette`] is a fixed-length sequence of [`Color`] slots sharing one
//! channel depth. Entries start unset and must be written before they are
//! read; reading an unset slot is a format error, not a default color.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::FormError;

/// One palette entry. Channels are clamped to the owning palette's depth
/// at insertion and immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Fixed-length indexed color table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Option<Color>>,
    bits_per_channel: u8,
}

impl Palette {
    /// Allocate `count` unset color slots at the given channel depth.
    ///
    /// # Panics
    ///
    /// Panics if `bits_per_channel` is outside `1..=8`.
    pub fn new(count: usize, bits_per_channel: u8) -> Self {
        assert!(
            (1..=8).contains(&bits_per_channel),
            "bits_per_channel must be 1..=8, got {bits_per_channel}"
        );
        Self {
            entries: vec![None; count],
            bits_per_channel,
        }
    }

    /// Number of color slots (set or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.bits_per_channel
    }

    /// Largest representable channel value at this depth.
    pub fn channel_max(&self) -> u8 {
        ((1u16 << self.bits_per_channel) - 1) as u8
    }

    /// Set entry `index`, clamping each channel to the palette's depth.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range — a programmer error, unlike the
    /// recoverable lookup failures on the read side.
    pub fn set_color(&mut self, index: usize, r: u8, g: u8, b: u8, a: u8) {
        let max = self.channel_max();
        self.entries[index] = Some(Color {
            r: r.min(max),
            g: g.min(max),
            b: b.min(max),
            a: a.min(max),
        });
    }

    /// Set entry `index` with full alpha.
    pub fn set_rgb(&mut self, index: usize, r: u8, g: u8, b: u8) {
        let max = self.channel_max();
        self.set_color(index, r, g, b, max);
    }

    /// Read entry `index`; fails if the slot is unset or out of range.
    pub fn color(&self, index: usize) -> Result<Color, FormError> {
        self.entries
            .get(index)
            .copied()
            .flatten()
            .ok_or(FormError::BadPaletteIndex { index })
    }

    /// Rescale every channel to a new depth, producing a new palette.
    /// Unset slots stay unset.
    pub fn resample(&self, bits_per_channel: u8) -> Palette {
        if bits_per_channel == self.bits_per_channel {
            return self.clone();
        }
        let old_max = u32::from(self.channel_max());
        let new_max = (1u32 << bits_per_channel) - 1;
        let scale = |v: u8| ((u32::from(v) * new_max * 2 + old_max) / (old_max * 2)) as u8;
        let entries = self
            .entries
            .iter()
            .map(|slot| {
                slot.map(|c| Color {
                    r: scale(c.r),
                    g: scale(c.g),
                    b: scale(c.b),
                    a: scale(c.a),
                })
            })
            .collect();
        Palette {
            entries,
            bits_per_channel,
        }
    }

    /// Pack every entry into one unsigned integer per color.
    ///
    /// Channels pack MSB-first in r,g,b\[,a\] order: each channel occupies
    /// `bits_per_channel` bits, red in the most significant position. At
    /// 8 bits with alpha this is the big-endian RGBA32 value of the color.
    pub fn to_values(&self, alpha: bool) -> Result<Vec<u32>, FormError> {
        let n = u32::from(self.bits_per_channel);
        self.entries
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let c = slot.ok_or(FormError::BadPaletteIndex { index })?;
                let v = if alpha {
                    u32::from(c.r) << (3 * n)
                        | u32::from(c.g) << (2 * n)
                        | u32::from(c.b) << n
                        | u32::from(c.a)
                } else {
                    u32::from(c.r) << (2 * n) | u32::from(c.g) << n | u32::from(c.b)
                };
                Ok(v)
            })
            .collect()
    }

    /// Inverse of [`Palette::to_values`].
    pub fn from_values(values: &[u32], bits_per_channel: u8, alpha: bool) -> Palette {
        let mut pal = Palette::new(values.len(), bits_per_channel);
        let n = u32::from(bits_per_channel);
        let mask = (1u32 << n) - 1;
        let max = pal.channel_max();
        for (i, &v) in values.iter().enumerate() {
            if alpha {
                pal.set_color(
                    i,
                    ((v >> (3 * n)) & mask) as u8,
                    ((v >> (2 * n)) & mask) as u8,
                    ((v >> n) & mask) as u8,
                    (v & mask) as u8,
                );
            } else {
                pal.set_color(
                    i,
                    ((v >> (2 * n)) & mask) as u8,
                    ((v >> n) & mask) as u8,
                    (v & mask) as u8,
                    max,
                );
            }
        }
        pal
    }

    /// Build an 8-bit palette from the unique RGBA values in a pixel
    /// buffer, in first-seen order. Trailing bytes short of a full pixel
    /// are ignored.
    pub fn from_rgba_pixels(pixels: &[u8]) -> Palette {
        let mut seen: Vec<u32> = Vec::new();
        for px in pixels.chunks_exact(4) {
            let v = u32::from_be_bytes([px[0], px[1], px[2], px[3]]);
            if !seen.contains(&v) {
                seen.push(v);
            }
        }
        Palette::from_values(&seen, 8, true)
    }

    /// New palette holding only the first `len` entries. Used to trim
    /// CMAPs that writers pad past the displayable count.
    pub fn truncated(&self, len: usize) -> Palette {
        Palette {
            entries: self.entries.iter().take(len).copied().collect(),
            bits_per_channel: self.bits_per_channel,
        }
    }

    /// Two-entry 8-bit palette: white, then black.
    pub fn monochrome() -> Palette {
        let mut pal = Palette::new(2, 8);
        pal.set_color(0, 255, 255, 255, 255);
        pal.set_color(1, 0, 0, 0, 255);
        pal
    }

    /// Double a 32-color palette into the 64-entry Extra-Half-Brite table.
    ///
    /// Entries 0–31 are the first 32 input colors (rescaled to 8 bits);
    /// entries 32–63 are the same colors at half intensity. Fails if the
    /// input supplies fewer than 32 set colors.
    pub fn extend_half_brite(palette: &Palette) -> Result<Palette, FormError> {
        if palette.len() < 32 {
            return Err(FormError::BufferTooSmall {
                needed: 32,
                actual: palette.len(),
            });
        }
        let base = palette.resample(8);
        let mut out = Palette::new(64, 8);
        for i in 0..32 {
            let c = base.color(i)?;
            out.set_color(i, c.r, c.g, c.b, c.a);
            out.set_color(i + 32, c.r / 2, c.g / 2, c.b / 2, c.a / 2);
        }
        Ok(out)
    }
}
