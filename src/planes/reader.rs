use crate::error::FormError;
use crate::planes::geometry::{Cursor, Geometry};

/// Single-pass pixel reader over an encoded plane buffer.
///
/// Bits decode eight pixels at a time: one byte from every plane at the
/// current byte column yields eight color indices, cached until the
/// cursor's bit position wraps. Pixel bit `i` of the color index comes
/// from plane `i`; within a byte the most significant bit is the leftmost
/// pixel.
pub struct PlaneReader<'a> {
    data: &'a [u8],
    geometry: Geometry,
    cursor: Cursor,
    cache: [usize; 8],
    cache_valid: bool,
}

impl<'a> PlaneReader<'a> {
    pub fn new(data: &'a [u8], geometry: Geometry) -> Self {
        Self {
            data,
            geometry,
            cursor: Cursor::default(),
            cache: [0; 8],
            cache_valid: false,
        }
    }

    /// Current cursor position.
    pub fn position(&self) -> Cursor {
        self.cursor
    }

    /// Whether the cursor has moved past the end of the buffer.
    pub fn eof(&self) -> bool {
        self.geometry.offset(self.cursor, 0) >= self.data.len()
    }

    /// Decode the color index of the next pixel.
    ///
    /// Reading past the buffer end is a hard error, never a silent zero.
    pub fn read(&mut self) -> Result<usize, FormError> {
        if !self.cache_valid {
            self.fill_cache()?;
        }
        let index = self.cache[usize::from(self.cursor.bit)];
        self.step();
        Ok(index)
    }

    /// Step the cursor forward `n` pixels without producing output.
    /// Used to skip row padding when the image width is narrower than the
    /// plane's natural word size.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.cursor.step(&self.geometry);
        }
        self.cache_valid = false;
    }

    fn step(&mut self) {
        self.cursor.step(&self.geometry);
        if self.cursor.bit == 0 {
            self.cache_valid = false;
        }
    }

    fn fill_cache(&mut self) -> Result<(), FormError> {
        self.cache = [0; 8];
        for plane in 0..self.geometry.plane_count {
            let offset = self.geometry.offset(self.cursor, plane);
            let byte = *self.data.get(offset).ok_or(FormError::OutOfBounds {
                offset,
                len: self.data.len(),
            })?;
            for (i, slot) in self.cache.iter_mut().enumerate() {
                *slot |= usize::from((byte >> (7 - i)) & 1) << plane;
            }
        }
        self.cache_valid = true;
        Ok(())
    }
}
