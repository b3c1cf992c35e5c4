use crate::error::FormError;
use crate::planes::geometry::{Cursor, Geometry};

/// Single-pass pixel writer into an encoded plane buffer.
///
/// Bits are OR-ed into the destination, never cleared, so the buffer must
/// start zeroed. Writing past the buffer end is a hard error.
pub struct PlaneWriter<'a> {
    data: &'a mut [u8],
    geometry: Geometry,
    cursor: Cursor,
}

impl<'a> PlaneWriter<'a> {
    pub fn new(data: &'a mut [u8], geometry: Geometry) -> Self {
        Self {
            data,
            geometry,
            cursor: Cursor::default(),
        }
    }

    pub fn position(&self) -> Cursor {
        self.cursor
    }

    /// Encode one pixel's color index into every plane.
    pub fn write(&mut self, index: usize) -> Result<(), FormError> {
        let len = self.data.len();
        // Validate the whole byte column up front so an overrun fails even
        // when the index contributes no set bits.
        for plane in 0..self.geometry.plane_count {
            let offset = self.geometry.offset(self.cursor, plane);
            if offset >= len {
                return Err(FormError::OutOfBounds { offset, len });
            }
        }
        let mask = 1u8 << (7 - self.cursor.bit);
        for plane in 0..self.geometry.plane_count {
            if (index >> plane) & 1 == 1 {
                let offset = self.geometry.offset(self.cursor, plane);
                self.data[offset] |= mask;
            }
        }
        self.cursor.step(&self.geometry);
        Ok(())
    }

    /// Step the cursor forward `n` pixels, leaving padding bits clear.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.cursor.step(&self.geometry);
        }
    }
}
