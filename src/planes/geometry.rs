//! Byte addressing for the three physical bit-plane interleavings.

/// Pure configuration describing where plane bytes live in a buffer.
///
/// The offset of any byte is
/// `byte + block * block_step + line * line_step + plane * plane_step`;
/// the three presets only differ in how they populate these six fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub bytes_per_block: usize,
    pub block_step: usize,
    pub blocks_per_line: usize,
    pub line_step: usize,
    pub plane_step: usize,
    pub plane_count: usize,
}

impl Geometry {
    /// All bytes of one plane together, then the next plane (ACBM).
    pub fn contiguous(width: u32, height: u32, planes: u8) -> Self {
        let plane_size = width.div_ceil(8) as usize * height as usize;
        Self {
            bytes_per_block: plane_size,
            block_step: 0,
            blocks_per_line: 1,
            line_step: 0,
            plane_step: plane_size,
            plane_count: usize::from(planes),
        }
    }

    /// One scanline of every plane, then the next scanline (ILBM).
    pub fn line_interleaved(width: u32, planes: u8) -> Self {
        let row = width.div_ceil(8) as usize;
        Self {
            bytes_per_block: row,
            block_step: 0,
            blocks_per_line: 1,
            line_step: row * usize::from(planes),
            plane_step: row,
            plane_count: usize::from(planes),
        }
    }

    /// 16-bit words of each plane alternating within a scanline (Atari ST).
    pub fn word_interleaved(width: u32, planes: u8) -> Self {
        let blocks = width.div_ceil(16) as usize;
        let planes = usize::from(planes);
        Self {
            bytes_per_block: 2,
            block_step: planes * 2,
            blocks_per_line: blocks,
            line_step: blocks * planes * 2,
            plane_step: 2,
            plane_count: planes,
        }
    }

    pub(crate) fn offset(&self, cursor: Cursor, plane: usize) -> usize {
        cursor.byte
            + cursor.block * self.block_step
            + cursor.line * self.line_step
            + plane * self.plane_step
    }
}

/// Mutable read/write position inside a plane buffer.
///
/// Advances in a fixed nesting order — bit fastest, then byte, block,
/// line — and never moves backward during a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub byte: usize,
    pub block: usize,
    pub line: usize,
    pub bit: u8,
}

impl Cursor {
    pub(crate) fn step(&mut self, geometry: &Geometry) {
        self.bit += 1;
        if self.bit < 8 {
            return;
        }
        self.bit = 0;
        self.byte += 1;
        if self.byte < geometry.bytes_per_block {
            return;
        }
        self.byte = 0;
        self.block += 1;
        if self.block < geometry.blocks_per_line {
            return;
        }
        self.block = 0;
        self.line += 1;
    }
}
