//! Nested tagged-length-value chunk streams (IFF style).
//!
//! A chunk is a 4-byte ASCII tag, a big-endian `u32` payload length, and
//! the payload itself. Streams are word-aligned: a chunk of odd length is
//! followed by one zero pad byte. Plenty of writers omit the pad, so the
//! reader probes for it instead of assuming it — a missing pad is never
//! an error.

use alloc::vec::Vec;

use crate::error::FormError;

/// Reader over a bounded chunk stream. [`ChunkReader::read_chunk`] yields
/// a sub-reader scoped to exactly one payload, which nests naturally for
/// container chunks whose payloads are chunk streams themselves.
#[derive(Clone, Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The full bounded view this reader was created over.
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormError> {
        let end = self.pos.checked_add(n).ok_or(FormError::UnexpectedEof)?;
        let bytes = self.data.get(self.pos..end).ok_or(FormError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), FormError> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_tag(&mut self) -> Result<[u8; 4], FormError> {
        let b = self.read_bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    pub fn read_u8(&mut self) -> Result<u8, FormError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16, FormError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, FormError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Look at the next chunk header without committing the cursor.
    ///
    /// Returns the tag and declared payload length, or `None` if fewer
    /// than 8 bytes remain. Used to probe for out-of-band trailing chunks
    /// that may or may not be present.
    pub fn peek_chunk(&self) -> Option<([u8; 4], usize)> {
        let b = self.data.get(self.pos..self.pos + 8)?;
        let tag = [b[0], b[1], b[2], b[3]];
        let len = u32::from_be_bytes([b[4], b[5], b[6], b[7]]) as usize;
        Some((tag, len))
    }

    /// Read one chunk header and yield a sub-reader over its payload.
    ///
    /// The parent cursor advances past the payload and, if the resulting
    /// position is odd and the following byte is zero, past the pad byte.
    pub fn read_chunk(&mut self) -> Result<([u8; 4], ChunkReader<'a>), FormError> {
        let tag = self.read_tag()?;
        let len = self.read_u32()? as usize;
        let payload = self.read_bytes(len)?;
        if self.pos % 2 == 1 && self.data.get(self.pos) == Some(&0) {
            self.pos += 1;
        }
        Ok((tag, ChunkReader::new(payload)))
    }
}

/// Writer building a chunk stream into an owned buffer.
///
/// Chunk nesting is strict stack discipline: every [`ChunkWriter::start_chunk`]
/// must be closed by [`ChunkWriter::end_chunk`], which back-patches the
/// length field in place. No partial length is ever committed — until
/// `end_chunk` runs, the field holds zero.
#[derive(Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
    stack: Vec<usize>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Open a chunk: pad to an even position, write the tag and a
    /// placeholder length, and remember where the length field lives.
    pub fn start_chunk(&mut self, tag: [u8; 4]) {
        if self.buf.len() % 2 == 1 {
            self.buf.push(0);
        }
        self.buf.extend_from_slice(&tag);
        self.stack.push(self.buf.len());
        self.buf.extend_from_slice(&[0; 4]);
    }

    /// Close the innermost open chunk, back-patching its length field.
    /// Returns the chunk's total size including the 8-byte header.
    ///
    /// # Panics
    ///
    /// Panics if no chunk is open — unbalanced calls are a programmer
    /// error, not a recoverable condition.
    pub fn end_chunk(&mut self) -> usize {
        let len_at = self
            .stack
            .pop()
            .expect("end_chunk without matching start_chunk");
        let payload_len = self.buf.len() - len_at - 4;
        self.buf[len_at..len_at + 4].copy_from_slice(&(payload_len as u32).to_be_bytes());
        payload_len + 8
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_tag(&mut self, tag: [u8; 4]) {
        self.buf.extend_from_slice(&tag);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Finish writing and take the buffer, already trimmed to the final
    /// emitted length.
    pub fn into_inner(self) -> Vec<u8> {
        debug_assert!(self.stack.is_empty(), "unclosed chunk at end of write");
        self.buf
    }
}
