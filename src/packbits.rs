//! Byte-oriented run-length codec (classic PackBits control bytes).
//!
//! Control byte `n` as a signed 8-bit value:
//! - `-128`: no-op, skipped.
//! - `n < 0`: the next byte repeats `1 - n` times.
//! - `n >= 0`: the next `1 + n` bytes are literal.
//!
//! The packer works one scanline at a time and never lets a run or a
//! literal dump cross a line boundary; decoders size their working buffer
//! to a single scanline and would overflow otherwise.

use alloc::vec::Vec;

use crate::error::FormError;

/// Decompress until exactly `out_size` bytes have been produced.
///
/// A final run or literal group reaching past `out_size` is truncated;
/// running out of input first is an error.
pub fn depack(src: &[u8], out_size: usize) -> Result<Vec<u8>, FormError> {
    let mut out = Vec::with_capacity(out_size);
    let mut pos = 0usize;
    while out.len() < out_size {
        let ctrl = *src.get(pos).ok_or(FormError::UnexpectedEof)? as i8;
        pos += 1;
        if ctrl == -128 {
            continue;
        }
        if ctrl < 0 {
            let byte = *src.get(pos).ok_or(FormError::UnexpectedEof)?;
            pos += 1;
            let count = (1 - isize::from(ctrl)) as usize;
            let take = count.min(out_size - out.len());
            out.extend(core::iter::repeat_n(byte, take));
        } else {
            let count = usize::from(ctrl as u8) + 1;
            let literal = src
                .get(pos..pos + count)
                .ok_or(FormError::UnexpectedEof)?;
            pos += count;
            let take = count.min(out_size - out.len());
            out.extend_from_slice(&literal[..take]);
        }
    }
    Ok(out)
}

/// Compress `data` line by line in `bytes_per_line` chunks.
///
/// # Panics
///
/// Panics if `bytes_per_line` is zero.
pub fn pack(data: &[u8], bytes_per_line: usize) -> Vec<u8> {
    assert!(bytes_per_line > 0, "bytes_per_line must be nonzero");
    let mut out = Vec::new();
    for line in data.chunks(bytes_per_line) {
        pack_line(line, &mut out);
    }
    out
}

enum Mode {
    Raw,
    Run,
}

fn flush_literal(bytes: &[u8], out: &mut Vec<u8>) {
    debug_assert!((1..=128).contains(&bytes.len()));
    out.push((bytes.len() - 1) as u8);
    out.extend_from_slice(bytes);
}

fn flush_run(byte: u8, len: usize, out: &mut Vec<u8>) {
    debug_assert!((2..=128).contains(&len));
    out.push((-((len - 1) as i8)) as u8);
    out.push(byte);
}

fn pack_line(line: &[u8], out: &mut Vec<u8>) {
    let mut mode = Mode::Raw;
    let mut dump: Vec<u8> = Vec::with_capacity(128);
    let mut run_byte = 0u8;
    let mut run_len = 0usize;

    for &b in line {
        match mode {
            Mode::Raw => {
                dump.push(b);
                let n = dump.len();
                if n >= 3 && dump[n - 1] == dump[n - 2] && dump[n - 2] == dump[n - 3] {
                    // Three equal bytes promote the tail into a run.
                    if n > 3 {
                        flush_literal(&dump[..n - 3], out);
                    }
                    dump.clear();
                    run_byte = b;
                    run_len = 3;
                    mode = Mode::Run;
                } else if n == 128 {
                    flush_literal(&dump, out);
                    dump.clear();
                }
            }
            Mode::Run => {
                if b == run_byte && run_len < 128 {
                    run_len += 1;
                } else {
                    flush_run(run_byte, run_len, out);
                    dump.clear();
                    dump.push(b);
                    mode = Mode::Raw;
                }
            }
        }
    }

    match mode {
        Mode::Raw => {
            if !dump.is_empty() {
                flush_literal(&dump, out);
            }
        }
        Mode::Run => flush_run(run_byte, run_len, out),
    }
}
