//! Vertical strip run-length decompressor for `VDAT` plane data.
//!
//! One compressed stream covers one bit plane. Output is addressed in
//! 16-bit column strips: each emitted word lands at `(x, y)` in the plane
//! buffer, the cursor then moves down the column and wraps to the next
//! 2-byte column when it reaches the bottom. Command bytes are signed:
//!
//! - `c == 0`: copy count follows as a 16-bit field, then that many raw words
//! - `c == 1`: run length follows as a 16-bit field, then one word to repeat
//! - `c < 0`: copy `-c` raw words
//! - `c > 1`: repeat the next word `c` times
//!
//! Malformed streams are common in the wild; a command that overruns the
//! source or the plane simply stops the decode instead of failing.

pub fn depack_strips(src: &[u8], plane: &mut [u8], bytes_per_line: usize, height: usize) {
    debug_assert!(plane.len() >= bytes_per_line * height);

    let mut pos = 0usize;
    let mut x = 0usize;
    let mut y = 0usize;

    let read_u16 = |pos: &mut usize| -> Option<u16> {
        let w = src.get(*pos..*pos + 2)?;
        *pos += 2;
        Some(u16::from_be_bytes([w[0], w[1]]))
    };

    while pos < src.len() && x < bytes_per_line {
        let cmd = src[pos] as i8;
        pos += 1;

        let (count, repeat) = match cmd {
            0 => match read_u16(&mut pos) {
                Some(n) => (usize::from(n), false),
                None => return,
            },
            1 => match read_u16(&mut pos) {
                Some(n) => (usize::from(n), true),
                None => return,
            },
            c if c < 0 => (-isize::from(c) as usize, false),
            c => (c as usize, true),
        };

        let run_word = if repeat {
            match read_u16(&mut pos) {
                Some(w) => w.to_be_bytes(),
                None => return,
            }
        } else {
            [0, 0]
        };

        for _ in 0..count {
            if x >= bytes_per_line {
                return;
            }
            let word = if repeat {
                run_word
            } else {
                match read_u16(&mut pos) {
                    Some(w) => w.to_be_bytes(),
                    None => return,
                }
            };
            let off = y * bytes_per_line + x;
            plane[off] = word[0];
            plane[off + 1] = word[1];
            y += 1;
            if y == height {
                y = 0;
                x += 2;
            }
        }
    }
}
