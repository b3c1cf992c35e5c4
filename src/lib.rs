//! # planarform
//!
//! Codec for the planar ("bit-plane") bitmap encodings of 1980s–90s
//! graphics hardware (Amiga, Atari ST) and the IFF `FORM` containers
//! that wrap them.
//!
//! Everything operates on in-memory buffers — no file or network I/O.
//! The crate splits into a generic core and a container layer:
//!
//! - [`planes`] — geometry-driven bit-plane reader/writer supporting the
//!   three physical interleavings (contiguous/ACBM, line/ILBM,
//!   word-interleaved Atari), with [`planes::encode`]/[`planes::decode`]
//!   converting to and from RGBA8.
//! - [`Palette`] — indexed color tables at 1–8 bits per channel, with
//!   resampling, packed-value views, and Extra-Half-Brite doubling.
//! - [`packbits`] — the classic signed-control-byte run-length codec.
//! - [`vdat`] — the vertical-strip run-length decompressor used by
//!   strip-compressed bodies.
//! - [`chunk`] — nested tag + big-endian-length chunk streams, tolerant
//!   of writers that omit alignment pad bytes.
//! - [`DecodeRequest`]/[`EncodeRequest`] — the full container surface,
//!   including Hold-and-Modify, Extra-Half-Brite, and per-scanline
//!   raster palettes.
//!
//! ## Usage
//!
//! ```no_run
//! use planarform::{DecodeRequest, EncodeRequest, ImageInfo, Palette};
//! use enough::Unstoppable;
//!
//! let data: &[u8] = &[]; // your IFF bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.kind);
//!
//! // Decode to RGBA8
//! let decoded = DecodeRequest::new(data).decode(Unstoppable)?;
//!
//! // Re-encode
//! let palette = Palette::from_rgba_pixels(decoded.pixels());
//! let encoded = EncodeRequest::ilbm()
//!     .encode(decoded.pixels(), decoded.width, decoded.height, &palette, Unstoppable)?;
//! # Ok::<(), planarform::FormError>(())
//! ```
//!
//! ## Non-Goals
//!
//! - Color-space management beyond integer channel scaling
//! - Resizing, filtering, display
//! - Streaming decode — whole images are processed in one call

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod encode;
mod error;
mod info;
mod limits;
mod palette;
mod pixels;

pub mod chunk;
pub mod packbits;
pub mod packed;
pub mod planes;
pub mod vdat;

mod iff;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::FormError;
pub use iff::{Compression, FormKind, ModeFlags};
pub use info::ImageInfo;
pub use limits::Limits;
pub use packed::{planes_for_colors, read_packed_palette, write_packed_palette};
pub use palette::{Color, Palette};
pub use pixels::{PixelReader, PixelWriter};
