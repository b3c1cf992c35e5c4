use alloc::vec::Vec;

use enough::Stop;

use crate::error::FormError;
use crate::iff::encode::EncodeParams;
use crate::iff::{Compression, FormKind, ModeFlags};
use crate::palette::Palette;

/// Builder for encoding RGBA8 pixels into an IFF container.
///
/// The image width must be a multiple of 16 and every pixel color must
/// appear in the palette exactly.
///
/// ```no_run
/// use planarform::{Compression, EncodeRequest, Palette};
/// use enough::Unstoppable;
///
/// let pixels = vec![0u8; 16 * 4 * 4];
/// let palette = Palette::from_rgba_pixels(&pixels);
/// let encoded = EncodeRequest::ilbm()
///     .with_compression(Compression::PackBits)
///     .encode(&pixels, 16, 4, &palette, Unstoppable)?;
/// # Ok::<(), planarform::FormError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    kind: FormKind,
    planes: Option<u8>,
    compression: Compression,
    mode_flags: Option<ModeFlags>,
}

impl EncodeRequest {
    /// Line-interleaved container (`BODY` chunk).
    pub fn ilbm() -> Self {
        Self {
            kind: FormKind::Ilbm,
            planes: None,
            compression: Compression::None,
            mode_flags: None,
        }
    }

    /// Contiguous-plane container (`ABIT` chunk).
    pub fn acbm() -> Self {
        Self {
            kind: FormKind::Acbm,
            ..Self::ilbm()
        }
    }

    /// Override the plane count. Defaults to the smallest count able to
    /// index the palette.
    pub fn with_planes(mut self, planes: u8) -> Self {
        self.planes = Some(planes);
        self
    }

    /// Body compression. [`Compression::Strips`] is decode-only and is
    /// rejected at encode time.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Emit a `CAMG` display-mode chunk.
    pub fn with_mode_flags(mut self, flags: ModeFlags) -> Self {
        self.mode_flags = Some(flags);
        self
    }

    /// Encode to a fully-formed container buffer, trimmed to its final
    /// emitted length.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        palette: &Palette,
        stop: impl Stop,
    ) -> Result<Vec<u8>, FormError> {
        let params = EncodeParams {
            kind: self.kind,
            planes: self.planes,
            compression: self.compression,
            mode_flags: self.mode_flags,
        };
        crate::iff::encode::encode_form(pixels, width, height, palette, &params, &stop)
    }
}
