use alloc::vec::Vec;

use enough::Stop;

use crate::error::FormError;
use crate::iff::FormKind;
use crate::limits::Limits;

/// Decoded container output: RGBA8 pixels plus dimensions.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Which container variant the data turned out to be.
    pub kind: FormKind,
}

impl DecodeOutput {
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32, kind: FormKind) -> Self {
        Self {
            pixels,
            width,
            height,
            kind,
        }
    }

    /// Access the pixel data (4 bytes per pixel, r,g,b,a).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Builder for decoding an IFF container from an in-memory buffer.
///
/// ```no_run
/// use planarform::DecodeRequest;
/// use enough::Unstoppable;
///
/// let data: &[u8] = &[]; // your IFF bytes
/// let decoded = DecodeRequest::new(data).decode(Unstoppable)?;
/// let _rgba = decoded.pixels();
/// # Ok::<(), planarform::FormError>(())
/// ```
#[derive(Clone)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Apply resource limits, checked after the header parse and before
    /// output allocation.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode the container to RGBA8.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, FormError> {
        crate::iff::decode::decode_form(self.data, self.limits, &stop)
    }
}
