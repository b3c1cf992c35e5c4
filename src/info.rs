use crate::chunk::ChunkReader;
use crate::error::FormError;
use crate::iff::{BMHD, Bmhd, CAMG, Compression, FORM, FormKind, ModeFlags, TYPE_ACBM, TYPE_ILBM};

/// Container properties probed from the header chunks, without decoding
/// any pixel data.
#[derive(Clone, Copy, Debug)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub planes: u8,
    pub compression: Compression,
    pub mode_flags: ModeFlags,
    pub kind: FormKind,
}

/// Known variants, tried in priority order. Detection is an explicit
/// sequence of parse attempts; only when every variant has been rejected
/// does the probe report an error.
const VARIANTS: [([u8; 4], FormKind); 2] = [(TYPE_ILBM, FormKind::Ilbm), (TYPE_ACBM, FormKind::Acbm)];

impl ImageInfo {
    /// Probe a buffer for a recognizable container header.
    pub fn from_bytes(data: &[u8]) -> Result<ImageInfo, FormError> {
        let mut last = FormError::UnrecognizedForm;
        for (type_tag, kind) in VARIANTS {
            match probe_variant(data, type_tag, kind) {
                Ok(info) => return Ok(info),
                Err(e) => last = e,
            }
        }
        Err(last)
    }
}

fn probe_variant(data: &[u8], type_tag: [u8; 4], kind: FormKind) -> Result<ImageInfo, FormError> {
    let mut outer = ChunkReader::new(data);
    let (tag, mut form) = outer.read_chunk().map_err(|_| FormError::UnrecognizedForm)?;
    if tag != FORM {
        return Err(FormError::UnrecognizedForm);
    }
    if form.read_tag()? != type_tag {
        return Err(FormError::UnsupportedVariant(alloc::format!(
            "FORM type is not {:?}",
            core::str::from_utf8(&type_tag).unwrap_or("????")
        )));
    }

    let mut header: Option<Bmhd> = None;
    let mut camg = 0u32;
    while !form.eof() {
        let (tag, mut sub) = form.read_chunk()?;
        match tag {
            t if t == BMHD => header = Some(Bmhd::parse(&mut sub)?),
            t if t == CAMG => camg = sub.read_u32()?,
            _ => {}
        }
    }

    let bmhd = header.ok_or_else(|| FormError::InvalidChunk("missing BMHD header".into()))?;
    Ok(ImageInfo {
        width: u32::from(bmhd.width),
        height: u32::from(bmhd.height),
        planes: bmhd.planes,
        compression: bmhd.compression,
        mode_flags: ModeFlags(camg),
        kind,
    })
}
