//! Pixel list (type 2027): a list of pixels selected by the online
//! analysis (image, trigger, ...). The purpose code and telescope id
//! share the object id; codes of 2 and above carry per-pixel
//! amplitudes.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    support::{read_count, read_pixel_indices},
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 1;

#[derive(Debug, Clone)]
pub struct PixelList {
    pub tel_id: i32,
    /// Purpose code: what the listed pixels were selected for.
    pub code: i32,
    pub pixels: Vec<u32>,
    /// Amplitudes parallel to `pixels`, codes ≥ 2 only.
    pub amplitudes: Vec<f32>,
    pub partial: bool,
}

impl PixelList {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let version = header.version();
        let partial = version > SUPPORTED_VERSION;
        if partial {
            ctx.warn_unsupported(header);
        }
        let code = header.id() / 1_000_000;
        let tel_id = header.id() % 1_000_000;

        // counts and entries widen to varints in v1
        let wide = version >= 1;
        let n = read_count(p, wide)?;
        let pixels = read_pixel_indices(p, n, wide)?;
        let amplitudes = if code >= 2 {
            p.read_vec::<f32>(n)?
        } else {
            Vec::new()
        };

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id,
            code,
            pixels,
            amplitudes,
            partial,
        })
    }
}
