//! Monte-Carlo photo-electrons (type 2025): arrival times of the
//! simulated photo-electrons, per non-empty pixel of one telescope.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 1;

#[derive(Debug, Clone)]
pub struct PixelPhotoelectrons {
    pub pixel: i32,
    pub times: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct McPhotoelectrons {
    /// Telescope slot index, from the object id.
    pub tel_index: i32,
    pub n_pe: i32,
    pub n_pixels: usize,
    /// Per non-empty pixel: arrival times in ns.
    pub pixels: Vec<PixelPhotoelectrons>,
    /// Photo-electron amplitudes parallel to the times (v1+, only
    /// when amplitudes were simulated).
    pub amplitudes: Vec<Vec<f32>>,
    pub partial: bool,
}

impl McPhotoelectrons {
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

        let n_pe = p.read::<i32>()?;
        let n_pixels = p.read::<i32>()?.max(0) as usize;
        let with_amplitudes = if version >= 1 {
            p.read::<i16>()? != 0
        } else {
            false
        };
        let n_nonempty = p.read::<i32>()?.max(0) as usize;

        let mut pixels = Vec::with_capacity(n_nonempty);
        let mut amplitudes = Vec::new();
        for _ in 0..n_nonempty {
            let pixel = p.read::<i32>()?;
            if pixel < 0 || pixel as usize >= n_pixels {
                return Err(EventioError::InvalidPixelList {
                    object_type: header.type_code(),
                    offset: header.offset(),
                    pixel: pixel as i64,
                    num_pixels: n_pixels,
                });
            }
            let n = p.read::<i32>()?.max(0) as usize;
            let times = p.read_vec::<f32>(n)?;
            if with_amplitudes {
                amplitudes.push(p.read_vec::<f32>(n)?);
            }
            pixels.push(PixelPhotoelectrons { pixel, times });
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_index: header.id(),
            n_pe,
            n_pixels,
            pixels,
            amplitudes,
            partial,
        })
    }
}
