//! Pixel settings (type 2004): high voltage and trigger thresholds
//! per pixel, plus the DAQ configuration and, from version 2, the
//! reference pulse shapes.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct PixelSetting {
    pub tel_id: i32,
    pub setup_id: i16,
    pub trigger_mode: i16,
    pub min_pixel_mult: i32,
    pub n_pixels: usize,
    /// Applied high voltage per pixel, DAC counts.
    pub pixel_hv: Vec<u16>,
    /// Discriminator threshold per pixel, DAC counts.
    pub pixel_threshold: Vec<u16>,
    /// DAQ configuration (v1+).
    pub n_samples: Option<i32>,
    pub sum_bins: Option<i32>,
    pub sum_offset: Option<i32>,
    /// Reference pulse shapes (v2+): one shape per gain, sampled on
    /// a common time step in ns.
    pub ref_step: Option<f32>,
    pub ref_shape: Vec<Vec<f32>>,
    pub partial: bool,
}

impl PixelSetting {
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

        let setup_id = p.read::<i16>()?;
        let trigger_mode = p.read::<i16>()?;
        let min_pixel_mult = p.read::<i32>()?;
        let n_pixels = p.read::<i32>()?.max(0) as usize;
        let pixel_hv = p.read_vec::<u16>(n_pixels)?;
        let pixel_threshold = p.read_vec::<u16>(n_pixels)?;

        let (mut n_samples, mut sum_bins, mut sum_offset) = (None, None, None);
        if version >= 1 {
            n_samples = Some(p.read::<i32>()?);
            sum_bins = Some(p.read::<i32>()?);
            sum_offset = Some(p.read::<i32>()?);
        }

        let mut ref_step = None;
        let mut ref_shape = Vec::new();
        if version >= 2 {
            let n_ref_shape = p.read::<i16>()?.max(0) as usize;
            let n_ref_step = p.read::<i16>()?.max(0) as usize;
            ref_step = Some(p.read::<f32>()?);
            for _ in 0..n_ref_shape {
                ref_shape.push(p.read_vec::<f32>(n_ref_step)?);
            }
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            setup_id,
            trigger_mode,
            min_pixel_mult,
            n_pixels,
            pixel_hv,
            pixel_threshold,
            n_samples,
            sum_bins,
            sum_offset,
            ref_step,
            ref_shape,
            partial,
        })
    }
}
