//! Pixel timing (type 2016): peak times and related quantities for
//! the pixels selected by a range list, stored as shorts scaled by
//! the granularity. A negative threshold switches the object into
//! the with-sum variant that appends local and global pulse sums.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    support::read_pixel_range_list,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct PixelTiming {
    pub tel_id: i32,
    pub n_pixels: usize,
    pub n_gains: usize,
    /// Peak search window relative to the trigger, samples.
    pub before_peak: i16,
    pub after_peak: i16,
    /// Threshold in ADC counts; negative selects the with-sum layout.
    pub threshold: i16,
    /// Requested timing types (peak position, threshold crossings, width...).
    pub time_types: Vec<i16>,
    pub time_levels: Vec<f32>,
    /// Time unit of the stored shorts, samples.
    pub granularity: f32,
    pub peak_global: f32,
    /// Pixels carrying timing data, expanded from the range list.
    pub pixels: Vec<usize>,
    /// `timval[pixel][type]`, NaN where a pixel was not selected.
    pub timval: Vec<Vec<f32>>,
    /// Pulse sums around the global/local peak per gain and selected
    /// pixel, with-sum variant only.
    pub pulse_sum_global: Vec<Vec<i32>>,
    pub pulse_sum_local: Vec<Vec<i32>>,
    pub partial: bool,
}

impl PixelTiming {
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

        let n_pixels = if version >= 2 {
            p.read_varint()? as usize
        } else {
            p.read::<i16>()?.max(0) as usize
        };
        let n_gains = p.read::<i16>()?.max(0) as usize;
        let before_peak = p.read::<i16>()?;
        let after_peak = p.read::<i16>()?;
        let threshold = p.read::<i16>()?;
        let with_sum = threshold < 0;

        let n_types = p.read::<i16>()?.max(0) as usize;
        let time_types = p.read_vec::<i16>(n_types)?;
        let time_levels = p.read_vec::<f32>(n_types)?;
        let granularity = p.read::<f32>()?;
        let peak_global = p.read::<f32>()?;

        let pixels = read_pixel_range_list(p, header, n_pixels)?;

        let mut timval = vec![vec![f32::NAN; n_types]; n_pixels];
        let mut pulse_sum_global = vec![Vec::new(); n_gains];
        let mut pulse_sum_local = vec![Vec::new(); n_gains];
        for pixel in &pixels {
            for t in 0..n_types {
                let raw = p.read::<i16>()?;
                timval[*pixel][t] = raw as f32 * granularity;
            }
            if with_sum {
                for gain in 0..n_gains {
                    pulse_sum_global[gain].push(p.read::<i32>()?);
                }
                for gain in 0..n_gains {
                    pulse_sum_local[gain].push(p.read::<i32>()?);
                }
            }
        }
        if !with_sum {
            pulse_sum_global.clear();
            pulse_sum_local.clear();
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            n_pixels,
            n_gains,
            before_peak,
            after_peak,
            threshold,
            time_types,
            time_levels,
            granularity,
            peak_global,
            pixels,
            timval,
            pulse_sum_global,
            pulse_sum_local,
            partial,
        })
    }
}
