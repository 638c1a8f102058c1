//! Laser/LED calibration (type 2023): per-gain per-pixel conversion
//! factors from a flat-fielding run.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct LaserCalibration {
    pub tel_id: i32,
    pub lascal_id: i32,
    pub n_pixels: usize,
    pub n_gains: usize,
    /// Conversion factors, `[gain][pixel]`.
    pub calib: Vec<Vec<f32>>,
    /// Maximum fraction of the integration window used, per gain
    /// (v1+).
    pub max_int_frac: Vec<f32>,
    /// Time calibration offsets, `[gain][pixel]` (v1+).
    pub tm_calib: Vec<Vec<f32>>,
    /// DAQ time calibration (v2+).
    pub daq_time_calib: Option<f32>,
    /// Pedestal compensation, `[gain][pixel]` (v2+).
    pub pedestal_compensation: Vec<Vec<f32>>,
    pub partial: bool,
}

impl LaserCalibration {
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

        let lascal_id = p.read::<i32>()?;
        let n_pixels = p.read::<i32>()?.max(0) as usize;
        let n_gains = p.read::<i16>()?.max(0) as usize;

        let mut calib = Vec::with_capacity(n_gains);
        for _ in 0..n_gains {
            calib.push(p.read_vec::<f32>(n_pixels)?);
        }

        let mut max_int_frac = Vec::new();
        let mut tm_calib = Vec::new();
        if version >= 1 {
            max_int_frac = p.read_vec::<f32>(n_gains)?;
            for _ in 0..n_gains {
                tm_calib.push(p.read_vec::<f32>(n_pixels)?);
            }
        }

        let mut daq_time_calib = None;
        let mut pedestal_compensation = Vec::new();
        if version >= 2 {
            daq_time_calib = Some(p.read::<f32>()?);
            for _ in 0..n_gains {
                pedestal_compensation.push(p.read_vec::<f32>(n_pixels)?);
            }
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            lascal_id,
            n_pixels,
            n_gains,
            calib,
            max_int_frac,
            tm_calib,
            daq_time_calib,
            pedestal_compensation,
            partial,
        })
    }
}
