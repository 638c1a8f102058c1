//! Image parameters (type 2014): Hillas-style moments computed by
//! the online analysis. Later versions append error estimates,
//! timing parameters and the hot-pixel list; version 5 widens the
//! pixel counts to varints.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    support::read_count,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 5;

#[derive(Debug, Clone)]
pub struct ImageParameters {
    pub tel_id: i32,
    /// Image cut / selection flags from the object id.
    pub flags: u32,
    pub cut_id: i16,
    pub n_pixels: usize,
    pub n_saturated: usize,
    /// Total image amplitude, ADC counts above pedestal.
    pub amplitude: f32,
    /// Centroid in camera coordinates, m.
    pub x: f32,
    pub y: f32,
    /// Orientation angle, radians.
    pub phi: f32,
    pub length: f32,
    pub width: f32,
    pub n_conc: i16,
    pub concentration: f32,
    /// Error estimates, v1+.
    pub x_err: Option<f32>,
    pub y_err: Option<f32>,
    pub phi_err: Option<f32>,
    pub length_err: Option<f32>,
    pub width_err: Option<f32>,
    /// Timing parameters, v2+.
    pub tm_slope: Option<f32>,
    pub tm_residual: Option<f32>,
    pub tm_width1: Option<f32>,
    pub tm_width2: Option<f32>,
    pub tm_rise: Option<f32>,
    /// Hot pixels, v3+.
    pub hot_pixels: Vec<u32>,
    pub hot_amplitudes: Vec<f32>,
    pub partial: bool,
}

impl ImageParameters {
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
        let wide = version >= 5;

        let cut_id = p.read::<i16>()?;
        let n_pixels = read_count(p, wide)?;
        let n_saturated = read_count(p, wide)?;
        let amplitude = p.read::<f32>()?;
        let x = p.read::<f32>()?;
        let y = p.read::<f32>()?;
        let phi = p.read::<f32>()?;
        let length = p.read::<f32>()?;
        let width = p.read::<f32>()?;
        let n_conc = p.read::<i16>()?;
        let concentration = p.read::<f32>()?;

        let mut image = Self {
            tel_id: header.id() & 0xffff,
            flags: (header.id() as u32) >> 16,
            cut_id,
            n_pixels,
            n_saturated,
            amplitude,
            x,
            y,
            phi,
            length,
            width,
            n_conc,
            concentration,
            x_err: None,
            y_err: None,
            phi_err: None,
            length_err: None,
            width_err: None,
            tm_slope: None,
            tm_residual: None,
            tm_width1: None,
            tm_width2: None,
            tm_rise: None,
            hot_pixels: Vec::new(),
            hot_amplitudes: Vec::new(),
            partial,
        };

        if version >= 1 {
            image.x_err = Some(p.read()?);
            image.y_err = Some(p.read()?);
            image.phi_err = Some(p.read()?);
            image.length_err = Some(p.read()?);
            image.width_err = Some(p.read()?);
        }
        if version >= 2 {
            image.tm_slope = Some(p.read()?);
            image.tm_residual = Some(p.read()?);
            image.tm_width1 = Some(p.read()?);
            image.tm_width2 = Some(p.read()?);
            image.tm_rise = Some(p.read()?);
        }
        if version >= 3 {
            let n_hot = read_count(p, wide)?;
            image.hot_pixels = crate::support::read_pixel_indices(p, n_hot, wide)?;
            image.hot_amplitudes = p.read_vec::<f32>(n_hot)?;
        }
        if partial {
            p.skip(p.remaining())?;
        }

        Ok(image)
    }
}
