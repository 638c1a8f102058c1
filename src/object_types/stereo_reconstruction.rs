//! Stereo shower reconstruction (type 2015). Which quantity groups
//! are present is encoded in the result bits; each group's error
//! estimates have their own bit.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 1;

#[derive(Debug, Clone)]
pub struct StereoReconstruction {
    /// Bit 0: direction, 1: direction errors, 2: core position,
    /// 3: core errors, 4: mean scaled shape, 5: shape errors,
    /// 6: energy, 7: energy error, 8: shower maximum, 9: its error.
    pub result_bits: u32,
    pub n_triggered: i16,
    pub n_read: i16,
    pub n_images: i16,
    pub image_pattern: i32,
    /// Telescope slots contributing images (v1+).
    pub image_list: Vec<i16>,
    /// Direction (azimuth, altitude), radians.
    pub direction: Option<[f32; 2]>,
    pub direction_err: Option<[f32; 2]>,
    /// Core position (x, y), m.
    pub core_position: Option<[f32; 2]>,
    pub core_position_err: Option<[f32; 2]>,
    /// Mean scaled (length, width).
    pub mean_scaled: Option<[f32; 2]>,
    pub mean_scaled_err: Option<[f32; 2]>,
    /// Energy, TeV.
    pub energy: Option<f32>,
    pub energy_err: Option<f32>,
    /// Depth of shower maximum, g/cm².
    pub xmax: Option<f32>,
    pub xmax_err: Option<f32>,
    pub partial: bool,
}

impl StereoReconstruction {
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
        let result_bits = header.id() as u32;

        let n_triggered = p.read::<i16>()?;
        let n_read = p.read::<i16>()?;
        let n_images = p.read::<i16>()?;
        let image_pattern = p.read::<i32>()?;
        let image_list = if version >= 1 {
            p.read_vec::<i16>(n_images.max(0) as usize)?
        } else {
            Vec::new()
        };

        let pair = |p: &mut PayloadCursor, bit: u32| -> Result<Option<[f32; 2]>, EventioError> {
            if result_bits & (1 << bit) != 0 {
                Ok(Some([p.read()?, p.read()?]))
            } else {
                Ok(None)
            }
        };
        let direction = pair(p, 0)?;
        let direction_err = pair(p, 1)?;
        let core_position = pair(p, 2)?;
        let core_position_err = pair(p, 3)?;
        let mean_scaled = pair(p, 4)?;
        let mean_scaled_err = pair(p, 5)?;

        let single = |p: &mut PayloadCursor, bit: u32| -> Result<Option<f32>, EventioError> {
            if result_bits & (1 << bit) != 0 {
                Ok(Some(p.read()?))
            } else {
                Ok(None)
            }
        };
        let energy = single(p, 6)?;
        let energy_err = single(p, 7)?;
        let xmax = single(p, 8)?;
        let xmax_err = single(p, 9)?;

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            result_bits,
            n_triggered,
            n_read,
            n_images,
            image_pattern,
            image_list,
            direction,
            direction_err,
            core_position,
            core_position_err,
            mean_scaled,
            mean_scaled_err,
            energy,
            energy_err,
            xmax,
            xmax_err,
            partial,
        })
    }
}
