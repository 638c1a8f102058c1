//! Monte-Carlo run header (type 2001): simulation setup scalars.
//! Version 2 adds CORSIKA interaction-model ids, 3 the model detail
//! words, 4 the production start timestamps.

use time::OffsetDateTime;

use crate::{
    consts::unix_datetime,
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 4;

#[derive(Debug, Clone)]
pub struct McRunHeader {
    pub shower_prog_id: i32,
    pub shower_prog_vers: i32,
    pub detector_prog_id: i32,
    pub detector_prog_vers: i32,
    /// Observation level above sea level, m.
    pub obs_height: f32,
    pub n_showers: i32,
    /// Uses of each shower.
    pub n_use: i32,
    pub core_pos_mode: i32,
    pub core_range: [f32; 2],
    pub alt_range: [f32; 2],
    pub az_range: [f32; 2],
    pub diffuse: i32,
    pub viewcone: [f32; 2],
    /// Energy range in TeV.
    pub e_range: [f32; 2],
    pub spectral_index: f32,
    pub b_total: f32,
    pub b_inclination: f32,
    pub b_declination: f32,
    pub injection_height: f32,
    pub atmosphere: Option<i32>,
    pub corsika_iact_options: Option<i32>,
    pub corsika_low_e_model: Option<i32>,
    pub corsika_high_e_model: Option<i32>,
    pub corsika_bunchsize: Option<f32>,
    pub corsika_wlen_min: Option<f32>,
    pub corsika_wlen_max: Option<f32>,
    pub corsika_low_e_detail: Option<i32>,
    pub corsika_high_e_detail: Option<i32>,
    /// Shower/detector production starts, unix seconds.
    pub shower_prog_start: Option<i32>,
    pub detector_prog_start: Option<i32>,
    pub partial: bool,
}

impl McRunHeader {
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

        let mut mc = Self {
            shower_prog_id: p.read()?,
            shower_prog_vers: p.read()?,
            detector_prog_id: p.read()?,
            detector_prog_vers: p.read()?,
            obs_height: p.read()?,
            n_showers: p.read()?,
            n_use: p.read()?,
            core_pos_mode: p.read()?,
            core_range: [p.read()?, p.read()?],
            alt_range: [p.read()?, p.read()?],
            az_range: [p.read()?, p.read()?],
            diffuse: p.read()?,
            viewcone: [p.read()?, p.read()?],
            e_range: [p.read()?, p.read()?],
            spectral_index: p.read()?,
            b_total: p.read()?,
            b_inclination: p.read()?,
            b_declination: p.read()?,
            injection_height: p.read()?,
            atmosphere: None,
            corsika_iact_options: None,
            corsika_low_e_model: None,
            corsika_high_e_model: None,
            corsika_bunchsize: None,
            corsika_wlen_min: None,
            corsika_wlen_max: None,
            corsika_low_e_detail: None,
            corsika_high_e_detail: None,
            shower_prog_start: None,
            detector_prog_start: None,
            partial,
        };

        if version >= 2 {
            mc.atmosphere = Some(p.read()?);
            mc.corsika_iact_options = Some(p.read()?);
            mc.corsika_low_e_model = Some(p.read()?);
            mc.corsika_high_e_model = Some(p.read()?);
            mc.corsika_bunchsize = Some(p.read()?);
            mc.corsika_wlen_min = Some(p.read()?);
            mc.corsika_wlen_max = Some(p.read()?);
        }
        if version >= 3 {
            mc.corsika_low_e_detail = Some(p.read()?);
            mc.corsika_high_e_detail = Some(p.read()?);
        }
        if version >= 4 {
            mc.shower_prog_start = Some(p.read()?);
            mc.detector_prog_start = Some(p.read()?);
        }
        if partial {
            p.skip(p.remaining())?;
        }

        Ok(mc)
    }

    pub fn shower_prog_start_time(&self) -> Option<OffsetDateTime> {
        unix_datetime(self.shower_prog_start? as i64)
    }

    pub fn detector_prog_start_time(&self) -> Option<OffsetDateTime> {
        unix_datetime(self.detector_prog_start? as i64)
    }
}
