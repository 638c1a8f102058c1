//! Monte-Carlo shower (type 2020): true shower parameters and the
//! optional longitudinal profiles.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 1;

#[derive(Debug, Clone)]
pub struct ShowerProfile {
    pub id: i32,
    pub n_steps: usize,
    pub start: f32,
    pub end: f32,
    pub bin_size: f32,
    pub content: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct McShower {
    /// Shower number, from the object id.
    pub shower: i32,
    pub primary_id: i32,
    /// Energy, TeV.
    pub energy: f32,
    pub azimuth: f32,
    pub altitude: f32,
    pub depth_start: Option<f32>,
    /// Height of first interaction, m.
    pub h_first_int: f32,
    /// Depth of shower maximum, g/cm².
    pub xmax: f32,
    /// Height/electron/Cherenkov-light maxima, v1+.
    pub hmax: Option<f32>,
    pub emax: Option<f32>,
    pub cmax: Option<f32>,
    pub profiles: Vec<ShowerProfile>,
    pub partial: bool,
}

impl McShower {
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

        let primary_id = p.read::<i32>()?;
        let energy = p.read::<f32>()?;
        let azimuth = p.read::<f32>()?;
        let altitude = p.read::<f32>()?;
        let depth_start = if version >= 1 {
            Some(p.read::<f32>()?)
        } else {
            None
        };
        let h_first_int = p.read::<f32>()?;
        let xmax = p.read::<f32>()?;
        let (hmax, emax, cmax) = if version >= 1 {
            (
                Some(p.read::<f32>()?),
                Some(p.read::<f32>()?),
                Some(p.read::<f32>()?),
            )
        } else {
            (None, None, None)
        };

        let n_profiles = p.read::<i16>()?.max(0) as usize;
        let mut profiles = Vec::with_capacity(n_profiles);
        for _ in 0..n_profiles {
            let id = p.read::<i32>()?;
            let n_steps = p.read::<i32>()?.max(0) as usize;
            let start = p.read::<f32>()?;
            let end = p.read::<f32>()?;
            let bin_size = p.read::<f32>()?;
            let content = p.read_vec::<f32>(n_steps)?;
            profiles.push(ShowerProfile {
                id,
                n_steps,
                start,
                end,
                bin_size,
                content,
            });
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            shower: header.id(),
            primary_id,
            energy,
            azimuth,
            altitude,
            depth_start,
            h_first_int,
            xmax,
            hmax,
            emax,
            cmax,
            profiles,
            partial,
        })
    }
}
