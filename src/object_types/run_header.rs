//! sim_telarray run header (type 2000).
//!
//! Carries the telescope-id table that keys the per-telescope arrays
//! of every later object; the dispatcher installs it into the
//! active lookup slot before this record reaches the caller.

use time::OffsetDateTime;

use crate::{
    consts::unix_datetime,
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct RunHeader {
    pub run: i32,
    /// Run start, unix seconds.
    pub time: i32,
    pub run_type: i32,
    pub tracking_mode: i32,
    pub reverse_flag: Option<i32>,
    /// Nominal pointing (azimuth, altitude) in radians.
    pub direction: [f32; 2],
    pub offset_fov: [f32; 2],
    pub conv_depth: f32,
    pub conv_ref_pos: Option<[f32; 2]>,
    pub n_telescopes: usize,
    pub tel_ids: Vec<i32>,
    /// Telescope positions (x, y, z) in meters, indexed by slot.
    pub tel_pos: Vec<[f32; 3]>,
    pub min_tel_trig: i32,
    pub duration: i32,
    pub target: Option<String>,
    pub observer: Option<String>,
    pub partial: bool,
}

impl RunHeader {
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

        let run = p.read::<i32>()?;
        let time = p.read::<i32>()?;
        let run_type = p.read::<i32>()?;
        let tracking_mode = p.read::<i32>()?;
        let reverse_flag = if version >= 2 {
            Some(p.read::<i32>()?)
        } else {
            None
        };
        let direction = [p.read::<f32>()?, p.read::<f32>()?];
        let offset_fov = [p.read::<f32>()?, p.read::<f32>()?];
        let conv_depth = p.read::<f32>()?;
        let conv_ref_pos = if version >= 1 {
            Some([p.read::<f32>()?, p.read::<f32>()?])
        } else {
            None
        };

        let n_telescopes = p.read::<i32>()?.max(0) as usize;
        let tel_ids: Vec<i32> = p
            .read_vec::<i16>(n_telescopes)?
            .into_iter()
            .map(i32::from)
            .collect();
        let mut tel_pos = Vec::with_capacity(n_telescopes);
        for _ in 0..n_telescopes {
            tel_pos.push([p.read::<f32>()?, p.read::<f32>()?, p.read::<f32>()?]);
        }

        let min_tel_trig = p.read::<i32>()?;
        let duration = p.read::<i32>()?;

        let (target, observer) = if version >= 1 {
            (Some(p.read_string()?), Some(p.read_string()?))
        } else {
            (None, None)
        };

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            run,
            time,
            run_type,
            tracking_mode,
            reverse_flag,
            direction,
            offset_fov,
            conv_depth,
            conv_ref_pos,
            n_telescopes,
            tel_ids,
            tel_pos,
            min_tel_trig,
            duration,
            target,
            observer,
            partial,
        })
    }

    /// Run start as a date-time.
    pub fn start_time(&self) -> Option<OffsetDateTime> {
        unix_datetime(self.time as i64)
    }
}
