//! Telescope event header (type 2011): local trigger bookkeeping
//! for one telescope. Bits of `trg_source` select which of the
//! optional sections follow.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct TelEventHeader {
    pub tel_id: i32,
    pub loc_count: i32,
    pub glob_count: i32,
    pub cpu_time: (i32, i32),
    pub gps_time: (i32, i32),
    /// Trigger source word; bit 0 gates the sector list, bit 1 the
    /// per-sector discriminator times, bit 2 (v2+) the hardware
    /// trigger times.
    pub trg_source: i16,
    pub triggered_sectors: Vec<i16>,
    pub sector_times: Vec<f32>,
    pub hardware_times: Vec<f32>,
    pub partial: bool,
}

impl TelEventHeader {
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

        let loc_count = p.read::<i32>()?;
        let glob_count = p.read::<i32>()?;
        let cpu_time = (p.read::<i32>()?, p.read::<i32>()?);
        let gps_time = (p.read::<i32>()?, p.read::<i32>()?);
        let trg_source = p.read::<i16>()?;

        let mut triggered_sectors = Vec::new();
        let mut sector_times = Vec::new();
        let mut hardware_times = Vec::new();
        if trg_source & 0x01 != 0 {
            let n = p.read::<i16>()?.max(0) as usize;
            triggered_sectors = p.read_vec::<i16>(n)?;
            if trg_source & 0x02 != 0 {
                sector_times = p.read_vec::<f32>(n)?;
            }
            if version >= 2 && trg_source & 0x04 != 0 {
                hardware_times = p.read_vec::<f32>(n)?;
            }
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            loc_count,
            glob_count,
            cpu_time,
            gps_time,
            trg_source,
            triggered_sectors,
            sector_times,
            hardware_times,
            partial,
        })
    }
}
