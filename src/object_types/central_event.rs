//! Central trigger event (type 2009): the array-level trigger
//! record. Version 1 adds the triggered/data telescope lists with
//! trigger times, version 2 the per-telescope trigger-type masks
//! with one time per set type bit.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

/// Number of distinguished trigger types (majority, analog sum,
/// digital sum).
pub const N_TRIGGER_TYPES: usize = 3;

#[derive(Debug, Clone)]
pub struct CentralEvent {
    /// Global event count, also the object id.
    pub glob_count: i32,
    pub cpu_time: (i32, i32),
    pub gps_time: (i32, i32),
    /// Bit pattern of triggered telescope slots (low 32 slots).
    pub teltrg_pattern: i32,
    /// Bit pattern of telescope slots with data.
    pub teldata_pattern: i32,
    /// Triggered telescope slot indices.
    pub teltrg_list: Vec<i16>,
    /// Trigger time per triggered telescope, ns relative to the
    /// array trigger.
    pub teltrg_time: Vec<f32>,
    /// Telescope slots that delivered data.
    pub teldata_list: Vec<i16>,
    /// Per-telescope trigger-type mask (v2+), parallel to
    /// `teltrg_list`.
    pub teltrg_type_mask: Vec<u16>,
    /// Per-type trigger times, present where the mask bit is set.
    pub teltrg_time_by_type: Vec<[Option<f32>; N_TRIGGER_TYPES]>,
    pub partial: bool,
}

impl CentralEvent {
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

        let glob_count = p.read::<i32>()?;
        let cpu_time = (p.read::<i32>()?, p.read::<i32>()?);
        let gps_time = (p.read::<i32>()?, p.read::<i32>()?);
        let teltrg_pattern = p.read::<i32>()?;
        let teldata_pattern = p.read::<i32>()?;

        let mut event = Self {
            glob_count,
            cpu_time,
            gps_time,
            teltrg_pattern,
            teldata_pattern,
            teltrg_list: Vec::new(),
            teltrg_time: Vec::new(),
            teldata_list: Vec::new(),
            teltrg_type_mask: Vec::new(),
            teltrg_time_by_type: Vec::new(),
            partial,
        };

        if version >= 1 {
            let n_teltrg = p.read::<i16>()?.max(0) as usize;
            event.teltrg_list = p.read_vec::<i16>(n_teltrg)?;
            event.teltrg_time = p.read_vec::<f32>(n_teltrg)?;
            let n_teldata = p.read::<i16>()?.max(0) as usize;
            event.teldata_list = p.read_vec::<i16>(n_teldata)?;

            if version >= 2 {
                event.teltrg_type_mask = p.read_vec::<u16>(n_teltrg)?;
                for mask in &event.teltrg_type_mask {
                    let mut times = [None; N_TRIGGER_TYPES];
                    for (bit, slot) in times.iter_mut().enumerate() {
                        if mask & (1 << bit) != 0 {
                            *slot = Some(p.read::<f32>()?);
                        }
                    }
                    event.teltrg_time_by_type.push(times);
                }
            }
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(event)
    }
}
