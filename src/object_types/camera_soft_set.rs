//! Camera software settings (type 2006): dynamic trigger, high
//! voltage and pedestal handling parameters of the camera server.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct CameraSoftSet {
    pub tel_id: i32,
    pub dyn_trig_mode: i32,
    pub dyn_trig_threshold: i32,
    pub dyn_hv_mode: i32,
    pub dyn_hv_threshold: i32,
    pub data_red_mode: i32,
    pub zero_sup_mode: i32,
    pub zero_sup_n_thr: i32,
    pub zero_sup_thresholds: [i32; 3],
    pub unbiased_scale: i32,
    pub dyn_ped_mode: i32,
    pub dyn_ped_events: i32,
    pub dyn_ped_period: i32,
    pub monitor_cur_period: i32,
    pub report_cur_period: i32,
    pub monitor_hv_period: i32,
    pub report_hv_period: i32,
}

impl CameraSoftSet {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        Ok(Self {
            tel_id: header.id(),
            dyn_trig_mode: p.read()?,
            dyn_trig_threshold: p.read()?,
            dyn_hv_mode: p.read()?,
            dyn_hv_threshold: p.read()?,
            data_red_mode: p.read()?,
            zero_sup_mode: p.read()?,
            zero_sup_n_thr: p.read()?,
            zero_sup_thresholds: [p.read()?, p.read()?, p.read()?],
            unbiased_scale: p.read()?,
            dyn_ped_mode: p.read()?,
            dyn_ped_events: p.read()?,
            dyn_ped_period: p.read()?,
            monitor_cur_period: p.read()?,
            report_cur_period: p.read()?,
            monitor_hv_period: p.read()?,
            report_hv_period: p.read()?,
        })
    }
}
