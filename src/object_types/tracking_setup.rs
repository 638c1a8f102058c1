//! Tracking setup (type 2008): drive characteristics of one
//! telescope mount.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct TrackingSetup {
    pub tel_id: i32,
    pub drive_type_az: i16,
    pub drive_type_alt: i16,
    pub zeropoint_az: f32,
    pub zeropoint_alt: f32,
    pub sign_az: f32,
    pub sign_alt: f32,
    pub resolution_az: f32,
    pub resolution_alt: f32,
    pub range_low_az: f32,
    pub range_low_alt: f32,
    pub range_high_az: f32,
    pub range_high_alt: f32,
    pub park_pos_az: f32,
    pub park_pos_alt: f32,
}

impl TrackingSetup {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        Ok(Self {
            tel_id: header.id(),
            drive_type_az: p.read()?,
            drive_type_alt: p.read()?,
            zeropoint_az: p.read()?,
            zeropoint_alt: p.read()?,
            sign_az: p.read()?,
            sign_alt: p.read()?,
            resolution_az: p.read()?,
            resolution_alt: p.read()?,
            range_low_az: p.read()?,
            range_low_alt: p.read()?,
            range_high_az: p.read()?,
            range_high_alt: p.read()?,
            park_pos_az: p.read()?,
            park_pos_alt: p.read()?,
        })
    }
}
