//! Tracking position (types 2100-2199): raw and corrected pointing
//! of one telescope. The telescope id lives in the type code; a
//! flags word selects which of the two angle pairs are present.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const TRACKING_POSITION_BASE: u16 = 2100;

#[derive(Debug, Clone)]
pub struct TrackingPosition {
    pub tel_id: i32,
    /// Bit 0: raw angles present; bit 1: corrected angles present.
    pub flags: i16,
    /// (azimuth, altitude) in radians as reported by the drive.
    pub raw: Option<[f32; 2]>,
    /// (azimuth, altitude) after pointing correction.
    pub corrected: Option<[f32; 2]>,
}

impl TrackingPosition {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let tel_id = (header.type_code() - TRACKING_POSITION_BASE) as i32;
        let flags = p.read::<i16>()?;
        let raw = if flags & 0x01 != 0 {
            Some([p.read::<f32>()?, p.read::<f32>()?])
        } else {
            None
        };
        let corrected = if flags & 0x02 != 0 {
            Some([p.read::<f32>()?, p.read::<f32>()?])
        } else {
            None
        };
        Ok(Self {
            tel_id,
            flags,
            raw,
            corrected,
        })
    }
}
