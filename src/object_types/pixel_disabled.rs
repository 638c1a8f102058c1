//! Disabled pixels (type 2005): pixels removed from the trigger and
//! pixels with their high voltage turned off.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct PixelDisabled {
    pub tel_id: i32,
    pub trigger_disabled: Vec<i32>,
    pub hv_disabled: Vec<i32>,
}

impl PixelDisabled {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let n_trig = p.read::<i32>()?.max(0) as usize;
        let trigger_disabled = p.read_vec::<i32>(n_trig)?;
        let n_hv = p.read::<i32>()?.max(0) as usize;
        let hv_disabled = p.read_vec::<i32>(n_hv)?;
        Ok(Self {
            tel_id: header.id(),
            trigger_disabled,
            hv_disabled,
        })
    }
}
