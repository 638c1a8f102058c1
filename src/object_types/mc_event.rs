//! Monte-Carlo event (type 2021): ties one reuse of a shower to its
//! core position. Version 2 dropped the per-use area weight.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct McEvent {
    /// Event number, from the object id.
    pub event: i32,
    pub shower_num: i32,
    /// Core position relative to the array center, m.
    pub x_core: f32,
    pub y_core: f32,
    /// Area weight of this use, dropped in v2.
    pub a_weight: Option<f32>,
    pub partial: bool,
}

impl McEvent {
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

        let shower_num = p.read::<i32>()?;
        let x_core = p.read::<f32>()?;
        let y_core = p.read::<f32>()?;
        let a_weight = if version < 2 {
            Some(p.read::<f32>()?)
        } else {
            None
        };
        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            event: header.id(),
            shower_num,
            x_core,
            y_core,
            a_weight,
            partial,
        })
    }
}
