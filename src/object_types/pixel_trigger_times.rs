//! Pixel trigger times (type 2032): discriminator firing times of
//! individual pixels, as varint pairs.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 0;

#[derive(Debug, Clone)]
pub struct PixelTriggerTimes {
    pub tel_id: i32,
    pub n_times: usize,
    pub pixels: Vec<u32>,
    /// Trigger time per listed pixel, readout time slices.
    pub times: Vec<i32>,
    pub partial: bool,
}

impl PixelTriggerTimes {
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

        let n_times = p.read_varint()? as usize;
        let mut pixels = Vec::with_capacity(n_times);
        let mut times = Vec::with_capacity(n_times);
        for _ in 0..n_times {
            pixels.push(p.read_varint()? as u32);
            times.push(p.read_varint_signed()? as i32);
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            n_times,
            pixels,
            times,
            partial,
        })
    }
}
