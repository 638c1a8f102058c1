//! CORSIKA event end block (type 1209): the `EVTE` statistics block.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct EventEnd {
    pub block: Vec<f32>,
}

impl EventEnd {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let n = p.read::<i32>()?;
        if n < 0 {
            return Err(EventioError::DecodeError {
                object_type: header.type_code(),
                version: header.version(),
                offset: header.offset(),
                what: "negative block length",
            });
        }
        let block = p.read_vec::<f32>(n as usize)?;
        Ok(Self { block })
    }

    pub fn event_number(&self) -> Option<f32> {
        self.block.get(1).copied()
    }

    /// Number of photons written for this event.
    pub fn n_photons(&self) -> Option<f32> {
        self.block.get(2).copied()
    }

    pub fn n_electrons(&self) -> Option<f32> {
        self.block.get(3).copied()
    }
}
