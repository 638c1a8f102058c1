//! CORSIKA event header (type 1202): the 273-float `EVTH` block.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct CorsikaEventHeader {
    /// Complete CORSIKA block, 273 entries in a standard event.
    pub block: Vec<f32>,
}

impl CorsikaEventHeader {
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

    /// Primary particle id (CORSIKA code).
    pub fn particle_id(&self) -> Option<f32> {
        self.block.get(2).copied()
    }

    /// Total primary energy in GeV.
    pub fn total_energy(&self) -> Option<f32> {
        self.block.get(3).copied()
    }

    pub fn starting_altitude(&self) -> Option<f32> {
        self.block.get(4).copied()
    }

    pub fn first_interaction_height(&self) -> Option<f32> {
        self.block.get(6).copied()
    }

    /// Direction cosines `(zenith, azimuth)` in radians.
    pub fn direction(&self) -> Option<(f32, f32)> {
        Some((*self.block.get(10)?, *self.block.get(11)?))
    }
}
