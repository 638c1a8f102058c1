//! CORSIKA run header (type 1200).
//!
//! The payload is the 273-float CORSIKA `RUNH` block, stored as a
//! 32-bit count followed by the floats. Only a handful of entries
//! have agreed-on meanings; the full block is kept so callers can
//! reach the rest by index.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct CorsikaRunHeader {
    /// Complete CORSIKA block, 273 entries in a standard run.
    pub block: Vec<f32>,
}

impl CorsikaRunHeader {
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

    pub fn run_number(&self) -> Option<f32> {
        self.block.get(1).copied()
    }

    /// Start date as YYMMDD.
    pub fn date(&self) -> Option<f32> {
        self.block.get(2).copied()
    }

    pub fn corsika_version(&self) -> Option<f32> {
        self.block.get(3).copied()
    }

    pub fn n_observation_levels(&self) -> Option<f32> {
        self.block.get(4).copied()
    }

    /// Observation level heights in cm, up to ten.
    pub fn observation_heights(&self) -> &[f32] {
        self.block.get(5..15).unwrap_or(&[])
    }

    pub fn energy_spectrum_slope(&self) -> Option<f32> {
        self.block.get(15).copied()
    }

    /// Simulated energy range in GeV as `(min, max)`.
    pub fn energy_range(&self) -> Option<(f32, f32)> {
        Some((*self.block.get(16)?, *self.block.get(17)?))
    }
}
