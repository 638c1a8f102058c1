//! IACT telescope definition (type 1201): positions and radii of
//! the simulated telescope spheres.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct TelescopeDefinition {
    pub n_telescopes: usize,
    /// Positions in cm, relative to the array center.
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    /// Fiducial sphere radii in cm.
    pub r: Vec<f32>,
}

impl TelescopeDefinition {
    pub(crate) fn decode(
        _header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let n = p.read::<i32>()?.max(0) as usize;
        Ok(Self {
            n_telescopes: n,
            x: p.read_vec::<f32>(n)?,
            y: p.read_vec::<f32>(n)?,
            z: p.read_vec::<f32>(n)?,
            r: p.read_vec::<f32>(n)?,
        })
    }
}
