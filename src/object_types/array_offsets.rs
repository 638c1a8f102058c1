//! Array offsets (type 1203): core offsets for each use of a
//! simulated shower. A third column of per-use weights is present in
//! weighted productions and detected from the payload size.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct ArrayOffsets {
    pub n_arrays: usize,
    /// Time offset of the array clock against the shower core time, ns.
    pub time_offset: f32,
    /// Core offsets in cm.
    pub x_offsets: Vec<f32>,
    pub y_offsets: Vec<f32>,
    /// Per-use weights; empty in unweighted productions.
    pub weights: Vec<f32>,
}

impl ArrayOffsets {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let n = p.read::<i32>()?.max(0) as usize;
        let time_offset = p.read::<f32>()?;

        // remaining payload decides between (x, y) and (x, y, weight)
        let n_columns = if n > 0 {
            p.remaining() / (4 * n)
        } else {
            0
        };
        if n > 0 && n_columns != 2 && n_columns != 3 {
            return Err(EventioError::DecodeError {
                object_type: header.type_code(),
                version: header.version(),
                offset: header.offset(),
                what: "array offsets payload is neither 2 nor 3 columns",
            });
        }

        let x_offsets = p.read_vec::<f32>(n)?;
        let y_offsets = p.read_vec::<f32>(n)?;
        let weights = if n_columns == 3 {
            p.read_vec::<f32>(n)?
        } else {
            Vec::new()
        };

        Ok(Self {
            n_arrays: n,
            time_offset,
            x_offsets,
            y_offsets,
            weights,
        })
    }
}
