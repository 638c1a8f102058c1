//! Auxiliary traces (types 2029 digital, 2030 analog): extra
//! per-telescope readout channels such as trigger traces.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const AUX_DIGITAL: u16 = 2029;

#[derive(Debug, Clone)]
pub struct AuxiliaryTraces {
    pub tel_id: i32,
    /// True for type 2029 (u16 samples), false for 2030 (f32).
    pub digital: bool,
    pub trace_type: i32,
    /// Sampling time per bin, ns.
    pub time_scale: f32,
    pub time_offset: f32,
    pub n_traces: usize,
    pub trace_length: usize,
    /// Digital samples, `n_traces * trace_length`, row-major.
    pub digital_samples: Vec<u16>,
    /// Analog samples for type 2030.
    pub analog_samples: Vec<f32>,
}

impl AuxiliaryTraces {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let digital = header.type_code() == AUX_DIGITAL;
        let trace_type = p.read::<i32>()?;
        let time_scale = p.read::<f32>()?;
        let time_offset = p.read::<f32>()?;
        let n_traces = p.read_varint()? as usize;
        let trace_length = p.read_varint()? as usize;
        let total = n_traces * trace_length;

        let (digital_samples, analog_samples) = if digital {
            (p.read_vec::<u16>(total)?, Vec::new())
        } else {
            (Vec::new(), p.read_vec::<f32>(total)?)
        };

        Ok(Self {
            tel_id: header.id(),
            digital,
            trace_type,
            time_scale,
            time_offset,
            n_traces,
            trace_length,
            digital_samples,
            analog_samples,
        })
    }
}
