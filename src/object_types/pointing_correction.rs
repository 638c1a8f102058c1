//! Pointing correction (type 2007): the bending-model function and
//! its parameters.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct PointingCorrection {
    pub tel_id: i32,
    pub function_type: i32,
    pub parameters: Vec<f32>,
}

impl PointingCorrection {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let function_type = p.read::<i32>()?;
        let n_param = p.read::<i32>()?.max(0) as usize;
        let parameters = p.read_vec::<f32>(n_param)?;
        Ok(Self {
            tel_id: header.id(),
            function_type,
            parameters,
        })
    }
}
