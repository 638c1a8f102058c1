//! CORSIKA run end block (type 1210). Modern files store a short
//! three-entry block: run number and the number of events processed.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct RunEnd {
    pub block: Vec<f32>,
}

impl RunEnd {
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

    pub fn n_events(&self) -> Option<f32> {
        self.block.get(2).copied()
    }
}
