//! CORSIKA input card (type 1212): the steering file text, stored
//! verbatim.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct InputCard {
    pub text: String,
}

impl InputCard {
    pub(crate) fn decode(
        _header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let bytes = p.take(p.remaining())?;
        // single-byte mapping keeps historical non-UTF-8 cards readable
        let text = bytes.iter().map(|b| *b as char).collect();
        Ok(Self { text })
    }

    /// Steering lines without trailing padding.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(|line| line.trim_end())
    }
}
