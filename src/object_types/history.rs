//! History blocks (types 70-72): the command lines and
//! configuration text a file was produced with.

use time::OffsetDateTime;

use crate::{
    consts::unix_datetime,
    cursor::PayloadCursor,
    errors::WarningKind,
    object::{ObjectHeader, ObjectView},
    EventioError,
};

use super::{leaf, DecodeContext, ObjectType};

/// One history line: a unix timestamp plus the recorded text.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub timestamp: i32,
    pub text: String,
}

impl HistoryEntry {
    pub(crate) fn decode(
        _header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        Ok(Self {
            timestamp: p.read::<i32>()?,
            text: p.read_string()?,
        })
    }

    pub fn time(&self) -> Option<OffsetDateTime> {
        unix_datetime(self.timestamp as i64)
    }
}

/// History container (type 70) grouping command-line (71) and
/// configuration (72) entries.
#[derive(Debug, Clone, Default)]
pub struct HistoryBlock {
    pub command_lines: Vec<HistoryEntry>,
    pub config_lines: Vec<HistoryEntry>,
}

impl HistoryBlock {
    pub(crate) fn decode(
        obj: &ObjectView<'_>,
        ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let mut block = Self::default();
        for sub in obj.sub_objects() {
            let sub = sub?;
            match ObjectType::from_code(sub.header().type_code()) {
                ObjectType::HistoryCommandLine => {
                    block.command_lines.push(leaf(&sub, ctx, HistoryEntry::decode)?)
                }
                ObjectType::HistoryConfig => {
                    block.config_lines.push(leaf(&sub, ctx, HistoryEntry::decode)?)
                }
                ObjectType::Unknown(type_code) => {
                    ctx.warn(
                        WarningKind::UnknownType { type_code },
                        sub.header().offset(),
                    );
                }
                _ => {}
            }
        }
        Ok(block)
    }
}
