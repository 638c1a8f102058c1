//! Object header codec.
//!
//! Every object starts with three 32-bit words; a fourth extension
//! word follows when the `extended` bit is set:
//!
//! ```ignore
//! | [T T F V] [I I I I] [L L L L] ([E E E E]) |
//!    |         |         |          |
//!    |         |         |          extension: bits 0-11 widen length to 42 bits
//!    |         |         length bits 0-29, only_sub_objects bit 30
//!    |         id (i32)
//!    type bits 0-15, user bit 16, extended bit 17, version bits 20-31
//! ```
//!
//! Top-level objects are additionally preceded by the 4-byte sync
//! marker; sub-objects are not.

use crate::{
    consts::{EXTENSION_SIZE, HEADER_SIZE},
    cursor::{bitfield, PayloadCursor},
    EventioError,
};

/// Decoded object header. Offsets are absolute within the
/// (decompressed) file where known; for sub-objects they are
/// relative to the enclosing top-level payload.
#[derive(Debug, Clone, Default)]
pub struct ObjectHeader {
    pub(crate) type_code: u16,
    pub(crate) user_bit: bool,
    pub(crate) extended: bool,
    pub(crate) version: u16,
    pub(crate) id: i32,
    pub(crate) only_sub_objects: bool,
    /// Payload size in bytes, exclusive of header and sync marker.
    pub(crate) length: u64,
    /// Offset of the header's first byte (after the sync marker for
    /// top-level objects).
    pub(crate) offset: u64,
    /// Offset of the payload's first byte.
    pub(crate) data_offset: u64,
}

impl ObjectHeader {
    /// Numeric registry key for this object.
    pub fn type_code(&self) -> u16 {
        self.type_code
    }

    /// Payload format revision.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Object-specific identifier: telescope id, event id, run
    /// number or packed flags depending on the object type.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Informational bit; never used for dispatch.
    pub fn user_bit(&self) -> bool {
        self.user_bit
    }

    pub fn extended(&self) -> bool {
        self.extended
    }

    /// Whether the payload is an ordered sequence of sub-objects
    /// rather than a leaf record.
    pub fn only_sub_objects(&self) -> bool {
        self.only_sub_objects
    }

    /// Payload size in bytes.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Header size in bytes: 12, or 16 with the extension word.
    pub fn header_size(&self) -> u64 {
        match self.extended {
            true => HEADER_SIZE + EXTENSION_SIZE,
            false => HEADER_SIZE,
        }
    }

    /// Offset one past the payload's last byte.
    pub fn end(&self) -> u64 {
        self.data_offset + self.length
    }

    /// Parses a header at the cursor's position. `base` is added to
    /// cursor-relative positions to produce absolute offsets.
    pub(crate) fn parse(cur: &mut PayloadCursor, base: u64) -> Result<Self, EventioError> {
        let offset = base + cur.pos();
        let w0: u32 = cur.read()?;
        let id: i32 = cur.read()?;
        let w2: u32 = cur.read()?;
        let mut header = Self::from_words(w0, id, w2, offset)?;
        if header.extended {
            let ext: u32 = cur.read()?;
            header.apply_extension(ext);
        }
        header.data_offset = base + cur.pos();
        Ok(header)
    }

    /// Builds a header from its first three words. `length` still
    /// lacks the extension bits; callers apply them afterwards when
    /// the `extended` bit is set.
    pub(crate) fn from_words(w0: u32, id: i32, w2: u32, offset: u64) -> Result<Self, EventioError> {
        let type_code = bitfield(w0, 0, 16) as u16;
        if type_code == 0 {
            return Err(EventioError::MalformedHeader {
                offset,
                reason: "type code 0",
            });
        }
        Ok(Self {
            type_code,
            user_bit: bitfield(w0, 16, 1) == 1,
            extended: bitfield(w0, 17, 1) == 1,
            version: bitfield(w0, 20, 12) as u16,
            id,
            only_sub_objects: bitfield(w2, 30, 1) == 1,
            length: bitfield(w2, 0, 30) as u64,
            offset,
            data_offset: offset + HEADER_SIZE,
        })
    }

    /// Widens `length` to 42 bits with the extension word's low 12 bits.
    pub(crate) fn apply_extension(&mut self, ext: u32) {
        self.length |= (bitfield(ext, 0, 12) as u64) << 30;
        self.data_offset = self.offset + HEADER_SIZE + EXTENSION_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::Endian;

    fn word(type_code: u16, user: bool, extended: bool, version: u16) -> u32 {
        type_code as u32
            | (user as u32) << 16
            | (extended as u32) << 17
            | (version as u32) << 20
    }

    #[test]
    fn parse_basic_header() {
        let mut data = Vec::new();
        data.extend_from_slice(&word(2000, false, false, 2).to_le_bytes());
        data.extend_from_slice(&17_i32.to_le_bytes());
        data.extend_from_slice(&(64_u32 | 1 << 30).to_le_bytes());
        let mut cur = PayloadCursor::new(&data, Endian::Little);
        let header = ObjectHeader::parse(&mut cur, 100).unwrap();
        assert_eq!(header.type_code(), 2000);
        assert_eq!(header.version(), 2);
        assert_eq!(header.id(), 17);
        assert_eq!(header.length(), 64);
        assert!(header.only_sub_objects());
        assert!(!header.extended());
        assert_eq!(header.offset(), 100);
        assert_eq!(header.data_offset(), 112);
        assert_eq!(header.end(), 176);
    }

    #[test]
    fn parse_extended_header() {
        let mut data = Vec::new();
        data.extend_from_slice(&word(1204, false, true, 1).to_le_bytes());
        data.extend_from_slice(&0_i32.to_le_bytes());
        data.extend_from_slice(&5_u32.to_le_bytes());
        data.extend_from_slice(&3_u32.to_le_bytes());
        let mut cur = PayloadCursor::new(&data, Endian::Little);
        let header = ObjectHeader::parse(&mut cur, 0).unwrap();
        assert!(header.extended());
        assert_eq!(header.length(), 5 | 3 << 30);
        assert_eq!(header.header_size(), 16);
        assert_eq!(header.data_offset(), 16);
    }

    #[test]
    fn type_zero_is_malformed() {
        let mut data = Vec::new();
        data.extend_from_slice(&0_u32.to_le_bytes());
        data.extend_from_slice(&0_i32.to_le_bytes());
        data.extend_from_slice(&0_u32.to_le_bytes());
        let mut cur = PayloadCursor::new(&data, Endian::Little);
        assert!(matches!(
            ObjectHeader::parse(&mut cur, 0),
            Err(EventioError::MalformedHeader { .. })
        ));
    }
}
