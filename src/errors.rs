//! Various EventIO-related errors and recoverable diagnostics.

use std::fmt;

/// Read/parse errors. These abort decoding of the current object
/// (or the whole file for header and I/O faults); recoverable
/// conditions are reported as [`Warning`] instead.
#[derive(Debug)]
pub enum EventioError {
    /// Converted `binrw` error.
    BinReadError(binrw::Error),
    /// IO error.
    IOError(std::io::Error),
    /// A fixed-width read required more bytes than the payload holds.
    UnexpectedEnd {
        offset: u64,
        requested: usize,
        remaining: usize,
    },
    /// Header cannot be interpreted; the next object cannot be
    /// located safely.
    MalformedHeader { offset: u64, reason: &'static str },
    /// Missing or misplaced sync marker in front of a top-level object.
    MissingSyncMarker { offset: u64 },
    /// A variable-length integer claims more bytes than allowed or
    /// than the payload holds.
    MalformedVarint { offset: u64 },
    /// Sub-objects nested deeper than [`crate::consts::MAX_NESTING_DEPTH`].
    NestingTooDeep { depth: usize },
    /// Known version, but the byte layout did not decode.
    DecodeError {
        object_type: u16,
        version: u16,
        offset: u64,
        what: &'static str,
    },
    /// Gzip or zstd stream fault.
    CompressionError { offset: u64, message: String },
    /// Operation requires a seekable byte source (plain file or
    /// in-memory buffer).
    NotSeekable,
    /// A pixel list carries an index outside `0..num_pixels`.
    InvalidPixelList {
        object_type: u16,
        offset: u64,
        pixel: i64,
        num_pixels: usize,
    },
}

impl std::error::Error for EventioError {}

impl fmt::Display for EventioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventioError::BinReadError(err) => write!(f, "{err}"),
            EventioError::IOError(err) => write!(f, "IO error: {err}"),
            EventioError::UnexpectedEnd{offset, requested, remaining} => write!(
                f,
                "Unexpected end of data at offset {offset}: requested {requested} bytes, {remaining} remain."
            ),
            EventioError::MalformedHeader{offset, reason} => write!(f, "Malformed object header at offset {offset}: {reason}."),
            EventioError::MissingSyncMarker{offset} => write!(f, "No sync marker at offset {offset}."),
            EventioError::MalformedVarint{offset} => write!(f, "Malformed varint at offset {offset}."),
            EventioError::NestingTooDeep{depth} => write!(f, "Sub-object nesting depth {depth} exceeds supported maximum."),
            EventioError::DecodeError{object_type, version, offset, what} => write!(
                f,
                "Failed to decode object type {object_type} version {version} at offset {offset}: {what}."
            ),
            EventioError::CompressionError{offset, message} => write!(f, "Decompression failed near offset {offset}: {message}."),
            EventioError::NotSeekable => write!(f, "Byte source is not seekable."),
            EventioError::InvalidPixelList{object_type, offset, pixel, num_pixels} => write!(
                f,
                "Pixel list in object type {object_type} at offset {offset} references pixel {pixel} outside 0..{num_pixels}."
            ),
        }
    }
}

/// Converts std::io::Error to EventioError
impl From<std::io::Error> for EventioError {
    fn from(err: std::io::Error) -> Self {
        EventioError::IOError(err)
    }
}

/// Converts binrw::Error to EventioError
impl From<binrw::Error> for EventioError {
    fn from(err: binrw::Error) -> Self {
        EventioError::BinReadError(err)
    }
}

/// Converts EventioError to std::io::Error
impl From<EventioError> for std::io::Error {
    fn from(err: EventioError) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err)
    }
}

/// Recoverable diagnostic kinds. Decoding continues after any of
/// these; they accumulate in the reader's warning sink.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// Type code absent from the registry; payload surfaced as an
    /// opaque blob.
    UnknownType { type_code: u16 },
    /// Version ahead of the documented ladder; the documented prefix
    /// was decoded and the record marked partial.
    UnsupportedVersion { object_type: u16, version: u16 },
    /// Declared payload length and bytes consumed by the decoder
    /// disagree; position was reconciled to the declared end.
    LengthMismatch {
        object_type: u16,
        declared: u64,
        consumed: u64,
    },
    /// File ended mid-header or mid-payload of a top-level object.
    Truncated,
    /// Sector membership list ended early at an embedded zero;
    /// `kept` entries were retained.
    InvalidSectorCount { declared: usize, kept: usize },
    /// Pixel list shorter or longer than its enclosing payload allows.
    InvalidPixelList { object_type: u16 },
}

/// A recoverable diagnostic attached to the offending object's
/// file offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    /// Absolute file offset of the object that produced the warning.
    pub offset: u64,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::UnknownType{type_code} => write!(f, "Unknown object type {type_code} at offset {}.", self.offset),
            WarningKind::UnsupportedVersion{object_type, version} => write!(
                f,
                "Object type {object_type} at offset {} has unsupported version {version}; decoded documented prefix only.",
                self.offset
            ),
            WarningKind::LengthMismatch{object_type, declared, consumed} => write!(
                f,
                "Object type {object_type} at offset {} declared {declared} payload bytes but decoder consumed {consumed}.",
                self.offset
            ),
            WarningKind::Truncated => write!(f, "File truncated at offset {}.", self.offset),
            WarningKind::InvalidSectorCount{declared, kept} => write!(
                f,
                "Sector list at offset {} declared {declared} entries, kept {kept} (zero-terminated).",
                self.offset
            ),
            WarningKind::InvalidPixelList{object_type} => write!(
                f,
                "Pixel list in object type {object_type} at offset {} is inconsistent with its payload.",
                self.offset
            ),
        }
    }
}
