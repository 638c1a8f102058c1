//! Core EventIO reader and top-level object iteration.
//!
//! ```rs
//! use eventio::EventIo;
//! use std::path::Path;
//!
//! fn main() -> std::io::Result<()> {
//!     let mut file = EventIo::new(Path::new("gamma_test.simtel.gz"))?;
//!
//!     // Iterate over raw objects
//!     while let Some(result) = file.next_object() {
//!         let object = result?;
//!         println!("{:?}", object.header());
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use binrw::Endian;

use crate::{
    consts::{EXTENSION_SIZE, HEADER_SIZE, SYNC_MARKER_BE, SYNC_MARKER_LE},
    cursor::PayloadCursor,
    errors::{Warning, WarningKind},
    object::{Object, ObjectHeader},
    object_types::{decode_object, DecodeContext, Record, TelescopeLookup},
    source::ByteSource,
    EventioError,
};

/// EventIO reader.
///
/// Owns the byte source, the per-file byte order (fixed by the first
/// sync marker), the telescope-id lookup tables and the warning sink.
/// Iteration is strictly single pass unless the source is seekable.
#[derive(Debug)]
pub struct EventIo {
    path: Option<PathBuf>,
    source: ByteSource,
    endian: Option<Endian>,
    context: DecodeContext,
    finished: bool,
}

/// Non-fallible iteration over raw objects, ending at the first
/// error or at end of file (matching the header-iterator contract of
/// the container layer: errors are recorded in the warning sink
/// where recoverable).
impl Iterator for EventIo {
    type Item = Object;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_object()?.ok()
    }
}

impl EventIo {
    /// Opens `path`, transparently handling gzip and zstd inputs.
    pub fn new(path: &Path) -> Result<Self, EventioError> {
        Ok(Self {
            path: Some(path.to_owned()),
            source: ByteSource::open(path)?,
            endian: None,
            context: DecodeContext::new(),
            finished: false,
        })
    }

    /// Reader over an in-memory byte buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            path: None,
            source: ByteSource::from_bytes(data),
            endian: None,
            context: DecodeContext::new(),
            finished: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether random access (rewind, `read_payload`) is available.
    /// False for gzip/zstd sources.
    pub fn is_seekable(&self) -> bool {
        self.source.is_seekable()
    }

    /// File byte order, known once the first object header has been
    /// read.
    pub fn endianness(&self) -> Option<Endian> {
        self.endian
    }

    /// Drains accumulated recoverable diagnostics.
    pub fn warnings(&mut self) -> Vec<Warning> {
        self.context.take_warnings()
    }

    /// Telescope-id lookup populated by the most recent run header.
    pub fn telescope_lookup(&self) -> Option<&TelescopeLookup> {
        self.context.lookup()
    }

    /// Selects which of the lookup tables later decodes resolve
    /// against. Supports multiplexing up to three configurations.
    pub fn set_lookup_reference(&mut self, index: usize) -> Result<(), EventioError> {
        self.context.set_lookup_reference(index)
    }

    pub(crate) fn context_mut(&mut self) -> &mut DecodeContext {
        &mut self.context
    }

    /// Seek to the start of the file and restart iteration.
    pub fn rewind(&mut self) -> Result<(), EventioError> {
        if !self.source.is_seekable() {
            return Err(EventioError::NotSeekable);
        }
        self.source.seek_to(0)?;
        self.finished = false;
        Ok(())
    }

    /// Reads the next top-level header, leaving the source position
    /// at the payload's first byte. `None` at clean end of file and
    /// after a truncation diagnostic.
    fn read_top_header(&mut self) -> Result<Option<ObjectHeader>, EventioError> {
        if self.finished {
            return Ok(None);
        }
        let marker_offset = self.source.tell()?;

        let mut marker = [0u8; 4];
        let got = self.source.read_at_most(&mut marker)?;
        if got == 0 {
            // clean end of file at an object boundary
            self.finished = true;
            return Ok(None);
        }
        if got < 4 {
            self.truncated(marker_offset);
            return Ok(None);
        }
        let endian = self.resolve_endian(marker, marker_offset)?;

        let mut head = [0u8; HEADER_SIZE as usize];
        let got = self.source.read_at_most(&mut head)?;
        if got < head.len() {
            self.truncated(marker_offset);
            return Ok(None);
        }
        let mut cur = PayloadCursor::new(&head, endian);
        let w0: u32 = cur.read()?;
        let id: i32 = cur.read()?;
        let w2: u32 = cur.read()?;
        let mut header = ObjectHeader::from_words(w0, id, w2, marker_offset + 4)?;
        if header.extended() {
            let mut ext = [0u8; EXTENSION_SIZE as usize];
            let got = self.source.read_at_most(&mut ext)?;
            if got < ext.len() {
                self.truncated(marker_offset);
                return Ok(None);
            }
            let ext_word = u32::from_le_bytes(ext);
            let ext_word = match endian {
                Endian::Big => ext_word.swap_bytes(),
                _ => ext_word,
            };
            header.apply_extension(ext_word);
        }

        // declared length beyond end of file
        if let Some(len) = self.source.len() {
            if header.end() > len {
                self.truncated(marker_offset);
                return Ok(None);
            }
        }

        Ok(Some(header))
    }

    /// Returns the next top-level object with payload loaded, `None`
    /// at end of file. Truncation mid-payload ends iteration with a
    /// `Truncated` warning instead of an error.
    pub fn next_object(&mut self) -> Option<Result<Object, EventioError>> {
        let header = match self.read_top_header() {
            Ok(Some(header)) => header,
            Ok(None) => return None,
            Err(err) => {
                self.finished = true;
                return Some(Err(err));
            }
        };

        let mut data = vec![0u8; header.length() as usize];
        match self.source.read_at_most(&mut data) {
            Ok(got) if got < data.len() => {
                self.truncated(header.offset());
                return None;
            }
            Ok(_) => {}
            Err(err) => {
                self.finished = true;
                return Some(Err(err));
            }
        }

        Some(Ok(Object {
            header,
            data,
            endian: self.endian.unwrap_or(Endian::Little),
        }))
    }

    /// Returns the next header only, skipping its payload without
    /// loading it. Uses native seek when available, read-and-discard
    /// otherwise.
    pub fn next_header(&mut self) -> Option<Result<ObjectHeader, EventioError>> {
        let header = match self.read_top_header() {
            Ok(Some(header)) => header,
            Ok(None) => return None,
            Err(err) => {
                self.finished = true;
                return Some(Err(err));
            }
        };
        if let Err(err) = self.source.skip(header.length()) {
            match err {
                EventioError::UnexpectedEnd { .. } => {
                    self.truncated(header.offset());
                    return None;
                }
                other => {
                    self.finished = true;
                    return Some(Err(other));
                }
            }
        }
        Some(Ok(header))
    }

    /// Re-reads the payload of a previously seen object. Requires a
    /// seekable source; iteration state is preserved.
    pub fn read_payload(&mut self, header: &ObjectHeader) -> Result<Vec<u8>, EventioError> {
        if !self.source.is_seekable() {
            return Err(EventioError::NotSeekable);
        }
        let saved = self.source.tell()?;
        self.source.seek_to(header.data_offset())?;
        let mut data = vec![0u8; header.length() as usize];
        let result = self.source.read_exact_or_end(&mut data);
        self.source.seek_to(saved)?;
        result?;
        Ok(data)
    }

    /// Decodes the next object through the type registry. Unknown
    /// types surface as [`Record::Unknown`]; contextual state
    /// (telescope lookup, camera shapes) is updated inline before
    /// the record is returned.
    pub fn next_record(&mut self) -> Option<Result<(ObjectHeader, Record), EventioError>> {
        let object = match self.next_object()? {
            Ok(object) => object,
            Err(err) => return Some(Err(err)),
        };
        let record = decode_object(&object.as_view(), &mut self.context);
        Some(record.map(|record| (object.header.clone(), record)))
    }

    /// Lazy iterator over decoded records.
    pub fn records(&mut self) -> Records<'_> {
        Records { file: self }
    }

    /// Lazy iterator over top-level headers, payloads skipped.
    pub fn headers(&mut self) -> Headers<'_> {
        Headers { file: self }
    }

    /// Lazy iterator over top-level objects with payload loaded.
    pub fn objects(&mut self) -> Objects<'_> {
        Objects { file: self }
    }

    fn resolve_endian(
        &mut self,
        marker: [u8; 4],
        offset: u64,
    ) -> Result<Endian, EventioError> {
        let from_marker = match marker {
            SYNC_MARKER_LE => Some(Endian::Little),
            SYNC_MARKER_BE => Some(Endian::Big),
            _ => None,
        };
        match (self.endian, from_marker) {
            // the first marker fixes the byte order for the file
            (None, Some(endian)) => {
                self.endian = Some(endian);
                Ok(endian)
            }
            (Some(fixed), Some(endian)) if fixed == endian => Ok(endian),
            _ => {
                self.finished = true;
                Err(EventioError::MissingSyncMarker { offset })
            }
        }
    }

    fn truncated(&mut self, offset: u64) {
        self.finished = true;
        self.context.warn(WarningKind::Truncated, offset);
    }
}

/// Iterator over top-level headers; payload bytes are skipped, not
/// loaded.
pub struct Headers<'a> {
    file: &'a mut EventIo,
}

impl Iterator for Headers<'_> {
    type Item = Result<ObjectHeader, EventioError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.file.next_header()
    }
}

/// Iterator over top-level objects with payload loaded.
pub struct Objects<'a> {
    file: &'a mut EventIo,
}

impl Iterator for Objects<'_> {
    type Item = Result<Object, EventioError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.file.next_object()
    }
}

/// Iterator over decoded records.
pub struct Records<'a> {
    file: &'a mut EventIo,
}

impl Iterator for Records<'_> {
    type Item = Result<(ObjectHeader, Record), EventioError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.file.next_record()
    }
}
