//! Byte source abstraction over raw, gzip and zstd inputs.
//!
//! Presents one uniform read/seek surface regardless of compression.
//! Compressed adapters emulate seeking: short forward seeks read and
//! discard, backward seeks reopen the file and re-skip from the start
//! of the stream. Object iteration never requires seeking, so
//! non-seekable sources still support full sequential decoding.

use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;

use crate::EventioError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// A positioned byte stream over one input file or buffer.
pub(crate) enum ByteSource {
    /// Uncompressed file, direct read/seek.
    File {
        reader: BufReader<File>,
        len: u64,
    },
    /// Gzip-compressed file. Position is tracked in decompressed bytes.
    Gzip {
        decoder: GzDecoder<BufReader<File>>,
        path: PathBuf,
        pos: u64,
    },
    /// Zstd-compressed file. Position is tracked in decompressed bytes.
    Zstd {
        decoder: zstd::stream::read::Decoder<'static, BufReader<File>>,
        path: PathBuf,
        pos: u64,
    },
    /// In-memory buffer.
    Memory(Cursor<Vec<u8>>),
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { len, .. } => f.debug_struct("File").field("len", len).finish(),
            Self::Gzip { path, pos, .. } => f
                .debug_struct("Gzip")
                .field("path", path)
                .field("pos", pos)
                .finish(),
            Self::Zstd { path, pos, .. } => f
                .debug_struct("Zstd")
                .field("path", path)
                .field("pos", pos)
                .finish(),
            Self::Memory(cursor) => f
                .debug_struct("Memory")
                .field("len", &cursor.get_ref().len())
                .finish(),
        }
    }
}

impl Read for ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File { reader, .. } => reader.read(buf),
            Self::Gzip { decoder, pos, .. } => {
                let n = decoder.read(buf)?;
                *pos += n as u64;
                Ok(n)
            }
            Self::Zstd { decoder, pos, .. } => {
                let n = decoder.read(buf)?;
                *pos += n as u64;
                Ok(n)
            }
            Self::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl ByteSource {
    /// Opens `path`, sniffing gzip/zstd magic bytes to pick the adapter.
    pub(crate) fn open(path: &Path) -> Result<Self, EventioError> {
        let mut file = File::open(path)?;
        let mut magic = [0u8; 4];
        let got = read_at_most(&mut file, &mut magic)?;
        file.seek(SeekFrom::Start(0))?;

        if got >= 2 && magic[..2] == GZIP_MAGIC {
            return Ok(Self::Gzip {
                decoder: GzDecoder::new(BufReader::new(file)),
                path: path.to_owned(),
                pos: 0,
            });
        }
        if got >= 4 && magic == ZSTD_MAGIC {
            let decoder = zstd::stream::read::Decoder::new(file).map_err(|err| {
                EventioError::CompressionError {
                    offset: 0,
                    message: err.to_string(),
                }
            })?;
            return Ok(Self::Zstd {
                decoder,
                path: path.to_owned(),
                pos: 0,
            });
        }

        let len = file.metadata()?.len();
        Ok(Self::File {
            reader: BufReader::new(file),
            len,
        })
    }

    /// Wraps an in-memory buffer, mainly for tests and pre-loaded data.
    pub(crate) fn from_bytes(data: Vec<u8>) -> Self {
        Self::Memory(Cursor::new(data))
    }

    /// Whether native seeking is available. Compressed adapters
    /// report `false`; their seeks are emulated.
    pub(crate) fn is_seekable(&self) -> bool {
        matches!(self, Self::File { .. } | Self::Memory(_))
    }

    /// Total decompressed length, if known up front.
    pub(crate) fn len(&self) -> Option<u64> {
        match self {
            Self::File { len, .. } => Some(*len),
            Self::Memory(cursor) => Some(cursor.get_ref().len() as u64),
            _ => None,
        }
    }

    /// Current position in decompressed bytes.
    pub(crate) fn tell(&mut self) -> Result<u64, EventioError> {
        match self {
            Self::File { reader, .. } => Ok(reader.stream_position()?),
            Self::Gzip { pos, .. } | Self::Zstd { pos, .. } => Ok(*pos),
            Self::Memory(cursor) => Ok(cursor.position()),
        }
    }

    /// Moves to absolute position `target` (decompressed bytes).
    /// For compressed adapters a backward seek reopens the file and
    /// re-skips; forward seeks read and discard.
    pub(crate) fn seek_to(&mut self, target: u64) -> Result<u64, EventioError> {
        match self {
            Self::File { reader, .. } => Ok(reader.seek(SeekFrom::Start(target))?),
            Self::Memory(cursor) => Ok(cursor.seek(SeekFrom::Start(target))?),
            Self::Gzip { .. } | Self::Zstd { .. } => {
                if target < self.tell()? {
                    self.reopen()?;
                }
                let current = self.tell()?;
                self.skip(target - current)?;
                Ok(target)
            }
        }
    }

    /// Reads and discards `n` bytes.
    pub(crate) fn skip(&mut self, n: u64) -> Result<(), EventioError> {
        match self {
            Self::File { reader, .. } => {
                reader.seek_relative(n as i64)?;
                Ok(())
            }
            Self::Memory(cursor) => {
                cursor.seek(SeekFrom::Current(n as i64))?;
                Ok(())
            }
            _ => {
                let offset = self.tell()?;
                let copied = io::copy(&mut self.by_ref().take(n), &mut io::sink())
                    .map_err(|err| compression_error(offset, err))?;
                if copied < n {
                    return Err(EventioError::UnexpectedEnd {
                        offset: offset + copied,
                        requested: n as usize,
                        remaining: copied as usize,
                    });
                }
                Ok(())
            }
        }
    }

    /// Fills `buf` completely or fails with `UnexpectedEnd`.
    pub(crate) fn read_exact_or_end(&mut self, buf: &mut [u8]) -> Result<(), EventioError> {
        let offset = self.tell()?;
        let got = read_at_most(self, buf)?;
        if got < buf.len() {
            return Err(EventioError::UnexpectedEnd {
                offset,
                requested: buf.len(),
                remaining: got,
            });
        }
        Ok(())
    }

    /// Fills as much of `buf` as the stream still holds and returns
    /// the byte count; `0` signals clean end-of-stream.
    pub(crate) fn read_at_most(&mut self, buf: &mut [u8]) -> Result<usize, EventioError> {
        let offset = self.tell()?;
        read_at_most(self, buf).map_err(|err| compression_error(offset, err))
    }

    /// Rebuilds a compressed decoder from the start of the stream.
    fn reopen(&mut self) -> Result<(), EventioError> {
        match self {
            Self::Gzip { decoder, path, pos } => {
                let file = File::open(&*path)?;
                *decoder = GzDecoder::new(BufReader::new(file));
                *pos = 0;
                Ok(())
            }
            Self::Zstd { decoder, path, pos } => {
                let file = File::open(&*path)?;
                *decoder =
                    zstd::stream::read::Decoder::new(file).map_err(|err| {
                        EventioError::CompressionError {
                            offset: 0,
                            message: err.to_string(),
                        }
                    })?;
                *pos = 0;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Like `read_exact` but tolerates end-of-stream, returning the
/// number of bytes actually read.
fn read_at_most(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

fn compression_error(offset: u64, err: io::Error) -> EventioError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
            EventioError::CompressionError {
                offset,
                message: err.to_string(),
            }
        }
        _ => EventioError::IOError(err),
    }
}
