//! Constants shared across the container and payload layers.

use time::OffsetDateTime;

/// Sync marker separating top-level objects, as stored in a
/// little-endian file. Big-endian files store the same value
/// byte-reversed; the orientation of the first marker fixes the
/// byte order for the whole file.
pub const SYNC_MARKER_LE: [u8; 4] = [0x37, 0x8A, 0x1F, 0xD4];

/// Sync marker byte order for big-endian files.
pub const SYNC_MARKER_BE: [u8; 4] = [0xD4, 0x1F, 0x8A, 0x37];

/// Object header size in bytes, excluding sync marker and the
/// optional extension word.
pub const HEADER_SIZE: u64 = 12;

/// Size of the optional header extension word.
pub const EXTENSION_SIZE: u64 = 4;

/// Upper bound on sub-object nesting. Real files stay at three
/// levels; anything deeper is treated as a malformed stream.
pub const MAX_NESTING_DEPTH: usize = 8;

/// Storage index of the high-gain channel in per-gain arrays.
pub const HI_GAIN: usize = 0;

/// Storage index of the low-gain channel in per-gain arrays.
pub const LO_GAIN: usize = 1;

/// Number of telescope-id lookup tables a reader can hold.
pub const MAX_TEL_LOOKUPS: usize = 3;

/// `adc_known` bit: integrated sum decoded for this gain/pixel.
pub const KNOWN_SUM: u8 = 0x01;

/// `adc_known` bit: samples decoded for this gain/pixel.
pub const KNOWN_SAMPLES: u8 = 0x02;

/// `significant` bit set for pixels with decoded sample traces.
pub const SIGNIFICANT_SAMPLES: u8 = 0x20;

/// Converts unix seconds to a date-time, for run start and
/// monitoring timestamps. Returns `None` for out-of-range values.
pub fn unix_datetime(seconds: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).ok()
}
