//! Read-only decoder for the EventIO container format used by the
//! CORSIKA IACT extension and the sim_telarray simulation suite.
//! Does not and will not support writing EventIO data.
//!
//! The format is a stream of hierarchically nested, self-describing
//! binary objects. This crate decodes the container framing, the
//! primitive codecs (varints, differential arrays, packed bit
//! fields) and the registered payload types, over plain, gzip or
//! zstd compressed files.
//!
//! ```rs
//! use eventio::{EventIo, SimtelFile};
//! use std::path::Path;
//!
//! fn main() -> std::io::Result<()> {
//!     // Raw object iteration
//!     let mut file = EventIo::new(Path::new("gamma_test.simtel.gz"))?;
//!     for object in file.into_iter() {
//!         println!("{:?}", object.header());
//!     }
//!
//!     // Assembled array events
//!     let mut simtel = SimtelFile::new(Path::new("gamma_test.simtel.gz"))?;
//!     while let Some(event) = simtel.next_event().transpose()? {
//!         println!("{} telescopes", event.telescope_events.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod consts;
pub mod cursor;
pub mod errors;
pub mod eventio;
pub mod iact;
pub mod object;
pub mod object_types;
pub mod simtel;
pub mod tests;

// Internal byte source and shared list codecs
pub(crate) mod source;
pub(crate) mod support;

pub use cursor::PayloadCursor;
pub use errors::{EventioError, Warning, WarningKind};
pub use eventio::EventIo;
pub use iact::{IactEvent, IactFile};
pub use object::{Object, ObjectHeader, ObjectView};
pub use object_types::{
    AdcSamples,
    AdcSums,
    ArrayOffsets,
    CameraOrganisation,
    CameraSettings,
    CentralEvent,
    CorsikaEventHeader,
    CorsikaRunHeader,
    DecodeContext,
    HistoryBlock,
    McEvent,
    McRunHeader,
    McShower,
    ObjectType,
    PhotonBunches,
    PixelTiming,
    Record,
    RunHeader,
    TelEventHeader,
    TelescopeEvent,
    TelescopeLookup,
    TrackingPosition,
    decode_object,
};
pub use simtel::{ArrayEvent, SimtelFile, TelescopeDescription};
