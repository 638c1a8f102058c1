//! High-level reader for CORSIKA IACT files.
//!
//! Assembles the per-event object group (event header, array
//! offsets, telescope data blocks, event end) into flat
//! [`IactEvent`] records without exposing the container topology.
//!
//! ```rs
//! use eventio::IactFile;
//! use std::path::Path;
//!
//! fn main() -> std::io::Result<()> {
//!     let mut iact = IactFile::new(Path::new("one_shower.dat"))?;
//!     while let Some(event) = iact.next_event().transpose()? {
//!         for bunches in event.telescopes() {
//!             println!("tel {}: {} bunches", bunches.telescope_id, bunches.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::{
    errors::Warning,
    object_types::{
        ArrayOffsets, CorsikaEventHeader, CorsikaRunHeader, EventEnd, HistoryBlock, InputCard,
        PhotonBunches, Record, RunEnd, TelescopeData, TelescopeDefinition,
    },
    EventIo, EventioError,
};

/// One shower event: the CORSIKA event header with the photon
/// bunches of every telescope and shower reuse.
#[derive(Debug)]
pub struct IactEvent {
    pub header: CorsikaEventHeader,
    pub offsets: ArrayOffsets,
    /// One telescope-data block per shower reuse.
    pub reuses: Vec<TelescopeData>,
    pub end_block: EventEnd,
}

impl IactEvent {
    /// Photon bunches of the first (often only) reuse, indexed by
    /// telescope slot.
    pub fn telescopes(&self) -> &[PhotonBunches] {
        self.reuses
            .first()
            .map(|data| data.telescopes.as_slice())
            .unwrap_or(&[])
    }

    pub fn photon_bunches(&self, reuse: usize, tel_index: usize) -> Option<&PhotonBunches> {
        self.reuses.get(reuse)?.telescopes.get(tel_index)
    }
}

/// Reader over a CORSIKA IACT file. File-level objects (run header,
/// input card, telescope definition) are buffered as they appear and
/// stay accessible after iteration.
#[derive(Debug)]
pub struct IactFile {
    file: EventIo,
    run_header: Option<CorsikaRunHeader>,
    input_card: Option<InputCard>,
    telescope_definition: Option<TelescopeDefinition>,
    history: Vec<HistoryBlock>,
    run_end: Option<RunEnd>,
    pending_header: Option<CorsikaEventHeader>,
    pending_offsets: Option<ArrayOffsets>,
    pending_reuses: Vec<TelescopeData>,
}

impl IactFile {
    pub fn new(path: &Path) -> Result<Self, EventioError> {
        Ok(Self::from_eventio(EventIo::new(path)?))
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::from_eventio(EventIo::from_bytes(data))
    }

    fn from_eventio(file: EventIo) -> Self {
        Self {
            file,
            run_header: None,
            input_card: None,
            telescope_definition: None,
            history: Vec::new(),
            run_end: None,
            pending_header: None,
            pending_offsets: None,
            pending_reuses: Vec::new(),
        }
    }

    pub fn run_header(&self) -> Option<&CorsikaRunHeader> {
        self.run_header.as_ref()
    }

    pub fn input_card(&self) -> Option<&InputCard> {
        self.input_card.as_ref()
    }

    pub fn telescope_definition(&self) -> Option<&TelescopeDefinition> {
        self.telescope_definition.as_ref()
    }

    pub fn history(&self) -> &[HistoryBlock] {
        &self.history
    }

    /// Present once the run end block has been reached.
    pub fn run_end(&self) -> Option<&RunEnd> {
        self.run_end.as_ref()
    }

    /// Drains recoverable diagnostics collected so far.
    pub fn warnings(&mut self) -> Vec<Warning> {
        self.file.warnings()
    }

    /// Advances to the next complete shower event. `None` at end of
    /// file; recoverable trouble lands in [`Self::warnings`].
    pub fn next_event(&mut self) -> Option<Result<IactEvent, EventioError>> {
        loop {
            let (_, record) = match self.file.next_record()? {
                Ok(decoded) => decoded,
                Err(err) => return Some(Err(err)),
            };
            match record {
                Record::CorsikaRunHeader(header) => self.run_header = Some(header),
                Record::InputCard(card) => self.input_card = Some(card),
                Record::TelescopeDefinition(def) => self.telescope_definition = Some(def),
                Record::History(block) => self.history.push(block),
                Record::RunEnd(end) => self.run_end = Some(end),
                Record::CorsikaEventHeader(header) => {
                    self.pending_header = Some(header);
                    self.pending_offsets = None;
                    self.pending_reuses.clear();
                }
                Record::ArrayOffsets(offsets) => self.pending_offsets = Some(offsets),
                Record::TelescopeData(data) => self.pending_reuses.push(data),
                Record::EventEnd(end_block) => {
                    let (Some(header), Some(offsets)) =
                        (self.pending_header.take(), self.pending_offsets.take())
                    else {
                        continue;
                    };
                    return Some(Ok(IactEvent {
                        header,
                        offsets,
                        reuses: std::mem::take(&mut self.pending_reuses),
                        end_block,
                    }));
                }
                _ => {}
            }
        }
    }
}

impl Iterator for IactFile {
    type Item = Result<IactEvent, EventioError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
