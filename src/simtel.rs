//! High-level reader for sim_telarray files.
//!
//! Telescope descriptions and calibration objects become file-level
//! state; the per-event objects (MC shower/event, central trigger,
//! tracking, telescope events, photo-electron data) are grouped into
//! flat [`ArrayEvent`] records. An event closes when the next MC
//! event or shower begins, or at end of file.

use std::{collections::BTreeMap, path::Path};

use crate::{
    errors::Warning,
    object_types::{
        CameraOrganisation, CameraSettings, CameraSoftSet, CentralEvent, HistoryBlock,
        LaserCalibration, McEvent, McPeSum, McPhotoelectrons, McRunHeader, McShower,
        PixelDisabled, PixelSetting, PointingCorrection, Record, RunHeader, StereoReconstruction,
        TelMonitoring, TelescopeEvent, TrackingPosition, TrackingSetup,
    },
    EventIo, EventioError,
};

/// Per-telescope configuration and calibration state collected from
/// the file head (and refreshed if re-sent mid-run).
#[derive(Debug, Default)]
pub struct TelescopeDescription {
    pub camera_settings: Option<CameraSettings>,
    pub camera_organisation: Option<CameraOrganisation>,
    pub pixel_setting: Option<PixelSetting>,
    pub pixel_disabled: Option<PixelDisabled>,
    pub camera_soft_set: Option<CameraSoftSet>,
    pub pointing_correction: Option<PointingCorrection>,
    pub tracking_setup: Option<TrackingSetup>,
    pub laser_calibration: Option<LaserCalibration>,
    pub monitoring: Vec<TelMonitoring>,
}

/// One array event with everything that belongs to it.
#[derive(Debug, Default)]
pub struct ArrayEvent {
    pub mc_shower: Option<McShower>,
    pub mc_event: Option<McEvent>,
    /// Central trigger record; present for triggered events.
    pub trigger: Option<CentralEvent>,
    pub telescope_events: BTreeMap<i32, TelescopeEvent>,
    pub tracking: BTreeMap<i32, TrackingPosition>,
    pub photoelectron_sums: Option<McPeSum>,
    /// True photo-electrons keyed by telescope slot index.
    pub photoelectrons: BTreeMap<i32, McPhotoelectrons>,
    pub reconstruction: Option<StereoReconstruction>,
}

impl ArrayEvent {
    fn is_empty(&self) -> bool {
        self.mc_event.is_none()
            && self.trigger.is_none()
            && self.telescope_events.is_empty()
            && self.photoelectron_sums.is_none()
            && self.photoelectrons.is_empty()
    }
}

/// Reader over a sim_telarray file.
#[derive(Debug)]
pub struct SimtelFile {
    file: EventIo,
    run_header: Option<RunHeader>,
    mc_run_header: Option<McRunHeader>,
    history: Vec<HistoryBlock>,
    telescope_descriptions: BTreeMap<i32, TelescopeDescription>,
    current_shower: Option<McShower>,
    pending: ArrayEvent,
    finished: bool,
}

impl SimtelFile {
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
            mc_run_header: None,
            history: Vec::new(),
            telescope_descriptions: BTreeMap::new(),
            current_shower: None,
            pending: ArrayEvent::default(),
            finished: false,
        }
    }

    pub fn run_header(&self) -> Option<&RunHeader> {
        self.run_header.as_ref()
    }

    pub fn mc_run_header(&self) -> Option<&McRunHeader> {
        self.mc_run_header.as_ref()
    }

    pub fn history(&self) -> &[HistoryBlock] {
        &self.history
    }

    pub fn telescope_descriptions(&self) -> &BTreeMap<i32, TelescopeDescription> {
        &self.telescope_descriptions
    }

    /// Drains recoverable diagnostics collected so far.
    pub fn warnings(&mut self) -> Vec<Warning> {
        self.file.warnings()
    }

    fn description(&mut self, tel_id: i32) -> &mut TelescopeDescription {
        self.telescope_descriptions.entry(tel_id).or_default()
    }

    /// Closes the pending event, attaching the current shower.
    fn flush(&mut self) -> Option<ArrayEvent> {
        if self.pending.is_empty() {
            return None;
        }
        let mut event = std::mem::take(&mut self.pending);
        event.mc_shower = self.current_shower.clone();
        Some(event)
    }

    /// Advances to the next complete array event. `None` at end of
    /// file.
    pub fn next_event(&mut self) -> Option<Result<ArrayEvent, EventioError>> {
        if self.finished {
            return None;
        }
        loop {
            let (_, record) = match self.file.next_record() {
                Some(Ok(decoded)) => decoded,
                Some(Err(err)) => return Some(Err(err)),
                None => {
                    self.finished = true;
                    return self.flush().map(Ok);
                }
            };
            match record {
                Record::RunHeader(header) => self.run_header = Some(header),
                Record::McRunHeader(header) => self.mc_run_header = Some(header),
                Record::History(block) => self.history.push(block),
                Record::CameraSettings(s) => {
                    let tel_id = s.tel_id;
                    self.description(tel_id).camera_settings = Some(s);
                }
                Record::CameraOrganisation(o) => {
                    let tel_id = o.tel_id;
                    self.description(tel_id).camera_organisation = Some(o);
                }
                Record::PixelSetting(s) => {
                    let tel_id = s.tel_id;
                    self.description(tel_id).pixel_setting = Some(s);
                }
                Record::PixelDisabled(d) => {
                    let tel_id = d.tel_id;
                    self.description(tel_id).pixel_disabled = Some(d);
                }
                Record::CameraSoftSet(s) => {
                    let tel_id = s.tel_id;
                    self.description(tel_id).camera_soft_set = Some(s);
                }
                Record::PointingCorrection(c) => {
                    let tel_id = c.tel_id;
                    self.description(tel_id).pointing_correction = Some(c);
                }
                Record::TrackingSetup(s) => {
                    let tel_id = s.tel_id;
                    self.description(tel_id).tracking_setup = Some(s);
                }
                Record::LaserCalibration(c) => {
                    let tel_id = c.tel_id;
                    self.description(tel_id).laser_calibration = Some(c);
                }
                Record::TelMonitoring(m) => {
                    self.description(m.tel_id).monitoring.push(m);
                }
                Record::McShower(shower) => {
                    let flushed = self.flush();
                    self.current_shower = Some(shower);
                    if let Some(event) = flushed {
                        return Some(Ok(event));
                    }
                }
                Record::McEvent(mc_event) => {
                    let flushed = self.flush();
                    self.pending.mc_event = Some(mc_event);
                    if let Some(event) = flushed {
                        return Some(Ok(event));
                    }
                }
                Record::CentralEvent(trigger) => self.pending.trigger = Some(trigger),
                Record::TrackingPosition(tracking) => {
                    self.pending.tracking.insert(tracking.tel_id, tracking);
                }
                Record::TelescopeEvent(event) => {
                    self.pending.telescope_events.insert(event.tel_id, event);
                }
                Record::McPeSum(sums) => self.pending.photoelectron_sums = Some(sums),
                Record::McPhotoelectrons(pe) => {
                    self.pending.photoelectrons.insert(pe.tel_index, pe);
                }
                Record::StereoReconstruction(rec) => {
                    self.pending.reconstruction = Some(rec);
                }
                _ => {}
            }
        }
    }
}

impl Iterator for SimtelFile {
    type Item = Result<ArrayEvent, EventioError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
