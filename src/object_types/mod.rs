//! Typed payload decoders and the (type, version) dispatcher.
//!
//! Each object type decodes into one immutable record. Unknown type
//! codes surface as [`Record::Unknown`] so callers can walk past
//! them. The dispatcher owns the only mutable per-file state: the
//! telescope-id lookup tables and per-telescope camera shapes, both
//! populated inline while decoding and consulted by later decoders.

mod adc;
mod array_offsets;
mod aux_traces;
mod calibration_event;
mod camera_organisation;
mod camera_settings;
mod camera_soft_set;
mod central_event;
mod corsika_event_header;
mod corsika_run_header;
mod event_end;
mod histogram;
mod history;
mod image_parameters;
mod input_card;
mod laser_calibration;
mod mc_event;
mod mc_pe_sum;
mod mc_photoelectrons;
mod mc_run_header;
mod mc_shower;
mod photons;
mod pixel_calibrated;
mod pixel_disabled;
mod pixel_list;
mod pixel_setting;
mod pixel_timing;
mod pixel_trigger_times;
mod pointing_correction;
mod run_end;
mod run_header;
mod stereo_reconstruction;
mod tel_event_header;
mod tel_monitoring;
mod telescope_data;
mod telescope_definition;
mod telescope_event;
mod tracking_position;
mod tracking_setup;

pub use adc::{AdcSamples, AdcSums};
pub use array_offsets::ArrayOffsets;
pub use aux_traces::AuxiliaryTraces;
pub use calibration_event::CalibrationEvent;
pub use camera_organisation::CameraOrganisation;
pub use camera_settings::CameraSettings;
pub use camera_soft_set::CameraSoftSet;
pub use central_event::CentralEvent;
pub use corsika_event_header::CorsikaEventHeader;
pub use corsika_run_header::CorsikaRunHeader;
pub use event_end::EventEnd;
pub use histogram::{Histogram, Histograms};
pub use history::{HistoryBlock, HistoryEntry};
pub use image_parameters::ImageParameters;
pub use input_card::InputCard;
pub use laser_calibration::LaserCalibration;
pub use mc_event::McEvent;
pub use mc_pe_sum::McPeSum;
pub use mc_photoelectrons::McPhotoelectrons;
pub use mc_run_header::McRunHeader;
pub use mc_shower::McShower;
pub use photons::PhotonBunches;
pub use pixel_calibrated::PixelCalibrated;
pub use pixel_disabled::PixelDisabled;
pub use pixel_list::PixelList;
pub use pixel_setting::PixelSetting;
pub use pixel_timing::PixelTiming;
pub use pixel_trigger_times::PixelTriggerTimes;
pub use pointing_correction::PointingCorrection;
pub use run_end::RunEnd;
pub use run_header::RunHeader;
pub use stereo_reconstruction::StereoReconstruction;
pub use tel_event_header::TelEventHeader;
pub use tel_monitoring::TelMonitoring;
pub use telescope_data::TelescopeData;
pub use telescope_definition::TelescopeDefinition;
pub use telescope_event::TelescopeEvent;
pub use tracking_position::TrackingPosition;
pub use tracking_setup::TrackingSetup;

use std::collections::HashMap;

use crate::{
    consts::MAX_TEL_LOOKUPS,
    cursor::PayloadCursor,
    errors::{Warning, WarningKind},
    object::{ObjectHeader, ObjectView},
    EventioError,
};

/// Registry key for the known object types. Type codes outside the
/// registry map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    HistoryBlock,
    HistoryCommandLine,
    HistoryConfig,
    Histograms,
    CorsikaRunHeader,
    TelescopeDefinition,
    CorsikaEventHeader,
    ArrayOffsets,
    TelescopeData,
    Photons,
    EventEnd,
    RunEnd,
    InputCard,
    RunHeader,
    McRunHeader,
    CameraSettings,
    CameraOrganisation,
    PixelSetting,
    PixelDisabled,
    CameraSoftSet,
    PointingCorrection,
    TrackingSetup,
    CentralEvent,
    TelEventHeader,
    AdcSums,
    AdcSamples,
    ImageParameters,
    StereoReconstruction,
    PixelTiming,
    PixelCalibrated,
    McShower,
    McEvent,
    TelMonitoring,
    LaserCalibration,
    McPhotoelectrons,
    McPeSum,
    PixelList,
    CalibrationEvent,
    AuxDigitalTraces,
    AuxAnalogTraces,
    PixelTriggerTimes,
    /// 2100 + telescope offset.
    TrackingPosition(u16),
    /// 2200 + telescope offset.
    TelescopeEvent(u16),
    Unknown(u16),
}

impl ObjectType {
    pub fn from_code(code: u16) -> Self {
        match code {
            70 => Self::HistoryBlock,
            71 => Self::HistoryCommandLine,
            72 => Self::HistoryConfig,
            100 => Self::Histograms,
            1200 => Self::CorsikaRunHeader,
            1201 => Self::TelescopeDefinition,
            1202 => Self::CorsikaEventHeader,
            1203 => Self::ArrayOffsets,
            1204 => Self::TelescopeData,
            1205 => Self::Photons,
            1209 => Self::EventEnd,
            1210 => Self::RunEnd,
            1212 => Self::InputCard,
            2000 => Self::RunHeader,
            2001 => Self::McRunHeader,
            2002 => Self::CameraSettings,
            2003 => Self::CameraOrganisation,
            2004 => Self::PixelSetting,
            2005 => Self::PixelDisabled,
            2006 => Self::CameraSoftSet,
            2007 => Self::PointingCorrection,
            2008 => Self::TrackingSetup,
            2009 => Self::CentralEvent,
            2011 => Self::TelEventHeader,
            2012 => Self::AdcSums,
            2013 => Self::AdcSamples,
            2014 => Self::ImageParameters,
            2015 => Self::StereoReconstruction,
            2016 => Self::PixelTiming,
            2017 => Self::PixelCalibrated,
            2020 => Self::McShower,
            2021 => Self::McEvent,
            2022 => Self::TelMonitoring,
            2023 => Self::LaserCalibration,
            2025 => Self::McPhotoelectrons,
            2026 => Self::McPeSum,
            2027 => Self::PixelList,
            2028 => Self::CalibrationEvent,
            2029 => Self::AuxDigitalTraces,
            2030 => Self::AuxAnalogTraces,
            2032 => Self::PixelTriggerTimes,
            2100..=2199 => Self::TrackingPosition(code),
            2200..=2299 => Self::TelescopeEvent(code),
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::HistoryBlock => 70,
            Self::HistoryCommandLine => 71,
            Self::HistoryConfig => 72,
            Self::Histograms => 100,
            Self::CorsikaRunHeader => 1200,
            Self::TelescopeDefinition => 1201,
            Self::CorsikaEventHeader => 1202,
            Self::ArrayOffsets => 1203,
            Self::TelescopeData => 1204,
            Self::Photons => 1205,
            Self::EventEnd => 1209,
            Self::RunEnd => 1210,
            Self::InputCard => 1212,
            Self::RunHeader => 2000,
            Self::McRunHeader => 2001,
            Self::CameraSettings => 2002,
            Self::CameraOrganisation => 2003,
            Self::PixelSetting => 2004,
            Self::PixelDisabled => 2005,
            Self::CameraSoftSet => 2006,
            Self::PointingCorrection => 2007,
            Self::TrackingSetup => 2008,
            Self::CentralEvent => 2009,
            Self::TelEventHeader => 2011,
            Self::AdcSums => 2012,
            Self::AdcSamples => 2013,
            Self::ImageParameters => 2014,
            Self::StereoReconstruction => 2015,
            Self::PixelTiming => 2016,
            Self::PixelCalibrated => 2017,
            Self::McShower => 2020,
            Self::McEvent => 2021,
            Self::TelMonitoring => 2022,
            Self::LaserCalibration => 2023,
            Self::McPhotoelectrons => 2025,
            Self::McPeSum => 2026,
            Self::PixelList => 2027,
            Self::CalibrationEvent => 2028,
            Self::AuxDigitalTraces => 2029,
            Self::AuxAnalogTraces => 2030,
            Self::PixelTriggerTimes => 2032,
            Self::TrackingPosition(code) => *code,
            Self::TelescopeEvent(code) => *code,
            Self::Unknown(code) => *code,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HistoryBlock => "HistoryBlock",
            Self::HistoryCommandLine => "HistoryCommandLine",
            Self::HistoryConfig => "HistoryConfig",
            Self::Histograms => "Histograms",
            Self::CorsikaRunHeader => "CorsikaRunHeader",
            Self::TelescopeDefinition => "TelescopeDefinition",
            Self::CorsikaEventHeader => "CorsikaEventHeader",
            Self::ArrayOffsets => "ArrayOffsets",
            Self::TelescopeData => "TelescopeData",
            Self::Photons => "Photons",
            Self::EventEnd => "EventEnd",
            Self::RunEnd => "RunEnd",
            Self::InputCard => "InputCard",
            Self::RunHeader => "RunHeader",
            Self::McRunHeader => "McRunHeader",
            Self::CameraSettings => "CameraSettings",
            Self::CameraOrganisation => "CameraOrganisation",
            Self::PixelSetting => "PixelSetting",
            Self::PixelDisabled => "PixelDisabled",
            Self::CameraSoftSet => "CameraSoftSet",
            Self::PointingCorrection => "PointingCorrection",
            Self::TrackingSetup => "TrackingSetup",
            Self::CentralEvent => "CentralEvent",
            Self::TelEventHeader => "TelEventHeader",
            Self::AdcSums => "AdcSums",
            Self::AdcSamples => "AdcSamples",
            Self::ImageParameters => "ImageParameters",
            Self::StereoReconstruction => "StereoReconstruction",
            Self::PixelTiming => "PixelTiming",
            Self::PixelCalibrated => "PixelCalibrated",
            Self::McShower => "McShower",
            Self::McEvent => "McEvent",
            Self::TelMonitoring => "TelMonitoring",
            Self::LaserCalibration => "LaserCalibration",
            Self::McPhotoelectrons => "McPhotoelectrons",
            Self::McPeSum => "McPeSum",
            Self::PixelList => "PixelList",
            Self::CalibrationEvent => "CalibrationEvent",
            Self::AuxDigitalTraces => "AuxDigitalTraces",
            Self::AuxAnalogTraces => "AuxAnalogTraces",
            Self::PixelTriggerTimes => "PixelTriggerTimes",
            Self::TrackingPosition(_) => "TrackingPosition",
            Self::TelescopeEvent(_) => "TelescopeEvent",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Payload of an unregistered type code, kept opaque.
#[derive(Debug, Clone)]
pub struct UnknownObject {
    pub type_code: u16,
    pub version: u16,
    pub id: i32,
    pub data: Vec<u8>,
}

/// The decoded form of one object.
#[derive(Debug)]
pub enum Record {
    History(HistoryBlock),
    HistoryCommandLine(HistoryEntry),
    HistoryConfig(HistoryEntry),
    Histograms(Histograms),
    CorsikaRunHeader(CorsikaRunHeader),
    TelescopeDefinition(TelescopeDefinition),
    CorsikaEventHeader(CorsikaEventHeader),
    ArrayOffsets(ArrayOffsets),
    TelescopeData(TelescopeData),
    Photons(PhotonBunches),
    EventEnd(EventEnd),
    RunEnd(RunEnd),
    InputCard(InputCard),
    RunHeader(RunHeader),
    McRunHeader(McRunHeader),
    CameraSettings(CameraSettings),
    CameraOrganisation(CameraOrganisation),
    PixelSetting(PixelSetting),
    PixelDisabled(PixelDisabled),
    CameraSoftSet(CameraSoftSet),
    PointingCorrection(PointingCorrection),
    TrackingSetup(TrackingSetup),
    CentralEvent(CentralEvent),
    TelEventHeader(TelEventHeader),
    AdcSums(AdcSums),
    AdcSamples(AdcSamples),
    ImageParameters(ImageParameters),
    StereoReconstruction(StereoReconstruction),
    PixelTiming(PixelTiming),
    PixelCalibrated(PixelCalibrated),
    McShower(McShower),
    McEvent(McEvent),
    TelMonitoring(TelMonitoring),
    LaserCalibration(LaserCalibration),
    McPhotoelectrons(McPhotoelectrons),
    McPeSum(McPeSum),
    PixelList(PixelList),
    CalibrationEvent(CalibrationEvent),
    AuxiliaryTraces(AuxiliaryTraces),
    PixelTriggerTimes(PixelTriggerTimes),
    TrackingPosition(TrackingPosition),
    TelescopeEvent(TelescopeEvent),
    Unknown(UnknownObject),
}

impl Record {
    pub fn object_type(&self) -> &'static str {
        match self {
            Record::History(_) => "HistoryBlock",
            Record::HistoryCommandLine(_) => "HistoryCommandLine",
            Record::HistoryConfig(_) => "HistoryConfig",
            Record::Histograms(_) => "Histograms",
            Record::CorsikaRunHeader(_) => "CorsikaRunHeader",
            Record::TelescopeDefinition(_) => "TelescopeDefinition",
            Record::CorsikaEventHeader(_) => "CorsikaEventHeader",
            Record::ArrayOffsets(_) => "ArrayOffsets",
            Record::TelescopeData(_) => "TelescopeData",
            Record::Photons(_) => "Photons",
            Record::EventEnd(_) => "EventEnd",
            Record::RunEnd(_) => "RunEnd",
            Record::InputCard(_) => "InputCard",
            Record::RunHeader(_) => "RunHeader",
            Record::McRunHeader(_) => "McRunHeader",
            Record::CameraSettings(_) => "CameraSettings",
            Record::CameraOrganisation(_) => "CameraOrganisation",
            Record::PixelSetting(_) => "PixelSetting",
            Record::PixelDisabled(_) => "PixelDisabled",
            Record::CameraSoftSet(_) => "CameraSoftSet",
            Record::PointingCorrection(_) => "PointingCorrection",
            Record::TrackingSetup(_) => "TrackingSetup",
            Record::CentralEvent(_) => "CentralEvent",
            Record::TelEventHeader(_) => "TelEventHeader",
            Record::AdcSums(_) => "AdcSums",
            Record::AdcSamples(_) => "AdcSamples",
            Record::ImageParameters(_) => "ImageParameters",
            Record::StereoReconstruction(_) => "StereoReconstruction",
            Record::PixelTiming(_) => "PixelTiming",
            Record::PixelCalibrated(_) => "PixelCalibrated",
            Record::McShower(_) => "McShower",
            Record::McEvent(_) => "McEvent",
            Record::TelMonitoring(_) => "TelMonitoring",
            Record::LaserCalibration(_) => "LaserCalibration",
            Record::McPhotoelectrons(_) => "McPhotoelectrons",
            Record::McPeSum(_) => "McPeSum",
            Record::PixelList(_) => "PixelList",
            Record::CalibrationEvent(_) => "CalibrationEvent",
            Record::AuxiliaryTraces(_) => "AuxiliaryTraces",
            Record::PixelTriggerTimes(_) => "PixelTriggerTimes",
            Record::TrackingPosition(_) => "TrackingPosition",
            Record::TelescopeEvent(_) => "TelescopeEvent",
            Record::Unknown(_) => "Unknown",
        }
    }
}

/// Telescope-id to slot-index lookup, filled from a run header's
/// telescope table. Slot indices key the per-telescope arrays of all
/// later objects.
#[derive(Debug, Clone, Default)]
pub struct TelescopeLookup {
    tel_ids: Vec<i32>,
}

impl TelescopeLookup {
    pub fn new(tel_ids: Vec<i32>) -> Self {
        Self { tel_ids }
    }

    pub fn len(&self) -> usize {
        self.tel_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tel_ids.is_empty()
    }

    pub fn tel_ids(&self) -> &[i32] {
        &self.tel_ids
    }

    /// Slot index of `tel_id`, `None` if the telescope is not part
    /// of the configuration.
    pub fn find_index(&self, tel_id: i32) -> Option<usize> {
        self.tel_ids.iter().position(|id| *id == tel_id)
    }
}

/// Per-telescope pixel/gain counts, needed by ADC payloads whose
/// early versions do not carry the counts themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraShape {
    pub num_pixels: usize,
    pub num_gains: usize,
}

/// Mutable state carried across the decoding of one file.
#[derive(Debug)]
pub struct DecodeContext {
    lookups: [TelescopeLookup; MAX_TEL_LOOKUPS],
    lookup_ref: usize,
    shapes: HashMap<i32, CameraShape>,
    warnings: Vec<Warning>,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self {
            lookups: Default::default(),
            lookup_ref: 0,
            shapes: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Active telescope lookup table, `None` before a run header has
    /// been decoded.
    pub fn lookup(&self) -> Option<&TelescopeLookup> {
        let lookup = &self.lookups[self.lookup_ref];
        (!lookup.is_empty()).then_some(lookup)
    }

    pub fn set_lookup_reference(&mut self, index: usize) -> Result<(), EventioError> {
        if index >= MAX_TEL_LOOKUPS {
            return Err(EventioError::DecodeError {
                object_type: 0,
                version: 0,
                offset: 0,
                what: "lookup reference out of range",
            });
        }
        self.lookup_ref = index;
        Ok(())
    }

    /// Installs the telescope table decoded from a run header into
    /// the active slot. Runs before the run header record is
    /// surfaced to the caller.
    pub(crate) fn install_lookup(&mut self, tel_ids: Vec<i32>) {
        self.lookups[self.lookup_ref] = TelescopeLookup::new(tel_ids);
    }

    pub(crate) fn record_camera_shape(&mut self, tel_id: i32, shape: CameraShape) {
        let entry = self.shapes.entry(tel_id).or_default();
        if shape.num_pixels > 0 {
            entry.num_pixels = shape.num_pixels;
        }
        if shape.num_gains > 0 {
            entry.num_gains = shape.num_gains;
        }
    }

    pub(crate) fn camera_shape(&self, tel_id: i32) -> Option<CameraShape> {
        self.shapes.get(&tel_id).copied().filter(|s| s.num_pixels > 0)
    }

    pub(crate) fn warn(&mut self, kind: WarningKind, offset: u64) {
        self.warnings.push(Warning { kind, offset });
    }

    /// Logs and records an unsupported-version diagnostic; the
    /// decoder then proceeds with the documented prefix.
    pub(crate) fn warn_unsupported(&mut self, header: &ObjectHeader) {
        log::warn!(
            "object type {} at offset {} has version {}, decoding documented prefix only",
            header.type_code(),
            header.offset(),
            header.version()
        );
        self.warn(
            WarningKind::UnsupportedVersion {
                object_type: header.type_code(),
                version: header.version(),
            },
            header.offset(),
        );
    }

    pub(crate) fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub(crate) fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes one object through the registry, updating contextual
/// state inline. Unknown types come back opaque rather than as an
/// error; a warning is recorded for them.
pub fn decode_object(
    obj: &ObjectView<'_>,
    ctx: &mut DecodeContext,
) -> Result<Record, EventioError> {
    let header = obj.header();
    let record = match ObjectType::from_code(header.type_code()) {
        ObjectType::HistoryBlock => Record::History(HistoryBlock::decode(obj, ctx)?),
        ObjectType::HistoryCommandLine => {
            Record::HistoryCommandLine(leaf(obj, ctx, HistoryEntry::decode)?)
        }
        ObjectType::HistoryConfig => {
            Record::HistoryConfig(leaf(obj, ctx, HistoryEntry::decode)?)
        }
        ObjectType::Histograms => Record::Histograms(leaf(obj, ctx, Histograms::decode)?),
        ObjectType::CorsikaRunHeader => {
            Record::CorsikaRunHeader(leaf(obj, ctx, CorsikaRunHeader::decode)?)
        }
        ObjectType::TelescopeDefinition => {
            Record::TelescopeDefinition(leaf(obj, ctx, TelescopeDefinition::decode)?)
        }
        ObjectType::CorsikaEventHeader => {
            Record::CorsikaEventHeader(leaf(obj, ctx, CorsikaEventHeader::decode)?)
        }
        ObjectType::ArrayOffsets => Record::ArrayOffsets(leaf(obj, ctx, ArrayOffsets::decode)?),
        ObjectType::TelescopeData => Record::TelescopeData(TelescopeData::decode(obj, ctx)?),
        ObjectType::Photons => Record::Photons(leaf(obj, ctx, PhotonBunches::decode)?),
        ObjectType::EventEnd => Record::EventEnd(leaf(obj, ctx, EventEnd::decode)?),
        ObjectType::RunEnd => Record::RunEnd(leaf(obj, ctx, RunEnd::decode)?),
        ObjectType::InputCard => Record::InputCard(leaf(obj, ctx, InputCard::decode)?),
        ObjectType::RunHeader => {
            let run_header = leaf(obj, ctx, RunHeader::decode)?;
            // the lookup table must be live before the caller sees
            // the record
            ctx.install_lookup(run_header.tel_ids.clone());
            Record::RunHeader(run_header)
        }
        ObjectType::McRunHeader => Record::McRunHeader(leaf(obj, ctx, McRunHeader::decode)?),
        ObjectType::CameraSettings => {
            let settings = leaf(obj, ctx, CameraSettings::decode)?;
            ctx.record_camera_shape(
                settings.tel_id,
                CameraShape {
                    num_pixels: settings.n_pixels,
                    num_gains: 0,
                },
            );
            Record::CameraSettings(settings)
        }
        ObjectType::CameraOrganisation => {
            let organisation = leaf(obj, ctx, CameraOrganisation::decode)?;
            ctx.record_camera_shape(
                organisation.tel_id,
                CameraShape {
                    num_pixels: organisation.n_pixels,
                    num_gains: organisation.n_gains,
                },
            );
            Record::CameraOrganisation(organisation)
        }
        ObjectType::PixelSetting => Record::PixelSetting(leaf(obj, ctx, PixelSetting::decode)?),
        ObjectType::PixelDisabled => {
            Record::PixelDisabled(leaf(obj, ctx, PixelDisabled::decode)?)
        }
        ObjectType::CameraSoftSet => {
            Record::CameraSoftSet(leaf(obj, ctx, CameraSoftSet::decode)?)
        }
        ObjectType::PointingCorrection => {
            Record::PointingCorrection(leaf(obj, ctx, PointingCorrection::decode)?)
        }
        ObjectType::TrackingSetup => {
            Record::TrackingSetup(leaf(obj, ctx, TrackingSetup::decode)?)
        }
        ObjectType::CentralEvent => Record::CentralEvent(leaf(obj, ctx, CentralEvent::decode)?),
        ObjectType::TelEventHeader => {
            Record::TelEventHeader(leaf(obj, ctx, TelEventHeader::decode)?)
        }
        ObjectType::AdcSums => Record::AdcSums(leaf(obj, ctx, AdcSums::decode)?),
        ObjectType::AdcSamples => Record::AdcSamples(leaf(obj, ctx, AdcSamples::decode)?),
        ObjectType::ImageParameters => {
            Record::ImageParameters(leaf(obj, ctx, ImageParameters::decode)?)
        }
        ObjectType::StereoReconstruction => {
            Record::StereoReconstruction(leaf(obj, ctx, StereoReconstruction::decode)?)
        }
        ObjectType::PixelTiming => Record::PixelTiming(leaf(obj, ctx, PixelTiming::decode)?),
        ObjectType::PixelCalibrated => {
            Record::PixelCalibrated(leaf(obj, ctx, PixelCalibrated::decode)?)
        }
        ObjectType::McShower => Record::McShower(leaf(obj, ctx, McShower::decode)?),
        ObjectType::McEvent => Record::McEvent(leaf(obj, ctx, McEvent::decode)?),
        ObjectType::TelMonitoring => {
            Record::TelMonitoring(leaf(obj, ctx, TelMonitoring::decode)?)
        }
        ObjectType::LaserCalibration => {
            Record::LaserCalibration(leaf(obj, ctx, LaserCalibration::decode)?)
        }
        ObjectType::McPhotoelectrons => {
            Record::McPhotoelectrons(leaf(obj, ctx, McPhotoelectrons::decode)?)
        }
        ObjectType::McPeSum => Record::McPeSum(leaf(obj, ctx, McPeSum::decode)?),
        ObjectType::PixelList => Record::PixelList(leaf(obj, ctx, PixelList::decode)?),
        ObjectType::CalibrationEvent => {
            Record::CalibrationEvent(CalibrationEvent::decode(obj, ctx)?)
        }
        ObjectType::AuxDigitalTraces | ObjectType::AuxAnalogTraces => {
            Record::AuxiliaryTraces(leaf(obj, ctx, AuxiliaryTraces::decode)?)
        }
        ObjectType::PixelTriggerTimes => {
            Record::PixelTriggerTimes(leaf(obj, ctx, PixelTriggerTimes::decode)?)
        }
        ObjectType::TrackingPosition(_) => {
            Record::TrackingPosition(leaf(obj, ctx, TrackingPosition::decode)?)
        }
        ObjectType::TelescopeEvent(_) => {
            Record::TelescopeEvent(TelescopeEvent::decode(obj, ctx)?)
        }
        ObjectType::Unknown(type_code) => {
            ctx.warn(WarningKind::UnknownType { type_code }, header.offset());
            Record::Unknown(UnknownObject {
                type_code,
                version: header.version(),
                id: header.id(),
                data: obj.payload().to_vec(),
            })
        }
    };
    Ok(record)
}

/// Runs a leaf decoder over the object's payload cursor and checks
/// that it consumed exactly the declared length. A mismatch is
/// recoverable: position reconciliation is implicit (each object
/// owns its payload buffer) and a `LengthMismatch` warning is
/// recorded.
pub(crate) fn leaf<T>(
    obj: &ObjectView<'_>,
    ctx: &mut DecodeContext,
    decode: impl FnOnce(&ObjectHeader, &mut PayloadCursor, &mut DecodeContext) -> Result<T, EventioError>,
) -> Result<T, EventioError> {
    let mut cur = obj.cursor();
    let value = decode(obj.header(), &mut cur, ctx)?;
    if cur.pos() != obj.header().length() {
        ctx.warn(
            WarningKind::LengthMismatch {
                object_type: obj.header().type_code(),
                declared: obj.header().length(),
                consumed: cur.pos(),
            },
            obj.header().offset(),
        );
    }
    Ok(value)
}
