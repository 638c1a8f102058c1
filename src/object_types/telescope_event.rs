//! Telescope event (types 2200-2299): container with the event
//! header and all per-telescope data payloads of one trigger.
//!
//! The ADC interplay contract is applied here: a sample object
//! decoded after a sum object marks sample knowledge on the sums
//! while preserving sum knowledge; samples arriving without sums
//! synthesize them by trace integration.

use crate::{
    errors::WarningKind,
    object::ObjectView,
    EventioError,
};

use super::{
    leaf, AdcSamples, AdcSums, AuxiliaryTraces, DecodeContext, ImageParameters, ObjectType,
    PixelCalibrated, PixelList, PixelTiming, PixelTriggerTimes, TelEventHeader,
};

const TELESCOPE_EVENT_BASE: u16 = 2200;

#[derive(Debug, Default)]
pub struct TelescopeEvent {
    pub tel_id: i32,
    pub glob_count: i32,
    pub header: Option<TelEventHeader>,
    pub adc_sums: Option<AdcSums>,
    pub adc_samples: Option<AdcSamples>,
    pub pixel_timing: Option<PixelTiming>,
    pub pixel_calibrated: Option<PixelCalibrated>,
    pub image_parameters: Vec<ImageParameters>,
    pub pixel_lists: Vec<PixelList>,
    pub pixel_trigger_times: Option<PixelTriggerTimes>,
    pub aux_traces: Vec<AuxiliaryTraces>,
}

impl TelescopeEvent {
    pub(crate) fn decode(
        obj: &ObjectView<'_>,
        ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let mut event = Self {
            tel_id: (obj.header().type_code() - TELESCOPE_EVENT_BASE) as i32,
            glob_count: obj.header().id(),
            ..Default::default()
        };

        for sub in obj.sub_objects() {
            let sub = sub?;
            match ObjectType::from_code(sub.header().type_code()) {
                ObjectType::TelEventHeader => {
                    event.header = Some(leaf(&sub, ctx, TelEventHeader::decode)?);
                }
                ObjectType::AdcSums => {
                    event.adc_sums = Some(leaf(&sub, ctx, AdcSums::decode)?);
                }
                ObjectType::AdcSamples => {
                    let samples = leaf(&sub, ctx, AdcSamples::decode)?;
                    match event.adc_sums.as_mut() {
                        Some(sums) => sums.absorb_samples(&samples),
                        None => event.adc_sums = Some(AdcSums::from_samples(&samples)),
                    }
                    event.adc_samples = Some(samples);
                }
                ObjectType::PixelTiming => {
                    event.pixel_timing = Some(leaf(&sub, ctx, PixelTiming::decode)?);
                }
                ObjectType::PixelCalibrated => {
                    event.pixel_calibrated = Some(leaf(&sub, ctx, PixelCalibrated::decode)?);
                }
                ObjectType::ImageParameters => {
                    event.image_parameters.push(leaf(&sub, ctx, ImageParameters::decode)?);
                }
                ObjectType::PixelList => {
                    event.pixel_lists.push(leaf(&sub, ctx, PixelList::decode)?);
                }
                ObjectType::PixelTriggerTimes => {
                    event.pixel_trigger_times =
                        Some(leaf(&sub, ctx, PixelTriggerTimes::decode)?);
                }
                ObjectType::AuxDigitalTraces | ObjectType::AuxAnalogTraces => {
                    event.aux_traces.push(leaf(&sub, ctx, AuxiliaryTraces::decode)?);
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

        Ok(event)
    }
}
