//! Calibration event wrapper (type 2028): a telescope event taken
//! under calibration conditions (pedestal, laser, LED runs), with
//! the calibration type in the object id.

use crate::{
    errors::WarningKind,
    object::ObjectView,
    EventioError,
};

use super::{DecodeContext, ObjectType, TelescopeEvent};

#[derive(Debug)]
pub struct CalibrationEvent {
    /// Calibration run type: pedestal, laser, LED...
    pub calib_type: i32,
    pub telescope_event: Option<TelescopeEvent>,
}

impl CalibrationEvent {
    pub(crate) fn decode(
        obj: &ObjectView<'_>,
        ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let mut telescope_event = None;
        for sub in obj.sub_objects() {
            let sub = sub?;
            match ObjectType::from_code(sub.header().type_code()) {
                ObjectType::TelescopeEvent(_) => {
                    telescope_event = Some(TelescopeEvent::decode(&sub, ctx)?);
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
        Ok(Self {
            calib_type: obj.header().id(),
            telescope_event,
        })
    }
}
