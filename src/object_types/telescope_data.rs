//! Telescope data block (type 1204): container whose sub-objects
//! are the per-telescope photon bunches of one shower use.

use crate::{
    errors::WarningKind,
    object::ObjectView,
    EventioError,
};

use super::{leaf, DecodeContext, ObjectType, PhotonBunches};

#[derive(Debug, Clone)]
pub struct TelescopeData {
    /// Array (reuse) number this block belongs to.
    pub array_id: i32,
    /// Photon bunches per telescope, in file order (telescope slot
    /// order).
    pub telescopes: Vec<PhotonBunches>,
}

impl TelescopeData {
    pub(crate) fn decode(
        obj: &ObjectView<'_>,
        ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let mut telescopes = Vec::new();
        for sub in obj.sub_objects() {
            let sub = sub?;
            match ObjectType::from_code(sub.header().type_code()) {
                ObjectType::Photons => {
                    telescopes.push(leaf(&sub, ctx, PhotonBunches::decode)?);
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
            array_id: obj.header().id(),
            telescopes,
        })
    }
}
