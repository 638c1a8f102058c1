//! Photo-electron sums (type 2026): per-telescope photo-electron
//! totals of one Monte-Carlo event, with optional per-pixel counts.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 2;

#[derive(Debug, Clone)]
pub struct McPeSum {
    /// Event number, from the object id.
    pub event: i32,
    pub shower_num: i32,
    pub n_telescopes: usize,
    /// Photo-electrons per telescope slot.
    pub n_pe: Vec<i32>,
    /// Pixels with photo-electrons per telescope slot.
    pub n_pixels: Vec<i32>,
    /// Per-pixel photo-electron counts for telescopes that carry
    /// them, keyed by slot index.
    pub pix_pe: Vec<(usize, Vec<i32>)>,
    /// Photons arriving at each telescope sphere.
    pub photons: Vec<f32>,
    /// Photons surviving atmospheric transmission.
    pub photons_atm: Vec<f32>,
    /// Photons in the 300-600 nm band.
    pub photons_atm_3_6: Vec<f32>,
    /// Photons in the 400 nm QE band.
    pub photons_atm_400: Vec<f32>,
    pub partial: bool,
}

impl McPeSum {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let version = header.version();
        let partial = version > SUPPORTED_VERSION;
        if partial {
            ctx.warn_unsupported(header);
        }

        let shower_num = p.read::<i32>()?;
        let n_telescopes = p.read::<i32>()?.max(0) as usize;
        let n_pe = p.read_vec::<i32>(n_telescopes)?;
        let n_pixels = p.read_vec::<i32>(n_telescopes)?;

        let mut pix_pe = Vec::new();
        for (slot, (pe, pixels)) in n_pe.iter().zip(&n_pixels).enumerate() {
            if *pe > 0 && *pixels > 0 {
                pix_pe.push((slot, p.read_vec::<i32>(*pixels as usize)?));
            }
        }

        let photons = p.read_vec::<f32>(n_telescopes)?;
        let photons_atm = p.read_vec::<f32>(n_telescopes)?;
        let photons_atm_3_6 = p.read_vec::<f32>(n_telescopes)?;
        let photons_atm_400 = p.read_vec::<f32>(n_telescopes)?;

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            event: header.id(),
            shower_num,
            n_telescopes,
            n_pe,
            n_pixels,
            pix_pe,
            photons,
            photons_atm,
            photons_atm_3_6,
            photons_atm_400,
            partial,
        })
    }
}
