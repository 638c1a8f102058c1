//! Camera organisation (type 2003): the mapping from pixels to
//! readout electronics (drawer/card/chip/channel) and to trigger
//! sectors.
//!
//! Sector membership lists keep the historical zero-terminated scan:
//! a zero entry at position ≥ 1 ends the list even when the declared
//! count says otherwise.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    support::read_sector_list,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 1;

#[derive(Debug, Clone)]
pub struct CameraOrganisation {
    pub tel_id: i32,
    pub n_pixels: usize,
    pub n_drawers: usize,
    pub n_gains: usize,
    pub n_sectors: usize,
    pub drawer: Vec<i16>,
    pub card: Vec<i16>,
    pub chip: Vec<i16>,
    pub channel: Vec<i16>,
    /// Sector membership per pixel.
    pub sectors: Vec<Vec<i16>>,
    /// Per-sector trigger parameters (v1+).
    pub sector_type: Vec<u8>,
    pub sector_threshold: Vec<f32>,
    pub sector_pixthresh: Vec<f32>,
    pub partial: bool,
}

impl CameraOrganisation {
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

        let n_pixels = p.read::<i32>()?.max(0) as usize;
        let n_drawers = p.read::<i32>()?.max(0) as usize;
        let n_gains = p.read::<i32>()?.max(0) as usize;
        let n_sectors = if version >= 1 {
            p.read::<i32>()?.max(0) as usize
        } else {
            0
        };

        let drawer = p.read_vec::<i16>(n_pixels)?;
        let card = p.read_vec::<i16>(n_pixels)?;
        let chip = p.read_vec::<i16>(n_pixels)?;
        let channel = p.read_vec::<i16>(n_pixels)?;

        let mut sectors = Vec::with_capacity(n_pixels);
        for _ in 0..n_pixels {
            sectors.push(read_sector_list(p, header, ctx)?);
        }

        let (mut sector_type, mut sector_threshold, mut sector_pixthresh) =
            (Vec::new(), Vec::new(), Vec::new());
        if version >= 1 {
            for _ in 0..n_sectors {
                sector_type.push(p.read::<u8>()?);
                sector_threshold.push(p.read::<f32>()?);
                sector_pixthresh.push(p.read::<f32>()?);
            }
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            n_pixels,
            n_drawers,
            n_gains,
            n_sectors,
            drawer,
            card,
            chip,
            channel,
            sectors,
            sector_type,
            sector_threshold,
            sector_pixthresh,
            partial,
        })
    }
}
