//! Histogram block (type 100), decoded at the container level only:
//! titles, binning and raw contents. Statistical interpretation is
//! left to the caller.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

#[derive(Debug, Clone)]
pub struct Histogram {
    /// Content kind marker, e.g. `F`, `D`, `I`.
    pub kind: char,
    pub title: String,
    pub ident: i32,
    /// 1 or 2.
    pub dimension: i16,
    pub nbins_x: usize,
    /// 0 for one-dimensional histograms.
    pub nbins_y: usize,
    pub x_range: (f32, f32),
    pub y_range: Option<(f32, f32)>,
    pub entries: i32,
    /// Row-major bin contents, `nbins_x * max(nbins_y, 1)` entries.
    pub contents: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct Histograms {
    pub histograms: Vec<Histogram>,
}

impl Histograms {
    pub(crate) fn decode(
        _header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let n = p.read::<i16>()?.max(0) as usize;
        let mut histograms = Vec::with_capacity(n);
        for _ in 0..n {
            histograms.push(Self::decode_one(p)?);
        }
        Ok(Self { histograms })
    }

    fn decode_one(p: &mut PayloadCursor) -> Result<Histogram, EventioError> {
        let kind = p.read::<u8>()? as char;
        let title = p.read_string()?;
        let ident = p.read::<i32>()?;
        let dimension = p.read::<i16>()?;
        let nbins_x = p.read::<i16>()?.max(0) as usize;
        let nbins_y = p.read::<i16>()?.max(0) as usize;
        let x_range = (p.read::<f32>()?, p.read::<f32>()?);
        let y_range = if dimension == 2 {
            Some((p.read::<f32>()?, p.read::<f32>()?))
        } else {
            None
        };
        let entries = p.read::<i32>()?;
        let contents = p.read_vec::<f32>(nbins_x * nbins_y.max(1))?;
        Ok(Histogram {
            kind,
            title,
            ident,
            dimension,
            nbins_x,
            nbins_y,
            x_range,
            y_range,
            entries,
            contents,
        })
    }
}
