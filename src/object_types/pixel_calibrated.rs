//! Calibrated pixel intensities (type 2017): per-pixel amplitudes
//! in photo-electrons after calibration, for all pixels or for a
//! selected subset.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 0;

#[derive(Debug, Clone)]
pub struct PixelCalibrated {
    pub tel_id: i32,
    pub n_pixels: usize,
    pub int_method: i16,
    /// 0: all pixels present; 1: explicit pixel list; 2: presence
    /// bitmap.
    pub selection: u8,
    /// Pixels with data, in file order.
    pub pixels: Vec<usize>,
    /// Amplitude per pixel in p.e., NaN where absent.
    pub amplitude: Vec<f32>,
    pub significant: Vec<bool>,
    pub partial: bool,
}

impl PixelCalibrated {
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

        let n_pixels = p.read_varint()? as usize;
        let int_method = p.read::<i16>()?;
        let selection = p.read::<u8>()?;

        let pixels: Vec<usize> = match selection {
            0 => (0..n_pixels).collect(),
            1 => {
                let n = p.read_varint()? as usize;
                let mut list = Vec::with_capacity(n);
                for _ in 0..n {
                    let pixel = p.read_varint()? as usize;
                    if pixel >= n_pixels {
                        return Err(EventioError::InvalidPixelList {
                            object_type: header.type_code(),
                            offset: header.offset(),
                            pixel: pixel as i64,
                            num_pixels: n_pixels,
                        });
                    }
                    list.push(pixel);
                }
                list
            }
            2 => {
                let mut list = Vec::new();
                for group in 0..n_pixels.div_ceil(8) {
                    let byte = p.read::<u8>()?;
                    for bit in 0..8 {
                        let pixel = group * 8 + bit;
                        if pixel < n_pixels && byte & (1 << bit) != 0 {
                            list.push(pixel);
                        }
                    }
                }
                list
            }
            _ => {
                return Err(EventioError::DecodeError {
                    object_type: header.type_code(),
                    version,
                    offset: header.offset(),
                    what: "unknown pixel selection code",
                })
            }
        };

        let mut amplitude = vec![f32::NAN; n_pixels];
        let mut significant = vec![false; n_pixels];
        for pixel in &pixels {
            amplitude[*pixel] = p.read::<f32>()?;
            significant[*pixel] = true;
        }

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            n_pixels,
            int_method,
            selection,
            pixels,
            amplitude,
            significant,
            partial,
        })
    }
}
