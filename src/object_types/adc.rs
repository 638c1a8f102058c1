//! ADC sums (type 2012) and ADC samples (type 2013).
//!
//! The hardest payloads in the format: decoding is selected by the
//! zero-suppression mode and data-reduction mode packed into the
//! object id, by the object version, and by the pixel/gain counts.
//! Sum vectors are raw `u16` up to version 2 and differential
//! signed varints from version 3 on; grouped modes walk the camera
//! in 16-pixel groups with presence bitmasks; explicit pixel lists
//! carry per-pixel reduction markup in their high bits.
//!
//! Per gain and pixel the decoders maintain `adc_known` (bit 0: sum
//! decoded, bit 1: samples decoded) and per pixel `significant`
//! (bit 0 from sums, bit 5 from samples).

use crate::{
    consts::{HI_GAIN, KNOWN_SAMPLES, KNOWN_SUM, LO_GAIN, SIGNIFICANT_SAMPLES},
    cursor::PayloadCursor,
    object::ObjectHeader,
    support::read_pixel_range_list,
    EventioError,
};

use super::{CameraShape, DecodeContext};

const SUPPORTED_VERSION: u16 = 5;

const GROUP: usize = 16;

/// Markup bits on explicit pixel-list entries, classic 13-bit ids.
const LG_SUPPRESSED: u32 = 0x2000;
const HG_SCALED: u32 = 0x4000;
const PIXEL_MASK: u32 = 0x1fff;
/// The same markup in the wide 21-bit layout (version ≥ 4 with
/// 32768 pixels or more).
const LG_SUPPRESSED_WIDE: u32 = 0x200000;
const HG_SCALED_WIDE: u32 = 0x400000;
const PIXEL_MASK_WIDE: u32 = 0x1fffff;

/// Fields shared by the sum and sample objects: the modes packed
/// into the object id, the array dimensions, and the reduction
/// parameters of data-reduction mode 2.
#[derive(Debug, Clone, Default)]
struct AdcHead {
    tel_id: i32,
    zero_sup_mode: u8,
    data_red_mode: u8,
    list_known: bool,
    num_pixels: usize,
    num_gains: usize,
    num_samples: usize,
    threshold: Option<i32>,
    offset_hg8: i32,
    scale_hg8: i32,
    clip_amp: Option<i32>,
}

fn read_head(
    header: &ObjectHeader,
    p: &mut PayloadCursor,
    ctx: &mut DecodeContext,
    with_samples: bool,
) -> Result<AdcHead, EventioError> {
    let version = header.version();
    let id = header.id() as u32;
    let zero_sup_mode = (id & 0x1f) as u8;
    let data_red_mode = ((id >> 5) & 0x1f) as u8;
    let list_known = (id >> 10) & 1 == 1;

    if data_red_mode > 2 {
        return Err(EventioError::DecodeError {
            object_type: header.type_code(),
            version,
            offset: header.offset(),
            what: "data reduction mode out of range",
        });
    }

    let tel_id = p.read::<i16>()? as i32;
    let (num_pixels, num_gains) = if version >= 2 {
        (
            p.read::<i32>()?.max(0) as usize,
            p.read::<i16>()?.max(0) as usize,
        )
    } else {
        // early versions rely on the camera description decoded
        // earlier in the same file
        let CameraShape {
            num_pixels,
            num_gains,
        } = ctx.camera_shape(tel_id).ok_or(EventioError::DecodeError {
            object_type: header.type_code(),
            version,
            offset: header.offset(),
            what: "no camera description for pre-v2 payload",
        })?;
        (num_pixels, num_gains.max(1))
    };
    let num_samples = if with_samples {
        p.read::<i16>()?.max(0) as usize
    } else {
        0
    };

    let mut head = AdcHead {
        tel_id,
        zero_sup_mode,
        data_red_mode,
        list_known,
        num_pixels,
        num_gains,
        num_samples,
        threshold: None,
        offset_hg8: 0,
        scale_hg8: 1,
        clip_amp: None,
    };

    if data_red_mode == 2 {
        if version >= 4 {
            head.threshold = Some(p.read_varint_signed()? as i32);
            head.offset_hg8 = p.read_varint_signed()? as i32;
            head.scale_hg8 = p.read_varint_signed()? as i32;
        } else {
            head.threshold = Some(p.read::<i16>()? as i32);
            head.offset_hg8 = p.read::<i16>()? as i32;
            head.scale_hg8 = p.read::<i16>()? as i32;
        }
        if head.scale_hg8 <= 0 {
            head.scale_hg8 = 1;
        }
    }
    if version >= 5 {
        // stored, never applied
        head.clip_amp = Some(p.read_varint_signed()? as i32);
    }

    Ok(head)
}

/// Reads one contiguous sum vector in the version-selected
/// encoding. The differential accumulator restarts per vector.
fn read_sum_vec(
    p: &mut PayloadCursor,
    n: usize,
    version: u16,
) -> Result<Vec<u32>, EventioError> {
    if version <= 2 {
        Ok(p.read_vec::<u16>(n)?.into_iter().map(u32::from).collect())
    } else {
        Ok(p
            .read_varint_array_differential(n)?
            .into_iter()
            .map(|v| v as u32)
            .collect())
    }
}

/// Pixels of 16-pixel group `group`, clipped to the camera size.
fn group_range(group: usize, num_pixels: usize) -> std::ops::Range<usize> {
    let start = group * GROUP;
    start..num_pixels.min(start + GROUP)
}

/// Valid bitmask positions of a (possibly partial) group.
fn group_mask(len: usize) -> u16 {
    if len >= GROUP {
        u16::MAX
    } else {
        (1u16 << len) - 1
    }
}

/// Integrated ADC sums of one telescope and event.
#[derive(Debug, Clone)]
pub struct AdcSums {
    pub tel_id: i32,
    pub zero_sup_mode: u8,
    pub data_red_mode: u8,
    pub list_known: bool,
    pub num_pixels: usize,
    pub num_gains: usize,
    pub threshold: Option<i32>,
    pub offset_hg8: i32,
    pub scale_hg8: i32,
    pub clip_amp: Option<i32>,
    /// `[gain][pixel]`, row-major.
    adc_sum: Vec<u32>,
    adc_known: Vec<u8>,
    significant: Vec<u8>,
    /// True when the sums were built by integrating sample traces
    /// rather than decoded from a sum object.
    pub synthesized: bool,
    pub partial: bool,
}

impl AdcSums {
    fn empty(head: &AdcHead, partial: bool) -> Self {
        let cells = head.num_gains * head.num_pixels;
        Self {
            tel_id: head.tel_id,
            zero_sup_mode: head.zero_sup_mode,
            data_red_mode: head.data_red_mode,
            list_known: head.list_known,
            num_pixels: head.num_pixels,
            num_gains: head.num_gains,
            threshold: head.threshold,
            offset_hg8: head.offset_hg8,
            scale_hg8: head.scale_hg8,
            clip_amp: head.clip_amp,
            adc_sum: vec![0; cells],
            adc_known: vec![0; cells],
            significant: vec![0; head.num_pixels],
            synthesized: false,
            partial,
        }
    }

    #[inline]
    fn cell(&self, gain: usize, pixel: usize) -> usize {
        gain * self.num_pixels + pixel
    }

    pub fn sum(&self, gain: usize, pixel: usize) -> u32 {
        self.adc_sum[self.cell(gain, pixel)]
    }

    /// Dense sums of one gain, indexed by pixel.
    pub fn sums(&self, gain: usize) -> &[u32] {
        &self.adc_sum[gain * self.num_pixels..(gain + 1) * self.num_pixels]
    }

    pub fn known(&self, gain: usize, pixel: usize) -> u8 {
        self.adc_known[self.cell(gain, pixel)]
    }

    pub fn significant(&self, pixel: usize) -> u8 {
        self.significant[pixel]
    }

    pub fn significants(&self) -> &[u8] {
        &self.significant
    }

    fn set(&mut self, gain: usize, pixel: usize, value: u32) {
        let cell = self.cell(gain, pixel);
        self.adc_sum[cell] = value;
        self.adc_known[cell] |= KNOWN_SUM;
    }

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
        let head = read_head(header, p, ctx, false)?;
        let mut sums = Self::empty(&head, partial);

        match head.zero_sup_mode {
            0 => sums.decode_unsuppressed(header, p, &head, version)?,
            1 => sums.decode_bitmap(header, p, &head, version)?,
            2..=4 => sums.decode_list(header, p, &head, version)?,
            _ => {
                return Err(EventioError::DecodeError {
                    object_type: header.type_code(),
                    version,
                    offset: header.offset(),
                    what: "zero suppression mode out of range",
                })
            }
        }
        if partial {
            p.skip(p.remaining())?;
        }
        Ok(sums)
    }

    /// Mode (0, d): every pixel significant, reduction decided per
    /// 16-pixel group.
    fn decode_unsuppressed(
        &mut self,
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        head: &AdcHead,
        version: u16,
    ) -> Result<(), EventioError> {
        self.significant.fill(1);
        match head.data_red_mode {
            0 => {
                // dense per-gain planes in storage order
                for gain in 0..head.num_gains {
                    let values = read_sum_vec(p, head.num_pixels, version)?;
                    for (pixel, value) in values.into_iter().enumerate() {
                        self.set(gain, pixel, value);
                    }
                }
            }
            1 => {
                for group in 0..head.num_pixels.div_ceil(GROUP) {
                    let range = group_range(group, head.num_pixels);
                    let mask = group_mask(range.len());
                    self.decode_group_skip_weak_lg(p, head, version, range, mask)?;
                }
            }
            2 => {
                for group in 0..head.num_pixels.div_ceil(GROUP) {
                    let range = group_range(group, head.num_pixels);
                    let mask = group_mask(range.len());
                    self.decode_group_scaled_hg(p, head, version, range, mask)?;
                }
            }
            _ => {
                return Err(EventioError::DecodeError {
                    object_type: header.type_code(),
                    version,
                    offset: header.offset(),
                    what: "data reduction mode out of range",
                })
            }
        }
        Ok(())
    }

    /// Mode (1, d): a presence bitmask per 16-pixel group; an all-zero
    /// mask skips the group entirely.
    fn decode_bitmap(
        &mut self,
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        head: &AdcHead,
        version: u16,
    ) -> Result<(), EventioError> {
        for group in 0..head.num_pixels.div_ceil(GROUP) {
            let range = group_range(group, head.num_pixels);
            let zbits = p.read::<u16>()? & group_mask(range.len());
            if zbits == 0 {
                continue;
            }
            for (bit, pixel) in range.clone().enumerate() {
                if zbits & (1 << bit) != 0 {
                    self.significant[pixel] |= 1;
                }
            }
            match head.data_red_mode {
                0 => {
                    for gain in 0..head.num_gains {
                        let values = read_sum_vec(p, (zbits.count_ones()) as usize, version)?;
                        let mut values = values.into_iter();
                        for (bit, pixel) in range.clone().enumerate() {
                            if zbits & (1 << bit) != 0 {
                                let value = values.next().ok_or_else(|| end_of_group(header))?;
                                self.set(gain, pixel, value);
                            }
                        }
                    }
                }
                1 => self.decode_group_skip_weak_lg(p, head, version, range, zbits)?,
                2 => self.decode_group_scaled_hg(p, head, version, range, zbits)?,
                _ => {
                    return Err(EventioError::DecodeError {
                        object_type: header.type_code(),
                        version,
                        offset: header.offset(),
                        what: "data reduction mode out of range",
                    })
                }
            }
        }
        Ok(())
    }

    /// Data-reduction mode 1 for one group: a bitmask `c` marks
    /// pixels whose weak low-gain sum survived, low-gain values for
    /// those, then high-gain values for every present pixel.
    fn decode_group_skip_weak_lg(
        &mut self,
        p: &mut PayloadCursor,
        head: &AdcHead,
        version: u16,
        range: std::ops::Range<usize>,
        present: u16,
    ) -> Result<(), EventioError> {
        let cbits = p.read::<u16>()? & present;
        if head.num_gains > 1 {
            let kept = cbits.count_ones() as usize;
            let values = read_sum_vec(p, kept, version)?;
            let mut values = values.into_iter();
            for (bit, pixel) in range.clone().enumerate() {
                if cbits & (1 << bit) != 0 {
                    if let Some(value) = values.next() {
                        self.set(LO_GAIN, pixel, value);
                    }
                }
            }
        }
        let kept = count_present(&range, present);
        let values = read_sum_vec(p, kept, version)?;
        let mut values = values.into_iter();
        for (bit, pixel) in range.enumerate() {
            if present & (1 << bit) != 0 {
                if let Some(value) = values.next() {
                    self.set(HI_GAIN, pixel, value);
                }
            }
        }
        Ok(())
    }

    /// Data-reduction mode 2 for one group: `c` marks pixels kept
    /// full width in both gains, `b` marks pixels whose high gain is
    /// packed into a scaled byte.
    fn decode_group_scaled_hg(
        &mut self,
        p: &mut PayloadCursor,
        head: &AdcHead,
        version: u16,
        range: std::ops::Range<usize>,
        present: u16,
    ) -> Result<(), EventioError> {
        let cbits = p.read::<u16>()? & present;
        let bbits = p.read::<u16>()? & present;

        if head.num_gains > 1 {
            let values = read_sum_vec(p, cbits.count_ones() as usize, version)?;
            let mut values = values.into_iter();
            for (bit, pixel) in range.clone().enumerate() {
                if cbits & (1 << bit) != 0 {
                    if let Some(value) = values.next() {
                        self.set(LO_GAIN, pixel, value);
                    }
                }
            }
        }
        let values = read_sum_vec(p, cbits.count_ones() as usize, version)?;
        let mut values = values.into_iter();
        for (bit, pixel) in range.clone().enumerate() {
            if cbits & (1 << bit) != 0 {
                if let Some(value) = values.next() {
                    self.set(HI_GAIN, pixel, value);
                }
            }
        }

        let scaled = (bbits & !cbits).count_ones() as usize;
        let bytes = p.read_vec::<u8>(scaled)?;
        let mut bytes = bytes.into_iter();
        for (bit, pixel) in range.enumerate() {
            if bbits & (1 << bit) != 0 && cbits & (1 << bit) == 0 {
                if let Some(byte) = bytes.next() {
                    let value =
                        (byte as i32 * head.scale_hg8 + head.offset_hg8).max(0) as u32;
                    self.set(HI_GAIN, pixel, value);
                }
            }
        }
        Ok(())
    }

    /// Modes (2..4, d): explicit pixel list with reduction markup in
    /// the id high bits.
    fn decode_list(
        &mut self,
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        head: &AdcHead,
        version: u16,
    ) -> Result<(), EventioError> {
        let wide = version >= 4 && head.num_pixels >= 32768;
        let (pixel_mask, lg_bit, hg_bit) = if wide {
            (PIXEL_MASK_WIDE, LG_SUPPRESSED_WIDE, HG_SCALED_WIDE)
        } else {
            (PIXEL_MASK, LG_SUPPRESSED, HG_SCALED)
        };

        let list_size = if wide {
            p.read_varint()? as usize
        } else {
            p.read::<i16>()?.max(0) as usize
        };

        let mut entries = Vec::with_capacity(list_size);
        for _ in 0..list_size {
            let raw = if wide {
                p.read_varint()? as u32
            } else {
                p.read::<u16>()? as u32
            };
            let pixel = (raw & pixel_mask) as usize;
            if pixel >= head.num_pixels {
                return Err(EventioError::InvalidPixelList {
                    object_type: header.type_code(),
                    offset: header.offset(),
                    pixel: pixel as i64,
                    num_pixels: head.num_pixels,
                });
            }
            self.significant[pixel] |= 1;
            entries.push((pixel, raw & lg_bit != 0, raw & hg_bit != 0));
        }

        if head.num_gains > 1 {
            let kept = entries.iter().filter(|(_, lg_sup, _)| !lg_sup).count();
            let values = read_sum_vec(p, kept, version)?;
            let mut values = values.into_iter();
            for (pixel, lg_suppressed, _) in &entries {
                if !lg_suppressed {
                    if let Some(value) = values.next() {
                        self.set(LO_GAIN, *pixel, value);
                    }
                }
            }
        }

        let kept = entries.iter().filter(|(_, _, hg_scaled)| !hg_scaled).count();
        let values = read_sum_vec(p, kept, version)?;
        let mut values = values.into_iter();
        for (pixel, _, hg_scaled) in &entries {
            if !hg_scaled {
                if let Some(value) = values.next() {
                    self.set(HI_GAIN, *pixel, value);
                }
            }
        }

        let scaled = entries.iter().filter(|(_, _, hg_scaled)| *hg_scaled).count();
        let bytes = p.read_vec::<u8>(scaled)?;
        let mut bytes = bytes.into_iter();
        for (pixel, _, hg_scaled) in &entries {
            if *hg_scaled {
                if let Some(byte) = bytes.next() {
                    let value =
                        (byte as i32 * head.scale_hg8 + head.offset_hg8).max(0) as u32;
                    self.set(HI_GAIN, *pixel, value);
                }
            }
        }
        Ok(())
    }

    /// Marks sample knowledge decoded from a later sample object of
    /// the same telescope, preserving sum knowledge (bit 0).
    pub(crate) fn absorb_samples(&mut self, samples: &AdcSamples) {
        if samples.num_pixels != self.num_pixels || samples.num_gains != self.num_gains {
            return;
        }
        for gain in 0..self.num_gains {
            for pixel in 0..self.num_pixels {
                if samples.known(gain, pixel) & KNOWN_SAMPLES != 0 {
                    let cell = self.cell(gain, pixel);
                    self.adc_known[cell] |= KNOWN_SAMPLES;
                }
            }
        }
        for (pixel, significant) in self.significant.iter_mut().enumerate() {
            *significant |= samples.significant(pixel) & SIGNIFICANT_SAMPLES;
        }
    }

    /// Synthesizes sums by integrating the traces of a sample object
    /// that arrived without an accompanying sum object.
    pub(crate) fn from_samples(samples: &AdcSamples) -> Self {
        let head = AdcHead {
            tel_id: samples.tel_id,
            zero_sup_mode: samples.zero_sup_mode,
            data_red_mode: samples.data_red_mode,
            list_known: samples.list_known,
            num_pixels: samples.num_pixels,
            num_gains: samples.num_gains,
            ..Default::default()
        };
        let mut sums = Self::empty(&head, samples.partial);
        sums.scale_hg8 = 1;
        sums.synthesized = true;
        for gain in 0..samples.num_gains {
            for pixel in 0..samples.num_pixels {
                if samples.known(gain, pixel) & KNOWN_SAMPLES == 0 {
                    continue;
                }
                let total: u32 = samples
                    .trace(gain, pixel)
                    .iter()
                    .map(|s| *s as u32)
                    .sum();
                sums.set(gain, pixel, total);
                let cell = sums.cell(gain, pixel);
                sums.adc_known[cell] |= KNOWN_SAMPLES;
            }
        }
        for (pixel, significant) in sums.significant.iter_mut().enumerate() {
            *significant |= samples.significant(pixel);
        }
        sums
    }
}

fn count_present(range: &std::ops::Range<usize>, present: u16) -> usize {
    range
        .clone()
        .enumerate()
        .filter(|(bit, _)| present & (1 << bit) != 0)
        .count()
}

fn end_of_group(header: &ObjectHeader) -> EventioError {
    EventioError::DecodeError {
        object_type: header.type_code(),
        version: header.version(),
        offset: header.offset(),
        what: "group vector shorter than its bitmask",
    }
}

/// Sampled ADC traces of one telescope and event.
#[derive(Debug, Clone)]
pub struct AdcSamples {
    pub tel_id: i32,
    pub zero_sup_mode: u8,
    pub data_red_mode: u8,
    pub list_known: bool,
    pub num_pixels: usize,
    pub num_gains: usize,
    pub num_samples: usize,
    /// `[gain][pixel][sample]`, row-major.
    adc_sample: Vec<u16>,
    adc_known: Vec<u8>,
    significant: Vec<u8>,
    pub partial: bool,
}

impl AdcSamples {
    fn empty(head: &AdcHead, partial: bool) -> Self {
        let cells = head.num_gains * head.num_pixels;
        Self {
            tel_id: head.tel_id,
            zero_sup_mode: head.zero_sup_mode,
            data_red_mode: head.data_red_mode,
            list_known: head.list_known,
            num_pixels: head.num_pixels,
            num_gains: head.num_gains,
            num_samples: head.num_samples,
            adc_sample: vec![0; cells * head.num_samples],
            adc_known: vec![0; cells],
            significant: vec![0; head.num_pixels],
            partial,
        }
    }

    #[inline]
    fn cell(&self, gain: usize, pixel: usize) -> usize {
        gain * self.num_pixels + pixel
    }

    pub fn sample(&self, gain: usize, pixel: usize, t: usize) -> u16 {
        self.adc_sample[self.cell(gain, pixel) * self.num_samples + t]
    }

    /// Trace of one gain and pixel, `num_samples` entries.
    pub fn trace(&self, gain: usize, pixel: usize) -> &[u16] {
        let start = self.cell(gain, pixel) * self.num_samples;
        &self.adc_sample[start..start + self.num_samples]
    }

    pub fn known(&self, gain: usize, pixel: usize) -> u8 {
        self.adc_known[self.cell(gain, pixel)]
    }

    pub fn significant(&self, pixel: usize) -> u8 {
        self.significant[pixel]
    }

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
        let head = read_head(header, p, ctx, true)?;
        let mut samples = Self::empty(&head, partial);

        if head.zero_sup_mode == 0 {
            for gain in 0..head.num_gains {
                for pixel in 0..head.num_pixels {
                    let trace = read_trace(p, head.num_samples, version)?;
                    samples.store_trace(gain, pixel, &trace);
                }
            }
        } else {
            if version < 3 {
                return Err(EventioError::DecodeError {
                    object_type: header.type_code(),
                    version,
                    offset: header.offset(),
                    what: "zero-suppressed samples below version 3",
                });
            }
            let hg_pixels = read_pixel_range_list(p, header, head.num_pixels)?;
            for pixel in &hg_pixels {
                let trace = read_trace(p, head.num_samples, version)?;
                samples.store_trace(HI_GAIN, *pixel, &trace);
            }
            if head.data_red_mode != 0 && head.num_gains > 1 {
                let lg_pixels = read_pixel_range_list(p, header, head.num_pixels)?;
                for pixel in &lg_pixels {
                    let trace = read_trace(p, head.num_samples, version)?;
                    samples.store_trace(LO_GAIN, *pixel, &trace);
                }
            } else if head.num_gains > 1 {
                // without data reduction the low gain accompanies the
                // high gain for every listed pixel
                for pixel in &hg_pixels {
                    let trace = read_trace(p, head.num_samples, version)?;
                    samples.store_trace(LO_GAIN, *pixel, &trace);
                }
            }
        }

        if partial {
            p.skip(p.remaining())?;
        }
        Ok(samples)
    }

    fn store_trace(&mut self, gain: usize, pixel: usize, trace: &[u16]) {
        let cell = self.cell(gain, pixel);
        let start = cell * self.num_samples;
        self.adc_sample[start..start + trace.len()].copy_from_slice(trace);
        self.adc_known[cell] |= KNOWN_SAMPLES;
        self.significant[pixel] |= SIGNIFICANT_SAMPLES;
    }
}

/// One per-pixel trace: raw `u16` up to version 2, differential
/// signed varints (accumulator restarting per trace) from version 3.
fn read_trace(
    p: &mut PayloadCursor,
    num_samples: usize,
    version: u16,
) -> Result<Vec<u16>, EventioError> {
    if version <= 2 {
        p.read_vec::<u16>(num_samples)
    } else {
        Ok(p
            .read_varint_array_differential(num_samples)?
            .into_iter()
            .map(|v| v as u16)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{encode_varint, encode_varint_signed};
    use binrw::Endian;

    fn adc_header(type_code: u16, version: u16, zero_sup: u8, data_red: u8) -> ObjectHeader {
        ObjectHeader {
            type_code,
            version,
            id: (zero_sup as i32) | (data_red as i32) << 5,
            ..Default::default()
        }
    }

    fn push_i16(buf: &mut Vec<u8>, v: i16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u16(buf: &mut Vec<u8>, v: u16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_i32(buf: &mut Vec<u8>, v: i32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    /// tel_id, num_pixels, num_gains prefix of a v2+ payload.
    fn head(buf: &mut Vec<u8>, num_pixels: i32, num_gains: i16) {
        push_i16(buf, 1);
        push_i32(buf, num_pixels);
        push_i16(buf, num_gains);
    }

    fn decode_sums(header: &ObjectHeader, payload: &[u8]) -> AdcSums {
        let mut p = PayloadCursor::new(payload, Endian::Little);
        let mut ctx = DecodeContext::new();
        AdcSums::decode(header, &mut p, &mut ctx).unwrap()
    }

    #[test]
    fn dense_u16_sums() {
        let mut buf = Vec::new();
        head(&mut buf, 4, 2);
        for v in [10u16, 20, 30, 40] {
            push_u16(&mut buf, v); // high gain plane
        }
        for v in [1u16, 2, 3, 4] {
            push_u16(&mut buf, v); // low gain plane
        }
        let sums = decode_sums(&adc_header(2012, 2, 0, 0), &buf);
        assert_eq!(sums.sums(HI_GAIN), &[10, 20, 30, 40]);
        assert_eq!(sums.sums(LO_GAIN), &[1, 2, 3, 4]);
        assert_eq!(sums.known(HI_GAIN, 2), KNOWN_SUM);
        assert_eq!(sums.significants(), &[1, 1, 1, 1]);
    }

    #[test]
    fn dense_differential_sums_v3() {
        let mut buf = Vec::new();
        head(&mut buf, 3, 1);
        // 100, 104, 96 as running-sum deltas
        encode_varint_signed(100, &mut buf);
        encode_varint_signed(4, &mut buf);
        encode_varint_signed(-8, &mut buf);
        let sums = decode_sums(&adc_header(2012, 3, 0, 0), &buf);
        assert_eq!(sums.sums(HI_GAIN), &[100, 104, 96]);
    }

    #[test]
    fn bitmap_mode_skips_empty_groups() {
        // 32 pixels, second group entirely suppressed
        let mut buf = Vec::new();
        head(&mut buf, 32, 1);
        push_u16(&mut buf, 0x0003); // z for group 0: pixels 0, 1
        push_u16(&mut buf, 7);
        push_u16(&mut buf, 8);
        push_u16(&mut buf, 0x0000); // group 1 skipped
        let sums = decode_sums(&adc_header(2012, 2, 1, 0), &buf);
        assert_eq!(sums.sum(HI_GAIN, 0), 7);
        assert_eq!(sums.sum(HI_GAIN, 1), 8);
        assert_eq!(sums.significant(0), 1);
        assert_eq!(sums.significant(2), 0);
        assert_eq!(sums.known(HI_GAIN, 16), 0);
    }

    #[test]
    fn bitmap_scaled_hg_group() {
        // one group exercising all three reduction cases:
        // z = 0x00ff, c = 0x000f, b = 0x00f0
        let mut buf = Vec::new();
        head(&mut buf, 16, 2);
        // data reduction parameters (v < 4: shorts)
        push_i16(&mut buf, 50); // threshold
        push_i16(&mut buf, 100); // offset_hg8
        push_i16(&mut buf, 4); // scale_hg8
        push_u16(&mut buf, 0x00ff); // z
        push_u16(&mut buf, 0x000f); // c
        push_u16(&mut buf, 0x00f0); // b
        for v in [11u16, 12, 13, 14] {
            push_u16(&mut buf, v); // four LG values (c bits)
        }
        for v in [21u16, 22, 23, 24] {
            push_u16(&mut buf, v); // four HG values (c bits)
        }
        buf.extend_from_slice(&[5u8, 6, 7, 8]); // four scaled HG bytes
        let sums = decode_sums(&adc_header(2012, 2, 1, 2), &buf);

        for pixel in 0..4 {
            assert_eq!(sums.sum(LO_GAIN, pixel), 11 + pixel as u32);
            assert_eq!(sums.sum(HI_GAIN, pixel), 21 + pixel as u32);
        }
        for (i, pixel) in (4..8).enumerate() {
            assert_eq!(sums.sum(HI_GAIN, pixel), (5 + i as u32) * 4 + 100);
            assert_eq!(sums.known(LO_GAIN, pixel), 0);
        }
        for pixel in 8..16 {
            assert_eq!(sums.sum(HI_GAIN, pixel), 0);
            assert_eq!(sums.known(HI_GAIN, pixel), 0);
            assert_eq!(sums.significant(pixel), 0);
        }
    }

    #[test]
    fn mode_equivalence_dense_and_bitmap() {
        let values = [3u16, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3, 2, 3];
        let mut dense = Vec::new();
        head(&mut dense, values.len() as i32, 1);
        for v in values {
            push_u16(&mut dense, v);
        }
        let via_dense = decode_sums(&adc_header(2012, 2, 0, 0), &dense);

        let mut bitmap = Vec::new();
        head(&mut bitmap, values.len() as i32, 1);
        push_u16(&mut bitmap, 0xffff);
        for v in &values[..16] {
            push_u16(&mut bitmap, *v);
        }
        push_u16(&mut bitmap, 0x0003);
        for v in &values[16..] {
            push_u16(&mut bitmap, *v);
        }
        let via_bitmap = decode_sums(&adc_header(2012, 2, 1, 0), &bitmap);

        assert_eq!(via_dense.sums(HI_GAIN), via_bitmap.sums(HI_GAIN));
    }

    #[test]
    fn pixel_list_markup_classic() {
        // 8191 pixels, one LG-suppressed entry marked with 0x2000
        let mut buf = Vec::new();
        head(&mut buf, 8191, 2);
        push_i16(&mut buf, 2); // list size
        push_u16(&mut buf, 5); // pixel 5, both gains
        push_u16(&mut buf, (0x2000 | 9) as u16); // pixel 9, LG suppressed
        push_u16(&mut buf, 100); // LG of pixel 5
        push_u16(&mut buf, 200); // HG of pixel 5
        push_u16(&mut buf, 300); // HG of pixel 9
        let sums = decode_sums(&adc_header(2012, 2, 2, 1), &buf);
        assert_eq!(sums.sum(LO_GAIN, 5), 100);
        assert_eq!(sums.sum(HI_GAIN, 5), 200);
        assert_eq!(sums.sum(HI_GAIN, 9), 300);
        assert_eq!(sums.known(LO_GAIN, 9), 0);
        assert_eq!(sums.significant(9), 1);
    }

    #[test]
    fn pixel_list_markup_wide() {
        // 32768 pixels with version 4: 21-bit ids, varint encoding,
        // differential sums
        let mut buf = Vec::new();
        head(&mut buf, 32768, 1);
        encode_varint(1, &mut buf); // list size
        encode_varint(0x200000 | 40000, &mut buf); // pixel 40000? out of range
        let header = adc_header(2012, 4, 2, 1);
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        let mut ctx = DecodeContext::new();
        assert!(matches!(
            AdcSums::decode(&header, &mut p, &mut ctx),
            Err(EventioError::InvalidPixelList { .. })
        ));

        let mut buf = Vec::new();
        head(&mut buf, 32768, 1);
        encode_varint(1, &mut buf);
        encode_varint(0x200000 | 32767, &mut buf); // LG suppressed, pixel 32767
        encode_varint_signed(77, &mut buf); // HG differential
        let sums = decode_sums(&header, &buf);
        assert_eq!(sums.sum(HI_GAIN, 32767), 77);
        assert_eq!(sums.significant(32767), 1);
    }

    #[test]
    fn samples_unsuppressed_and_synthesis() {
        let mut buf = Vec::new();
        push_i16(&mut buf, 1); // tel_id
        push_i32(&mut buf, 2); // num_pixels
        push_i16(&mut buf, 1); // num_gains
        push_i16(&mut buf, 3); // num_samples
        for trace in [[1u16, 2, 3], [4, 5, 6]] {
            for v in trace {
                push_u16(&mut buf, v);
            }
        }
        let header = adc_header(2013, 2, 0, 0);
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        let mut ctx = DecodeContext::new();
        let samples = AdcSamples::decode(&header, &mut p, &mut ctx).unwrap();
        assert_eq!(samples.trace(HI_GAIN, 0), &[1, 2, 3]);
        assert_eq!(samples.trace(HI_GAIN, 1), &[4, 5, 6]);
        assert_eq!(samples.known(HI_GAIN, 1), KNOWN_SAMPLES);
        assert_eq!(samples.significant(0), SIGNIFICANT_SAMPLES);

        let sums = AdcSums::from_samples(&samples);
        assert!(sums.synthesized);
        assert_eq!(sums.sum(HI_GAIN, 0), 6);
        assert_eq!(sums.sum(HI_GAIN, 1), 15);
        assert_eq!(sums.known(HI_GAIN, 0), KNOWN_SUM | KNOWN_SAMPLES);
    }

    #[test]
    fn samples_range_list_high_gain_only() {
        let mut buf = Vec::new();
        push_i16(&mut buf, 1);
        push_i32(&mut buf, 8);
        push_i16(&mut buf, 1);
        push_i16(&mut buf, 2); // num_samples
        encode_varint_signed(1, &mut buf); // one range record
        encode_varint_signed(2, &mut buf); // range 2..=3
        encode_varint_signed(3, &mut buf);
        // two traces, differential
        encode_varint_signed(10, &mut buf);
        encode_varint_signed(1, &mut buf);
        encode_varint_signed(20, &mut buf);
        encode_varint_signed(-2, &mut buf);
        let header = adc_header(2013, 3, 1, 0);
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        let mut ctx = DecodeContext::new();
        let samples = AdcSamples::decode(&header, &mut p, &mut ctx).unwrap();
        assert_eq!(samples.trace(HI_GAIN, 2), &[10, 11]);
        assert_eq!(samples.trace(HI_GAIN, 3), &[20, 18]);
        assert_eq!(samples.significant(2), SIGNIFICANT_SAMPLES);
        assert_eq!(samples.known(HI_GAIN, 4), 0);
        assert!(p.is_empty());
    }

    #[test]
    fn sample_knowledge_preserves_sum_bit() {
        // sums for pixel 0, samples for pixels 0..2
        let mut sum_buf = Vec::new();
        head(&mut sum_buf, 2, 1);
        push_u16(&mut sum_buf, 5);
        push_u16(&mut sum_buf, 6);
        let mut sums = decode_sums(&adc_header(2012, 2, 0, 0), &sum_buf);

        let mut buf = Vec::new();
        push_i16(&mut buf, 1);
        push_i32(&mut buf, 2);
        push_i16(&mut buf, 1);
        push_i16(&mut buf, 1);
        push_u16(&mut buf, 9);
        push_u16(&mut buf, 9);
        let header = adc_header(2013, 2, 0, 0);
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        let mut ctx = DecodeContext::new();
        let samples = AdcSamples::decode(&header, &mut p, &mut ctx).unwrap();

        sums.absorb_samples(&samples);
        assert_eq!(sums.known(HI_GAIN, 0), KNOWN_SUM | KNOWN_SAMPLES);
        assert_eq!(sums.significant(0), 1 | SIGNIFICANT_SAMPLES);
        // sum values untouched
        assert_eq!(sums.sum(HI_GAIN, 0), 5);
    }
}
