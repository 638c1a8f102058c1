//! IACT photon bunches (type 1205), decoded into columnar arrays.
//!
//! A bunch is a fixed-layout record `x, y, cx, cy, time, zem,
//! photons, wavelength`. The "compact" variant (object version
//! 1000+) stores each field as a scaled `i16`; the long variant
//! stores plain `f32`. Payloads reach tens of megabytes, so fields
//! are extracted column-parallel straight out of the raw record
//! bytes with no per-bunch intermediate.

use binrw::Endian;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const COMPACT_RECORD: usize = 16;
const LONG_RECORD: usize = 32;

/// Columnar photon-bunch arrays for one telescope.
#[derive(Debug, Clone, Default)]
pub struct PhotonBunches {
    pub array_id: i16,
    pub telescope_id: i16,
    /// Total photon count written by the simulation for this
    /// telescope; the per-bunch `photons` column sums to this.
    pub n_photons: f32,
    pub n_bunches: usize,
    pub compact: bool,
    /// Bunch position in cm, relative to the telescope sphere center.
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    /// Direction cosines.
    pub cx: Vec<f32>,
    pub cy: Vec<f32>,
    /// Arrival time in ns.
    pub time: Vec<f32>,
    /// Emission altitude in cm.
    pub zem: Vec<f32>,
    /// Photons in this bunch.
    pub photons: Vec<f32>,
    /// Wavelength in nm, 0 if unset; negative values flag scattered
    /// bunches in some producers.
    pub wavelength: Vec<f32>,
    /// Scattering flag words, kept verbatim.
    pub scattered: Vec<u16>,
}

impl PhotonBunches {
    pub(crate) fn decode(
        header: &ObjectHeader,
        p: &mut PayloadCursor,
        _ctx: &mut DecodeContext,
    ) -> Result<Self, EventioError> {
        let compact = header.version() / 1000 == 1;
        let record_size = if compact { COMPACT_RECORD } else { LONG_RECORD };

        let array_id = p.read::<i16>()?;
        let telescope_id = p.read::<i16>()?;
        let n_photons = p.read::<f32>()?;
        let n_bunches = p.read::<i32>()?.max(0) as usize;

        let big = matches!(p.endian(), Endian::Big);
        let raw = p.take(n_bunches * record_size)?;

        let mut bunches = Self {
            array_id,
            telescope_id,
            n_photons,
            n_bunches,
            compact,
            x: vec![0.0; n_bunches],
            y: vec![0.0; n_bunches],
            cx: vec![0.0; n_bunches],
            cy: vec![0.0; n_bunches],
            time: vec![0.0; n_bunches],
            zem: vec![0.0; n_bunches],
            photons: vec![0.0; n_bunches],
            wavelength: vec![0.0; n_bunches],
            scattered: Vec::new(),
        };

        {
            let columns: Vec<(usize, &mut [f32])> = vec![
                (0, &mut bunches.x),
                (1, &mut bunches.y),
                (2, &mut bunches.cx),
                (3, &mut bunches.cy),
                (4, &mut bunches.time),
                (5, &mut bunches.zem),
                (6, &mut bunches.photons),
                (7, &mut bunches.wavelength),
            ];
            columns.into_par_iter().for_each(|(field, column)| {
                fill_column(column, raw, record_size, field, compact, big);
            });
        }

        bunches.scattered = bunches
            .wavelength
            .iter()
            .map(|w| (*w < 0.0) as u16)
            .collect();

        Ok(bunches)
    }

    pub fn is_empty(&self) -> bool {
        self.n_bunches == 0
    }

    pub fn len(&self) -> usize {
        self.n_bunches
    }

    /// Boolean view of the scattering flag word.
    pub fn is_scattered(&self, bunch: usize) -> bool {
        self.scattered.get(bunch).is_some_and(|s| *s != 0)
    }

    /// Sum of the per-bunch photon counts.
    pub fn photon_sum(&self) -> f64 {
        self.photons.iter().map(|p| *p as f64).sum()
    }
}

/// Extracts one field of every record into `column`. Compact records
/// carry scaled `i16` values: positions and times in 0.1 cm/ns,
/// direction cosines in 1/30000, photons in 0.01, emission altitude
/// as 1000 * log10(zem).
fn fill_column(
    column: &mut [f32],
    raw: &[u8],
    record_size: usize,
    field: usize,
    compact: bool,
    big: bool,
) {
    for (i, record) in raw.chunks_exact(record_size).enumerate() {
        column[i] = if compact {
            let off = field * 2;
            let bytes = [record[off], record[off + 1]];
            let v = if big {
                i16::from_be_bytes(bytes)
            } else {
                i16::from_le_bytes(bytes)
            } as f32;
            match field {
                2 | 3 => v / 30000.0,
                5 => 10f32.powf(v * 0.001),
                6 => v / 100.0,
                7 => v,
                _ => v / 10.0,
            }
        } else {
            let off = field * 4;
            let bytes = [
                record[off],
                record[off + 1],
                record[off + 2],
                record[off + 3],
            ];
            if big {
                f32::from_be_bytes(bytes)
            } else {
                f32::from_le_bytes(bytes)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photons_header(version: u16) -> ObjectHeader {
        ObjectHeader {
            type_code: 1205,
            version,
            ..Default::default()
        }
    }

    fn long_payload(bunches: &[[f32; 8]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0_i16.to_le_bytes());
        out.extend_from_slice(&1_i16.to_le_bytes());
        let total: f32 = bunches.iter().map(|b| b[6]).sum();
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&(bunches.len() as i32).to_le_bytes());
        for bunch in bunches {
            for v in bunch {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }

    #[test]
    fn long_records_decode_columnar() {
        let payload = long_payload(&[
            [1.0, 2.0, 0.1, 0.2, 10.0, 80000.0, 3.0, 420.0],
            [4.0, 5.0, 0.3, 0.4, 11.0, 90000.0, 2.5, -420.0],
        ]);
        let mut p = PayloadCursor::new(&payload, Endian::Little);
        let mut ctx = DecodeContext::new();
        let bunches =
            PhotonBunches::decode(&photons_header(0), &mut p, &mut ctx).unwrap();
        assert_eq!(bunches.len(), 2);
        assert_eq!(bunches.x, vec![1.0, 4.0]);
        assert_eq!(bunches.cy, vec![0.2, 0.4]);
        assert_eq!(bunches.photons, vec![3.0, 2.5]);
        assert!((bunches.photon_sum() - bunches.n_photons as f64).abs() < 1e-3);
        assert_eq!(bunches.scattered, vec![0, 1]);
        assert!(bunches.is_scattered(1));
        assert!(p.is_empty());
    }

    #[test]
    fn compact_records_are_rescaled() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0_i16.to_le_bytes());
        payload.extend_from_slice(&0_i16.to_le_bytes());
        payload.extend_from_slice(&1.5_f32.to_le_bytes());
        payload.extend_from_slice(&1_i32.to_le_bytes());
        // x=12.5cm, y=-3cm, cx=0.5, cy=-0.25, t=7.5ns, zem=10^4cm,
        // photons=1.5, wavelength=400
        for v in [125_i16, -30, 15000, -7500, 75, 4000, 150, 400] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let mut p = PayloadCursor::new(&payload, Endian::Little);
        let mut ctx = DecodeContext::new();
        let bunches =
            PhotonBunches::decode(&photons_header(1001), &mut p, &mut ctx).unwrap();
        assert!(bunches.compact);
        assert_eq!(bunches.x[0], 12.5);
        assert_eq!(bunches.y[0], -3.0);
        assert_eq!(bunches.cx[0], 0.5);
        assert_eq!(bunches.cy[0], -0.25);
        assert_eq!(bunches.time[0], 7.5);
        assert!((bunches.zem[0] - 10_000.0).abs() < 1.0);
        assert_eq!(bunches.photons[0], 1.5);
        assert_eq!(bunches.wavelength[0], 400.0);
    }

    #[test]
    fn short_payload_is_unexpected_end() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0_i16.to_le_bytes());
        payload.extend_from_slice(&0_i16.to_le_bytes());
        payload.extend_from_slice(&0_f32.to_le_bytes());
        payload.extend_from_slice(&3_i32.to_le_bytes());
        payload.extend_from_slice(&[0u8; 16]); // one bunch of three
        let mut p = PayloadCursor::new(&payload, Endian::Little);
        let mut ctx = DecodeContext::new();
        assert!(matches!(
            PhotonBunches::decode(&photons_header(1001), &mut p, &mut ctx),
            Err(EventioError::UnexpectedEnd { .. })
        ));
    }
}
