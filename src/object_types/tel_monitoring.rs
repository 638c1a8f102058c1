//! Telescope monitoring (type 2022): slow-control snapshots. The
//! `known` bitmask selects which sections are present; each section
//! carries its own timestamp.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 0;

/// Section presence bits.
pub const MON_STATUS: u16 = 0x01;
pub const MON_COUNTS: u16 = 0x02;
pub const MON_PEDESTALS: u16 = 0x04;
pub const MON_TEMPERATURES: u16 = 0x08;
pub const MON_VOLTAGES: u16 = 0x10;
pub const MON_DAQ: u16 = 0x20;

#[derive(Debug, Clone)]
pub struct MonitorStatus {
    pub time: (i32, i32),
    pub status_bits: i32,
}

#[derive(Debug, Clone)]
pub struct MonitorCounts {
    pub time: (i32, i32),
    pub coinc_count: i32,
    pub event_count: i32,
    pub trigger_rate: f32,
    pub sector_rates: Vec<f32>,
    pub event_rate: f32,
    pub data_rate: f32,
}

#[derive(Debug, Clone)]
pub struct MonitorPedestals {
    pub time: (i32, i32),
    pub n_ped_slices: i16,
    /// `[gain][pixel]`.
    pub pedestal: Vec<Vec<f32>>,
    pub noise: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct MonitorTemperatures {
    pub time: (i32, i32),
    pub temperatures: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct MonitorVoltages {
    pub time: (i32, i32),
    pub voltages: Vec<f32>,
    pub currents: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct MonitorDaq {
    pub time: (i32, i32),
    pub daq_conf: i16,
    pub daq_scaler_win: i16,
    pub daq_nd: i16,
    pub daq_acc: i16,
    pub daq_nl: i16,
}

#[derive(Debug, Clone)]
pub struct TelMonitoring {
    pub tel_id: i32,
    pub monitor_id: i32,
    /// Sections present in this snapshot.
    pub known: u16,
    /// Sections refreshed since the last snapshot.
    pub new_parts: u16,
    pub time: (i32, i32),
    pub n_pixels: usize,
    pub n_gains: usize,
    pub status: Option<MonitorStatus>,
    pub counts: Option<MonitorCounts>,
    pub pedestals: Option<MonitorPedestals>,
    pub temperatures: Option<MonitorTemperatures>,
    pub voltages: Option<MonitorVoltages>,
    pub daq: Option<MonitorDaq>,
    pub partial: bool,
}

impl TelMonitoring {
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

        let known = p.read::<u16>()?;
        let new_parts = p.read::<u16>()?;
        let monitor_id = p.read::<i32>()?;
        let time = (p.read::<i32>()?, p.read::<i32>()?);
        let n_pixels = p.read::<i32>()?.max(0) as usize;
        let n_gains = p.read::<i16>()?.max(0) as usize;

        let status = if known & MON_STATUS != 0 {
            Some(MonitorStatus {
                time: (p.read()?, p.read()?),
                status_bits: p.read()?,
            })
        } else {
            None
        };

        let counts = if known & MON_COUNTS != 0 {
            let time = (p.read()?, p.read()?);
            let coinc_count = p.read()?;
            let event_count = p.read()?;
            let trigger_rate = p.read()?;
            let n_sectors = p.read::<i16>()?.max(0) as usize;
            let sector_rates = p.read_vec::<f32>(n_sectors)?;
            Some(MonitorCounts {
                time,
                coinc_count,
                event_count,
                trigger_rate,
                sector_rates,
                event_rate: p.read()?,
                data_rate: p.read()?,
            })
        } else {
            None
        };

        let pedestals = if known & MON_PEDESTALS != 0 {
            let time = (p.read()?, p.read()?);
            let n_ped_slices = p.read::<i16>()?;
            let mut pedestal = Vec::with_capacity(n_gains);
            let mut noise = Vec::with_capacity(n_gains);
            for _ in 0..n_gains {
                pedestal.push(p.read_vec::<f32>(n_pixels)?);
            }
            for _ in 0..n_gains {
                noise.push(p.read_vec::<f32>(n_pixels)?);
            }
            Some(MonitorPedestals {
                time,
                n_ped_slices,
                pedestal,
                noise,
            })
        } else {
            None
        };

        let temperatures = if known & MON_TEMPERATURES != 0 {
            let time = (p.read()?, p.read()?);
            let n_temp = p.read::<i16>()?.max(0) as usize;
            Some(MonitorTemperatures {
                time,
                temperatures: p.read_vec::<f32>(n_temp)?,
            })
        } else {
            None
        };

        let voltages = if known & MON_VOLTAGES != 0 {
            let time = (p.read()?, p.read()?);
            let n_drawers = p.read::<i16>()?.max(0) as usize;
            Some(MonitorVoltages {
                time,
                voltages: p.read_vec::<f32>(n_drawers)?,
                currents: p.read_vec::<f32>(n_drawers)?,
            })
        } else {
            None
        };

        let daq = if known & MON_DAQ != 0 {
            Some(MonitorDaq {
                time: (p.read()?, p.read()?),
                daq_conf: p.read()?,
                daq_scaler_win: p.read()?,
                daq_nd: p.read()?,
                daq_acc: p.read()?,
                daq_nl: p.read()?,
            })
        } else {
            None
        };

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            monitor_id,
            known,
            new_parts,
            time,
            n_pixels,
            n_gains,
            status,
            counts,
            pedestals,
            temperatures,
            voltages,
            daq,
            partial,
        })
    }
}
