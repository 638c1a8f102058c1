//! Camera settings (type 2002): per-pixel geometry of one camera.
//! Version 4 introduces curved focal surfaces with per-pixel depths
//! and normals, version 5 the effective focal length.

use crate::{
    cursor::PayloadCursor,
    object::ObjectHeader,
    EventioError,
};

use super::DecodeContext;

const SUPPORTED_VERSION: u16 = 5;

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub tel_id: i32,
    pub n_pixels: usize,
    /// Nominal focal length, m.
    pub focal_length: f32,
    /// Curved focal surface flag (v4+).
    pub curved_surface: bool,
    /// All pixels parallel to the optical axis (v4+).
    pub pixels_parallel: bool,
    /// Per-pixel depth along the optical axis, only on curved
    /// surfaces.
    pub pixel_depth: Vec<f32>,
    /// Per-pixel normal direction cosines, only when pixels are not
    /// parallel.
    pub pixel_nx: Vec<f32>,
    pub pixel_ny: Vec<f32>,
    /// Effective focal length and its (x, y) offsets, v5+.
    pub effective_focal_length: Option<f32>,
    pub effective_focal_offset: Option<[f32; 2]>,
    pub pixel_x: Vec<f32>,
    pub pixel_y: Vec<f32>,
    pub pixel_size: Vec<f32>,
    pub pixel_area: Vec<f32>,
    /// Pixel shape code: 0 circular, 1/3 hexagonal, 2 square.
    pub pixel_shape: Vec<i16>,
    pub n_mirrors: Option<i32>,
    pub mirror_area: Option<f32>,
    /// Camera rotation angle, radians, v3+.
    pub cam_rot: Option<f32>,
    pub partial: bool,
}

impl CameraSettings {
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
        let focal_length = p.read::<f32>()?;

        let (mut curved_surface, mut pixels_parallel) = (false, true);
        let mut pixel_depth = Vec::new();
        let (mut pixel_nx, mut pixel_ny) = (Vec::new(), Vec::new());
        if version >= 4 {
            curved_surface = p.read_varint()? != 0;
            pixels_parallel = p.read_varint()? == 0;
            if curved_surface {
                pixel_depth = p.read_vec::<f32>(n_pixels)?;
            }
            if !pixels_parallel {
                pixel_nx = p.read_vec::<f32>(n_pixels)?;
                pixel_ny = p.read_vec::<f32>(n_pixels)?;
            }
        }

        let (mut effective_focal_length, mut effective_focal_offset) = (None, None);
        if version >= 5 {
            effective_focal_length = Some(p.read::<f32>()?);
            effective_focal_offset = Some([p.read::<f32>()?, p.read::<f32>()?]);
        }

        let pixel_x = p.read_vec::<f32>(n_pixels)?;
        let pixel_y = p.read_vec::<f32>(n_pixels)?;

        let (mut pixel_size, mut pixel_area, mut pixel_shape) =
            (Vec::new(), Vec::new(), Vec::new());
        if version >= 1 {
            pixel_size = p.read_vec::<f32>(n_pixels)?;
            pixel_area = p.read_vec::<f32>(n_pixels)?;
            pixel_shape = p.read_vec::<i16>(n_pixels)?;
        }

        let (mut n_mirrors, mut mirror_area) = (None, None);
        if version >= 2 {
            n_mirrors = Some(p.read::<i32>()?);
            mirror_area = Some(p.read::<f32>()?);
        }
        let cam_rot = if version >= 3 {
            Some(p.read::<f32>()?)
        } else {
            None
        };

        if partial {
            p.skip(p.remaining())?;
        }

        Ok(Self {
            tel_id: header.id(),
            n_pixels,
            focal_length,
            curved_surface,
            pixels_parallel,
            pixel_depth,
            pixel_nx,
            pixel_ny,
            effective_focal_length,
            effective_focal_offset,
            pixel_x,
            pixel_y,
            pixel_size,
            pixel_area,
            pixel_shape,
            n_mirrors,
            mirror_area,
            cam_rot,
            partial,
        })
    }
}
