//! Shared list codecs used by several payload decoders.

use crate::{
    cursor::PayloadCursor,
    errors::WarningKind,
    object::ObjectHeader,
    object_types::DecodeContext,
    EventioError,
};

/// Reads a pixel count: `i16` in the classic layout, varint once an
/// object version signals wide mode. Classic counts saturate at
/// 32767 by construction of the field width.
pub(crate) fn read_count(p: &mut PayloadCursor, wide: bool) -> Result<usize, EventioError> {
    if wide {
        Ok(p.read_varint()? as usize)
    } else {
        Ok(p.read::<i16>()?.max(0) as usize)
    }
}

/// Reads `n` pixel indices in the width selected by `wide`.
pub(crate) fn read_pixel_indices(
    p: &mut PayloadCursor,
    n: usize,
    wide: bool,
) -> Result<Vec<u32>, EventioError> {
    (0..n)
        .map(|_| {
            if wide {
                Ok(p.read_varint()? as u32)
            } else {
                Ok(p.read::<i16>()?.max(0) as u32)
            }
        })
        .collect()
}

/// Pixel-range list: a signed-varint record count, then per record a
/// signed varint `x`. Negative `x` denotes the single pixel
/// `-x - 1`; non-negative `x` opens the inclusive range `x..=y` with
/// `y` read as the next signed varint. Returns the expanded pixel
/// indices in file order.
pub(crate) fn read_pixel_range_list(
    p: &mut PayloadCursor,
    header: &ObjectHeader,
    num_pixels: usize,
) -> Result<Vec<usize>, EventioError> {
    let list_size = p.read_varint_signed()?;
    let mut pixels = Vec::new();
    for _ in 0..list_size.max(0) {
        let x = p.read_varint_signed()?;
        if x < 0 {
            let pixel = (-x - 1) as usize;
            check_pixel(header, pixel as i64, num_pixels)?;
            pixels.push(pixel);
        } else {
            let y = p.read_varint_signed()?;
            check_pixel(header, x, num_pixels)?;
            check_pixel(header, y, num_pixels)?;
            for pixel in x..=y {
                pixels.push(pixel as usize);
            }
        }
    }
    Ok(pixels)
}

fn check_pixel(header: &ObjectHeader, pixel: i64, num_pixels: usize) -> Result<(), EventioError> {
    if pixel < 0 || pixel as usize >= num_pixels {
        return Err(EventioError::InvalidPixelList {
            object_type: header.type_code(),
            offset: header.offset(),
            pixel,
            num_pixels,
        });
    }
    Ok(())
}

/// Sector membership list with the historical zero-termination scan:
/// a zero entry at position ≥ 1 ends the list early regardless of
/// the declared count. A truncated list is recorded as an
/// `InvalidSectorCount` warning, not an error.
pub(crate) fn read_sector_list(
    p: &mut PayloadCursor,
    header: &ObjectHeader,
    ctx: &mut DecodeContext,
) -> Result<Vec<i16>, EventioError> {
    let declared = p.read::<i16>()?.max(0) as usize;
    let raw = p.read_vec::<i16>(declared)?;
    let kept = match raw.iter().skip(1).position(|s| *s == 0) {
        Some(at) => at + 1,
        None => declared,
    };
    if kept != declared {
        ctx.warn(
            WarningKind::InvalidSectorCount { declared, kept },
            header.offset(),
        );
    }
    let mut sectors = raw;
    sectors.truncate(kept);
    Ok(sectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::encode_varint_signed;
    use binrw::Endian;

    fn header() -> ObjectHeader {
        ObjectHeader {
            type_code: 2013,
            ..Default::default()
        }
    }

    #[test]
    fn range_list_mixes_singles_and_ranges() {
        let mut buf = Vec::new();
        encode_varint_signed(3, &mut buf); // three records
        encode_varint_signed(-5, &mut buf); // single pixel 4
        encode_varint_signed(7, &mut buf); // range 7..=9
        encode_varint_signed(9, &mut buf);
        encode_varint_signed(-1, &mut buf); // single pixel 0
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        let pixels = read_pixel_range_list(&mut p, &header(), 16).unwrap();
        assert_eq!(pixels, vec![4, 7, 8, 9, 0]);
    }

    #[test]
    fn range_list_rejects_out_of_range() {
        let mut buf = Vec::new();
        encode_varint_signed(1, &mut buf);
        encode_varint_signed(-17, &mut buf); // pixel 16 of 16
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        assert!(matches!(
            read_pixel_range_list(&mut p, &header(), 16),
            Err(EventioError::InvalidPixelList { pixel: 16, .. })
        ));
    }

    #[test]
    fn sector_list_stops_at_embedded_zero() {
        let mut ctx = DecodeContext::new();
        let mut buf = Vec::new();
        buf.extend_from_slice(&6_i16.to_le_bytes());
        for s in [0_i16, 3, 4, 0, 9, 9] {
            buf.extend_from_slice(&s.to_le_bytes());
        }
        let mut p = PayloadCursor::new(&buf, Endian::Little);
        let sectors = read_sector_list(&mut p, &header(), &mut ctx).unwrap();
        // leading zero is a valid sector, the second zero terminates
        assert_eq!(sectors, vec![0, 3, 4]);
        assert!(ctx.has_warnings());
        // the full declared extent was consumed either way
        assert!(p.is_empty());
    }
}
