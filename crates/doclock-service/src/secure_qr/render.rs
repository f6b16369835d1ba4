//! QR symbol rendering to a PNG raster.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

use doclock_core::error::AppError;
use doclock_core::result::AppResult;

/// Pixels per QR module.
const MODULE_SCALE: u32 = 8;
/// Quiet zone width in modules, per the QR standard minimum.
const QUIET_ZONE_MODULES: u32 = 4;

/// Scan payload for a bundle token.
pub fn scan_url(token: &str) -> String {
    format!("https://doclock.app/s/{token}")
}

/// Encodes a scan URL as a QR symbol (error correction M) and renders it
/// to a PNG with a 4-module quiet zone.
pub fn render_png(token: &str) -> AppResult<Bytes> {
    let code = QrCode::with_error_correction_level(scan_url(token), EcLevel::M)
        .map_err(|e| AppError::internal(format!("QR encoding failed: {e}")))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let side = (width + 2 * QUIET_ZONE_MODULES) * MODULE_SCALE;

    let mut image = GrayImage::from_pixel(side, side, Luma([255u8]));
    for (index, color) in colors.iter().enumerate() {
        if *color == qrcode::Color::Dark {
            let module_x = (index as u32 % width + QUIET_ZONE_MODULES) * MODULE_SCALE;
            let module_y = (index as u32 / width + QUIET_ZONE_MODULES) * MODULE_SCALE;
            for dy in 0..MODULE_SCALE {
                for dx in 0..MODULE_SCALE {
                    image.put_pixel(module_x + dx, module_y + dy, Luma([0u8]));
                }
            }
        }
    }

    let mut out = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("PNG encoding failed: {e}")))?;

    Ok(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_symbol_decodes_to_the_scan_url() {
        let token = "8c4Zw1pQx-decodes";
        let png = render_png(token).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_luma8();
        let (w, h) = decoded.dimensions();
        let mut img = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            decoded.get_pixel(x as u32, y as u32)[0]
        });

        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        assert_eq!(content, scan_url(token));
    }

    #[test]
    fn raster_has_a_quiet_zone() {
        let png = render_png("quiet-zone-check").unwrap();
        let decoded = image::load_from_memory(&png).unwrap().into_luma8();

        // Every pixel in the outer 4-module band is white.
        let band = QUIET_ZONE_MODULES * MODULE_SCALE;
        let (w, h) = decoded.dimensions();
        for x in 0..w {
            for y in 0..band {
                assert_eq!(decoded.get_pixel(x, y)[0], 255);
                assert_eq!(decoded.get_pixel(x, h - 1 - y)[0], 255);
            }
        }
    }
}
