//! Background colours taken from the current track's cover art.

use image::imageops::FilterType;
use ratatui::style::Color;
use tracing::debug;

use crate::library::decode_data_uri;

const SAMPLE_SIZE: u32 = 50;
const MIN_LIGHTNESS: u16 = 20;
const MIN_CHROMA: u8 = 30;
const SECONDARY_SCALE: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub primary: (u8, u8, u8),
    pub secondary: (u8, u8, u8),
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: (0x22, 0x22, 0x22),
            secondary: (0x11, 0x11, 0x11),
        }
    }
}

impl Palette {
    pub fn from_primary(rgb: (u8, u8, u8)) -> Self {
        let scale = |c: u8| (c as f32 * SECONDARY_SCALE) as u8;
        Self {
            primary: rgb,
            secondary: (scale(rgb.0), scale(rgb.1), scale(rgb.2)),
        }
    }

    pub fn primary(&self) -> Color {
        let (r, g, b) = self.primary;
        Color::Rgb(r, g, b)
    }

    pub fn secondary(&self) -> Color {
        let (r, g, b) = self.secondary;
        Color::Rgb(r, g, b)
    }

    /// Readable text colour on top of `primary`.
    pub fn foreground(&self) -> Color {
        let (r, g, b) = self.primary;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        if luma > 150.0 { Color::Black } else { Color::White }
    }
}

/// Average of the pixels that are neither near-black nor greyish.
///
/// `pixels` is packed RGBA. Returns `None` if no pixel qualifies.
pub fn dominant_color(pixels: &[u8]) -> Option<(u8, u8, u8)> {
    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for px in pixels.chunks_exact(4) {
        let max = px[0].max(px[1]).max(px[2]);
        let min = px[0].min(px[1]).min(px[2]);
        if (max as u16 + min as u16) / 2 > MIN_LIGHTNESS && max - min > MIN_CHROMA {
            r += px[0] as u64;
            g += px[1] as u64;
            b += px[2] as u64;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some(((r / count) as u8, (g / count) as u8, (b / count) as u8))
}

/// Palette for a track's cover.
///
/// No cover gives the default palette. `None` means the cover could not be
/// used (undecodable, or no pixel qualified) and the current palette stays.
pub fn palette_for(cover: Option<&str>) -> Option<Palette> {
    let Some(uri) = cover else {
        return Some(Palette::default());
    };
    let (_, bytes) = decode_data_uri(uri)?;
    let img = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            debug!(error = %e, "cover art not decodable, keeping palette");
            return None;
        }
    };
    let small = img
        .resize_exact(SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle)
        .to_rgba8();
    dominant_color(small.as_raw()).map(Palette::from_primary)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;
    use crate::library::data_uri;

    fn png_uri(color: [u8; 4]) -> String {
        let img = RgbaImage::from_pixel(8, 8, Rgba(color));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        data_uri(Some("image/png"), buf.get_ref())
    }

    #[test]
    fn dominant_color_skips_dark_and_grey_pixels() {
        let pixels = [
            0, 0, 0, 255, // black
            128, 128, 128, 255, // grey
            200, 40, 40, 255, // red
            40, 40, 200, 255, // blue
        ];
        assert_eq!(dominant_color(&pixels), Some((120, 40, 120)));
        assert_eq!(dominant_color(&[10, 10, 10, 255]), None);
        assert_eq!(dominant_color(&[]), None);
    }

    #[test]
    fn secondary_is_sixty_percent_of_primary() {
        let p = Palette::from_primary((200, 100, 50));
        assert_eq!(p.secondary, (120, 60, 30));
        assert_eq!(p.primary(), Color::Rgb(200, 100, 50));
    }

    #[test]
    fn missing_cover_resets_to_default_palette() {
        assert_eq!(palette_for(None), Some(Palette::default()));
        assert_eq!(Palette::default().primary(), Color::Rgb(0x22, 0x22, 0x22));
    }

    #[test]
    fn colourful_cover_sets_palette() {
        let palette = palette_for(Some(&png_uri([200, 40, 40, 255]))).unwrap();
        assert_eq!(palette.primary, (200, 40, 40));
        assert_eq!(palette.secondary, (120, 24, 24));
    }

    #[test]
    fn unusable_cover_keeps_current_palette() {
        assert_eq!(palette_for(Some(&png_uri([90, 90, 90, 255]))), None);
        assert_eq!(palette_for(Some("data:image/png;base64,AAAA")), None);
        assert_eq!(palette_for(Some("not a data uri")), None);
    }
}
