use image::imageops::FilterType;
use image::GenericImageView;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

/// Pixel edge used when downscaling official artwork for the terminal.
pub const ARTWORK_EDGE: u32 = 32;

const ALPHA_CUTOFF: u8 = 64;

/// Downscaled RGBA artwork, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Artwork {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Terminal rows needed: two pixel rows per cell.
    pub fn rows(&self) -> u16 {
        self.height.div_ceil(2) as u16
    }

    /// Half-block rendering: `▀` with the upper pixel as foreground and the
    /// lower as background. Transparent pixels show `backdrop`.
    pub fn to_lines(&self, backdrop: Color) -> Vec<Line<'static>> {
        let cell = |pixel: Option<[u8; 4]>| match pixel {
            Some([r, g, b, a]) if a >= ALPHA_CUTOFF => Color::Rgb(r, g, b),
            _ => backdrop,
        };
        (0..self.height)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..self.width)
                    .map(|x| {
                        let top = cell(self.pixel(x, y));
                        let bottom = cell(self.pixel(x, y + 1));
                        Span::styled("▀", Style::default().fg(top).bg(bottom))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

pub fn decode_artwork(bytes: &[u8], edge: u32) -> Result<Artwork, String> {
    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err("artwork has no pixels".to_string());
    }
    let scaled = if width > edge || height > edge {
        image.resize(edge, edge, FilterType::Triangle)
    } else {
        image
    };
    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba.pixels().map(|pixel| pixel.0).collect();
    Ok(Artwork {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, color);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn downscales_large_artwork() {
        let artwork = decode_artwork(&png(128, 64, Rgba([255, 0, 0, 255])), 32).unwrap();
        assert_eq!((artwork.width, artwork.height), (32, 16));
        assert_eq!(artwork.pixels.len(), 32 * 16);
        let [r, g, b, a] = artwork.pixel(0, 0).unwrap();
        assert!(r > 250 && g < 5 && b < 5 && a > 250);
        assert_eq!(artwork.rows(), 8);
    }

    #[test]
    fn keeps_small_artwork_size() {
        let artwork = decode_artwork(&png(4, 3, Rgba([0, 0, 255, 255])), 32).unwrap();
        assert_eq!((artwork.width, artwork.height), (4, 3));
        let lines = artwork.to_lines(Color::Black);
        assert_eq!(lines.len(), 2);
        let last = &lines[1].spans[0];
        assert_eq!(last.style.fg, Some(Color::Rgb(0, 0, 255)));
        assert_eq!(last.style.bg, Some(Color::Black));
    }

    #[test]
    fn transparent_pixels_show_backdrop() {
        let artwork = decode_artwork(&png(2, 2, Rgba([10, 20, 30, 0])), 32).unwrap();
        let lines = artwork.to_lines(Color::Rgb(1, 2, 3));
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Rgb(1, 2, 3)));
    }

    #[test]
    fn rejects_non_images() {
        assert!(decode_artwork(b"not a png", 32).is_err());
    }
}
