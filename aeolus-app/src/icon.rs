//! Condition icons as terminal text.
//!
//! Icon PNGs are downsampled onto braille cells (2x4 dots per cell). When the
//! image is missing or won't decode, a small ASCII glyph stands in.

use image::{ImageFormat, RgbaImage};
use tracing::warn;

/// Cells across; the height is half this so the glyph looks square.
pub const ICON_COLS: usize = 14;
pub const ICON_ROWS: usize = 7;

const ALPHA_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconArt {
    rows: Vec<String>,
}

impl IconArt {
    pub fn from_png(bytes: &[u8]) -> Option<Self> {
        let img = match image::load_from_memory_with_format(bytes, ImageFormat::Png) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                warn!("Icon decode failed: {e}");
                return None;
            }
        };

        Some(Self { rows: braille_rows(&img, ICON_COLS, ICON_ROWS) })
    }

    /// Text stand-in keyed on the condition family (`"04d"` → `"04"`).
    pub fn fallback(icon_code: &str) -> Self {
        let family = icon_code.get(..2).unwrap_or("");
        let art: &[&str] = match family {
            "01" => &[r"  \ | /  ", r" -  O  - ", r"  / | \  "],
            "02" | "03" | "04" => &[r"   .--.  ", r".-(    ). ", r"(___.__)_)"],
            "09" | "10" => &[r"  .--.   ", r" (    ).  ", r"  ' ' '   "],
            "11" => &[r"  .--.   ", r" (    ).  ", r"   /_/    "],
            "13" => &[r"  *  *   ", r"   *  *  ", r"  *  *   "],
            "50" => &[r" _ - _ - ", r"  _ - _  ", r" _ - _ - "],
            _ => &[r"  ? ? ?  "],
        };

        Self { rows: art.iter().map(|row| row.to_string()).collect() }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

fn braille_rows(img: &RgbaImage, cols: usize, rows: usize) -> Vec<String> {
    let iw = img.width().max(1) as usize;
    let ih = img.height().max(1) as usize;
    let sample_w = cols.saturating_mul(2).max(1);
    let sample_h = rows.saturating_mul(4).max(1);

    (0..rows)
        .map(|cy| {
            (0..cols)
                .map(|cx| {
                    let mut bits = [[false; 2]; 4];
                    for (sy, row) in bits.iter_mut().enumerate() {
                        for (sx, bit) in row.iter_mut().enumerate() {
                            let px = (cx * 2 + sx) * iw / sample_w;
                            let py = (cy * 4 + sy) * ih / sample_h;
                            let alpha = img.get_pixel(px as u32, py as u32).0[3] as f32 / 255.0;
                            *bit = alpha > ALPHA_THRESHOLD;
                        }
                    }
                    braille_from_2x4(bits)
                })
                .collect()
        })
        .collect()
}

fn braille_from_2x4(bits: [[bool; 2]; 4]) -> char {
    // Dot numbering: left column 1,2,3,7 top to bottom; right column 4,5,6,8.
    const DOTS: [[u32; 2]; 4] = [[0, 3], [1, 4], [2, 5], [6, 7]];

    let mut mask = 0u32;
    for (y, row) in bits.iter().enumerate() {
        for (x, on) in row.iter().enumerate() {
            if *on {
                mask |= 1 << DOTS[y][x];
            }
        }
    }

    if mask == 0 {
        ' '
    } else {
        char::from_u32(0x2800 + mask).unwrap_or(' ')
    }
}
