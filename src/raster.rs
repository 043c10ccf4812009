use anyhow::{anyhow, Result};

// Reference glyphs used to size the whole variant: the widest glyph decides
// the horizontal crop, the tallest one the vertical centering offset.
const WIDE_REFERENCE: char = 'W';
const TALL_REFERENCE: char = '(';

// Lowercase glyphs land one pixel too low with the reference offset and get
// nudged up, except these two, which the reference baseline already places
// correctly. Hand-tuned list, not derived from font metrics.
const NUDGE_EXEMPT: [char; 2] = ['f', 't'];

// Coverage at or above this counts as an ink pixel.
const INK_THRESHOLD: u8 = 128;

pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub bits: Vec<u8>,
}

struct BBox {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

pub struct Rasterizer {
    font: fontdue::Font,
    size: u32,
    ascent: i32,
    crop: u32,
    height_offset: i32,
}

impl Rasterizer {
    pub fn new(font_data: &[u8], size: u32) -> Result<Self> {
        if size == 0 {
            return Err(anyhow!("font size must be nonzero"));
        }
        let font = fontdue::Font::from_bytes(font_data, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("unable to parse font: {}", e))?;
        let ascent = font
            .horizontal_line_metrics(size as f32)
            .ok_or_else(|| anyhow!("font has no horizontal line metrics"))?
            .ascent
            .round() as i32;

        let mut raster = Self{ font, size, ascent, crop: 0, height_offset: 0 };

        let wide = raster.bbox(WIDE_REFERENCE);
        let max_width = wide.x1 - wide.x0;
        // A font whose widest glyph overflows the em square gets no crop
        raster.crop = ((size as i32 - max_width) / 2).max(0) as u32;

        let tall = raster.bbox(TALL_REFERENCE);
        raster.height_offset = (size as i32 - tall.y1 - tall.y0) / 2;

        Ok(raster)
    }

    /// Glyph width after cropping; the same for every character of a variant.
    pub fn width(&self) -> u32 {
        self.size - 2 * self.crop
    }

    pub fn height(&self) -> u32 {
        self.size
    }

    // Bounding box of a character relative to the top-left of the line box,
    // y axis pointing down.
    fn bbox(&self, ch: char) -> BBox {
        let m = self.font.metrics(ch, self.size as f32);
        BBox{
            x0: m.xmin,
            y0: self.ascent - (m.ymin + m.height as i32),
            x1: m.xmin + m.width as i32,
            y1: self.ascent - m.ymin,
        }
    }

    /// Renders one character, centered on a size x size canvas, then cropped
    /// horizontally by the per-variant crop amount.
    pub fn glyph(&self, ch: char) -> Bitmap {
        let size = self.size as i32;
        let b = self.bbox(ch);
        let x_offset = (size - b.x1 - b.x0) / 2;
        let mut y_offset = self.height_offset;
        if ch.is_ascii_lowercase() && !NUDGE_EXEMPT.contains(&ch) {
            y_offset -= 1;
        }

        let (m, coverage) = self.font.rasterize(ch, self.size as f32);
        let mut canvas = vec![0u8; (self.size * self.size) as usize];
        let left = x_offset + m.xmin;
        let top = y_offset + self.ascent - (m.ymin + m.height as i32);
        blit(&mut canvas, self.size, &coverage, m.width, m.height, left, top);

        crop_columns(&canvas, self.size, self.crop)
    }
}

// Thresholds the coverage buffer onto the canvas; pixels falling outside the
// canvas (negative offsets and all) are dropped.
fn blit(
    canvas: &mut [u8],
    canvas_size: u32,
    coverage: &[u8],
    width: usize,
    height: usize,
    left: i32,
    top: i32,
) {
    for row in 0..height {
        let y = top + row as i32;
        if y < 0 || y >= canvas_size as i32 {
            continue;
        }
        for col in 0..width {
            let x = left + col as i32;
            if x < 0 || x >= canvas_size as i32 {
                continue;
            }
            if coverage[row * width + col] >= INK_THRESHOLD {
                canvas[(y * canvas_size as i32 + x) as usize] = 1;
            }
        }
    }
}

fn crop_columns(canvas: &[u8], size: u32, crop: u32) -> Bitmap {
    let width = size - 2 * crop;
    let mut bits = Vec::with_capacity((width * size) as usize);
    for y in 0..size as usize {
        let row = &canvas[y * size as usize..(y + 1) * size as usize];
        bits.extend_from_slice(&row[crop as usize..(size - crop) as usize]);
    }
    Bitmap{ width, height: size, bits }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_applies_threshold() {
        let mut canvas = vec![0u8; 16];
        blit(&mut canvas, 4, &[255, 127, 128, 0], 2, 2, 1, 1);
        assert_eq!(canvas[1 * 4 + 1], 1);
        assert_eq!(canvas[1 * 4 + 2], 0);
        assert_eq!(canvas[2 * 4 + 1], 1);
        assert_eq!(canvas[2 * 4 + 2], 0);
    }

    #[test]
    fn blit_clips_outside_canvas() {
        let mut canvas = vec![0u8; 9];
        blit(&mut canvas, 3, &[255; 9], 3, 3, -1, -2);
        // Only the overlap with the canvas survives
        assert_eq!(canvas, vec![1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn blit_clips_right_and_bottom() {
        let mut canvas = vec![0u8; 4];
        blit(&mut canvas, 2, &[255; 4], 2, 2, 1, 1);
        assert_eq!(canvas, vec![0, 0, 0, 1]);
    }

    #[test]
    fn crop_removes_both_sides() {
        // 4x4 canvas with ink in the two middle columns
        let canvas = vec![
            0, 1, 1, 0, //
            0, 1, 1, 0, //
            0, 1, 1, 0, //
            0, 1, 1, 0, //
        ];
        let bitmap = crop_columns(&canvas, 4, 1);
        assert_eq!(bitmap.width, 2);
        assert_eq!(bitmap.height, 4);
        assert_eq!(bitmap.bits, vec![1; 8]);
    }

    #[test]
    fn zero_crop_keeps_canvas() {
        let canvas = vec![0, 1, 1, 0];
        let bitmap = crop_columns(&canvas, 2, 0);
        assert_eq!(bitmap.width, 2);
        assert_eq!(bitmap.bits, canvas);
    }
}
