use bmp::{px, Image, Pixel};
use anyhow::Result;

pub fn render_bitmap(fname: &str, width: u32, height: u32, bits: &[u8]) -> Result<()> {
    let mut img = Image::new(width, height);
    for (x, y) in img.coordinates() {
        if bits[(width * y + x) as usize] != 0 {
            img.set_pixel(x, y, px!(255, 255, 255));
        }
    }
    img.save(fname)?;
    Ok(())
}
