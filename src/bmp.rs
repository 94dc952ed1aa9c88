use anyhow::{bail, Context, Result};
use image::{GrayImage, ImageFormat, Luma};
use isbic::Bitmap;
use std::path::Path;

const BLACK: u8 = 0x00;
const WHITE: u8 = 0xFF;

/// Load a two-color image, white pixels become 1.
pub fn read(path: &Path) -> Result<Bitmap> {
    let image = image::open(path)
        .with_context(|| format!("Unable to open file: {}", path.display()))?
        .to_luma8();
    let (width, height) = image.dimensions();
    let width = u16::try_from(width).with_context(|| format!("Image width {width} is too large"))?;
    let height =
        u16::try_from(height).with_context(|| format!("Image height {height} is too large"))?;

    let mut bitmap = Bitmap::new(width, height)?;
    for (x, y, Luma([value])) in image.enumerate_pixels() {
        match *value {
            BLACK => {}
            WHITE => bitmap.set(x as usize, y as usize, 1),
            other => bail!("Only 1-bpp images are supported, found gray level {other} at ({x}, {y})"),
        }
    }
    Ok(bitmap)
}

/// Write `width * height` pixels given in row-major order as a BMP file.
///
/// The file is an 8-bit grayscale BMP rather than 1-bpp since `image` has no
/// 1-bpp BMP encoder; [`read`] accepts it back.
pub fn write<I>(path: &Path, width: u16, height: u16, mut pixels: I) -> Result<()>
where
    I: Iterator<Item = u8>,
{
    let mut image = GrayImage::new(width as u32, height as u32);
    for y in 0..height as u32 {
        for x in 0..width as u32 {
            let value = match pixels.next() {
                Some(1) => WHITE,
                Some(_) => BLACK,
                None => bail!("Ran out of pixels at ({x}, {y})"),
            };
            image.put_pixel(x, y, Luma([value]));
        }
    }
    image
        .save_with_format(path, ImageFormat::Bmp)
        .with_context(|| format!("Error creating output file {}", path.display()))
}
