use crate::{Cursor, Error};

#[inline(always)]
fn min_pitch(width: u16) -> usize {
    (width as usize + 7) / 8
}

/// Check the layout shared by [`Raster`] and [`Bitmap`], returns the bytes it spans.
fn check_layout(width: u16, height: u16, pitch: usize) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    let min = min_pitch(width);
    if pitch < min {
        return Err(Error::PitchTooSmall { pitch, min });
    }
    Ok(pitch * height as usize)
}

/// A borrowed 1-bit-per-pixel image.
///
/// Rows are `pitch` bytes apart, pixel `(x, y)` lives at bit `7 - x % 8` of byte
/// `x / 8 + y * pitch`.
#[derive(Copy, Clone, Debug)]
pub struct Raster<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
    pitch: usize,
}

impl<'a> Raster<'a> {
    pub fn new(data: &'a [u8], width: u16, height: u16, pitch: usize) -> Result<Raster<'a>, Error> {
        let needed = check_layout(width, height, pitch)?;
        if data.len() < needed {
            return Err(Error::BufferTooSmall {
                len: data.len(),
                needed,
            });
        }
        Ok(Raster {
            data,
            width,
            height,
            pitch,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.width, self.height)
    }

    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        (self.data[(x >> 3) + y * self.pitch] >> (7 - (x & 7))) & 1
    }

    /// Read the pixel under `cursor` and advance it.
    ///
    /// Past the last row this returns 0 and leaves the cursor alone, so run
    /// scans may look beyond the end of the image.
    #[inline(always)]
    pub fn read_pixel(&self, cursor: &mut Cursor) -> u8 {
        if cursor.is_end() {
            return 0;
        }
        let pixel = self.pixel(cursor.x(), cursor.y());
        cursor.advance();
        pixel
    }
}

/// An owned 1-bit-per-pixel image, laid out like [`Raster`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    data: Vec<u8>,
    width: u16,
    height: u16,
    pitch: usize,
}

impl Bitmap {
    /// A blank (all 0) bitmap with the tightest pitch.
    pub fn new(width: u16, height: u16) -> Result<Bitmap, Error> {
        Bitmap::with_pitch(width, height, min_pitch(width))
    }

    pub fn with_pitch(width: u16, height: u16, pitch: usize) -> Result<Bitmap, Error> {
        let len = check_layout(width, height, pitch)?;
        Ok(Bitmap {
            data: vec![0; len],
            width,
            height,
            pitch,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raster(&self) -> Raster<'_> {
        Raster {
            data: &self.data,
            width: self.width,
            height: self.height,
            pitch: self.pitch,
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.as_raster().pixel(x, y)
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, pixel: u8) {
        let mask = 0x80 >> (x & 7);
        let byte = &mut self.data[(x >> 3) + y * self.pitch];
        if pixel & 1 == 1 {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}
