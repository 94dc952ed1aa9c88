use crate::{
    Chunk, Cursor, Header, Raster, HEADER_LEN, LONG_MIN_RUN, MAX_REWIND, MAX_RUN,
    SHORT_MAX_RUN2, SHORT_MIN_PIXELS, UNCOMP_PIXELS,
};
use std::io;

/// A run of same-colored pixels found by [`scan_run`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub len: usize,
    pub color: u8,
    /// first pixel after the run, or the end-of-image sentinel
    pub next: Cursor,
}

/// Count the pixels from `start` that share its color, at most `cap` of them.
///
/// The scan stops at the end of the image, so a run starting at the sentinel
/// is empty.
pub fn scan_run(raster: &Raster<'_>, start: Cursor, cap: usize) -> Run {
    let mut probe = start;
    let color = raster.read_pixel(&mut probe);
    let mut next = start;
    let mut len = 0;
    while len < cap && !next.is_end() {
        let mut ahead = next;
        if raster.read_pixel(&mut ahead) != color {
            break;
        }
        next = ahead;
        len += 1;
    }
    Run { len, color, next }
}

/// Iterator over the chunks that encode a raster.
pub struct Chunks<'r, 'a> {
    raster: &'r Raster<'a>,
    cursor: Cursor,
}

pub fn chunks<'r, 'a>(raster: &'r Raster<'a>) -> Chunks<'r, 'a> {
    Chunks {
        raster,
        cursor: raster.cursor(),
    }
}

impl<'r, 'a> Chunks<'r, 'a> {
    fn uncomp(&mut self, start: Cursor) -> Chunk {
        let mut cursor = start;
        let mut bits = 0;
        for i in (0..UNCOMP_PIXELS).rev() {
            bits |= self.raster.read_pixel(&mut cursor) << i;
        }
        self.cursor = cursor;
        Chunk::Uncomp { bits }
    }
}

impl<'r, 'a> Iterator for Chunks<'r, 'a> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.cursor.is_end() {
            return None;
        }
        let start = self.cursor;
        let first = scan_run(self.raster, start, MAX_RUN);
        trace!("run1: {:?} at ({}, {})", first, start.x(), start.y());
        debug_assert!(first.len > 0);

        if first.len > LONG_MIN_RUN {
            self.cursor = first.next;
            return Some(Chunk::Long {
                color: first.color,
                run: first.len as u8,
            });
        }

        // only run2's first SHORT_MAX_RUN2 pixels can be stored, the rest of the
        // scan is lookahead that gets rewound
        let second = scan_run(self.raster, first.next, SHORT_MAX_RUN2 + MAX_REWIND);
        trace!("run2: {:?}", second);
        if first.len + second.len < SHORT_MIN_PIXELS {
            trace!("cannot use short runs, store literal pixels");
            return Some(self.uncomp(start));
        }

        let mut next = second.next;
        if second.len > SHORT_MAX_RUN2 {
            next.rewind(second.len - SHORT_MAX_RUN2);
        }
        self.cursor = next;
        // run2 is only empty when run1 ends the image, pad it with one pixel
        let run2 = second.len.clamp(1, SHORT_MAX_RUN2);
        Some(Chunk::Short {
            color: first.color,
            run1: first.len as u8,
            run2: run2 as u8,
        })
    }
}

#[inline]
fn log_summary(raster: &Raster<'_>, written: usize) {
    debug!(
        "compressed {}x{} pixels into {} bytes",
        raster.width(),
        raster.height(),
        written
    );
}

/// Compress `raster` into `writer`, returns the number of bytes written.
pub fn compress_to<W: io::Write>(raster: &Raster<'_>, mut writer: W) -> io::Result<usize> {
    writer.write_all(&Header::for_raster(raster).to_bytes())?;
    let mut written = HEADER_LEN;
    for chunk in chunks(raster) {
        let byte = chunk.to_byte();
        trace!("encode {:?} -> 0x{:02X}", chunk, byte);
        writer.write_all(&[byte])?;
        written += 1;
    }
    writer.flush()?;
    log_summary(raster, written);
    Ok(written)
}

/// Compress `raster` into a new buffer.
pub fn compress(raster: &Raster<'_>) -> Vec<u8> {
    let mut out = Header::for_raster(raster).to_bytes().to_vec();
    out.extend(chunks(raster).map(Chunk::to_byte));
    log_summary(raster, out.len());
    out
}
