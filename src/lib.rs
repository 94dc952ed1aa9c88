//! # ISBIC Encoding Scheme
//!
//! A compressed stream is a 6 byte header followed by one-byte chunks.
//!
//! ```text
//! offset 0: 0xFE
//! offset 1: 0xEC | color of pixel (0, 0)
//! offset 2: width  (u16, little endian)
//! offset 4: height (u16, little endian)
//! offset 6: chunks
//! ```
//!
//! Every chunk describes its own kind with the two most significant bits.
//!
//! ```text
//!         MSB    LSB
//!          │      │
//!          ▼      ▼
//!         0CLL LLLL
//!         ▲▲
//!   LONG ─┘└─ color
//! ```
//!
//! Treat the low 6 bits as unsigned integer N, the run is N + 8 pixels (8..=71).
//!
//! ```text
//!         10PP PPPP
//!         ▲▲
//! UNCOMP ─┘│
//!          0
//! ```
//!
//! Six literal pixels, the first one in bit 5.
//!
//! ```text
//!         11CR RRrr
//!         ▲▲▲
//!  SHORT ─┘││
//!          1└─ color
//! ```
//!
//! `RRR + 1` pixels (1..=8) of color C followed by `rr + 1` pixels (1..=4) of the
//! opposite color.
//!
//! A chunk never describes zero pixels. The last chunk of a stream may describe
//! pixels past the end of the image; the decoder stops after `width * height`
//! pixels so they are never observed.
//!
//! There is no integrity check past the header: a corrupted chunk byte decodes
//! silently into some valid, wrong, pixel sequence.

#[macro_use]
extern crate log;

mod chunk;
mod cursor;
mod decode;
mod encode;
mod error;
mod header;
mod raster;

pub use chunk::Chunk;
pub use cursor::Cursor;
pub use decode::{decompress, Decoder};
pub use encode::{chunks, compress, compress_to, scan_run, Chunks, Run};
pub use error::Error;
pub use header::{Header, HEADER_LEN};
pub use raster::{Bitmap, Raster};

/// first header byte
pub const MAGIC_0: u8 = 0xFE;
/// second header byte, the low bit carries the first pixel's color
pub const MAGIC_1: u8 = 0xEC;

/// longest run a single chunk can hold
pub const MAX_RUN: usize = 71;
/// shortest run a LONG chunk can hold
const LONG_MIN_RUN: usize = 8;
/// pixels in an UNCOMP chunk
const UNCOMP_PIXELS: usize = 6;
const SHORT_MAX_RUN1: usize = 8;
const SHORT_MAX_RUN2: usize = 4;
/// how far the encoder may back up after scanning a SHORT chunk's second run
const MAX_REWIND: usize = 3;
/// combined SHORT runs below this are cheaper as UNCOMP
const SHORT_MIN_PIXELS: usize = 7;

const CHUNK_MASK: u8 = 0xC0;
const CHUNK_LONG_BLACK: u8 = 0x00;
const CHUNK_LONG_WHITE: u8 = 0x40;
const CHUNK_UNCOMP: u8 = 0x80;
const CHUNK_SHORT: u8 = 0xC0;

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Setup function that is only run once, even if called multiple times.
    pub fn setup() {
        INIT.call_once(|| {
            pretty_env_logger::init();
        });
    }

    pub fn xorshift64(seed: &mut u64) -> u64 {
        let mut x = *seed;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        *seed = x;
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{setup, xorshift64};
    use crate::{chunks, compress, decompress, Bitmap, Chunk, Decoder, Raster};

    /// Scanned-text-like image: long background runs broken by short strokes.
    fn sparse_bitmap(width: u16, height: u16, pitch: usize, seed: u64) -> Bitmap {
        let mut seed = seed;
        let mut bitmap = Bitmap::with_pitch(width, height, pitch).unwrap();
        for y in 0..height as usize {
            let mut x = 0;
            while x < width as usize {
                let r = xorshift64(&mut seed);
                let gap = (r % 40) as usize;
                let stroke = ((r >> 8) % 6) as usize + 1;
                x += gap;
                for _ in 0..stroke {
                    if x < width as usize {
                        bitmap.set(x, y, 1);
                    }
                    x += 1;
                }
            }
        }
        bitmap
    }

    fn noisy_bitmap(width: u16, height: u16, pitch: usize, seed: u64) -> Bitmap {
        let mut seed = seed;
        let mut bitmap = Bitmap::with_pitch(width, height, pitch).unwrap();
        for y in 0..height as usize {
            for x in 0..width as usize {
                bitmap.set(x, y, (xorshift64(&mut seed) & 1) as u8);
            }
        }
        bitmap
    }

    fn assert_round_trip(bitmap: &Bitmap) {
        let raster = bitmap.as_raster();
        let stream = compress(&raster);
        let decoded = decompress(&stream).unwrap();
        assert_eq!(decoded.width(), bitmap.width());
        assert_eq!(decoded.height(), bitmap.height());
        for y in 0..bitmap.height() as usize {
            for x in 0..bitmap.width() as usize {
                assert_eq!(
                    decoded.get(x, y),
                    bitmap.get(x, y),
                    "pixel ({x}, {y}) of {}x{}",
                    bitmap.width(),
                    bitmap.height()
                );
            }
        }
    }

    fn assert_chunk_invariants(raster: &Raster<'_>) {
        let total = raster.width() as usize * raster.height() as usize;
        let chunks: Vec<Chunk> = chunks(raster).collect();
        let mut covered = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            match *chunk {
                Chunk::Long { run, .. } => assert!((8..=71).contains(&run)),
                Chunk::Short { run1, run2, .. } => {
                    assert!((1..=8).contains(&run1));
                    assert!((1..=4).contains(&run2));
                }
                Chunk::Uncomp { bits } => assert!(bits < 0x40),
            }
            if i + 1 < chunks.len() {
                covered += chunk.pixel_count();
                assert!(covered < total, "chunk {i} spills past the image end");
            }
        }
        let last = chunks.last().unwrap().pixel_count();
        assert!(covered + last >= total);
        assert!(covered < total);
    }

    #[test]
    fn test_round_trip_sparse() {
        setup();
        for (i, &(width, height)) in [(1, 1), (7, 3), (16, 1), (100, 37), (333, 12), (64, 64)]
            .iter()
            .enumerate()
        {
            let min_pitch = (width as usize + 7) / 8;
            for pitch in [min_pitch, min_pitch + 3] {
                let bitmap = sparse_bitmap(width, height, pitch, 0x9E37_79B9 + i as u64);
                assert_round_trip(&bitmap);
                assert_chunk_invariants(&bitmap.as_raster());
            }
        }
    }

    #[test]
    fn test_round_trip_noise() {
        setup();
        for (i, &(width, height)) in [(3, 2), (13, 13), (71, 5), (200, 9)].iter().enumerate() {
            let pitch = (width as usize + 7) / 8 + 1;
            let bitmap = noisy_bitmap(width, height, pitch, 0xDEAD_BEEF + i as u64);
            assert_round_trip(&bitmap);
            assert_chunk_invariants(&bitmap.as_raster());
        }
    }

    #[test]
    fn test_padding_bits_are_ignored() {
        setup();
        // width 5 leaves 3 padding bits per row, pitch 2 adds a padding byte
        let data = [0b1010_1111, 0xFF, 0b0110_0111, 0xAA];
        let raster = Raster::new(&data, 5, 2, 2).unwrap();
        let decoded = decompress(&compress(&raster)).unwrap();
        assert_eq!(decoded.as_bytes(), &[0b1010_1000, 0b0110_0000]);
    }

    #[test]
    fn test_header_fidelity() {
        setup();
        for first in [0u8, 1] {
            let mut bitmap = sparse_bitmap(300, 2, 40, 7);
            bitmap.set(0, 0, first);
            let stream = compress(&bitmap.as_raster());
            let decoder = Decoder::new(&stream).unwrap();
            assert_eq!(decoder.header().width, 300);
            assert_eq!(decoder.header().height, 2);
            assert_eq!(decoder.header().first_color, first);
        }
    }

    #[test]
    fn test_solid_image_is_all_long_chunks() {
        setup();
        for color in [0u8, 0xFF] {
            // 71 * 3 + 20 pixels
            let data = vec![color; 30];
            let raster = Raster::new(&data, 233, 1, 30).unwrap();
            let chunks: Vec<Chunk> = chunks(&raster).collect();
            let color = color & 1;
            assert_eq!(
                chunks,
                vec![
                    Chunk::Long { color, run: 71 },
                    Chunk::Long { color, run: 71 },
                    Chunk::Long { color, run: 71 },
                    Chunk::Long { color, run: 20 },
                ]
            );
            assert_eq!(compress(&raster).len(), 6 + 4);
        }
    }
}
