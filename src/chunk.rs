use crate::{
    CHUNK_LONG_BLACK, CHUNK_LONG_WHITE, CHUNK_MASK, CHUNK_SHORT, CHUNK_UNCOMP, LONG_MIN_RUN,
    MAX_RUN, SHORT_MAX_RUN1, SHORT_MAX_RUN2, UNCOMP_PIXELS,
};
use std::fmt;

/// One byte of the compressed stream.
///
/// Colors and pixels are single bits (0 or 1), runs are pixel counts.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// `run` (8..=71) pixels of `color`
    Long { color: u8, run: u8 },
    /// `run1` (1..=8) pixels of `color`, then `run2` (1..=4) of the other color
    Short { color: u8, run1: u8, run2: u8 },
    /// six literal pixels, the first in bit 5
    Uncomp { bits: u8 },
}

impl Chunk {
    #[inline(always)]
    pub fn from_byte(byte: u8) -> Chunk {
        match byte & CHUNK_MASK {
            CHUNK_UNCOMP => Chunk::Uncomp { bits: byte & 0x3F },
            CHUNK_SHORT => Chunk::Short {
                color: (byte >> 5) & 1,
                run1: ((byte >> 2) & 7) + 1,
                run2: (byte & 3) + 1,
            },
            // CHUNK_LONG_BLACK | CHUNK_LONG_WHITE
            _ => Chunk::Long {
                color: (byte >> 6) & 1,
                run: (byte & 0x3F) + LONG_MIN_RUN as u8,
            },
        }
    }

    #[inline(always)]
    pub fn to_byte(self) -> u8 {
        match self {
            Chunk::Long { color, run } => {
                debug_assert!((LONG_MIN_RUN..=MAX_RUN).contains(&(run as usize)));
                let tag = if color & 1 == 1 {
                    CHUNK_LONG_WHITE
                } else {
                    CHUNK_LONG_BLACK
                };
                tag | (run - LONG_MIN_RUN as u8)
            }
            Chunk::Short { color, run1, run2 } => {
                debug_assert!((1..=SHORT_MAX_RUN1).contains(&(run1 as usize)));
                debug_assert!((1..=SHORT_MAX_RUN2).contains(&(run2 as usize)));
                CHUNK_SHORT | ((color & 1) << 5) | ((run1 - 1) << 2) | (run2 - 1)
            }
            Chunk::Uncomp { bits } => {
                debug_assert!(bits <= 0x3F);
                CHUNK_UNCOMP | bits
            }
        }
    }

    /// Pixels described by this chunk.
    pub fn pixel_count(self) -> usize {
        match self {
            Chunk::Long { run, .. } => run as usize,
            Chunk::Short { run1, run2, .. } => (run1 + run2) as usize,
            Chunk::Uncomp { .. } => UNCOMP_PIXELS,
        }
    }
}

impl From<u8> for Chunk {
    #[inline(always)]
    fn from(byte: u8) -> Self {
        Chunk::from_byte(byte)
    }
}

impl From<Chunk> for u8 {
    #[inline(always)]
    fn from(chunk: Chunk) -> Self {
        chunk.to_byte()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Long { color, run } => f
                .debug_struct("Long")
                .field("color", &color)
                .field("run", &run)
                .finish(),
            Chunk::Short { color, run1, run2 } => f
                .debug_struct("Short")
                .field("color", &color)
                .field("run1", &run1)
                .field("run2", &run2)
                .finish(),
            Chunk::Uncomp { bits } => f
                .debug_struct("Uncomp")
                .field("bits", &format!("{bits:06b}"))
                .finish(),
        }
    }
}
