use crate::{Error, Raster, MAGIC_0, MAGIC_1};

pub const HEADER_LEN: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    /// color of pixel (0, 0)
    pub first_color: u8,
}

impl Header {
    /// The header a compressed `raster` starts with.
    pub fn for_raster(raster: &Raster<'_>) -> Header {
        Header {
            width: raster.width(),
            height: raster.height(),
            first_color: raster.pixel(0, 0),
        }
    }

    /// Parse the 6 header bytes at the start of `bytes`.
    ///
    /// The second magic byte is compared without its low bit, which holds
    /// the first pixel's color.
    pub fn parse(bytes: &[u8]) -> Result<Header, Error> {
        if bytes.len() < HEADER_LEN || bytes[0] != MAGIC_0 || (bytes[1] & 0xFE) != MAGIC_1 {
            return Err(Error::InvalidFormat);
        }
        Ok(Header {
            width: u16::from_le_bytes([bytes[2], bytes[3]]),
            height: u16::from_le_bytes([bytes[4], bytes[5]]),
            first_color: bytes[1] & 1,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        [MAGIC_0, MAGIC_1 | (self.first_color & 1), w0, w1, h0, h1]
    }
}
