use crate::{Bitmap, Chunk, Cursor, Error, Header, HEADER_LEN, UNCOMP_PIXELS};

/// Pixel-at-a-time decoder over a compressed stream.
///
/// Created by [`Decoder::new`], which validates the header and loads the first
/// chunk. Each [`decode_pixel`](Decoder::decode_pixel) call yields the next
/// pixel in row-major order; once `width * height` pixels have been produced
/// the decoder is exhausted and keeps returning 0.
pub struct Decoder<'a> {
    header: Header,
    stream: &'a [u8],
    pos: usize,
    chunk: Chunk,
    // pixels left in the first and second run of the current chunk
    len: u8,
    len2: u8,
    color: u8,
    cursor: Cursor,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Result<Decoder<'a>, Error> {
        let header = Header::parse(data)?;
        debug!(
            "decoding {}x{} image, header {}",
            header.width,
            header.height,
            hex::encode(&data[..HEADER_LEN])
        );
        let mut decoder = Decoder {
            header,
            stream: &data[HEADER_LEN..],
            pos: 0,
            chunk: Chunk::Uncomp { bits: 0 },
            len: 0,
            len2: 0,
            color: header.first_color,
            cursor: Cursor::new(header.width, header.height),
        };
        decoder.load_chunk();
        Ok(decoder)
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn width(&self) -> u16 {
        self.header.width
    }

    pub fn height(&self) -> u16 {
        self.header.height
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_end()
    }

    /// Pixels left to decode.
    pub fn remaining(&self) -> usize {
        self.width() as usize * self.height() as usize - self.cursor.index()
    }

    /// Position of the next pixel to decode.
    pub fn position(&self) -> (usize, usize) {
        (self.cursor.x(), self.cursor.y())
    }

    fn load_chunk(&mut self) {
        let byte = match self.stream.get(self.pos) {
            Some(&byte) => byte,
            None => {
                debug!("stream ended after {} chunks, reading 0x00", self.pos);
                0
            }
        };
        self.pos += 1;
        self.chunk = Chunk::from_byte(byte);
        trace!("load chunk 0x{:02X}: {:?}", byte, self.chunk);
        match self.chunk {
            Chunk::Uncomp { .. } => {
                self.len = UNCOMP_PIXELS as u8;
                self.len2 = 0;
            }
            Chunk::Short { color, run1, run2 } => {
                self.color = color;
                self.len = run1;
                self.len2 = run2;
            }
            Chunk::Long { color, run } => {
                self.color = color;
                self.len = run;
                self.len2 = 0;
            }
        }
    }

    /// Decode the next pixel, 0 or 1.
    #[inline(always)]
    pub fn decode_pixel(&mut self) -> u8 {
        if self.cursor.is_end() {
            return 0;
        }
        if self.len == 0 && self.len2 == 0 {
            self.load_chunk();
        }
        let pixel = match self.chunk {
            Chunk::Uncomp { bits } => {
                self.len -= 1;
                (bits >> self.len) & 1
            }
            Chunk::Short { .. } => {
                if self.len > 0 {
                    self.len -= 1;
                    self.color
                } else {
                    self.len2 -= 1;
                    1 - self.color
                }
            }
            Chunk::Long { .. } => {
                self.len -= 1;
                self.color
            }
        };
        self.cursor.advance();
        pixel
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        (!self.is_exhausted()).then(|| self.decode_pixel())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Decoder<'a> {}

/// Decode a whole stream into a bitmap with the tightest pitch.
pub fn decompress(data: &[u8]) -> Result<Bitmap, Error> {
    let mut decoder = Decoder::new(data)?;
    let mut bitmap = Bitmap::new(decoder.width(), decoder.height())?;
    for y in 0..decoder.height() as usize {
        for x in 0..decoder.width() as usize {
            if decoder.decode_pixel() == 1 {
                bitmap.set(x, y, 1);
            }
        }
    }
    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::{decompress, Decoder};
    use crate::test_util::setup;
    use crate::{Error, Header};

    /// (compressed stream, expected pixels)
    const TEST_VECTOR: [(&str, &str); 8] = [
        ("feec1000010008", "0000000000000000"),
        ("feed1000010048", "1111111111111111"),
        ("feec080001009590", "01010101"),
        ("feec08000100cba0", "00011111"),
        ("feed08000100fc", "11111111"),
        ("feec05000200d3a0", "0000011111"),
        ("feec0400040007a0", "0000000000000001"),
        // every chunk kind back to back
        ("feec1400010000e1a9c1", "00000000100101001011"),
    ];

    #[test]
    fn test_decode_vectors() {
        setup();
        for (input, expected) in TEST_VECTOR.into_iter() {
            let input = hex::decode(input).unwrap();
            let decoder = Decoder::new(&input).unwrap();
            let pixels: String = decoder.map(|p| char::from(b'0' + p)).collect();
            assert_eq!(pixels, expected);
        }
    }

    #[test]
    fn test_exhausted_decoder_returns_zero() {
        setup();
        let input = hex::decode("feed0300010048").unwrap();
        let mut decoder = Decoder::new(&input).unwrap();
        assert_eq!(decoder.len(), 3);
        for _ in 0..3 {
            assert_eq!(decoder.decode_pixel(), 1);
        }
        assert!(decoder.is_exhausted());
        assert_eq!(decoder.position(), (0, 1));
        for _ in 0..4 {
            assert_eq!(decoder.decode_pixel(), 0);
        }
        assert_eq!(decoder.position(), (0, 1));
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn test_rejects_bad_header() {
        setup();
        for input in ["fdec1000010008", "feee1000010008", "fe", "00000000000000"] {
            let input = hex::decode(input).unwrap();
            assert!(matches!(Decoder::new(&input), Err(Error::InvalidFormat)));
            assert_eq!(decompress(&input), Err(Error::InvalidFormat));
        }
    }

    #[test]
    fn test_truncated_stream_decodes_black() {
        setup();
        // 12 pixels, one UNCOMP chunk for the first 6 and nothing after it
        let input = hex::decode("feed0c000100bf").unwrap();
        let pixels: Vec<u8> = Decoder::new(&input).unwrap().collect();
        assert_eq!(pixels, [1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decompress_packs_rows() {
        setup();
        let bitmap = decompress(&hex::decode("feec05000200d3a0").unwrap()).unwrap();
        assert_eq!((bitmap.width(), bitmap.height(), bitmap.pitch()), (5, 2, 1));
        assert_eq!(bitmap.as_bytes(), &[0x00, 0xF8]);
    }

    #[test]
    fn test_empty_header_is_exhausted() {
        setup();
        let input = Header {
            width: 0,
            height: 7,
            first_color: 0,
        }
        .to_bytes();
        let mut decoder = Decoder::new(&input).unwrap();
        assert!(decoder.is_exhausted());
        assert_eq!(decoder.decode_pixel(), 0);
    }
}
