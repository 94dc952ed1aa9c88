/// A row-major position inside a `width * height` raster.
///
/// Once every pixel has been visited the cursor rests at `(0, height)`, the
/// end-of-image sentinel. Advancing it further is a no-op. A raster with no
/// pixels starts at the sentinel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl Cursor {
    pub fn new(width: u16, height: u16) -> Cursor {
        let empty = width == 0 || height == 0;
        Cursor {
            x: 0,
            y: if empty { height as usize } else { 0 },
            width: width as usize,
            height: height as usize,
        }
    }

    #[inline(always)]
    pub fn x(&self) -> usize {
        self.x
    }

    #[inline(always)]
    pub fn y(&self) -> usize {
        self.y
    }

    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.y >= self.height
    }

    /// Number of pixels before the cursor.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.y * self.width + self.x
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        if self.is_end() {
            return;
        }
        self.x += 1;
        if self.x == self.width {
            self.x = 0;
            self.y += 1;
        }
    }

    /// Step back `n` pixels, wrapping into previous rows.
    ///
    /// Only short lookahead is ever undone, at most `MAX_REWIND` pixels.
    #[inline(always)]
    pub fn rewind(&mut self, n: usize) {
        debug_assert!(n <= crate::MAX_REWIND);
        debug_assert!(n <= self.index());
        let index = self.index() - n;
        self.x = index % self.width;
        self.y = index / self.width;
    }
}
