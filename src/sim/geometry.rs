//! Integer rectangles and pixel masks
//!
//! Positions are logical screen pixels with y pointing down. A `Mask` marks
//! the opaque pixels of a sprite; two masks overlap when any pair of set
//! pixels land on the same screen pixel.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (x/y is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect whose bottom edge is centred on (`cx`, `bottom`)
    pub const fn from_midbottom(cx: i32, bottom: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, bottom - h, w, h)
    }

    /// Rect centred on (`cx`, `cy`)
    pub const fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, cy - h / 2, w, h)
    }

    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub const fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub const fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Strict overlap: rects that only share an edge do not intersect,
    /// and an empty rect intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open containment (right and bottom edges are outside)
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Bitmap of opaque pixels, stored row-major in 64-bit words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: i32,
    height: i32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Empty mask
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Fully solid mask (platforms are plain filled rectangles)
    pub fn filled(width: i32, height: i32) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..mask.height {
            for x in 0..mask.width {
                mask.set(x, y);
            }
        }
        mask
    }

    /// Build a mask from RGBA8 pixels; a pixel is solid when alpha > `threshold`.
    /// Missing trailing pixels count as transparent.
    pub fn from_alpha(width: u32, height: u32, rgba: &[u8], threshold: u8) -> Self {
        let mut mask = Self::new(width as i32, height as i32);
        for y in 0..height {
            for x in 0..width {
                let alpha_index = ((y * width + x) * 4 + 3) as usize;
                if rgba.get(alpha_index).is_some_and(|&a| a > threshold) {
                    mask.set(x as i32, y as i32);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn word_index(&self, x: i32, y: i32) -> (usize, u64) {
        let word = y as usize * self.words_per_row + x as usize / 64;
        (word, 1u64 << (x as usize % 64))
    }

    /// Whether the pixel is solid (anything outside the mask is empty)
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        let (word, bit) = self.word_index(x, y);
        self.bits[word] & bit != 0
    }

    pub fn set(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.word_index(x, y);
        self.bits[word] |= bit;
    }

    /// Number of solid pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Region of `self` covered by `other` placed at `offset`, as half-open
    /// (x0, x1, y0, y1) in `self` coordinates
    fn shared_region(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32, i32, i32)> {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width).min(self.width);
        let y1 = (oy + other.height).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, x1, y0, y1))
    }

    /// First overlapping pixel in row-major order, in `self` coordinates.
    ///
    /// `offset` is the position of `other`'s top-left corner relative to
    /// `self`'s top-left corner.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (x0, x1, y0, y1) = self.shared_region(other, offset)?;
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.0, y - offset.1) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Count of overlapping pixels
    pub fn overlap_area(&self, other: &Mask, offset: (i32, i32)) -> u32 {
        let Some((x0, x1, y0, y1)) = self.shared_region(other, offset) else {
            return 0;
        };
        let mut area = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.0, y - offset.1) {
                    area += 1;
                }
            }
        }
        area
    }
}
