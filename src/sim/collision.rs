//! Pixel-accurate contact between the player and solid platforms
//!
//! Rect overlap alone is too coarse for the player sprite (its silhouette
//! does not fill its rect), so contacts are decided on the masks.

use super::geometry::{Mask, Rect};

/// Default platform colour (dark wood)
pub const PLATFORM_COLOR: u32 = 0x4A360E;

/// A static solid region of a room or the map
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    pub mask: Mask,
    /// Fill colour as 0xRRGGBB
    pub color: u32,
}

impl Platform {
    /// Solid platform with its top-left corner at (`x`, `y`)
    pub fn new(w: i32, h: i32, x: i32, y: i32) -> Self {
        Self::colored(w, h, x, y, PLATFORM_COLOR)
    }

    pub fn colored(w: i32, h: i32, x: i32, y: i32, color: u32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            mask: Mask::filled(w, h),
            color,
        }
    }
}

/// Result of a mask contact test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// First overlapping pixel (row-major), in the body's local coordinates
    pub point: (i32, i32),
    /// Number of overlapping pixels
    pub area: u32,
}

/// Check whether `body` (at `body_rect`) touches `platform`
pub fn mask_contact(body_rect: &Rect, body_mask: &Mask, platform: &Platform) -> Option<Contact> {
    let offset = (
        platform.rect.x - body_rect.x,
        platform.rect.y - body_rect.y,
    );
    let point = body_mask.overlap(&platform.mask, offset)?;
    Some(Contact {
        point,
        area: body_mask.overlap_area(&platform.mask, offset),
    })
}
