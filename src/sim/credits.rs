//! Credits screen carousel
//!
//! Three panels take turns. Every `CREDIT_PANEL_FRAMES` the visible panel
//! slides off to the right and the next one slides in from the right edge.

use crate::consts::{CREDIT_PANEL_FRAMES, CREDIT_SLIDE_SPEED, SCREEN_WIDTH};

pub const CREDIT_PANELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slide {
    /// Current panel leaving, offset growing toward the screen width
    Out(i32),
    /// Next panel arriving, offset shrinking toward zero
    In(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreditsCarousel {
    panel: usize,
    timer: u32,
    slide: Option<Slide>,
}

impl CreditsCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self) {
        self.slide = match self.slide {
            None => {
                self.timer += 1;
                if self.timer < CREDIT_PANEL_FRAMES {
                    return;
                }
                self.timer = 0;
                Some(Slide::Out(0))
            }
            Some(Slide::Out(offset)) => {
                let offset = offset + CREDIT_SLIDE_SPEED;
                if offset >= SCREEN_WIDTH {
                    self.panel = (self.panel + 1) % CREDIT_PANELS;
                    Some(Slide::In(SCREEN_WIDTH))
                } else {
                    Some(Slide::Out(offset))
                }
            }
            Some(Slide::In(offset)) => {
                let offset = offset - CREDIT_SLIDE_SPEED;
                (offset > 0).then_some(Slide::In(offset))
            }
        };
    }

    /// Visible panel and its horizontal offset from the screen's left edge
    pub fn panel_offset(&self) -> (usize, i32) {
        let offset = match self.slide {
            None => 0,
            Some(Slide::Out(offset) | Slide::In(offset)) => offset,
        };
        (self.panel, offset)
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE_FRAMES: u32 = (SCREEN_WIDTH / CREDIT_SLIDE_SPEED) as u32;

    fn run(c: &mut CreditsCarousel, frames: u32) {
        for _ in 0..frames {
            c.update();
        }
    }

    #[test]
    fn test_panel_holds_then_slides() {
        let mut c = CreditsCarousel::new();
        run(&mut c, CREDIT_PANEL_FRAMES - 1);
        assert_eq!(c.panel_offset(), (0, 0));
        assert!(!c.is_sliding());

        run(&mut c, 1);
        assert!(c.is_sliding());
        run(&mut c, 10);
        assert_eq!(c.panel_offset(), (0, 10 * CREDIT_SLIDE_SPEED));
    }

    #[test]
    fn test_next_panel_slides_in() {
        let mut c = CreditsCarousel::new();
        run(&mut c, CREDIT_PANEL_FRAMES + SLIDE_FRAMES);
        assert_eq!(c.panel_offset(), (1, SCREEN_WIDTH));
        run(&mut c, SLIDE_FRAMES);
        assert_eq!(c.panel_offset(), (1, 0));
        assert!(!c.is_sliding());
    }

    #[test]
    fn test_panels_wrap_around() {
        let mut c = CreditsCarousel::new();
        let cycle = CREDIT_PANEL_FRAMES + 2 * SLIDE_FRAMES;
        run(&mut c, cycle * CREDIT_PANELS as u32);
        assert_eq!(c.panel_offset(), (0, 0));
        c.update();
        c.reset();
        assert_eq!(c, CreditsCarousel::new());
    }
}
