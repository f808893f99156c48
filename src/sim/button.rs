//! Clickable buttons driven by the mouse state of each frame

use super::geometry::Rect;
use crate::consts::BUTTON_ELEVATION;

/// Mouse position in logical pixels plus the left button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub left_down: bool,
}

/// Visual family; also fixes the label size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Big green buttons of the title, pause, victory and credits screens
    Menu,
    /// Small beige buttons inside exhibit panels
    Panel,
}

impl ButtonStyle {
    pub fn font_px(self) -> i32 {
        match self {
            ButtonStyle::Menu => 40,
            ButtonStyle::Panel => 25,
        }
    }
}

/// Rough rendered width of `text` at `font_px`. Good enough for sizing
/// panels and buttons around labels; the page font is a bold serif.
pub fn text_width(text: &str, font_px: i32) -> i32 {
    text.chars().count() as i32 * font_px * 3 / 5
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    pub style: ButtonStyle,
    pressed: bool,
    hovered: bool,
}

impl Button {
    /// Button at (`x`, `y`); grows wider than `w` when the label needs it
    pub fn new(label: &str, x: i32, y: i32, w: i32, h: i32, style: ButtonStyle) -> Self {
        let w = w.max(text_width(label, style.font_px()) + 10);
        Self {
            rect: Rect::new(x, y, w, h),
            label: label.to_string(),
            style,
            pressed: false,
            hovered: false,
        }
    }

    /// Feed this frame's mouse state; true on the frame the click completes.
    ///
    /// A click is press then release while hovering. Moving off the button
    /// cancels a pending press.
    pub fn update(&mut self, mouse: &MouseState) -> bool {
        self.hovered = self.rect.contains_point(mouse.x, mouse.y);
        if !self.hovered {
            self.pressed = false;
            return false;
        }
        if mouse.left_down {
            self.pressed = true;
            false
        } else if self.pressed {
            self.pressed = false;
            true
        } else {
            false
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Drop hover/press state (used when a screen is left)
    pub fn release(&mut self) {
        self.pressed = false;
        self.hovered = false;
    }

    /// Current raise of the face above the base
    pub fn elevation(&self) -> i32 {
        if self.pressed { 0 } else { BUTTON_ELEVATION }
    }

    /// The clickable face as drawn this frame
    pub fn face(&self) -> Rect {
        self.rect.translated(0, -self.elevation())
    }
}
