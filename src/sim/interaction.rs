//! Opening and closing exhibit panels with the activation key
//!
//! One `InteractionState` per room. At most one exhibit is open at a time,
//! and a held key never closes a panel it just opened: the key has to be
//! released before the next press counts.

use super::geometry::Rect;

/// What `interact` decided for one exhibit this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing to show for this exhibit
    Idle,
    /// The exhibit was opened by this frame's key press
    Opened,
    /// The exhibit is open and its panel is shown
    Displayed,
}

impl Interaction {
    /// Whether the exhibit occupies the player this frame
    pub fn is_active(self) -> bool {
        self != Interaction::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    is_open: bool,
    /// Re-armed whenever the key is up; a press only opens while armed
    is_closed: bool,
    active: Option<usize>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            is_open: false,
            is_closed: true,
            active: None,
        }
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Exhibit that was opened last (stays set after it closes)
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Evaluate one exhibit. Call once per exhibit per frame, in room order,
    /// stopping at the first one that is active.
    pub fn interact(&mut self, key_down: bool, player: &Rect, trigger: &Rect, id: usize) -> Interaction {
        if key_down && player.intersects(trigger) && self.is_closed {
            self.active = Some(id);
            self.is_open = true;
            Interaction::Opened
        } else if self.is_open && self.active == Some(id) {
            self.is_closed = false;
            if key_down {
                self.is_open = false;
            }
            Interaction::Displayed
        } else {
            if !key_down {
                self.is_closed = true;
            }
            Interaction::Idle
        }
    }

    /// Close everything (leaving the room)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
