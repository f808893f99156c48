//! Player controller: input steering, gravity and platform snapping

use glam::Vec2;

use super::collision::{Platform, mask_contact};
use super::geometry::{Mask, Rect};
use crate::consts::*;

/// Overlap areas that come from the sprite's corner pixels clipping a platform
/// edge. Tuned for the 40x62 player sprite; re-measure if the sprite changes.
pub const CORNER_CLIP_AREAS: [u32; 3] = [12, 16, 25];
/// Horizontal push applied when a landing is a corner clip
pub const CORNER_CLIP_NUDGE: i32 = 15;

/// Which controls are live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveProfile {
    /// Walk left/right only
    Map,
    /// Walk and jump
    Room,
}

/// Held movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// x: direction (-1, 0, 1), y: vertical speed (positive is down)
    pub velocity: Vec2,
    pub on_floor: bool,
    pub mask: Mask,
}

impl Player {
    /// Player standing on the map ground at the start position
    pub fn new(mask: Mask) -> Self {
        Self {
            rect: Rect::from_midbottom(PLAYER_START_X, GROUND_TOP, PLAYER_WIDTH, PLAYER_HEIGHT),
            velocity: Vec2::ZERO,
            on_floor: false,
            mask,
        }
    }

    /// Teleport the player and drop any momentum
    pub fn place(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
        self.velocity = Vec2::ZERO;
        self.on_floor = false;
    }

    /// Pick the walking direction and start a jump if allowed.
    ///
    /// Opposite keys cancel out; a side is blocked when the step would leave the screen.
    pub fn steer(&mut self, input: &MoveInput, profile: MoveProfile) {
        let can_go_right = input.right && self.rect.right() + PLAYER_SPEED <= SCREEN_WIDTH;
        let can_go_left = input.left && self.rect.left() - PLAYER_SPEED >= 0;

        self.velocity.x = if input.left && input.right {
            0.0
        } else if can_go_right {
            1.0
        } else if can_go_left {
            -1.0
        } else {
            0.0
        };

        if profile == MoveProfile::Room && input.jump && self.on_floor {
            self.velocity.y = -JUMP_SPEED;
        }
    }

    fn walk(&mut self) {
        self.rect.x += self.velocity.x as i32 * PLAYER_SPEED;
    }

    pub fn apply_gravity(&mut self) {
        self.velocity.y += GRAVITY;
        self.rect.y += self.velocity.y.round() as i32;
    }

    /// Snap against every platform the player's mask overlaps.
    ///
    /// Falling onto a platform puts the player's bottom on its top and lands
    /// them; rising into one puts their top on its bottom and starts the fall.
    pub fn resolve_collisions(&mut self, platforms: &[Platform]) {
        for platform in platforms {
            let Some(contact) = mask_contact(&self.rect, &self.mask, platform) else {
                continue;
            };

            if self.velocity.y > 0.0 {
                self.rect.set_bottom(platform.rect.top());
                let hit_below_feet = contact.point.1 != self.rect.h - 1;
                if hit_below_feet && CORNER_CLIP_AREAS.contains(&contact.area) {
                    self.rect.x += CORNER_CLIP_NUDGE;
                }
                self.velocity.y = 0.0;
                self.on_floor = true;
            } else if self.velocity.y < 0.0 {
                self.rect.set_top(platform.rect.bottom());
                self.velocity.y = CEILING_BOUNCE;
            }
        }

        if self.on_floor && self.velocity.y != 0.0 {
            self.on_floor = false;
        }
    }

    /// One map frame: walk only
    pub fn map_update(&mut self, input: &MoveInput) {
        self.steer(input, MoveProfile::Map);
        self.walk();
    }

    /// One room frame: walk, jump, fall, collide
    pub fn room_update(&mut self, input: &MoveInput, platforms: &[Platform]) {
        self.steer(input, MoveProfile::Room);
        self.walk();
        self.apply_gravity();
        self.resolve_collisions(platforms);
    }
}
