//! Frame-counted screen fades between modes
//!
//! A fade darkens the screen, switches mode (with its side effects) at full
//! black and, for gameplay screens, fades back in.

use super::room::RoomId;
use super::state::Mode;
use crate::consts::FADE_FRAMES;

/// Work done at the moment the screen is black
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchEffect {
    None,
    /// Put the player at the room spawn
    EnterRoom(RoomId),
    /// Put the player in front of the room's house
    ReturnToMap(RoomId),
    /// Fresh player, rooms and victory flag
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Out,
    In,
}

/// What happened during one `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FadeStep {
    /// Switch to the target mode now
    pub switch: bool,
    /// The transition is over
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub target: Mode,
    pub effect: SwitchEffect,
    phase: FadePhase,
    frame: u32,
    fade_in: bool,
}

impl Transition {
    /// Fade to black, then switch. Map and rooms fade back in afterwards.
    pub fn fade_out(target: Mode, effect: SwitchEffect) -> Self {
        Self {
            target,
            effect,
            phase: FadePhase::Out,
            frame: 0,
            fade_in: matches!(target, Mode::Map | Mode::Level(_)),
        }
    }

    /// Mode already switched; only reveal it
    pub fn fade_in(target: Mode) -> Self {
        Self {
            target,
            effect: SwitchEffect::None,
            phase: FadePhase::In,
            frame: 0,
            fade_in: true,
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn advance(&mut self) -> FadeStep {
        self.frame += 1;
        if self.frame < FADE_FRAMES {
            return FadeStep::default();
        }
        match self.phase {
            FadePhase::Out if self.fade_in => {
                self.phase = FadePhase::In;
                self.frame = 0;
                FadeStep {
                    switch: true,
                    finished: false,
                }
            }
            FadePhase::Out => FadeStep {
                switch: true,
                finished: true,
            },
            FadePhase::In => FadeStep {
                switch: false,
                finished: true,
            },
        }
    }

    /// Opacity of the black overlay (0 clear, 1 black)
    pub fn overlay_alpha(&self) -> f32 {
        let t = (self.frame as f32 / FADE_FRAMES as f32).clamp(0.0, 1.0);
        match self.phase {
            FadePhase::Out => t,
            FadePhase::In => 1.0 - t,
        }
    }
}
