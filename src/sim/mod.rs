//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only (one tick per 60 Hz frame)
//! - Stable iteration order (rooms and exhibits in table order)
//! - No rendering, audio or platform dependencies; sound is requested
//!   through queued `AudioCommand`s

pub mod button;
pub mod collision;
pub mod credits;
pub mod exhibit;
pub mod geometry;
pub mod interaction;
pub mod levels;
pub mod menus;
pub mod music;
pub mod player;
pub mod room;
pub mod state;
pub mod tick;
pub mod transition;
pub mod victory;

pub use button::{Button, ButtonStyle, MouseState};
pub use collision::{Contact, Platform, mask_contact};
pub use exhibit::{AnswerState, Exhibit, ExhibitKind, Picture, Quiz};
pub use geometry::{Mask, Rect};
pub use interaction::{Interaction, InteractionState};
pub use levels::{LevelDataError, LevelTexts, WorldMap, build_rooms};
pub use music::{AudioCommand, AudioSettings, Mixer, MusicCue, Track};
pub use player::{MoveInput, Player};
pub use room::{Room, RoomExit, RoomId};
pub use state::{GameContent, GameEvent, GameState, Mode};
pub use tick::{TickInput, tick};
pub use transition::{SwitchEffect, Transition};
