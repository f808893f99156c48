//! Български държавни символи - an educational platformer about Bulgarian state symbols
//!
//! Core modules:
//! - `sim`: Frame-stepped game engine (modes, player physics, exhibits, quizzes, victory)
//! - `renderer`: Draw-command scene and WebGPU sprite pipeline
//! - `assets`: Asset paths, decoding and startup errors
//! - `input`: Keyboard/mouse to tick input mapping
//! - `settings`: Persisted audio preferences

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Window caption and page title
pub const GAME_TITLE: &str = "Български държавни символи";

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (all game logic counts 60 Hz frames)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical screen; every position in the game is laid out in these pixels
    pub const SCREEN_WIDTH: i32 = 1920;
    pub const SCREEN_HEIGHT: i32 = 1080;

    /// Ground band shared by the map and every room
    pub const GROUND_HEIGHT: i32 = 160;
    pub const GROUND_TOP: i32 = SCREEN_HEIGHT - GROUND_HEIGHT;

    /// Player sprite size (the collision mask is built at this size)
    pub const PLAYER_WIDTH: i32 = 40;
    pub const PLAYER_HEIGHT: i32 = 62;
    /// Map start, centre of the sprite's bottom edge
    pub const PLAYER_START_X: i32 = 50;
    /// Left edge of the player right after entering a room
    pub const ROOM_SPAWN_X: i32 = 20;

    /// Player physics, in pixels per frame
    pub const GRAVITY: f32 = 1.0;
    pub const PLAYER_SPEED: i32 = 5;
    pub const JUMP_SPEED: f32 = 20.0;
    /// Vertical speed after bumping a platform from below
    pub const CEILING_BOUNCE: f32 = 1.0;

    /// Correct answers needed (with none left unanswered) to open the victory door
    pub const VICTORY_THRESHOLD: usize = 7;

    /// Screen fade length, per direction
    pub const FADE_FRAMES: u32 = 60;

    /// Credits panel carousel
    pub const CREDIT_PANEL_FRAMES: u32 = 420;
    pub const CREDIT_SLIDE_SPEED: i32 = 20;

    /// Music fade-out durations
    pub const ROOM_MUSIC_FADE_MS: u32 = 2700;
    pub const VICTORY_MUSIC_FADE_MS: u32 = 3000;
    pub const EXIT_MUSIC_FADE_MS: u32 = 6000;
    /// Gap between the old track stopping and the new one starting
    pub const MUSIC_SILENCE_FRAMES: u32 = 30;
    pub const MUSIC_FADE_IN_FRAMES: u32 = 90;

    /// Raised-button look; a pressed button sits flush
    pub const BUTTON_ELEVATION: i32 = 4;
}

/// Number of 60 Hz frames covering `ms` milliseconds (rounded up)
#[inline]
pub fn ms_to_frames(ms: u32) -> u32 {
    (ms * 60).div_ceil(1000)
}
