//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`. Rendering and the
//! audio backend only read it (and drain its queues) between ticks.

use serde::{Deserialize, Serialize};

use super::credits::CreditsCarousel;
use super::exhibit::AnswerState;
use super::geometry::Mask;
use super::levels::{LevelDataError, LevelTexts, WorldMap, build_rooms};
use super::menus::Menus;
use super::music::{AudioSettings, Mixer, MusicCue, Track};
use super::player::Player;
use super::room::{Room, RoomId};
use super::transition::Transition;
use crate::consts::VICTORY_THRESHOLD;

/// The active top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    TitleScreen,
    CreditScreen,
    /// Pause menu
    GameMenu,
    Map,
    Level(RoomId),
    VictoryScreen,
    Exit,
}

impl Mode {
    /// Background music wanted while this mode is shown
    pub fn music(self) -> MusicCue {
        match self {
            Mode::TitleScreen | Mode::Map => MusicCue::Play(Track::TitleTheme),
            Mode::Level(room) => MusicCue::Play(room.music()),
            Mode::VictoryScreen => MusicCue::Play(Track::VictoryTheme),
            Mode::CreditScreen | Mode::GameMenu => MusicCue::Keep,
            Mode::Exit => MusicCue::Silence,
        }
    }

    /// Modes where the player character is on screen
    pub fn is_gameplay(self) -> bool {
        matches!(self, Mode::Map | Mode::Level(_))
    }
}

/// Things that happened during a tick, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ModeChanged { from: Mode, to: Mode },
    ExhibitOpened { room: RoomId, exhibit: usize },
    AnswerGraded { room: RoomId, exhibit: usize, result: AnswerState },
    VictoryUnlocked,
    SessionReset,
    MuteToggled(bool),
    Quit,
}

/// Loaded data the simulation is built from
#[derive(Debug, Clone)]
pub struct GameContent {
    /// Opaque pixels of the player sprite
    pub player_mask: Mask,
    pub texts: LevelTexts,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: Mode,
    /// Where the pause menu and the credits return to
    pub previous_mode: Mode,
    pub player: Player,
    pub map: WorldMap,
    /// Indexed by `RoomId::index`
    pub rooms: Vec<Room>,
    /// Set once, cleared only by a full reset
    pub victory: bool,
    pub victory_threshold: usize,
    /// Fade in progress; gameplay input is ignored while set
    pub transition: Option<Transition>,
    pub credits: CreditsCarousel,
    pub menus: Menus,
    pub mixer: Mixer,
    /// Simulation tick counter
    pub frame: u64,
    pub(super) events: Vec<GameEvent>,
    /// Untouched rooms, cloned on reset
    fresh_rooms: Vec<Room>,
    player_mask: Mask,
}

impl GameState {
    /// New session on the title screen
    pub fn new(content: GameContent, audio: AudioSettings) -> Result<Self, LevelDataError> {
        let rooms = build_rooms(&content.texts)?;
        let mut mixer = Mixer::new(audio);
        mixer.cue(Mode::TitleScreen.music(), 0);

        Ok(Self {
            mode: Mode::TitleScreen,
            previous_mode: Mode::TitleScreen,
            player: Player::new(content.player_mask.clone()),
            map: WorldMap::new(),
            fresh_rooms: rooms.clone(),
            rooms,
            victory: false,
            victory_threshold: VICTORY_THRESHOLD,
            transition: None,
            credits: CreditsCarousel::new(),
            menus: Menus::new(),
            mixer,
            frame: 0,
            events: Vec::new(),
            player_mask: content.player_mask,
        })
    }

    /// Back to square one: new player, unanswered quizzes, no victory.
    /// Audio preferences are kept.
    pub fn reset_session(&mut self) {
        self.player = Player::new(self.player_mask.clone());
        self.rooms = self.fresh_rooms.clone();
        self.victory = false;
        self.previous_mode = Mode::TitleScreen;
        self.credits.reset();
        self.menus = Menus::new();
        self.events.push(GameEvent::SessionReset);
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    pub fn room_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id.index()]
    }

    /// Room the player is in, if any
    pub fn current_room(&self) -> Option<&Room> {
        match self.mode {
            Mode::Level(id) => Some(self.room(id)),
            _ => None,
        }
    }

    pub fn is_exiting(&self) -> bool {
        self.mode == Mode::Exit
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
pub(crate) fn test_game() -> GameState {
    use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
    let content = GameContent {
        player_mask: Mask::filled(PLAYER_WIDTH, PLAYER_HEIGHT),
        texts: super::levels::sample_texts(),
    };
    match GameState::new(content, AudioSettings::default()) {
        Ok(state) => state,
        Err(e) => panic!("sample content should build: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_on_title() {
        let state = test_game();
        assert_eq!(state.mode, Mode::TitleScreen);
        assert!(!state.victory);
        assert_eq!(state.rooms.len(), 3);
        assert_eq!(state.mixer.current_track(), Some(Track::TitleTheme));
    }

    #[test]
    fn test_reset_restores_rooms() {
        let mut state = test_game();
        let fresh = state.rooms.clone();
        if let Some(quiz) = state.rooms[0].exhibits[5].quiz_mut() {
            quiz.choose(0);
        }
        state.victory = true;
        state.player.place(900, 100);

        state.reset_session();
        assert_eq!(state.rooms, fresh);
        assert!(!state.victory);
        assert_eq!(state.player.rect.bottom(), crate::consts::GROUND_TOP);
        assert_eq!(state.drain_events(), vec![GameEvent::SessionReset]);
    }

    #[test]
    fn test_music_per_mode() {
        assert_eq!(Mode::Map.music(), MusicCue::Play(Track::TitleTheme));
        assert_eq!(Mode::Level(RoomId::Tsar).music(), MusicCue::Play(Track::TsarTheme));
        assert_eq!(Mode::GameMenu.music(), MusicCue::Keep);
        assert_eq!(Mode::Exit.music(), MusicCue::Silence);
    }
}
