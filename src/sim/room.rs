//! A themed room: platforms, exhibits and the doors out
//!
//! The three rooms share this one type; what differs between them is data
//! built in `levels`.

use serde::{Deserialize, Serialize};

use super::collision::Platform;
use super::exhibit::{AnswerState, Exhibit};
use super::geometry::Rect;
use super::interaction::{Interaction, InteractionState};
use super::music::{Mixer, Track};
use super::player::Player;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::consts::*;

pub const DOOR_WIDTH: i32 = 67;
pub const DOOR_HEIGHT: i32 = 97;
/// Centre of the exit door, near the left wall
pub const DOOR_X: i32 = 100;
/// Centre of the victory door, near the right wall of the last room
pub const VICTORY_DOOR_X: i32 = SCREEN_WIDTH - 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomId {
    Uprising,
    Tsar,
    Communist,
}

impl RoomId {
    pub const ALL: [RoomId; 3] = [RoomId::Uprising, RoomId::Tsar, RoomId::Communist];

    pub fn index(self) -> usize {
        match self {
            RoomId::Uprising => 0,
            RoomId::Tsar => 1,
            RoomId::Communist => 2,
        }
    }

    /// Level number shown to the player (1-3)
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            RoomId::Uprising => "Възраждане",
            RoomId::Tsar => "Царство България",
            RoomId::Communist => "Народна република",
        }
    }

    pub fn music(self) -> Track {
        match self {
            RoomId::Uprising => Track::UprisingTheme,
            RoomId::Tsar => Track::TsarTheme,
            RoomId::Communist => Track::CommunistTheme,
        }
    }

    /// Colour of the floor band as 0xRRGGBB
    pub fn floor_color(self) -> u32 {
        match self {
            RoomId::Uprising => 0x043619,
            RoomId::Tsar => 0x947E01,
            RoomId::Communist => 0x8B0000,
        }
    }
}

/// Why the player left the room this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomExit {
    ToMap,
    ToVictory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub platforms: Vec<Platform>,
    pub exhibits: Vec<Exhibit>,
    pub door: Rect,
    /// Present only in the last room
    pub victory_door: Option<Rect>,
    interaction: InteractionState,
    /// Exhibit occupying the player (opened or shown) this frame
    engaged: Option<usize>,
    /// Exhibit whose panel is on screen
    displayed: Option<usize>,
}

impl Room {
    pub fn new(id: RoomId, platforms: Vec<Platform>, exhibits: Vec<Exhibit>, victory_door: bool) -> Self {
        Self {
            id,
            platforms,
            exhibits,
            door: Rect::from_midbottom(DOOR_X, GROUND_TOP, DOOR_WIDTH, DOOR_HEIGHT),
            victory_door: victory_door
                .then(|| Rect::from_midbottom(VICTORY_DOOR_X, GROUND_TOP, DOOR_WIDTH, DOOR_HEIGHT)),
            interaction: InteractionState::new(),
            engaged: None,
            displayed: None,
        }
    }

    /// Exhibit whose panel should be drawn
    pub fn displayed(&self) -> Option<usize> {
        self.displayed
    }

    /// Player is held still while an exhibit has their attention
    pub fn is_frozen(&self) -> bool {
        self.engaged.is_some()
    }

    /// Quiz results of this room in exhibit order
    pub fn answers(&self) -> impl Iterator<Item = AnswerState> + '_ {
        self.exhibits.iter().filter_map(|e| e.quiz().map(|q| q.result()))
    }

    /// One frame inside the room
    pub fn update(
        &mut self,
        player: &mut Player,
        input: &TickInput,
        victory: bool,
        mixer: &mut Mixer,
        events: &mut Vec<GameEvent>,
    ) -> Option<RoomExit> {
        if !self.is_frozen() {
            player.room_update(&input.movement, &self.platforms);

            if input.activate_pressed {
                if player.rect.intersects(&self.door) {
                    return Some(RoomExit::ToMap);
                }
                if victory
                    && self
                        .victory_door
                        .is_some_and(|door| player.rect.intersects(&door))
                {
                    return Some(RoomExit::ToVictory);
                }
            }
        }

        let engaged = self.exhibits.iter().enumerate().find_map(|(id, exhibit)| {
            let outcome = self
                .interaction
                .interact(input.activate, &player.rect, &exhibit.trigger, id);
            outcome.is_active().then_some((id, outcome))
        });

        if let Some((id, _)) = engaged
            && self.engaged != Some(id)
        {
            events.push(GameEvent::ExhibitOpened {
                room: self.id,
                exhibit: id,
            });
        }
        self.engaged = engaged.map(|(id, _)| id);

        // The closing press still shows and polls the panel this frame
        let displayed = match engaged {
            Some((id, Interaction::Displayed)) => Some(id),
            _ => None,
        };
        if let Some(previous) = self.displayed
            && displayed != Some(previous)
        {
            self.exhibits[previous].close(mixer);
        }
        self.displayed = displayed;

        if let Some(id) = displayed
            && let Some(result) = self.exhibits[id].update_panel(&input.mouse, mixer)
        {
            events.push(GameEvent::AnswerGraded {
                room: self.id,
                exhibit: id,
                result,
            });
        }

        None
    }

    /// Player walked out: close any panel and silence its tune
    pub fn leave(&mut self, mixer: &mut Mixer) {
        if let Some(id) = self.displayed.take() {
            self.exhibits[id].close(mixer);
        }
        self.engaged = None;
        self.interaction.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::button::MouseState;
    use crate::sim::exhibit::Picture;
    use crate::sim::geometry::Mask;
    use crate::sim::music::{AudioCommand, AudioSettings};

    fn room(victory_door: bool) -> Room {
        let ground = Platform::colored(SCREEN_WIDTH, GROUND_HEIGHT, 0, GROUND_TOP, 0x043619);
        let exhibits = vec![
            Exhibit::question(
                "question_icon",
                Rect::new(600, 833, 48, 87),
                "Въпрос",
                Picture::new("levski_flag", 279, 169),
                &["А) Христо Ботев", "Б) Георги С. Раковски", "В) Васил Левски"],
                3,
            ),
            Exhibit::with_button(
                "anthem_icon",
                Rect::new(1000, 860, 64, 60),
                "Химн",
                "Мила родино",
                Track::MilaRodino,
            ),
        ];
        Room::new(RoomId::Communist, vec![ground], exhibits, victory_door)
    }

    fn player_at(x: i32) -> Player {
        let mut p = Player::new(Mask::filled(PLAYER_WIDTH, PLAYER_HEIGHT));
        p.place(x, GROUND_TOP - PLAYER_HEIGHT);
        p
    }

    fn press() -> TickInput {
        TickInput {
            activate: true,
            activate_pressed: true,
            ..Default::default()
        }
    }

    fn hold() -> TickInput {
        TickInput {
            activate: true,
            ..Default::default()
        }
    }

    fn step(room: &mut Room, player: &mut Player, input: &TickInput, victory: bool) -> (Option<RoomExit>, Vec<GameEvent>) {
        let mut mixer = Mixer::new(AudioSettings::default());
        let mut events = Vec::new();
        let exit = room.update(player, input, victory, &mut mixer, &mut events);
        (exit, events)
    }

    #[test]
    fn test_door_leads_to_map() {
        let mut r = room(false);
        let mut p = player_at(DOOR_X - 20);
        assert_eq!(step(&mut r, &mut p, &TickInput::default(), false).0, None);
        assert_eq!(step(&mut r, &mut p, &press(), false).0, Some(RoomExit::ToMap));
    }

    #[test]
    fn test_held_key_does_not_use_door() {
        let mut r = room(false);
        let mut p = player_at(DOOR_X - 20);
        assert_eq!(step(&mut r, &mut p, &hold(), false).0, None);
    }

    #[test]
    fn test_victory_door_needs_victory() {
        let mut r = room(true);
        let mut p = player_at(VICTORY_DOOR_X - 20);
        assert_eq!(step(&mut r, &mut p, &press(), false).0, None);
        assert_eq!(step(&mut r, &mut p, &TickInput::default(), false).0, None);
        assert_eq!(step(&mut r, &mut p, &press(), true).0, Some(RoomExit::ToVictory));
    }

    #[test]
    fn test_rooms_without_victory_door_ignore_victory() {
        let mut r = room(false);
        let mut p = player_at(VICTORY_DOOR_X - 20);
        assert_eq!(step(&mut r, &mut p, &press(), true).0, None);
    }

    #[test]
    fn test_open_panel_freezes_and_grades() {
        let mut r = room(false);
        let mut p = player_at(610);
        let (_, events) = step(&mut r, &mut p, &press(), false);
        assert_eq!(
            events,
            vec![GameEvent::ExhibitOpened {
                room: RoomId::Communist,
                exhibit: 0
            }]
        );
        assert!(r.is_frozen());
        assert_eq!(r.displayed(), None);

        let idle = TickInput::default();
        step(&mut r, &mut p, &idle, false);
        assert_eq!(r.displayed(), Some(0));

        // Walking is ignored while the panel is up
        let walk = TickInput {
            movement: crate::sim::player::MoveInput {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let x = p.rect.x;
        step(&mut r, &mut p, &walk, false);
        assert_eq!(p.rect.x, x);

        let answer = r.exhibits[0].quiz().unwrap().answers[2].rect;
        let (cx, cy) = (answer.center_x(), answer.center_y());
        let down = TickInput {
            mouse: MouseState { x: cx, y: cy, left_down: true },
            ..Default::default()
        };
        let up = TickInput {
            mouse: MouseState { x: cx, y: cy, left_down: false },
            ..Default::default()
        };
        step(&mut r, &mut p, &down, false);
        let (_, events) = step(&mut r, &mut p, &up, false);
        assert_eq!(
            events,
            vec![GameEvent::AnswerGraded {
                room: RoomId::Communist,
                exhibit: 0,
                result: AnswerState::Correct
            }]
        );
        assert_eq!(r.answers().collect::<Vec<_>>(), vec![AnswerState::Correct]);
    }

    #[test]
    fn test_closing_press_still_polls_panel() {
        let mut r = room(false);
        let mut p = player_at(610);
        step(&mut r, &mut p, &press(), false);
        step(&mut r, &mut p, &TickInput::default(), false);
        assert_eq!(r.displayed(), Some(0));

        let answer = r.exhibits[0].quiz().unwrap().answers[0].rect;
        let (cx, cy) = (answer.center_x(), answer.center_y());
        let down = TickInput {
            mouse: MouseState { x: cx, y: cy, left_down: true },
            ..Default::default()
        };
        step(&mut r, &mut p, &down, false);

        // Key pressed on the same frame the click is released
        let close = TickInput {
            activate: true,
            activate_pressed: true,
            mouse: MouseState { x: cx, y: cy, left_down: false },
            ..Default::default()
        };
        let (_, events) = step(&mut r, &mut p, &close, false);
        assert_eq!(r.displayed(), Some(0));
        assert_eq!(
            events,
            vec![GameEvent::AnswerGraded {
                room: RoomId::Communist,
                exhibit: 0,
                result: AnswerState::Incorrect
            }]
        );

        step(&mut r, &mut p, &hold(), false);
        assert_eq!(r.displayed(), None);
        assert!(!r.is_frozen());
    }

    #[test]
    fn test_leaving_stops_anthem() {
        let mut r = room(false);
        let mut p = player_at(1010);
        let mut mixer = Mixer::new(AudioSettings::default());
        let mut events = Vec::new();
        r.update(&mut p, &press(), false, &mut mixer, &mut events);
        r.update(&mut p, &TickInput::default(), false, &mut mixer, &mut events);
        assert_eq!(r.displayed(), Some(1));

        let button = r.exhibits[1].anthem().unwrap().button.rect;
        let (cx, cy) = (button.center_x(), button.center_y());
        for left_down in [true, false] {
            let input = TickInput {
                mouse: MouseState { x: cx, y: cy, left_down },
                ..Default::default()
            };
            r.update(&mut p, &input, false, &mut mixer, &mut events);
        }
        assert!(r.exhibits[1].anthem().unwrap().is_playing());
        mixer.drain();

        r.leave(&mut mixer);
        assert!(!r.exhibits[1].anthem().unwrap().is_playing());
        assert_eq!(
            mixer.drain(),
            vec![AudioCommand::Stop {
                track: Track::MilaRodino
            }]
        );
        assert!(!r.is_frozen());
    }
}
