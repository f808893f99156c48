//! Fixed timestep simulation tick
//!
//! One call is one 60 Hz frame: global keys, music, any running fade, then
//! the handler of the current mode, then the victory check.

use super::button::MouseState;
use super::menus::clicked;
use super::player::MoveInput;
use super::room::{RoomExit, RoomId};
use super::state::{GameEvent, GameState, Mode};
use super::transition::{SwitchEffect, Transition};
use super::victory;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub movement: MoveInput,
    /// Activation key is held
    pub activate: bool,
    /// Activation key went down this frame (doors and houses)
    pub activate_pressed: bool,
    /// Pause toggle
    pub pause: bool,
    /// Mute toggle
    pub mute: bool,
    /// Quit the game
    pub quit: bool,
    pub mouse: MouseState,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.frame += 1;
    if state.mode == Mode::Exit {
        return;
    }

    if input.quit {
        state.transition = None;
        state.mixer.stop_all();
        set_mode(state, Mode::Exit);
        state.events.push(GameEvent::Quit);
        return;
    }

    if input.mute {
        let muted = state.mixer.toggle_mute();
        state.events.push(GameEvent::MuteToggled(muted));
    }
    state.mixer.advance();

    // A running fade owns the frame
    if let Some(mut transition) = state.transition.take() {
        let step = transition.advance();
        if step.switch {
            apply_effect(state, transition.effect);
            set_mode(state, transition.target);
        }
        if !step.finished {
            state.transition = Some(transition);
        }
        return;
    }

    match state.mode {
        Mode::TitleScreen => title_screen(state, input),
        Mode::CreditScreen => credit_screen(state, input),
        Mode::GameMenu => game_menu(state, input),
        Mode::Map => map(state, input),
        Mode::Level(room) => level(state, room, input),
        Mode::VictoryScreen => victory_screen(state, input),
        Mode::Exit => {}
    }

    if victory::update(&mut state.victory, &state.rooms, state.victory_threshold) {
        state.events.push(GameEvent::VictoryUnlocked);
    }
}

fn set_mode(state: &mut GameState, to: Mode) {
    let from = state.mode;
    if from == to {
        return;
    }
    state.mode = to;
    state.menus.release();
    state.events.push(GameEvent::ModeChanged { from, to });
}

/// How long the music of the mode being left takes to fade out
fn music_fade_ms(from: Mode) -> u32 {
    match from {
        Mode::VictoryScreen => VICTORY_MUSIC_FADE_MS,
        Mode::TitleScreen => EXIT_MUSIC_FADE_MS,
        _ => ROOM_MUSIC_FADE_MS,
    }
}

/// Start a fade to `target`, crossfading the music alongside
fn begin_transition(state: &mut GameState, target: Mode, effect: SwitchEffect) {
    let fade_ms = music_fade_ms(state.mode);
    state.mixer.cue(target.music(), fade_ms);
    state.transition = Some(Transition::fade_out(target, effect));
}

fn apply_effect(state: &mut GameState, effect: SwitchEffect) {
    match effect {
        SwitchEffect::None => {}
        SwitchEffect::EnterRoom(_) => {
            state.player.place(ROOM_SPAWN_X, GROUND_TOP - PLAYER_HEIGHT);
        }
        SwitchEffect::ReturnToMap(room) => {
            let x = state.map.house(room).rect.center_x();
            state.player.place(x, GROUND_TOP - PLAYER_HEIGHT);
        }
        SwitchEffect::Reset => state.reset_session(),
    }
}

fn open_pause_menu(state: &mut GameState) {
    state.previous_mode = state.mode;
    set_mode(state, Mode::GameMenu);
}

fn open_credits(state: &mut GameState) {
    state.previous_mode = state.mode;
    state.credits.reset();
    set_mode(state, Mode::CreditScreen);
}

/// Full reset through a fade to the title screen
fn back_to_start(state: &mut GameState) {
    state.mixer.stop_all();
    begin_transition(state, Mode::TitleScreen, SwitchEffect::Reset);
}

fn title_screen(state: &mut GameState, input: &TickInput) {
    match clicked(&mut state.menus.title, &input.mouse) {
        Some(0) => {
            set_mode(state, Mode::Map);
            state.mixer.cue(Mode::Map.music(), ROOM_MUSIC_FADE_MS);
            state.transition = Some(Transition::fade_in(Mode::Map));
        }
        Some(1) => open_credits(state),
        Some(2) => begin_transition(state, Mode::Exit, SwitchEffect::None),
        _ => {}
    }
}

fn credit_screen(state: &mut GameState, input: &TickInput) {
    state.credits.update();
    if state.menus.credits_back.update(&input.mouse) {
        let back = state.previous_mode;
        set_mode(state, back);
    }
}

fn game_menu(state: &mut GameState, input: &TickInput) {
    let choice = clicked(&mut state.menus.pause, &input.mouse);
    if input.pause || choice == Some(0) {
        let back = state.previous_mode;
        set_mode(state, back);
        return;
    }
    match choice {
        Some(1) => back_to_start(state),
        Some(2) => begin_transition(state, Mode::Exit, SwitchEffect::None),
        _ => {}
    }
}

fn map(state: &mut GameState, input: &TickInput) {
    if input.pause {
        open_pause_menu(state);
        return;
    }

    state.player.map_update(&input.movement);

    if input.activate_pressed
        && let Some(house) = state.map.house_at(&state.player.rect)
    {
        let room = house.room;
        begin_transition(state, Mode::Level(room), SwitchEffect::EnterRoom(room));
    }
}

fn level(state: &mut GameState, room: RoomId, input: &TickInput) {
    if input.pause {
        open_pause_menu(state);
        return;
    }

    let exit = state.rooms[room.index()].update(
        &mut state.player,
        input,
        state.victory,
        &mut state.mixer,
        &mut state.events,
    );

    match exit {
        Some(RoomExit::ToMap) => {
            state.rooms[room.index()].leave(&mut state.mixer);
            begin_transition(state, Mode::Map, SwitchEffect::ReturnToMap(room));
        }
        Some(RoomExit::ToVictory) => {
            state.rooms[room.index()].leave(&mut state.mixer);
            begin_transition(state, Mode::VictoryScreen, SwitchEffect::None);
        }
        None => {}
    }
}

fn victory_screen(state: &mut GameState, input: &TickInput) {
    match clicked(&mut state.menus.victory, &input.mouse) {
        Some(0) => begin_transition(
            state,
            Mode::Map,
            SwitchEffect::ReturnToMap(RoomId::Communist),
        ),
        Some(1) => open_credits(state),
        Some(2) => back_to_start(state),
        _ => {}
    }
}
