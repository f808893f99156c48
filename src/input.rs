//! Key mapping from browser keyboard events to game actions
//!
//! Keys are matched on `KeyboardEvent.code` (physical position), so the
//! bindings work the same on Bulgarian and Latin layouts.

use crate::sim::{MouseState, MoveInput, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Activate,
    Pause,
    Mute,
    Quit,
}

/// Map a physical key code to a game action
pub fn action_for_code(code: &str) -> Option<Action> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Action::Left),
        "ArrowRight" | "KeyD" => Some(Action::Right),
        "Space" | "KeyW" | "ArrowUp" => Some(Action::Jump),
        "KeyE" | "ControlRight" => Some(Action::Activate),
        "KeyP" => Some(Action::Pause),
        "KeyM" => Some(Action::Mute),
        "Escape" => Some(Action::Quit),
        _ => None,
    }
}

/// Keys the page should not get default handling for (scrolling)
pub fn prevents_default(code: &str) -> bool {
    matches!(
        code,
        "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" | "Space"
    )
}

/// Held keys plus presses that have not reached a tick yet
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    jump: bool,
    activate: bool,
    activate_pressed: bool,
    pause: bool,
    mute: bool,
    quit: bool,
    pub mouse: MouseState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat events only keep the key held.
    pub fn key_down(&mut self, action: Action, repeat: bool) {
        match action {
            Action::Left => self.left = true,
            Action::Right => self.right = true,
            Action::Jump => self.jump = true,
            Action::Activate => {
                if !self.activate && !repeat {
                    self.activate_pressed = true;
                }
                self.activate = true;
            }
            Action::Pause if !repeat => self.pause = true,
            Action::Mute if !repeat => self.mute = true,
            Action::Quit => self.quit = true,
            _ => {}
        }
    }

    pub fn key_up(&mut self, action: Action) {
        match action {
            Action::Left => self.left = false,
            Action::Right => self.right = false,
            Action::Jump => self.jump = false,
            Action::Activate => self.activate = false,
            _ => {}
        }
    }

    /// Window lost focus: nothing stays held
    pub fn release_all(&mut self) {
        let mouse = MouseState {
            left_down: false,
            ..self.mouse
        };
        *self = Self {
            mouse,
            ..Self::default()
        };
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) {
        self.mouse.x = x;
        self.mouse.y = y;
    }

    pub fn mouse_button(&mut self, down: bool) {
        self.mouse.left_down = down;
    }

    /// Input for the next tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            movement: MoveInput {
                left: self.left,
                right: self.right,
                jump: self.jump,
            },
            activate: self.activate,
            activate_pressed: self.activate_pressed,
            pause: self.pause,
            mute: self.mute,
            quit: self.quit,
            mouse: self.mouse,
        }
    }

    /// One-shot presses are consumed by the first tick that sees them
    pub fn clear_edges(&mut self) {
        self.activate_pressed = false;
        self.pause = false;
        self.mute = false;
        self.quit = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(action_for_code("ArrowLeft"), Some(Action::Left));
        assert_eq!(action_for_code("KeyA"), Some(Action::Left));
        assert_eq!(action_for_code("KeyD"), Some(Action::Right));
        assert_eq!(action_for_code("Space"), Some(Action::Jump));
        assert_eq!(action_for_code("ArrowUp"), Some(Action::Jump));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(action_for_code("KeyE"), Some(Action::Activate));
        assert_eq!(action_for_code("ControlRight"), Some(Action::Activate));
        assert_eq!(action_for_code("ControlLeft"), None);
        assert_eq!(action_for_code("KeyP"), Some(Action::Pause));
        assert_eq!(action_for_code("KeyM"), Some(Action::Mute));
        assert_eq!(action_for_code("Escape"), Some(Action::Quit));
        assert_eq!(action_for_code("KeyQ"), None);
    }

    #[test]
    fn test_activate_press_is_one_shot() {
        let mut input = InputState::new();
        input.key_down(Action::Activate, false);
        let first = input.snapshot();
        assert!(first.activate && first.activate_pressed);

        input.clear_edges();
        input.key_down(Action::Activate, true);
        let held = input.snapshot();
        assert!(held.activate);
        assert!(!held.activate_pressed);

        input.key_up(Action::Activate);
        assert!(!input.snapshot().activate);
    }

    #[test]
    fn test_repeat_does_not_toggle_pause() {
        let mut input = InputState::new();
        input.key_down(Action::Pause, false);
        assert!(input.snapshot().pause);
        input.clear_edges();
        input.key_down(Action::Pause, true);
        assert!(!input.snapshot().pause);
    }

    #[test]
    fn test_release_all_keeps_pointer_position() {
        let mut input = InputState::new();
        input.key_down(Action::Right, false);
        input.mouse_move(300, 400);
        input.mouse_button(true);
        input.release_all();
        let tick = input.snapshot();
        assert!(!tick.movement.right);
        assert_eq!((tick.mouse.x, tick.mouse.y, tick.mouse.left_down), (300, 400, false));
    }
}
