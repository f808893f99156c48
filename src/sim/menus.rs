//! Button sets of the full-screen menus

use super::button::{Button, ButtonStyle, MouseState};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

const MENU_BUTTON_W: i32 = 400;
const MENU_BUTTON_H: i32 = 100;

fn menu_button(label: &str, x: i32, y: i32) -> Button {
    Button::new(label, x, y, MENU_BUTTON_W, MENU_BUTTON_H, ButtonStyle::Menu)
}

/// Three stacked buttons in the centre column (pause and victory screens)
fn centre_column(labels: [&str; 3]) -> [Button; 3] {
    let x = SCREEN_WIDTH / 2 - MENU_BUTTON_W / 2;
    let rows = [SCREEN_HEIGHT - 750, SCREEN_HEIGHT - 600, SCREEN_HEIGHT - 450];
    [
        menu_button(labels[0], x, rows[0]),
        menu_button(labels[1], x, rows[1]),
        menu_button(labels[2], x, rows[2]),
    ]
}

/// Feed the mouse to every button, returning the index of the one clicked
pub fn clicked(buttons: &mut [Button], mouse: &MouseState) -> Option<usize> {
    let mut hit = None;
    for (i, button) in buttons.iter_mut().enumerate() {
        if button.update(mouse) && hit.is_none() {
            hit = Some(i);
        }
    }
    hit
}

pub fn release_all(buttons: &mut [Button]) {
    buttons.iter_mut().for_each(Button::release);
}

/// Start, credits, exit
pub fn title_buttons() -> [Button; 3] {
    let x = SCREEN_WIDTH - 600;
    [
        menu_button("НАЧАЛО", x, SCREEN_HEIGHT - 700),
        menu_button("КРЕДИТИ", x, SCREEN_HEIGHT - 550),
        menu_button("ИЗХОД", x, SCREEN_HEIGHT - 400),
    ]
}

/// Continue, back to start, exit
pub fn pause_buttons() -> [Button; 3] {
    centre_column(["ПРОДЪЛЖИ", "КЪМ НАЧАЛОТО", "ИЗХОД"])
}

/// Continue, credits, back to start
pub fn victory_buttons() -> [Button; 3] {
    centre_column(["ПРОДЪЛЖИ", "КРЕДИТИ", "КЪМ НАЧАЛОТО"])
}

pub fn credits_back_button() -> Button {
    menu_button("НАЗАД", 50, SCREEN_HEIGHT - 200)
}

/// Every button of the non-gameplay screens
#[derive(Debug, Clone, PartialEq)]
pub struct Menus {
    pub title: [Button; 3],
    pub pause: [Button; 3],
    pub victory: [Button; 3],
    pub credits_back: Button,
}

impl Menus {
    pub fn new() -> Self {
        Self {
            title: title_buttons(),
            pause: pause_buttons(),
            victory: victory_buttons(),
            credits_back: credits_back_button(),
        }
    }

    /// Forget hover and press state everywhere (after a screen change)
    pub fn release(&mut self) {
        release_all(&mut self.title);
        release_all(&mut self.pause);
        release_all(&mut self.victory);
        self.credits_back.release();
    }
}

impl Default for Menus {
    fn default() -> Self {
        Self::new()
    }
}
