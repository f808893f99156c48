//! Draw-command scene built from the game state
//!
//! `build_scene` is pure: it turns a `GameState` into an ordered list of
//! fills, outlines and images in logical screen pixels, plus the text the
//! page overlays on top. The GPU pipeline and the DOM text layer consume it.

use super::vertex::colors;
use crate::assets::PLAYER_IMAGE;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::button::{Button, ButtonStyle};
use crate::sim::credits::CREDIT_PANELS;
use crate::sim::exhibit::{AnswerState, PANEL_FONT_PX};
use crate::sim::{Exhibit, GameState, Mode, Rect, Room};

const W: i32 = SCREEN_WIDTH;
const H: i32 = SCREEN_HEIGHT;

const PANEL_BORDER_WIDTH: i32 = 5;
const MARKER_SIZE: i32 = 100;
const DOOR_IMAGE: &str = "door";
const VICTORY_DOOR_IMAGE: &str = "victory_door";
const CORRECT_IMAGE: &str = "true";
const INCORRECT_IMAGE: &str = "false";

const TITLE_LOGO: (&str, Rect) = ("title_screen_logo", Rect::new(350, 180, 700, 700));
const FLAG_CUP: (&str, Rect) = ("f_cup", Rect::new(W / 2 - 700, 200, 500, 600));
const COAT_CUP: (&str, Rect) = ("s_cup", Rect::new(W / 2 + 300, 200, 500, 600));

/// Coats of arms framing the pause menu, left and right columns
const MENU_EMBLEMS: [(&str, Rect); 6] = [
    ("dimitrov_coat_of_arms", Rect::new(30, 10, 340, 390)),
    ("boris3_coat_of_arms", Rect::new(W - 400, 10, 340, 390)),
    ("1879-1881_coat_of_arms", Rect::new(W / 2 - 600, 318, 340, 390)),
    ("alexander_coat_of_arms", Rect::new(W / 2 + 300, 318, 340, 390)),
    ("ferdinant_coat_of_arms", Rect::new(30, 627, 340, 390)),
    ("zhivkov_coat_of_arms", Rect::new(W - 300, 627, 340, 390)),
];

const CREDITS_AUTHORS_TITLE: &str = "Автори, ученици от СПГЕ \"Джон Атанасов\" София-град:";
const CREDITS_AUTHORS: [&str; 4] = [
    "    ● Програмиране, текстов, снимков и аудио материал",
    "    ● Музика",
    "    ● Рисунки",
    "    ● Научно ръководство",
];
const CREDITS_RESOURCES_TITLE: &str = "Използвани ресурси:";

/// One sliding panel of the credits screen
struct CreditPanel {
    /// Panel height; its bottom edge sits 150 px above the screen bottom
    height: i32,
    lines: &'static [(&'static str, i32)],
    logos: &'static [(&'static str, Rect)],
}

const CREDIT_PANEL_CONTENT: [CreditPanel; CREDIT_PANELS] = [
    CreditPanel {
        height: 470,
        lines: &[
            ("    ● Програмен език Rust и WebGPU", 90),
            ("    ● Текстов редактор Visual Studio Code", 140),
        ],
        logos: &[
            ("rust_logo", Rect::new(500, 190, 280, 280)),
            ("wgpu_logo", Rect::new(800, 210, 300, 200)),
            ("vscode_logo", Rect::new(W - 350, 10, 280, 280)),
        ],
    },
    CreditPanel {
        height: 380,
        lines: &[
            ("    ● „История на българските държавни символи” на И. Войников", 0),
            ("    ● Снимков материал – heraldika-bg.org", 50),
        ],
        logos: &[
            ("bgherald_logo", Rect::new(500, 120, 400, 200)),
            ("book", Rect::new(W - 300, 60, 220, 310)),
        ],
    },
    CreditPanel {
        height: 580,
        lines: &[
            ("    ● Създаване и обработване на sprite-ове", 200),
            ("и снимков материал – Pixilart и GIMP", 250),
            ("    ● Създаване и обработване на музика – FL Studio", 300),
        ],
        logos: &[
            ("pixilart_logo", Rect::new(700, 350, 350, 175)),
            ("gimp_logo", Rect::new(940, 0, 300, 230)),
            ("fl_studio_logo", Rect::new(W - 250, 200, 200, 200)),
        ],
    },
];

/// A coloured or textured element, in logical pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill { rect: Rect, color: [f32; 4] },
    Outline { rect: Rect, color: [f32; 4], width: i32 },
    Image { key: &'static str, rect: Rect },
}

/// How a text item is anchored on its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub font_px: i32,
    /// 0xRRGGBB
    pub color: u32,
    pub italic: bool,
    pub anchor: Anchor,
}

/// Everything drawn in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub cmds: Vec<DrawCmd>,
    pub texts: Vec<TextItem>,
    /// Opacity of the black fade overlay. The text layer dims with it.
    pub fade: f32,
}

impl Scene {
    /// Empty scene over a full-screen background
    pub fn new(background: [f32; 4]) -> Self {
        Self {
            cmds: vec![DrawCmd::Fill {
                rect: Rect::new(0, 0, W, H),
                color: background,
            }],
            texts: Vec::new(),
            fade: 0.0,
        }
    }

    pub fn fill(&mut self, rect: Rect, color: [f32; 4]) {
        self.cmds.push(DrawCmd::Fill { rect, color });
    }

    pub fn outline(&mut self, rect: Rect, color: [f32; 4], width: i32) {
        self.cmds.push(DrawCmd::Outline { rect, color, width });
    }

    pub fn image(&mut self, key: &'static str, rect: Rect) {
        self.cmds.push(DrawCmd::Image { key, rect });
    }

    pub fn text(&mut self, text: &str, x: i32, y: i32, font_px: i32, color: u32) {
        self.texts.push(TextItem {
            text: text.to_string(),
            x,
            y,
            font_px,
            color,
            italic: false,
            anchor: Anchor::TopLeft,
        });
    }

    /// Bold italic heading, as used on the menu screens
    pub fn heading(&mut self, text: &str, x: i32, y: i32, font_px: i32) {
        self.texts.push(TextItem {
            text: text.to_string(),
            x,
            y,
            font_px,
            color: colors::GOLD_TEXT,
            italic: true,
            anchor: Anchor::TopLeft,
        });
    }

    /// Raised button: darker base under the face, label centred on the face
    pub fn button(&mut self, button: &Button) {
        let hovered = button.is_hovered();
        let (face, base, text) = match (button.style, hovered) {
            (ButtonStyle::Menu, false) => {
                (colors::MENU_BUTTON, colors::MENU_BUTTON_BASE, colors::GOLD_TEXT)
            }
            (ButtonStyle::Menu, true) => (
                colors::MENU_BUTTON_HOVER,
                colors::MENU_BUTTON_BASE_HOVER,
                colors::GOLD_TEXT,
            ),
            (ButtonStyle::Panel, false) => (
                colors::PANEL_BUTTON,
                colors::PANEL_BUTTON_BASE,
                colors::PANEL_BUTTON_TEXT,
            ),
            (ButtonStyle::Panel, true) => (
                colors::PANEL_BUTTON_HOVER,
                colors::PANEL_BUTTON_BASE_HOVER,
                colors::PANEL_BUTTON_TEXT,
            ),
        };
        let top = button.face();
        let base_rect = Rect::new(top.x, top.y, top.w, top.h + button.elevation());
        self.fill(base_rect, base);
        self.fill(top, face);
        self.texts.push(TextItem {
            text: button.label.clone(),
            x: top.center_x(),
            y: top.center_y(),
            font_px: button.style.font_px(),
            color: text,
            italic: true,
            anchor: Anchor::Center,
        });
    }
}

/// Build the frame for the current mode
pub fn build_scene(state: &GameState) -> Scene {
    let mut scene = match state.mode {
        Mode::TitleScreen => title_scene(state),
        Mode::CreditScreen => credits_scene(state),
        Mode::GameMenu => pause_scene(state),
        Mode::Map => map_scene(state),
        Mode::Level(id) => room_scene(state, state.room(id)),
        Mode::VictoryScreen => victory_scene(state),
        Mode::Exit => Scene::new(colors::BLACK),
    };

    if let Some(transition) = &state.transition {
        let alpha = transition.overlay_alpha();
        if alpha > 0.0 {
            scene.fill(Rect::new(0, 0, W, H), colors::with_alpha(colors::BLACK, alpha));
        }
        scene.fade = alpha;
    }
    scene
}

fn title_scene(state: &GameState) -> Scene {
    let mut scene = Scene::new(colors::MENU_BACKGROUND);
    scene.heading(crate::GAME_TITLE, W / 2 - 600, 50, 80);
    scene.image(TITLE_LOGO.0, TITLE_LOGO.1);
    for button in &state.menus.title {
        scene.button(button);
    }
    scene
}

fn credits_scene(state: &GameState) -> Scene {
    let mut scene = Scene::new(colors::MENU_BACKGROUND);

    let (panel, offset) = state.credits.panel_offset();
    let content = &CREDIT_PANEL_CONTENT[panel];
    let top = H - 150 - content.height;
    for &(line, y) in content.lines {
        scene.heading(line, offset + 50, top + y, 40);
    }
    for &(key, rect) in content.logos {
        scene.image(key, rect.translated(offset, top));
    }

    scene.texts.push(TextItem {
        text: "КРЕДИТИ".to_string(),
        x: W / 2,
        y: 50,
        font_px: 70,
        color: colors::GOLD_TEXT,
        italic: true,
        anchor: Anchor::Center,
    });
    let mut y = 100;
    scene.heading(CREDITS_AUTHORS_TITLE, 50, y, 50);
    y += 60;
    for line in CREDITS_AUTHORS {
        scene.heading(line, 50, y, 40);
        y += 50;
    }
    y += 70;
    scene.heading(CREDITS_RESOURCES_TITLE, 50, y, 50);

    scene.button(&state.menus.credits_back);
    scene
}

fn pause_scene(state: &GameState) -> Scene {
    let mut scene = Scene::new(colors::MENU_BACKGROUND);
    scene.heading("ПАУЗА", W / 2 - 180, 50, 100);
    scene.heading(crate::GAME_TITLE, W / 2 - 600, H - 200, 80);
    for (key, rect) in MENU_EMBLEMS {
        scene.image(key, rect);
    }
    for button in &state.menus.pause {
        scene.button(button);
    }
    scene
}

fn victory_scene(state: &GameState) -> Scene {
    let mut scene = Scene::new(colors::MENU_BACKGROUND);
    scene.heading("ТИ ПОБЕДИ", W / 2 - 300, 50, 100);
    scene.heading(crate::GAME_TITLE, W / 2 - 600, H - 200, 80);
    scene.image(FLAG_CUP.0, FLAG_CUP.1);
    scene.image(COAT_CUP.0, COAT_CUP.1);
    for button in &state.menus.victory {
        scene.button(button);
    }
    scene
}

fn map_scene(state: &GameState) -> Scene {
    let mut scene = Scene::new(colors::SKY);
    for house in &state.map.houses {
        scene.image(house.image, house.rect);
    }
    scene.image(PLAYER_IMAGE, state.player.rect);
    let ground = &state.map.ground;
    scene.fill(ground.rect, colors::rgb(ground.color));
    scene
}

fn room_scene(state: &GameState, room: &Room) -> Scene {
    let mut scene = Scene::new(colors::ROOM_WALL);
    for exhibit in &room.exhibits {
        scene.image(exhibit.icon, exhibit.trigger);
    }
    for platform in &room.platforms {
        scene.fill(platform.rect, colors::rgb(platform.color));
    }
    scene.image(DOOR_IMAGE, room.door);
    if state.victory
        && let Some(door) = room.victory_door
    {
        scene.image(VICTORY_DOOR_IMAGE, door);
    }
    scene.image(PLAYER_IMAGE, state.player.rect);

    if let Some(index) = room.displayed() {
        panel(&mut scene, &room.exhibits[index]);
    }
    scene
}

/// Info panel of an open exhibit
fn panel(scene: &mut Scene, exhibit: &Exhibit) {
    let panel = exhibit.panel;
    scene.fill(panel, colors::PANEL);
    scene.outline(panel, colors::PANEL_BORDER, PANEL_BORDER_WIDTH);

    if let Some(picture) = exhibit.picture() {
        scene.image(picture.key, Rect::new(panel.x + 15, panel.y + 15, picture.w, picture.h));
    }
    if let Some(anthem) = exhibit.anthem() {
        scene.button(&anthem.button);
    }
    for line in &exhibit.lines {
        scene.text(
            &line.text,
            panel.x + line.x,
            panel.y + line.y,
            PANEL_FONT_PX,
            colors::PANEL_TEXT,
        );
    }

    let Some(quiz) = exhibit.quiz() else { return };
    for answer in &quiz.answers {
        scene.button(answer);
    }
    let marker = match quiz.result() {
        AnswerState::Unanswered => return,
        AnswerState::Correct => CORRECT_IMAGE,
        AnswerState::Incorrect => INCORRECT_IMAGE,
    };
    let (mx, my) = quiz.marker;
    scene.image(
        marker,
        Rect::from_center(panel.x + mx, panel.y + my, MARKER_SIZE, MARKER_SIZE),
    );
}

/// Every image key a session can draw, sorted and without repeats
pub fn image_keys(state: &GameState) -> Vec<&'static str> {
    let mut keys = vec![
        PLAYER_IMAGE,
        DOOR_IMAGE,
        VICTORY_DOOR_IMAGE,
        CORRECT_IMAGE,
        INCORRECT_IMAGE,
        TITLE_LOGO.0,
        FLAG_CUP.0,
        COAT_CUP.0,
    ];
    keys.extend(MENU_EMBLEMS.iter().map(|(key, _)| *key));
    for panel in &CREDIT_PANEL_CONTENT {
        keys.extend(panel.logos.iter().map(|(key, _)| *key));
    }
    keys.extend(state.map.houses.iter().map(|house| house.image));
    for exhibit in state.rooms.iter().flat_map(|room| &room.exhibits) {
        keys.push(exhibit.icon);
        if let Some(picture) = exhibit.picture() {
            keys.push(picture.key);
        }
    }
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Letterboxed mapping of the logical screen onto the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    /// Largest 16:9 area centred in a `width` x `height` canvas
    pub fn fit(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1) as f32, height.max(1) as f32);
        let scale = (width / W as f32).min(height / H as f32);
        Self {
            width,
            height,
            scale,
            offset_x: (width - W as f32 * scale) / 2.0,
            offset_y: (height - H as f32 * scale) / 2.0,
        }
    }

    /// Logical pixel to clip space
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        let px = self.offset_x + x * self.scale;
        let py = self.offset_y + y * self.scale;
        [px / self.width * 2.0 - 1.0, 1.0 - py / self.height * 2.0]
    }

    /// Canvas pixel to logical pixel (may land outside the screen)
    pub fn to_logical(&self, px: f32, py: f32) -> (i32, i32) {
        (
            ((px - self.offset_x) / self.scale).floor() as i32,
            ((py - self.offset_y) / self.scale).floor() as i32,
        )
    }

    /// Logical point to canvas pixel
    pub fn to_canvas(&self, x: i32, y: i32) -> (f32, f32) {
        (
            self.offset_x + x as f32 * self.scale,
            self.offset_y + y as f32 * self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_game;
    use crate::sim::{RoomId, SwitchEffect, Transition};

    fn images(scene: &Scene) -> Vec<&'static str> {
        scene
            .cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Image { key, .. } => Some(*key),
                _ => None,
            })
            .collect()
    }

    fn texts(scene: &Scene) -> Vec<&str> {
        scene.texts.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_title_scene() {
        let state = test_game();
        let scene = build_scene(&state);
        assert_eq!(
            scene.cmds[0],
            DrawCmd::Fill {
                rect: Rect::new(0, 0, W, H),
                color: colors::MENU_BACKGROUND
            }
        );
        let labels = texts(&scene);
        assert!(labels.contains(&crate::GAME_TITLE));
        assert!(labels.contains(&"НАЧАЛО"));
        assert!(labels.contains(&"ИЗХОД"));
        assert_eq!(scene.fade, 0.0);
    }

    #[test]
    fn test_victory_door_hidden_until_victory() {
        let mut state = test_game();
        state.mode = Mode::Level(RoomId::Communist);
        assert!(!images(&build_scene(&state)).contains(&VICTORY_DOOR_IMAGE));

        state.victory = true;
        let keys = images(&build_scene(&state));
        assert!(keys.contains(&VICTORY_DOOR_IMAGE));
        assert!(keys.contains(&DOOR_IMAGE));
        assert_eq!(keys.last(), Some(&PLAYER_IMAGE));
    }

    #[test]
    fn test_no_victory_door_outside_last_room() {
        let mut state = test_game();
        state.victory = true;
        state.mode = Mode::Level(RoomId::Tsar);
        assert!(!images(&build_scene(&state)).contains(&VICTORY_DOOR_IMAGE));
    }

    #[test]
    fn test_room_draws_floor_in_room_colour() {
        let mut state = test_game();
        state.mode = Mode::Level(RoomId::Uprising);
        let floor = colors::rgb(RoomId::Uprising.floor_color());
        let scene = build_scene(&state);
        assert!(scene.cmds.iter().any(|cmd| matches!(
            cmd,
            DrawCmd::Fill { rect, color } if *color == floor && rect.y == crate::consts::GROUND_TOP
        )));
    }

    #[test]
    fn test_open_panel_is_drawn_on_top() {
        let mut state = test_game();
        state.mode = Mode::Level(RoomId::Uprising);
        let exhibit = &state.rooms[0].exhibits[0];
        let panel_rect = exhibit.panel;
        let trigger = exhibit.trigger;

        state.player.rect.x = trigger.x;
        state.player.rect.y = trigger.y;
        let input = crate::sim::TickInput {
            activate: true,
            ..Default::default()
        };
        // Press opens, release shows the panel
        crate::sim::tick(&mut state, &input);
        crate::sim::tick(&mut state, &crate::sim::TickInput::default());
        assert_eq!(state.rooms[0].displayed(), Some(0));

        let scene = build_scene(&state);
        let player_at = scene
            .cmds
            .iter()
            .position(|cmd| matches!(cmd, DrawCmd::Image { key, .. } if *key == PLAYER_IMAGE));
        let panel_at = scene
            .cmds
            .iter()
            .position(|cmd| matches!(cmd, DrawCmd::Fill { rect, .. } if *rect == panel_rect));
        assert!(player_at < panel_at);
        assert!(scene.cmds.contains(&DrawCmd::Outline {
            rect: panel_rect,
            color: colors::PANEL_BORDER,
            width: PANEL_BORDER_WIDTH
        }));
        assert!(scene.texts.iter().any(|t| t.color == colors::PANEL_TEXT));
    }

    #[test]
    fn test_answered_quiz_shows_marker() {
        let mut state = test_game();
        state.mode = Mode::Level(RoomId::Uprising);
        let index = state.rooms[0]
            .exhibits
            .iter()
            .position(|e| e.quiz().is_some())
            .unwrap();
        let correct = state.rooms[0].exhibits[index].quiz().unwrap().correct_answer();
        state.rooms[0].exhibits[index]
            .quiz_mut()
            .unwrap()
            .choose(correct - 1);

        let mut scene = Scene::new(colors::ROOM_WALL);
        panel(&mut scene, &state.rooms[0].exhibits[index]);
        assert!(images(&scene).contains(&CORRECT_IMAGE));
        assert!(!images(&scene).contains(&INCORRECT_IMAGE));
    }

    #[test]
    fn test_fade_overlay() {
        let mut state = test_game();
        state.mode = Mode::Map;
        let mut transition = Transition::fade_out(
            Mode::Level(RoomId::Tsar),
            SwitchEffect::EnterRoom(RoomId::Tsar),
        );
        for _ in 0..30 {
            transition.advance();
        }
        state.transition = Some(transition);
        let scene = build_scene(&state);
        assert!((scene.fade - 0.5).abs() < 1e-6);
        assert!(matches!(
            scene.cmds.last(),
            Some(DrawCmd::Fill { color, .. }) if (color[3] - 0.5).abs() < 1e-6
        ));
    }

    #[test]
    fn test_pressed_button_sits_flush() {
        let mut button = Button::new("ОК", 100, 100, 120, 50, ButtonStyle::Panel);
        let mut scene = Scene::new(colors::BLACK);
        scene.button(&button);
        assert_eq!(
            scene.cmds[1],
            DrawCmd::Fill {
                rect: Rect::new(100, 96, button.rect.w, 54),
                color: colors::PANEL_BUTTON_BASE
            }
        );

        button.update(&crate::sim::MouseState {
            x: 110,
            y: 110,
            left_down: true,
        });
        let mut scene = Scene::new(colors::BLACK);
        scene.button(&button);
        assert_eq!(
            scene.cmds[2],
            DrawCmd::Fill {
                rect: button.rect,
                color: colors::PANEL_BUTTON_HOVER
            }
        );
        assert_eq!(scene.texts[0].anchor, Anchor::Center);
    }

    #[test]
    fn test_credits_panel_slides() {
        let mut state = test_game();
        state.mode = Mode::CreditScreen;
        let before = build_scene(&state);
        for _ in 0..crate::consts::CREDIT_PANEL_FRAMES + 5 {
            state.credits.update();
        }
        let after = build_scene(&state);
        let first_logo = |scene: &Scene| {
            scene.cmds.iter().find_map(|cmd| match cmd {
                DrawCmd::Image { rect, .. } => Some(rect.x),
                _ => None,
            })
        };
        assert_eq!(first_logo(&before), Some(500));
        assert_eq!(first_logo(&after), Some(500 + 5 * crate::consts::CREDIT_SLIDE_SPEED));
        assert!(texts(&after).contains(&"НАЗАД"));
    }

    #[test]
    fn test_image_keys_cover_rooms() {
        let state = test_game();
        let keys = image_keys(&state);
        assert!(keys.contains(&"player"));
        assert!(keys.contains(&"tsar_house"));
        assert!(keys.contains(&"levski_flag"));
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        for exhibit in state.rooms.iter().flat_map(|r| &r.exhibits) {
            assert!(keys.contains(&exhibit.icon));
        }
    }

    #[test]
    fn test_viewport_letterbox() {
        // Wider than 16:9: bars left and right
        let vp = Viewport::fit(2400, 1080);
        assert_eq!(vp.scale, 1.0);
        assert_eq!(vp.offset_x, 240.0);
        let [x, y] = vp.to_ndc(0.0, 0.0);
        assert!((x + 0.8).abs() < 1e-6);
        assert_eq!(y, 1.0);
        assert_eq!(vp.to_logical(240.0, 0.0), (0, 0));
        assert_eq!(vp.to_logical(100.0, 10.0).0, -140);

        let half = Viewport::fit(960, 540);
        assert_eq!(half.to_logical(480.0, 270.0), (960, 540));
        assert_eq!(half.to_ndc(W as f32, H as f32), [1.0, -1.0]);
        assert_eq!(half.to_canvas(960, 540), (480.0, 270.0));
    }
}
