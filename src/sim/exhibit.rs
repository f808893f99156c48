//! Exhibits: the info panels and quizzes placed around a room
//!
//! Each exhibit sits behind a trigger icon. Its panel is laid out once, when
//! the room is built, so drawing and hit-testing only read rects.

use serde::{Deserialize, Serialize};

use super::button::{Button, ButtonStyle, MouseState, text_width};
use super::geometry::Rect;
use super::music::{Mixer, Track};
use crate::consts::{GROUND_TOP, SCREEN_WIDTH};

/// Panel text size in logical pixels
pub const PANEL_FONT_PX: i32 = 20;
/// Distance between consecutive text lines
pub const LINE_STEP: i32 = 30;
/// Inset of the picture or anthem button from the panel corner
const PANEL_INSET: i32 = 15;
/// Left edge of text that has wrapped below the picture or button
const WRAPPED_TEXT_X: i32 = 20;
/// Extra height reserved under the text for the answers and the marker
const QUIZ_AREA: i32 = 300;
/// Horizontal room kept right of the answers for the result marker
const MARKER_COLUMN: i32 = 300;
const ANSWER_SPACING: i32 = 80;
/// Step used when pushing a panel back on screen
const PANEL_NUDGE: i32 = 100;

/// Outcome of a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnswerState {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

/// An image shown in a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Picture {
    pub key: &'static str,
    pub w: i32,
    pub h: i32,
}

impl Picture {
    pub const fn new(key: &'static str, w: i32, h: i32) -> Self {
        Self { key, w, h }
    }
}

/// One line of panel text, positioned relative to the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Multiple choice question. The first answer given is final.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub answers: Vec<Button>,
    /// 1-based position of the right answer
    correct: usize,
    result: AnswerState,
    /// Centre of the result marker, relative to the panel
    pub marker: (i32, i32),
}

impl Quiz {
    pub fn new(answers: &[&str], correct: usize) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|label| Button::new(label, 0, 0, 120, 50, ButtonStyle::Panel))
                .collect(),
            correct,
            result: AnswerState::Unanswered,
            marker: (0, 0),
        }
    }

    pub fn result(&self) -> AnswerState {
        self.result
    }

    pub fn correct_answer(&self) -> usize {
        self.correct
    }

    /// Grade the answer at 0-based `index`. Returns the new result, or
    /// `None` when the quiz was already resolved or the index is unknown.
    pub fn choose(&mut self, index: usize) -> Option<AnswerState> {
        if self.result != AnswerState::Unanswered || index >= self.answers.len() {
            return None;
        }
        self.result = if index + 1 == self.correct {
            AnswerState::Correct
        } else {
            AnswerState::Incorrect
        };
        Some(self.result)
    }

    fn widest_answer(&self) -> i32 {
        self.answers.iter().map(|b| b.rect.w).max().unwrap_or(0)
    }

    fn update(&mut self, mouse: &MouseState) -> Option<AnswerState> {
        let mut clicked = None;
        for (i, button) in self.answers.iter_mut().enumerate() {
            if button.update(mouse) && clicked.is_none() {
                clicked = Some(i);
            }
        }
        clicked.and_then(|i| self.choose(i))
    }
}

/// A button that plays a recording of an anthem
#[derive(Debug, Clone, PartialEq)]
pub struct Anthem {
    pub button: Button,
    pub track: Track,
    playing: bool,
}

impl Anthem {
    pub fn new(label: &str, track: Track) -> Self {
        Self {
            button: Button::new(label, 0, 0, 120, 50, ButtonStyle::Panel),
            track,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn update(&mut self, mouse: &MouseState, mixer: &mut Mixer) {
        // Muting silences the tune without a click
        if self.playing && mixer.tune() != Some(self.track) {
            self.playing = false;
        }
        if !self.button.update(mouse) {
            return;
        }
        if self.playing {
            self.stop(mixer);
        } else {
            self.playing = mixer.play_tune(self.track);
        }
    }

    fn stop(&mut self, mixer: &mut Mixer) {
        if self.playing {
            mixer.stop_tune(self.track);
            self.playing = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExhibitKind {
    Plain { picture: Picture },
    WithButton { anthem: Anthem },
    Question { picture: Picture, quiz: Quiz },
    QuestionWithButton { anthem: Anthem, quiz: Quiz },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exhibit {
    /// Image key of the trigger icon drawn in the room
    pub icon: &'static str,
    pub trigger: Rect,
    /// Panel rect in screen coordinates
    pub panel: Rect,
    pub lines: Vec<TextLine>,
    pub kind: ExhibitKind,
}

impl Exhibit {
    pub fn plain(icon: &'static str, trigger: Rect, message: &str, picture: Picture) -> Self {
        Self::build(icon, trigger, message, ExhibitKind::Plain { picture })
    }

    pub fn with_button(
        icon: &'static str,
        trigger: Rect,
        message: &str,
        label: &str,
        track: Track,
    ) -> Self {
        let anthem = Anthem::new(label, track);
        Self::build(icon, trigger, message, ExhibitKind::WithButton { anthem })
    }

    pub fn question(
        icon: &'static str,
        trigger: Rect,
        message: &str,
        picture: Picture,
        answers: &[&str],
        correct: usize,
    ) -> Self {
        let quiz = Quiz::new(answers, correct);
        Self::build(icon, trigger, message, ExhibitKind::Question { picture, quiz })
    }

    pub fn question_with_button(
        icon: &'static str,
        trigger: Rect,
        message: &str,
        label: &str,
        track: Track,
        answers: &[&str],
        correct: usize,
    ) -> Self {
        let anthem = Anthem::new(label, track);
        let quiz = Quiz::new(answers, correct);
        Self::build(
            icon,
            trigger,
            message,
            ExhibitKind::QuestionWithButton { anthem, quiz },
        )
    }

    fn build(icon: &'static str, trigger: Rect, message: &str, kind: ExhibitKind) -> Self {
        // Picture or anthem button in the top-left corner; text flows right of it
        let (block_w, block_h) = match &kind {
            ExhibitKind::Plain { picture } | ExhibitKind::Question { picture, .. } => {
                (picture.w, picture.h)
            }
            ExhibitKind::WithButton { anthem }
            | ExhibitKind::QuestionWithButton { anthem, .. } => {
                (anthem.button.rect.w, anthem.button.rect.h)
            }
        };
        let beside_x = PANEL_INSET + block_w + PANEL_INSET;
        let block_bottom = PANEL_INSET + block_h;

        let lines = layout_lines(message, beside_x, block_bottom);
        let text_right = lines
            .iter()
            .map(|line| line.x + text_width(&line.text, PANEL_FONT_PX))
            .max()
            .unwrap_or(0);
        let text_bottom = lines.last().map_or(0, |line| line.y + LINE_STEP);
        let content_h = block_bottom.max(text_bottom);

        let mut w = text_right.max(beside_x) + WRAPPED_TEXT_X;
        let mut h = content_h + WRAPPED_TEXT_X;

        let mut exhibit = Self {
            icon,
            trigger,
            panel: Rect::default(),
            lines,
            kind,
        };

        if let Some(quiz) = exhibit.quiz_mut() {
            w = w.max(PANEL_INSET + quiz.widest_answer() + MARKER_COLUMN);
            h = content_h + QUIZ_AREA;
            quiz.marker = (w - 200, content_h + 150);
        }

        exhibit.panel = place_panel(&trigger, w, h);
        exhibit.arrange_buttons();
        exhibit
    }

    /// Move the anthem and answer buttons to their spots on the placed panel
    fn arrange_buttons(&mut self) {
        let panel = self.panel;
        let (anthem, quiz) = match &mut self.kind {
            ExhibitKind::Plain { .. } => (None, None),
            ExhibitKind::WithButton { anthem } => (Some(anthem), None),
            ExhibitKind::Question { quiz, .. } => (None, Some(quiz)),
            ExhibitKind::QuestionWithButton { anthem, quiz } => (Some(anthem), Some(quiz)),
        };
        if let Some(anthem) = anthem {
            anthem.button.rect.x = panel.x + PANEL_INSET;
            anthem.button.rect.y = panel.y + PANEL_INSET;
        }
        if let Some(quiz) = quiz {
            let count = quiz.answers.len() as i32;
            for (i, button) in quiz.answers.iter_mut().enumerate() {
                let from_last = count - 1 - i as i32;
                button.rect.x = panel.x + PANEL_INSET;
                button.rect.y =
                    panel.bottom() - WRAPPED_TEXT_X - button.rect.h - ANSWER_SPACING * from_last;
            }
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match &self.kind {
            ExhibitKind::Question { quiz, .. } | ExhibitKind::QuestionWithButton { quiz, .. } => {
                Some(quiz)
            }
            _ => None,
        }
    }

    pub fn quiz_mut(&mut self) -> Option<&mut Quiz> {
        match &mut self.kind {
            ExhibitKind::Question { quiz, .. } | ExhibitKind::QuestionWithButton { quiz, .. } => {
                Some(quiz)
            }
            _ => None,
        }
    }

    pub fn anthem(&self) -> Option<&Anthem> {
        match &self.kind {
            ExhibitKind::WithButton { anthem } | ExhibitKind::QuestionWithButton { anthem, .. } => {
                Some(anthem)
            }
            _ => None,
        }
    }

    pub fn picture(&self) -> Option<Picture> {
        match &self.kind {
            ExhibitKind::Plain { picture } | ExhibitKind::Question { picture, .. } => {
                Some(*picture)
            }
            _ => None,
        }
    }

    /// Handle one frame of mouse input on the open panel.
    /// Returns the quiz result on the frame an answer is graded.
    pub fn update_panel(&mut self, mouse: &MouseState, mixer: &mut Mixer) -> Option<AnswerState> {
        match &mut self.kind {
            ExhibitKind::Plain { .. } => None,
            ExhibitKind::WithButton { anthem } => {
                anthem.update(mouse, mixer);
                None
            }
            ExhibitKind::Question { quiz, .. } => quiz.update(mouse),
            ExhibitKind::QuestionWithButton { anthem, quiz } => {
                anthem.update(mouse, mixer);
                quiz.update(mouse)
            }
        }
    }

    /// Panel closed: silence its tune and forget hover state
    pub fn close(&mut self, mixer: &mut Mixer) {
        match &mut self.kind {
            ExhibitKind::Plain { .. } => {}
            ExhibitKind::WithButton { anthem } => {
                anthem.stop(mixer);
                anthem.button.release();
            }
            ExhibitKind::Question { quiz, .. } => {
                quiz.answers.iter_mut().for_each(Button::release);
            }
            ExhibitKind::QuestionWithButton { anthem, quiz } => {
                anthem.stop(mixer);
                anthem.button.release();
                quiz.answers.iter_mut().for_each(Button::release);
            }
        }
    }
}

/// Split a message on the literal `\n` marker and place each line
fn layout_lines(message: &str, beside_x: i32, block_bottom: i32) -> Vec<TextLine> {
    let mut y = 10;
    message
        .split("\\n")
        .map(|text| {
            let x = if y < block_bottom { beside_x } else { WRAPPED_TEXT_X };
            let line = TextLine {
                text: text.trim().to_string(),
                x,
                y,
            };
            y += LINE_STEP;
            line
        })
        .collect()
}

/// Anchor a `w`×`h` panel beside its trigger, then push it back on screen
/// in coarse steps.
fn place_panel(trigger: &Rect, w: i32, h: i32) -> Rect {
    let mut panel = Rect::new(trigger.right(), trigger.bottom() - trigger.h / 2, w, h);
    while panel.bottom() > GROUND_TOP {
        panel.y -= PANEL_NUDGE;
    }
    while panel.right() > SCREEN_WIDTH {
        panel.x -= PANEL_NUDGE;
    }
    while panel.left() < 0 {
        panel.x += PANEL_NUDGE;
    }
    while panel.top() < 0 {
        panel.y += PANEL_NUDGE;
    }
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::music::{AudioCommand, AudioSettings};
    use proptest::prelude::*;

    const ANSWERS: [&str; 3] = ["А) Одески", "Б) Белградски", "В) Букурещки"];

    fn question() -> Exhibit {
        Exhibit::question(
            "question_icon",
            Rect::new(800, 300, 48, 87),
            "Кое дружество?\\nВтори ред",
            Picture::new("rakovski_flag", 359, 274),
            &ANSWERS,
            1,
        )
    }

    fn click(exhibit: &mut Exhibit, rect: Rect, mixer: &mut Mixer) -> Option<AnswerState> {
        let (x, y) = (rect.center_x(), rect.center_y());
        exhibit.update_panel(&MouseState { x, y, left_down: true }, mixer);
        exhibit.update_panel(&MouseState { x, y, left_down: false }, mixer)
    }

    #[test]
    fn test_message_splits_on_marker() {
        let e = question();
        assert_eq!(e.lines.len(), 2);
        assert_eq!(e.lines[0].text, "Кое дружество?");
        assert_eq!(e.lines[1].y - e.lines[0].y, LINE_STEP);
        // Beside the 359 px flag
        assert_eq!(e.lines[0].x, 15 + 359 + 15);
    }

    #[test]
    fn test_lines_wrap_below_picture() {
        let message = vec!["ред"; 12].join("\\n");
        let e = Exhibit::plain(
            "uprising_icon_flag",
            Rect::new(100, 300, 54, 61),
            &message,
            Picture::new("green_uprising_flag", 320, 192),
        );
        assert_eq!(e.lines[0].x, 350);
        // 15 + 192 = 207: line at y = 190 still beside, y = 220 wrapped
        assert_eq!(e.lines[6].x, 350);
        assert_eq!(e.lines[7].x, WRAPPED_TEXT_X);
    }

    #[test]
    fn test_panel_anchored_beside_trigger() {
        let trigger = Rect::new(100, 100, 42, 54);
        let e = Exhibit::plain("icon", trigger, "кратко", Picture::new("p", 50, 50));
        assert_eq!(e.panel.x, trigger.right());
        assert_eq!(e.panel.y, trigger.bottom() - 27);
    }

    #[test]
    fn test_panel_pushed_back_on_screen() {
        let trigger = Rect::new(1800, 800, 48, 87);
        let e = Exhibit::plain("icon", trigger, "текст", Picture::new("p", 300, 300));
        assert!(e.panel.bottom() <= GROUND_TOP);
        assert!(e.panel.right() <= SCREEN_WIDTH);
        assert!(e.panel.left() >= 0);
        assert!(e.panel.top() >= 0);
        // Moves in whole steps from the anchor
        assert_eq!((trigger.right() - e.panel.x) % PANEL_NUDGE, 0);
    }

    #[test]
    fn test_answers_stack_above_panel_bottom() {
        let e = question();
        let quiz = e.quiz().unwrap();
        let last = quiz.answers.last().unwrap().rect;
        assert_eq!(last.bottom(), e.panel.bottom() - 20);
        assert_eq!(quiz.answers[1].rect.y - quiz.answers[0].rect.y, ANSWER_SPACING);
        assert!(quiz.answers[0].rect.y > e.panel.y);
    }

    #[test]
    fn test_click_grades_once() {
        let mut e = question();
        let mut mixer = Mixer::new(AudioSettings::default());
        let wrong = e.quiz().unwrap().answers[2].rect;
        let right = e.quiz().unwrap().answers[0].rect;

        assert_eq!(click(&mut e, wrong, &mut mixer), Some(AnswerState::Incorrect));
        assert_eq!(click(&mut e, right, &mut mixer), None);
        assert_eq!(e.quiz().unwrap().result(), AnswerState::Incorrect);
    }

    #[test]
    fn test_anthem_button_toggles_tune() {
        let mut e = Exhibit::with_button(
            "anthem_icon",
            Rect::new(350, 500, 64, 60),
            "Химн",
            "Мила родино",
            Track::MilaRodino,
        );
        let mut mixer = Mixer::new(AudioSettings::default());
        let button = e.anthem().unwrap().button.rect;

        click(&mut e, button, &mut mixer);
        assert!(e.anthem().unwrap().is_playing());
        assert!(mixer.drain().contains(&AudioCommand::Play {
            track: Track::MilaRodino,
            looped: true,
            volume: 0.1
        }));

        click(&mut e, button, &mut mixer);
        assert!(!e.anthem().unwrap().is_playing());

        click(&mut e, button, &mut mixer);
        e.close(&mut mixer);
        assert!(!e.anthem().unwrap().is_playing());
        assert!(mixer.drain().contains(&AudioCommand::Stop {
            track: Track::MilaRodino
        }));
    }

    #[test]
    fn test_anthem_stays_off_while_muted() {
        let mut e = Exhibit::with_button(
            "anthem_icon",
            Rect::new(350, 500, 64, 60),
            "Химн",
            "Мила родино",
            Track::MilaRodino,
        );
        let mut mixer = Mixer::new(AudioSettings::default());
        let button = e.anthem().unwrap().button.rect;

        mixer.toggle_mute();
        click(&mut e, button, &mut mixer);
        assert!(!e.anthem().unwrap().is_playing());

        mixer.toggle_mute();
        mixer.drain();
        click(&mut e, button, &mut mixer);
        assert!(e.anthem().unwrap().is_playing());
        assert!(mixer.drain().contains(&AudioCommand::Play {
            track: Track::MilaRodino,
            looped: true,
            volume: 0.1
        }));
    }

    #[test]
    fn test_mute_while_playing_resets_anthem() {
        let mut e = Exhibit::with_button(
            "anthem_icon",
            Rect::new(350, 500, 64, 60),
            "Химн",
            "Мила родино",
            Track::MilaRodino,
        );
        let mut mixer = Mixer::new(AudioSettings::default());
        let button = e.anthem().unwrap().button.rect;

        click(&mut e, button, &mut mixer);
        assert!(e.anthem().unwrap().is_playing());
        mixer.toggle_mute();
        mixer.toggle_mute();
        mixer.drain();

        // One click after unmuting starts the tune again
        click(&mut e, button, &mut mixer);
        assert!(e.anthem().unwrap().is_playing());
        assert!(mixer.drain().contains(&AudioCommand::Play {
            track: Track::MilaRodino,
            looped: true,
            volume: 0.1
        }));
    }

    proptest! {
        #[test]
        fn first_answer_wins(correct in 1usize..=3, picks in prop::collection::vec(0usize..3, 1..6)) {
            let mut quiz = Quiz::new(&ANSWERS, correct);
            let first = picks[0];
            let expected = if first + 1 == correct {
                AnswerState::Correct
            } else {
                AnswerState::Incorrect
            };
            prop_assert_eq!(quiz.choose(first), Some(expected));
            for &pick in &picks[1..] {
                prop_assert_eq!(quiz.choose(pick), None);
            }
            prop_assert_eq!(quiz.result(), expected);
        }
    }
}
