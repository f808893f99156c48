//! Room tables and the world map
//!
//! Exhibit messages come from one text file per room, one line per exhibit,
//! in the order the exhibits are listed here.

use thiserror::Error;

use super::collision::Platform;
use super::exhibit::{Exhibit, Picture};
use super::geometry::Rect;
use super::music::Track;
use super::room::{Room, RoomId};
use crate::consts::*;

const W: i32 = SCREEN_WIDTH;
const H: i32 = SCREEN_HEIGHT;

const COAT_ICON: (i32, i32) = (42, 54);
const FLAG_ICON: (i32, i32) = (54, 61);
const QUESTION_ICON: (i32, i32) = (48, 87);
const ANTHEM_ICON: (i32, i32) = (64, 60);

const MAP_GROUND_COLOR: u32 = 0x394521;

#[derive(Debug, Error)]
pub enum LevelDataError {
    #[error("{path}: expected {expected} exhibit lines, found {found}")]
    MalformedText {
        path: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Text asset holding the exhibit messages of a room
pub fn text_path(room: RoomId) -> &'static str {
    match room {
        RoomId::Uprising => "assets/info/uprising_info.txt",
        RoomId::Tsar => "assets/info/tsar_info.txt",
        RoomId::Communist => "assets/info/communist_info.txt",
    }
}

/// Number of message lines a room consumes
pub fn exhibit_count(room: RoomId) -> usize {
    match room {
        RoomId::Uprising => 8,
        RoomId::Tsar | RoomId::Communist => 10,
    }
}

/// Exhibit messages for every room, as loaded from the text assets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelTexts {
    pub uprising: Vec<String>,
    pub tsar: Vec<String>,
    pub communist: Vec<String>,
}

impl LevelTexts {
    pub fn for_room(&self, room: RoomId) -> &[String] {
        match room {
            RoomId::Uprising => &self.uprising,
            RoomId::Tsar => &self.tsar,
            RoomId::Communist => &self.communist,
        }
    }

    pub fn set(&mut self, room: RoomId, lines: Vec<String>) {
        match room {
            RoomId::Uprising => self.uprising = lines,
            RoomId::Tsar => self.tsar = lines,
            RoomId::Communist => self.communist = lines,
        }
    }
}

/// Build all three rooms, in `RoomId::ALL` order
pub fn build_rooms(texts: &LevelTexts) -> Result<Vec<Room>, LevelDataError> {
    RoomId::ALL
        .iter()
        .map(|&id| build_room(id, texts.for_room(id)))
        .collect()
}

pub fn build_room(id: RoomId, lines: &[String]) -> Result<Room, LevelDataError> {
    let expected = exhibit_count(id);
    if lines.len() < expected {
        return Err(LevelDataError::MalformedText {
            path: text_path(id),
            expected,
            found: lines.len(),
        });
    }
    let text = |i: usize| lines[i].as_str();

    let room = match id {
        RoomId::Uprising => Room::new(id, uprising_platforms(), uprising_exhibits(text), false),
        RoomId::Tsar => Room::new(id, tsar_platforms(), tsar_exhibits(text), false),
        RoomId::Communist => Room::new(id, communist_platforms(), communist_exhibits(text), true),
    };
    Ok(room)
}

fn icon(x: i32, y: i32, size: (i32, i32)) -> Rect {
    Rect::new(x, y, size.0, size.1)
}

/// Floor band plus a one pixel ceiling just above the screen
fn with_bounds(room: RoomId, shelves: &[(i32, i32, i32, i32)]) -> Vec<Platform> {
    let mut platforms: Vec<Platform> = shelves
        .iter()
        .map(|&(w, h, x, y)| Platform::new(w, h, x, y))
        .collect();
    platforms.push(Platform::colored(W, GROUND_HEIGHT, 0, GROUND_TOP, room.floor_color()));
    platforms.push(Platform::new(W, 1, 0, -2));
    platforms
}

fn uprising_platforms() -> Vec<Platform> {
    with_bounds(
        RoomId::Uprising,
        &[
            (80, 10, W - 1240, H - 270),
            (100, 10, W - 1430, H - 675),
            (100, 10, W - 1795, H - 380),
            (100, 10, W - 1695, H - 570),
            (100, 10, W - 575, H - 600),
            (100, 10, W - 780, H - 410),
            (100, 10, W - 1170, H - 505),
            (100, 10, W - 1470, H - 405),
            (100, 10, W - 970, H - 705),
        ],
    )
}

fn uprising_exhibits<'a>(text: impl Fn(usize) -> &'a str) -> Vec<Exhibit> {
    let coat = "uprising_icon_coat_of_arms";
    let flag = "uprising_icon_flag";
    vec![
        Exhibit::plain(
            coat,
            icon(W - 1670, H - 630, COAT_ICON),
            text(0),
            Picture::new("vitezovic_coat_of_arms", 194, 289),
        ),
        Exhibit::plain(
            coat,
            icon(W - 540, H - 660, COAT_ICON),
            text(1),
            Picture::new("zefarovic_coat_of_arms", 277, 357),
        ),
        Exhibit::plain(
            flag,
            icon(W - 1770, H - 445, FLAG_ICON),
            text(2),
            Picture::new("green_uprising_flag", 320, 192),
        ),
        Exhibit::plain(
            flag,
            icon(W - 1390, H - 740, FLAG_ICON),
            text(3),
            Picture::new("red_uprising_flag", 310, 297),
        ),
        Exhibit::plain(
            flag,
            icon(W - 745, H - 480, FLAG_ICON),
            text(4),
            Picture::new("tricolour_uprising_flag", 319, 251),
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 1145, H - 595, QUESTION_ICON),
            text(5),
            Picture::new("zefarovic_coat_of_arms", 185, 238),
            &[
                "А) Павел Ритер-Витезович",
                "Б) Христофор Жефарович",
                "В) Паисий Хилендарски",
            ],
            2,
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 1445, H - 495, QUESTION_ICON),
            text(6),
            Picture::new("levski_flag", 279, 169),
            &["А) Христо Ботев", "Б) Георги С. Раковски", "В) Васил Левски"],
            3,
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 945, H - 795, QUESTION_ICON),
            text(7),
            Picture::new("rakovski_flag", 359, 274),
            &["А) Одески", "Б) Белградски", "В) Букурещки"],
            1,
        ),
    ]
}

fn tsar_platforms() -> Vec<Platform> {
    with_bounds(
        RoomId::Tsar,
        &[
            (100, 10, W - 1160, H - 270),
            (100, 10, W - 1585, H - 510),
            (70, 10, W - 1370, H - 380),
            (100, 10, W - 690, H - 510),
            (70, 10, W - 870, H - 380),
            (100, 10, W - 1800, H - 670),
            (100, 10, W - 1400, H - 670),
            (100, 10, W - 900, H - 670),
            (100, 10, W - 500, H - 670),
            (100, 10, W - 1595, H - 730),
            (100, 10, W - 695, H - 730),
            (100, 10, W - 1160, H - 580),
        ],
    )
}

fn tsar_exhibits<'a>(text: impl Fn(usize) -> &'a str) -> Vec<Exhibit> {
    let coat = "tsar_icon_coat_of_arms";
    let coats = [
        (W - 1770, "1879-1881_coat_of_arms"),
        (W - 1370, "alexander_coat_of_arms"),
        (W - 870, "ferdinant_coat_of_arms"),
        (W - 470, "boris3_coat_of_arms"),
    ];
    let mut exhibits: Vec<Exhibit> = coats
        .iter()
        .enumerate()
        .map(|(i, &(x, key))| {
            Exhibit::plain(coat, icon(x, H - 730, COAT_ICON), text(i), Picture::new(key, 260, 300))
        })
        .collect();

    exhibits.extend([
        Exhibit::plain(
            "tsar_icon_flag",
            icon(W - 1120, H - 335, FLAG_ICON),
            text(4),
            Picture::new("base_tricolour_flag", 384, 231),
        ),
        Exhibit::plain(
            "anthem_icon",
            icon(W - 1570, H - 580, ANTHEM_ICON),
            text(5),
            Picture::new("petko_slaveikov", 263, 364),
        ),
        Exhibit::plain(
            "anthem_icon",
            icon(W - 670, H - 580, ANTHEM_ICON),
            text(6),
            Picture::new("ivan_vazov", 263, 397),
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 1570, H - 820, QUESTION_ICON),
            text(7),
            Picture::new("ferdinant_coat_of_arms", 260, 300),
            &[
                "А) Александър I Български",
                "Б) Борис III",
                "В) Фердинанд I Български",
            ],
            3,
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 670, H - 820, QUESTION_ICON),
            text(8),
            Picture::new("alexander_coat_of_arms", 260, 300),
            &[
                "А) Борис III",
                "Б) Александър I Български",
                "В) Фердинанд I Български",
            ],
            2,
        ),
        Exhibit::question_with_button(
            "question_icon",
            icon(W - 1135, H - 670, QUESTION_ICON),
            text(9),
            "Шуми Марица",
            Track::ShumiMaritsa,
            &["А) Иван Вазов", "Б) Гео Милев", "В) Петко Славейков"],
            1,
        ),
    ]);
    exhibits
}

fn communist_platforms() -> Vec<Platform> {
    with_bounds(
        RoomId::Communist,
        &[
            (100, 10, W - 1160, H - 310),
            (100, 10, W - 1585, H - 510),
            (70, 10, W - 1370, H - 380),
            (100, 10, W - 690, H - 510),
            (70, 10, W - 870, H - 380),
            (100, 10, W - 1250, H - 470),
            (100, 10, W - 1400, H - 670),
            (100, 10, W - 900, H - 670),
            (100, 10, W - 1050, H - 470),
            (100, 10, W - 1820, H - 630),
            (100, 10, W - 470, H - 680),
            (100, 10, W - 1145, H - 730),
            (50, 10, W - 1245, H - 710),
            (50, 10, W - 995, H - 710),
        ],
    )
}

fn communist_exhibits<'a>(text: impl Fn(usize) -> &'a str) -> Vec<Exhibit> {
    let coat = "communist_icon_coat_of_arms";
    let mut exhibits = vec![
        Exhibit::plain(
            coat,
            icon(W - 1220, H - 530, COAT_ICON),
            text(0),
            Picture::new("dimitrov_coat_of_arms", 260, 300),
        ),
        Exhibit::plain(
            coat,
            icon(W - 1020, H - 530, COAT_ICON),
            text(1),
            Picture::new("zhivkov_coat_of_arms", 260, 300),
        ),
        Exhibit::plain(
            "communist_icon_flag",
            icon(W - 1120, H - 375, FLAG_ICON),
            text(2),
            Picture::new("dimitrov_flag", 384, 231),
        ),
    ];

    let anthems = [
        (W - 1570, H - 580, "Републико наша здравей", Track::RepublicoNashaZdravei),
        (W - 1380, H - 740, "Земя на герои", Track::ZemyaNaGeroi),
        (W - 880, H - 740, "Мила родино(1964-1989)", Track::MilaRodinoZhivkov),
        (W - 670, H - 580, "Мила родино", Track::MilaRodino),
    ];
    for (i, &(x, y, label, track)) in anthems.iter().enumerate() {
        exhibits.push(Exhibit::with_button(
            "anthem_icon",
            icon(x, y, ANTHEM_ICON),
            text(3 + i),
            label,
            track,
        ));
    }

    exhibits.extend([
        Exhibit::question(
            "question_icon",
            icon(W - 1795, H - 720, QUESTION_ICON),
            text(7),
            Picture::new("georgi_jagarov", 195, 296),
            &["А) Георги Димитров", "Б) Тодор Живков", "В) Вълко Червенков"],
            2,
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 445, H - 770, QUESTION_ICON),
            text(8),
            Picture::new("dimitrov_coat_of_arms", 260, 300),
            &["А) Живковската", "Б) Търновската", "В) Димитровската"],
            3,
        ),
        Exhibit::question(
            "question_icon",
            icon(W - 1120, H - 820, QUESTION_ICON),
            text(9),
            Picture::new("zhivkov_flag", 384, 231),
            &[
                "А) 12 юни 1967г",
                "Б) 4 декември 1947г",
                "В) 9 септември 1944г",
            ],
            1,
        ),
    ]);
    exhibits
}

/// A house on the map that leads into a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct House {
    pub room: RoomId,
    pub rect: Rect,
    pub image: &'static str,
}

/// The outdoor screen between rooms
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    pub ground: Platform,
    pub houses: [House; 3],
}

impl WorldMap {
    pub fn new() -> Self {
        let house = |room, cx, w, h, image| House {
            room,
            rect: Rect::from_midbottom(cx, GROUND_TOP, w, h),
            image,
        };
        Self {
            ground: Platform::colored(W, GROUND_HEIGHT, 0, GROUND_TOP, MAP_GROUND_COLOR),
            houses: [
                house(RoomId::Uprising, 250, 255, 171, "uprising_house"),
                house(RoomId::Tsar, 700, 528, 281, "tsar_house"),
                house(RoomId::Communist, 1270, 473, 286, "communist_house"),
            ],
        }
    }

    /// First house the player stands in front of
    pub fn house_at(&self, player: &Rect) -> Option<&House> {
        self.houses.iter().find(|h| h.rect.intersects(player))
    }

    pub fn house(&self, room: RoomId) -> &House {
        &self.houses[room.index()]
    }
}

impl Default for WorldMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn sample_texts() -> LevelTexts {
    let lines = |room| {
        (0..exhibit_count(room))
            .map(|i| format!("Експонат {i}\\nВтори ред"))
            .collect()
    };
    LevelTexts {
        uprising: lines(RoomId::Uprising),
        tsar: lines(RoomId::Tsar),
        communist: lines(RoomId::Communist),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooms_build_in_order() {
        let rooms = build_rooms(&sample_texts()).unwrap();
        let ids: Vec<_> = rooms.iter().map(|r| r.id).collect();
        assert_eq!(ids, RoomId::ALL);
        for room in &rooms {
            assert_eq!(room.exhibits.len(), exhibit_count(room.id));
        }
    }

    #[test]
    fn test_nine_quizzes_all_unanswered() {
        let rooms = build_rooms(&sample_texts()).unwrap();
        let quizzes: usize = rooms.iter().map(|r| r.answers().count()).sum();
        assert_eq!(quizzes, 9);
    }

    #[test]
    fn test_only_last_room_has_victory_door() {
        let rooms = build_rooms(&sample_texts()).unwrap();
        let doors: Vec<_> = rooms.iter().map(|r| r.victory_door.is_some()).collect();
        assert_eq!(doors, vec![false, false, true]);
    }

    #[test]
    fn test_short_text_is_an_error() {
        let mut texts = sample_texts();
        texts.tsar.truncate(7);
        let err = build_rooms(&texts).unwrap_err();
        let LevelDataError::MalformedText { path, expected, found } = err;
        assert_eq!(path, "assets/info/tsar_info.txt");
        assert_eq!((expected, found), (10, 7));
    }

    #[test]
    fn test_panels_fit_on_screen() {
        for room in build_rooms(&sample_texts()).unwrap() {
            for exhibit in &room.exhibits {
                let p = exhibit.panel;
                assert!(p.left() >= 0 && p.right() <= W, "{:?} {:?}", room.id, p);
                assert!(p.top() >= 0 && p.bottom() <= GROUND_TOP, "{:?} {:?}", room.id, p);
            }
        }
    }

    #[test]
    fn test_rooms_have_floor_and_ceiling() {
        for room in build_rooms(&sample_texts()).unwrap() {
            let floor = room
                .platforms
                .iter()
                .find(|p| p.rect.y == GROUND_TOP)
                .unwrap();
            assert_eq!(floor.color, room.id.floor_color());
            assert!(room.platforms.iter().any(|p| p.rect.bottom() < 0));
        }
    }

    #[test]
    fn test_map_houses() {
        let map = WorldMap::new();
        for id in RoomId::ALL {
            assert_eq!(map.house(id).room, id);
            assert_eq!(map.house(id).rect.bottom(), GROUND_TOP);
        }
        let near_tsar = Rect::new(690, GROUND_TOP - 62, 40, 62);
        assert_eq!(map.house_at(&near_tsar).map(|h| h.room), Some(RoomId::Tsar));
        let between = Rect::new(390, GROUND_TOP - 62, 40, 62);
        assert_eq!(map.house_at(&between), None);
    }
}
