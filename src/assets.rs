//! Asset loading: exhibit texts, images and the player collision mask
//!
//! Every asset is required. A missing or broken file stops startup with an
//! `AssetError` naming the path; nothing is retried.

use image::imageops::FilterType;
use thiserror::Error;

use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::sim::{LevelDataError, LevelTexts, Mask, RoomId, levels};

/// Image key of the player sprite
pub const PLAYER_IMAGE: &str = "player";
/// Alpha above which a player pixel collides
const MASK_ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing asset: {path}")]
    Missing { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} is not valid UTF-8")]
    NotText { path: String },

    #[error("malformed exhibit text: {0}")]
    MalformedText(#[from] LevelDataError),

    #[error("failed to load audio {path}: {message}")]
    Audio { path: String, message: String },
}

/// Page-relative path of an image key
pub fn image_path(key: &str) -> String {
    format!("assets/gallery/{key}.png")
}

/// Split an exhibit text file into messages, one per non-blank line
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode PNG/JPEG bytes, optionally resizing to an exact size
pub fn decode_image(path: &str, bytes: &[u8], size: Option<(u32, u32)>) -> Result<ImageData, AssetError> {
    let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: path.to_string(),
        source,
    })?;

    let rgba = match size {
        Some((w, h)) if (w, h) != (img.width(), img.height()) => {
            image::imageops::resize(&img.to_rgba8(), w, h, FilterType::Nearest)
        }
        _ => img.to_rgba8(),
    };

    Ok(ImageData {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Collision mask of the player sprite, at the player's size
pub fn player_mask(image: &ImageData) -> Mask {
    if (image.width, image.height) == (PLAYER_WIDTH as u32, PLAYER_HEIGHT as u32) {
        return Mask::from_alpha(image.width, image.height, &image.rgba, MASK_ALPHA_THRESHOLD);
    }
    let resized = image::RgbaImage::from_raw(image.width, image.height, image.rgba.clone())
        .map(|img| {
            image::imageops::resize(
                &img,
                PLAYER_WIDTH as u32,
                PLAYER_HEIGHT as u32,
                FilterType::Nearest,
            )
        });
    match resized {
        Some(img) => Mask::from_alpha(img.width(), img.height(), img.as_raw(), MASK_ALPHA_THRESHOLD),
        // Pixel buffer shorter than its size claims
        None => Mask::from_alpha(image.width, image.height, &image.rgba, MASK_ALPHA_THRESHOLD),
    }
}

/// Read the three exhibit text files from a directory tree (native builds)
#[cfg(not(target_arch = "wasm32"))]
pub fn read_level_texts(root: &std::path::Path) -> Result<LevelTexts, AssetError> {
    let mut texts = LevelTexts::default();
    for room in RoomId::ALL {
        let path = root.join(levels::text_path(room));
        let text = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        texts.set(room, parse_lines(&text));
    }
    Ok(texts)
}

/// Fetch a file relative to the page
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let missing = || AssetError::Missing {
        path: path.to_string(),
    };

    let window = web_sys::window().ok_or_else(missing)?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|_| missing())?;
    let response: web_sys::Response = response.dyn_into().map_err(|_| missing())?;
    if !response.ok() {
        return Err(missing());
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(|_| missing())?)
        .await
        .map_err(|_| missing())?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_text(path: &str) -> Result<String, AssetError> {
    let bytes = fetch_bytes(path).await?;
    String::from_utf8(bytes).map_err(|_| AssetError::NotText {
        path: path.to_string(),
    })
}

/// Fetch the three exhibit text files
#[cfg(target_arch = "wasm32")]
pub async fn fetch_level_texts() -> Result<LevelTexts, AssetError> {
    let mut texts = LevelTexts::default();
    for room in RoomId::ALL {
        let text = fetch_text(levels::text_path(room)).await?;
        texts.set(room, parse_lines(&text));
    }
    Ok(texts)
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_image(key: &str, size: Option<(u32, u32)>) -> Result<ImageData, AssetError> {
    let path = image_path(key);
    let bytes = fetch_bytes(&path).await?;
    decode_image(&path, &bytes, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(pixel(x, y)));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_parse_lines_skips_blanks() {
        let text = "първи ред\\nвтори\r\n\r\nтрети\n   \n";
        assert_eq!(parse_lines(text), vec!["първи ред\\nвтори", "трети"]);
    }

    #[test]
    fn test_decode_and_resize() {
        let bytes = png(4, 2, |_, _| [10, 20, 30, 255]);
        let img = decode_image("t.png", &bytes, None).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(&img.rgba[..4], &[10, 20, 30, 255]);

        let big = decode_image("t.png", &bytes, Some((8, 4))).unwrap();
        assert_eq!((big.width, big.height), (8, 4));
        assert_eq!(big.rgba.len(), 8 * 4 * 4);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = decode_image("assets/gallery/x.png", b"not an image", None).unwrap_err();
        assert!(matches!(err, AssetError::Decode { ref path, .. } if path == "assets/gallery/x.png"));
    }

    #[test]
    fn test_player_mask_from_alpha() {
        // Left half transparent
        let bytes = png(PLAYER_WIDTH as u32, PLAYER_HEIGHT as u32, |x, _| {
            if x < 20 { [0, 0, 0, 0] } else { [255, 0, 0, 255] }
        });
        let img = decode_image("player.png", &bytes, None).unwrap();
        let mask = player_mask(&img);
        assert_eq!(mask.width(), PLAYER_WIDTH);
        assert!(!mask.get(5, 30));
        assert!(mask.get(25, 30));
        assert_eq!(mask.count(), 20 * PLAYER_HEIGHT as u32);
    }

    #[test]
    fn test_player_mask_resized_to_player() {
        let img = ImageData {
            width: 80,
            height: 124,
            rgba: vec![255; 80 * 124 * 4],
        };
        let mask = player_mask(&img);
        assert_eq!((mask.width(), mask.height()), (PLAYER_WIDTH, PLAYER_HEIGHT));
        assert_eq!(mask.count(), (PLAYER_WIDTH * PLAYER_HEIGHT) as u32);
    }

    #[test]
    fn test_level_error_converts() {
        let err: AssetError = LevelDataError::MalformedText {
            path: "assets/info/tsar_info.txt",
            expected: 10,
            found: 3,
        }
        .into();
        assert!(err.to_string().contains("tsar_info.txt"));
    }
}
