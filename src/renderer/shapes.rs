//! Quad generation for the sprite batcher
//!
//! Everything on screen is a quad: solid fills sample a white texel, images
//! sample their own texture. Quads are grouped into runs that share a
//! texture so the pipeline binds each texture once per run.

use super::scene::{DrawCmd, Scene, Viewport};
use super::vertex::{Vertex, colors};
use crate::sim::Rect;

/// Consecutive vertices drawn with one texture (`None` is the white texel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub texture: Option<&'static str>,
    pub start: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

/// Two triangles covering `rect`, with the full texture mapped onto it
pub fn quad(viewport: &Viewport, rect: Rect, color: [f32; 4]) -> [Vertex; 6] {
    let [x0, y0] = viewport.to_ndc(rect.left() as f32, rect.top() as f32);
    let [x1, y1] = viewport.to_ndc(rect.right() as f32, rect.bottom() as f32);
    let tl = Vertex::new(x0, y0, 0.0, 0.0, color);
    let tr = Vertex::new(x1, y0, 1.0, 0.0, color);
    let bl = Vertex::new(x0, y1, 0.0, 1.0, color);
    let br = Vertex::new(x1, y1, 1.0, 1.0, color);
    [tl, bl, tr, tr, bl, br]
}

/// Border of `width` pixels drawn inside `rect`
pub fn outline(viewport: &Viewport, rect: Rect, color: [f32; 4], width: i32) -> Vec<Vertex> {
    let width = width.min(rect.w / 2).min(rect.h / 2).max(0);
    if width == 0 {
        return Vec::new();
    }
    let inner_h = rect.h - 2 * width;
    let sides = [
        Rect::new(rect.x, rect.y, rect.w, width),
        Rect::new(rect.x, rect.bottom() - width, rect.w, width),
        Rect::new(rect.x, rect.y + width, width, inner_h),
        Rect::new(rect.right() - width, rect.y + width, width, inner_h),
    ];
    sides
        .into_iter()
        .filter(|side| side.w > 0 && side.h > 0)
        .flat_map(|side| quad(viewport, side, color))
        .collect()
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, texture: Option<&'static str>, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let count = vertices.len() as u32;
        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.count += count,
            _ => self.batches.push(Batch {
                texture,
                start,
                count,
            }),
        }
    }

    pub fn fill(&mut self, viewport: &Viewport, rect: Rect, color: [f32; 4]) {
        self.push(None, &quad(viewport, rect, color));
    }

    pub fn outline(&mut self, viewport: &Viewport, rect: Rect, color: [f32; 4], width: i32) {
        self.push(None, &outline(viewport, rect, color, width));
    }

    pub fn image(&mut self, viewport: &Viewport, key: &'static str, rect: Rect) {
        self.push(Some(key), &quad(viewport, rect, colors::WHITE));
    }

    /// All draw commands of a scene, in order
    pub fn from_scene(scene: &Scene, viewport: &Viewport) -> Self {
        let mut batch = Self::new();
        for cmd in &scene.cmds {
            match *cmd {
                DrawCmd::Fill { rect, color } => batch.fill(viewport, rect, color),
                DrawCmd::Outline { rect, color, width } => {
                    batch.outline(viewport, rect, color, width)
                }
                DrawCmd::Image { key, rect } => batch.image(viewport, key, rect),
            }
        }
        batch
    }
}
