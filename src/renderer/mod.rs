//! Rendering module
//!
//! `scene` turns the game state into draw commands and is target independent.
//! `pipeline` draws those commands with WebGPU as batched textured quads.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Anchor, DrawCmd, Scene, TextItem, Viewport, build_scene, image_keys};
pub use shapes::SpriteBatch;
