//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex: clip-space position, texture coordinate and tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// Opaque colour from 0xRRGGBB
    pub const fn rgb(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
            1.0,
        ]
    }

    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    /// Title, pause, victory and credits backdrop
    pub const MENU_BACKGROUND: [f32; 4] = rgb(0x056E30);
    pub const SKY: [f32; 4] = rgb(0xA3E5F0);
    pub const ROOM_WALL: [f32; 4] = rgb(0xBAAB98);

    pub const PANEL: [f32; 4] = rgb(0xBAAC9B);
    pub const PANEL_BORDER: [f32; 4] = rgb(0x704F27);

    pub const MENU_BUTTON: [f32; 4] = rgb(0x045927);
    pub const MENU_BUTTON_HOVER: [f32; 4] = rgb(0x02401B);
    pub const MENU_BUTTON_BASE: [f32; 4] = rgb(0x03401C);
    pub const MENU_BUTTON_BASE_HOVER: [f32; 4] = rgb(0x001F0D);

    pub const PANEL_BUTTON: [f32; 4] = rgb(0xDEBA96);
    pub const PANEL_BUTTON_HOVER: [f32; 4] = rgb(0xCCA678);
    pub const PANEL_BUTTON_BASE: [f32; 4] = rgb(0xC29763);
    pub const PANEL_BUTTON_BASE_HOVER: [f32; 4] = rgb(0xA17D52);

    /// Text colours as 0xRRGGBB for the DOM text layer
    pub const GOLD_TEXT: u32 = 0xB69945;
    pub const PANEL_TEXT: u32 = 0x704F27;
    pub const PANEL_BUTTON_TEXT: u32 = 0x9C6E36;
}
