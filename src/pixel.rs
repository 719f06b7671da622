use bytemuck::{Pod, Zeroable};

use crate::viewport::Grid;

/// One RGBA pixel, byte per channel, [`bytemuck`]-castable for texture
/// upload.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Densely packed `width * height` frame, created once at startup and
/// rewritten wholesale every frame.
pub struct PixelBuffer {
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(grid: Grid) -> Self {
        Self {
            pixels: vec![Rgba::BLACK; grid.pixel_count()],
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Byte view for [`wgpu::Queue::write_texture`].
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
