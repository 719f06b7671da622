//! Pixel-grid to complex-plane mapping and pan/zoom state.

use crate::lane::LANE_WIDTH;

/// Complex-plane point the default view is anchored on.
pub const CENTRE: (f32, f32) = (-1.35, 0.0);

/// Pan and zoom both move by 10 pixels' worth of plane distance per event.
pub const EVENT_STEP_PIXELS: f32 = 10.0;

/// Fixed output dimensions, set once at startup.
///
/// The lane kernels consume pixels 8 at a time with no remainder loop, so
/// a width that is not a multiple of [`LANE_WIDTH`] is rejected outright
/// rather than silently padded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        assert!(
            width as usize % LANE_WIDTH == 0,
            "grid width {} is not a multiple of the lane width {}",
            width,
            LANE_WIDTH,
        );
        Self { width, height }
    }

    /// Plane distance covered by one pixel at scale 1.
    pub fn pixel_step(&self) -> f32 {
        1.0 / self.width as f32
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Pan/zoom state. Mutated only between frames by [`Viewport::apply`];
/// the kernel reads it through [`Plane`] and never writes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub shift_x: f32,
    pub shift_y: f32,
    pub scale: f32,
}

impl Viewport {
    /// One pan or zoom step, as reported by the window's input layer.
    pub fn apply(&mut self, event: InputEvent, pixel_step: f32) {
        let step = pixel_step * EVENT_STEP_PIXELS;
        match event {
            InputEvent::PanRight => self.shift_x += step,
            InputEvent::PanLeft => self.shift_x -= step,
            InputEvent::PanUp => self.shift_y -= step,
            InputEvent::PanDown => self.shift_y += step,
            InputEvent::ZoomIn => self.scale += step,
            InputEvent::ZoomOut => {
                // Zooming out past scale 0 would flip and then mirror the
                // image; ignore the event instead.
                if self.scale - step > 0.0 {
                    self.scale -= step;
                }
            }
        }
        debug_assert!(self.scale > 0.0);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            shift_x: 0.0,
            shift_y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
}

/// Sample coordinates for one frame: the top-left sample and the plane
/// distance between adjacent samples, with zoom already applied.
///
/// Pure function of grid and viewport; rebuilt every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub x_begin: f32,
    pub y_begin: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Plane {
    pub fn new(grid: Grid, viewport: &Viewport) -> Self {
        assert!(viewport.scale > 0.0, "viewport scale must be positive");

        let dx = grid.pixel_step() / viewport.scale;
        let dy = grid.pixel_step() / viewport.scale;

        Self {
            x_begin: -(grid.width as f32) / 2.0 * dx + CENTRE.0 + viewport.shift_x,
            y_begin: -(grid.height as f32) / 2.0 * dy + CENTRE.1 + viewport.shift_y,
            dx,
            dy,
        }
    }

    /// x-coordinate of the sample in pixel column `x`.
    pub fn sample_x(&self, x: u32) -> f32 {
        self.x_begin + x as f32 * self.dx
    }

    /// y-coordinate of the sample in pixel row `y`.
    pub fn sample_y(&self, y: u32) -> f32 {
        self.y_begin + y as f32 * self.dy
    }
}
