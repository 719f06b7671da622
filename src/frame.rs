//! Frame driver: one whole-grid kernel pass into the pixel buffer.

use log::trace;

use crate::colour::colour;
use crate::kernel::{self, Variant, ESCAPE_RADIUS_SQUARED, MAX_ITERATIONS};
use crate::lane::{LaneBackend, LANE_WIDTH};
use crate::pixel::PixelBuffer;
use crate::viewport::{Grid, Plane, Viewport};

/// Rewrite `pixels` with one full frame at the given viewport, using the
/// selected kernel variant. Runs to completion; no per-pixel allocation.
pub fn compute_frame(pixels: &mut PixelBuffer, grid: Grid, viewport: &Viewport, variant: Variant) {
    trace!("begin frame: {:?} via {}", viewport, variant.name());

    let plane = Plane::new(grid, viewport);
    match variant {
        Variant::Scalar => render_scalar(pixels, grid, &plane),
        #[cfg(target_arch = "x86_64")]
        Variant::Avx => render_lanes::<crate::lane::avx::Avx>(pixels, grid, &plane),
        Variant::Portable => render_lanes::<crate::lane::portable::Portable>(pixels, grid, &plane),
    }

    trace!("end frame");
}

// Sample coordinates always come from `Plane::sample_x`/`sample_y`, never
// from a running accumulator: every variant must see bit-identical seeds
// for the cross-variant equality contract to hold, and accumulated and
// recomputed coordinates round differently.

fn render_scalar(pixels: &mut PixelBuffer, grid: Grid, plane: &Plane) {
    let out = pixels.pixels_mut();

    for pixel_y in 0..grid.height {
        let row = pixel_y as usize * grid.width as usize;
        let y0 = plane.sample_y(pixel_y);

        for pixel_x in 0..grid.width {
            let x0 = plane.sample_x(pixel_x);
            let count = kernel::escape_count(x0, y0, MAX_ITERATIONS, ESCAPE_RADIUS_SQUARED);
            out[row + pixel_x as usize] = colour(count);
        }
    }
}

fn render_lanes<L: LaneBackend>(pixels: &mut PixelBuffer, grid: Grid, plane: &Plane) {
    debug_assert!(grid.width as usize % LANE_WIDTH == 0);
    let out = pixels.pixels_mut();

    for pixel_y in 0..grid.height {
        let row = pixel_y as usize * grid.width as usize;
        let y_lane = L::splat(plane.sample_y(pixel_y));

        for group in 0..grid.width as usize / LANE_WIDTH {
            let first_column = (group * LANE_WIDTH) as u32;
            let mut seeds = [0.0; LANE_WIDTH];
            for (i, seed) in seeds.iter_mut().enumerate() {
                *seed = plane.sample_x(first_column + i as u32);
            }

            let counts = kernel::escape_counts::<L>(
                L::from_array(seeds),
                y_lane,
                MAX_ITERATIONS,
                ESCAPE_RADIUS_SQUARED,
            );

            let offset = row + group * LANE_WIDTH;
            for (i, count) in counts.into_iter().enumerate() {
                out[offset + i] = colour(count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgba;

    fn frame(grid: Grid, viewport: &Viewport, variant: Variant) -> Vec<Rgba> {
        let mut pixels = PixelBuffer::new(grid);
        compute_frame(&mut pixels, grid, viewport, variant);
        pixels.pixels().to_vec()
    }

    #[test_log::test]
    fn portable_frame_matches_scalar_frame() {
        let grid = Grid::new(64, 48);
        let viewport = Viewport::default();

        let scalar = frame(grid, &viewport, Variant::Scalar);
        let portable = frame(grid, &viewport, Variant::Portable);
        assert_eq!(scalar, portable);
    }

    #[test_log::test]
    fn variants_agree_after_pan_and_zoom() {
        let grid = Grid::new(64, 48);
        let viewport = Viewport {
            shift_x: 0.35,
            shift_y: -0.1,
            scale: 4.0,
        };

        let scalar = frame(grid, &viewport, Variant::Scalar);
        assert_eq!(scalar, frame(grid, &viewport, Variant::Portable));

        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx2") {
            assert_eq!(scalar, frame(grid, &viewport, Variant::Avx));
        }
    }

    #[test]
    fn every_pixel_is_written_opaque() {
        let grid = Grid::new(32, 8);
        let pixels = frame(grid, &Viewport::default(), Variant::Portable);

        assert_eq!(pixels.len(), grid.pixel_count());
        assert!(pixels.iter().all(|pixel| pixel.a == 255));
    }
}
