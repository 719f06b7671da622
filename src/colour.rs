//! Colouring.
//!
//! A hard two-tone ramp over the iteration count: green below the
//! threshold intensity, magenta-ish above it, black for points that
//! never escaped. The threshold (122) and channel assignment are part of
//! the renderer's visible contract — the cross-variant frame tests
//! compare raw RGBA bytes.

use crate::kernel::MAX_ITERATIONS;
use crate::pixel::Rgba;

/// Intensity above which a pixel switches from the green branch to the
/// magenta one.
const RAMP_THRESHOLD: u8 = 122;

/// Map an escape-time count (`0..=MAX_ITERATIONS`) to a pixel.
pub fn colour(count: u32) -> Rgba {
    debug_assert!(count <= MAX_ITERATIONS);

    if count == MAX_ITERATIONS {
        // Never escaped: inside the set, rendered as background.
        return Rgba::BLACK;
    }

    let intensity = (count as f32 / MAX_ITERATIONS as f32 * 255.0) as u8;
    if intensity > RAMP_THRESHOLD {
        Rgba {
            r: intensity,
            g: 1,
            b: intensity,
            a: 255,
        }
    } else {
        Rgba {
            r: 0,
            g: intensity,
            b: 0,
            a: 255,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_black() {
        assert_eq!(colour(MAX_ITERATIONS), Rgba::BLACK);
    }

    #[test]
    fn zero_count_is_black_but_opaque() {
        assert_eq!(
            colour(0),
            Rgba {
                r: 0,
                g: 0,
                b: 0,
                a: 255,
            },
        );
    }

    // Counts 123 and 124 scale to intensities 122 and 123 exactly
    // (123 * 255 / 256 and 124 * 255 / 256 are both representable), which
    // straddle the ramp threshold.
    #[test]
    fn ramp_threshold_boundary() {
        assert_eq!(
            colour(123),
            Rgba {
                r: 0,
                g: 122,
                b: 0,
                a: 255,
            },
        );
        assert_eq!(
            colour(124),
            Rgba {
                r: 123,
                g: 1,
                b: 123,
                a: 255,
            },
        );
    }

    #[test]
    fn highest_escaping_count_is_magenta() {
        let pixel = colour(MAX_ITERATIONS - 1);
        assert_eq!(pixel.g, 1);
        assert_eq!(pixel.r, pixel.b);
        assert!(pixel.r > RAMP_THRESHOLD);
    }

    #[test]
    fn every_count_is_opaque() {
        for count in 0..=MAX_ITERATIONS {
            assert_eq!(colour(count).a, 255);
        }
    }
}
