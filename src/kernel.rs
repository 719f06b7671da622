/*!
Escape-time iteration counting.

Three behavior-equivalent strategies: a scalar per-pixel reference
([`escape_count`]), and one lane kernel ([`escape_counts`]) written
against [`LaneBackend`] and instantiated for the AVX and portable
backends. All of them must report exactly the same count for every
sample; the integration tests compare whole frames.

The scalar loop breaks the instant a point escapes. Lanes cannot break
independently, so the lane kernel replaces the per-element early exit
with a per-lane "still inside" mask: the running counts are incremented
only where the mask is true, and the loop exits early only once every
lane has escaped. A lane that escapes at iteration `k` keeps its count
frozen at `k` while its neighbours continue.
*/

use crate::lane::{LaneBackend, LANE_WIDTH};

/// Iteration budget shared by every variant; a count equal to this is
/// the "never escaped" sentinel.
pub const MAX_ITERATIONS: u32 = 256;

/// Squared escape radius shared by every variant.
pub const ESCAPE_RADIUS_SQUARED: f32 = 100.0;

/// Which kernel strategy renders the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// One pixel at a time; the reference the lane kernels are tested
    /// against.
    Scalar,
    /// 8 pixels per loop iteration on AVX2 registers.
    #[cfg(target_arch = "x86_64")]
    Avx,
    /// 8 pixels per loop iteration on emulated array lanes.
    Portable,
}

impl Variant {
    /// Fastest variant the running CPU supports.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx2") {
            return Variant::Avx;
        }
        Variant::Portable
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Scalar => "scalar",
            #[cfg(target_arch = "x86_64")]
            Variant::Avx => crate::lane::avx::Avx::NAME,
            Variant::Portable => crate::lane::portable::Portable::NAME,
        }
    }
}

/// Iterations taken for the orbit seeded at `(x0, y0)` to leave the
/// escape radius, or `budget` if it never does.
pub fn escape_count(x0: f32, y0: f32, budget: u32, radius_squared: f32) -> u32 {
    let mut x = x0;
    let mut y = y0;
    let mut count = 0;

    while count < budget {
        let x_squared = x * x;
        let y_squared = y * y;
        let x_mul_y = x * y;

        if x_squared + y_squared >= radius_squared {
            break;
        }
        count += 1;

        x = x_squared - y_squared + x0;
        y = x_mul_y + x_mul_y + y0;
    }

    count
}

/// [`escape_count`] for 8 samples at once.
pub fn escape_counts<L: LaneBackend>(
    x0: L::F32,
    y0: L::F32,
    budget: u32,
    radius_squared: f32,
) -> [u32; LANE_WIDTH] {
    let limit = L::splat(radius_squared);

    let mut x = x0;
    let mut y = y0;
    let mut counts = L::zeroed();

    for _ in 0..budget {
        let x_squared = L::mul(x, x);
        let y_squared = L::mul(y, y);
        let x_mul_y = L::mul(x, y);

        let inside = L::less_than(L::add(x_squared, y_squared), limit);
        if L::mask_to_bits(inside) == 0 {
            break;
        }
        counts = L::increment_where(counts, inside);

        x = L::add(L::sub(x_squared, y_squared), x0);
        y = L::add(L::add(x_mul_y, x_mul_y), y0);
    }

    L::i32_to_array(counts).map(|count| count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::portable::Portable;

    // Seed (1, 1) escapes on the fourth test: orbit (1,1) -> (1,3) ->
    // (-7,7) -> (1,-97), all exact in f32.
    #[test]
    fn known_escape_count() {
        assert_eq!(escape_count(1.0, 1.0, MAX_ITERATIONS, ESCAPE_RADIUS_SQUARED), 3);
    }

    // The set contains the whole real interval [-2, 0.25], so points there
    // must exhaust the budget. Seeds chosen so the f32 orbit is exact or
    // converges to an attracting cycle.
    #[test]
    fn real_axis_interior_hits_the_sentinel() {
        for x0 in [-2.0, -1.35, -1.0, -0.5, 0.0, 0.25] {
            assert_eq!(
                escape_count(x0, 0.0, MAX_ITERATIONS, ESCAPE_RADIUS_SQUARED),
                MAX_ITERATIONS,
                "seed ({x0}, 0) should never escape",
            );
        }
    }

    #[test]
    fn far_exterior_escapes_immediately() {
        assert_eq!(escape_count(20.0, 0.0, MAX_ITERATIONS, ESCAPE_RADIUS_SQUARED), 0);
    }

    // Widening the radius can only delay escape.
    #[test]
    fn escape_iteration_is_monotonic_in_radius() {
        let seeds = [(0.5, 0.5), (-1.9, 0.4), (0.3, -0.7), (1.0, 1.0), (-0.1, 1.1)];
        for (x0, y0) in seeds {
            let mut previous = 0;
            for radius_squared in [4.0, 25.0, 100.0, 400.0] {
                let count = escape_count(x0, y0, MAX_ITERATIONS, radius_squared);
                assert!(
                    count >= previous,
                    "seed ({x0}, {y0}): count {count} under radius² {radius_squared} \
                     dropped below {previous}",
                );
                previous = count;
            }
        }
    }

    // The 8x1 golden fixture: seeds evenly spaced over [-1.85, -0.975] on
    // the real axis around the view centre, all interior, so every lane
    // reports the sentinel.
    #[test_log::test]
    fn golden_real_axis_lane() {
        let dx = 1.0 / 8.0;
        let x_begin = -8.0 / 2.0 * dx + crate::viewport::CENTRE.0;

        let mut xs = [0.0; LANE_WIDTH];
        for (i, x) in xs.iter_mut().enumerate() {
            *x = x_begin + i as f32 * dx;
        }
        assert_eq!(xs[0], -1.85);
        assert_eq!(xs[LANE_WIDTH - 1], -0.975);

        let counts = escape_counts::<Portable>(
            Portable::from_array(xs),
            Portable::splat(0.0),
            MAX_ITERATIONS,
            ESCAPE_RADIUS_SQUARED,
        );
        assert_eq!(counts, [MAX_ITERATIONS; LANE_WIDTH]);

        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx2") {
            use crate::lane::avx::Avx;
            let hardware = escape_counts::<Avx>(
                Avx::from_array(xs),
                Avx::splat(0.0),
                MAX_ITERATIONS,
                ESCAPE_RADIUS_SQUARED,
            );
            assert_eq!(hardware, counts);
        }
    }

    // Mixed lane: escaping and non-escaping seeds side by side, checked
    // against the scalar reference element by element.
    #[test_log::test]
    fn lane_counts_match_scalar_reference() {
        let xs = [-1.9, -1.2, -0.75, 0.0, 0.3, 0.5, 1.0, 2.0];
        let ys = [0.4, 0.8, 0.1, 0.0, -0.7, 0.5, 1.0, 2.0];

        let mut expected = [0u32; LANE_WIDTH];
        for i in 0..LANE_WIDTH {
            expected[i] = escape_count(xs[i], ys[i], MAX_ITERATIONS, ESCAPE_RADIUS_SQUARED);
        }

        let counts = escape_counts::<Portable>(
            Portable::from_array(xs),
            Portable::from_array(ys),
            MAX_ITERATIONS,
            ESCAPE_RADIUS_SQUARED,
        );
        assert_eq!(counts, expected);

        #[cfg(target_arch = "x86_64")]
        if is_x86_feature_detected!("avx2") {
            use crate::lane::avx::Avx;
            let hardware = escape_counts::<Avx>(
                Avx::from_array(xs),
                Avx::from_array(ys),
                MAX_ITERATIONS,
                ESCAPE_RADIUS_SQUARED,
            );
            assert_eq!(hardware, expected);
        }
    }

    #[test]
    fn detect_never_picks_scalar() {
        assert_ne!(Variant::detect(), Variant::Scalar);
    }
}
