/*!
8-wide lane arithmetic.

The escape-time kernel is written once against [`LaneBackend`] and
instantiated with one of two backends: [`avx::Avx`], which maps each
operation onto a single AVX/AVX2 instruction, and [`portable::Portable`],
a plain `[f32; 8]` / `[i32; 8]` loop with the same semantics.

Lane ordering is fixed: index 0 of [`LaneBackend::from_array`] is lane 0,
the lane holding the lowest-x sample of a pixel group, and the backends
must agree on it. The AVX backend uses `_mm256_setr_ps` (memory-order
arguments) rather than `_mm256_set_ps` so both backends take their
arguments in the same order.

Comparison results are masks (all-ones or all-zeros per element), never
booleans; `increment_where` relies on the all-ones encoding being -1 as
an integer.
*/

/// Number of elements processed per lane operation.
pub const LANE_WIDTH: usize = 8;

/// One 8-wide vector backend: an f32 lane, an i32 lane, and the mask
/// produced by comparing f32 lanes.
///
/// All operations are total, allocation-free, and by-value.
pub trait LaneBackend {
    type F32: Copy;
    type I32: Copy;
    type Mask: Copy;

    /// Backend name for logs.
    const NAME: &'static str;

    /// Broadcast a scalar into every lane.
    fn splat(value: f32) -> Self::F32;

    /// Build a lane from 8 scalars; `values[i]` becomes lane `i`.
    fn from_array(values: [f32; LANE_WIDTH]) -> Self::F32;

    fn add(a: Self::F32, b: Self::F32) -> Self::F32;
    fn sub(a: Self::F32, b: Self::F32) -> Self::F32;
    fn mul(a: Self::F32, b: Self::F32) -> Self::F32;
    fn div(a: Self::F32, b: Self::F32) -> Self::F32;

    /// Per-element `a < b`, as an all-ones/all-zeros mask.
    fn less_than(a: Self::F32, b: Self::F32) -> Self::Mask;

    /// One bit per lane (the element's sign bit); 0 means every lane is
    /// false, which is the kernel's group-level early-exit condition.
    fn mask_to_bits(mask: Self::Mask) -> u32;

    /// All-zero integer lane.
    fn zeroed() -> Self::I32;

    /// Add 1 to each lane where `mask` is true. The all-ones mask element
    /// reads as -1, so this is an integer subtract of the mask.
    fn increment_where(counts: Self::I32, mask: Self::Mask) -> Self::I32;

    fn i32_to_array(lane: Self::I32) -> [i32; LANE_WIDTH];
    fn f32_to_array(lane: Self::F32) -> [f32; LANE_WIDTH];
}

pub mod portable {
    //! Array-emulated lanes. No target-feature requirements; the compiler
    //! is free to auto-vectorize the element loops.

    use super::{LaneBackend, LANE_WIDTH};

    #[derive(Clone, Copy, Debug)]
    pub struct F32x8(pub(crate) [f32; LANE_WIDTH]);

    #[derive(Clone, Copy, Debug)]
    pub struct I32x8(pub(crate) [i32; LANE_WIDTH]);

    /// Per-element -1 (true) or 0 (false), mirroring the bit pattern an
    /// AVX compare leaves in a register.
    #[derive(Clone, Copy, Debug)]
    pub struct Mask8(pub(crate) [i32; LANE_WIDTH]);

    pub struct Portable;

    impl LaneBackend for Portable {
        type F32 = F32x8;
        type I32 = I32x8;
        type Mask = Mask8;

        const NAME: &'static str = "portable";

        fn splat(value: f32) -> F32x8 {
            F32x8([value; LANE_WIDTH])
        }

        fn from_array(values: [f32; LANE_WIDTH]) -> F32x8 {
            F32x8(values)
        }

        fn add(a: F32x8, b: F32x8) -> F32x8 {
            let mut out = [0.0; LANE_WIDTH];
            for i in 0..LANE_WIDTH {
                out[i] = a.0[i] + b.0[i];
            }
            F32x8(out)
        }

        fn sub(a: F32x8, b: F32x8) -> F32x8 {
            let mut out = [0.0; LANE_WIDTH];
            for i in 0..LANE_WIDTH {
                out[i] = a.0[i] - b.0[i];
            }
            F32x8(out)
        }

        fn mul(a: F32x8, b: F32x8) -> F32x8 {
            let mut out = [0.0; LANE_WIDTH];
            for i in 0..LANE_WIDTH {
                out[i] = a.0[i] * b.0[i];
            }
            F32x8(out)
        }

        fn div(a: F32x8, b: F32x8) -> F32x8 {
            let mut out = [0.0; LANE_WIDTH];
            for i in 0..LANE_WIDTH {
                out[i] = a.0[i] / b.0[i];
            }
            F32x8(out)
        }

        fn less_than(a: F32x8, b: F32x8) -> Mask8 {
            let mut out = [0; LANE_WIDTH];
            for i in 0..LANE_WIDTH {
                out[i] = if a.0[i] < b.0[i] { -1 } else { 0 };
            }
            Mask8(out)
        }

        fn mask_to_bits(mask: Mask8) -> u32 {
            let mut bits = 0;
            for i in 0..LANE_WIDTH {
                bits |= ((mask.0[i] as u32) >> 31) << i;
            }
            bits
        }

        fn zeroed() -> I32x8 {
            I32x8([0; LANE_WIDTH])
        }

        fn increment_where(counts: I32x8, mask: Mask8) -> I32x8 {
            let mut out = [0; LANE_WIDTH];
            for i in 0..LANE_WIDTH {
                out[i] = counts.0[i] - mask.0[i];
            }
            I32x8(out)
        }

        fn i32_to_array(lane: I32x8) -> [i32; LANE_WIDTH] {
            lane.0
        }

        fn f32_to_array(lane: F32x8) -> [f32; LANE_WIDTH] {
            lane.0
        }
    }
}

#[cfg(target_arch = "x86_64")]
pub mod avx {
    //! Hardware lanes on AVX/AVX2 registers.
    //!
    //! Every operation here lowers to one 256-bit instruction. The
    //! intrinsics are only defined on CPUs with AVX2 (`_mm256_sub_epi32`
    //! needs it), so this backend must not be instantiated unless
    //! `is_x86_feature_detected!("avx2")` has returned true;
    //! [`crate::kernel::Variant::detect`] is the only place that selects
    //! it.

    use std::arch::x86_64::{
        __m256, __m256i, _mm256_add_ps, _mm256_castps_si256, _mm256_cmp_ps, _mm256_div_ps,
        _mm256_movemask_ps, _mm256_mul_ps, _mm256_set1_ps, _mm256_setr_ps, _mm256_setzero_si256,
        _mm256_storeu_ps, _mm256_storeu_si256, _mm256_sub_epi32, _mm256_sub_ps, _CMP_LT_OQ,
    };

    use super::{LaneBackend, LANE_WIDTH};

    pub struct Avx;

    impl LaneBackend for Avx {
        type F32 = __m256;
        type I32 = __m256i;
        type Mask = __m256;

        const NAME: &'static str = "avx2";

        fn splat(value: f32) -> __m256 {
            unsafe { _mm256_set1_ps(value) }
        }

        fn from_array(values: [f32; LANE_WIDTH]) -> __m256 {
            unsafe {
                _mm256_setr_ps(
                    values[0], values[1], values[2], values[3], values[4], values[5], values[6],
                    values[7],
                )
            }
        }

        fn add(a: __m256, b: __m256) -> __m256 {
            unsafe { _mm256_add_ps(a, b) }
        }

        fn sub(a: __m256, b: __m256) -> __m256 {
            unsafe { _mm256_sub_ps(a, b) }
        }

        fn mul(a: __m256, b: __m256) -> __m256 {
            unsafe { _mm256_mul_ps(a, b) }
        }

        fn div(a: __m256, b: __m256) -> __m256 {
            unsafe { _mm256_div_ps(a, b) }
        }

        fn less_than(a: __m256, b: __m256) -> __m256 {
            unsafe { _mm256_cmp_ps::<_CMP_LT_OQ>(a, b) }
        }

        fn mask_to_bits(mask: __m256) -> u32 {
            unsafe { _mm256_movemask_ps(mask) as u32 }
        }

        fn zeroed() -> __m256i {
            unsafe { _mm256_setzero_si256() }
        }

        fn increment_where(counts: __m256i, mask: __m256) -> __m256i {
            unsafe { _mm256_sub_epi32(counts, _mm256_castps_si256(mask)) }
        }

        fn i32_to_array(lane: __m256i) -> [i32; LANE_WIDTH] {
            let mut out = [0; LANE_WIDTH];
            unsafe { _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, lane) };
            out
        }

        fn f32_to_array(lane: __m256) -> [f32; LANE_WIDTH] {
            let mut out = [0.0; LANE_WIDTH];
            unsafe { _mm256_storeu_ps(out.as_mut_ptr(), lane) };
            out
        }
    }
}
