/*!
Real-time Mandelbrot renderer built around a data-parallel escape-time
kernel.

The kernel comes in three interchangeable variants — scalar reference,
AVX2 hardware lanes, and portable emulated lanes — that produce
bit-identical frames; see [`kernel`] and [`lane`]. [`frame::compute_frame`]
is the whole-frame entry point; everything else is windowing and
presentation glue around it.
*/

pub mod colour;
pub mod frame;
pub mod kernel;
pub mod lane;
pub mod pixel;
pub mod screen;
pub mod viewport;
