use log::{debug, info};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use simd_mandelbrot::{
    frame::compute_frame,
    kernel::Variant,
    pixel::PixelBuffer,
    screen::Screen,
    viewport::{Grid, InputEvent, Viewport},
};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn input_event(key: VirtualKeyCode) -> Option<InputEvent> {
    match key {
        VirtualKeyCode::Right => Some(InputEvent::PanRight),
        VirtualKeyCode::Left => Some(InputEvent::PanLeft),
        VirtualKeyCode::Up => Some(InputEvent::PanUp),
        VirtualKeyCode::Down => Some(InputEvent::PanDown),
        VirtualKeyCode::Equals => Some(InputEvent::ZoomIn),
        VirtualKeyCode::Minus => Some(InputEvent::ZoomOut),
        _ => None,
    }
}

fn main() {
    env_logger::init();

    let grid = Grid::new(WIDTH, HEIGHT);
    let mut viewport = Viewport::default();
    let variant = Variant::detect();
    info!("escape-time kernel variant: {}", variant.name());

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Mandelbrot")
        .with_inner_size(PhysicalSize::new(grid.width, grid.height))
        .with_resizable(false)
        .build(&event_loop)
        .unwrap();

    let mut screen = Screen::new(&window, grid);
    let mut pixels = PixelBuffer::new(grid);

    event_loop.run(move |event, _, control_flow| {
        // To present frames in realtime, *don't* set `control_flow` to `Wait`.
        match event {
            Event::MainEventsCleared => {
                // And `request_redraw` once we've cleared all events for the frame.
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    debug!("resizing to {:?}", size);
                    screen.resize(size);
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Released,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    if let Some(event) = input_event(key) {
                        viewport.apply(event, grid.pixel_step());
                        debug!("viewport now {:?}", viewport);
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                compute_frame(&mut pixels, grid, &viewport, variant);
                screen.present(&pixels);
            }
            _ => {}
        }
    });
}
