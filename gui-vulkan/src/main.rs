mod font;
mod frame;
mod gpu;

use std::sync::Arc;
use std::time::{Duration, Instant};

use frame::{CellInstance, FrameBuilder, Vertex, UI_HEIGHT};
use gpu::Gpu;
use life_engine::{EventSender, Grid, InputEvent, Renderer, Simulation, SimulationConfig};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

const DISPLAY_WIDTH: u32 = 800;
const DISPLAY_HEIGHT: u32 = 600;
const CELL_PITCH: u32 = 20;

/// Borrows the GPU state for the duration of one simulation tick.
struct WindowRenderer<'a> {
    gpu: &'a mut Gpu,
    frame: &'a mut FrameBuilder,
}

impl Renderer for WindowRenderer<'_> {
    type Error = wgpu::SurfaceError;

    fn render(&mut self, grid: &Grid, status: &str) -> Result<(), wgpu::SurfaceError> {
        let (cells, ui_vertices): (&[CellInstance], &[Vertex]) = self.frame.build(grid, status);
        self.gpu.render(cells, ui_vertices)
    }
}

fn key_event(event: &KeyEvent) -> Option<InputEvent> {
    match &event.logical_key {
        Key::Named(NamedKey::Space) => Some(InputEvent::ToggleRunning),
        Key::Named(NamedKey::ArrowRight) => Some(InputEvent::Step),
        Key::Character(text) if text.eq_ignore_ascii_case("R") => Some(InputEvent::Randomize),
        _ => None,
    }
}

struct VulkanApp {
    window_attrs: WindowAttributes,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    gpu: Option<Gpu>,
    frame: Option<FrameBuilder>,
    simulation: Simulation,
    events: EventSender,
    last_cursor: [f32; 2],
    frame_count: u32,
    last_fps_log: Instant,
}

impl VulkanApp {
    fn new(config: SimulationConfig) -> anyhow::Result<Self> {
        let simulation = Simulation::new(config)?;
        let events = simulation.sender();
        let attrs = Window::default_attributes()
            .with_title(simulation.status_text())
            .with_inner_size(PhysicalSize::new(config.display_width, config.display_height + UI_HEIGHT as u32))
            .with_resizable(false);
        Ok(Self {
            window_attrs: attrs,
            window: None,
            window_id: None,
            gpu: None,
            frame: None,
            simulation,
            events,
            last_cursor: [0.0, 0.0],
            frame_count: 0,
            last_fps_log: Instant::now(),
        })
    }

    fn send(&self, event: InputEvent) {
        if let Err(err) = self.events.send(event) {
            log::warn!("{event:?}: {err}");
        }
    }

    fn handle_press(&self, position: [f32; 2]) {
        if let Some(frame) = &self.frame {
            if frame.button_rect().contains(position) {
                self.send(InputEvent::Randomize);
                return;
            }
        }
        let [x, y] = [position[0], position[1] - UI_HEIGHT];
        if x >= 0.0 && y >= 0.0 {
            self.send(InputEvent::PointerDown { x: x as u32, y: y as u32 });
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(frame)) = (self.gpu.as_mut(), self.frame.as_mut()) else {
            return;
        };
        let mut renderer = WindowRenderer { gpu, frame };
        match self.simulation.tick(&mut renderer) {
            Ok(()) => self.frame_count += 1,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.gpu.size;
                renderer.gpu.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                event_loop.exit();
            }
            Err(err) => log::debug!("frame skipped: {err}"),
        }

        let elapsed = self.last_fps_log.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            log::info!("fps: {:.1}, generation {}", fps, self.simulation.generation());
            if let Some(window) = &self.window {
                window.set_title(&self.simulation.status_text());
            }
            self.frame_count = 0;
            self.last_fps_log = Instant::now();
        }
    }
}

impl ApplicationHandler<()> for VulkanApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(self.window_attrs.clone()) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let grid = self.simulation.grid();
        let cell_count = grid.cols() * grid.rows();
        // an outline and a fill per dead cell
        let gpu = match pollster::block_on(Gpu::new(window.clone(), cell_count * 2)) {
            Ok(gpu) => gpu,
            Err(err) => {
                log::error!("failed to create GPU state: {err:#}");
                event_loop.exit();
                return;
            }
        };
        let size = [gpu.size.width as f32, gpu.size.height as f32];
        self.frame = Some(FrameBuilder::new(size, self.simulation.pitch().pixels(), cell_count));
        window.request_redraw();

        self.window_id = Some(window.id());
        self.window = Some(window);
        self.gpu = Some(gpu);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if Some(window_id) != self.window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size);
                }
                if let Some(frame) = self.frame.as_mut() {
                    frame.resize([size.width as f32, size.height as f32]);
                }
            }
            WindowEvent::ScaleFactorChanged { mut inner_size_writer, .. } => {
                if let Some(gpu) = self.gpu.as_ref() {
                    let _ = inner_size_writer.request_inner_size(gpu.size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = [position.x as f32, position.y as f32];
                if let Some(frame) = self.frame.as_mut() {
                    frame.cursor_position = Some(self.last_cursor);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left && state == ElementState::Pressed {
                    self.handle_press(self.last_cursor);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let Some(input) = key_event(&event) {
                        self.send(input);
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::Poll);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = SimulationConfig::new(DISPLAY_WIDTH, DISPLAY_HEIGHT).with_cell_pitch(CELL_PITCH);
    let event_loop = EventLoop::new()?;
    let mut app = VulkanApp::new(config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
