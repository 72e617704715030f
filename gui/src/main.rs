use eframe::egui;
use eframe::run_native;
use life_engine::{CellState, EventSender, Grid, InputEvent, Renderer, Simulation, SimulationConfig};
use std::sync::{Arc, Mutex};
use std::thread;

const DISPLAY_WIDTH: u32 = 800;
const DISPLAY_HEIGHT: u32 = 600;
const CELL_PITCH: u32 = 20;
const HEADER_HEIGHT: f32 = 48.0;

/// Latest frame handed over by the simulation thread.
struct Frame {
    grid: Grid,
    status: String,
}

/// Renderer for the simulation thread: publishes each snapshot to the UI
/// thread and asks egui for a repaint.
struct SharedFrame {
    latest: Arc<Mutex<Frame>>,
    ctx: egui::Context,
}

impl Renderer for SharedFrame {
    type Error = anyhow::Error;

    fn render(&mut self, grid: &Grid, status: &str) -> anyhow::Result<()> {
        let mut frame = self
            .latest
            .lock()
            .map_err(|_| anyhow::anyhow!("frame lock poisoned"))?;
        frame.grid.clone_from(grid);
        frame.status.clear();
        frame.status.push_str(status);
        drop(frame);
        self.ctx.request_repaint();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SimulationConfig::new(DISPLAY_WIDTH, DISPLAY_HEIGHT).with_cell_pitch(CELL_PITCH);
    let mut simulation = Simulation::new(config)?;
    let events = simulation.sender();
    let latest = Arc::new(Mutex::new(Frame {
        grid: simulation.grid().snapshot(),
        status: simulation.status_text(),
    }));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([DISPLAY_WIDTH as f32, DISPLAY_HEIGHT as f32 + HEADER_HEIGHT])
            .with_resizable(false),
        ..Default::default()
    };

    run_native(
        "Game of Life",
        options,
        Box::new(move |cc| {
            let mut renderer = SharedFrame {
                latest: Arc::clone(&latest),
                ctx: cc.egui_ctx.clone(),
            };

            // The simulation loop runs unthrottled on its own thread until the
            // process exits or the frame lock is poisoned
            let spawned = thread::Builder::new()
                .name("simulation".into())
                .spawn(move || {
                    if let Err(err) = simulation.run(&mut renderer) {
                        log::error!("simulation stopped: {err}");
                    }
                });
            if let Err(err) = spawned {
                log::error!("failed to start simulation thread: {err}");
            }

            Ok(Box::new(GuiOfLife::new(cc, latest, events)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}

struct GuiOfLife {
    latest: Arc<Mutex<Frame>>,
    events: EventSender,
}

impl GuiOfLife {
    fn new(_cc: &eframe::CreationContext<'_>, latest: Arc<Mutex<Frame>>, events: EventSender) -> Self {
        Self { latest, events }
    }

    fn send(&self, event: InputEvent) {
        if let Err(err) = self.events.send(event) {
            log::warn!("{event:?}: {err}");
        }
    }

    fn forward_keys(&self, ctx: &egui::Context) {
        let keys: Vec<egui::Key> = ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });

        for key in keys {
            match key {
                egui::Key::Space => self.send(InputEvent::ToggleRunning),
                egui::Key::ArrowRight => self.send(InputEvent::Step),
                egui::Key::R => self.send(InputEvent::Randomize),
                _ => {}
            }
        }
    }

    fn draw_grid(&self, ui: &mut egui::Ui, grid: &Grid) {
        let pitch = CELL_PITCH as f32;
        let (response, painter) = ui.allocate_painter(
            egui::vec2(pitch * grid.cols() as f32, pitch * grid.rows() as f32),
            egui::Sense::click(),
        );
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, egui::Color32::BLACK);
        for (x, y, cell) in grid.iter() {
            let pos = origin + egui::vec2(x as f32 * pitch, y as f32 * pitch);
            let rect = egui::Rect::from_min_size(pos, egui::vec2(pitch, pitch));
            match cell {
                CellState::Alive => painter.rect_filled(rect, 0.0, egui::Color32::WHITE),
                CellState::Dead => painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, egui::Color32::WHITE)),
            };
        }

        let pressed_at = ui.input(|input| {
            input
                .pointer
                .primary_pressed()
                .then(|| input.pointer.interact_pos())
                .flatten()
        });
        if let Some(pos) = pressed_at.filter(|pos| response.rect.contains(*pos)) {
            let offset = pos - origin;
            self.send(InputEvent::PointerDown {
                x: offset.x.max(0.0) as u32,
                y: offset.y.max(0.0) as u32,
            });
        }
    }
}

impl eframe::App for GuiOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.forward_keys(ctx);

        let (grid, status) = match self.latest.lock() {
            Ok(frame) => (frame.grid.snapshot(), frame.status.clone()),
            Err(_) => return,
        };

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(&status);
                    if ui.button("Randomize").clicked() {
                        self.send(InputEvent::Randomize);
                    }
                });

                self.draw_grid(ui, &grid);
            });
    }
}
