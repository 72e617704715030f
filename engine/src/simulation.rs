use std::convert::Infallible;
use std::time::Instant;

use log::{debug, error, trace, warn};

use crate::clock::SimulationClock;
use crate::config::SimulationConfig;
use crate::control::ControlState;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::input::{CellPitch, InputEvent};
use crate::queue::{EventQueue, EventSender, DEFAULT_CAPACITY};
use crate::transition::next_generation;

/// The drawing side of the loop. `grid` is only borrowed for the call.
pub trait Renderer {
    type Error;

    fn render(&mut self, grid: &Grid, status: &str) -> Result<(), Self::Error>;
}

/// Owns the grid, control flags and clock, and advances them one iteration
/// per [`Simulation::tick`].
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    control: ControlState,
    clock: SimulationClock,
    pitch: CellPitch,
    generation: u64,
    events: EventQueue,
    sender: EventSender,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let (cols, rows) = config.grid_size()?;
        let pitch = CellPitch::new(config.cell_pitch).ok_or(ConfigError::ZeroPitch)?;
        debug!("simulation grid {cols}x{rows}, pitch {}px", pitch.pixels());
        Ok(Self::with_grid(Grid::new(cols, rows), pitch))
    }

    /// Starts paused from an existing grid.
    pub fn with_grid(grid: Grid, pitch: CellPitch) -> Self {
        let (sender, events) = EventQueue::bounded(DEFAULT_CAPACITY);
        Self {
            grid,
            control: ControlState::default(),
            clock: SimulationClock::default(),
            pitch,
            generation: 0,
            events,
            sender,
        }
    }

    /// A handle for feeding input from the event source.
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn pitch(&self) -> CellPitch {
        self.pitch
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status_text(&self) -> String {
        format!(
            "Running at {} FPS  (Running: {})",
            self.clock.rounded_fps(),
            self.control.running()
        )
    }

    /// Applies one event immediately. Events from other threads go through
    /// [`Simulation::sender`] and are applied at the start of the next tick.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::ToggleRunning => {
                let running = self.control.toggle_running();
                debug!("running: {running}");
            }
            InputEvent::Step => {
                self.control.request_step();
                trace!("step requested");
            }
            InputEvent::PointerDown { x, y } => self.edit_at(x, y),
            InputEvent::Randomize => {
                self.grid.randomize();
                debug!("randomized, population {}", self.grid.population());
            }
        }
    }

    fn edit_at(&mut self, x: u32, y: u32) {
        if !self.control.accepts_edits() {
            trace!("pointer at ({x}, {y}) ignored while running");
            return;
        }
        let Some((cell_x, cell_y)) = self.pitch.locate(&self.grid, x, y) else {
            trace!("pointer at ({x}, {y}) is outside the grid");
            return;
        };
        match self.grid.toggle(cell_x, cell_y) {
            Ok(state) => debug!("cell ({cell_x}, {cell_y}) -> {state:?}"),
            Err(err) => error!("{err}"),
        }
    }

    /// Advances one generation if running or a step is pending. Returns
    /// whether a transition happened; the step request is cleared either way.
    pub fn advance(&mut self) -> bool {
        if !self.control.take_step() {
            return false;
        }
        self.grid = next_generation(&self.grid);
        self.generation += 1;
        trace!(
            "generation {} population {}",
            self.generation,
            self.grid.population()
        );
        true
    }

    /// One loop iteration: apply queued input, maybe advance, render, then
    /// update the clock from the time the whole iteration took.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        let started = Instant::now();

        let pending: Vec<InputEvent> = self.events.drain().collect();
        for event in pending {
            self.apply(event);
        }

        self.advance();

        let status = self.status_text();
        renderer.render(&self.grid, &status)?;

        self.clock.record(started.elapsed());
        Ok(())
    }

    /// Ticks without pause or frame cap until the renderer fails.
    pub fn run<R: Renderer>(&mut self, renderer: &mut R) -> Result<Infallible, R::Error> {
        loop {
            if let Err(err) = self.tick(renderer) {
                warn!("renderer failed after generation {}", self.generation);
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueueError;
    use crate::grid::CellState::{Alive, Dead};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Grid, String)>,
    }

    impl Renderer for Recorder {
        type Error = Infallible;

        fn render(&mut self, grid: &Grid, status: &str) -> Result<(), Infallible> {
            self.frames.push((grid.snapshot(), status.to_owned()));
            Ok(())
        }
    }

    struct FailAfter(usize);

    impl Renderer for FailAfter {
        type Error = &'static str;

        fn render(&mut self, _grid: &Grid, _status: &str) -> Result<(), &'static str> {
            if self.0 == 0 {
                return Err("window closed");
            }
            self.0 -= 1;
            Ok(())
        }
    }

    fn simulation(cols: usize, rows: usize) -> Simulation {
        let pitch = CellPitch::new(20).expect("non-zero pitch");
        Simulation::with_grid(Grid::new(cols, rows), pitch)
    }

    #[test]
    fn builds_grid_from_config() -> Result<(), ConfigError> {
        let simulation = Simulation::new(SimulationConfig::new(100, 60))?;
        assert_eq!((simulation.grid().cols(), simulation.grid().rows()), (5, 3));
        assert!(!simulation.control().running());
        Ok(())
    }

    #[test]
    fn paused_tick_does_not_advance() {
        let mut simulation = simulation(5, 5);
        simulation.apply(InputEvent::PointerDown { x: 50, y: 50 });
        let mut recorder = Recorder::default();
        simulation.tick(&mut recorder).expect("infallible");
        assert_eq!(simulation.generation(), 0);
        assert_eq!(recorder.frames[0].0.get(2, 2), Ok(Alive));
    }

    #[test]
    fn toggle_is_dropped_while_running() {
        let mut simulation = simulation(5, 5);
        simulation.apply(InputEvent::ToggleRunning);
        let before = simulation.grid().snapshot();
        simulation.apply(InputEvent::PointerDown { x: 50, y: 50 });
        assert_eq!(simulation.grid(), &before);
    }

    #[test]
    fn pointer_outside_grid_is_ignored() {
        let mut simulation = simulation(5, 5);
        simulation.apply(InputEvent::PointerDown { x: 100, y: 0 });
        simulation.apply(InputEvent::PointerDown { x: 0, y: 119 });
        assert_eq!(simulation.grid().population(), 0);
    }

    #[test]
    fn queued_events_apply_before_the_transition() -> Result<(), QueueError> {
        let mut simulation = simulation(5, 5);
        let sender = simulation.sender();
        for (x, y) in [(2, 1), (2, 2), (2, 3)] {
            sender.send(InputEvent::PointerDown { x: x * 20, y: y * 20 })?;
        }
        sender.send(InputEvent::Step)?;

        let mut recorder = Recorder::default();
        simulation.tick(&mut recorder).expect("infallible");

        let frame = &recorder.frames[0].0;
        assert_eq!(simulation.generation(), 1);
        assert_eq!(frame.get(1, 2), Ok(Alive));
        assert_eq!(frame.get(2, 1), Ok(Dead));
        Ok(())
    }

    #[test]
    fn status_text_reports_fps_and_running() {
        let mut simulation = simulation(3, 3);
        assert_eq!(simulation.status_text(), "Running at 0 FPS  (Running: false)");
        simulation.apply(InputEvent::ToggleRunning);
        let mut recorder = Recorder::default();
        simulation.tick(&mut recorder).expect("infallible");
        assert!(recorder.frames[0].1.ends_with("(Running: true)"));
        assert!(simulation.clock().fps() > 0.0);
    }

    #[test]
    fn run_stops_on_render_error() {
        let mut simulation = simulation(4, 4);
        simulation.apply(InputEvent::ToggleRunning);
        let result = simulation.run(&mut FailAfter(3));
        assert_eq!(result.err(), Some("window closed"));
        // the failing iteration advanced before rendering
        assert_eq!(simulation.generation(), 4);
    }
}
