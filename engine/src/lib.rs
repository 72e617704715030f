/*!
* A live cell dies if it has fewer than two live neighbors.
* A live cell with two or three live neighbors lives on to the next generation.
* A live cell with more than three live neighbors dies.
* A dead cell will be brought back to live if it has exactly three live neighbors.
* Cells on the outer ring of the grid are dead after every generation.
*/
pub mod clock;
pub mod config;
pub mod control;
pub mod error;
pub mod grid;
pub mod input;
pub mod queue;
pub mod simulation;
pub mod transition;

pub use clock::SimulationClock;
pub use config::SimulationConfig;
pub use control::ControlState;
pub use error::{ConfigError, GridError, QueueError};
pub use grid::{CellState, Grid};
pub use input::{CellPitch, InputEvent};
pub use queue::{EventQueue, EventSender};
pub use simulation::{Renderer, Simulation};
pub use transition::next_generation;
