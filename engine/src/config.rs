use crate::error::ConfigError;

pub const DEFAULT_DISPLAY_WIDTH: u32 = 800;
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 600;
pub const DEFAULT_CELL_PITCH: u32 = 20;

/// Construction-time settings. The grid is `display / pitch` cells in each
/// direction; any remainder of the display area is left uncovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub display_width: u32,
    pub display_height: u32,
    pub cell_pitch: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            display_width: DEFAULT_DISPLAY_WIDTH,
            display_height: DEFAULT_DISPLAY_HEIGHT,
            cell_pitch: DEFAULT_CELL_PITCH,
        }
    }
}

impl SimulationConfig {
    pub fn new(display_width: u32, display_height: u32) -> Self {
        Self {
            display_width,
            display_height,
            ..Self::default()
        }
    }

    pub fn with_cell_pitch(mut self, cell_pitch: u32) -> Self {
        self.cell_pitch = cell_pitch;
        self
    }

    /// Returns `(cols, rows)`.
    pub fn grid_size(&self) -> Result<(usize, usize), ConfigError> {
        if self.cell_pitch == 0 {
            return Err(ConfigError::ZeroPitch);
        }
        let cols = (self.display_width / self.cell_pitch) as usize;
        let rows = (self.display_height / self.cell_pitch) as usize;
        if cols == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.display_width,
                height: self.display_height,
                pitch: self.cell_pitch,
            });
        }
        Ok((cols, rows))
    }
}
