use crate::grid::Grid;

/// Discrete events delivered by the windowing side. Key events are expected
/// once per press; auto-repeat must be filtered before they get here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ToggleRunning,
    Step,
    /// Pointer press in display pixels, origin at the grid's top-left corner.
    PointerDown { x: u32, y: u32 },
    Randomize,
}

/// Side length of one cell in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPitch(u32);

impl CellPitch {
    /// `None` for a zero pitch.
    pub fn new(pixels: u32) -> Option<Self> {
        (pixels > 0).then_some(CellPitch(pixels))
    }

    pub fn pixels(&self) -> u32 {
        self.0
    }

    /// Maps a pixel position to the cell under it, or `None` when the
    /// position is past the last full cell (the display area need not be a
    /// multiple of the pitch).
    pub fn locate(&self, grid: &Grid, x: u32, y: u32) -> Option<(usize, usize)> {
        let cell_x = (x / self.0) as usize;
        let cell_y = (y / self.0) as usize;
        grid.contains(cell_x, cell_y).then_some((cell_x, cell_y))
    }
}
