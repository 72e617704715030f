use bytemuck::{Pod, Zeroable};
use life_engine::{CellState, Grid};

use crate::font::{glyph_bits, FONT_HEIGHT, FONT_WIDTH};

pub const UI_HEIGHT: f32 = 60.0;
const BUTTON_WIDTH: f32 = 180.0;
const BUTTON_HEIGHT: f32 = 36.0;
const BUTTON_PADDING: f32 = 12.0;
const TEXT_SCALE_STATUS: f32 = 2.5;
const TEXT_SCALE_BUTTON: f32 = 3.0;
const OUTLINE: f32 = 1.0;
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    position: [f32; 2],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CellInstance {
    min: [f32; 2],
    max: [f32; 2],
    color: [f32; 3],
    _pad: f32,
}

#[derive(Copy, Clone)]
pub struct Rect {
    min: [f32; 2],
    max: [f32; 2],
}

impl Rect {
    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.min[0] && point[0] <= self.max[0] && point[1] >= self.min[1] && point[1] <= self.max[1]
    }
}

/// Turns a grid snapshot and status line into GPU vertex data. Buffers are
/// reused between frames.
pub struct FrameBuilder {
    window_size: [f32; 2],
    pitch: f32,
    pub cursor_position: Option<[f32; 2]>,
    cells: Vec<CellInstance>,
    ui_vertices: Vec<Vertex>,
}

impl FrameBuilder {
    pub fn new(window_size: [f32; 2], pitch: u32, cell_count: usize) -> Self {
        Self {
            window_size,
            pitch: pitch as f32,
            cursor_position: None,
            cells: Vec::with_capacity(cell_count * 2),
            ui_vertices: Vec::with_capacity(2048),
        }
    }

    pub fn resize(&mut self, window_size: [f32; 2]) {
        self.window_size = window_size;
    }

    pub fn button_rect(&self) -> Rect {
        let width = self.window_size[0].max(1.0);
        let top = (UI_HEIGHT - BUTTON_HEIGHT) * 0.5;
        Rect {
            min: [width - BUTTON_PADDING - BUTTON_WIDTH, top],
            max: [width - BUTTON_PADDING, top + BUTTON_HEIGHT],
        }
    }

    /// Dead cells are white outlines, live cells solid white.
    pub fn build(&mut self, grid: &Grid, status: &str) -> (&[CellInstance], &[Vertex]) {
        self.cells.clear();
        self.ui_vertices.clear();

        let [width, height] = [self.window_size[0].max(1.0), self.window_size[1].max(1.0)];
        let pitch = self.pitch;

        for (x, y, cell) in grid.iter() {
            let left = x as f32 * pitch;
            let top = UI_HEIGHT + y as f32 * pitch;
            let outer = Rect {
                min: [left, top],
                max: [left + pitch, top + pitch],
            };
            self.cells.push(cell_instance(outer, WHITE, [width, height]));
            if cell == CellState::Dead {
                let inner = Rect {
                    min: [left + OUTLINE, top + OUTLINE],
                    max: [left + pitch - OUTLINE, top + pitch - OUTLINE],
                };
                self.cells.push(cell_instance(inner, BLACK, [width, height]));
            }
        }

        let header_line = Rect {
            min: [0.0, UI_HEIGHT - 4.0],
            max: [width, UI_HEIGHT],
        };
        push_rect(&mut self.ui_vertices, header_line, [0.15, 0.15, 0.2], [width, height]);

        let status_height = FONT_HEIGHT as f32 * TEXT_SCALE_STATUS;
        draw_text(
            &mut self.ui_vertices,
            status,
            [BUTTON_PADDING, (UI_HEIGHT - status_height) * 0.5],
            TEXT_SCALE_STATUS,
            [0.9, 0.9, 0.95],
            [width, height],
        );

        let button_rect = self.button_rect();
        let hovered = self.cursor_position.is_some_and(|pos| button_rect.contains(pos));
        let button_color = if hovered { [0.35, 0.45, 0.75] } else { [0.25, 0.33, 0.55] };
        push_rect(&mut self.ui_vertices, button_rect, button_color, [width, height]);

        let button_text = "Randomize";
        let text_width = text_pixel_width(button_text) * TEXT_SCALE_BUTTON;
        let text_height = FONT_HEIGHT as f32 * TEXT_SCALE_BUTTON;
        let origin_x = button_rect.min[0] + (button_rect.max[0] - button_rect.min[0] - text_width) * 0.5;
        let origin_y = button_rect.min[1] + (button_rect.max[1] - button_rect.min[1] - text_height) * 0.5;
        draw_text(
            &mut self.ui_vertices,
            button_text,
            [origin_x, origin_y],
            TEXT_SCALE_BUTTON,
            [0.95, 0.95, 0.98],
            [width, height],
        );

        (&self.cells, &self.ui_vertices)
    }
}

fn cell_instance(rect: Rect, color: [f32; 3], window_size: [f32; 2]) -> CellInstance {
    let [width, height] = window_size;
    CellInstance {
        min: [to_ndc(rect.min[0], width), to_ndc_y(rect.min[1], height)],
        max: [to_ndc(rect.max[0], width), to_ndc_y(rect.max[1], height)],
        color,
        _pad: 0.0,
    }
}

fn push_rect(vertices: &mut Vec<Vertex>, rect: Rect, color: [f32; 3], window_size: [f32; 2]) {
    let [width, height] = window_size;
    let x0 = to_ndc(rect.min[0], width);
    let y0 = to_ndc_y(rect.min[1], height);
    let x1 = to_ndc(rect.max[0], width);
    let y1 = to_ndc_y(rect.max[1], height);

    for position in [[x0, y1], [x1, y1], [x0, y0], [x0, y0], [x1, y1], [x1, y0]] {
        vertices.push(Vertex { position, color });
    }
}

fn to_ndc(x: f32, width: f32) -> f32 {
    (x / width) * 2.0 - 1.0
}

fn to_ndc_y(y: f32, height: f32) -> f32 {
    1.0 - (y / height) * 2.0
}

fn text_pixel_width(text: &str) -> f32 {
    let units: usize = text
        .to_uppercase()
        .chars()
        .filter(|&ch| ch == ' ' || glyph_bits(ch).is_some())
        .map(|_| FONT_WIDTH + 1)
        .sum();
    (units as f32 - 1.0).max(0.0)
}

fn draw_text(vertices: &mut Vec<Vertex>, text: &str, origin: [f32; 2], scale: f32, color: [f32; 3], window_size: [f32; 2]) {
    let advance = (FONT_WIDTH as f32 + 1.0) * scale;
    let mut cursor_x = origin[0];
    for ch in text.to_uppercase().chars() {
        if let Some(rows) = glyph_bits(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in (0..FONT_WIDTH).filter(|col| (bits >> (FONT_WIDTH - 1 - col)) & 1 == 1) {
                    let rect = Rect {
                        min: [cursor_x + col as f32 * scale, origin[1] + row as f32 * scale],
                        max: [cursor_x + (col as f32 + 1.0) * scale, origin[1] + (row as f32 + 1.0) * scale],
                    };
                    push_rect(vertices, rect, color, window_size);
                }
            }
        }
        cursor_x += advance;
    }
}
