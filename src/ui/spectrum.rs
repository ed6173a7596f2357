use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::visualizer::{Bar, Surface};

// Braille dot positions per character cell (2 wide x 4 tall):
//   col0: bits 0,1,2,6  (top to bottom)
//   col1: bits 3,4,5,7  (top to bottom)
const BRAILLE_BASE: u32 = 0x2800;
const BRAILLE_DOTS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Paints filled bars from surface coordinates onto a braille grid, one dot
/// per surface unit horizontally and the surface height stretched over the
/// available dot rows.
pub struct SpectrumWidget<'a> {
    bars: &'a [Bar],
    surface: Surface,
    block: Option<Block<'a>>,
    style: Style,
}

impl<'a> SpectrumWidget<'a> {
    pub fn new(bars: &'a [Bar], surface: Surface) -> Self {
        Self {
            bars,
            surface,
            block: None,
            style: Style::default().fg(Color::Cyan),
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let cols = inner.width as usize;
        let rows = inner.height as usize;
        let grid = rasterize(self.bars, &self.surface, cols, rows);

        for cy in 0..rows {
            for cx in 0..cols {
                let dots = grid[cy * cols + cx];
                if dots == 0 {
                    continue;
                }
                let ch = char::from_u32(BRAILLE_BASE + u32::from(dots)).unwrap_or(' ');
                let x = inner.x + cx as u16;
                let y = inner.y + cy as u16;
                buf[(x, y)].set_char(ch).set_style(self.style);
            }
        }
    }
}

/// Braille dot masks for a `cols` x `rows` cell grid, row-major.
pub(crate) fn rasterize(bars: &[Bar], surface: &Surface, cols: usize, rows: usize) -> Vec<u8> {
    let mut grid = vec![0u8; cols * rows];
    let px_w = cols * 2;
    let px_h = rows * 4;
    if surface.width <= 0.0 || surface.height <= 0.0 || px_w == 0 || px_h == 0 {
        return grid;
    }
    let sx = px_w as f64 / surface.width;
    let sy = px_h as f64 / surface.height;

    for bar in bars {
        let x0 = (bar.x * sx).floor().max(0.0) as usize;
        let x1 = (((bar.x + bar.width) * sx).ceil() as usize).min(px_w);
        let y0 = (bar.y * sy).round().max(0.0) as usize;
        let y1 = (((bar.y + bar.height) * sy).round() as usize).min(px_h);
        for px in x0..x1 {
            for py in y0..y1 {
                grid[(py / 4) * cols + px / 2] |= BRAILLE_DOTS[px % 2][py % 4];
            }
        }
    }
    grid
}
