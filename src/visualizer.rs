//! Visualizer: frequency analysis of the live signal and the bar chart
//! geometry painted every frame.

mod analyser;

pub use analyser::Analyser;

/// Fixed height of the drawing surface, in surface units.
pub const SURFACE_HEIGHT: f64 = 50.0;

/// Gap left between neighbouring bars, in surface units.
pub const BAR_GAP: f64 = 2.0;

/// Surface units per terminal column (braille cells are two dots wide).
pub const UNITS_PER_COLUMN: f64 = 2.0;

/// The logical drawing surface. Height is fixed; width tracks the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: SURFACE_HEIGHT,
        }
    }
}

impl Surface {
    pub fn resize(&mut self, viewport_columns: u16) {
        self.width = f64::from(viewport_columns) * UNITS_PER_COLUMN;
        self.height = SURFACE_HEIGHT;
    }
}

/// One filled rectangle, anchored at its top-left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Lay out one bar per bin: `surface.width / bins` wide minus the gap and
/// `value / 2` tall, standing on the bottom edge.
pub fn bars(bins: &[u8], surface: &Surface) -> Vec<Bar> {
    if bins.is_empty() {
        return Vec::new();
    }
    let step = surface.width / bins.len() as f64;
    let width = step - BAR_GAP;
    if width <= 0.0 {
        return Vec::new();
    }

    bins.iter()
        .enumerate()
        .map(|(i, &v)| {
            let height = f64::from(v) / 2.0;
            Bar {
                x: i as f64 * step,
                y: surface.height - height,
                width,
                height,
            }
        })
        .collect()
}
