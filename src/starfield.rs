//! Decorative header animation: stars drifting toward the viewer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Depth at which a star is treated as having passed the viewer.
const NEAR: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Horizontal position in `[-1, 1]`.
    pub x: f32,
    /// Vertical position in `[-1, 1]`.
    pub y: f32,
    /// Depth in `(0, 1]`; smaller is closer.
    pub z: f32,
}

/// A star projected onto a `width` x `height` cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub col: u16,
    pub row: u16,
    pub glyph: char,
}

pub struct Starfield {
    stars: Vec<Star>,
    speed: f32,
    rng: StdRng,
}

impl Starfield {
    /// `seed` fixes the layout for tests; `None` seeds from the OS.
    pub fn new(count: usize, speed: f32, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let stars = (0..count)
            .map(|_| {
                let z = rng.random_range(NEAR..=1.0);
                spawn(&mut rng, z)
            })
            .collect();
        Self { stars, speed, rng }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Advance one frame. Stars that pass the viewer or leave the frustum
    /// respawn at the far plane.
    pub fn tick(&mut self) {
        for i in 0..self.stars.len() {
            let star = &mut self.stars[i];
            star.z -= self.speed;
            if star.z <= NEAR || project(star, 2, 2).is_none() {
                self.stars[i] = spawn(&mut self.rng, 1.0);
            }
        }
    }

    /// Cells to light on a `width` x `height` grid, nearest stars brightest.
    pub fn cells(&self, width: u16, height: u16) -> Vec<Cell> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        self.stars
            .iter()
            .filter_map(|s| {
                let (col, row) = project(s, width, height)?;
                Some(Cell {
                    col,
                    row,
                    glyph: glyph(s.z),
                })
            })
            .collect()
    }
}

fn spawn(rng: &mut StdRng, z: f32) -> Star {
    Star {
        x: rng.random_range(-1.0..=1.0),
        y: rng.random_range(-1.0..=1.0),
        z,
    }
}

/// Perspective projection: screen offset grows as depth shrinks.
fn project(star: &Star, width: u16, height: u16) -> Option<(u16, u16)> {
    let sx = star.x / star.z;
    let sy = star.y / star.z;
    if !(-1.0..=1.0).contains(&sx) || !(-1.0..=1.0).contains(&sy) {
        return None;
    }
    let col = ((sx + 1.0) / 2.0 * f32::from(width - 1)).round() as u16;
    let row = ((sy + 1.0) / 2.0 * f32::from(height - 1)).round() as u16;
    Some((col, row))
}

fn glyph(z: f32) -> char {
    match z {
        z if z < 0.25 => '*',
        z if z < 0.5 => '+',
        z if z < 0.75 => '·',
        _ => '.',
    }
}
