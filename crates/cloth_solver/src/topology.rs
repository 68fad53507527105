//! Grid layout of the cloth: particle indexing, the two constraint passes
//! and the triangle decomposition handed to the renderer.
//!
//! Each quad is split along its anti-diagonal:
//!
//! ```text
//! (x,y)   *--* (x+1,y)
//!         | /|
//!         |/ |
//! (x,y+1) *--* (x+1,y+1)
//! ```

use itertools::iproduct;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width_count: usize,
    pub height_count: usize,
}

impl GridSize {
    pub fn new(width_count: usize, height_count: usize) -> Self {
        Self {
            width_count,
            height_count,
        }
    }

    pub fn len(&self) -> usize {
        self.width_count * self.height_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of the particle in column `x`, row `y`.
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width_count + x
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width_count, index / self.width_count)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width_count && y < self.height_count
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Neighbours one cell apart, including both quad diagonals.
    Structural,
    /// Neighbours two cells apart.
    Bend,
}

impl ConstraintKind {
    fn reach(self) -> usize {
        match self {
            ConstraintKind::Structural => 1,
            ConstraintKind::Bend => 2,
        }
    }
}

/// Index pairs for one constraint pass, in construction order.
///
/// Columns are the outer loop. Per particle: right, below, main diagonal,
/// anti-diagonal.
pub fn constraint_pairs(grid: GridSize, kind: ConstraintKind) -> Vec<(usize, usize)> {
    let d = kind.reach();
    let mut pairs = Vec::with_capacity(constraint_count(grid, kind));
    for (x, y) in iproduct!(0..grid.width_count, 0..grid.height_count) {
        let has_right = x + d < grid.width_count;
        let has_below = y + d < grid.height_count;
        if has_right {
            pairs.push((grid.index(x, y), grid.index(x + d, y)));
        }
        if has_below {
            pairs.push((grid.index(x, y), grid.index(x, y + d)));
        }
        if has_right && has_below {
            pairs.push((grid.index(x, y), grid.index(x + d, y + d)));
            pairs.push((grid.index(x + d, y), grid.index(x, y + d)));
        }
    }
    pairs
}

pub fn structural_pairs(grid: GridSize) -> Vec<(usize, usize)> {
    constraint_pairs(grid, ConstraintKind::Structural)
}

pub fn bend_pairs(grid: GridSize) -> Vec<(usize, usize)> {
    constraint_pairs(grid, ConstraintKind::Bend)
}

/// Closed-form size of [`constraint_pairs`].
pub fn constraint_count(grid: GridSize, kind: ConstraintKind) -> usize {
    let d = kind.reach();
    let w = grid.width_count;
    let h = grid.height_count;
    let wd = w.saturating_sub(d);
    let hd = h.saturating_sub(d);
    wd * h + w * hd + 2 * wd * hd
}

pub fn structural_count(grid: GridSize) -> usize {
    constraint_count(grid, ConstraintKind::Structural)
}

pub fn bend_count(grid: GridSize) -> usize {
    constraint_count(grid, ConstraintKind::Bend)
}

/// Colour hint for a triangle, alternating per column. Carries no physics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

impl Shade {
    pub fn for_column(x: usize) -> Self {
        if x % 2 == 0 {
            Shade::Light
        } else {
            Shade::Dark
        }
    }

    pub fn rgb(self) -> [f32; 3] {
        match self {
            Shade::Light => [1.0, 1.0, 1.0],
            Shade::Dark => [0.6, 0.2, 0.2],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub shade: Shade,
}

/// Two triangles per grid quad, same order and winding for wind, shading
/// and rendering.
pub fn triangles(grid: GridSize) -> impl Iterator<Item = Triangle> {
    let quads_x = grid.width_count.saturating_sub(1);
    let quads_y = grid.height_count.saturating_sub(1);
    iproduct!(0..quads_x, 0..quads_y).flat_map(move |(x, y)| {
        let shade = Shade::for_column(x);
        [
            Triangle {
                indices: [grid.index(x + 1, y), grid.index(x, y), grid.index(x, y + 1)],
                shade,
            },
            Triangle {
                indices: [
                    grid.index(x + 1, y + 1),
                    grid.index(x + 1, y),
                    grid.index(x, y + 1),
                ],
                shade,
            },
        ]
    })
}
