//! Grid coverage resolution.
//!
//! [`coverage`] answers, exactly, which grid cells a triangle's projection
//! touches. The projected triangle and every cell square live in window-local
//! cell units, and each candidate cell inside the projection's bounding box
//! is tested with a separating-axis check carried out in rational arithmetic.
//! There are no epsilon comparisons anywhere: overlap is decided exactly.
//!
//! Boundary rule (fixed, relied upon by callers): a cell is covered iff the
//! cell square's *interior* overlaps the triangle's interior. Touching along
//! an edge or at a single vertex does not cover. Consequently a triangle edge
//! lying exactly on a grid line claims only the cells on its interior side,
//! so two triangles sharing a grid-aligned edge never claim the same cell.

use crate::camera::{Camera, CellId};
use crate::geom::Triangle;
use crate::rational::Rat;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use num_traits::{ToPrimitive, Zero};

type P2 = (Rat, Rat);

/// Signed parallelogram area of `(b - a) x (p - a)`.
fn edge(a: &P2, b: &P2, p: &P2) -> Rat {
    (&b.0 - &a.0) * (&p.1 - &a.1) - (&b.1 - &a.1) * (&p.0 - &a.0)
}

/// One separating-axis candidate with the triangle's projection interval
/// precomputed (it is the same for every cell).
struct AxisCheck {
    axis: P2,
    tri_min: Rat,
    tri_max: Rat,
}

impl AxisCheck {
    fn new(axis: P2, tri: &[P2; 3]) -> Self {
        let proj = |p: &P2| &axis.0 * &p.0 + &axis.1 * &p.1;
        let (a, b, c) = (proj(&tri[0]), proj(&tri[1]), proj(&tri[2]));
        let tri_min = a.clone().min(b.clone()).min(c.clone());
        let tri_max = a.max(b).max(c);
        Self {
            axis,
            tri_min,
            tri_max,
        }
    }

    /// True if this axis strictly separates the triangle from the unit cell
    /// square at `(col, row)`. Intervals that merely touch count as
    /// separated, which is what makes coverage an interior-overlap test.
    fn separates(&self, col: usize, row: usize) -> bool {
        let c = Rat::from_integer(col.into());
        let r = Rat::from_integer(row.into());
        let one = Rat::from_integer(1.into());
        let corners = [
            (c.clone(), r.clone()),
            (&c + &one, r.clone()),
            (&c + &one, &r + &one),
            (c, &r + &one),
        ];
        let proj = |p: &P2| &self.axis.0 * &p.0 + &self.axis.1 * &p.1;
        let mut sq_min = proj(&corners[0]);
        let mut sq_max = sq_min.clone();
        for p in &corners[1..] {
            let v = proj(p);
            if v < sq_min {
                sq_min = v;
            } else if v > sq_max {
                sq_max = v;
            }
        }
        self.tri_max <= sq_min || sq_max <= self.tri_min
    }
}

/// Clips `[lo, hi]` (cell units) to the grid range `[0, max)` and returns the
/// half-open index range of candidate cells, or `None` when the interval has
/// no interior inside the grid.
fn cell_range(lo: &Rat, hi: &Rat, max: usize) -> Option<(usize, usize)> {
    let max_r = Rat::from_integer(max.into());
    if *hi <= Rat::zero() || *lo >= max_r {
        return None;
    }
    let lo_idx = lo
        .clone()
        .max(Rat::zero())
        .floor()
        .to_integer()
        .to_usize()
        .unwrap_or(0);
    let hi_idx = hi
        .clone()
        .min(max_r)
        .ceil()
        .to_integer()
        .to_usize()
        .unwrap_or(max)
        .min(max);
    Some((lo_idx, hi_idx))
}

/// Exact set of grid cells whose square intersects the projection of `tri`
/// onto the camera's screen window.
///
/// Pure over its inputs; exposed independently of full scene rendering so
/// coverage can be verified in isolation. A triangle seen edge-on (zero
/// projected area), or one with a vertex whose viewing ray never meets the
/// window plane, yields the empty set rather than an error.
pub fn coverage(tri: &Triangle, cam: &Camera) -> BTreeSet<CellId> {
    let mut cells = BTreeSet::new();

    let (Some(a), Some(b), Some(c)) = (
        cam.window_coords(&tri.p),
        cam.window_coords(&tri.q),
        cam.window_coords(&tri.r),
    ) else {
        // A vertex whose viewing ray never meets the window plane.
        return cells;
    };
    let tri2: [P2; 3] = [a, b, c];

    // Degenerate projection: empty coverage, not an error.
    if edge(&tri2[0], &tri2[1], &tri2[2]).is_zero() {
        return cells;
    }

    let u_min = tri2[0].0.clone().min(tri2[1].0.clone()).min(tri2[2].0.clone());
    let u_max = tri2[0].0.clone().max(tri2[1].0.clone()).max(tri2[2].0.clone());
    let v_min = tri2[0].1.clone().min(tri2[1].1.clone()).min(tri2[2].1.clone());
    let v_max = tri2[0].1.clone().max(tri2[1].1.clone()).max(tri2[2].1.clone());

    let Some((col_lo, col_hi)) = cell_range(&u_min, &u_max, cam.width()) else {
        return cells;
    };
    let Some((row_lo, row_hi)) = cell_range(&v_min, &v_max, cam.height()) else {
        return cells;
    };

    let checks = axis_checks(&tri2);

    for row in row_lo..row_hi {
        for col in col_lo..col_hi {
            if checks.iter().all(|c| !c.separates(col, row)) {
                cells.insert(CellId::new(row, col));
            }
        }
    }

    cells
}

/// The five candidate axes: the square's x/y axes plus the three triangle
/// edge normals. For a pair of convex polygons these are exhaustive.
fn axis_checks(tri: &[P2; 3]) -> Vec<AxisCheck> {
    let one = Rat::from_integer(1.into());
    let mut checks = Vec::with_capacity(5);
    checks.push(AxisCheck::new((one.clone(), Rat::zero()), tri));
    checks.push(AxisCheck::new((Rat::zero(), one), tri));
    for i in 0..3 {
        let a = &tri[i];
        let b = &tri[(i + 1) % 3];
        // Perpendicular of the edge direction. Never zero here: a triangle
        // with coincident vertices has zero area and was rejected earlier.
        let axis = (&a.1 - &b.1, &b.0 - &a.0);
        checks.push(AxisCheck::new(axis, tri));
    }
    checks
}
