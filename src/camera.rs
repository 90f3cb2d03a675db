//! Camera and screen window geometry.
//!
//! The camera model is a fixed rectangular screen window placed in world
//! space, not a perspective frustum: a world point projects to the exact
//! rational intersection of the ray from the eye through the point with the
//! window plane. Points behind the eye are unreachable by that ray and have
//! no projection.
//! Discretization into grid cells happens only at the very end, with an
//! inclusive-lower/exclusive-upper boundary rule.

use crate::geom::{Point3, Rotation, Vector3};
use crate::rational::{clamp_oom, rat, sqrt_oom, Rat};
use crate::Error;
use num_traits::{Signed, ToPrimitive, Zero};

/// Discrete address of one grid cell, ordered row-major.
///
/// `0 <= row < height` counts down from the window's top edge,
/// `0 <= col < width` counts right from its left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId {
    pub row: usize,
    pub col: usize,
}

impl CellId {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The camera's image plane: a planar rectangle in 3D world space.
///
/// Corners are stored explicitly; the constructor enforces that they actually
/// form a rectangle (perpendicular nonzero edges, fourth corner closing the
/// loop), which also guarantees planarity and nonzero area.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenWindow {
    top_left: Point3,
    top_right: Point3,
    bottom_left: Point3,
    bottom_right: Point3,
}

impl ScreenWindow {
    pub fn new(
        top_left: Point3,
        top_right: Point3,
        bottom_left: Point3,
        bottom_right: Point3,
    ) -> Result<Self, Error> {
        let u = top_right.sub(&top_left);
        let v = bottom_left.sub(&top_left);

        if u.is_zero() || v.is_zero() {
            return Err(Error::InvalidCameraGeometry(
                "screen window has a zero-length edge",
            ));
        }
        if !u.dot(&v).is_zero() {
            return Err(Error::InvalidCameraGeometry(
                "screen window edges are not perpendicular",
            ));
        }
        if bottom_right != top_left.add(&u).add(&v) {
            return Err(Error::InvalidCameraGeometry(
                "screen window corners do not close a planar rectangle",
            ));
        }

        Ok(Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }

    /// Axis-aligned window of `width x height` world units centered at
    /// `center`, lying in the plane `z = center.z`, with +y up.
    pub fn axis_aligned(center: &Point3, width: &Rat, height: &Rat) -> Result<Self, Error> {
        if !width.is_positive() || !height.is_positive() {
            return Err(Error::InvalidCameraGeometry(
                "screen window extents must be positive",
            ));
        }
        let hw = width * rat(1, 2);
        let hh = height * rat(1, 2);
        let corner = |sx: &Rat, sy: &Rat| {
            Point3::new(&center.x + sx, &center.y + sy, center.z.clone())
        };
        Self::new(
            corner(&-hw.clone(), &hh),
            corner(&hw, &hh),
            corner(&-hw.clone(), &-hh.clone()),
            corner(&hw, &-hh.clone()),
        )
    }

    /// Top edge vector, left to right, spanning the full window width.
    pub fn u_edge(&self) -> Vector3 {
        self.top_right.sub(&self.top_left)
    }

    /// Left edge vector, top to bottom, spanning the full window height.
    pub fn v_edge(&self) -> Vector3 {
        self.bottom_left.sub(&self.top_left)
    }

    /// Window-local coordinate origin (top-left corner).
    pub fn origin(&self) -> &Point3 {
        &self.top_left
    }

    /// Exact plane normal, `u x v`. Never zero for a valid window.
    pub fn normal(&self) -> Vector3 {
        self.u_edge().cross(&self.v_edge())
    }

    fn center(&self) -> Point3 {
        let half = rat(1, 2);
        self.top_left
            .add(&self.u_edge().scaled(&half))
            .add(&self.v_edge().scaled(&half))
    }

    fn translate(&mut self, d: &Vector3) {
        self.top_left = self.top_left.add(d);
        self.top_right = self.top_right.add(d);
        self.bottom_left = self.bottom_left.add(d);
        self.bottom_right = self.bottom_right.add(d);
    }

    fn rotate(&mut self, rot: &Rotation, center: &Point3) {
        self.top_left = rot.apply_point(&self.top_left, center);
        self.top_right = rot.apply_point(&self.top_right, center);
        self.bottom_left = rot.apply_point(&self.bottom_left, center);
        self.bottom_right = rot.apply_point(&self.bottom_right, center);
    }

    fn scale_about_center(&mut self, factor: &Rat) {
        let c = self.center();
        let scale = |p: &Point3| c.add(&p.sub(&c).scaled(factor));
        self.top_left = scale(&self.top_left);
        self.top_right = scale(&self.top_right);
        self.bottom_left = scale(&self.bottom_left);
        self.bottom_right = scale(&self.bottom_right);
    }
}

/// Viewpoint, screen window, grid resolution and precision setting.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    eye: Point3,
    window: ScreenWindow,
    width: usize,
    height: usize,
    oom: i32,
}

impl Camera {
    /// Builds a camera, validating its geometry.
    ///
    /// Fails with [`Error::InvalidCameraGeometry`] for a zero resolution or
    /// when the eye lies on the window plane (every viewing ray would then be
    /// parallel to or inside the plane). `oom` finer than the supported floor
    /// is clamped; the effective value is visible through [`Camera::oom`].
    pub fn new(
        eye: Point3,
        window: ScreenWindow,
        width: usize,
        height: usize,
        oom: i32,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCameraGeometry(
                "grid resolution must be nonzero",
            ));
        }
        if window.normal().dot(&eye.sub(window.origin())).is_zero() {
            return Err(Error::InvalidCameraGeometry(
                "eye lies on the screen window plane",
            ));
        }
        Ok(Self {
            eye,
            window,
            width,
            height,
            oom: clamp_oom(oom),
        })
    }

    pub fn eye(&self) -> &Point3 {
        &self.eye
    }

    pub fn window(&self) -> &ScreenWindow {
        &self.window
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Effective precision setting (after clamping).
    pub fn oom(&self) -> i32 {
        self.oom
    }

    /// Exact window-local coordinates of `p`, in cell units, unclipped.
    ///
    /// This is the intersection of the ray from the eye through `p` with the
    /// window plane, expressed so that `(0, 0)` is the top-left corner and
    /// `(width, height)` the bottom-right. `None` when the ray is parallel to
    /// the plane or points away from it (`p` behind the eye); intersecting
    /// the full line instead would mirror such points through the eye.
    pub fn window_coords(&self, p: &Point3) -> Option<(Rat, Rat)> {
        let n = self.window.normal();
        let dir = p.sub(&self.eye);
        let denom = n.dot(&dir);
        if denom.is_zero() {
            return None;
        }
        let t = n.dot(&self.window.origin().sub(&self.eye)) / denom;
        if !t.is_positive() {
            return None;
        }
        let hit = self.eye.add(&dir.scaled(&t));
        let rel = hit.sub(self.window.origin());

        let u_edge = self.window.u_edge();
        let v_edge = self.window.v_edge();
        let u = rel.dot(&u_edge) / u_edge.norm_sq() * Rat::from_integer(self.width.into());
        let v = rel.dot(&v_edge) / v_edge.norm_sq() * Rat::from_integer(self.height.into());
        Some((u, v))
    }

    /// Projects `p` to the grid cell it falls in, or `None` when the
    /// projection misses the window (or no projection exists).
    pub fn project(&self, p: &Point3) -> Option<CellId> {
        let (u, v) = self.window_coords(p)?;
        let w = Rat::from_integer(self.width.into());
        let h = Rat::from_integer(self.height.into());
        if u < Rat::zero() || u > w || v < Rat::zero() || v > h {
            return None;
        }
        Some(self.cell_of(&u, &v))
    }

    /// Maps window-local cell-unit coordinates to a cell.
    ///
    /// Inclusive-lower/exclusive-upper: a coordinate exactly on a cell
    /// boundary belongs to the higher-indexed cell, except on the far window
    /// boundary (`u == width`, `v == height`) which folds into the last cell
    /// so every in-window coordinate has a home.
    ///
    /// Callers must pass coordinates within `[0, width] x [0, height]`.
    pub fn cell_of(&self, u: &Rat, v: &Rat) -> CellId {
        debug_assert!(*u >= Rat::zero() && *v >= Rat::zero());
        let idx = |x: &Rat, max: usize| {
            x.floor()
                .to_integer()
                .to_usize()
                .unwrap_or(max)
                .min(max - 1)
        };
        CellId::new(idx(v, self.height), idx(u, self.width))
    }

    /// Moves eye and window together, preserving the window geometry.
    pub fn translate(&mut self, d: &Vector3) {
        self.eye = self.eye.add(d);
        self.window.translate(d);
    }

    /// Rotates the window about the eye. The eye stays fixed.
    pub fn rotate(&mut self, rot: &Rotation) {
        let eye = self.eye.clone();
        self.window.rotate(rot, &eye);
    }

    /// Scales the window about its center; `factor > 1` widens the field of
    /// view (zoom out), `factor < 1` narrows it (zoom in).
    ///
    /// Per-camera state; there is no global zoom.
    pub fn zoom(&mut self, factor: &Rat) -> Result<(), Error> {
        if !factor.is_positive() {
            return Err(Error::InvalidCameraGeometry(
                "zoom factor must be positive",
            ));
        }
        self.window.scale_about_center(factor);
        Ok(())
    }

    /// Exact squared distance from the eye to `p`.
    pub fn depth_sq(&self, p: &Point3) -> Rat {
        self.eye.dist_sq(p)
    }

    /// Distance from the eye to `p` at the camera's precision.
    pub fn depth(&self, p: &Point3) -> Result<Rat, Error> {
        sqrt_oom(&self.depth_sq(p), self.oom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::{rat, rat_i};

    fn p(x: i64, y: i64, z: i64) -> Point3 {
        Point3::new(rat_i(x), rat_i(y), rat_i(z))
    }

    /// Eye at (0,0,-75), 100x75 window centered at the origin in z=0,
    /// one cell per world unit.
    fn reference_camera() -> Camera {
        let window =
            ScreenWindow::axis_aligned(&p(0, 0, 0), &rat_i(100), &rat_i(75)).unwrap();
        Camera::new(p(0, 0, -75), window, 100, 75, -6).unwrap()
    }

    #[test]
    fn degenerate_windows_rejected() {
        // Zero-length edge.
        assert!(matches!(
            ScreenWindow::new(p(0, 0, 0), p(0, 0, 0), p(0, 1, 0), p(0, 1, 0)),
            Err(Error::InvalidCameraGeometry(_))
        ));
        // Collinear corners.
        assert!(matches!(
            ScreenWindow::new(p(0, 0, 0), p(1, 0, 0), p(2, 0, 0), p(3, 0, 0)),
            Err(Error::InvalidCameraGeometry(_))
        ));
        // Fourth corner off the plane.
        assert!(matches!(
            ScreenWindow::new(p(0, 0, 0), p(1, 0, 0), p(0, 1, 0), p(1, 1, 1)),
            Err(Error::InvalidCameraGeometry(_))
        ));
    }

    #[test]
    fn eye_on_window_plane_rejected() {
        let window =
            ScreenWindow::axis_aligned(&p(0, 0, 0), &rat_i(100), &rat_i(75)).unwrap();
        assert!(matches!(
            Camera::new(p(10, 10, 0), window, 100, 75, -6),
            Err(Error::InvalidCameraGeometry(_))
        ));
    }

    #[test]
    fn zero_resolution_rejected() {
        let window =
            ScreenWindow::axis_aligned(&p(0, 0, 0), &rat_i(100), &rat_i(75)).unwrap();
        assert!(matches!(
            Camera::new(p(0, 0, -75), window, 0, 75, -6),
            Err(Error::InvalidCameraGeometry(_))
        ));
    }

    #[test]
    fn precision_underflow_clamps() {
        let window =
            ScreenWindow::axis_aligned(&p(0, 0, 0), &rat_i(100), &rat_i(75)).unwrap();
        let cam = Camera::new(p(0, 0, -75), window, 100, 75, -1000).unwrap();
        assert_eq!(cam.oom(), crate::rational::MIN_OOM);
    }

    #[test]
    fn points_on_window_plane_project_to_themselves() {
        let cam = reference_camera();
        let (u, v) = cam.window_coords(&p(0, 0, 0)).unwrap();
        assert_eq!(u, rat_i(50));
        assert_eq!(v, rat(75, 2));
        assert_eq!(cam.project(&p(0, 0, 0)), Some(CellId::new(37, 50)));
    }

    #[test]
    fn perspective_scaling_behind_window() {
        let cam = reference_camera();
        // Point at z=75 is twice the eye-window distance away; its offset
        // from the axis halves on the window.
        let (u, v) = cam.window_coords(&p(40, 20, 75)).unwrap();
        assert_eq!(u, rat_i(70));
        assert_eq!(v, rat(55, 2));
    }

    #[test]
    fn off_window_projection_is_none() {
        let cam = reference_camera();
        assert_eq!(cam.project(&p(200, 0, 0)), None);
    }

    #[test]
    fn parallel_ray_is_none() {
        let cam = reference_camera();
        // Same z as the eye: the viewing ray never crosses the plane.
        assert_eq!(cam.window_coords(&p(1, 0, -75)), None);
    }

    #[test]
    fn point_behind_eye_is_none() {
        let cam = reference_camera();
        // The rays from the eye through these points lead away from the
        // window; the mirrored line intersection must not surface.
        assert_eq!(cam.window_coords(&p(0, 0, -150)), None);
        assert_eq!(cam.project(&p(10, 10, -100)), None);
    }

    #[test]
    fn far_boundary_folds_into_last_cell() {
        let cam = reference_camera();
        // Bottom-right window corner.
        assert_eq!(
            cam.project(&Point3::new(rat_i(50), rat(-75, 2), rat_i(0))),
            Some(CellId::new(74, 99))
        );
        // Interior cell boundary goes to the higher-indexed cell.
        assert_eq!(cam.cell_of(&rat_i(3), &rat(7, 2)), CellId::new(3, 3));
    }

    #[test]
    fn translate_moves_eye_and_window_together() {
        let mut cam = reference_camera();
        let before = cam.project(&p(10, 10, 0)).unwrap();
        let d = Vector3::new(rat_i(5), rat_i(-3), rat_i(2));
        cam.translate(&d);
        // The same point shifted by the same delta lands in the same cell.
        let shifted = p(10, 10, 0).add(&d);
        assert_eq!(cam.project(&shifted), Some(before));
    }

    #[test]
    fn zoom_out_shrinks_projected_extent() {
        let mut cam = reference_camera();
        cam.zoom(&rat_i(2)).unwrap();
        // Window now spans 200x150 world units; (0,0,0) still center.
        assert_eq!(cam.project(&p(0, 0, 0)), Some(CellId::new(37, 50)));
        // A point previously at u=70 is now at u=60.
        let (u, _) = cam.window_coords(&p(40, 20, 75)).unwrap();
        assert_eq!(u, rat_i(60));
        assert!(matches!(
            cam.zoom(&rat_i(0)),
            Err(Error::InvalidCameraGeometry(_))
        ));
    }

    #[test]
    fn depth_uses_camera_precision() {
        let cam = reference_camera();
        assert_eq!(cam.depth(&p(0, 0, 0)).unwrap(), rat_i(75));
        assert_eq!(cam.depth_sq(&p(3, 4, -75)), rat_i(25));
    }
}
