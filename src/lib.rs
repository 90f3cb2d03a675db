//! # exactrend
//!
//! ## Exact-arithmetic rendering core
//!
//! `exactrend` is a `no_std` compatible 3D rendering core that keeps all of
//! its geometry in exact rational arithmetic, so repeated camera and scene
//! transforms never accumulate floating-point drift. A frame goes through the
//! following stages:
//!
//! - Depth ordering: the scene re-sorts its triangles farthest-to-nearest
//!   relative to the camera eye (classic painter's algorithm, no z-buffer).
//! - Grid coverage: for each triangle, the exact set of screen cells whose
//!   square intersects the triangle's projection onto the camera's screen
//!   window ([`coverage`]).
//! - Flat diffuse shading: one color per triangle from its face normal and
//!   the scene light, written into every covered cell, later triangles
//!   overwriting earlier ones.
//!
//! The camera model is a fixed rectangular screen window placed in world
//! space rather than a perspective frustum; projection is the intersection of
//! the ray from the eye through each vertex with the window plane, so
//! geometry behind the eye never reaches the raster. Wherever a result is
//! irrational (vector lengths, trigonometry) the caller supplies an `oom`,
//! the order of magnitude of acceptable rounding error, and results are
//! rounded to exactly that grid.
//!
//! Entrypoint to rendering is the [`Renderer`] struct; the typical flow of
//! each frame is:
//!
//! 1. Mutate the scene and/or camera.
//! 2. Re-sort with [`Scene::depth_sort`].
//! 3. Clear the raster with [`Renderer::clear_screen`].
//! 4. Draw with [`Renderer::render`].
//!
//! With the `encode` feature the finished [`Raster`] can be written to an
//! image file. Please see [`demos/sample.rs`](demos/sample.rs) for a usage
//! sample.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

pub mod camera;
pub mod color;
pub mod coverage;
#[cfg(feature = "encode")]
pub mod encode;
pub mod geom;
pub mod rational;
pub mod scene;

pub use camera::{Camera, CellId, ScreenWindow};
pub use color::Color;
pub use coverage::coverage;
pub use geom::{Axis, ColoredTriangle, Point3, Rotation, Triangle, Vector3};
pub use rational::Rat;
pub use scene::Scene;

use rational::{rat, rat_i};

/// Crate-wide geometric error taxonomy.
///
/// A triangle that merely projects to nothing is not an error: degenerate
/// projections yield empty coverage sets. Precision underflow is recovered by
/// clamping (see [`rational::clamp_oom`]) and never surfaces here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The screen window is not a proper rectangle, the resolution is zero,
    /// or the eye lies on the window plane. Fatal to camera construction.
    InvalidCameraGeometry(&'static str),
    /// An operation with no defined result, such as normalizing a zero
    /// vector or taking a real square root of a negative value.
    UndefinedGeometricOperation(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCameraGeometry(what) => {
                write!(f, "invalid camera geometry: {what}")
            }
            Error::UndefinedGeometricOperation(what) => {
                write!(f, "undefined geometric operation: {what}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Describes background parameters.
///
/// Passed to [`Renderer::clear_screen`] at the start of each frame to clear
/// the raster with the specified color.
pub struct Background {
    pub color: Color,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: Color::new(rat(1, 20), rat(23, 100), rat(2, 5)),
        }
    }
}

/// A `width x height` RGB8 raster, row-major.
///
/// Exclusively owned by the renderer during a pass; hand it to the display or
/// encoder stage afterwards (or take the pixels out with
/// [`Raster::into_pixels`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<[u8; 3]>,
}

impl Raster {
    /// All-black raster of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: alloc::vec![[0; 3]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, cell: CellId) -> [u8; 3] {
        self.data[cell.row * self.width + cell.col]
    }

    pub fn set(&mut self, cell: CellId, px: [u8; 3]) {
        self.data[cell.row * self.width + cell.col] = px;
    }

    pub fn fill(&mut self, px: [u8; 3]) {
        self.data.fill(px);
    }

    /// Row-major pixel view.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.data
    }

    /// Transfers the buffer out, consuming the raster.
    pub fn into_pixels(self) -> Vec<[u8; 3]> {
        self.data
    }

    /// Flat `r g b r g b ...` byte copy, as image encoders expect.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|px| px.iter().copied()).collect()
    }
}

/// Fixed ambient floor so back-facing triangles stay visible instead of
/// rendering pure black.
fn ambient() -> Rat {
    rat(3, 20)
}

fn clamp01(x: Rat) -> Rat {
    x.max(rat_i(0)).min(rat_i(1))
}

/// Immediate mode renderer.
///
/// Walks the scene's depth-sorted triangle list far to near; per triangle it
/// resolves the covered cells, computes one diffuse-shaded color, and writes
/// it into every covered cell, unconditionally overwriting previous writes.
/// The overwrite order is what implements occlusion. No blending and no
/// anti-aliasing happen across triangle boundaries.
///
/// A render pass is a pure function of the (sorted) scene and camera:
/// rendering twice without mutation in between produces identical rasters.
#[derive(Default, Debug)]
pub struct Renderer {}

impl Renderer {
    /// Clears the raster with the specified background.
    ///
    /// Call before every [`Renderer::render`] pass.
    pub fn clear_screen(&self, bg: &Background, buf: &mut Raster) {
        buf.fill(bg.color.to_rgb8());
    }

    /// Draws the scene on the raster.
    ///
    /// The scene must already be depth-sorted for `camera` (the caller's
    /// contract; see [`Scene::depth_sort`]).
    ///
    /// # Panics
    ///
    /// If the raster dimensions do not match the camera resolution.
    pub fn render(&self, camera: &Camera, scene: &Scene, buf: &mut Raster) {
        assert_eq!(buf.width(), camera.width());
        assert_eq!(buf.height(), camera.height());

        let neg_light = scene.light().neg();

        for ct in scene.triangles() {
            let cells = coverage(ct.triangle(), camera);
            if cells.is_empty() {
                continue;
            }

            // Non-empty coverage implies a non-degenerate triangle, so the
            // face normal is nonzero and normalization succeeds.
            let shade = match ct.normal().normalized(camera.oom()) {
                Ok(n) => clamp01(n.dot(&neg_light)),
                Err(_) => continue,
            };
            let factor = ambient() + (rat_i(1) - ambient()) * shade;
            let px = ct.color().scaled(&factor).to_rgb8();

            for cell in cells {
                buf.set(cell, px);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::rat_i;

    fn p(x: i64, y: i64, z: i64) -> Point3 {
        Point3::new(rat_i(x), rat_i(y), rat_i(z))
    }

    fn v(x: i64, y: i64, z: i64) -> Vector3 {
        Vector3::new(rat_i(x), rat_i(y), rat_i(z))
    }

    fn camera() -> Camera {
        let window =
            ScreenWindow::axis_aligned(&p(0, 0, 0), &rat_i(100), &rat_i(75)).unwrap();
        Camera::new(p(0, 0, -75), window, 100, 75, -6).unwrap()
    }

    /// Triangle in the plane `z`, wound so the face normal points at the
    /// camera (toward -z), spanning `side` world units from `(x0, y0)`.
    fn facing_triangle(x0: i64, y0: i64, z: i64, side: i64, color: Color) -> ColoredTriangle {
        ColoredTriangle::new(
            Triangle::new(
                p(x0, y0, z),
                p(x0, y0 + side, z),
                p(x0 + side, y0, z),
            ),
            color,
        )
    }

    /// Scene lit head-on, so facing triangles shade to their full base color.
    fn lit_scene() -> Scene {
        Scene::new(v(0, 0, 1), -6).unwrap()
    }

    #[test]
    fn empty_scene_is_all_background() {
        let cam = camera();
        let renderer = Renderer::default();
        let mut buf = Raster::new(cam.width(), cam.height());
        let bg = Background::default();
        renderer.clear_screen(&bg, &mut buf);
        renderer.render(&cam, &Scene::default(), &mut buf);
        let px = bg.color.to_rgb8();
        assert!(buf.pixels().iter().all(|&c| c == px));
    }

    #[test]
    fn nearer_triangle_occludes_farther() {
        let cam = camera();
        let mut scene = lit_scene();
        let far = facing_triangle(-20, -20, 20, 40, Color::from_rgb8(255, 0, 0));
        let near = facing_triangle(-10, -10, 10, 20, Color::from_rgb8(0, 0, 255));
        let far_cov = coverage(far.triangle(), &cam);
        let near_cov = coverage(near.triangle(), &cam);
        scene.push(far);
        scene.push(near);
        scene.depth_sort(&cam);

        let renderer = Renderer::default();
        let mut buf = Raster::new(cam.width(), cam.height());
        renderer.clear_screen(&Background::default(), &mut buf);
        renderer.render(&cam, &scene, &mut buf);

        let overlap: Vec<_> = far_cov.intersection(&near_cov).copied().collect();
        assert!(!overlap.is_empty());
        for cell in overlap {
            assert_eq!(buf.get(cell), [0, 0, 255]);
        }
        for cell in far_cov.difference(&near_cov) {
            assert_eq!(buf.get(*cell), [255, 0, 0]);
        }
    }

    #[test]
    fn render_is_idempotent() {
        let cam = camera();
        let mut scene = lit_scene();
        scene.push(facing_triangle(-15, -5, 10, 25, Color::from_rgb8(10, 200, 60)));
        scene.depth_sort(&cam);

        let renderer = Renderer::default();
        let bg = Background::default();
        let mut a = Raster::new(cam.width(), cam.height());
        renderer.clear_screen(&bg, &mut a);
        renderer.render(&cam, &scene, &mut a);

        let mut b = Raster::new(cam.width(), cam.height());
        renderer.clear_screen(&bg, &mut b);
        renderer.render(&cam, &scene, &mut b);

        assert_eq!(a, b);
    }

    #[test]
    fn camera_and_scene_translation_are_equivalent() {
        // Moving the camera by -d renders the same image as moving every
        // triangle by +d: only relative geometry enters the pipeline.
        let d = v(3, -2, 4);
        let renderer = Renderer::default();
        let bg = Background::default();

        let mut cam_moved = camera();
        cam_moved.translate(&d.neg());
        let mut scene_a = lit_scene();
        scene_a.push(facing_triangle(-20, -10, 15, 30, Color::from_rgb8(200, 40, 40)));
        scene_a.push(facing_triangle(-5, -25, 30, 20, Color::from_rgb8(40, 40, 200)));
        scene_a.depth_sort(&cam_moved);
        let mut buf_a = Raster::new(cam_moved.width(), cam_moved.height());
        renderer.clear_screen(&bg, &mut buf_a);
        renderer.render(&cam_moved, &scene_a, &mut buf_a);

        let cam = camera();
        let mut scene_b = lit_scene();
        scene_b.push(facing_triangle(-20, -10, 15, 30, Color::from_rgb8(200, 40, 40)));
        scene_b.push(facing_triangle(-5, -25, 30, 20, Color::from_rgb8(40, 40, 200)));
        for ct in scene_b.triangles_mut() {
            ct.translate(&d);
        }
        scene_b.depth_sort(&cam);
        let mut buf_b = Raster::new(cam.width(), cam.height());
        renderer.clear_screen(&bg, &mut buf_b);
        renderer.render(&cam, &scene_b, &mut buf_b);

        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn shading_scales_with_light_incidence() {
        // Same triangle twice: lit head-on vs lit edge-on. Head-on gets the
        // full base color, edge-on drops to the ambient floor.
        let cam = camera();
        let renderer = Renderer::default();
        let bg = Background::default();
        let tri = facing_triangle(-10, -10, 10, 20, Color::from_rgb8(200, 100, 0));
        let cell = *coverage(tri.triangle(), &cam).iter().next().unwrap();

        let mut head_on = Scene::new(v(0, 0, 1), -6).unwrap();
        head_on.push(tri.clone());
        head_on.depth_sort(&cam);
        let mut buf = Raster::new(cam.width(), cam.height());
        renderer.clear_screen(&bg, &mut buf);
        renderer.render(&cam, &head_on, &mut buf);
        assert_eq!(buf.get(cell), [200, 100, 0]);

        let mut edge_on = Scene::new(v(1, 0, 0), -6).unwrap();
        edge_on.push(tri);
        edge_on.depth_sort(&cam);
        renderer.clear_screen(&bg, &mut buf);
        renderer.render(&cam, &edge_on, &mut buf);
        // factor = 3/20; 200 * 3/20 = 30, 100 * 3/20 = 15.
        assert_eq!(buf.get(cell), [30, 15, 0]);
    }
}
