//! Scene storage and painter's-algorithm depth ordering.
//!
//! The scene exclusively owns its triangles. After any geometric mutation or
//! camera move the caller must invoke [`Scene::depth_sort`] before the next
//! render; mutation is never detected implicitly.
//!
//! The depth key is the *minimum* vertex distance to the eye, computed at the
//! camera's precision, sorted descending so the farthest triangle renders
//! first. Equal keys keep insertion order (the sort is stable). A single
//! scalar key cannot correctly order mutually interpenetrating or cyclically
//! overlapping triangles; the resulting mis-occlusion is an accepted
//! limitation of the painter's algorithm, not something this module tries to
//! patch over.

use crate::camera::Camera;
use crate::geom::{ColoredTriangle, Vector3};
use crate::rational::{sqrt_oom, Rat};
use crate::Error;
use alloc::vec::Vec;
use core::cmp::Reverse;
use num_traits::Zero;

/// Ordered collection of renderable triangles plus the light direction.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    triangles: Vec<ColoredTriangle>,
    light: Vector3,
}

impl Default for Scene {
    fn default() -> Self {
        // Unit light looking straight down the +z axis; already normalized.
        Self {
            triangles: Vec::new(),
            light: Vector3::new(Rat::zero(), Rat::zero(), Rat::from_integer(1.into())),
        }
    }
}

impl Scene {
    /// Creates an empty scene lit from direction `light` (normalized here at
    /// `oom`). A zero light vector fails with
    /// [`Error::UndefinedGeometricOperation`].
    pub fn new(light: Vector3, oom: i32) -> Result<Self, Error> {
        let mut scene = Self::default();
        scene.set_light(light, oom)?;
        Ok(scene)
    }

    pub fn set_light(&mut self, light: Vector3, oom: i32) -> Result<(), Error> {
        self.light = light.normalized(oom)?;
        Ok(())
    }

    /// Normalized light direction.
    pub fn light(&self) -> &Vector3 {
        &self.light
    }

    pub fn push(&mut self, triangle: ColoredTriangle) {
        self.triangles.push(triangle);
    }

    /// Removes and returns the entry at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> ColoredTriangle {
        self.triangles.remove(index)
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Render-order view of the triangles (valid after [`Scene::depth_sort`]).
    pub fn triangles(&self) -> &[ColoredTriangle] {
        &self.triangles
    }

    /// Mutable access for translate/rotate/morph operations.
    ///
    /// Re-sort before rendering afterwards; the scene does not track that its
    /// entries changed.
    pub fn triangles_mut(&mut self) -> &mut [ColoredTriangle] {
        &mut self.triangles
    }

    /// Re-sorts the triangles farthest-to-nearest relative to `camera`.
    pub fn depth_sort(&mut self, camera: &Camera) {
        let oom = camera.oom();
        self.triangles.sort_by_cached_key(|ct| {
            let tri = ct.triangle();
            let near = camera
                .depth_sq(&tri.p)
                .min(camera.depth_sq(&tri.q))
                .min(camera.depth_sq(&tri.r));
            // Squared distances are never negative, so the root always
            // exists; a fallback key would live in a different unit space.
            let key = match sqrt_oom(&near, oom) {
                Ok(d) => d,
                Err(_) => unreachable!("square root of a squared distance"),
            };
            Reverse(key)
        });
    }
}
