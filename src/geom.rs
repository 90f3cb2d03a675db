//! Exact rational 3D geometry primitives.
//!
//! Points and vectors carry [`Rat`] coordinates, so translation, scaling,
//! cross and dot products are all exact. The only lossy operations are
//! normalization and rotation, both of which take an explicit `oom` and go
//! through [`crate::rational`] for quantization.

use crate::color::Color;
use crate::rational::{cos_oom, sin_oom, sqrt_oom, Rat};
use crate::Error;
use num_traits::Zero;

/// A position in 3D space. Immutable; arithmetic returns new values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: Rat,
    pub y: Rat,
    pub z: Rat,
}

impl Point3 {
    pub fn new(x: Rat, y: Rat, z: Rat) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, v: &Vector3) -> Point3 {
        Point3::new(&self.x + &v.x, &self.y + &v.y, &self.z + &v.z)
    }

    /// Displacement vector from `other` to `self`.
    pub fn sub(&self, other: &Point3) -> Vector3 {
        Vector3::new(&self.x - &other.x, &self.y - &other.y, &self.z - &other.z)
    }

    /// Exact squared distance to `other`.
    pub fn dist_sq(&self, other: &Point3) -> Rat {
        self.sub(other).norm_sq()
    }

    /// Exact linear interpolation: `self + t * (target - self)`.
    pub fn lerp(&self, target: &Point3, t: &Rat) -> Point3 {
        self.add(&target.sub(self).scaled(t))
    }
}

/// A direction/displacement in 3D space.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: Rat,
    pub y: Rat,
    pub z: Rat,
}

impl Vector3 {
    pub fn new(x: Rat, y: Rat, z: Rat) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(Rat::zero(), Rat::zero(), Rat::zero())
    }

    pub fn add(&self, other: &Vector3) -> Vector3 {
        Vector3::new(&self.x + &other.x, &self.y + &other.y, &self.z + &other.z)
    }

    pub fn neg(&self) -> Vector3 {
        Vector3::new(-&self.x, -&self.y, -&self.z)
    }

    pub fn scaled(&self, s: &Rat) -> Vector3 {
        Vector3::new(&self.x * s, &self.y * s, &self.z * s)
    }

    pub fn dot(&self, other: &Vector3) -> Rat {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            &self.y * &other.z - &self.z * &other.y,
            &self.z * &other.x - &self.x * &other.z,
            &self.x * &other.y - &self.y * &other.x,
        )
    }

    /// Exact squared length.
    pub fn norm_sq(&self) -> Rat {
        self.dot(self)
    }

    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Length, correct to `10^oom`.
    pub fn norm(&self, oom: i32) -> Result<Rat, Error> {
        sqrt_oom(&self.norm_sq(), oom)
    }

    /// Unit vector in this direction, scaled by a length computed at `oom`.
    ///
    /// The zero vector has no direction and fails with
    /// [`Error::UndefinedGeometricOperation`].
    pub fn normalized(&self, oom: i32) -> Result<Vector3, Error> {
        if self.is_zero() {
            return Err(Error::UndefinedGeometricOperation(
                "normalization of the zero vector",
            ));
        }
        let len = self.norm(oom)?;
        if len.is_zero() {
            // Nonzero vector shorter than the precision grid.
            return Err(Error::UndefinedGeometricOperation(
                "vector length underflows the requested precision",
            ));
        }
        Ok(self.scaled(&len.recip()))
    }
}

/// Principal axis selector for rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A rotation about a principal axis with trig quantized at construction.
///
/// The sine and cosine are evaluated once, rounded to the requested `oom`,
/// and from then on every application of the rotation is exact rational
/// arithmetic. Applying the same `Rotation` to camera and scene therefore
/// moves them in lockstep with zero relative drift.
#[derive(Debug, Clone)]
pub struct Rotation {
    axis: Axis,
    sin: Rat,
    cos: Rat,
}

impl Rotation {
    /// `angle` is in radians; `oom` bounds the trig rounding error.
    pub fn new(axis: Axis, angle: f64, oom: i32) -> Result<Self, Error> {
        Ok(Self {
            axis,
            sin: sin_oom(angle, oom)?,
            cos: cos_oom(angle, oom)?,
        })
    }

    pub fn apply_vector(&self, v: &Vector3) -> Vector3 {
        let (s, c) = (&self.sin, &self.cos);
        match self.axis {
            Axis::X => Vector3::new(
                v.x.clone(),
                c * &v.y - s * &v.z,
                s * &v.y + c * &v.z,
            ),
            Axis::Y => Vector3::new(
                c * &v.x + s * &v.z,
                v.y.clone(),
                c * &v.z - s * &v.x,
            ),
            Axis::Z => Vector3::new(
                c * &v.x - s * &v.y,
                s * &v.x + c * &v.y,
                v.z.clone(),
            ),
        }
    }

    /// Rotates `p` about `center`.
    pub fn apply_point(&self, p: &Point3, center: &Point3) -> Point3 {
        center.add(&self.apply_vector(&p.sub(center)))
    }
}

/// Three vertices. Winding determines the normal sign used for lighting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub p: Point3,
    pub q: Point3,
    pub r: Point3,
}

impl Triangle {
    pub fn new(p: Point3, q: Point3, r: Point3) -> Self {
        Self { p, q, r }
    }

    /// Exact unnormalized face normal, `(q - p) x (r - p)`.
    ///
    /// Zero for a degenerate (collinear) triangle.
    pub fn normal(&self) -> Vector3 {
        self.q.sub(&self.p).cross(&self.r.sub(&self.p))
    }

    pub fn translate(&mut self, v: &Vector3) {
        self.p = self.p.add(v);
        self.q = self.q.add(v);
        self.r = self.r.add(v);
    }

    pub fn rotate(&mut self, rot: &Rotation, center: &Point3) {
        self.p = rot.apply_point(&self.p, center);
        self.q = rot.apply_point(&self.q, center);
        self.r = rot.apply_point(&self.r, center);
    }

    /// Exact vertex-wise interpolation toward `target` at parameter `t`
    /// (`t = 0` leaves the triangle unchanged, `t = 1` reaches the target).
    pub fn lerp(&self, target: &Triangle, t: &Rat) -> Triangle {
        Triangle::new(
            self.p.lerp(&target.p, t),
            self.q.lerp(&target.q, t),
            self.r.lerp(&target.r, t),
        )
    }
}

/// The renderable unit: a triangle, its base color, and a cached face normal.
///
/// The normal is refreshed by the mutating operations so the shading pass
/// never recomputes it per frame.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColoredTriangle {
    triangle: Triangle,
    color: Color,
    normal: Vector3,
}

impl ColoredTriangle {
    pub fn new(triangle: Triangle, color: Color) -> Self {
        let normal = triangle.normal();
        Self {
            triangle,
            color,
            normal,
        }
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    pub fn translate(&mut self, v: &Vector3) {
        // Normals are translation invariant.
        self.triangle.translate(v);
    }

    pub fn rotate(&mut self, rot: &Rotation, center: &Point3) {
        self.triangle.rotate(rot, center);
        self.normal = self.triangle.normal();
    }

    /// Morphs the triangle a step toward `target`.
    pub fn morph_toward(&mut self, target: &Triangle, t: &Rat) {
        self.triangle = self.triangle.lerp(target, t);
        self.normal = self.triangle.normal();
    }
}
