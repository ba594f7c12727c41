//! # Ray-Cast Picking
//!
//! Resolves a 2D click into the scene-graph mesh under it:
//!
//! 1. **Unproject**: the pixel goes through the inverse projection and
//!    inverse view matrices to produce a world-space ray.
//! 2. **Traverse**: every mesh node's triangles are transformed into world
//!    space by its freshly composed world matrix and tested with a
//!    Moller-Trumbore intersection.
//! 3. **Resolve**: within one mesh the first intersecting triangle in
//!    storage order short-circuits the mesh (an accepted simplification,
//!    not a nearest-triangle search); across meshes the smallest
//!    ray-origin distance wins, first-found on ties.
//!
//! Non-invertible camera matrices make the pick request fail with
//! [`SceneError::NonInvertibleMatrix`]; there is no partial result.

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};
use log::debug;

use crate::error::SceneError;
use crate::gfx::camera::Projection;
use crate::gfx::node::{NodeKind, NodePath};
use crate::gfx::scene::Scene;

/// Near/far planes used for the pick projection.
const PICK_NEAR: f32 = 0.1;
const PICK_FAR: f32 = 1000.0;

const EPSILON: f32 = 1e-6;

/// A world-space ray.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    /// Normalized direction.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at parameter `t`.
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Result of a successful pick.
#[derive(Debug, Clone)]
pub struct PickHit {
    /// Path of the winning mesh node in the scene tree.
    pub path: NodePath,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vector3<f32>,
}

/// Moller-Trumbore ray/triangle intersection.
///
/// Returns the world-space intersection point, or `None` when the ray is
/// parallel to the triangle, the barycentric coordinates fall outside it,
/// or the hit lies behind the ray origin.
pub fn intersect_triangle(ray: &Ray, triangle: &[Vector3<f32>; 3]) -> Option<Vector3<f32>> {
    let edge1 = triangle[1] - triangle[0];
    let edge2 = triangle[2] - triangle[0];

    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - triangle[0];
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    if t < EPSILON {
        return None;
    }

    Some(ray.point_at(t))
}

/// Unprojects a pixel into a world-space near-plane point and ray
/// direction.
///
/// The direction depends on the projection mode: perspective rays fan out
/// from the camera position, orthographic rays are parallel to the view
/// axis.
pub fn unproject(
    pixel: (f32, f32),
    viewport: (f32, f32),
    inv_proj: &Matrix4<f32>,
    inv_view: &Matrix4<f32>,
    projection: Projection,
) -> (Vector3<f32>, Vector3<f32>) {
    let ndc_x = 2.0 * pixel.0 / viewport.0 - 1.0;
    let ndc_y = 1.0 - 2.0 * pixel.1 / viewport.1;

    let mut eye = inv_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
    if eye.w.abs() > EPSILON {
        eye /= eye.w;
    }
    let near_point = (inv_view * eye).truncate();

    let direction = match projection {
        Projection::Perspective => (near_point - inv_view.w.truncate()).normalize(),
        // Parallel rays: the view axis carried into world space.
        Projection::Orthographic => (inv_view * Vector4::new(0.0, 0.0, -1.0, 0.0))
            .truncate()
            .normalize(),
    };

    (near_point, direction)
}

/// Resolves a selection request at canvas pixel `pixel` against the scene.
///
/// Returns `Ok(None)` when nothing is under the cursor.
pub fn pick(
    scene: &Scene,
    pixel: (f32, f32),
    viewport: (f32, f32),
) -> Result<Option<PickHit>, SceneError> {
    let projection = scene.camera.projection();
    let inv_proj = scene
        .camera
        .projection_matrix(viewport.0, viewport.1, PICK_NEAR, PICK_FAR)
        .invert()
        .ok_or(SceneError::NonInvertibleMatrix)?;
    let inv_view = scene
        .camera
        .view_matrix()
        .invert()
        .ok_or(SceneError::NonInvertibleMatrix)?;

    let (near_point, direction) = unproject(pixel, viewport, &inv_proj, &inv_view, projection);
    let origin = match projection {
        // Perspective rays start at the camera itself.
        Projection::Perspective => inv_view.w.truncate(),
        // Orthographic rays start on the near plane under the cursor.
        Projection::Orthographic => near_point,
    };
    let ray = Ray::new(origin, direction);

    let mut best: Option<PickHit> = None;
    for entry in scene.root.walk() {
        let mesh = match &entry.node.kind {
            NodeKind::Mesh(mesh) => mesh,
            _ => continue,
        };

        for triangle in mesh.geometry.triangles() {
            let world_triangle = [
                transform_point(entry.world, triangle[0]),
                transform_point(entry.world, triangle[1]),
                transform_point(entry.world, triangle[2]),
            ];

            if let Some(point) = intersect_triangle(&ray, &world_triangle) {
                let distance = (point - ray.origin).magnitude();
                debug!(
                    "pick: hit `{}` at distance {:.4}",
                    entry.node.name, distance
                );
                // Strict less-than: on a tie the first mesh found wins.
                if best.as_ref().map_or(true, |hit| distance < hit.distance) {
                    best = Some(PickHit {
                        path: entry.path.clone(),
                        distance,
                        point,
                    });
                }
                // First intersecting triangle settles this mesh.
                break;
            }
        }
    }

    Ok(best)
}

fn transform_point(matrix: Matrix4<f32>, point: Vector3<f32>) -> Vector3<f32> {
    (matrix * point.extend(1.0)).truncate()
}
