//! # Camera
//!
//! The camera keeps an explicit base view matrix (built look-at style from
//! the scene document) plus orbit state accumulated separately from it.
//! Interactive deltas are special-cased: they mutate the base view matrix
//! directly, so camera drags always happen in view space rather than going
//! through the generic parent-relative node update. Do not unify this with
//! [`crate::gfx::transform::Transform::apply_delta`]; doing so changes
//! camera-drag behavior.

use cgmath::{ortho, perspective, Deg, Matrix4, Point3, SquareMatrix, Vector3};

use crate::gfx::transform::DeltaMode;

/// Half-extent of the orthographic box in x and y. Fixed; deliberately not
/// derived from the viewport aspect ratio, unlike the perspective path.
const ORTHO_HALF_EXTENT: f32 = 10.0;
/// Half-depth of the orthographic box.
const ORTHO_HALF_DEPTH: f32 = 100.0;

/// Projection mode of the active camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

/// The scene's camera: base view matrix, orbit state and projection mode.
#[derive(Debug, Clone)]
pub struct Camera {
    view: Matrix4<f32>,
    pitch: Deg<f32>,
    yaw: Deg<f32>,
    projection: Projection,
    /// Vertical field of view, perspective mode only.
    pub fov: Deg<f32>,
}

impl Camera {
    /// Builds a camera looking from `position` at `lookat`.
    pub fn new(
        position: Point3<f32>,
        lookat: Point3<f32>,
        up: Vector3<f32>,
        fov: Deg<f32>,
        projection: Projection,
    ) -> Self {
        Self {
            view: Matrix4::look_at_rh(position, lookat, up),
            pitch: Deg(0.0),
            yaw: Deg(0.0),
            projection,
            fov,
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Accumulated orbit pitch.
    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    /// Accumulated orbit yaw.
    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn set_perspective(&mut self) {
        self.projection = Projection::Perspective;
    }

    pub fn set_orthographic(&mut self) {
        self.projection = Projection::Orthographic;
    }

    /// Full view matrix: base look-at, then pitch about X, then yaw about Y
    /// (right-multiplied in that order).
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view * Matrix4::from_angle_x(self.pitch) * Matrix4::from_angle_y(self.yaw)
    }

    /// Projection matrix for the given viewport and depth range.
    ///
    /// The orthographic box is a fixed symmetric volume independent of the
    /// aspect ratio and of `near`/`far`.
    pub fn projection_matrix(&self, width: f32, height: f32, near: f32, far: f32) -> Matrix4<f32> {
        match self.projection {
            Projection::Perspective => perspective(self.fov, width / height, near, far),
            Projection::Orthographic => ortho(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_DEPTH,
                ORTHO_HALF_DEPTH,
            ),
        }
    }

    /// Accumulates orbit input. Only the orbit state changes; the base view
    /// matrix is untouched.
    pub fn rotate(&mut self, delta_pitch: Deg<f32>, delta_yaw: Deg<f32>) {
        self.pitch += delta_pitch;
        self.yaw += delta_yaw;
    }

    /// Applies an interactive delta to the base view matrix. Translation
    /// deltas therefore move the camera in view space.
    pub fn apply_delta(&mut self, delta: Matrix4<f32>, mode: DeltaMode) {
        self.view = match mode {
            DeltaMode::Local => self.view * delta,
            DeltaMode::World => delta * self.view,
        };
    }

    /// Camera position in world space, recovered from the inverted full
    /// view matrix. `None` if the view matrix is not invertible.
    pub fn eye_position(&self) -> Option<Vector3<f32>> {
        self.view_matrix().invert().map(|inverse| inverse.w.truncate())
    }
}
