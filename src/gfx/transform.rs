//! # Local Transform State
//!
//! Every scene node carries a [`Transform`]: a translation, a rotation
//! expressed as axis + angle, a non-uniform scale, and the cached 4x4 local
//! matrix derived from them. World-space composition happens at traversal
//! time in [`crate::gfx::node`]; this module only deals with the local frame.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3};

/// Frame in which an interactive delta is applied to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// The node's own frame: rotations and scales pivot around the node
    /// itself (`local = local * delta`).
    Local,
    /// The parent's frame: translations move along world-aligned axes
    /// (`local = delta * local`).
    World,
}

/// Translation / axis-angle rotation / non-uniform scale with a cached
/// local matrix.
#[derive(Debug, Clone)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation_axis: Vector3<f32>,
    pub angle: Rad<f32>,
    pub scale: Vector3<f32>,
    local: Matrix4<f32>,
}

impl Transform {
    pub fn new(
        translation: Vector3<f32>,
        rotation_axis: Vector3<f32>,
        angle: Rad<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        let mut transform = Self {
            translation,
            rotation_axis,
            angle,
            scale,
            local: Matrix4::identity(),
        };
        transform.rebuild_local();
        transform
    }

    /// Identity transform: no translation, no rotation, unit scale.
    pub fn identity() -> Self {
        Self::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Rad(0.0),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self::new(
            translation,
            Vector3::new(0.0, 0.0, 0.0),
            Rad(0.0),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    /// Recomputes the cached local matrix as translate * rotate * scale.
    ///
    /// A rotation axis of (near-)zero length skips the rotation factor
    /// entirely rather than producing a garbage matrix.
    pub fn rebuild_local(&mut self) {
        let mut local = Matrix4::from_translation(self.translation);
        if self.rotation_axis.magnitude2() > f32::EPSILON {
            local = local * Matrix4::from_axis_angle(self.rotation_axis.normalize(), self.angle);
        }
        local = local * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        self.local = local;
    }

    /// The cached local matrix.
    pub fn local(&self) -> Matrix4<f32> {
        self.local
    }

    /// Applies an interactive delta matrix to the local matrix.
    ///
    /// The cached matrix becomes the source of truth after the first delta;
    /// the stored translation/rotation/scale fields are load-time inputs
    /// and are not back-derived from it.
    pub fn apply_delta(&mut self, delta: Matrix4<f32>, mode: DeltaMode) {
        self.local = match mode {
            DeltaMode::Local => self.local * delta,
            DeltaMode::World => delta * self.local,
        };
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
