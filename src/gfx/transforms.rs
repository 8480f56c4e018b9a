//! Per-frame matrix bookkeeping.
//!
//! [`Transforms`] derives the model-view, projection, and normal matrices
//! from the camera each frame and provides a push/pop stack so nested
//! per-object transforms never leak into sibling draws. The working
//! matrices are owned exclusively by the stack; every read hands out a
//! copy, never a reference into the live state.

use cgmath::{ortho, perspective, Deg, Matrix, Matrix4, SquareMatrix, Vector3};

use super::camera::Camera;

/// Maps OpenGL clip space (z in [-1, 1]) onto wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Projection flavor used by [`Transforms::update_projection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    Perspective,
    /// Orthographic projection with the given half-height of the view
    /// volume; width follows from the aspect ratio.
    Orthographic { half_height: f32 },
}

/// Uniform block handed to the rendering backend at commit time.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MatrixUniforms {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl Default for MatrixUniforms {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model_view: identity,
            projection: identity,
            normal: identity,
        }
    }
}

/// Model-view/projection/normal matrices with scoped save-and-restore.
pub struct Transforms {
    model_view: Matrix4<f32>,
    projection: Matrix4<f32>,
    normal: Matrix4<f32>,
    stack: Vec<Matrix4<f32>>,
    projection_kind: ProjectionKind,
}

impl Transforms {
    pub fn new() -> Self {
        Self {
            model_view: Matrix4::identity(),
            projection: Matrix4::identity(),
            normal: Matrix4::identity(),
            stack: Vec::new(),
            projection_kind: ProjectionKind::Perspective,
        }
    }

    /// Current model-view matrix (a copy).
    pub fn model_view(&self) -> Matrix4<f32> {
        self.model_view
    }

    /// Current projection matrix (a copy).
    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Current normal matrix (a copy).
    pub fn normal(&self) -> Matrix4<f32> {
        self.normal
    }

    pub fn projection_kind(&self) -> ProjectionKind {
        self.projection_kind
    }

    /// Selects perspective or orthographic projection for subsequent
    /// [`Transforms::update_projection`] calls.
    pub fn set_projection_kind(&mut self, kind: ProjectionKind) {
        self.projection_kind = kind;
    }

    /// Resets the model-view to a fresh copy of the camera's view transform.
    pub fn calculate_model_view(&mut self, camera: &Camera) {
        self.model_view = camera.view_transform();
    }

    /// Rebuilds the projection matrix from the camera's field of view and
    /// clip planes and the current surface aspect ratio.
    pub fn update_projection(&mut self, camera: &Camera, aspect: f32) {
        self.projection = match self.projection_kind {
            ProjectionKind::Perspective => {
                OPENGL_TO_WGPU_MATRIX
                    * perspective(Deg(camera.fov), aspect, camera.min_z, camera.max_z)
            }
            ProjectionKind::Orthographic { half_height } => {
                let half_width = half_height * aspect;
                OPENGL_TO_WGPU_MATRIX
                    * ortho(
                        -half_width,
                        half_width,
                        -half_height,
                        half_height,
                        camera.min_z,
                        camera.max_z,
                    )
            }
        };
    }

    /// Recomputes the normal matrix as the inverse-transpose of the current
    /// model-view. A singular model-view falls back to the plain transpose.
    pub fn calculate_normal(&mut self) {
        let inverted = self.model_view.invert().unwrap_or(self.model_view);
        self.normal = inverted.transpose();
    }

    /// Snapshots a copy of the current model-view onto the stack.
    pub fn push(&mut self) {
        self.stack.push(self.model_view);
    }

    /// Restores the most recent snapshot, removing it from the stack.
    ///
    /// Returns `None` (and leaves the model-view untouched) if the stack
    /// is empty; never panics.
    pub fn pop(&mut self) -> Option<Matrix4<f32>> {
        let restored = self.stack.pop()?;
        self.model_view = restored;
        Some(restored)
    }

    /// Applies a translation to the model-view in place.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.model_view = self.model_view * Matrix4::from_translation(offset);
    }

    /// Applies a uniform scale to the model-view in place.
    pub fn scale(&mut self, factor: f32) {
        self.model_view = self.model_view * Matrix4::from_scale(factor);
    }

    /// Applies a rotation about the Y axis to the model-view in place.
    pub fn rotate_y(&mut self, angle: Deg<f32>) {
        self.model_view = self.model_view * Matrix4::from_angle_y(angle);
    }

    /// Applies a rotation about the X axis to the model-view in place.
    pub fn rotate_x(&mut self, angle: Deg<f32>) {
        self.model_view = self.model_view * Matrix4::from_angle_x(angle);
    }

    /// Composes an arbitrary model transform onto the model-view in place.
    pub fn apply(&mut self, transform: Matrix4<f32>) {
        self.model_view = self.model_view * transform;
    }

    /// Commit point: recomputes the normal matrix against the current
    /// model-view and returns the uniform block for the draw call about to
    /// be issued. The normal matrix must be derived here, not earlier, or
    /// a stale value ships with the draw.
    pub fn matrix_uniforms(&mut self) -> MatrixUniforms {
        self.calculate_normal();
        MatrixUniforms {
            model_view: self.model_view.into(),
            projection: self.projection.into(),
            normal: self.normal.into(),
        }
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraMode;

    fn bits(m: Matrix4<f32>) -> [[f32; 4]; 4] {
        m.into()
    }

    #[test]
    fn push_pop_round_trips_through_mutation() {
        let mut transforms = Transforms::new();
        transforms.translate(Vector3::new(1.0, 2.0, 3.0));
        let saved = bits(transforms.model_view());

        transforms.push();
        transforms.translate(Vector3::new(-7.0, 0.5, 12.0));
        transforms.scale(3.0);
        transforms.rotate_y(Deg(90.0));
        assert_ne!(saved, bits(transforms.model_view()));

        transforms.pop();
        assert_eq!(saved, bits(transforms.model_view()));
    }

    #[test]
    fn pop_on_empty_stack_is_a_no_op() {
        let mut transforms = Transforms::new();
        transforms.translate(Vector3::new(4.0, 0.0, 0.0));
        let current = bits(transforms.model_view());

        assert!(transforms.pop().is_none());
        assert_eq!(current, bits(transforms.model_view()));
    }

    #[test]
    fn nested_push_pop_restores_in_lifo_order() {
        let mut transforms = Transforms::new();

        transforms.push();
        transforms.translate(Vector3::new(1.0, 0.0, 0.0));
        let outer = bits(transforms.model_view());

        transforms.push();
        transforms.translate(Vector3::new(0.0, 1.0, 0.0));
        transforms.pop();
        assert_eq!(outer, bits(transforms.model_view()));

        transforms.pop();
        assert_eq!(bits(Matrix4::identity()), bits(transforms.model_view()));
    }

    #[test]
    fn commit_recomputes_normal_from_current_model_view() {
        let mut transforms = Transforms::new();
        transforms.calculate_normal();

        // Mutate after the explicit normal calculation; the commit must not
        // hand out the stale value.
        transforms.scale(2.0);
        let uniforms = transforms.matrix_uniforms();

        // Inverse-transpose of a uniform scale by 2 has 0.5 on the diagonal.
        assert!((uniforms.normal[0][0] - 0.5).abs() < 1e-6);
        assert!((uniforms.normal[1][1] - 0.5).abs() < 1e-6);
        assert!((uniforms.normal[2][2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn model_view_copies_camera_view_transform() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.set_position(cgmath::Vector3::new(0.0, 2.0, 50.0));

        let mut transforms = Transforms::new();
        transforms.calculate_model_view(&camera);

        assert_eq!(bits(camera.view_transform()), bits(transforms.model_view()));

        // Mutating the stack's copy must not feed back into the camera.
        transforms.translate(Vector3::new(5.0, 5.0, 5.0));
        assert_ne!(bits(camera.view_transform()), bits(transforms.model_view()));
    }

    #[test]
    fn projection_kind_selects_ortho() {
        let camera = Camera::new(CameraMode::Orbiting);
        let mut transforms = Transforms::new();

        transforms.update_projection(&camera, 16.0 / 9.0);
        let perspective = bits(transforms.projection());

        transforms.set_projection_kind(ProjectionKind::Orthographic { half_height: 10.0 });
        transforms.update_projection(&camera, 16.0 / 9.0);

        assert_ne!(perspective, bits(transforms.projection()));
    }
}
