//! Dual-mode viewpoint camera.
//!
//! The camera keeps canonical state (position, azimuth, elevation) and
//! rebuilds its orientation matrix from scratch after every mutation.
//! Incremental matrix updates accumulate floating-point drift over a long
//! interactive session; rebuilding from the canonical values keeps the
//! view stable no matter how many times the controls fire.

use cgmath::{Deg, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

/// Interaction mode for the camera.
///
/// - `Orbiting` composes rotation before translation, so the camera
///   revolves around the origin offset by its position.
/// - `Tracking` composes translation before rotation, so the camera moves
///   through space and rotates about its own location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Orbiting,
    Tracking,
}

/// Viewpoint state and view-transform producer.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vector3<f32>,
    focus: Vector3<f32>,
    home: Vector3<f32>,

    // Orthonormal basis, derived from the orientation matrix on update.
    up: Vector3<f32>,
    right: Vector3<f32>,
    normal: Vector3<f32>,

    matrix: Matrix4<f32>,

    // Last absolute dolly target. `dolly` applies the difference between
    // the new target and this value, so repeated calls with the same
    // argument are no-ops.
    steps: f32,
    azimuth: f32,
    elevation: f32,

    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clip plane distance.
    pub min_z: f32,
    /// Far clip plane distance.
    pub max_z: f32,

    mode: CameraMode,
}

impl Camera {
    /// Creates a camera at the origin in the given mode.
    pub fn new(mode: CameraMode) -> Self {
        let mut camera = Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            focus: Vector3::new(0.0, 0.0, 0.0),
            home: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 0.0, 0.0),
            right: Vector3::new(0.0, 0.0, 0.0),
            normal: Vector3::new(0.0, 0.0, 0.0),
            matrix: Matrix4::identity(),
            steps: 0.0,
            azimuth: 0.0,
            elevation: 0.0,
            fov: 45.0,
            min_z: 0.1,
            max_z: 10000.0,
            mode,
        };
        camera.update();
        camera
    }

    pub fn is_orbiting(&self) -> bool {
        self.mode == CameraMode::Orbiting
    }

    pub fn is_tracking(&self) -> bool {
        self.mode == CameraMode::Tracking
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switches interaction mode without resetting position; the next
    /// `update` uses the new mode's composition order.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
        self.update();
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn focus(&self) -> Vector3<f32> {
        self.focus
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    /// Last absolute dolly target passed to [`Camera::dolly`].
    pub fn steps(&self) -> f32 {
        self.steps
    }

    /// Forward axis of the camera, derived from the orientation matrix.
    pub fn forward(&self) -> Vector3<f32> {
        self.normal
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    /// Returns the camera to its home position and zeroes both angles.
    ///
    /// Passing a position replaces the stored home first.
    pub fn go_home(&mut self, home: Option<Vector3<f32>>) {
        if let Some(home) = home {
            self.home = home;
        }

        self.set_position(self.home);
        self.set_azimuth(0.0);
        self.set_elevation(0.0);
    }

    /// Moves the camera along its forward axis.
    ///
    /// `step_increment` is an absolute target, not a delta: the applied
    /// offset is the difference from the previous target, so calling
    /// `dolly(5.0)` twice leaves the camera where the first call put it.
    /// In tracking mode the camera moves along its normalized forward
    /// vector; in orbiting mode only the Z component of the position
    /// changes.
    pub fn dolly(&mut self, step_increment: f32) {
        let normal = safe_normalize(self.normal);
        let step = step_increment - self.steps;

        let new_position = if self.is_tracking() {
            self.position - step * normal
        } else {
            Vector3::new(self.position.x, self.position.y, self.position.z - step)
        };

        self.steps = step_increment;
        self.set_position(new_position);
    }

    /// Copies the given position into the camera and recomputes.
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.update();
    }

    /// Copies the given focus point into the camera and recomputes.
    pub fn set_focus(&mut self, focus: Vector3<f32>) {
        self.focus = focus;
        self.update();
    }

    /// Sets the absolute azimuth in degrees.
    pub fn set_azimuth(&mut self, azimuth: f32) {
        self.change_azimuth(azimuth - self.azimuth);
    }

    /// Adds to the azimuth, wrapping the result strictly into (-360, 360).
    pub fn change_azimuth(&mut self, delta: f32) {
        self.azimuth += delta;

        if self.azimuth >= 360.0 || self.azimuth <= -360.0 {
            self.azimuth %= 360.0;
        }

        self.update();
    }

    /// Sets the absolute elevation in degrees.
    pub fn set_elevation(&mut self, elevation: f32) {
        self.change_elevation(elevation - self.elevation);
    }

    /// Adds to the elevation, wrapping the result strictly into (-360, 360).
    pub fn change_elevation(&mut self, delta: f32) {
        self.elevation += delta;

        if self.elevation >= 360.0 || self.elevation <= -360.0 {
            self.elevation %= 360.0;
        }

        self.update();
    }

    /// Rebuilds the orientation matrix and the derived basis vectors.
    ///
    /// The matrix is always composed from scratch out of the canonical
    /// position/azimuth/elevation state. In tracking mode the position is
    /// then re-derived from the matrix; in orbiting mode it stays as the
    /// user-set orbit-center offset.
    pub fn update(&mut self) {
        let rotation =
            Matrix4::from_angle_y(Deg(self.azimuth)) * Matrix4::from_angle_x(Deg(self.elevation));
        let translation = Matrix4::from_translation(self.position);

        self.matrix = if self.is_tracking() {
            translation * rotation
        } else {
            rotation * translation
        };

        if self.is_tracking() {
            let position = self.matrix * Vector4::new(0.0, 0.0, 0.0, 1.0);
            self.position = position.truncate();
        }

        self.calculate_orientation();
    }

    /// Returns the view transform: a fresh inverse of the orientation
    /// matrix. Never mutates the camera.
    pub fn view_transform(&self) -> Matrix4<f32> {
        self.matrix.invert().unwrap_or_else(Matrix4::identity)
    }

    /// Orientation matrix composed by the last `update`.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    // Derives the right/up/normal basis by pushing the unit axes through
    // the orientation matrix (w = 0, rotation only).
    fn calculate_orientation(&mut self) {
        self.right = (self.matrix * Vector4::unit_x()).truncate();
        self.up = (self.matrix * Vector4::unit_y()).truncate();
        self.normal = (self.matrix * Vector4::unit_z()).truncate();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraMode::Orbiting)
    }
}

// Normalize, leaving zero-length vectors untouched instead of producing NaN.
fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    let magnitude = v.magnitude();
    if magnitude > 0.0 {
        v / magnitude
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_bits(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
        (*m).into()
    }

    #[test]
    fn update_is_idempotent() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.set_position(Vector3::new(0.0, 2.0, 50.0));
        camera.change_azimuth(33.5);
        camera.change_elevation(-12.25);

        camera.update();
        let first = matrix_bits(&camera.matrix());
        camera.update();
        let second = matrix_bits(&camera.matrix());

        assert_eq!(first, second);
    }

    #[test]
    fn tracking_update_is_idempotent() {
        let mut camera = Camera::new(CameraMode::Tracking);
        camera.set_position(Vector3::new(1.0, 2.0, 3.0));
        camera.change_azimuth(45.0);

        camera.update();
        let first = matrix_bits(&camera.matrix());
        let position = camera.position();
        camera.update();

        assert_eq!(first, matrix_bits(&camera.matrix()));
        assert_eq!(position, camera.position());
    }

    #[test]
    fn go_home_resets_state() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.go_home(Some(Vector3::new(0.0, 2.0, 50.0)));

        camera.change_azimuth(170.0);
        camera.change_elevation(-340.0);
        camera.set_position(Vector3::new(9.0, 9.0, 9.0));
        camera.dolly(4.0);

        camera.go_home(None);

        assert_eq!(camera.azimuth(), 0.0);
        assert_eq!(camera.elevation(), 0.0);
        assert_eq!(camera.position(), Vector3::new(0.0, 2.0, 50.0));
    }

    #[test]
    fn angles_stay_strictly_inside_wrap_range() {
        let mut camera = Camera::new(CameraMode::Orbiting);

        for delta in [90.0, 90.0, 90.0, 90.0, 45.0, -720.0, 359.9, 0.2, -0.3] {
            camera.change_azimuth(delta);
            assert!(camera.azimuth() > -360.0 && camera.azimuth() < 360.0);

            camera.change_elevation(-delta);
            assert!(camera.elevation() > -360.0 && camera.elevation() < 360.0);
        }
    }

    #[test]
    fn wrap_at_exactly_360_lands_on_zero() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.change_azimuth(360.0);
        assert_eq!(camera.azimuth(), 0.0);

        camera.change_elevation(-360.0);
        assert_eq!(camera.elevation(), 0.0);
    }

    #[test]
    fn dolly_with_same_target_is_a_no_op() {
        let mut camera = Camera::new(CameraMode::Tracking);
        camera.set_position(Vector3::new(0.0, 0.0, 10.0));

        camera.dolly(5.0);
        let after_first = camera.position();
        camera.dolly(5.0);

        assert_eq!(after_first, camera.position());
    }

    #[test]
    fn orbiting_dolly_moves_along_z_only() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.set_position(Vector3::new(3.0, 4.0, 10.0));
        camera.change_azimuth(45.0);

        camera.dolly(2.0);

        let position = camera.position();
        assert_eq!(position.x, 3.0);
        assert_eq!(position.y, 4.0);
        assert_eq!(position.z, 8.0);
    }

    #[test]
    fn view_transform_does_not_mutate() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.set_position(Vector3::new(0.0, 2.0, 50.0));
        camera.change_azimuth(30.0);

        let before = matrix_bits(&camera.matrix());
        let _ = camera.view_transform();
        let _ = camera.view_transform();

        assert_eq!(before, matrix_bits(&camera.matrix()));
    }

    #[test]
    fn view_transform_inverts_orientation() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.set_position(Vector3::new(0.0, 0.0, 5.0));

        let round_trip = camera.view_transform() * camera.matrix();
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        let result: [[f32; 4]; 4] = round_trip.into();

        for (row, expected) in result.iter().zip(identity.iter()) {
            for (a, b) in row.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn set_mode_preserves_position() {
        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.set_position(Vector3::new(0.0, 2.0, 50.0));

        camera.set_mode(CameraMode::Tracking);

        assert_eq!(camera.position(), Vector3::new(0.0, 2.0, 50.0));
        assert!(camera.is_tracking());
    }
}
