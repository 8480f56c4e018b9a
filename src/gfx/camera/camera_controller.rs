use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::camera::Camera;

/// Maps raw winit input onto camera operations.
///
/// Left-drag rotates (azimuth/elevation), the mouse wheel dollies, and `H`
/// returns the camera home. The wheel accumulates into an absolute dolly
/// target so that [`Camera::dolly`] keeps its idempotent contract.
pub struct CameraController {
    pub rotate_speed: f32,
    pub dolly_speed: f32,
    dolly_target: f32,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, dolly_speed: f32) -> Self {
        Self {
            rotate_speed,
            dolly_speed,
            dolly_target: 0.0,
            is_mouse_pressed: false,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent, window: &Window, camera: &mut Camera) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left mouse button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.dolly_target += scroll_amount * self.dolly_speed;
                camera.dolly(self.dolly_target);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    camera.change_azimuth(-delta.0 as f32 * self.rotate_speed);
                    camera.change_elevation(delta.1 as f32 * self.rotate_speed);
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut Camera) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::KeyH),
            state: ElementState::Pressed,
            ..
        } = event
        {
            camera.go_home(None);
        }
    }

    /// Synchronizes the accumulated wheel target after an external dolly,
    /// e.g. when the control panel drives the camera directly.
    pub fn sync_dolly_target(&mut self, camera: &Camera) {
        self.dolly_target = camera.steps();
    }
}
