//! Built-in debug panels.
//!
//! [`camera_panel`] exposes the camera control surface (position, azimuth,
//! elevation, field of view, dolly, mode, go-home) and [`scene_panel`] the
//! registry's render-order and visibility controls.

use cgmath::Vector3;
use imgui::Condition;

use crate::gfx::camera::{Camera, CameraController, CameraMode};
use crate::gfx::scene::Scene;

/// Camera controls: each widget reads the current camera state and pushes
/// edits back through the camera's own mutators, so the orientation matrix
/// is rebuilt on every change.
pub fn camera_panel(ui: &imgui::Ui, camera: &mut Camera, controller: &mut CameraController) {
    ui.window("Camera")
        .size([320.0, 360.0], Condition::FirstUseEver)
        .position([20.0, 20.0], Condition::FirstUseEver)
        .build(|| {
            let mut mode_index = if camera.is_tracking() { 1 } else { 0 };
            if ui.combo_simple_string("Mode", &mut mode_index, &["Orbiting", "Tracking"]) {
                // Re-home before switching so the new composition order
                // starts from a known pose.
                camera.go_home(None);
                camera.set_mode(if mode_index == 1 {
                    CameraMode::Tracking
                } else {
                    CameraMode::Orbiting
                });
            }

            let position = camera.position();
            let mut position = [position.x, position.y, position.z];
            if ui.input_float3("Position", &mut position).build() {
                camera.set_position(Vector3::from(position));
            }

            let mut azimuth = camera.azimuth();
            if ui.slider("Azimuth", -360.0, 360.0, &mut azimuth) {
                camera.set_azimuth(azimuth);
            }

            let mut elevation = camera.elevation();
            if ui.slider("Elevation", -360.0, 360.0, &mut elevation) {
                camera.set_elevation(elevation);
            }

            let mut dolly = camera.steps();
            if ui.slider("Dolly", -100.0, 100.0, &mut dolly) {
                camera.dolly(dolly);
                controller.sync_dolly_target(camera);
            }

            let mut fov = camera.fov;
            if ui.slider("Field of View", 1.0, 120.0, &mut fov) {
                camera.fov = fov;
            }

            ui.separator();
            if ui.button("Go Home") {
                camera.go_home(None);
                controller.sync_dolly_target(camera);
            }
        });
}

/// Scene registry controls: selection list in render order, reorder
/// buttons, and per-entry visibility/wireframe toggles.
pub fn scene_panel(ui: &imgui::Ui, scene: &mut Scene, selected: &mut Option<usize>) {
    ui.window("Scene")
        .size([320.0, 360.0], Condition::FirstUseEver)
        .position([20.0, 400.0], Condition::FirstUseEver)
        .build(|| {
            ui.text("Render Order");
            ui.separator();

            let aliases: Vec<String> = scene
                .aliases()
                .iter()
                .map(|alias| alias.to_string())
                .collect();

            if aliases.is_empty() {
                ui.text_disabled("No objects in scene");
                return;
            }

            ui.child_window("object_list")
                .size([0.0, 140.0])
                .border(true)
                .build(|| {
                    for (index, alias) in aliases.iter().enumerate() {
                        let is_selected = *selected == Some(index);
                        let label = format!("{index}: {alias}");
                        if ui
                            .selectable_config(&label)
                            .selected(is_selected)
                            .build()
                        {
                            *selected = Some(index);
                        }
                    }
                });

            let Some(index) = *selected else {
                return;
            };
            let Some(alias) = aliases.get(index).cloned() else {
                *selected = None;
                return;
            };

            ui.spacing();
            ui.text(&alias);

            if ui.button("First") {
                scene.render_first(&alias);
            }
            ui.same_line();
            if ui.button("Sooner") {
                scene.render_sooner(&alias);
            }
            ui.same_line();
            if ui.button("Later") {
                scene.render_later(&alias);
            }
            ui.same_line();
            if ui.button("Last") {
                scene.render_last(&alias);
            }

            // Follow the entry to wherever the reorder put it.
            *selected = scene.aliases().iter().position(|a| *a == alias);

            if let Some(object) = scene.get_mut(&alias) {
                ui.checkbox("Visible", &mut object.visible);
                ui.same_line();
                ui.checkbox("Wireframe", &mut object.wireframe);
            }

            if ui.button("Remove") {
                scene.remove(&alias);
                *selected = None;
            }
        });
}
