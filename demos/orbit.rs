//! Orbiting vs. tracking camera demo.
//!
//! A floor grid, an axis cross, and two animated solids. Drag to rotate,
//! scroll to dolly, `H` to go home; the camera panel switches between
//! orbiting and tracking modes and the scene panel reorders draws.
//!
//! ```bash
//! cargo run --example orbit
//! ```

use neep::prelude::*;

fn main() {
    env_logger::init();

    let mut app = neep::default();

    app.camera_mut().go_home(Some(Vector3::new(0.0, 2.0, 50.0)));

    {
        let scene = app.scene_mut();
        scene.add(
            generate_floor(40.0, 20),
            Some(ObjectOverrides {
                diffuse: Some([0.5, 0.5, 0.5, 1.0]),
                ..Default::default()
            }),
        );
        scene.add(
            generate_axis(41.0),
            Some(ObjectOverrides {
                diffuse: Some([0.3, 0.6, 0.3, 1.0]),
                ..Default::default()
            }),
        );
        scene.add(
            generate_sphere(3.0, 32, 16),
            Some(ObjectOverrides {
                diffuse: Some([0.5, 0.8, 0.1, 1.0]),
                ..Default::default()
            }),
        );
        scene.add(
            generate_cone(2.0, 5.0, 32),
            Some(ObjectOverrides {
                diffuse: Some([0.8, 0.1, 0.1, 1.0]),
                ..Default::default()
            }),
        );
    }

    // Bounce the sphere along Z and the cone along X, the way the camera
    // demos traditionally do.
    let mut sphere_position = 0.0f32;
    let mut sphere_direction = 1.0f32;
    let mut cone_position = 0.0f32;
    let mut cone_direction = 1.0f32;

    app.set_update(move |scene, dt| {
        sphere_position += sphere_direction * 20.0 * dt;
        if sphere_position.abs() >= 30.0 {
            sphere_position = sphere_position.clamp(-30.0, 30.0);
            sphere_direction = -sphere_direction;
        }

        cone_position += cone_direction * 30.0 * dt;
        if cone_position.abs() >= 35.0 {
            cone_position = cone_position.clamp(-35.0, 35.0);
            cone_direction = -cone_direction;
        }

        if let Some(sphere) = scene.get_mut("sphere") {
            sphere.set_translation(Vector3::new(0.0, 3.0, sphere_position));
        }
        if let Some(cone) = scene.get_mut("cone") {
            cone.set_translation(Vector3::new(cone_position, 0.0, 0.0));
        }
    });

    let mut selected = None;
    app.set_ui(move |ui, frame| {
        camera_panel(ui, frame.camera, frame.controller);
        scene_panel(ui, frame.scene, &mut selected);
    });

    app.run();
}
