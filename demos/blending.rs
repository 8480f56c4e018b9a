//! Transparency and render-order demo.
//!
//! Two translucent solids and a vertex-colored cube loaded from JSON.
//! With alpha blending, what you see depends on the order the registry
//! draws in; use the scene panel's First/Sooner/Later/Last buttons to see
//! the render order change the picture.
//!
//! ```bash
//! cargo run --example blending
//! ```

use anyhow::Result;
use neep::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut app = neep::default();

    app.camera_mut().go_home(Some(Vector3::new(0.0, 5.0, 35.0)));

    {
        let scene = app.scene_mut();
        scene.add(
            generate_floor(40.0, 20),
            Some(ObjectOverrides {
                diffuse: Some([0.4, 0.4, 0.4, 1.0]),
                ..Default::default()
            }),
        );

        // Vertex-colored cube from the external model format.
        scene.load("models/cube.json", Some("cube"), None)?;

        scene.add(
            generate_cone(3.0, 8.0, 32),
            Some(ObjectOverrides {
                diffuse: Some([0.9, 0.1, 0.1, 1.0]),
                opacity: Some(0.5),
                ..Default::default()
            }),
        );
        scene.add(
            generate_sphere(4.0, 32, 16),
            Some(ObjectOverrides {
                diffuse: Some([0.1, 0.3, 0.9, 1.0]),
                opacity: Some(0.6),
                ..Default::default()
            }),
        );

        if let Some(sphere) = scene.get_mut("sphere") {
            sphere.set_translation(Vector3::new(0.0, 4.0, -6.0));
        }
        if let Some(cone) = scene.get_mut("cone") {
            cone.set_translation(Vector3::new(-6.0, 0.0, 2.0));
        }
    }

    let mut cube_angle = 0.0f32;
    app.set_update(move |scene, dt| {
        cube_angle = (cube_angle + 30.0 * dt) % 360.0;
        if let Some(cube) = scene.get_mut("cube") {
            cube.transform = Matrix4::from_translation(Vector3::new(6.0, 3.0, 0.0))
                * Matrix4::from_angle_y(Deg(cube_angle));
        }
    });

    let mut selected = None;
    app.set_ui(move |ui, frame| {
        camera_panel(ui, frame.camera, frame.controller);
        scene_panel(ui, frame.scene, &mut selected);
    });

    app.run();
    Ok(())
}
