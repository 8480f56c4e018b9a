//! Application shell and frame driver.
//!
//! [`NeepApp`] owns the whole session context: camera, controller, scene,
//! transform stack, render engine, and UI. There is no global mutable
//! state; everything a frame touches hangs off this one controller
//! instance, and the winit event loop drives it once per display refresh.

use std::sync::Arc;
use std::time::Instant;

use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::gfx::{
    camera::{Camera, CameraController, CameraMode},
    rendering::RenderEngine,
    scene::Scene,
    transforms::Transforms,
};
use crate::ui::UiManager;

/// Mutable slice of the session handed to the UI callback each frame.
pub struct UiFrame<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
    pub controller: &'a mut CameraController,
}

/// Builds the debug panels for one frame.
pub type UiCallback = Box<dyn FnMut(&imgui::Ui, UiFrame)>;

/// Per-frame animation hook; receives the scene and the frame delta time
/// in seconds.
pub type UpdateCallback = Box<dyn FnMut(&mut Scene, f32)>;

pub struct NeepApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    camera: Camera,
    controller: CameraController,
    transforms: Transforms,
    ui_callback: Option<UiCallback>,
    update_callback: Option<UpdateCallback>,
    last_frame: Instant,
}

impl NeepApp {
    /// Creates an application with an orbiting camera homed at a sensible
    /// viewing distance and an empty scene.
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let mut camera = Camera::new(CameraMode::Orbiting);
        camera.go_home(Some(Vector3::new(0.0, 2.0, 50.0)));
        let controller = CameraController::new(0.5, 2.0);

        Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: Scene::new(),
                camera,
                controller,
                transforms: Transforms::new(),
                ui_callback: None,
                update_callback: None,
                last_frame: Instant::now(),
            },
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.state.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.state.camera
    }

    pub fn transforms_mut(&mut self) -> &mut Transforms {
        &mut self.state.transforms
    }

    /// Registers the per-frame UI callback.
    pub fn set_ui<F>(&mut self, ui_fn: F)
    where
        F: FnMut(&imgui::Ui, UiFrame) + 'static,
    {
        self.state.ui_callback = Some(Box::new(ui_fn));
    }

    /// Registers the per-frame animation callback.
    pub fn set_update<F>(&mut self, update_fn: F)
    where
        F: FnMut(&mut Scene, f32) + 'static,
    {
        self.state.update_callback = Some(Box::new(update_fn));
    }

    /// Runs the application, consuming it into the event loop.
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.state)
            .expect("Failed to run event loop");
    }
}

impl Default for NeepApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("neep")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();

            let window_clone = window_handle.clone();
            let render_engine =
                pollster::block_on(
                    async move { RenderEngine::new(window_clone, width, height).await },
                );

            let ui_manager = UiManager::new(
                render_engine.device(),
                render_engine.queue(),
                render_engine.surface_format(),
                &window_handle,
            );

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(render_engine);
            self.last_frame = Instant::now();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // UI gets first refusal on input events.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if matches!(
                    key_event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    event_loop.exit();
                } else {
                    self.controller
                        .process_keyed_events(&key_event, &mut self.camera);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;

                if let Some(update) = self.update_callback.as_mut() {
                    update(&mut self.scene, dt);
                }

                let AppState {
                    window,
                    render_engine,
                    ui_manager,
                    scene,
                    camera,
                    controller,
                    transforms,
                    ui_callback,
                    ..
                } = self;
                let (Some(window), Some(render_engine)) =
                    (window.as_ref(), render_engine.as_mut())
                else {
                    return;
                };

                match (ui_manager.as_mut(), ui_callback.as_mut()) {
                    (Some(ui_manager), Some(ui_callback)) => {
                        ui_manager.update_logic(window, |ui| {
                            ui_callback(
                                ui,
                                UiFrame {
                                    scene: &mut *scene,
                                    camera: &mut *camera,
                                    controller: &mut *controller,
                                },
                            );
                        });
                        render_engine.render_frame_with_ui(
                            scene,
                            camera,
                            transforms,
                            |device, queue, encoder, view| {
                                ui_manager.render(device, queue, encoder, view);
                            },
                        );
                    }
                    _ => {
                        render_engine.render_frame(scene, camera, transforms);
                    }
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Don't fight the UI for the mouse.
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.controller
            .process_events(&event, window, &mut self.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
