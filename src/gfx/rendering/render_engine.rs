//! wgpu rendering backend.
//!
//! Owns the surface, device, depth buffer, and pipelines, and realizes the
//! per-frame control flow: ensure GPU resources for newly added entries,
//! commit per-object matrix/material uniforms through the transform stack,
//! then traverse the registry in render order issuing one indexed draw per
//! visible entry (triangles for solids, lines for wireframes).

use std::sync::Arc;

use log::{error, warn};
use wgpu::{Device, TextureFormat};

use crate::gfx::{camera::Camera, scene::Scene, transforms::Transforms};
use crate::wgpu_utils::uniform_buffer::UniformBuffer;

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::vertex::VertexStreams;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Bind group layouts shared by every scene entry: per-object matrices at
/// group 1 and the material block at group 2 (group 0 is the global light).
pub struct ObjectBindingLayouts {
    pub matrices: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
}

impl ObjectBindingLayouts {
    pub fn new(device: &Device) -> Self {
        let matrices = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Matrices Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Material Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        Self { matrices, material }
    }
}

/// Scene-wide light settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 120.0, 120.0],
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalUniform {
    light_position: [f32; 4],
    light_ambient: [f32; 4],
    light_diffuse: [f32; 4],
}

impl From<&LightConfig> for GlobalUniform {
    fn from(light: &LightConfig) -> Self {
        Self {
            light_position: [light.position[0], light.position[1], light.position[2], 1.0],
            light_ambient: light.ambient,
            light_diffuse: light.diffuse,
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    object_layouts: ObjectBindingLayouts,
    global_ubo: UniformBuffer<GlobalUniform>,
    global_bind_group: wgpu::BindGroup,
    light: LightConfig,
    pub clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a render engine for the given window surface.
    ///
    /// # Panics
    /// Panics if no wgpu adapter or device can be created; there is nothing
    /// to render with in that case.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to request a device!");

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let object_layouts = ObjectBindingLayouts::new(&device);

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let light = LightConfig::default();
        let global_ubo = UniformBuffer::new_with_data(&device, &GlobalUniform::from(&light));
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_ubo.binding_resource(),
            }],
        });

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("solid", include_str!("shaders/solid.wgsl"));
        pipeline_manager.load_shader("vertex-color", include_str!("shaders/vertex_color.wgsl"));
        pipeline_manager.load_shader("wire", include_str!("shaders/wire.wgsl"));

        let scene_layouts = vec![
            global_layout.clone(),
            object_layouts.matrices.clone(),
            object_layouts.material.clone(),
        ];

        pipeline_manager.register_pipeline(
            "solid",
            PipelineConfig::default()
                .with_label("Solid")
                .with_shader("solid")
                .with_color_format(format)
                .with_depth_format(DEPTH_FORMAT)
                .with_bind_group_layouts(scene_layouts.clone())
                .with_vertex_streams(VertexStreams::PositionNormal),
        );

        pipeline_manager.register_pipeline(
            "vertex-color",
            PipelineConfig::default()
                .with_label("Vertex Color")
                .with_shader("vertex-color")
                .with_color_format(format)
                .with_depth_format(DEPTH_FORMAT)
                .with_bind_group_layouts(scene_layouts.clone())
                .with_vertex_streams(VertexStreams::PositionNormalColor),
        );

        pipeline_manager.register_pipeline(
            "wire",
            PipelineConfig::default()
                .with_label("Wire")
                .with_shader("wire")
                .with_color_format(format)
                .with_depth_format(DEPTH_FORMAT)
                .with_bind_group_layouts(scene_layouts)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_vertex_streams(VertexStreams::Position),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for message in errors {
                error!("{message}");
            }
        }

        RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_view,
            format,
            pipeline_manager,
            object_layouts,
            global_ubo,
            global_bind_group,
            light,
            clear_color: wgpu::Color {
                r: 0.9,
                g: 0.9,
                b: 0.9,
                a: 1.0,
            },
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn light(&self) -> LightConfig {
        self.light
    }

    pub fn light_mut(&mut self) -> &mut LightConfig {
        &mut self.light
    }

    /// Reconfigures the surface and depth buffer after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    /// Renders one frame without a UI overlay.
    pub fn render_frame(&mut self, scene: &mut Scene, camera: &Camera, transforms: &mut Transforms) {
        self.render_frame_with_ui(scene, camera, transforms, |_, _, _, _| {});
    }

    /// Renders one frame, finishing with a UI overlay pass.
    ///
    /// Draw order is exactly the registry's render order at the start of
    /// the traversal. A failed surface acquire skips the frame with a
    /// warning; it must never take the application down.
    pub fn render_frame_with_ui<F>(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        transforms: &mut Transforms,
        ui_callback: F,
    ) where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        // Entries added since the last frame get their buffers here, at the
        // frame boundary, never mid-traversal.
        scene.ensure_gpu_resources(&self.device, &self.object_layouts);

        self.global_ubo
            .update_content(&self.queue, GlobalUniform::from(&self.light));

        transforms.update_projection(camera, self.aspect_ratio());

        // Commit uniforms per object: BASE -> PUSHED -> MUTATED ->
        // COMMITTED -> RESTORED. Skipping push/pop here would leak one
        // object's transform into the next object's base.
        for object in scene.iter_mut() {
            if !object.visible || !object.has_gpu_resources() {
                continue;
            }

            transforms.calculate_model_view(camera);
            transforms.push();
            transforms.apply(object.transform);
            let matrices = transforms.matrix_uniforms();
            object.write_frame_uniforms(&self.queue, matrices);
            transforms.pop();
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                warn!("skipping frame: failed to acquire surface texture: {err:?}");
                return;
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.global_bind_group, &[]);

            let solid = self.pipeline_manager.pipeline("solid");
            let vertex_color = self.pipeline_manager.pipeline("vertex-color");
            let wire = self.pipeline_manager.pipeline("wire");

            scene.traverse(|object, _| {
                if !object.visible {
                    return None::<()>;
                }
                let Some(gpu) = object.gpu_resources() else {
                    return None;
                };

                let pipeline = if object.wireframe {
                    wire
                } else if gpu.normal_buffer.is_none() {
                    warn!("skipping '{}': no normal stream for solid draw", object.alias);
                    return None;
                } else if gpu.color_buffer.is_some() {
                    vertex_color
                } else {
                    solid
                };
                let Some(pipeline) = pipeline else {
                    return None;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &gpu.matrices_bind_group, &[]);
                render_pass.set_bind_group(2, &gpu.material_bind_group, &[]);

                render_pass.set_vertex_buffer(0, gpu.position_buffer.slice(..));
                if let Some(normals) = &gpu.normal_buffer {
                    render_pass.set_vertex_buffer(1, normals.slice(..));
                }
                if let Some(colors) = &gpu.color_buffer {
                    render_pass.set_vertex_buffer(2, colors.slice(..));
                }
                render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);

                None
            });
        }

        ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

fn create_depth_view(device: &Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
