//! wgpu host for ocean surfaces.
//!
//! [`RenderSystem`] acts as the scene container: adding a surface allocates
//! its GPU buffers, removing it destroys them.

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use log::{debug, info};
use wgpu::util::DeviceExt;

use crate::ocean::Vertex;
use crate::params::RenderConfig;
use crate::scene::{Renderable, SceneContainer, SurfaceHandle};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame camera uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

/// Per-surface uniforms (model matrix + material)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub light_dir: [f32; 4],
}

/// GPU resources owned on behalf of one renderable
struct GpuSurface {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    line_index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    index_count: u32,
    line_index_count: u32,
    visible: bool,
    wireframe: bool,
    transparent: bool,
}

impl GpuSurface {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.line_index_buffer.destroy();
        self.uniform_buffer.destroy();
    }
}

/// Rendering system managing wgpu device, pipelines, and per-surface buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    surface_bind_group_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    surfaces: BTreeMap<SurfaceHandle, GpuSurface>,
    next_id: u64,
    clear_color: wgpu::Color,
    light_dir: [f32; 4],
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: std::sync::Arc<winit::window::Window>,
        render_config: &RenderConfig,
    ) -> Result<Self, String> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("Failed to find suitable GPU adapter")?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| format!("Failed to request device: {}", e))?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&surface_caps.formats)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or("Surface reports no alpha modes")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ocean Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("ocean.wgsl").into()),
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = uniform_layout(&device, "Camera Bind Group Layout");
        let surface_bind_group_layout = uniform_layout(&device, "Surface Bind Group Layout");

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ocean Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &surface_bind_group_layout],
            push_constant_ranges: &[],
        });

        let fill_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::TriangleList,
            "fs_main",
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::LineList,
            "fs_line",
        );

        let depth_view = create_depth_view(&device, config.width, config.height);
        let [r, g, b] = render_config.clear_color;
        let light = Vec3::from_array(render_config.light_direction)
            .try_normalize()
            .unwrap_or(Vec3::Y);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            fill_pipeline,
            line_pipeline,
            camera_buffer,
            camera_bind_group,
            surface_bind_group_layout,
            depth_view,
            surfaces: BTreeMap::new(),
            next_id: 0,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            light_dir: light.extend(0.0).to_array(),
        })
    }

    /// Reconfigure the swapchain and depth buffer after a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    /// Push a renderable's current state to its GPU buffers
    ///
    /// Vertices are only uploaded when the geometry is dirty.
    pub fn sync_surface(&mut self, handle: SurfaceHandle, renderable: &mut Renderable) {
        let Some(gpu) = self.surfaces.get_mut(&handle) else {
            return;
        };
        if renderable.geometry.take_dirty() {
            self.queue.write_buffer(
                &gpu.vertex_buffer,
                0,
                bytemuck::cast_slice(renderable.geometry.vertices()),
            );
        }
        let uniforms = surface_uniforms(renderable, self.light_dir);
        self.queue
            .write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        gpu.visible = renderable.visible;
        gpu.wireframe = renderable.material.wireframe;
        gpu.transparent = renderable.material.is_transparent();
    }

    /// Render all visible surfaces
    pub fn render(&self, view_proj: Mat4, eye: Vec3) -> Result<(), wgpu::SurfaceError> {
        let camera = CameraUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera]));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for gpu in draw_order(self.surfaces.values()) {
                render_pass.set_bind_group(1, &gpu.bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                if gpu.wireframe {
                    render_pass.set_pipeline(&self.line_pipeline);
                    render_pass.set_index_buffer(
                        gpu.line_index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..gpu.line_index_count, 0, 0..1);
                } else {
                    render_pass.set_pipeline(&self.fill_pipeline);
                    render_pass
                        .set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl SceneContainer for RenderSystem {
    fn add_surface(&mut self, surface: &Renderable) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next_id);
        self.next_id += 1;

        let geometry = &surface.geometry;
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Ocean Vertex Buffer"),
                contents: bytemuck::cast_slice(geometry.vertices()),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Ocean Index Buffer"),
                contents: bytemuck::cast_slice(geometry.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });
        let line_index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Ocean Line Index Buffer"),
                contents: bytemuck::cast_slice(geometry.line_indices()),
                usage: wgpu::BufferUsages::INDEX,
            });
        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Ocean Surface Uniform Buffer"),
                contents: bytemuck::cast_slice(&[surface_uniforms(surface, self.light_dir)]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ocean Surface Bind Group"),
            layout: &self.surface_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        debug!(
            "GPU surface {:?}: {} vertices, {} indices",
            handle,
            geometry.vertex_count(),
            geometry.indices().len()
        );

        self.surfaces.insert(
            handle,
            GpuSurface {
                vertex_buffer,
                index_buffer,
                line_index_buffer,
                uniform_buffer,
                bind_group,
                index_count: geometry.indices().len() as u32,
                line_index_count: geometry.line_indices().len() as u32,
                visible: surface.visible,
                wireframe: surface.material.wireframe,
                transparent: surface.material.is_transparent(),
            },
        );
        handle
    }

    fn remove_surface(&mut self, handle: SurfaceHandle) {
        if let Some(gpu) = self.surfaces.remove(&handle) {
            gpu.destroy();
            debug!("GPU surface {:?} released", handle);
        }
    }

    fn contains(&self, handle: SurfaceHandle) -> bool {
        self.surfaces.contains_key(&handle)
    }
}

/// Visible surfaces, opaque ones first so blended ones land on top
fn draw_order<'a, I>(surfaces: I) -> impl Iterator<Item = &'a GpuSurface>
where
    I: Iterator<Item = &'a GpuSurface> + Clone,
{
    let visible = surfaces.filter(|s| s.visible);
    visible
        .clone()
        .filter(|s| !s.transparent)
        .chain(visible.filter(|s| s.transparent))
}

fn surface_uniforms(renderable: &Renderable, light_dir: [f32; 4]) -> SurfaceUniforms {
    SurfaceUniforms {
        model: renderable.transform.matrix().to_cols_array_2d(),
        color: renderable.material.linear_rgba(),
        light_dir,
    }
}

/// Prefer an sRGB swapchain format, else whatever the adapter lists first
fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
) -> Result<wgpu::TextureFormat, String> {
    formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .ok_or_else(|| "Surface reports no supported formats".to_string())
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    fragment_entry: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Ocean Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // Visible from below as well
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::PlaneGrid;
    use crate::scene::{SurfaceMaterial, Transform};

    #[test]
    fn test_uniform_sizes_match_shader() {
        // mat4x4 + vec4 in WGSL
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
        // mat4x4 + vec4 + vec4
        assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 96);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_surface_format_prefers_srgb() {
        use wgpu::TextureFormat;
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats),
            Ok(TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&[TextureFormat::Rgba16Float]),
            Ok(TextureFormat::Rgba16Float)
        );
        assert!(choose_surface_format(&[]).is_err());
    }

    #[test]
    fn test_surface_uniforms_carry_material_and_transform() {
        let renderable = Renderable::new(
            PlaneGrid::new(10.0, 10.0, 2),
            SurfaceMaterial {
                color: 0xffffff,
                opacity: 0.25,
                wireframe: false,
            },
            Transform::horizontal(3.0),
        );
        let uniforms = surface_uniforms(&renderable, [0.0, 1.0, 0.0, 0.0]);

        assert_eq!(uniforms.color[3], 0.25);
        assert!((uniforms.color[0] - 1.0).abs() < 1e-6);
        // Translation lives in the last column
        assert_eq!(uniforms.model[3][1], 3.0);
        assert_eq!(uniforms.light_dir, [0.0, 1.0, 0.0, 0.0]);
    }
}
