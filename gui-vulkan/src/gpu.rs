use std::sync::Arc;

use anyhow::Context;
use wgpu::util::DeviceExt;
use wgpu::StoreOp;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::frame::{CellInstance, Vertex};

const QUAD_VERTEX_COUNT: u32 = 6;
const UI_VERTEX_CAPACITY: usize = 4096;

/// Surface, device and the two pipelines: instanced cell quads and
/// free-form UI triangles.
pub struct Gpu {
    #[allow(dead_code)]
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    grid_pipeline: wgpu::RenderPipeline,
    ui_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    cell_buffer: wgpu::Buffer,
    cell_capacity: usize,
    ui_buffer: wgpu::Buffer,
    ui_capacity: usize,
}

impl Gpu {
    pub async fn new(window: Arc<Window>, cell_capacity: usize) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN,
            flags: wgpu::InstanceFlags::from_env_or_default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance.create_surface(window.clone()).context("create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            })
            .await
            .context("request device")?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = preferred_format(&capabilities.formats)?;
        // no vsync: the simulation loop runs as fast as presentation allows
        let present_mode = [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
            .into_iter()
            .find(|mode| capabilities.present_modes.contains(mode))
            .unwrap_or(wgpu::PresentMode::Fifo);

        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .context("surface reports no alpha modes")?;

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            desired_maximum_frame_latency: 1,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::info!("surface {}x{} {:?} {:?}", config.width, config.height, format, present_mode);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_buffer"),
            contents: bytemuck::cast_slice(&[[0.0_f32, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cell_buffer = vertex_buffer::<CellInstance>(&device, "cell_buffer", cell_capacity);
        let ui_buffer = vertex_buffer::<Vertex>(&device, "ui_buffer", UI_VERTEX_CAPACITY);

        let grid_pipeline = create_pipeline(
            &device,
            &shader,
            format,
            "grid_pipeline",
            "vs_grid",
            &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<CellInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![1 => Float32x2, 2 => Float32x2, 3 => Float32x3],
                },
            ],
        );
        let ui_pipeline = create_pipeline(
            &device,
            &shader,
            format,
            "ui_pipeline",
            "vs_ui",
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3],
            }],
        );

        Ok(Self {
            instance,
            surface,
            device,
            queue,
            config,
            size,
            grid_pipeline,
            ui_pipeline,
            quad_buffer,
            cell_buffer,
            cell_capacity,
            ui_buffer,
            ui_capacity: UI_VERTEX_CAPACITY,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, cells: &[CellInstance], ui_vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(wgpu::SurfaceError::OutOfMemory),
            Err(err) => {
                if matches!(err, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.surface.configure(&self.device, &self.config);
                }
                self.surface.get_current_texture()?
            }
        };

        if cells.len() > self.cell_capacity {
            self.cell_capacity = cells.len().next_power_of_two();
            self.cell_buffer = vertex_buffer::<CellInstance>(&self.device, "cell_buffer", self.cell_capacity);
        }
        if ui_vertices.len() > self.ui_capacity {
            self.ui_capacity = ui_vertices.len().next_power_of_two();
            self.ui_buffer = vertex_buffer::<Vertex>(&self.device, "ui_buffer", self.ui_capacity);
        }
        if !cells.is_empty() {
            self.queue.write_buffer(&self.cell_buffer, 0, bytemuck::cast_slice(cells));
        }
        if !ui_vertices.is_empty() {
            self.queue.write_buffer(&self.ui_buffer, 0, bytemuck::cast_slice(ui_vertices));
        }

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("encoder") });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !cells.is_empty() {
                pass.set_pipeline(&self.grid_pipeline);
                pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                let cell_bytes = std::mem::size_of_val(cells) as u64;
                pass.set_vertex_buffer(1, self.cell_buffer.slice(0..cell_bytes));
                pass.draw(0..QUAD_VERTEX_COUNT, 0..cells.len() as u32);
            }

            if !ui_vertices.is_empty() {
                pass.set_pipeline(&self.ui_pipeline);
                let vertex_bytes = std::mem::size_of_val(ui_vertices) as u64;
                pass.set_vertex_buffer(0, self.ui_buffer.slice(0..vertex_bytes));
                pass.draw(0..ui_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// First sRGB format, else whatever the surface lists first.
fn preferred_format(formats: &[wgpu::TextureFormat]) -> anyhow::Result<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
        .context("surface reports no texture formats")
}

fn vertex_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity.max(1) * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    vertex_entry: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
