//! WebGPU render pipeline setup
//!
//! One pipeline: flat-colored triangles, already in clip space. The scene
//! is rebuilt every frame, so `render` maps world vertices through the
//! viewport and streams them into a growable vertex buffer.

use glam::Vec2;
use thiserror::Error;

use super::vertex::{Vertex, colors};
use crate::viewport::Viewport;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to acquire a GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error(transparent)]
    Surface(#[from] wgpu::SurfaceError),
}

/// Smallest vertex buffer allocated, in vertices (a full playing scene
/// with a handful of droplets fits)
const MIN_VERTEX_CAPACITY: usize = 512;

/// Surface configuration for the letterboxed scene: sRGB if offered, opaque
/// compositing if offered
pub fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
) -> Result<wgpu::SurfaceConfiguration, RenderError> {
    let format = caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first())
        .copied()
        .ok_or(RenderError::NoSurfaceFormat)?;

    let alpha_mode = if caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        caps.alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto)
    };

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

/// Every sprite is opaque, so colors replace rather than blend
fn flat_color_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("flat_color_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("flat_color_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("flat_color_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Triangle list, no culling: shapes are wound either way
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Letterbox bars are whatever the clear color is
pub fn clear_color([r, g, b, a]: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

/// World-space scene vertices in clip space
pub fn to_clip_space(vertices: &[Vertex], viewport: &Viewport) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| {
            let ndc = viewport.world_to_ndc(Vec2::from(v.position));
            Vertex::new(ndc.x, ndc.y, v.color)
        })
        .collect()
}

/// Buffer capacity (in vertices) to hold `count`, grown in powers of two
fn vertex_capacity(count: usize) -> usize {
    count.max(MIN_VERTEX_CAPACITY).next_power_of_two()
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices the buffer can hold
    vertex_capacity: usize,
    /// Surface size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("drop-catcher-device"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await?;

        let config = surface_config(&surface.get_capabilities(adapter), width, height)?;
        log::info!(
            "Surface {:?} ({:?}), {}x{}",
            config.format,
            config.alpha_mode,
            config.width,
            config.height
        );
        surface.configure(&device, &config);

        let pipeline = flat_color_pipeline(&device, config.format);
        let capacity = vertex_capacity(0);
        let vertex_buffer = Self::create_vertex_buffer(&device, capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: capacity,
            size: (width, height),
        })
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_vertices"),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Copy the frame's vertices to the GPU, growing the buffer if needed
    fn upload(&mut self, vertices: &[Vertex]) {
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertex_capacity(vertices.len());
            self.vertex_buffer = Self::create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    /// Upload world-space vertices and render
    pub fn render(&mut self, vertices: &[Vertex], viewport: &Viewport) -> Result<(), RenderError> {
        let clip = to_clip_space(vertices, viewport);
        if !clip.is_empty() {
            self.upload(&clip);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(colors::BACKGROUND)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });

            if !clip.is_empty() {
                let bytes = (clip.len() * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress;
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..bytes));
                pass.draw(0..clip.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        alpha: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes: alpha,
            ..Default::default()
        }
    }

    #[test]
    fn test_surface_config_prefers_srgb_and_opaque() {
        let caps = caps(
            vec![
                wgpu::TextureFormat::Bgra8Unorm,
                wgpu::TextureFormat::Bgra8UnormSrgb,
            ],
            vec![
                wgpu::CompositeAlphaMode::PreMultiplied,
                wgpu::CompositeAlphaMode::Opaque,
            ],
        );
        let config = surface_config(&caps, 640, 400).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
        assert_eq!((config.width, config.height), (640, 400));
    }

    #[test]
    fn test_surface_config_fallbacks() {
        let rgba_caps = caps(vec![wgpu::TextureFormat::Rgba8Unorm], vec![]);
        let config = surface_config(&rgba_caps, 0, 0).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Auto);
        assert_eq!((config.width, config.height), (1, 1));

        let none = caps(vec![], vec![]);
        assert!(matches!(
            surface_config(&none, 640, 400),
            Err(RenderError::NoSurfaceFormat)
        ));
    }

    #[test]
    fn test_clear_color() {
        let c = clear_color([0.25, 0.5, 0.75, 1.0]);
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn test_clip_space_corners() {
        let mut viewport = Viewport::new(64.0, 40.0);
        viewport.update(640, 400);
        let world = [
            Vertex::new(0.0, 0.0, colors::BUCKET),
            Vertex::new(64.0, 40.0, colors::DROPLET),
        ];
        let clip = to_clip_space(&world, &viewport);
        assert_eq!(clip[0].position, [-1.0, -1.0]);
        assert_eq!(clip[1].position, [1.0, 1.0]);
        assert_eq!(clip[1].color, colors::DROPLET);
    }

    #[test]
    fn test_vertex_capacity_grows_in_powers_of_two() {
        assert_eq!(vertex_capacity(0), MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity(MIN_VERTEX_CAPACITY), MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity(MIN_VERTEX_CAPACITY + 1), MIN_VERTEX_CAPACITY * 2);
    }
}
