//! WebGPU sprite pipeline
//!
//! Textured-quad rendering over the sprite batch. One bind group per
//! texture; consecutive quads sharing a texture draw as a single range
//! so submission order is preserved exactly.

use wgpu::util::DeviceExt;

use super::batch::SpriteBatch;
use super::vertex::SpriteVertex;
use crate::content::TextureId;

/// A texture ready for sampling
struct LoadedTexture {
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// Main render state
pub struct SpriteRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<Option<LoadedTexture>>,
    vertex_buffer: wgpu::Buffer,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Logical playfield size for coordinate mapping
    game_size: (f32, f32),
}

impl SpriteRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        game_size: (f32, f32),
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("starfall-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SpriteVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_vertices"),
            contents: bytemuck::cast_slice(&[SpriteVertex::new([0.0; 2], [0.0; 2], [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let mut textures = Vec::with_capacity(TextureId::COUNT);
        textures.resize_with(TextureId::COUNT, || None);

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            texture_layout,
            sampler,
            textures,
            vertex_buffer,
            size: (width, height),
            game_size,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload RGBA8 pixel data for one of the game's textures
    pub fn upload_texture(&mut self, id: TextureId, rgba: &[u8], width: u32, height: u32) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprite_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.textures[id.0 as usize] = Some(LoadedTexture {
            bind_group,
            size: (width, height),
        });
    }

    /// Map game coordinates (top-left origin, y down) to NDC
    fn game_to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        [
            x / self.game_size.0 * 2.0 - 1.0,
            1.0 - y / self.game_size.1 * 2.0,
        ]
    }

    /// Build vertices and render the batch
    pub fn render(&mut self, batch: &SpriteBatch) -> Result<(), wgpu::SurfaceError> {
        let mut vertices: Vec<SpriteVertex> = Vec::with_capacity(batch.len() * 6);
        // (texture, start..end vertex range) per consecutive run
        let mut runs: Vec<(TextureId, u32, u32)> = Vec::new();

        for quad in batch.quads() {
            let Some(loaded) = &self.textures[quad.texture.0 as usize] else {
                debug_assert!(false, "draw against unloaded texture {:?}", quad.texture);
                continue;
            };

            let (tw, th) = (loaded.size.0 as f32, loaded.size.1 as f32);
            let u0 = quad.src.x / tw;
            let v0 = quad.src.y / th;
            let u1 = (quad.src.x + quad.src.width) / tw;
            let v1 = (quad.src.y + quad.src.height) / th;

            // Corner positions in game space, rotated around the anchor
            let (sin, cos) = quad.rotation.sin_cos();
            let anchor_x = quad.dst.x + quad.origin.x * quad.dst.width;
            let anchor_y = quad.dst.y + quad.origin.y * quad.dst.height;
            let corner = |cx: f32, cy: f32| -> [f32; 2] {
                let dx = cx - anchor_x;
                let dy = cy - anchor_y;
                let rx = anchor_x + dx * cos - dy * sin;
                let ry = anchor_y + dx * sin + dy * cos;
                self.game_to_ndc(rx, ry)
            };

            let color = quad.tint.to_array();
            let tl = SpriteVertex::new(corner(quad.dst.x, quad.dst.y), [u0, v0], color);
            let tr = SpriteVertex::new(corner(quad.dst.right(), quad.dst.y), [u1, v0], color);
            let bl = SpriteVertex::new(corner(quad.dst.x, quad.dst.bottom()), [u0, v1], color);
            let br = SpriteVertex::new(
                corner(quad.dst.right(), quad.dst.bottom()),
                [u1, v1],
                color,
            );

            let start = vertices.len() as u32;
            vertices.extend_from_slice(&[tl, tr, bl, tr, br, bl]);
            let end = vertices.len() as u32;

            match runs.last_mut() {
                Some((texture, _, run_end)) if *texture == quad.texture => *run_end = end,
                _ => runs.push((quad.texture, start, end)),
            }
        }

        if !vertices.is_empty() {
            // Recreate the buffer each frame; simple and fine at this
            // vertex count
            self.vertex_buffer =
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("sprite_vertices"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.07,
                            b: 0.12,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            for &(texture, start, end) in &runs {
                if let Some(loaded) = &self.textures[texture.0 as usize] {
                    render_pass.set_bind_group(0, &loaded.bind_group, &[]);
                    render_pass.draw(start..end, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
