use glam::*;

use crate::{
    Camera, CameraBuffer, CameraPod, Error, IdentityColor, MarkVertexBuffer, MarkVertexPod,
    PickingMap, PickingTexture,
};

/// Validate an area pick size, which must be a nonzero odd number so the
/// focus pixel sits exactly at the window center.
pub fn validate_area_size(size: u32) -> Result<(), Error> {
    if size == 0 {
        return Err(Error::AreaPickSizeZero);
    }
    if size % 2 == 0 {
        return Err(Error::AreaPickSizeEven(size));
    }
    Ok(())
}

/// The picking renderer.
///
/// Renders the mark scene with encoded identity colors instead of visual
/// materials into one of three render targets: a 1x1 window for cheap hover
/// queries, an odd-sized square window centered on the focus point for area
/// attention queries, and the full viewport for occlusion classification.
/// All three reuse the same vertex data, only the camera projection window
/// changes, so the scene is never re-encoded per query type.
///
/// A dedicated camera buffer keeps the window projections away from the
/// display camera state, and every pass is scoped to its own render pass and
/// submission, so no GPU state leaks past a picking call.
#[derive(Debug)]
pub struct PickingRenderer {
    /// The bind group layout.
    #[allow(dead_code)]
    bind_group_layout: wgpu::BindGroupLayout,
    /// The bind group.
    bind_group: wgpu::BindGroup,
    /// The pipeline.
    pipeline: wgpu::RenderPipeline,
    /// The picking camera buffer.
    camera_buffer: CameraBuffer,
    /// The 1x1 hover target.
    hover: PickingTexture,
    /// The area pick target.
    area: PickingTexture,
    /// The full viewport target.
    frame: PickingTexture,
    /// The current area pick size.
    area_size: u32,
    /// The current viewport size.
    viewport: UVec2,
}

impl PickingRenderer {
    /// The bind group layout descriptor.
    pub const BIND_GROUP_LAYOUT_DESCRIPTOR: wgpu::BindGroupLayoutDescriptor<'static> =
        wgpu::BindGroupLayoutDescriptor {
            label: Some("Picking Bind Group Layout"),
            entries: &[
                // Camera uniform buffer
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        };

    /// Create a new picking renderer.
    pub fn new(device: &wgpu::Device, viewport: UVec2, area_size: u32) -> Result<Self, Error> {
        validate_area_size(area_size)?;

        log::debug!("Creating picking camera buffer");
        let camera_buffer = CameraBuffer::new(device, "Picking Camera Buffer");

        log::debug!("Creating picking bind group layout");
        let bind_group_layout =
            device.create_bind_group_layout(&Self::BIND_GROUP_LAYOUT_DESCRIPTOR);

        log::debug!("Creating picking bind group");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Picking Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.buffer().as_entire_binding(),
            }],
        });

        log::debug!("Creating picking pipeline layout");
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Picking Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        log::debug!("Creating picking shader");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Picking Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader/picking.wgsl").into()),
        });

        log::debug!("Creating picking pipeline");
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Picking Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vert_main"),
                buffers: &[MarkVertexPod::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("frag_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: PickingTexture::FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: PickingTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!("Creating picking render targets");
        let hover = PickingTexture::new(device, UVec2::ONE)?;
        let area = PickingTexture::new(device, UVec2::splat(area_size))?;
        let frame = PickingTexture::new(device, viewport)?;

        log::info!("Picking renderer created");

        Ok(Self {
            bind_group_layout,
            bind_group,
            pipeline,
            camera_buffer,
            hover,
            area,
            frame,
            area_size,
            viewport,
        })
    }

    /// Get the current area pick size.
    pub fn area_size(&self) -> u32 {
        self.area_size
    }

    /// Get the current viewport size.
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Reallocate the area pick target for a new size.
    pub fn set_area_size(&mut self, device: &wgpu::Device, size: u32) -> Result<(), Error> {
        validate_area_size(size)?;

        if size != self.area_size {
            self.area = PickingTexture::new(device, UVec2::splat(size))?;
            self.area_size = size;
            log::debug!("Area pick target reallocated to {size}x{size}");
        }

        Ok(())
    }

    /// Reallocate the full-viewport target for a new viewport size.
    pub fn set_viewport(&mut self, device: &wgpu::Device, viewport: UVec2) -> Result<(), Error> {
        if viewport != self.viewport {
            self.frame = PickingTexture::new(device, viewport)?;
            self.viewport = viewport;
        }

        Ok(())
    }

    /// Pick the single pixel under a focus point.
    ///
    /// The focus is in viewport pixels with the origin at the bottom-left
    /// corner. Returns the background sentinel for an empty or off-screen
    /// pixel.
    pub async fn pick_hover(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        vertices: &MarkVertexBuffer,
        focus: IVec2,
    ) -> Result<IdentityColor, Error> {
        let offset = self.focus_to_window_origin(focus, 1);
        let map = self
            .pick_window(device, queue, camera, vertices, &self.hover, offset)
            .await?;

        Ok(map.ids()[0])
    }

    /// Pick the odd-sized square window centered on a focus point.
    ///
    /// The focus is in viewport pixels with the origin at the bottom-left
    /// corner. Off-screen parts of the window read back as background.
    pub async fn pick_area(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        vertices: &MarkVertexBuffer,
        focus: IVec2,
    ) -> Result<PickingMap, Error> {
        let offset = self.focus_to_window_origin(focus, self.area_size);
        self.pick_window(device, queue, camera, vertices, &self.area, offset)
            .await
    }

    /// Pick the full viewport, for occlusion classification.
    pub async fn pick_frame(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        vertices: &MarkVertexBuffer,
    ) -> Result<PickingMap, Error> {
        self.pick_window(device, queue, camera, vertices, &self.frame, Vec2::ZERO)
            .await
    }

    /// Convert a bottom-up focus point to the top-left origin of a
    /// `window`-sized pick window centered on it.
    fn focus_to_window_origin(&self, focus: IVec2, window: u32) -> Vec2 {
        let top_down_y = self.viewport.y as f32 - 1.0 - focus.y as f32;
        let half = (window / 2) as f32;
        Vec2::new(focus.x as f32 - half, top_down_y - half)
    }

    /// Render one picking pass into `target` and read it back.
    async fn pick_window(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        vertices: &MarkVertexBuffer,
        target: &PickingTexture,
        offset: Vec2,
    ) -> Result<PickingMap, Error> {
        let size = target.size();
        let proj =
            camera.projection_window(self.viewport.as_vec2(), offset, size.as_vec2());
        self.camera_buffer
            .update_with_pod(queue, &CameraPod::with_proj(camera, proj, size));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Picking Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Picking Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertices.buffer().slice(..));
            render_pass.draw(0..vertices.vertex_count(), 0..1);
        }

        target.prepare_download(&mut encoder);
        queue.submit(Some(encoder.finish()));

        let pixels = target.map_download(device).await?;

        Ok(PickingMap::from_rgba(size.x, size.y, &pixels))
    }
}
