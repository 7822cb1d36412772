use glam::*;

use wgpu::util::DeviceExt;

use crate::{Camera, Error, IdentityColor, MarkSet, Rgb8};

/// The camera uniform buffer.
#[derive(Debug)]
pub struct CameraBuffer(wgpu::Buffer);

impl CameraBuffer {
    /// Create a new camera buffer.
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<CameraPod>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self(buffer)
    }

    /// Update the camera buffer from a camera and viewport size.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, size: UVec2) {
        self.update_with_pod(queue, &CameraPod::new(camera, size));
    }

    /// Update the camera buffer with a POD.
    pub fn update_with_pod(&self, queue: &wgpu::Queue, pod: &CameraPod) {
        queue.write_buffer(&self.0, 0, bytemuck::bytes_of(pod));
    }

    /// Get the buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }
}

/// The POD representation of camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraPod {
    pub view: Mat4,
    pub proj: Mat4,
    pub size: Vec2,
    _padding_0: [u32; 2],
}

impl CameraPod {
    /// Create a new camera POD for a full viewport.
    pub fn new(camera: &Camera, size: UVec2) -> Self {
        Self::with_proj(camera, camera.projection(size.x as f32 / size.y as f32), size)
    }

    /// Create a new camera POD with an explicit projection, used by the
    /// picking sub-window passes.
    pub fn with_proj(camera: &Camera, proj: Mat4, size: UVec2) -> Self {
        Self {
            view: camera.view(),
            proj,
            size: size.as_vec2(),
            _padding_0: [0; 2],
        }
    }
}

/// The POD representation of a mark vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkVertexPod {
    /// The world-space position.
    pub pos: Vec3,
    /// The packed identity color of the vertex's face.
    pub identity: u32,
    /// The visual vertex color, RGBA bytes.
    pub color: [u8; 4],
    /// The slot index of the owning mark, for the tint lookup.
    pub object: u32,
}

impl MarkVertexPod {
    /// The vertex buffer layout shared by the picking and display pipelines.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MarkVertexPod>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Uint32,
            2 => Unorm8x4,
            3 => Uint32,
        ],
    };
}

/// The vertex buffer holding every mark's triangle soup, packed in slot order.
///
/// A CPU copy of the vertices is retained so the feedback renderer can rewrite
/// a single mark's color range in place.
#[derive(Debug)]
pub struct MarkVertexBuffer {
    buffer: wgpu::Buffer,
    vertices: Vec<MarkVertexPod>,
}

impl MarkVertexBuffer {
    /// Create a new mark vertex buffer from a mark set.
    pub fn new(device: &wgpu::Device, set: &MarkSet) -> Self {
        let vertices = Self::build_vertices(set);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mark Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self { buffer, vertices }
    }

    fn build_vertices(set: &MarkSet) -> Vec<MarkVertexPod> {
        let mut vertices = Vec::with_capacity(set.vertex_count());
        for (slot, mark) in set.marks().iter().enumerate() {
            let color = mark.base_color.to_rgba();
            for (i, pos) in mark.positions.iter().enumerate() {
                let identity = IdentityColor::encode(mark.id, (i / 3) as u16);
                vertices.push(MarkVertexPod {
                    pos: *pos,
                    identity: identity.0,
                    color,
                    object: slot as u32,
                });
            }
        }
        vertices
    }

    /// Get the buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Rewrite the visual colors of one mark, one flat color per face.
    ///
    /// `face_colors` must have one entry per face of the mark.
    pub fn write_face_colors(
        &mut self,
        queue: &wgpu::Queue,
        set: &MarkSet,
        slot: usize,
        face_colors: &[Rgb8],
    ) {
        let range = set.vertex_range_of_slot(slot);
        debug_assert_eq!(face_colors.len() * 3, range.len());

        for (i, vertex) in self.vertices[range.clone()].iter_mut().enumerate() {
            vertex.color = face_colors[i / 3].to_rgba();
        }

        self.upload_range(queue, range);
    }

    /// Rewrite the visual colors of one mark with a single uniform color.
    pub fn write_uniform_color(
        &mut self,
        queue: &wgpu::Queue,
        set: &MarkSet,
        slot: usize,
        color: Rgb8,
    ) {
        let range = set.vertex_range_of_slot(slot);
        let rgba = color.to_rgba();

        for vertex in &mut self.vertices[range.clone()] {
            vertex.color = rgba;
        }

        self.upload_range(queue, range);
    }

    fn upload_range(&self, queue: &wgpu::Queue, range: std::ops::Range<usize>) {
        let offset = (range.start * std::mem::size_of::<MarkVertexPod>()) as wgpu::BufferAddress;
        queue.write_buffer(
            &self.buffer,
            offset,
            bytemuck::cast_slice(&self.vertices[range]),
        );
    }
}

/// The per-mark tint storage buffer, indexed by slot in the display shader.
#[derive(Debug)]
pub struct TintBuffer(wgpu::Buffer);

impl TintBuffer {
    /// Create a new tint buffer with every tint at white.
    pub fn new(device: &wgpu::Device, mark_count: usize) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Tint Buffer"),
            contents: bytemuck::cast_slice(&vec![Vec4::ONE; mark_count.max(1)]),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        Self(buffer)
    }

    /// Update every tint, in slot order.
    pub fn update(&self, queue: &wgpu::Queue, tints: &[Vec4]) {
        queue.write_buffer(&self.0, 0, bytemuck::cast_slice(tints));
    }

    /// Get the buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }
}

/// A picking render target with a depth attachment and a readback buffer.
///
/// The color format is non-sRGB [`wgpu::TextureFormat::Rgba8Unorm`] so the
/// encoded identity bytes survive the readback exactly.
#[derive(Debug)]
pub struct PickingTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth: wgpu::TextureView,
    download: wgpu::Buffer,
    size: UVec2,
    padded_bytes_per_row: u32,
}

impl PickingTexture {
    /// The color format of the picking target.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// The depth format of the picking target.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a new picking texture.
    ///
    /// Fails synchronously if the requested size exceeds the device limits, a
    /// readback from an invalid target would otherwise return undefined
    /// contents.
    pub fn new(device: &wgpu::Device, size: UVec2) -> Result<Self, Error> {
        let limit = device.limits().max_texture_dimension_2d;
        let requested = size.max_element();
        if requested > limit {
            return Err(Error::RenderTargetSize { requested, limit });
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Picking Texture"),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            view_formats: &[],
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Picking Depth Texture"),
                size: wgpu::Extent3d {
                    width: size.x,
                    height: size.y,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                view_formats: &[],
                format: Self::DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            })
            .create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row =
            (size.x * 4).next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        let download = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking Download Buffer"),
            size: (padded_bytes_per_row * size.y) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            texture,
            view,
            depth,
            download,
            size,
            padded_bytes_per_row,
        })
    }

    /// Get the color view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the depth view.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth
    }

    /// Get the size of the target.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Encode the copy of the rendered target into the readback buffer.
    pub fn prepare_download(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.download,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.size.y),
                },
            },
            wgpu::Extent3d {
                width: self.size.x,
                height: self.size.y,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Map the readback buffer and return the tightly packed RGBA bytes.
    pub async fn map_download(&self, device: &wgpu::Device) -> Result<Vec<u8>, Error> {
        let (tx, rx) = oneshot::channel();
        let buffer_slice = self.download.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            if let Err(e) = tx.send(result) {
                log::error!("Error occurred while sending picking readback: {e:?}");
            }
        });
        device.poll(wgpu::Maintain::Wait);
        rx.await??;

        let padded = buffer_slice.get_mapped_range();
        let row_bytes = (self.size.x * 4) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.size.y as usize);
        for row in padded.chunks(self.padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }
        drop(padded);
        self.download.unmap();

        Ok(pixels)
    }
}

/// The depth texture of the display pass.
#[derive(Debug)]
pub struct DepthTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTexture {
    /// The depth format.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a new depth texture.
    pub fn new(device: &wgpu::Device, size: UVec2) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            view_formats: &[],
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Update the size of the depth texture.
    pub fn update_size(&mut self, device: &wgpu::Device, size: UVec2) {
        *self = Self::new(device, size);
    }

    /// Get the texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Get the view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
