use std::cell::RefCell;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::geometry::{GeometryData, Image};

/// GPU-resident geometry: position/UV/index buffers plus the texture.
///
/// Produced once per textured mesh and shared (`Rc`) between an object and
/// its duplicates; everything here is immutable after upload and releases on
/// the last drop.
pub struct GpuMesh {
    position_vbo: wgpu::Buffer,
    uv_vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    texture_view: wgpu::TextureView,
}

impl GpuMesh {
    /// Uploads built geometry and its image.
    ///
    /// Texels convert from f32 RGBA to 8-bit at this boundary; the CPU-side
    /// `Image` stays exact.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &GeometryData,
        image: &Image,
    ) -> Self {
        let position_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tern mesh position vbo"),
            contents: bytemuck::cast_slice(&data.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uv_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tern mesh uv vbo"),
            contents: bytemuck::cast_slice(&data.uvs),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tern mesh ibo"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture_view = upload_texture(device, queue, image);

        Self {
            position_vbo,
            uv_vbo,
            ibo,
            index_count: data.index_count() as u32,
            texture_view,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub(crate) fn texture_view(&self) -> &wgpu::TextureView {
        &self.texture_view
    }

    /// Binds vertex/index buffers on `rpass`.
    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.position_vbo.slice(..));
        rpass.set_vertex_buffer(1, self.uv_vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint32);
    }
}

/// Per-object uniform state: the model matrix UBO and its bind group.
///
/// The bind group also references the (shared) mesh texture, but is built
/// lazily by the renderer — the layout and sampler live there.
pub struct ModelBinding {
    model_ubo: wgpu::Buffer,
    bind_group: RefCell<Option<wgpu::BindGroup>>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        let model_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tern model ubo"),
            size: std::mem::size_of::<ModelUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            model_ubo,
            bind_group: RefCell::new(None),
        }
    }

    /// Writes the object's total matrix for this frame.
    pub(crate) fn write_model(&self, queue: &wgpu::Queue, matrix: Mat4) {
        let uniform = ModelUniform {
            model: matrix.to_cols_array_2d(),
        };
        queue.write_buffer(&self.model_ubo, 0, bytemuck::bytes_of(&uniform));
    }

    pub(crate) fn model_ubo(&self) -> &wgpu::Buffer {
        &self.model_ubo
    }

    /// Returns the cached bind group, building it with `make` on first use.
    pub(crate) fn bind_group_with(
        &self,
        make: impl FnOnce() -> wgpu::BindGroup,
    ) -> wgpu::BindGroup {
        let mut slot = self.bind_group.borrow_mut();
        slot.get_or_insert_with(make).clone()
    }
}

fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, image: &Image) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("tern mesh texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let texels: Vec<u8> = image
        .pixels()
        .iter()
        .flat_map(|c| c.to_rgba8())
        .collect();

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &texels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
