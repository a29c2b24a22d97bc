use crate::gpu::scoped;
use starlight_render::{PerObjectConstants, RenderError};
use std::num::NonZeroU64;

const BLOCK_SIZE: u64 = std::mem::size_of::<PerObjectConstants>() as u64;
const INITIAL_SLOTS: usize = 16;

/// Round the constant block up to the device's dynamic offset alignment.
pub(crate) fn slot_stride(alignment: u32) -> u64 {
    BLOCK_SIZE.div_ceil(alignment.max(1) as u64) * alignment.max(1) as u64
}

/// Lay `blocks` out one per slot, `stride` bytes apart, padding with zeros.
pub(crate) fn pack_slots(blocks: &[PerObjectConstants], stride: u64, out: &mut Vec<u8>) {
    out.clear();
    out.resize(blocks.len() * stride as usize, 0);
    for (slot, block) in blocks.iter().enumerate() {
        let start = slot * stride as usize;
        out[start..start + BLOCK_SIZE as usize].copy_from_slice(bytemuck::bytes_of(block));
    }
}

/// Bind group layout for per-draw constants at a dynamic offset.
pub(crate) fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("object_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(BLOCK_SIZE),
            },
            count: None,
        }],
    })
}

/// One uniform buffer holding a constant block per draw in the frame.
///
/// Each `DrawMesh` gets its own slot, so objects sharing a mesh still draw
/// with their own transforms.
pub(crate) struct ObjectUniforms {
    bind_group: wgpu::BindGroup,
    buffer: wgpu::Buffer,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl ObjectUniforms {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, RenderError> {
        let stride = slot_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (buffer, bind_group) = Self::allocate(device, layout, stride, INITIAL_SLOTS)?;
        Ok(Self {
            bind_group,
            buffer,
            stride,
            capacity: INITIAL_SLOTS,
            staging: Vec::new(),
        })
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> Result<(wgpu::Buffer, wgpu::BindGroup), RenderError> {
        scoped(device, "object constants", || {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("object_constants"),
                size: stride * slots as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("object_bind_group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: NonZeroU64::new(BLOCK_SIZE),
                    }),
                }],
            });
            (buffer, bind_group)
        })
    }

    /// Upload one block per draw, growing the buffer when the frame needs more
    /// slots than it holds.
    pub(crate) fn write(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        queue: &wgpu::Queue,
        blocks: &[PerObjectConstants],
    ) -> Result<(), RenderError> {
        if blocks.is_empty() {
            return Ok(());
        }
        if blocks.len() > self.capacity {
            let slots = blocks.len().next_power_of_two();
            let (buffer, bind_group) = Self::allocate(device, layout, self.stride, slots)?;
            tracing::debug!(slots, "grew object constant buffer");
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = slots;
        }
        pack_slots(blocks, self.stride, &mut self.staging);
        queue.write_buffer(&self.buffer, 0, &self.staging);
        Ok(())
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub(crate) fn offset(&self, slot: usize) -> u32 {
        (slot as u64 * self.stride) as u32
    }
}
