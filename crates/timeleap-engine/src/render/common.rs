//! Pieces shared by the renderers.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }

    pub(super) fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<Self>() as u64)
            .unwrap_or(std::num::NonZeroU64::MIN)
    }
}

// ── unit quad ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── scissor ───────────────────────────────────────────────────────────────

/// Physical-pixel scissor rectangle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Converts a logical clip rect to a physical scissor rect inside `target`.
///
/// Each edge is rounded on its own, so two rects sharing a logical edge
/// share the physical edge too. Returns `None` for a zero-area result.
pub fn scissor_for(clip: Rect, scale: f32, target: (u32, u32)) -> Option<ScissorRect> {
    let edge = |v: f32, max: u32| -> u32 {
        let p = (v * scale).round();
        if p <= 0.0 { 0 } else { (p as u32).min(max) }
    };

    let x0 = edge(clip.origin.x, target.0);
    let x1 = edge(clip.right(), target.0);
    let y0 = edge(clip.origin.y, target.1);
    let y1 = edge(clip.bottom(), target.1);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(ScissorRect { x: x0, y: y0, width: x1 - x0, height: y1 - y0 })
}

/// Grows an instance buffer to fit `required` items of `item_size` bytes.
///
/// Returns `true` when a new buffer was created.
pub(super) fn ensure_buffer_capacity(
    device: &wgpu::Device,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    item_size: usize,
    usage: wgpu::BufferUsages,
    label: &'static str,
) -> bool {
    if required <= *capacity && buffer.is_some() {
        return false;
    }

    let new_cap = required.next_power_of_two().max(64);
    *buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * item_size) as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = new_cap;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_scales_and_clamps() {
        let s = scissor_for(Rect::new(10.0, 10.0, 100.0, 50.0), 2.0, (150, 500));
        assert_eq!(s, Some(ScissorRect { x: 20, y: 20, width: 130, height: 100 }));
    }

    #[test]
    fn zero_area_is_none() {
        assert_eq!(scissor_for(Rect::new(10.0, 0.0, 0.0, 50.0), 1.0, (100, 100)), None);
        assert_eq!(scissor_for(Rect::new(200.0, 0.0, 10.0, 50.0), 1.0, (100, 100)), None);
    }

    #[test]
    fn adjacent_rects_share_their_edge() {
        let container = Rect::new(0.0, 0.0, 333.0, 100.0);
        for split in [0.0, 0.4, 50.5, 111.1, 166.5, 332.6, 333.0] {
            let (l, r) = container.split_left(split);
            let wl = scissor_for(l, 1.25, (500, 150)).map_or(0, |s| s.width);
            let wr = scissor_for(r, 1.25, (500, 150)).map_or(0, |s| s.width);
            let full = scissor_for(container, 1.25, (500, 150)).map_or(0, |s| s.width);
            assert_eq!(wl + wr, full, "split at {split}");
        }
    }

    #[test]
    fn viewport_uniform_binding_size() {
        assert_eq!(ViewportUniform::min_binding_size().get(), 16);
    }
}
