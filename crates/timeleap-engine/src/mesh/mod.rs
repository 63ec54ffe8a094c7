//! CPU-side triangle meshes and the material parameters the mesh renderer
//! understands.
//!
//! Meshes are built once from primitives (`primitives`), uploaded once, and
//! drawn every frame with a per-draw transform and material.

pub mod primitives;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex: position + normal, both in model space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    #[inline]
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends `other`, rebasing its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds as `(min, max)`; `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    pub(crate) fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(MeshVertex::new(position, normal));
        idx
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub(crate) fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
    }
}

/// Surface response parameters for the mesh shader.
///
/// `base_color` is linear RGB. `roughness` and `metalness` are in `[0, 1]`;
/// constructors clamp them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub base_color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    pub fn new(base_color: Vec3, roughness: f32, metalness: f32) -> Self {
        Self {
            base_color: base_color.clamp(Vec3::ZERO, Vec3::ONE),
            roughness: roughness.clamp(0.0, 1.0),
            metalness: metalness.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_rebases_indices() {
        let mut a = primitives::cuboid(Vec3::ZERO, Vec3::ONE);
        let b = primitives::cuboid(Vec3::X * 5.0, Vec3::ONE);
        let before = a.vertices.len() as u32;
        a.append(&b);
        assert_eq!(a.triangle_count(), 24);
        assert!(a.indices[36..].iter().all(|&i| i >= before));
        assert!(a.indices.iter().all(|&i| (i as usize) < a.vertices.len()));
    }

    #[test]
    fn bounds_of_empty_is_none() {
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn material_clamps() {
        let m = Material::new(Vec3::new(2.0, -1.0, 0.5), 1.5, -0.2);
        assert_eq!(m.base_color, Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(m.roughness, 1.0);
        assert_eq!(m.metalness, 0.0);
    }
}
