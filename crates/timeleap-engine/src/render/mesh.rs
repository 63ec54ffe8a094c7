use std::num::NonZeroU64;

use anyhow::{bail, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::mesh::{Material, Mesh, MeshVertex};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{ensure_buffer_capacity, scissor_for};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Handle to a mesh uploaded with [`MeshRenderer::upload`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(u32);

/// One mesh instance inside a scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshDraw {
    pub mesh: MeshId,
    pub model: Mat4,
    pub material: Material,
}

/// A 3D scene drawn into part of the window.
///
/// `region` is the logical rect the camera projects onto; only the part of
/// it inside `clip` is written. Two scenes sharing a region with
/// complementary clips never touch the same pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePass<'a> {
    pub region: Rect,
    pub clip: Rect,
    pub view_proj: Mat4,
    pub eye: Vec3,
    /// Direction the light travels, world space.
    pub light_dir: Vec3,
    pub sky: Color,
    pub draws: &'a [MeshDraw],
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

/// Lit, depth-tested mesh renderer.
///
/// Meshes are uploaded once and shared by every scene. Per-draw data lives
/// in one uniform buffer addressed with dynamic offsets, so a frame is a
/// single render pass regardless of how many scenes it holds.
#[derive(Default)]
pub struct MeshRenderer {
    meshes: Vec<GpuMesh>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    sky_pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,

    uniform_buf: Option<wgpu::Buffer>,
    uniform_capacity: usize,

    depth: Option<(wgpu::TextureView, (u32, u32))>,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `mesh` to the GPU. Empty meshes are rejected.
    pub fn upload(&mut self, device: &wgpu::Device, mesh: &Mesh) -> Result<MeshId> {
        if mesh.is_empty() || mesh.vertices.is_empty() {
            bail!("cannot upload an empty mesh");
        }
        let id = MeshId(self.meshes.len() as u32);

        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("timeleap mesh vbo"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("timeleap mesh ibo"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.meshes.push(GpuMesh {
            vertices,
            indices,
            index_count: mesh.indices.len() as u32,
        });
        log::debug!(
            "uploaded mesh {id:?}: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(id)
    }

    /// Draws every scene in one pass over the already-cleared target.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scenes: &[ScenePass<'_>]) {
        if scenes.is_empty() || target.size.0 == 0 || target.size.1 == 0 {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_depth(ctx, target.size);

        let stride = uniform_stride(ctx.device.limits().min_uniform_buffer_offset_alignment);
        let slots: usize = scenes.iter().map(|s| 1 + s.draws.len()).sum();
        let mut bytes = vec![0u8; slots * stride];
        let mut slot = 0usize;
        let mut put = |u: DrawUniform| {
            let at = slot * stride;
            bytes[at..at + std::mem::size_of::<DrawUniform>()].copy_from_slice(bytemuck::bytes_of(&u));
            slot += 1;
        };
        for scene in scenes {
            put(DrawUniform::sky(scene));
            for draw in scene.draws {
                put(DrawUniform::mesh(scene, draw));
            }
        }

        if ensure_buffer_capacity(
            ctx.device,
            &mut self.uniform_buf,
            &mut self.uniform_capacity,
            slots,
            stride,
            wgpu::BufferUsages::UNIFORM,
            "timeleap mesh uniforms",
        ) {
            self.bind_group = None;
        }
        self.ensure_bind_group(ctx);

        let Some(uniform_buf) = self.uniform_buf.as_ref() else { return };
        ctx.queue.write_buffer(uniform_buf, 0, &bytes);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(sky_pipeline) = self.sky_pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some((depth_view, _)) = self.depth.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("timeleap mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let mut slot = 0u32;
        for scene in scenes {
            let first = slot;
            slot += 1 + scene.draws.len() as u32;

            let Some(clip) = scene.region.intersect(scene.clip) else { continue };
            let Some(scissor) = scissor_for(clip, ctx.scale_factor, target.size) else { continue };
            let Some(vp) = scissor_for(scene.region, ctx.scale_factor, target.size) else { continue };

            rpass.set_viewport(
                vp.x as f32,
                vp.y as f32,
                vp.width as f32,
                vp.height as f32,
                0.0,
                1.0,
            );
            rpass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);

            let offset = |s: u32| (s as usize * stride) as wgpu::DynamicOffset;

            rpass.set_pipeline(sky_pipeline);
            rpass.set_bind_group(0, bind_group, &[offset(first)]);
            rpass.draw(0..3, 0..1);

            rpass.set_pipeline(pipeline);
            for (i, draw) in scene.draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(draw.mesh.0 as usize) else {
                    log::debug!("MeshRenderer: unknown {:?}, skipped", draw.mesh);
                    continue;
                };
                rpass.set_bind_group(0, bind_group, &[offset(first + 1 + i as u32)]);
                rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

    }

    // ── lazy init ─────────────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("timeleap mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("timeleap mesh bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(DrawUniform::binding_size()),
                },
                count: None,
            }],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("timeleap mesh pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = build_pipeline(
            ctx,
            &layout,
            &shader,
            "timeleap mesh pipeline",
            "vs_main",
            "fs_main",
            &[MeshVertex::layout()],
            true,
            wgpu::CompareFunction::Less,
        );
        let sky_pipeline = build_pipeline(
            ctx,
            &layout,
            &shader,
            "timeleap sky pipeline",
            "vs_sky",
            "fs_sky",
            &[],
            false,
            wgpu::CompareFunction::Always,
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.sky_pipeline = Some(sky_pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>, size: (u32, u32)) {
        if self.depth.as_ref().is_some_and(|(_, s)| *s == size) {
            return;
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("timeleap depth"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some((view, size));
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(layout) = self.bind_group_layout.as_ref() else { return };
        let Some(buffer) = self.uniform_buf.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("timeleap mesh bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: Some(DrawUniform::binding_size()),
                }),
            }],
        }));
    }
}

#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    ctx: &RenderCtx<'_>,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &'static str,
    vs: &'static str,
    fs: &'static str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::RenderPipeline {
    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Primitive winding is not guaranteed; depth test resolves visibility.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Bytes between consecutive uniform slots.
fn uniform_stride(alignment: u32) -> usize {
    std::mem::size_of::<DrawUniform>().next_multiple_of(alignment.max(1) as usize)
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-draw uniform (192 bytes). `params` = (roughness, metalness, 0, 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    eye: [f32; 4],
    base_color: [f32; 4],
    params: [f32; 4],
    light_dir: [f32; 4],
}

impl DrawUniform {
    fn binding_size() -> NonZeroU64 {
        NonZeroU64::new(std::mem::size_of::<Self>() as u64).unwrap_or(NonZeroU64::MIN)
    }

    fn mesh(scene: &ScenePass<'_>, draw: &MeshDraw) -> Self {
        let m = draw.material;
        Self {
            view_proj: scene.view_proj.to_cols_array_2d(),
            model: draw.model.to_cols_array_2d(),
            eye: scene.eye.extend(1.0).to_array(),
            base_color: m.base_color.extend(1.0).to_array(),
            params: [m.roughness, m.metalness, 0.0, 0.0],
            light_dir: scene.light_dir.normalize_or(Vec3::NEG_Y).extend(0.0).to_array(),
        }
    }

    /// Sky slot: only `base_color` is read.
    fn sky(scene: &ScenePass<'_>) -> Self {
        let (r, g, b, _) = scene.sky.to_straight();
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
            base_color: [r, g, b, 1.0],
            params: [0.0; 4],
            light_dir: [0.0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_192_bytes() {
        assert_eq!(std::mem::size_of::<DrawUniform>(), 192);
        assert_eq!(DrawUniform::binding_size().get(), 192);
    }

    #[test]
    fn stride_respects_alignment() {
        assert_eq!(uniform_stride(256), 256);
        assert_eq!(uniform_stride(64), 192);
        assert_eq!(uniform_stride(0), 192);
    }

    #[test]
    fn mesh_uniform_carries_material() {
        let scene = ScenePass {
            region: Rect::new(0.0, 0.0, 100.0, 100.0),
            clip: Rect::new(0.0, 0.0, 50.0, 100.0),
            view_proj: Mat4::IDENTITY,
            eye: Vec3::new(0.0, 2.0, 5.0),
            light_dir: Vec3::new(0.0, -2.0, 0.0),
            sky: Color::BLACK,
            draws: &[],
        };
        let draw = MeshDraw {
            mesh: MeshId(0),
            model: Mat4::from_translation(Vec3::X),
            material: Material::new(Vec3::new(0.5, 0.4, 0.3), 0.7, 0.1),
        };
        let u = DrawUniform::mesh(&scene, &draw);
        assert_eq!(u.params[..2], [0.7, 0.1]);
        assert_eq!(u.light_dir, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(u.model[3][..3], [1.0, 0.0, 0.0]);
        assert_eq!(u.eye, [0.0, 2.0, 5.0, 1.0]);
    }
}
