use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, TriangleDir};

use super::common::{
    ensure_buffer_capacity, premul_alpha_blend, scissor_for, QuadVertex, ScissorRect,
    ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};

// Shape kinds understood by shapes.wgsl.
const KIND_RECT: f32 = 0.0;
const KIND_CIRCLE: f32 = 1.0;
const KIND_TRIANGLE: f32 = 2.0;

/// Renderer for the non-text overlay commands: rects (optionally rounded and
/// bordered), circles and triangles.
///
/// All kinds share one instanced pipeline; the fragment shader picks the
/// signed-distance function from the instance's `kind`. Colors are linear
/// premultiplied (`paint::Color`).
#[derive(Default)]
pub struct ShapeRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every shape command in `draw_list` in paint order, honouring
    /// each item's clip rect. Text commands are left to [`TextRenderer`].
    ///
    /// [`TextRenderer`]: crate::render::text::TextRenderer
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut instances: Vec<(ShapeInstance, Option<Rect>)> = Vec::new();
        for item in draw_list.iter_in_paint_order() {
            if let Some(inst) = ShapeInstance::from_cmd(&item.cmd) {
                instances.push((inst, item.clip_rect));
            }
        }
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_viewport_uniform(ctx);
        ensure_buffer_capacity(
            ctx.device,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            std::mem::size_of::<ShapeInstance>(),
            wgpu::BufferUsages::VERTEX,
            "timeleap shape instance vbo",
        );

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let raw: Vec<ShapeInstance> = instances.iter().map(|(inst, _)| *inst).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("timeleap shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        // One instanced draw per run of items sharing a clip.
        let full = ScissorRect { x: 0, y: 0, width: target.size.0, height: target.size.1 };
        let mut i = 0usize;
        while i < instances.len() {
            let clip = instances[i].1;
            let mut j = i + 1;
            while j < instances.len() && instances[j].1 == clip {
                j += 1;
            }
            let scissor = match clip {
                None => Some(full),
                Some(c) => scissor_for(c, ctx.scale_factor, target.size),
            };
            if let Some(s) = scissor {
                rpass.set_scissor_rect(s.x, s.y, s.width, s.height);
                rpass.draw_indexed(0..6, 0, i as u32..j as u32);
            }
            i = j;
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("timeleap shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shapes.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("timeleap shape bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(ViewportUniform::min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("timeleap shape pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("timeleap shape pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ShapeInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("timeleap shape quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("timeleap shape quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(layout) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("timeleap shape viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("timeleap shape bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance layout (64 bytes):
///
///  offset  0  origin        [f32; 2]  loc 1
///  offset  8  size          [f32; 2]  loc 2
///  offset 16  color         [f32; 4]  loc 3
///  offset 32  border_color  [f32; 4]  loc 4
///  offset 48  params        [f32; 4]  loc 5  (kind, radius, border width, dir)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ShapeInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
    border_color: [f32; 4],
    params: [f32; 4],
}

impl ShapeInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4, // color
        4 => Float32x4, // border_color
        5 => Float32x4  // params
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    fn from_cmd(cmd: &DrawCmd) -> Option<Self> {
        let bounds = cmd.bounds()?;
        if bounds.is_empty() {
            return None;
        }

        let (color, kind, radius, border, dir) = match cmd {
            DrawCmd::Rect { color, radius, border, .. } => (*color, KIND_RECT, *radius, *border, 0.0),
            DrawCmd::Circle { color, radius, border, .. } => (*color, KIND_CIRCLE, *radius, *border, 0.0),
            DrawCmd::Triangle { color, dir, .. } => {
                let d = match dir {
                    TriangleDir::Left => -1.0,
                    TriangleDir::Right => 1.0,
                };
                (*color, KIND_TRIANGLE, 0.0, None, d)
            }
            DrawCmd::Text { .. } => return None,
        };

        let (border_width, border_color) = border
            .filter(|b| b.width > 0.0)
            .map_or((0.0, color), |b| (b.width, b.color));

        Some(Self {
            origin: [bounds.origin.x, bounds.origin.y],
            size: [bounds.size.x, bounds.size.y],
            color: color.to_array(),
            border_color: border_color.to_array(),
            params: [kind, radius, border_width, dir],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::scene::Border;
    use crate::text::FontId;

    #[test]
    fn instance_is_64_bytes() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 64);
    }

    #[test]
    fn circle_instance_covers_its_square() {
        let cmd = DrawCmd::Circle {
            center: Vec2::new(10.0, 20.0),
            radius: 5.0,
            color: Color::WHITE,
            border: Some(Border::new(2.0, Color::BLACK)),
        };
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.origin, [5.0, 15.0]);
        assert_eq!(inst.size, [10.0, 10.0]);
        assert_eq!(inst.params, [KIND_CIRCLE, 5.0, 2.0, 0.0]);
        assert_eq!(inst.border_color, Color::BLACK.to_array());
    }

    #[test]
    fn triangle_direction_is_signed() {
        let cmd = DrawCmd::Triangle {
            rect: Rect::new(0.0, 0.0, 8.0, 8.0),
            dir: TriangleDir::Left,
            color: Color::WHITE,
        };
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.params[0], KIND_TRIANGLE);
        assert_eq!(inst.params[3], -1.0);
    }

    #[test]
    fn text_and_empty_shapes_are_skipped() {
        let text = DrawCmd::Text {
            text: "Then".into(),
            font: FontId(0),
            size: 12.0,
            color: Color::WHITE,
            origin: Vec2::zero(),
        };
        assert!(ShapeInstance::from_cmd(&text).is_none());

        let empty = DrawCmd::Rect {
            rect: Rect::new(0.0, 0.0, 0.0, 10.0),
            color: Color::WHITE,
            radius: 0.0,
            border: None,
        };
        assert!(ShapeInstance::from_cmd(&empty).is_none());
    }
}
