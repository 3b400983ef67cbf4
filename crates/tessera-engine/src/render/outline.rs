use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Rect, Viewport};
use crate::gfx::resources::{quad_buffers, straight_alpha_blend, uniform_buffer, uniform_entry, QuadVertex};
use crate::gfx::{GfxError, ShaderProgram};

use super::{RenderCtx, RenderTarget};

const SHADER_LABEL: &str = "tessera outline shader";
const BINDINGS: [&str; 1] = ["outline"];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct OutlineUniform {
    surface: [f32; 2],
    origin: [f32; 2],
    size: [f32; 2],
    thickness: f32,
    _pad: f32, // 16-byte alignment for color
    color: [f32; 4],
}

impl OutlineUniform {
    fn new(surface: Viewport, rect: Rect, thickness: f32, color: ColorRgba) -> Self {
        Self {
            surface: [surface.width, surface.height],
            origin: rect.origin.to_array(),
            size: rect.size.to_array(),
            thickness: thickness.max(0.0),
            _pad: 0.0,
            color: color.to_array(),
        }
    }
}

struct OutlineGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
}

/// Draws a rectangle border, e.g. around the selected palette tile.
///
/// The border lies inside the rect. One uniform backs every call, so at most
/// one outline per submitted frame.
#[derive(Default)]
pub struct OutlineRenderer {
    gpu: Option<OutlineGpu>,
}

impl OutlineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes `rect` (surface pixels) with a `thickness`-pixel border.
    ///
    /// Fails only if the pipeline cannot be built.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        rect: Rect,
        thickness: f32,
        color: ColorRgba,
    ) -> Result<(), GfxError> {
        if rect.is_empty() || !ctx.viewport.is_valid() {
            return Ok(());
        }
        self.ensure_gpu(ctx)?;
        let Some(gpu) = self.gpu.as_ref() else {
            return Ok(());
        };

        let uniform = OutlineUniform::new(ctx.viewport, rect, thickness, color);
        ctx.queue.write_buffer(&gpu.ubo, 0, bytemuck::bytes_of(&uniform));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera outline pass"),
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

        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.quad_vbo.slice(..));
        rpass.set_index_buffer(gpu.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..1);
        Ok(())
    }

    fn ensure_gpu(&mut self, ctx: &RenderCtx<'_>) -> Result<(), GfxError> {
        if self.gpu.as_ref().is_some_and(|g| g.format == ctx.surface_format) {
            return Ok(());
        }
        let device = ctx.device;
        let program = ShaderProgram::compile(
            device,
            SHADER_LABEL,
            include_str!("shaders/outline.wgsl"),
            &BINDINGS,
        )?;

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera outline bgl"),
            entries: &[uniform_entry::<OutlineUniform>(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera outline pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let buffers = [QuadVertex::layout()];
        let targets = [Some(wgpu::ColorTargetState {
            format: ctx.surface_format,
            blend: Some(straight_alpha_blend()),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera outline pipeline"),
            layout: Some(&pipeline_layout),
            vertex: program.vertex_state(&buffers),
            fragment: Some(program.fragment_state(&targets)),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let ubo = uniform_buffer::<OutlineUniform>(device, "tessera outline ubo");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera outline bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });
        let (quad_vbo, quad_ibo) = quad_buffers(device, "tessera outline");

        log::debug!("built outline pipeline for {:?}", ctx.surface_format);
        self.gpu = Some(OutlineGpu {
            format: ctx.surface_format,
            pipeline,
            ubo,
            bind_group,
            quad_vbo,
            quad_ibo,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::gfx::{headless, reflect, BindingSlot};

    /// Fragment test of outline.wgsl at rect-local `p`.
    fn stroked(u: &OutlineUniform, p: Vec2) -> bool {
        let t = u.thickness;
        let inner = p.x >= t && p.y >= t && p.x < u.size[0] - t && p.y < u.size[1] - t;
        !inner
    }

    #[test]
    fn shader_parses_and_declares_its_binding() {
        let slots = reflect(SHADER_LABEL, include_str!("shaders/outline.wgsl"), &BINDINGS).unwrap();
        assert_eq!(slots["outline"], BindingSlot { group: 0, binding: 0 });
        assert_eq!(std::mem::size_of::<OutlineUniform>(), 48);
    }

    #[test]
    fn uniform_carries_rect_and_clamps_thickness() {
        let u = OutlineUniform::new(
            Viewport::new(640.0, 480.0),
            Rect::new(32.0, 0.0, 32.0, 32.0),
            -3.0,
            ColorRgba::new(1.0, 1.0, 1.0, 1.0),
        );
        assert_eq!(u.surface, [640.0, 480.0]);
        assert_eq!(u.origin, [32.0, 0.0]);
        assert_eq!(u.size, [32.0, 32.0]);
        assert_eq!(u.thickness, 0.0);
    }

    #[test]
    fn only_the_border_band_is_stroked() {
        let u = OutlineUniform::new(
            Viewport::new(100.0, 100.0),
            Rect::new(0.0, 0.0, 32.0, 16.0),
            2.0,
            ColorRgba::default(),
        );
        assert!(stroked(&u, Vec2::new(0.5, 8.0)));
        assert!(stroked(&u, Vec2::new(31.5, 8.0)));
        assert!(stroked(&u, Vec2::new(16.0, 15.0)));
        assert!(!stroked(&u, Vec2::new(2.0, 2.0)));
        assert!(!stroked(&u, Vec2::new(29.5, 13.5)));
    }

    #[test]
    fn gpu_outline_frames_the_rect() {
        let Some((device, queue)) = headless::device() else {
            eprintln!("no wgpu adapter; skipping device check");
            return;
        };
        let rect = Rect::new(16.0, 8.0, 24.0, 20.0);
        let white = ColorRgba::new(1.0, 1.0, 1.0, 1.0);
        let black = ColorRgba::new(0.0, 0.0, 0.0, 1.0);

        let mut outline = OutlineRenderer::new();
        let pixels = headless::render(&device, &queue, 64, 64, black, |ctx, target| {
            outline.draw(ctx, target, rect, 2.0, white).unwrap();
        });

        let u = OutlineUniform::new(Viewport::new(64.0, 64.0), rect, 2.0, white);
        for y in 0..64u32 {
            for x in 0..64u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let lit = rect.contains(p) && stroked(&u, p - rect.origin);
                let expected = if lit { [255, 255, 255, 255] } else { [0, 0, 0, 255] };
                let got = pixels[(y * 64 + x) as usize];
                assert!(headless::close(got, expected), "pixel ({x}, {y}): {got:?}");
            }
        }
    }
}
