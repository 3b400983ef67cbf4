use bytemuck::{Pod, Zeroable};

use crate::gfx::resources::{
    quad_buffers, sampler_entry, straight_alpha_blend, texture_entry, uniform_buffer,
    uniform_entry, QuadVertex,
};
use crate::gfx::{GfxError, ShaderProgram};

const SHADER_LABEL: &str = "tessera tilemap shader";

/// Names the pipeline layout below relies on. Compilation fails if the
/// shader stops declaring any of them.
const BINDINGS: [&str; 6] = [
    "tilemap",
    "sprites",
    "sprite_sampler",
    "tile_layer",
    "tiles",
    "tile_sampler",
];

/// Group 0: per-map state shared by every layer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct MapUniform {
    pub scaled_viewport: [f32; 2],
    pub inverse_sprite_size: [f32; 2],
    pub tile_size: f32,
    pub inverse_tile_size: f32,
    pub _pad: [f32; 2], // 16-byte alignment
}

impl MapUniform {
    pub fn new(scaled_viewport: [f32; 2], sprite_size: (u32, u32), tile_size: u32) -> Self {
        let tile = tile_size.max(1) as f32;
        Self {
            scaled_viewport,
            inverse_sprite_size: [
                1.0 / sprite_size.0.max(1) as f32,
                1.0 / sprite_size.1.max(1) as f32,
            ],
            tile_size: tile,
            inverse_tile_size: 1.0 / tile,
            _pad: [0.0; 2],
        }
    }
}

/// Group 1: per-layer scroll offset and grid size.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct LayerUniform {
    pub view_offset: [f32; 2],
    pub inverse_tile_texture_size: [f32; 2],
}

impl LayerUniform {
    pub fn new(view_offset: [f32; 2], grid_size: (u32, u32)) -> Self {
        Self {
            view_offset,
            inverse_tile_texture_size: [
                1.0 / grid_size.0.max(1) as f32,
                1.0 / grid_size.1.max(1) as f32,
            ],
        }
    }
}

/// Compositing pipeline shared by every layer of a map.
pub(crate) struct TileMapPipeline {
    pub format: wgpu::TextureFormat,
    pub pipeline: wgpu::RenderPipeline,
    pub map_layout: wgpu::BindGroupLayout,
    pub layer_layout: wgpu::BindGroupLayout,
    pub map_ubo: wgpu::Buffer,
    pub quad_vbo: wgpu::Buffer,
    pub quad_ibo: wgpu::Buffer,
}

impl TileMapPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, GfxError> {
        let program = ShaderProgram::compile(
            device,
            SHADER_LABEL,
            include_str!("shaders/tilemap.wgsl"),
            &BINDINGS,
        )?;

        let map_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera tilemap map bgl"),
            entries: &[
                uniform_entry::<MapUniform>(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let layer_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera tilemap layer bgl"),
            entries: &[
                uniform_entry::<LayerUniform>(0, wgpu::ShaderStages::VERTEX),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera tilemap pipeline layout"),
            bind_group_layouts: &[&map_layout, &layer_layout],
            immediate_size: 0,
        });

        let buffers = [QuadVertex::layout()];
        let targets = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(straight_alpha_blend()),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera tilemap pipeline"),
            layout: Some(&pipeline_layout),
            vertex: program.vertex_state(&buffers),
            fragment: Some(program.fragment_state(&targets)),
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

        let map_ubo = uniform_buffer::<MapUniform>(device, "tessera tilemap map ubo");
        let (quad_vbo, quad_ibo) = quad_buffers(device, "tessera tilemap");

        log::debug!("built tilemap pipeline for {format:?}");

        Ok(Self {
            format,
            pipeline,
            map_layout,
            layer_layout,
            map_ubo,
            quad_vbo,
            quad_ibo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{reflect, BindingSlot};

    #[test]
    fn shader_parses_and_declares_every_binding() {
        let slots = reflect(SHADER_LABEL, include_str!("shaders/tilemap.wgsl"), &BINDINGS).unwrap();
        assert_eq!(slots["tilemap"], BindingSlot { group: 0, binding: 0 });
        assert_eq!(slots["sprites"], BindingSlot { group: 0, binding: 1 });
        assert_eq!(slots["sprite_sampler"], BindingSlot { group: 0, binding: 2 });
        assert_eq!(slots["tile_layer"], BindingSlot { group: 1, binding: 0 });
        assert_eq!(slots["tiles"], BindingSlot { group: 1, binding: 1 });
        assert_eq!(slots["tile_sampler"], BindingSlot { group: 1, binding: 2 });
    }

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<MapUniform>(), 32);
        assert_eq!(std::mem::size_of::<LayerUniform>(), 16);
    }

    #[test]
    fn map_uniform_inverts_sizes() {
        let u = MapUniform::new([320.0, 240.0], (32, 64), 16);
        assert_eq!(u.inverse_sprite_size, [1.0 / 32.0, 1.0 / 64.0]);
        assert_eq!(u.tile_size, 16.0);
        assert_eq!(u.inverse_tile_size, 1.0 / 16.0);
    }
}
