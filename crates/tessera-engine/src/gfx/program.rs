use std::collections::HashMap;

use super::error::GfxError;

/// Vertex stage entry point every program must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Fragment stage entry point every program must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group / binding index of a named shader resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
}

/// A compiled vertex + fragment WGSL program.
///
/// Source is parsed and validated with naga before it reaches wgpu, so errors
/// come back as [`GfxError`] with the compiler output instead of tripping the
/// device's uncaptured-error handler.
pub struct ShaderProgram {
    label: String,
    module: wgpu::ShaderModule,
    slots: HashMap<String, BindingSlot>,
}

impl ShaderProgram {
    /// Compiles `source` and resolves every name in `bindings`.
    pub fn compile(
        device: &wgpu::Device,
        label: &str,
        source: &str,
        bindings: &[&str],
    ) -> Result<Self, GfxError> {
        let slots = reflect(label, source, bindings)?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        log::debug!("compiled shader `{label}` ({} bindings)", slots.len());

        Ok(Self {
            label: label.to_string(),
            module,
            slots,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    /// Slot of a binding requested at compile time.
    pub fn slot(&self, name: &str) -> Option<BindingSlot> {
        self.slots.get(name).copied()
    }

    pub fn vertex_state<'a>(
        &'a self,
        buffers: &'a [wgpu::VertexBufferLayout<'a>],
    ) -> wgpu::VertexState<'a> {
        wgpu::VertexState {
            module: &self.module,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers,
        }
    }

    pub fn fragment_state<'a>(
        &'a self,
        targets: &'a [Option<wgpu::ColorTargetState>],
    ) -> wgpu::FragmentState<'a> {
        wgpu::FragmentState {
            module: &self.module,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets,
        }
    }
}

/// Parses and validates WGSL, checks the entry points and looks up `bindings`.
pub fn reflect(
    label: &str,
    source: &str,
    bindings: &[&str],
) -> Result<HashMap<String, BindingSlot>, GfxError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| GfxError::ShaderCompile {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| GfxError::ShaderValidate {
            label: label.to_string(),
            log: e.emit_to_string(source),
        })?;

    for (stage, entry) in [
        (naga::ShaderStage::Vertex, VERTEX_ENTRY),
        (naga::ShaderStage::Fragment, FRAGMENT_ENTRY),
    ] {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == stage && ep.name == entry);
        if !found {
            return Err(GfxError::MissingEntryPoint {
                label: label.to_string(),
                entry,
            });
        }
    }

    let mut slots = HashMap::with_capacity(bindings.len());
    for &name in bindings {
        let slot = module.global_variables.iter().find_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            (var.name.as_deref() == Some(name)).then_some(BindingSlot {
                group: binding.group,
                binding: binding.binding,
            })
        });

        let Some(slot) = slot else {
            return Err(GfxError::MissingBinding {
                label: label.to_string(),
                name: name.to_string(),
            });
        };
        slots.insert(name.to_string(), slot);
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
@group(0) @binding(0) var<uniform> tint: vec4<f32>;

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return tint;
}
"#;

    #[test]
    fn resolves_named_bindings() {
        let slots = reflect("minimal", MINIMAL, &["tint"]).unwrap();
        assert_eq!(slots["tint"], BindingSlot { group: 0, binding: 0 });
    }

    #[test]
    fn missing_binding_is_reported_by_name() {
        let err = reflect("minimal", MINIMAL, &["tint", "sprites"]).unwrap_err();
        assert_eq!(
            err,
            GfxError::MissingBinding { label: "minimal".into(), name: "sprites".into() }
        );
    }

    #[test]
    fn syntax_errors_carry_the_compiler_log() {
        let err = reflect("broken", "fn vs_main( {", &[]).unwrap_err();
        match err {
            GfxError::ShaderCompile { label, log } => {
                assert_eq!(label, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_errors_fail_validation() {
        let src = r#"
@vertex
fn vs_main() -> @builtin(position) vec4<f32> {
    let a: f32 = 1.0;
    let b: u32 = 2u;
    return vec4<f32>(a + b);
}
@fragment
fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
"#;
        assert!(reflect("typed", src, &[]).is_err());
    }

    #[test]
    fn missing_fragment_entry_is_reported() {
        let src = r#"
@vertex
fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }
"#;
        let err = reflect("vertex-only", src, &[]).unwrap_err();
        assert_eq!(
            err,
            GfxError::MissingEntryPoint { label: "vertex-only".into(), entry: FRAGMENT_ENTRY }
        );
    }
}
