//! GLSL compilation, program linking, and uniform reflection.
//!
//! Compilation runs naga's GLSL frontend and validator on the CPU so shader
//! diagnostics are available before (and without) a GPU device. Linking
//! consumes both compiled stages, checks the stage interface, and records the
//! uniform table the render loop resolves `cloud_shift` from. The GPU half of
//! linking lives in `gpu::pipeline`.

use std::collections::BTreeSet;
use std::fmt;

use wgpu::naga;

use crate::shaders::{FRAGMENT_SHADER_GLSL, VERTEX_SHADER_GLSL};

/// Pipeline stage a GLSL source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl ShaderStageKind {
    pub(crate) fn as_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStageKind::Vertex => naga::ShaderStage::Vertex,
            ShaderStageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStageKind::Vertex => f.write_str("vertex"),
            ShaderStageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Compiler or linker failure, carrying the diagnostic text.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStageKind, log: String },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    /// Diagnostic text reported by the compiler or linker.
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}

/// A single validated shader stage.
///
/// Owns the parsed module only until it is handed to [`link`].
#[derive(Debug)]
pub struct CompiledShader {
    stage: ShaderStageKind,
    source: String,
    module: naga::Module,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStageKind {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Where a named uniform lives inside the program's bind groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    /// Byte offset of the member inside its uniform block.
    pub offset: u32,
    /// Size in bytes of the enclosing uniform block.
    pub block_size: u32,
}

/// A program whose stages compiled and whose interface matched.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    vertex_source: String,
    fragment_source: String,
    uniforms: Vec<(String, UniformLocation)>,
}

impl LinkedProgram {
    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    /// Looks up a uniform block member by name.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, location)| *location)
    }

    /// Every active uniform, in declaration order.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, UniformLocation)> {
        self.uniforms
            .iter()
            .map(|(name, location)| (name.as_str(), *location))
    }
}

/// Parses and validates one GLSL stage.
pub fn compile(source: &str, stage: ShaderStageKind) -> Result<CompiledShader, ShaderError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(stage.as_naga());
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| ShaderError::Compile {
            stage,
            log: errors.emit_to_string(source),
        })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    );
    validator
        .validate(&module)
        .map_err(|error| ShaderError::Compile {
            stage,
            log: error.emit_to_string(source),
        })?;

    tracing::debug!(%stage, "compiled shader stage");
    Ok(CompiledShader {
        stage,
        source: source.to_owned(),
        module,
    })
}

/// Links a vertex and a fragment stage into a program.
///
/// Both stages are consumed and dropped on return, whether linking succeeds
/// or not.
pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<LinkedProgram, ShaderError> {
    let mut problems = Vec::new();

    if vertex.stage != ShaderStageKind::Vertex {
        problems.push(format!("expected a vertex stage, got a {} stage", vertex.stage));
    }
    if fragment.stage != ShaderStageKind::Fragment {
        problems.push(format!(
            "expected a fragment stage, got a {} stage",
            fragment.stage
        ));
    }

    let vertex_entry = entry_point(&vertex.module, naga::ShaderStage::Vertex);
    let fragment_entry = entry_point(&fragment.module, naga::ShaderStage::Fragment);
    match (vertex_entry, fragment_entry) {
        (Some(vertex_entry), Some(fragment_entry)) => {
            let written = stage_outputs(&vertex.module, vertex_entry);
            for location in stage_inputs(&fragment.module, fragment_entry) {
                if !written.contains(&location) {
                    problems.push(format!(
                        "fragment input at location {location} is not written by the vertex stage"
                    ));
                }
            }
        }
        (vertex_entry, fragment_entry) => {
            if vertex_entry.is_none() {
                problems.push("vertex stage has no `main` entry point".to_string());
            }
            if fragment_entry.is_none() {
                problems.push("fragment stage has no `main` entry point".to_string());
            }
        }
    }

    if !problems.is_empty() {
        return Err(ShaderError::Link {
            log: problems.join("\n"),
        });
    }

    let mut uniforms = Vec::new();
    collect_uniforms(&vertex.module, &mut uniforms);
    collect_uniforms(&fragment.module, &mut uniforms);

    Ok(LinkedProgram {
        vertex_source: vertex.source,
        fragment_source: fragment.source,
        uniforms,
    })
}

/// Compiles and links the embedded cloud program.
pub fn build_program() -> Result<LinkedProgram, ShaderError> {
    let vertex = compile(VERTEX_SHADER_GLSL, ShaderStageKind::Vertex)?;
    let fragment = compile(FRAGMENT_SHADER_GLSL, ShaderStageKind::Fragment)?;
    link(vertex, fragment)
}

fn entry_point(module: &naga::Module, stage: naga::ShaderStage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|entry| entry.stage == stage && entry.name == "main")
}

fn stage_outputs(module: &naga::Module, entry: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut locations = BTreeSet::new();
    if let Some(result) = &entry.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut locations);
    }
    locations
}

fn stage_inputs(module: &naga::Module, entry: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut locations = BTreeSet::new();
    for argument in &entry.function.arguments {
        collect_locations(module, argument.ty, argument.binding.as_ref(), &mut locations);
    }
    locations
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    locations: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            locations.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), locations);
                }
            }
        }
    }
}

fn collect_uniforms(module: &naga::Module, uniforms: &mut Vec<(String, UniformLocation)>) {
    for (_, global) in module.global_variables.iter() {
        if global.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(resource) = &global.binding else {
            continue;
        };
        let naga::TypeInner::Struct { members, span } = &module.types[global.ty].inner else {
            continue;
        };
        for member in members {
            let Some(name) = &member.name else {
                continue;
            };
            if uniforms.iter().any(|(existing, _)| existing == name) {
                continue;
            }
            uniforms.push((
                name.clone(),
                UniformLocation {
                    group: resource.group,
                    binding: resource.binding,
                    offset: member.offset,
                    block_size: *span,
                },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::CLOUD_SHIFT_UNIFORM;

    #[test]
    fn embedded_program_links_and_exposes_cloud_shift() {
        let program = build_program().expect("embedded shaders should link");
        let location = program
            .uniform_location(CLOUD_SHIFT_UNIFORM)
            .expect("cloud_shift uniform");
        assert_eq!(location.group, 0);
        assert_eq!(location.binding, 0);
        assert_eq!(location.offset, 0);
        assert!(location.block_size >= 4);
        assert!(program.uniform_location("missing").is_none());
    }

    #[test]
    fn invalid_source_reports_compile_log() {
        let err = compile("#version 450\nvoid main() { oops }\n", ShaderStageKind::Fragment)
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStageKind::Fragment,
                ..
            }
        ));
        assert!(!err.log().trim().is_empty());
    }

    #[test]
    fn link_rejects_unwritten_fragment_inputs() {
        let vertex = compile(
            "#version 450\nvoid main() { gl_Position = vec4(0.0, 0.0, 0.0, 1.0); }\n",
            ShaderStageKind::Vertex,
        )
        .unwrap();
        let fragment = compile(FRAGMENT_SHADER_GLSL, ShaderStageKind::Fragment).unwrap();
        let err = link(vertex, fragment).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.log().contains("location 0"));
    }

    #[test]
    fn link_rejects_swapped_stages() {
        let vertex = compile(VERTEX_SHADER_GLSL, ShaderStageKind::Vertex).unwrap();
        let fragment = compile(FRAGMENT_SHADER_GLSL, ShaderStageKind::Fragment).unwrap();
        let err = link(fragment, vertex).unwrap_err();
        assert!(err.log().contains("expected a vertex stage"));
    }
}
