//! Shader program: compile, link, and name reflection over WGSL
//!
//! Sources are parsed and validated with naga before any GPU work, so a bad
//! shader is reported with its diagnostic text and never reaches the device.
//! Linking checks that every fragment input is fed by a vertex output.
//! Attribute and uniform names are resolved against the compiled modules,
//! the way a GL program answers `getAttribLocation`/`getUniformLocation`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, ShaderStage, Type, TypeInner};

/// Errors produced while building a shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Parsing or validation failed; `log` holds the diagnostic
    Compile { label: String, log: String },
    /// The module has no entry point for the requested stage
    MissingEntryPoint { label: String, stage: ShaderStage },
    /// The stages do not fit together
    Link { log: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Compile { label, log } => write!(f, "{} shader: {}", label, log),
            ProgramError::MissingEntryPoint { label, stage } => {
                write!(f, "{} shader has no {:?} entry point", label, stage)
            }
            ProgramError::Link { log } => write!(f, "{}", log),
        }
    }
}

impl std::error::Error for ProgramError {}

/// A parsed and validated shader stage
#[derive(Debug)]
pub struct CompiledStage {
    stage: ShaderStage,
    label: String,
    source: String,
    module: Module,
    entry_point: String,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The WGSL text this stage was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Name of the entry point used for this stage
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    fn entry_function(&self) -> Option<&naga::Function> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point)
            .map(|ep| &ep.function)
    }
}

/// Parse and validate `source`, then pick its first entry point of `stage`
pub fn compile(stage: ShaderStage, label: &str, source: &str) -> Result<CompiledStage, ProgramError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ProgramError::Compile {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ProgramError::Compile {
            label: label.to_string(),
            log: e.emit_to_string(source),
        })?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .map(|ep| ep.name.clone())
        .ok_or_else(|| ProgramError::MissingEntryPoint {
            label: label.to_string(),
            stage,
        })?;

    Ok(CompiledStage {
        stage,
        label: label.to_string(),
        source: source.to_string(),
        module,
        entry_point,
    })
}

/// A vertex attribute resolved by name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeBinding {
    /// `@location` of the entry-point argument
    pub location: u32,
    /// 1 for scalars, 2 to 4 for vectors
    pub components: u32,
    pub kind: naga::ScalarKind,
    /// Bytes per component
    pub width: u8,
}

/// A uniform resolved by name: which buffer it lives in and where
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    /// Byte offset within the uniform buffer
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
}

/// A uniform buffer declared by the program
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformBlock {
    pub group: u32,
    pub binding: u32,
    /// Total size in bytes, including trailing padding
    pub size: u32,
}

/// Shader modules created on a device from a linked program
pub struct ShaderModules {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// A linked vertex + fragment pair with its name tables
#[derive(Debug)]
pub struct ShaderProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
    attributes: HashMap<String, AttributeBinding>,
    uniforms: HashMap<String, UniformLocation>,
    blocks: Vec<UniformBlock>,
}

impl ShaderProgram {
    /// Compile both sources and link them
    pub fn build(vs_source: &str, fs_source: &str) -> Result<Self, ProgramError> {
        let vertex = compile(ShaderStage::Vertex, "vertex", vs_source)?;
        let fragment = compile(ShaderStage::Fragment, "fragment", fs_source)?;
        link(vertex, fragment)
    }

    /// Attribute binding for `name`, if the vertex stage declares it
    pub fn attribute(&self, name: &str) -> Option<AttributeBinding> {
        self.attributes.get(name).copied()
    }

    /// Uniform location for `name`, if either stage declares it
    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }

    /// The uniform buffer at `group`/`binding`
    pub fn uniform_block(&self, group: u32, binding: u32) -> Option<UniformBlock> {
        self.blocks
            .iter()
            .find(|b| b.group == group && b.binding == binding)
            .copied()
    }

    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }

    /// Hand the validated sources to wgpu
    pub fn create_modules(&self, device: &wgpu::Device) -> ShaderModules {
        let create = |stage: &CompiledStage| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(stage.label()),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(stage.source())),
            })
        };
        ShaderModules {
            vertex: create(&self.vertex),
            fragment: create(&self.fragment),
        }
    }
}

/// Compile and link, logging any failure and returning `None`
pub fn init_shaders(vs_source: &str, fs_source: &str) -> Option<ShaderProgram> {
    match ShaderProgram::build(vs_source, fs_source) {
        Ok(program) => {
            log::info!(
                "Shader program linked ({} attributes, {} uniforms)",
                program.attributes.len(),
                program.uniforms.len()
            );
            Some(program)
        }
        Err(e @ ProgramError::Link { .. }) => {
            log::error!("Unable to initialize the shader program: {}", e);
            None
        }
        Err(e) => {
            log::error!("An error occurred compiling the shaders: {}", e);
            None
        }
    }
}

/// A location-bound value crossing a stage boundary
struct InterfaceVar {
    name: Option<String>,
    location: u32,
    inner: TypeInner,
}

fn collect_interface(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<InterfaceVar>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(InterfaceVar {
            name: name.map(str::to_string),
            location: *location,
            inner: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_interface(
                        module,
                        member.name.as_deref(),
                        member.ty,
                        member.binding.as_ref(),
                        out,
                    );
                }
            }
        }
    }
}

fn stage_inputs(stage: &CompiledStage) -> Vec<InterfaceVar> {
    let mut out = Vec::new();
    if let Some(function) = stage.entry_function() {
        for arg in &function.arguments {
            collect_interface(
                &stage.module,
                arg.name.as_deref(),
                arg.ty,
                arg.binding.as_ref(),
                &mut out,
            );
        }
    }
    out
}

fn stage_outputs(stage: &CompiledStage) -> Vec<InterfaceVar> {
    let mut out = Vec::new();
    if let Some(result) = stage.entry_function().and_then(|f| f.result.as_ref()) {
        collect_interface(&stage.module, None, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn attribute_binding(var: &InterfaceVar) -> Option<AttributeBinding> {
    match var.inner {
        TypeInner::Scalar(scalar) => Some(AttributeBinding {
            location: var.location,
            components: 1,
            kind: scalar.kind,
            width: scalar.width,
        }),
        TypeInner::Vector { size, scalar } => Some(AttributeBinding {
            location: var.location,
            components: size as u32,
            kind: scalar.kind,
            width: scalar.width,
        }),
        _ => None,
    }
}

fn reflect_uniforms(
    module: &Module,
    uniforms: &mut HashMap<String, UniformLocation>,
    blocks: &mut Vec<UniformBlock>,
) {
    let ctx = module.to_ctx();
    for (_, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(rb) = var.binding.as_ref() else {
            continue;
        };
        let inner = &module.types[var.ty].inner;

        if !blocks
            .iter()
            .any(|b| b.group == rb.group && b.binding == rb.binding)
        {
            blocks.push(UniformBlock {
                group: rb.group,
                binding: rb.binding,
                size: inner.size(ctx),
            });
        }

        match inner {
            TypeInner::Struct { members, .. } => {
                for member in members {
                    if let Some(name) = &member.name {
                        uniforms.entry(name.clone()).or_insert(UniformLocation {
                            group: rb.group,
                            binding: rb.binding,
                            offset: member.offset,
                            size: module.types[member.ty].inner.size(ctx),
                        });
                    }
                }
            }
            _ => {
                if let Some(name) = &var.name {
                    uniforms.entry(name.clone()).or_insert(UniformLocation {
                        group: rb.group,
                        binding: rb.binding,
                        offset: 0,
                        size: inner.size(ctx),
                    });
                }
            }
        }
    }
}

/// Check the stage interface and build the name tables
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<ShaderProgram, ProgramError> {
    let outputs = stage_outputs(&vertex);
    for input in stage_inputs(&fragment) {
        let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
            return Err(ProgramError::Link {
                log: format!(
                    "fragment input {} at @location({}) is not written by the vertex stage",
                    input.name.as_deref().unwrap_or("<unnamed>"),
                    input.location
                ),
            });
        };
        if output.inner != input.inner {
            return Err(ProgramError::Link {
                log: format!(
                    "type mismatch at @location({}) between vertex output and fragment input",
                    input.location
                ),
            });
        }
    }

    let mut attributes = HashMap::new();
    for var in stage_inputs(&vertex) {
        if let (Some(name), Some(binding)) = (var.name.clone(), attribute_binding(&var)) {
            attributes.insert(name, binding);
        }
    }

    let mut uniforms = HashMap::new();
    let mut blocks = Vec::new();
    reflect_uniforms(&vertex.module, &mut uniforms, &mut blocks);
    reflect_uniforms(&fragment.module, &mut uniforms, &mut blocks);

    Ok(ShaderProgram {
        vertex,
        fragment,
        attributes,
        uniforms,
        blocks,
    })
}
