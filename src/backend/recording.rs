//! Recording graphics context for testing and headless runs.
//!
//! This context performs no GPU work. It records every call in order,
//! tracks the observable fixed-function state, the uniforms set on each
//! program, and which resources are alive, so that the renderer's output
//! can be inspected without hardware.

use std::collections::{HashMap, HashSet};

use glam::Vec4;

use super::traits::*;
use super::types::*;

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Enable(Capability),
    Disable(Capability),
    CullFace(Face),
    FrontFace(FrontFace),
    DepthFunc(CompareFunction),
    ColorMask(ColorMask),
    DepthMask(bool),
    BlendEquation(BlendEquation),
    BlendFunc(BlendFactor, BlendFactor),
    BlendColor(Vec4),
    Viewport {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    ClearColor(Vec4),
    ClearDepth(f32),
    Clear(ClearFlags),
    CreateProgram {
        program: ProgramHandle,
        source: ShaderSource,
    },
    UseProgram(ProgramHandle),
    SetUniform {
        program: ProgramHandle,
        name: String,
        value: UniformValue,
    },
    DestroyProgram(ProgramHandle),
    CreateTexture {
        texture: TextureHandle,
        format: TextureFormat,
        width: u32,
        height: u32,
    },
    BindTexture {
        unit: u32,
        texture: TextureHandle,
    },
    DestroyTexture(TextureHandle),
    CreateSampler(SamplerHandle),
    BindSampler {
        unit: u32,
        sampler: SamplerHandle,
    },
    DestroySampler(SamplerHandle),
    CreateFramebuffer {
        framebuffer: FramebufferHandle,
        color: TextureHandle,
        depth: TextureHandle,
    },
    BindFramebuffer(Option<FramebufferHandle>),
    DestroyFramebuffer(FramebufferHandle),
    CreateVertexArray(VertexArrayHandle),
    BindVertexArray(VertexArrayHandle),
    DestroyVertexArray(VertexArrayHandle),
    DrawArrays {
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    },
    CreateMesh {
        mesh: MeshHandle,
        vertex_count: usize,
        index_count: usize,
    },
    DrawMesh {
        mesh: MeshHandle,
        index_count: u32,
    },
    DestroyMesh(MeshHandle),
}

/// Observable fixed-function and binding state.
///
/// Starts from the usual OpenGL defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextState {
    pub face_culling: bool,
    pub cull_face: Face,
    pub front_face: FrontFace,
    pub depth_test: bool,
    pub depth_func: CompareFunction,
    pub color_mask: ColorMask,
    pub depth_mask: bool,
    pub blend: bool,
    pub blend_equation: BlendEquation,
    pub blend_source: BlendFactor,
    pub blend_destination: BlendFactor,
    pub blend_color: Vec4,
    pub viewport: (i32, i32, u32, u32),
    pub clear_color: Vec4,
    pub clear_depth: f32,
    pub framebuffer: Option<FramebufferHandle>,
    pub program: Option<ProgramHandle>,
    pub vertex_array: Option<VertexArrayHandle>,
    pub textures: HashMap<u32, TextureHandle>,
    pub samplers: HashMap<u32, SamplerHandle>,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            face_culling: false,
            cull_face: Face::Back,
            front_face: FrontFace::Ccw,
            depth_test: false,
            depth_func: CompareFunction::Less,
            color_mask: ColorMask::ALL,
            depth_mask: true,
            blend: false,
            blend_equation: BlendEquation::Add,
            blend_source: BlendFactor::One,
            blend_destination: BlendFactor::Zero,
            blend_color: Vec4::ZERO,
            viewport: (0, 0, 0, 0),
            clear_color: Vec4::ZERO,
            clear_depth: 1.0,
            framebuffer: None,
            program: None,
            vertex_array: None,
            textures: HashMap::new(),
            samplers: HashMap::new(),
        }
    }
}

/// Graphics context that records instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<GlCall>,
    state: ContextState,
    uniforms: HashMap<(ProgramHandle, String), UniformValue>,
    live: HashSet<u64>,
    next_handle: u64,
    fail_creation: bool,
    creations_left: Option<usize>,
}

impl RecordingContext {
    /// Create a new recording context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent resource creation fail.
    pub fn set_fail_creation(&mut self, fail: bool) {
        self.fail_creation = fail;
    }

    /// Let the next `count` resource creations succeed and fail every one
    /// after them. `None` removes the limit.
    pub fn fail_creation_after(&mut self, count: Option<usize>) {
        self.creations_left = count;
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Drain the recorded calls, keeping state, uniforms and resources.
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    /// Current observable state.
    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// Last value set for a uniform on a program.
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        self.uniforms.get(&(program, name.to_string())).copied()
    }

    /// Number of clear calls recorded.
    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, GlCall::Clear(_)))
            .count()
    }

    /// Number of draw calls (mesh or array draws) recorded.
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, GlCall::DrawMesh { .. } | GlCall::DrawArrays { .. }))
            .count()
    }

    /// Meshes drawn, in draw order.
    pub fn drawn_meshes(&self) -> Vec<MeshHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::DrawMesh { mesh, .. } => Some(*mesh),
                _ => None,
            })
            .collect()
    }

    /// Number of resources created and not yet destroyed.
    pub fn live_resource_count(&self) -> usize {
        self.live.len()
    }

    fn allocate(&mut self, kind: &str) -> Result<u64, String> {
        if self.fail_creation {
            return Err(format!("{kind} creation disabled on this context"));
        }
        if let Some(left) = &mut self.creations_left {
            if *left == 0 {
                return Err(format!("{kind} creation limit reached on this context"));
            }
            *left -= 1;
        }
        self.next_handle += 1;
        self.live.insert(self.next_handle);
        Ok(self.next_handle)
    }

    fn release(&mut self, id: u64, kind: &str) {
        if !self.live.remove(&id) {
            log::warn!("RecordingContext: {kind} {id} destroyed twice or never created");
        }
    }

    fn record(&mut self, call: GlCall) {
        log::trace!("RecordingContext: {:?}", call);
        self.calls.push(call);
    }
}

impl GraphicsContext for RecordingContext {
    fn enable(&mut self, capability: Capability) {
        self.set_capability(capability, true);
        self.record(GlCall::Enable(capability));
    }

    fn disable(&mut self, capability: Capability) {
        self.set_capability(capability, false);
        self.record(GlCall::Disable(capability));
    }

    fn cull_face(&mut self, face: Face) {
        self.state.cull_face = face;
        self.record(GlCall::CullFace(face));
    }

    fn front_face(&mut self, winding: FrontFace) {
        self.state.front_face = winding;
        self.record(GlCall::FrontFace(winding));
    }

    fn depth_func(&mut self, function: CompareFunction) {
        self.state.depth_func = function;
        self.record(GlCall::DepthFunc(function));
    }

    fn color_mask(&mut self, mask: ColorMask) {
        self.state.color_mask = mask;
        self.record(GlCall::ColorMask(mask));
    }

    fn depth_mask(&mut self, enabled: bool) {
        self.state.depth_mask = enabled;
        self.record(GlCall::DepthMask(enabled));
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        self.state.blend_equation = equation;
        self.record(GlCall::BlendEquation(equation));
    }

    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor) {
        self.state.blend_source = source;
        self.state.blend_destination = destination;
        self.record(GlCall::BlendFunc(source, destination));
    }

    fn blend_color(&mut self, color: Vec4) {
        self.state.blend_color = color;
        self.record(GlCall::BlendColor(color));
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.state.viewport = (x, y, width, height);
        self.record(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&mut self, color: Vec4) {
        self.state.clear_color = color;
        self.record(GlCall::ClearColor(color));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.state.clear_depth = depth;
        self.record(GlCall::ClearDepth(depth));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.record(GlCall::Clear(flags));
    }

    fn create_program(&mut self, source: &ShaderSource) -> BackendResult<ProgramHandle> {
        let program = ProgramHandle(
            self.allocate("program")
                .map_err(BackendError::ProgramCreationFailed)?,
        );
        self.record(GlCall::CreateProgram {
            program,
            source: source.clone(),
        });
        Ok(program)
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.state.program = Some(program);
        self.record(GlCall::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        self.uniforms.insert((program, name.to_string()), value);
        self.record(GlCall::SetUniform {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn destroy_program(&mut self, program: ProgramHandle) {
        self.release(program.0, "program");
        self.uniforms.retain(|(owner, _), _| *owner != program);
        if self.state.program == Some(program) {
            self.state.program = None;
        }
        self.record(GlCall::DestroyProgram(program));
    }

    fn create_texture(
        &mut self,
        desc: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> BackendResult<TextureHandle> {
        if let Some(data) = data {
            let expected = (desc.width * desc.height * desc.format.bytes_per_pixel()) as usize;
            if data.len() != expected {
                return Err(BackendError::TextureCreationFailed(format!(
                    "{:?}: expected {} bytes of pixel data, got {}",
                    desc.label,
                    expected,
                    data.len()
                )));
            }
        }
        let texture = TextureHandle(
            self.allocate("texture")
                .map_err(BackendError::TextureCreationFailed)?,
        );
        self.record(GlCall::CreateTexture {
            texture,
            format: desc.format,
            width: desc.width,
            height: desc.height,
        });
        Ok(texture)
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.state.textures.insert(unit, texture);
        self.record(GlCall::BindTexture { unit, texture });
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.release(texture.0, "texture");
        self.state.textures.retain(|_, bound| *bound != texture);
        self.record(GlCall::DestroyTexture(texture));
    }

    fn create_sampler(&mut self, desc: &SamplerDescriptor) -> BackendResult<SamplerHandle> {
        log::trace!("RecordingContext: creating sampler {:?}", desc.label);
        let sampler = SamplerHandle(
            self.allocate("sampler")
                .map_err(BackendError::SamplerCreationFailed)?,
        );
        self.record(GlCall::CreateSampler(sampler));
        Ok(sampler)
    }

    fn bind_sampler(&mut self, unit: u32, sampler: SamplerHandle) {
        self.state.samplers.insert(unit, sampler);
        self.record(GlCall::BindSampler { unit, sampler });
    }

    fn destroy_sampler(&mut self, sampler: SamplerHandle) {
        self.release(sampler.0, "sampler");
        self.state.samplers.retain(|_, bound| *bound != sampler);
        self.record(GlCall::DestroySampler(sampler));
    }

    fn create_framebuffer(
        &mut self,
        color: TextureHandle,
        depth: TextureHandle,
    ) -> BackendResult<FramebufferHandle> {
        let framebuffer = FramebufferHandle(
            self.allocate("framebuffer")
                .map_err(BackendError::FramebufferCreationFailed)?,
        );
        self.record(GlCall::CreateFramebuffer {
            framebuffer,
            color,
            depth,
        });
        Ok(framebuffer)
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.state.framebuffer = framebuffer;
        self.record(GlCall::BindFramebuffer(framebuffer));
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.release(framebuffer.0, "framebuffer");
        if self.state.framebuffer == Some(framebuffer) {
            self.state.framebuffer = None;
        }
        self.record(GlCall::DestroyFramebuffer(framebuffer));
    }

    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle> {
        let vertex_array = VertexArrayHandle(
            self.allocate("vertex array")
                .map_err(BackendError::VertexArrayCreationFailed)?,
        );
        self.record(GlCall::CreateVertexArray(vertex_array));
        Ok(vertex_array)
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.state.vertex_array = Some(vertex_array);
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.release(vertex_array.0, "vertex array");
        if self.state.vertex_array == Some(vertex_array) {
            self.state.vertex_array = None;
        }
        self.record(GlCall::DestroyVertexArray(vertex_array));
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.record(GlCall::DrawArrays {
            topology,
            first,
            count,
        });
    }

    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle> {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(BackendError::MeshCreationFailed(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }
        let mesh = MeshHandle(self.allocate("mesh").map_err(BackendError::MeshCreationFailed)?);
        self.record(GlCall::CreateMesh {
            mesh,
            vertex_count: vertices.len(),
            index_count: indices.len(),
        });
        Ok(mesh)
    }

    fn draw_mesh(&mut self, mesh: MeshHandle, index_count: u32) {
        self.record(GlCall::DrawMesh { mesh, index_count });
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        self.release(mesh.0, "mesh");
        self.record(GlCall::DestroyMesh(mesh));
    }
}

impl RecordingContext {
    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        match capability {
            Capability::FaceCulling => self.state.face_culling = enabled,
            Capability::DepthTest => self.state.depth_test = enabled,
            Capability::Blend => self.state.blend = enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_across_kinds() {
        let mut ctx = RecordingContext::new();
        let texture = ctx
            .create_texture(&TextureDescriptor::default(), None)
            .unwrap();
        let sampler = ctx.create_sampler(&SamplerDescriptor::default()).unwrap();
        let vertex_array = ctx.create_vertex_array().unwrap();
        assert_ne!(texture.0, sampler.0);
        assert_ne!(sampler.0, vertex_array.0);
        assert_eq!(ctx.live_resource_count(), 3);

        ctx.destroy_sampler(sampler);
        assert_eq!(ctx.live_resource_count(), 2);
    }

    #[test]
    fn failed_creation_reports_kind() {
        let mut ctx = RecordingContext::new();
        ctx.set_fail_creation(true);
        let err = ctx.create_vertex_array().unwrap_err();
        assert!(matches!(err, BackendError::VertexArrayCreationFailed(_)));
        assert_eq!(ctx.live_resource_count(), 0);
        assert!(ctx.calls().is_empty());
    }

    #[test]
    fn creation_limit_fails_later_creations() {
        let mut ctx = RecordingContext::new();
        ctx.fail_creation_after(Some(2));
        assert!(ctx.create_vertex_array().is_ok());
        assert!(ctx.create_sampler(&SamplerDescriptor::default()).is_ok());
        assert!(matches!(
            ctx.create_sampler(&SamplerDescriptor::default()),
            Err(BackendError::SamplerCreationFailed(_))
        ));
        assert_eq!(ctx.live_resource_count(), 2);

        ctx.fail_creation_after(None);
        assert!(ctx.create_vertex_array().is_ok());
    }

    #[test]
    fn texture_data_size_is_checked() {
        let mut ctx = RecordingContext::new();
        let desc = TextureDescriptor {
            width: 2,
            height: 2,
            ..Default::default()
        };
        assert!(ctx.create_texture(&desc, Some(&[0u8; 15])).is_err());
        assert!(ctx.create_texture(&desc, Some(&[0u8; 16])).is_ok());
    }

    #[test]
    fn counts_clears_and_draws() {
        let mut ctx = RecordingContext::new();
        ctx.clear(ClearFlags::COLOR_DEPTH);
        ctx.draw_arrays(PrimitiveTopology::TriangleList, 0, 3);
        ctx.draw_mesh(MeshHandle(7), 36);
        assert_eq!(ctx.clear_count(), 1);
        assert_eq!(ctx.draw_count(), 2);
        assert_eq!(ctx.drawn_meshes(), vec![MeshHandle(7)]);
    }

    #[test]
    fn uniforms_are_tracked_per_program() {
        let mut ctx = RecordingContext::new();
        ctx.set_uniform(ProgramHandle(1), "light_count", UniformValue::Int(2));
        ctx.set_uniform(ProgramHandle(2), "light_count", UniformValue::Int(5));
        assert_eq!(
            ctx.uniform(ProgramHandle(1), "light_count"),
            Some(UniformValue::Int(2))
        );
        assert_eq!(
            ctx.uniform(ProgramHandle(2), "light_count"),
            Some(UniformValue::Int(5))
        );
        assert_eq!(ctx.uniform(ProgramHandle(3), "light_count"), None);
    }
}
