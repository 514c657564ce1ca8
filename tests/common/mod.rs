//! Backend shader simulé pour les tests sans contexte OpenGL
//!
//! Enregistre chaque création et libération d'objet pour vérifier qu'aucun
//! handle ne fuit et qu'aucun n'est libéré deux fois.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use opengl_sandbox::gpu::{ShaderBackend, StageKind, UniformValue};

/// Marqueur provoquant un échec de compilation dans une source
pub const COMPILE_ERROR_MARKER: &str = "syntax error";

/// Marqueur provoquant un échec d'édition de liens
pub const LINK_ERROR_MARKER: &str = "mismatched interface";

#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: Cell<u32>,
    shader_sources: RefCell<HashMap<u32, String>>,
    shader_kinds: RefCell<HashMap<u32, StageKind>>,
    live_shaders: RefCell<HashSet<u32>>,
    live_programs: RefCell<HashSet<u32>>,
    attached: RefCell<HashMap<u32, Vec<u32>>>,
    known_uniforms: RefCell<HashSet<String>>,

    pub deleted_shaders: RefCell<Vec<u32>>,
    pub deleted_programs: RefCell<Vec<u32>>,
    pub detached: RefCell<Vec<(u32, u32)>>,
    pub bound_program: Cell<Option<u32>>,
    pub uniform_writes: RefCell<Vec<(String, UniformValue)>>,
    pub silent_writes: Cell<usize>,
    pub fail_program_creation: Cell<bool>,
    /// Rang (à partir de 1) de l'appel à `create_shader` qui échoue
    pub fail_shader_creation_at: Cell<Option<u32>>,
    shaders_requested: Cell<u32>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Noms d'uniforms que le "compilateur" conserve
    pub fn with_uniforms(names: &[&str]) -> Self {
        let backend = Self::new();
        backend
            .known_uniforms
            .borrow_mut()
            .extend(names.iter().map(|n| n.to_string()));
        backend
    }

    pub fn live_shader_count(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn live_program_count(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn compiled_kinds(&self) -> Vec<StageKind> {
        let mut kinds: Vec<_> = self.shader_kinds.borrow().values().copied().collect();
        kinds.sort();
        kinds
    }

    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl ShaderBackend for MockBackend {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: StageKind) -> Result<u32, String> {
        let attempt = self.shaders_requested.get() + 1;
        self.shaders_requested.set(attempt);
        if self.fail_shader_creation_at.get() == Some(attempt) {
            return Err("GL_OUT_OF_MEMORY".to_string());
        }

        let id = self.next();
        self.live_shaders.borrow_mut().insert(id);
        self.shader_kinds.borrow_mut().insert(id, stage);
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.shader_sources.borrow_mut().insert(shader, source.to_string());
    }

    fn compile_shader(&self, _shader: u32) {}

    fn shader_compile_status(&self, shader: u32) -> bool {
        let sources = self.shader_sources.borrow();
        sources
            .get(&shader)
            .is_some_and(|s| !s.trim().is_empty() && !s.contains(COMPILE_ERROR_MARKER))
    }

    fn shader_info_log(&self, shader: u32) -> String {
        format!("0:1(1): error: shader {} invalide", shader)
    }

    fn delete_shader(&self, shader: u32) {
        assert!(
            self.live_shaders.borrow_mut().remove(&shader),
            "shader {} libéré deux fois",
            shader
        );
        self.deleted_shaders.borrow_mut().push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        if self.fail_program_creation.get() {
            return Err("GL_OUT_OF_MEMORY".to_string());
        }
        let id = self.next();
        self.live_programs.borrow_mut().insert(id);
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.attached.borrow_mut().entry(program).or_default().push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.detached.borrow_mut().push((program, shader));
    }

    fn link_program(&self, _program: u32) {}

    fn program_link_status(&self, program: u32) -> bool {
        let attached = self.attached.borrow();
        let sources = self.shader_sources.borrow();
        attached
            .get(&program)
            .map(|shaders| {
                !shaders.is_empty()
                    && shaders
                        .iter()
                        .all(|s| sources.get(s).is_some_and(|src| !src.contains(LINK_ERROR_MARKER)))
            })
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: u32) -> String {
        format!("error: programme {} : interfaces incompatibles", program)
    }

    fn delete_program(&self, program: u32) {
        assert!(
            self.live_programs.borrow_mut().remove(&program),
            "programme {} libéré deux fois",
            program
        );
        self.deleted_programs.borrow_mut().push(program);
    }

    fn use_program(&self, program: Option<u32>) {
        self.bound_program.set(program);
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        self.known_uniforms.borrow().get(name).cloned()
    }

    fn set_uniform(&self, location: Option<&String>, value: &UniformValue) {
        match location {
            Some(name) => self.uniform_writes.borrow_mut().push((name.clone(), *value)),
            None => self.silent_writes.set(self.silent_writes.get() + 1),
        }
    }
}

/// Source valide à deux étages
pub const VALID_SOURCE: &str = "#type vertex\n#version 410 core\nvoid main() {}\n#type fragment\n#version 410 core\nout vec4 color;\nvoid main() { color = vec4(1.0); }\n";
