//! Programmes shader construits à partir de fichiers `#type`
//!
//! Un [`Program`] est soit entièrement lié et utilisable, soit n'existe pas :
//! toute erreur de lecture, de découpage, de compilation ou d'édition de liens
//! est renvoyée avant sa construction, après libération des objets
//! intermédiaires.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use log::{debug, error};
use thiserror::Error;

use super::backend::{ShaderBackend, UniformValue};
use super::preprocess::{split_sources, ParseError, SourceMap, StageKind};
use crate::logging::CORE;

/// Erreurs de construction d'un programme
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("impossible d'ouvrir le fichier shader '{}'", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("le fichier shader '{}' n'est pas de l'UTF-8 valide", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("aucun étage shader à compiler")]
    NoStages,

    #[error("échec de compilation du shader {stage} : {log}")]
    Compile { stage: StageKind, log: String },

    #[error("échec de l'édition de liens du programme : {log}")]
    Link { log: String },

    #[error("erreur du backend graphique : {0}")]
    Backend(String),
}

/// Programme shader lié, propriétaire exclusif de son handle
pub struct Program<B: ShaderBackend> {
    backend: Rc<B>,
    handle: B::Program,
}

impl<B: ShaderBackend> Program<B> {
    /// Lit, découpe, compile et lie le fichier `path`
    pub fn from_file(backend: Rc<B>, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ShaderError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| ShaderError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(target: CORE, "Chargement du shader '{}'", path.display());
        Self::from_source(backend, &text)
    }

    /// Découpe puis construit un programme depuis un texte `#type`
    pub fn from_source(backend: Rc<B>, text: &str) -> Result<Self, ShaderError> {
        let sources = split_sources(text)?;
        Self::build(backend, &sources)
    }

    /// Compile chaque étage puis lie le programme
    pub fn build(backend: Rc<B>, sources: &SourceMap) -> Result<Self, ShaderError> {
        if sources.is_empty() {
            error!(target: CORE, "Aucun étage shader à compiler");
            return Err(ShaderError::NoStages);
        }

        let mut stages = Vec::with_capacity(sources.len());
        for (kind, source) in sources.iter() {
            match compile_stage(backend.as_ref(), kind, source) {
                Ok(shader) => stages.push(shader),
                Err(e) => {
                    release_stages(backend.as_ref(), None, &stages);
                    return Err(e);
                }
            }
        }

        let handle = match backend.create_program() {
            Ok(handle) => handle,
            Err(message) => {
                error!(target: CORE, "Création du programme impossible : {}", message);
                release_stages(backend.as_ref(), None, &stages);
                return Err(ShaderError::Backend(message));
            }
        };

        for &shader in &stages {
            backend.attach_shader(handle, shader);
        }

        backend.link_program(handle);
        if !backend.program_link_status(handle) {
            let log = backend.program_info_log(handle);
            error!(target: CORE, "{}", log);
            error!(target: CORE, "Échec de l'édition de liens du programme shader");

            backend.delete_program(handle);
            release_stages(backend.as_ref(), None, &stages);
            return Err(ShaderError::Link { log });
        }

        // Les étages ne servent plus une fois le programme lié
        release_stages(backend.as_ref(), Some(handle), &stages);

        debug!(target: CORE, "Programme shader lié ({} étages)", sources.len());
        Ok(Self { backend, handle })
    }

    pub fn bind(&self) {
        self.backend.use_program(Some(self.handle));
    }

    pub fn unbind(&self) {
        self.backend.use_program(None);
    }

    pub fn handle(&self) -> B::Program {
        self.handle
    }

    /// Résout `name` et écrit la valeur dans le programme lié.
    ///
    /// Un nom inconnu n'a aucun effet. Le programme doit être celui
    /// actuellement lié par [`Program::bind`].
    pub fn upload(&self, name: &str, value: UniformValue) {
        let location = self.backend.uniform_location(self.handle, name);
        self.backend.set_uniform(location.as_ref(), &value);
    }

    pub fn upload_int(&self, name: &str, value: i32) {
        self.upload(name, UniformValue::Int(value));
    }

    pub fn upload_float(&self, name: &str, value: f32) {
        self.upload(name, UniformValue::Float(value));
    }

    pub fn upload_float2(&self, name: &str, value: Vec2) {
        self.upload(name, UniformValue::Float2(value));
    }

    pub fn upload_float3(&self, name: &str, value: Vec3) {
        self.upload(name, UniformValue::Float3(value));
    }

    pub fn upload_float4(&self, name: &str, value: Vec4) {
        self.upload(name, UniformValue::Float4(value));
    }

    pub fn upload_mat3(&self, name: &str, matrix: &Mat3) {
        self.upload(name, UniformValue::Mat3(*matrix));
    }

    pub fn upload_mat4(&self, name: &str, matrix: &Mat4) {
        self.upload(name, UniformValue::Mat4(*matrix));
    }
}

impl<B: ShaderBackend> Drop for Program<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.handle);
    }
}

impl<B: ShaderBackend> std::fmt::Debug for Program<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program").field("handle", &self.handle).finish()
    }
}

/// Compile un étage ; en cas d'échec l'objet shader est déjà libéré
fn compile_stage<B: ShaderBackend>(
    backend: &B,
    kind: StageKind,
    source: &str,
) -> Result<B::Shader, ShaderError> {
    let shader = backend.create_shader(kind).map_err(|message| {
        error!(target: CORE, "Création du shader {} impossible : {}", kind, message);
        ShaderError::Backend(message)
    })?;

    backend.shader_source(shader, source);
    backend.compile_shader(shader);

    if !backend.shader_compile_status(shader) {
        let log = backend.shader_info_log(shader);
        backend.delete_shader(shader);

        error!(target: CORE, "{}", log);
        error!(target: CORE, "Échec de compilation du shader {}", kind);
        return Err(ShaderError::Compile { stage: kind, log });
    }

    Ok(shader)
}

/// Détache (si un programme est donné) puis libère les étages
fn release_stages<B: ShaderBackend>(backend: &B, program: Option<B::Program>, stages: &[B::Shader]) {
    for &shader in stages {
        if let Some(program) = program {
            backend.detach_shader(program, shader);
        }
        backend.delete_shader(shader);
    }
}
