//! Configuration du bac à sable

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration principale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
    /// Version du contexte OpenGL (profil core)
    pub gl_version: (u8, u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Répertoire racine ; les autres chemins lui sont relatifs
    pub root: PathBuf,
    pub lighting_shader: PathBuf,
    pub lamp_shader: PathBuf,
    pub diffuse_map: PathBuf,
    pub specular_map: PathBuf,
    /// Retourne les images verticalement au chargement (origine GL en bas)
    pub flip_textures: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub lamp_position: [f32; 3],
    pub lamp_scale: f32,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub clear_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hello World".to_string(),
            width: 960,
            height: 600,
            resizable: true,
            vsync: true,
            gl_version: (4, 1),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            lighting_shader: PathBuf::from("shaders/lighting.glsl"),
            lamp_shader: PathBuf::from("shaders/lamp.glsl"),
            diffuse_map: PathBuf::from("textures/container2.png"),
            specular_map: PathBuf::from("textures/container2_specular.png"),
            flip_textures: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            movement_speed: crate::camera::DEFAULT_SPEED,
            mouse_sensitivity: crate::camera::DEFAULT_SENSITIVITY,
            zoom: crate::camera::DEFAULT_ZOOM,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            lamp_position: [1.2, 1.0, 2.0],
            lamp_scale: 0.2,
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.5, 0.5, 0.5],
            specular: [1.0, 1.0, 1.0],
            shininess: 64.0,
            clear_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            forward: "W".to_string(),
            backward: "S".to_string(),
            left: "A".to_string(),
            right: "D".to_string(),
            up: "Space".to_string(),
            down: "ShiftLeft".to_string(),
        }
    }
}

impl AssetConfig {
    /// Chemin absolu (ou relatif au répertoire courant) d'une ressource
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Lecture de la configuration '{}'", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Configuration invalide '{}'", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Charge le fichier s'il existe et est valide, sinon les valeurs par défaut
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    log::warn!(target: crate::logging::APP, "{:#} ; configuration par défaut utilisée", e);
                }
                Self::default()
            }
        }
    }
}
