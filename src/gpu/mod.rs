//! Couche graphique OpenGL
//!
//! - `preprocess` : découpage des fichiers shader `#type`
//! - `backend` : opérations GL nécessaires aux programmes
//! - `shaders` : compilation et édition de liens des programmes
//! - `geometry`, `texture`, `renderer` : ressources et rendu de la scène

pub mod backend;
pub mod geometry;
pub mod preprocess;
pub mod renderer;
pub mod shaders;
pub mod texture;

pub use backend::*;
pub use geometry::*;
pub use preprocess::*;
pub use renderer::*;
pub use shaders::*;
pub use texture::*;
