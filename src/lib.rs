//! OpenGL Sandbox - cube éclairé et lampe
//!
//! Cette bibliothèque fournit le chargeur de shaders multi-étages (`#type`),
//! la caméra libre, la gestion des entrées et le rendu de la scène de
//! démonstration.

pub mod app;
pub mod camera;
pub mod config;
pub mod gpu;
pub mod input;
pub mod logging;
pub mod scene;

pub use camera::*;
pub use config::*;
pub use gpu::*;
pub use input::*;
pub use scene::*;

/// Version du bac à sable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
