//! Gestion des textures

use std::path::{Path, PathBuf};
use std::rc::Rc;

use glow::HasContext;
use log::debug;
use thiserror::Error;

use crate::logging::CORE;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("impossible de charger l'image '{}'", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("dimensions de texture non supportées : {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("erreur OpenGL : {0}")]
    Backend(String),
}

/// Image décodée en RGBA8, prête à être envoyée au GPU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Décode n'importe quel format supporté par `image` ; `flip` retourne
    /// l'image pour que la première ligne corresponde à v = 0.
    pub fn load(path: impl AsRef<Path>, flip: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = if flip { image.flipv() } else { image };
        let rgba = image.into_rgba8();

        debug!(target: CORE, "Image '{}' chargée ({}x{})", path.display(), rgba.width(), rgba.height());
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    /// Décode deux images en parallèle
    pub fn load_pair(
        first: impl AsRef<Path> + Send,
        second: impl AsRef<Path> + Send,
        flip: bool,
    ) -> (Result<Self, TextureError>, Result<Self, TextureError>) {
        rayon::join(|| Self::load(first, flip), || Self::load(second, flip))
    }

    /// Pixel RGBA en (x, y), y compté depuis la première ligne stockée
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Texture 2D OpenGL avec mipmaps et répétition
pub struct Texture2D {
    gl: Rc<glow::Context>,
    handle: glow::NativeTexture,
    pub width: u32,
    pub height: u32,
}

impl Texture2D {
    pub fn upload(gl: Rc<glow::Context>, image: &TextureImage) -> Result<Self, TextureError> {
        let (width, height) = match (i32::try_from(image.width), i32::try_from(image.height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(TextureError::InvalidSize {
                    width: image.width,
                    height: image.height,
                })
            }
        };

        unsafe {
            let handle = gl.create_texture().map_err(TextureError::Backend)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(handle));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(image.pixels.as_slice()),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR_MIPMAP_LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl,
                handle,
                width: image.width,
                height: image.height,
            })
        }
    }

    /// Lie la texture à l'unité `unit` (0 pour GL_TEXTURE0)
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.handle));
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe { self.gl.delete_texture(self.handle) }
    }
}
