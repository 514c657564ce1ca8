//! Rendu de la scène : cube éclairé et lampe

use std::rc::Rc;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use glow::HasContext;
use log::info;

use super::geometry::CubeMesh;
use super::shaders::Program;
use super::texture::{Texture2D, TextureImage};
use crate::camera::Camera;
use crate::config::{AssetConfig, LightingConfig};
use crate::logging::CORE;

/// Unités de texture utilisées par le matériau
pub const DIFFUSE_UNIT: u32 = 0;
pub const SPECULAR_UNIT: u32 = 1;

/// Tout ce qu'il faut pour dessiner une frame
pub struct SceneRenderer {
    gl: Rc<glow::Context>,
    lighting: Program<glow::Context>,
    lamp: Program<glow::Context>,
    cube: CubeMesh,
    diffuse_map: Texture2D,
    specular_map: Texture2D,
    light: LightingConfig,
}

impl SceneRenderer {
    /// Compile les shaders, charge la géométrie et les textures.
    ///
    /// Le contexte GL doit être courant sur le thread appelant.
    pub fn new(gl: Rc<glow::Context>, assets: &AssetConfig, light: LightingConfig) -> Result<Self> {
        let lighting_path = assets.resolve(&assets.lighting_shader);
        let lighting = Program::from_file(gl.clone(), &lighting_path)
            .with_context(|| format!("Shader d'éclairage '{}'", lighting_path.display()))?;

        let lamp_path = assets.resolve(&assets.lamp_shader);
        let lamp = Program::from_file(gl.clone(), &lamp_path)
            .with_context(|| format!("Shader de lampe '{}'", lamp_path.display()))?;

        let cube = CubeMesh::new(gl.clone())?;

        let (diffuse, specular) = TextureImage::load_pair(
            assets.resolve(&assets.diffuse_map),
            assets.resolve(&assets.specular_map),
            assets.flip_textures,
        );
        let diffuse_map = Texture2D::upload(gl.clone(), &diffuse?)?;
        let specular_map = Texture2D::upload(gl.clone(), &specular?)?;

        lighting.bind();
        lighting.upload_int("material.diffuse", DIFFUSE_UNIT as i32);
        lighting.upload_int("material.specular", SPECULAR_UNIT as i32);
        lighting.unbind();

        info!(target: CORE, "Scène prête");
        Ok(Self {
            gl,
            lighting,
            lamp,
            cube,
            diffuse_map,
            specular_map,
            light,
        })
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) }
    }

    /// Dessine une frame vue depuis `camera`
    pub fn render(&self, camera: &Camera, aspect_ratio: f32) {
        let [r, g, b, a] = self.light.clear_color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let view = camera.view_matrix();
        let projection = camera.projection_matrix(aspect_ratio);
        let lamp_position = Vec3::from_array(self.light.lamp_position);

        self.lighting.bind();
        self.lighting.upload_float3("light.position", lamp_position);
        self.lighting.upload_float3("viewPos", camera.position);
        self.lighting.upload_float("material.shininess", self.light.shininess);
        self.lighting.upload_float3("light.ambient", Vec3::from_array(self.light.ambient));
        self.lighting.upload_float3("light.diffuse", Vec3::from_array(self.light.diffuse));
        self.lighting.upload_float3("light.specular", Vec3::from_array(self.light.specular));
        self.lighting.upload_mat4("view", &view);
        self.lighting.upload_mat4("projection", &projection);
        self.lighting.upload_mat4("model", &Mat4::IDENTITY);

        self.diffuse_map.bind(DIFFUSE_UNIT);
        self.specular_map.bind(SPECULAR_UNIT);
        self.cube.draw_lit();

        self.lamp.bind();
        self.lamp.upload_mat4("view", &view);
        self.lamp.upload_mat4("projection", &projection);
        self.lamp.upload_mat4("model", &lamp_model_matrix(lamp_position, self.light.lamp_scale));
        self.cube.draw_lamp();
        self.lamp.unbind();
    }
}

/// Place la lampe puis la réduit
pub fn lamp_model_matrix(position: Vec3, scale: f32) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamp_model_matrix() {
        let model = lamp_model_matrix(Vec3::new(1.2, 1.0, 2.0), 0.2);
        let corner = model.transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(1.3, 1.1, 2.1)).length() < 1e-5);
        assert!((model.transform_point3(Vec3::ZERO) - Vec3::new(1.2, 1.0, 2.0)).length() < 1e-6);
    }
}
