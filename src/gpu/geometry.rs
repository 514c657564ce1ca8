//! Géométrie statique du cube
//!
//! Un seul tampon de sommets alimente deux VAO : le cube éclairé (position,
//! normale, coordonnées de texture) et la lampe (position seule).

use std::mem::{offset_of, size_of};
use std::rc::Rc;

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use glow::HasContext;

/// Sommet du cube : position, normale, coordonnées de texture
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

const fn v(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> CubeVertex {
    CubeVertex { position, normal, tex_coords }
}

/// Nombre de sommets dessinés (6 faces × 2 triangles)
pub const CUBE_VERTEX_COUNT: usize = 36;

#[rustfmt::skip]
pub const CUBE_VERTICES: [CubeVertex; CUBE_VERTEX_COUNT] = [
    // Face arrière
    v([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    v([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
    v([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    v([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    v([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    // Face avant
    v([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    v([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    v([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
    v([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    // Face gauche
    v([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    v([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
    v([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    v([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
    v([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    // Face droite
    v([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    v([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
    v([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    v([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    v([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
    v([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    // Face inférieure
    v([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    v([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
    v([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    v([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    v([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
    v([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    // Face supérieure
    v([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    v([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    v([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    v([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
    v([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
];

/// Description d'un attribut de sommet flottant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub offset: i32,
}

pub const VERTEX_STRIDE: i32 = size_of::<CubeVertex>() as i32;

/// Attributs du cube éclairé
pub const LIT_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute { location: 0, components: 3, offset: offset_of!(CubeVertex, position) as i32 },
    VertexAttribute { location: 1, components: 3, offset: offset_of!(CubeVertex, normal) as i32 },
    VertexAttribute { location: 2, components: 2, offset: offset_of!(CubeVertex, tex_coords) as i32 },
];

/// Attributs de la lampe : seule la position est lue
pub const LAMP_ATTRIBUTES: [VertexAttribute; 1] = [LIT_ATTRIBUTES[0]];

/// Cube chargé sur le GPU
pub struct CubeMesh {
    gl: Rc<glow::Context>,
    vbo: glow::NativeBuffer,
    lit_vao: glow::NativeVertexArray,
    lamp_vao: glow::NativeVertexArray,
}

impl CubeMesh {
    pub fn new(gl: Rc<glow::Context>) -> Result<Self> {
        unsafe {
            let vbo = gl.create_buffer().map_err(|e| anyhow!("Création du VBO impossible : {}", e))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&CUBE_VERTICES),
                glow::STATIC_DRAW,
            );

            let lit_vao = match create_vertex_array(&gl, vbo, &LIT_ATTRIBUTES) {
                Ok(vao) => vao,
                Err(e) => {
                    gl.delete_buffer(vbo);
                    return Err(e);
                }
            };
            let lamp_vao = match create_vertex_array(&gl, vbo, &LAMP_ATTRIBUTES) {
                Ok(vao) => vao,
                Err(e) => {
                    gl.delete_vertex_array(lit_vao);
                    gl.delete_buffer(vbo);
                    return Err(e);
                }
            };

            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            log::debug!(target: crate::logging::CORE, "Cube chargé : {} sommets", CUBE_VERTEX_COUNT);

            Ok(Self { gl, vbo, lit_vao, lamp_vao })
        }
    }

    /// Dessine le cube avec tous ses attributs
    pub fn draw_lit(&self) {
        self.draw(self.lit_vao);
    }

    /// Dessine le cube en ne fournissant que les positions
    pub fn draw_lamp(&self) {
        self.draw(self.lamp_vao);
    }

    fn draw(&self, vao: glow::NativeVertexArray) {
        unsafe {
            self.gl.bind_vertex_array(Some(vao));
            self.gl.draw_arrays(glow::TRIANGLES, 0, CUBE_VERTEX_COUNT as i32);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for CubeMesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.lamp_vao);
            self.gl.delete_vertex_array(self.lit_vao);
            self.gl.delete_buffer(self.vbo);
        }
    }
}

/// Crée un VAO lisant `attributes` depuis `vbo`
unsafe fn create_vertex_array(
    gl: &glow::Context,
    vbo: glow::NativeBuffer,
    attributes: &[VertexAttribute],
) -> Result<glow::NativeVertexArray> {
    let vao = gl.create_vertex_array().map_err(|e| anyhow!("Création du VAO impossible : {}", e))?;
    gl.bind_vertex_array(Some(vao));
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

    for attribute in attributes {
        gl.vertex_attrib_pointer_f32(
            attribute.location,
            attribute.components,
            glow::FLOAT,
            false,
            VERTEX_STRIDE,
            attribute.offset,
        );
        gl.enable_vertex_attrib_array(attribute.location);
    }

    gl.bind_vertex_array(None);
    Ok(vao)
}
