//! Tests des ressources livrées et du décodage des textures

mod common;

use std::path::PathBuf;
use std::rc::Rc;

use common::MockBackend;
use opengl_sandbox::config::AssetConfig;
use opengl_sandbox::gpu::{split_sources, Program, StageKind, TextureError, TextureImage};
use tempfile::TempDir;

fn asset_config() -> AssetConfig {
    AssetConfig {
        root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
        ..AssetConfig::default()
    }
}

#[test]
fn test_lighting_shader_has_both_stages() {
    let assets = asset_config();
    let text = std::fs::read_to_string(assets.resolve(&assets.lighting_shader)).unwrap();
    let sources = split_sources(&text).unwrap();

    assert_eq!(sources.len(), 2);
    let vertex = sources.get(StageKind::Vertex).unwrap();
    let fragment = sources.get(StageKind::Fragment).unwrap();
    assert!(vertex.starts_with("#version 410 core"));
    assert!(fragment.starts_with("#version 410 core"));
    assert!(fragment.contains("uniform Material material;"));
    assert!(!vertex.contains("#type"));
}

#[test]
fn test_lamp_shader_uses_pixel_alias() {
    let assets = asset_config();
    let text = std::fs::read_to_string(assets.resolve(&assets.lamp_shader)).unwrap();
    assert!(text.contains("#type pixel"));

    let sources = split_sources(&text).unwrap();
    assert!(sources.get(StageKind::Fragment).unwrap().contains("color = vec4(1.0);"));
}

#[test]
fn test_shipped_shaders_build() {
    let assets = asset_config();
    let backend = Rc::new(MockBackend::new());

    let lighting = Program::from_file(backend.clone(), assets.resolve(&assets.lighting_shader)).unwrap();
    let lamp = Program::from_file(backend.clone(), assets.resolve(&assets.lamp_shader)).unwrap();
    assert_eq!(backend.live_program_count(), 2);
    assert_eq!(backend.live_shader_count(), 0);

    drop(lighting);
    drop(lamp);
    assert_eq!(backend.live_program_count(), 0);
}

#[test]
fn test_shipped_textures_decode() {
    let assets = asset_config();
    let (diffuse, specular) = TextureImage::load_pair(
        assets.resolve(&assets.diffuse_map),
        assets.resolve(&assets.specular_map),
        assets.flip_textures,
    );
    let diffuse = diffuse.unwrap();
    let specular = specular.unwrap();

    assert_eq!((diffuse.width, diffuse.height), (specular.width, specular.height));
    assert_eq!(diffuse.pixels.len(), (diffuse.width * diffuse.height * 4) as usize);
}

#[test]
fn test_flip_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gradient.png");

    // Ligne du haut rouge, ligne du bas bleue
    let mut img = image::RgbaImage::new(2, 2);
    for x in 0..2 {
        img.put_pixel(x, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(x, 1, image::Rgba([0, 0, 255, 255]));
    }
    img.save(&path).unwrap();

    let upright = TextureImage::load(&path, false).unwrap();
    assert_eq!(upright.pixel(0, 0), Some([255, 0, 0, 255]));

    let flipped = TextureImage::load(&path, true).unwrap();
    assert_eq!(flipped.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(flipped.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(flipped.pixel(2, 0), None);
}

#[test]
fn test_rgb_image_is_expanded_to_rgba() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rgb.png");
    image::RgbImage::from_pixel(3, 1, image::Rgb([10, 20, 30])).save(&path).unwrap();

    let texture = TextureImage::load(&path, false).unwrap();
    assert_eq!(texture.pixels.len(), 12);
    assert_eq!(texture.pixel(2, 0), Some([10, 20, 30, 255]));
}

#[test]
fn test_pixel_index_of_huge_image_does_not_overflow() {
    // Dimensions déclarées au-delà de 2^30 pixels, sans données derrière
    let image = TextureImage {
        width: 1 << 16,
        height: 1 << 16,
        pixels: Vec::new(),
    };
    assert_eq!(image.pixel(65_535, 65_535), None);
}

#[test]
fn test_missing_texture() {
    let dir = TempDir::new().unwrap();
    let err = TextureImage::load(dir.path().join("absent.png"), true).unwrap_err();
    assert!(matches!(err, TextureError::Decode { .. }));
}
