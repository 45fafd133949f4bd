//! Loading of body surface maps from the asset directory.
//!
//! Files are read with tokio and decoded with `image` off the render thread.
//! A missing or broken file is not fatal: the caller keeps drawing with the
//! placeholder texture.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::data_structures::scene_buffer::TextureRef;

/// A texture file decoded into RGBA8 pixels, ready for upload.
#[derive(Debug)]
pub struct DecodedTexture {
    pub texture: TextureRef,
    pub rgba: RgbaImage,
}

pub fn asset_path(asset_dir: &Path, texture: &TextureRef) -> PathBuf {
    asset_dir.join(texture.name())
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(data)
}

/// Reads and decodes one texture. The file format is guessed from its contents.
pub async fn load_texture(asset_dir: &Path, texture: TextureRef) -> anyhow::Result<DecodedTexture> {
    let path = asset_path(asset_dir, &texture);
    let data = load_binary(&path).await?;
    let rgba = tokio::task::spawn_blocking(move || image::load_from_memory(&data))
        .await?
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    log::debug!(
        "decoded {} ({}x{})",
        texture.name(),
        rgba.width(),
        rgba.height()
    );
    Ok(DecodedTexture { texture, rgba })
}
