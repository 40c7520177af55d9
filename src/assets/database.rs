//! Asset persistence: textures with import settings, serialized objects and
//! raw files under a project root.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::tiles::SpriteRef;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unknown texture '{0}'")]
    UnknownTexture(String),
    #[error("texture '{0}' is not CPU-readable")]
    NotReadable(String),
    #[error("sprite rect {x},{y} {width}x{height} is outside texture '{texture}'")]
    RectOutOfBounds {
        texture: String,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Asset access used by the clipboard and favorites layers.
///
/// Textures are registered by id; reading their pixels requires the
/// texture to be CPU-readable, which is an import setting that can be
/// toggled (and costs a reimport).
pub trait AssetDatabase {
    /// Whether the texture is readable, `None` if it isn't registered
    fn is_readable(&self, texture: &str) -> Option<bool>;

    /// Change a texture's readability and reimport it
    fn set_readable(&mut self, texture: &str, readable: bool) -> Result<(), AssetError>;

    /// Copy of the sprite's pixels
    fn read_pixels(&self, sprite: &SpriteRef) -> Result<RgbaImage, AssetError>;

    /// Write a serialized object at `path`, replacing any existing one
    fn create_asset(&mut self, path: &Path, contents: &str) -> Result<(), AssetError>;

    /// Read a serialized object, `None` if nothing exists at `path`
    fn load_asset(&self, path: &Path) -> Result<Option<String>, AssetError>;

    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<(), AssetError>;
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, AssetError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    Ok(image.to_rgba8())
}

/// Read a file's bytes
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a file, creating missing parent directories
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| AssetError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone)]
struct TextureAsset {
    image: RgbaImage,
    readable: bool,
    reimports: u32,
}

/// File-system backed [`AssetDatabase`] with an in-memory texture registry
#[derive(Resource, Debug, Default)]
pub struct LocalAssetDatabase {
    root: PathBuf,
    textures: HashMap<String, TextureAsset>,
}

impl LocalAssetDatabase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn register_texture(&mut self, id: impl Into<String>, image: RgbaImage, readable: bool) {
        self.textures.insert(
            id.into(),
            TextureAsset {
                image,
                readable,
                reimports: 0,
            },
        );
    }

    /// How many times a texture was reimported after a readability change
    pub fn reimport_count(&self, texture: &str) -> u32 {
        self.textures.get(texture).map(|t| t.reimports).unwrap_or(0)
    }

    /// Absolute location of `path`; relative paths sit under the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetDatabase for LocalAssetDatabase {
    fn is_readable(&self, texture: &str) -> Option<bool> {
        self.textures.get(texture).map(|t| t.readable)
    }

    fn set_readable(&mut self, texture: &str, readable: bool) -> Result<(), AssetError> {
        let asset = self
            .textures
            .get_mut(texture)
            .ok_or_else(|| AssetError::UnknownTexture(texture.to_string()))?;
        if asset.readable != readable {
            asset.readable = readable;
            asset.reimports += 1;
            debug!("Reimported texture '{}' (readable: {})", texture, readable);
        }
        Ok(())
    }

    fn read_pixels(&self, sprite: &SpriteRef) -> Result<RgbaImage, AssetError> {
        let asset = self
            .textures
            .get(&sprite.texture)
            .ok_or_else(|| AssetError::UnknownTexture(sprite.texture.clone()))?;
        if !asset.readable {
            return Err(AssetError::NotReadable(sprite.texture.clone()));
        }

        let fits = sprite.width > 0
            && sprite.height > 0
            && sprite.x + sprite.width <= asset.image.width()
            && sprite.y + sprite.height <= asset.image.height();
        if !fits {
            return Err(AssetError::RectOutOfBounds {
                texture: sprite.texture.clone(),
                x: sprite.x,
                y: sprite.y,
                width: sprite.width,
                height: sprite.height,
            });
        }

        Ok(image::imageops::crop_imm(&asset.image, sprite.x, sprite.y, sprite.width, sprite.height)
            .to_image())
    }

    fn create_asset(&mut self, path: &Path, contents: &str) -> Result<(), AssetError> {
        self.write_file(path, contents.as_bytes())
    }

    fn load_asset(&self, path: &Path) -> Result<Option<String>, AssetError> {
        let full = self.resolve(path);
        if !full.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&full)
            .map(Some)
            .map_err(|source| AssetError::Io { path: full, source })
    }

    fn write_file(&mut self, path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
        write_bytes(&self.resolve(path), bytes)
    }
}
