//! Texture loading: image files decoded into tightly packed RGBA8 pixels.
//!
//! Textures are looked up by file name inside an assets directory. Any failure
//! to open or decode a texture is an error the caller is expected to treat as
//! fatal; there is no fallback texture.

use std::path::{Path, PathBuf};

/// Decoded RGBA8 image, rows top to bottom, 4 bytes per pixel, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Bytes per row.
    pub fn stride(&self) -> u32 {
        self.width * 4
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.stride() + x * 4) as usize;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Errors from texture operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("texture {path:?} not found on disk: {source}")]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode texture {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("texture {path:?} has zero size")]
    Empty { path: PathBuf },
}

/// Read and decode the image at `path` into RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::info!("loaded texture {} ({width}x{height})", path.display());
    Ok(TextureImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Directory that texture file names are resolved against.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Load a texture by file name.
    pub fn load(&self, file_name: &str) -> Result<TextureImage, AssetError> {
        load_texture(self.path_of(file_name))
    }
}

impl Default for AssetDir {
    fn default() -> Self {
        Self::new(".")
    }
}
