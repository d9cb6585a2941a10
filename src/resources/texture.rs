//! Texture and sampler loading and management

use crate::backend::*;
use crate::error::{RendererError, RendererResult};
use glam::UVec2;
use image::DynamicImage;
use std::path::Path;

/// Decoded RGBA8 pixel data
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub name: String,
}

impl TextureData {
    /// Load texture from file.
    ///
    /// Rows are flipped so that the first row in memory is the bottom of
    /// the image, matching texture coordinates with v pointing up.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RendererResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let load_error = |source| RendererError::TextureLoad {
            path: path.to_path_buf(),
            source,
        };
        let bytes = std::fs::read(path).map_err(|err| load_error(image::ImageError::IoError(err)))?;
        Self::from_bytes(&bytes, &name).map_err(load_error)
    }

    /// Load texture from encoded bytes, with the same row flip as [`Self::from_file`]
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(img, name))
    }

    fn from_image(img: DynamicImage, name: &str) -> Self {
        let rgba = img.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();

        Self {
            width,
            height,
            data: rgba.into_raw(),
            name: name.to_string(),
        }
    }

    /// Create a solid color texture
    pub fn solid_color(color: [u8; 4], name: &str) -> Self {
        Self {
            width: 1,
            height: 1,
            data: color.to_vec(),
            name: name.to_string(),
        }
    }

    /// Create a default white texture
    pub fn white() -> Self {
        Self::solid_color([255, 255, 255, 255], "white")
    }
}

/// A 2D texture living on the GPU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture2D {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl Texture2D {
    /// Upload decoded pixels
    pub fn upload<G: GraphicsContext>(
        ctx: &mut G,
        data: &TextureData,
        generate_mipmaps: bool,
    ) -> BackendResult<Self> {
        let handle = ctx.create_texture(
            &TextureDescriptor {
                label: Some(data.name.clone()),
                width: data.width,
                height: data.height,
                format: TextureFormat::Rgba8Unorm,
                generate_mipmaps,
            },
            Some(&data.data),
        )?;

        Ok(Self {
            handle,
            width: data.width,
            height: data.height,
            format: TextureFormat::Rgba8Unorm,
        })
    }

    /// Allocate uninitialized storage, typically for a render target
    pub fn empty<G: GraphicsContext>(
        ctx: &mut G,
        format: TextureFormat,
        size: UVec2,
        label: &str,
    ) -> BackendResult<Self> {
        let handle = ctx.create_texture(
            &TextureDescriptor {
                label: Some(label.to_string()),
                width: size.x,
                height: size.y,
                format,
                generate_mipmaps: false,
            },
            None,
        )?;

        Ok(Self {
            handle,
            width: size.x,
            height: size.y,
            format,
        })
    }

    pub fn bind<G: GraphicsContext>(&self, ctx: &mut G, unit: u32) {
        ctx.bind_texture(unit, self.handle);
    }

    pub fn destroy<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.destroy_texture(self.handle);
    }
}

/// A sampler object describing how textures are filtered and wrapped
#[derive(Debug, Clone, PartialEq)]
pub struct Sampler {
    pub handle: SamplerHandle,
    pub descriptor: SamplerDescriptor,
}

impl Sampler {
    pub fn create<G: GraphicsContext>(
        ctx: &mut G,
        descriptor: SamplerDescriptor,
    ) -> BackendResult<Self> {
        let handle = ctx.create_sampler(&descriptor)?;
        Ok(Self { handle, descriptor })
    }

    pub fn bind<G: GraphicsContext>(&self, ctx: &mut G, unit: u32) {
        ctx.bind_sampler(unit, self.handle);
    }

    pub fn destroy<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.destroy_sampler(self.handle);
    }
}
