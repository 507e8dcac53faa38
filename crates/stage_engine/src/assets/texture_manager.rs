//! Key-addressed texture store
//!
//! Textures are either loaded (decoded image or atlas) or procedural
//! (solid color, two-color grid). A lookup miss is normal while loads are in
//! flight and is reported as `None`, not as an error.

use std::collections::HashMap;

use super::AssetError;

/// Pixel region within a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FrameRect {
    /// Create a frame rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.saturating_add(self.width) <= width && self.y.saturating_add(self.height) <= height
    }
}

/// How a texture came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Solid color fill
    Color,
    /// Two-color grid
    Grid,
    /// Decoded image
    Image,
    /// Image with named frames
    Atlas,
}

/// RGBA8 texture record
#[derive(Debug, Clone)]
pub struct Texture {
    key: String,
    kind: TextureKind,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    frames: HashMap<String, FrameRect>,
}

impl Texture {
    /// Texture key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Origin of the texture
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 pixel data, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whole-texture region
    pub fn full_rect(&self) -> FrameRect {
        FrameRect::new(0, 0, self.width, self.height)
    }

    /// Named frame region
    pub fn frame(&self, name: &str) -> Option<FrameRect> {
        self.frames.get(name).copied()
    }

    /// Number of named frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Texture store shared by all scenes of a game
#[derive(Debug, Default)]
pub struct TextureManager {
    textures: HashMap<String, Texture>,
}

impl TextureManager {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a solid-color texture; `color` is packed 0xRRGGBB
    pub fn add_color(
        &mut self,
        key: impl Into<String>,
        color: u32,
        width: u32,
        height: u32,
    ) -> Result<&Texture, AssetError> {
        let rgba = unpack_rgba(color);
        let pixels = rgba.repeat(pixel_count(width, height));
        self.register(key.into(), TextureKind::Color, width, height, pixels, HashMap::new())
    }

    /// Register a `cols` x `rows` grid alternating between two colors.
    ///
    /// Each cell is also registered as a frame named by its row-major index
    /// (`"0"`, `"1"`, ...).
    pub fn add_grid(
        &mut self,
        key: impl Into<String>,
        color_a: u32,
        color_b: u32,
        width: u32,
        height: u32,
        cols: u32,
        rows: u32,
    ) -> Result<&Texture, AssetError> {
        let key = key.into();
        if cols == 0 || rows == 0 || cols > width || rows > height {
            return Err(AssetError::InvalidDimensions(format!(
                "grid '{}' of {}x{} cells does not fit {}x{} pixels",
                key, cols, rows, width, height
            )));
        }

        let cell_w = width / cols;
        let cell_h = height / rows;
        let (a, b) = (unpack_rgba(color_a), unpack_rgba(color_b));

        let mut pixels = Vec::with_capacity(pixel_count(width, height) * 4);
        for y in 0..height {
            let row = (y / cell_h).min(rows - 1);
            for x in 0..width {
                let col = (x / cell_w).min(cols - 1);
                pixels.extend_from_slice(if (row + col) % 2 == 0 { &a } else { &b });
            }
        }

        let mut frames = HashMap::new();
        for row in 0..rows {
            for col in 0..cols {
                let index = row * cols + col;
                frames.insert(
                    index.to_string(),
                    FrameRect::new(col * cell_w, row * cell_h, cell_w, cell_h),
                );
            }
        }

        self.register(key, TextureKind::Grid, width, height, pixels, frames)
    }

    /// Register decoded RGBA8 image data
    pub fn add_image(
        &mut self,
        key: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<&Texture, AssetError> {
        self.register(key.into(), TextureKind::Image, width, height, pixels, HashMap::new())
    }

    /// Register decoded RGBA8 image data with named frames
    pub fn add_atlas(
        &mut self,
        key: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        frames: HashMap<String, FrameRect>,
    ) -> Result<&Texture, AssetError> {
        let key = key.into();
        if let Some((name, _)) = frames.iter().find(|(_, rect)| !rect.fits_within(width, height)) {
            return Err(AssetError::Atlas(format!(
                "frame '{}' of '{}' lies outside the {}x{} image",
                name, key, width, height
            )));
        }
        self.register(key, TextureKind::Atlas, width, height, pixels, frames)
    }

    /// Look up a texture
    pub fn get(&self, key: &str) -> Option<&Texture> {
        self.textures.get(key)
    }

    /// Whether a texture is registered under `key`
    pub fn exists(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    /// Remove a texture
    pub fn remove(&mut self, key: &str) -> Option<Texture> {
        self.textures.remove(key)
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no textures are registered
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Region to sample for `key`, optionally narrowed to a named frame.
    ///
    /// `None` if the texture or frame is not available (yet).
    pub fn source_rect(&self, key: &str, frame: Option<&str>) -> Option<FrameRect> {
        let texture = self.get(key)?;
        match frame {
            Some(name) => texture.frame(name),
            None => Some(texture.full_rect()),
        }
    }

    fn register(
        &mut self,
        key: String,
        kind: TextureKind,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        frames: HashMap<String, FrameRect>,
    ) -> Result<&Texture, AssetError> {
        if self.textures.contains_key(&key) {
            return Err(AssetError::DuplicateKey(key));
        }
        if width == 0 || height == 0 || pixels.len() != pixel_count(width, height) * 4 {
            return Err(AssetError::InvalidDimensions(format!(
                "texture '{}' has {} bytes for {}x{} pixels",
                key,
                pixels.len(),
                width,
                height
            )));
        }

        log::debug!("Registered {:?} texture '{}' ({}x{})", kind, key, width, height);
        let texture = Texture {
            key: key.clone(),
            kind,
            width,
            height,
            pixels,
            frames,
        };
        Ok(self.textures.entry(key).or_insert(texture))
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn unpack_rgba(color: u32) -> [u8; 4] {
    let [_, r, g, b] = color.to_be_bytes();
    [r, g, b, 0xff]
}
