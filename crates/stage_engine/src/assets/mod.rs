//! Asset loading and texture storage
//!
//! The [`Loader`] queues image and atlas requests and resolves them on a
//! tick into the [`TextureManager`]. Scenes reference textures by key only,
//! so a sprite may exist before its texture does.

pub mod atlas;
pub mod loader;
pub mod source;
pub mod texture_manager;

pub use loader::{LoadHandle, LoadedFile, Loader};
pub use source::{AssetSource, FileSource, MemorySource};
pub use texture_manager::{FrameRect, Texture, TextureKind, TextureManager};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// No data exists at the requested path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// IO error while reading asset bytes
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// Path being read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be decoded into pixel data
    #[error("Decode error: {0}")]
    Decode(String),

    /// Texture size, grid layout or pixel buffer length is inconsistent
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Atlas description is malformed or inconsistent with its image
    #[error("Atlas error: {0}")]
    Atlas(String),

    /// Request was cancelled before it resolved
    #[error("Load of '{0}' was cancelled")]
    Cancelled(String),

    /// A texture with this key already exists
    #[error("Texture key already in use: {0}")]
    DuplicateKey(String),
}
