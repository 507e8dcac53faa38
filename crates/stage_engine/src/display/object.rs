//! Base display-object types
//!
//! These are the bottom of every capability stack. [`Sprite`] draws a
//! texture; [`Group`] is a bare transform-bearing node, usually wrapped in
//! [`Parent`](super::Parent) to form a [`Container`](super::Container).

use super::capability::{impl_as_any, CapabilitySet, DisplayObject, GameObject, ObjectKind, Transformable};
use super::transform::Transform;

/// Texture binding of a drawable object
///
/// Only the key is stored; the texture itself is looked up in the
/// [`TextureManager`](crate::assets::TextureManager) at render time and may
/// not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// Texture key
    pub key: String,

    /// Atlas frame name, if the texture is an atlas
    pub frame: Option<String>,
}

impl TextureRef {
    /// Reference a whole texture
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            frame: None,
        }
    }

    /// Reference one frame of an atlas texture
    pub fn with_frame(key: impl Into<String>, frame: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            frame: Some(frame.into()),
        }
    }
}

/// Textured display object
#[derive(Debug, Clone)]
pub struct Sprite {
    transform: Transform,
    texture: TextureRef,
    visible: bool,
    tint: u32,
}

impl Sprite {
    /// Create a sprite at `(x, y)` bound to `texture_key`
    pub fn new(x: f32, y: f32, texture_key: impl Into<String>) -> Self {
        Self::with_texture(x, y, TextureRef::new(texture_key))
    }

    /// Create a sprite bound to an explicit texture reference
    pub fn with_texture(x: f32, y: f32, texture: TextureRef) -> Self {
        Self {
            transform: Transform::at(x, y),
            texture,
            visible: true,
            tint: 0xff_ff_ff,
        }
    }

    /// Set the packed 0xRRGGBB tint
    pub fn set_tint(&mut self, tint: u32) {
        self.tint = tint & 0xff_ff_ff;
    }

    /// Rebind to another texture
    pub fn set_texture(&mut self, texture: TextureRef) {
        self.texture = texture;
    }
}

impl GameObject for Sprite {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Sprite
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::TRANSFORM | CapabilitySet::TEXTURE
    }

    impl_as_any!();
}

impl Transformable for Sprite {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl DisplayObject for Sprite {
    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn texture(&self) -> Option<&TextureRef> {
        Some(&self.texture)
    }

    fn tint(&self) -> u32 {
        self.tint
    }
}

/// Transform-bearing node that draws nothing itself
#[derive(Debug, Clone)]
pub struct Group {
    transform: Transform,
    visible: bool,
    root: bool,
}

impl Group {
    /// Create a group at `(x, y)`
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            transform: Transform::at(x, y),
            visible: true,
            root: false,
        }
    }

    /// Identity group at the scene origin, used as a display list root
    pub(crate) fn root() -> Self {
        Self {
            root: true,
            ..Self::new(0.0, 0.0)
        }
    }
}

impl GameObject for Group {
    fn kind(&self) -> ObjectKind {
        if self.root { ObjectKind::Root } else { ObjectKind::Group }
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::TRANSFORM
    }

    impl_as_any!();
}

impl Transformable for Group {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl DisplayObject for Group {
    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_defaults() {
        let sprite = Sprite::new(3.0, 4.0, "logo");
        assert_eq!(sprite.transform().x(), 3.0);
        assert_eq!(sprite.transform().y(), 4.0);
        assert!(sprite.visible());
        assert_eq!(sprite.alpha(), 1.0);
        assert_eq!(sprite.tint(), 0xff_ff_ff);
        assert_eq!(sprite.texture(), Some(&TextureRef::new("logo")));
    }

    #[test]
    fn test_tint_is_masked() {
        let mut sprite = Sprite::new(0.0, 0.0, "logo");
        sprite.set_tint(0xaa_12_34_56);
        assert_eq!(sprite.tint(), 0x12_34_56);
    }

    #[test]
    fn test_atlas_frame_reference() {
        let texture = TextureRef::with_frame("atlas", "coin-01");
        let sprite = Sprite::with_texture(0.0, 0.0, texture);
        assert_eq!(sprite.texture().and_then(|t| t.frame.as_deref()), Some("coin-01"));
    }
}
