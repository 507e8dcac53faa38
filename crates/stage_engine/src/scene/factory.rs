//! Create-and-attach constructors for display objects

use crate::display::{
    layers, AlphaSprite, Compose, Container, DisplayList, DisplayObject, Group, Parent, Sprite,
    TextureRef,
};
use crate::foundation::collections::Handle;

/// Builds display objects straight into a scene's display list.
///
/// Every constructor inserts the object and appends it at the top level of
/// the list before returning, so callers never hold an object that is not
/// yet part of the scene. Obtained from
/// [`SceneContext::add`](super::SceneContext::add).
#[derive(Debug)]
pub struct GameObjectFactory<'a> {
    list: &'a mut DisplayList,
}

impl<'a> GameObjectFactory<'a> {
    /// Create a factory over `list`
    pub fn new(list: &'a mut DisplayList) -> Self {
        Self { list }
    }

    /// Sprite bound to texture `key`, optionally to one of its named frames.
    ///
    /// The texture does not need to exist yet; the sprite is skipped at
    /// render time until it does. The sprite starts fully opaque and carries
    /// an alpha layer, so `set_alpha` and `inner_mut().set_tint` both work on
    /// the returned handle.
    pub fn sprite(
        &mut self,
        x: f32,
        y: f32,
        key: &str,
        frame: Option<&str>,
    ) -> Handle<AlphaSprite> {
        let texture = match frame {
            Some(frame) => TextureRef::with_frame(key, frame),
            None => TextureRef::new(key),
        };
        let sprite = Compose::new(Sprite::with_texture(x, y, texture))
            .with(layers::alpha(1.0))
            .build();
        self.list.spawn(sprite)
    }

    /// Empty container at `(x, y)`
    pub fn container(&mut self, x: f32, y: f32) -> Handle<Container> {
        self.list.spawn(Parent::new(Group::new(x, y)))
    }

    /// Attach an already-composed object
    pub fn existing<T: DisplayObject>(&mut self, object: T) -> Handle<T> {
        self.list.spawn(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureManager;
    use crate::display::{CapabilitySet, GameObject, HasAlpha, RecordingSink};

    #[test]
    fn test_sprite_is_attached_on_return() {
        let mut list = DisplayList::new();
        let sprite = GameObjectFactory::new(&mut list).sprite(1.0, 2.0, "ship", None);

        assert!(list.contains(sprite));
        assert_eq!(list.graph().get(sprite).unwrap().texture().unwrap().key, "ship");
    }

    #[test]
    fn test_sprite_frame_binding() {
        let mut list = DisplayList::new();
        let sprite = GameObjectFactory::new(&mut list).sprite(0.0, 0.0, "sheet", Some("rock"));

        let texture = list.graph().get(sprite).unwrap().texture().unwrap();
        assert_eq!(texture.frame.as_deref(), Some("rock"));
    }

    #[test]
    fn test_sprite_alpha_and_tint_reach_draw_command() {
        let mut list = DisplayList::new();
        let mut textures = TextureManager::new();
        textures.add_color("ship", 0xffffff, 4, 4).unwrap();
        let sprite = GameObjectFactory::new(&mut list).sprite(0.0, 0.0, "ship", None);

        let object = list.graph_mut().get_mut(sprite).unwrap();
        assert!(object.capabilities().contains(CapabilitySet::ALPHA));
        object.set_alpha(0.25);
        object.inner_mut().set_tint(0x00ff00);

        let mut sink = RecordingSink::new();
        list.render(&textures, &mut sink);

        assert_eq!(sink.commands().len(), 1);
        assert_eq!(sink.commands()[0].alpha, 0.25);
        assert_eq!(sink.commands()[0].tint, 0x00ff00);
    }

    #[test]
    fn test_existing_keeps_concrete_type() {
        let mut list = DisplayList::new();
        let faded = Compose::new(Sprite::new(0.0, 0.0, "a"))
            .with(layers::alpha(0.5))
            .build();

        let handle = GameObjectFactory::new(&mut list).existing(faded);

        assert!(list.contains(handle));
        assert_eq!(list.graph().get(handle).unwrap().alpha(), 0.5);
    }

    #[test]
    fn test_factory_preserves_order() {
        let mut list = DisplayList::new();
        let mut add = GameObjectFactory::new(&mut list);
        let a = add.sprite(0.0, 0.0, "a", None);
        let group = add.container(0.0, 0.0);
        let b = add.sprite(0.0, 0.0, "b", None);

        assert_eq!(list.members(), &[a.id(), group.id(), b.id()]);
    }
}
