//! Scene-scoped top-level registry of display objects

use super::capability::DisplayObject;
use super::graph::SceneGraph;
use super::layers::{Container, Parent};
use super::object::Group;
use super::render::{DrawCommand, RenderSink};
use crate::assets::TextureManager;
use crate::foundation::collections::{Handle, ObjectId};
use crate::foundation::time::{Frame, FrameTime};

/// The top of one scene's display tree.
///
/// Structurally a container with an identity transform at the scene origin:
/// [`add`](Self::add) and [`remove`](Self::remove) follow the same
/// identity-based, idempotent, reparenting contract as
/// [`SceneGraph::add_child`]. The list owns the [`SceneGraph`] arena that
/// every object of the scene lives in.
#[derive(Debug)]
pub struct DisplayList {
    graph: SceneGraph,
    root: Handle<Container>,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    /// Create an empty display list
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Parent::new(Group::root()));
        Self { graph, root }
    }

    /// Handle of the root node, usable wherever a container is expected.
    ///
    /// The root's transform is fixed at the identity:
    /// [`SceneGraph::with_transform`] and [`SceneGraph::set_position`] leave
    /// it alone.
    pub fn root(&self) -> Handle<Container> {
        self.root
    }

    /// The arena holding this scene's objects
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The arena holding this scene's objects, mutably
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Set the current frame for mutation stamps and cache entries
    pub fn begin_frame(&mut self, frame: Frame) {
        self.graph.begin_frame(frame);
    }

    /// Create an object without attaching it anywhere
    pub fn insert<T: DisplayObject>(&mut self, object: T) -> Handle<T> {
        self.graph.insert(object)
    }

    /// Create an object and append it to the list in one step
    pub fn spawn<T: DisplayObject>(&mut self, object: T) -> Handle<T> {
        let handle = self.graph.insert(object);
        self.graph.add_child(self.root, handle);
        handle
    }

    /// Append `id` at the top level. No-op if already there; an object owned
    /// by a container is moved out of it.
    pub fn add(&mut self, id: impl Into<ObjectId>) {
        self.graph.add_child(self.root, id);
    }

    /// Remove `id` from the top level. No-op if it is not a top-level member.
    pub fn remove(&mut self, id: impl Into<ObjectId>) {
        self.graph.remove_child(self.root, id);
    }

    /// Whether `id` is a top-level member
    pub fn contains(&self, id: impl Into<ObjectId>) -> bool {
        self.graph.has_child(self.root, id)
    }

    /// Top-level members in render order
    pub fn members(&self) -> &[ObjectId] {
        self.graph.children(self.root)
    }

    /// Number of top-level members
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// Whether there are no top-level members
    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }

    /// Destroy `id` and everything it owns
    pub fn destroy(&mut self, id: impl Into<ObjectId>) -> usize {
        let id = id.into();
        if id == self.root.id() {
            log::warn!("Refusing to destroy the display list root");
            return 0;
        }
        self.graph.destroy(id)
    }

    /// Destroy every object, attached or not. The root is kept.
    pub fn clear(&mut self) {
        let root = self.root.id();
        let ids: Vec<ObjectId> = self.graph.ids().filter(|&id| id != root).collect();
        let released: usize = ids.into_iter().map(|id| self.graph.destroy(id)).sum();
        log::debug!("Display list cleared ({} object(s) released)", released);
    }

    /// Run per-frame behavior of every attached object in traversal order
    pub fn update(&mut self, time: &FrameTime) {
        self.graph.update_subtree(self.root, time);
    }

    /// Resolve transforms and emit draw commands for every visible textured
    /// object. Objects whose texture is not available yet are skipped.
    ///
    /// Returns the number of commands emitted.
    pub fn render(&mut self, textures: &TextureManager, sink: &mut dyn RenderSink) -> usize {
        let mut drawn = 0;
        self.graph.walk_visible(self.root, |id, object, state| {
            let Some(texture) = object.texture() else {
                return;
            };

            match textures.source_rect(&texture.key, texture.frame.as_deref()) {
                Some(source) => {
                    sink.draw(&DrawCommand {
                        object: id,
                        texture: texture.key.clone(),
                        source,
                        world: state.world,
                        alpha: state.alpha,
                        tint: object.tint(),
                    });
                    drawn += 1;
                }
                None => log::trace!("Texture '{}' not ready, skipping {:?}", texture.key, id),
            }
        });
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{layers, Compose, RecordingSink, Sprite};
    use crate::foundation::math::{affine, Vec2};
    use approx::assert_relative_eq;

    #[test]
    fn test_add_is_idempotent() {
        let mut list = DisplayList::new();
        let sprite = list.insert(Sprite::new(0.0, 0.0, "a"));

        list.add(sprite);
        list.add(sprite);

        assert_eq!(list.members(), &[sprite.id()]);
    }

    #[test]
    fn test_remove_non_member_is_noop() {
        let mut list = DisplayList::new();
        let member = list.spawn(Sprite::new(0.0, 0.0, "a"));
        let container = list.spawn(Container::new(Group::new(0.0, 0.0)));
        let nested = list.insert(Sprite::new(0.0, 0.0, "b"));
        list.graph_mut().add_child(container, nested);

        list.remove(nested);

        assert_eq!(list.members(), &[member.id(), container.id()]);
        assert!(list.graph().has_child(container, nested));
    }

    #[test]
    fn test_adding_nested_object_moves_it_to_top_level() {
        let mut list = DisplayList::new();
        let container = list.spawn(Container::new(Group::new(0.0, 0.0)));
        let sprite = list.insert(Sprite::new(0.0, 0.0, "a"));
        list.graph_mut().add_child(container, sprite);

        list.add(sprite);

        assert!(list.contains(sprite));
        assert!(list.graph().children(container).is_empty());
        assert_eq!(list.graph().parent_of(sprite), Some(list.root().id()));
    }

    #[test]
    fn test_root_transform_cannot_be_moved() {
        let mut list = DisplayList::new();
        list.begin_frame(1);
        let sprite = list.spawn(Sprite::new(3.0, 4.0, "a"));
        let root = list.root();

        list.graph_mut().set_position(root, 50.0, 50.0);
        let moved = list.graph_mut().with_transform(root, |t, frame| t.set_rotation(1.0, frame));

        assert!(moved.is_none());
        assert_relative_eq!(list.graph_mut().world_position(sprite).unwrap(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_render_skips_missing_textures() {
        let mut list = DisplayList::new();
        let mut textures = TextureManager::new();
        textures.add_color("red", 0xff_00_00, 4, 4).unwrap();

        let ready = list.spawn(Sprite::new(10.0, 20.0, "red"));
        list.spawn(Sprite::new(0.0, 0.0, "not-loaded"));

        let mut sink = RecordingSink::new();
        let drawn = list.render(&textures, &mut sink);

        assert_eq!(drawn, 1);
        let command = &sink.commands()[0];
        assert_eq!(command.object, ready.id());
        assert_eq!((command.source.width, command.source.height), (4, 4));
        assert_relative_eq!(affine::translation(&command.world), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_update_runs_behaviors_of_nested_objects() {
        let mut list = DisplayList::new();
        let container = list.spawn(Container::new(Group::new(0.0, 0.0)));
        let wibbler = list.insert(
            Compose::new(Sprite::new(0.0, 0.0, "a"))
                .with(layers::wibble(10.0, 1.0))
                .build(),
        );
        list.graph_mut().add_child(container, wibbler);

        list.begin_frame(1);
        list.update(&FrameTime::new(1, 0.25, 0.25));

        assert_relative_eq!(list.graph_mut().world_position(wibbler).unwrap().x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clear_releases_everything_but_root() {
        let mut list = DisplayList::new();
        let container = list.spawn(Container::new(Group::new(0.0, 0.0)));
        let nested = list.insert(Sprite::new(0.0, 0.0, "a"));
        list.graph_mut().add_child(container, nested);
        list.insert(Sprite::new(0.0, 0.0, "loose"));

        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.graph().len(), 1);
        assert!(list.graph().contains(list.root()));
    }

    #[test]
    fn test_root_cannot_be_destroyed() {
        let mut list = DisplayList::new();
        let root = list.root();
        assert_eq!(list.destroy(root), 0);
        assert!(list.graph().contains(root));
    }
}
