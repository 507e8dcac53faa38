//! Arena-backed display-object tree
//!
//! Every display object lives in one [`SceneGraph`] node addressed by an
//! [`ObjectId`]. A node owns its children (an ordered, duplicate-free list of
//! ids) and keeps a weak back-reference to its parent. The back-reference is
//! lookup-only: a parent id that no longer resolves is treated as
//! "unparented".
//!
//! Ids are per graph. Typed [`Handle`]s carry the id of the graph that
//! issued them and are refused by any other graph; bare [`ObjectId`]s are
//! not checked.
//!
//! Tree operations are no-ops rather than errors when their membership
//! expectations are not met. Adding an object beneath itself is a
//! programming error: it trips a debug assertion, and in release builds the
//! call is rejected and logged so the tree stays acyclic.

use std::fmt;

use super::capability::{DisplayObject, HasChildren, ObjectKind};
use super::transform::Transform;
use crate::foundation::collections::{GraphId, Handle, HandleMap, ObjectId};
use crate::foundation::math::{affine, Affine2, Vec2};
use crate::foundation::time::{Frame, FrameTime};

struct Node {
    object: Box<dyn DisplayObject>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

/// Resolved state of a node handed to [`SceneGraph::walk_visible`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldState {
    /// World matrix
    pub world: Affine2,

    /// Alpha multiplied down from the walk root
    pub alpha: f32,
}

/// Arena of display objects with parent/child links
pub struct SceneGraph {
    id: GraphId,
    nodes: HandleMap<Node>,
    frame: Frame,
    recomputes: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("id", &self.id)
            .field("objects", &self.nodes.len())
            .field("frame", &self.frame)
            .field("recomputes", &self.recomputes)
            .finish()
    }
}

impl SceneGraph {
    /// Create an empty graph at frame 0
    pub fn new() -> Self {
        Self {
            id: GraphId::next(),
            nodes: HandleMap::with_key(),
            frame: 0,
            recomputes: 0,
        }
    }

    /// Identity stamped on every handle this graph issues
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Whether `handle` was issued by this graph
    pub fn owns<T>(&self, handle: Handle<T>) -> bool {
        let owned = handle.graph() == self.id;
        if !owned {
            log::warn!("{:?} belongs to another graph than {:?}", handle, self.id);
        }
        owned
    }

    /// Set the current frame used to stamp mutations and cache entries
    pub fn begin_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Current frame
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Number of world-matrix recomputations performed so far
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no objects
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert an unattached object
    pub fn insert<T: DisplayObject>(&mut self, object: T) -> Handle<T> {
        let id = self.nodes.insert(Node {
            object: Box::new(object),
            parent: None,
            children: Vec::new(),
        });
        log::trace!("Inserted {:?}", id);
        Handle::new(id, self.id)
    }

    /// Ids of all live objects, attached or not, in arena order
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.nodes.keys()
    }

    /// Whether `id` refers to a live object
    pub fn contains(&self, id: impl Into<ObjectId>) -> bool {
        self.nodes.contains_key(id.into())
    }

    /// Borrow an object through the base interface
    pub fn object(&self, id: impl Into<ObjectId>) -> Option<&dyn DisplayObject> {
        self.nodes.get(id.into()).map(|node| node.object.as_ref())
    }

    /// Mutably borrow an object through the base interface
    pub fn object_mut(&mut self, id: impl Into<ObjectId>) -> Option<&mut dyn DisplayObject> {
        self.nodes.get_mut(id.into()).map(|node| node.object.as_mut())
    }

    /// Borrow an object as its concrete type
    pub fn get<T: DisplayObject>(&self, handle: Handle<T>) -> Option<&T> {
        if !self.owns(handle) {
            return None;
        }
        self.object(handle)?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow an object as its concrete type
    pub fn get_mut<T: DisplayObject>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if !self.owns(handle) {
            return None;
        }
        self.object_mut(handle)?.as_any_mut().downcast_mut::<T>()
    }

    /// Mutate an object's transform with the current frame.
    ///
    /// Returns `None` for a missing object and for a display list root,
    /// whose transform stays the identity.
    pub fn with_transform<R>(
        &mut self,
        id: impl Into<ObjectId>,
        f: impl FnOnce(&mut Transform, Frame) -> R,
    ) -> Option<R> {
        let frame = self.frame;
        let id = id.into();
        let node = self.nodes.get_mut(id)?;
        if node.object.kind() == ObjectKind::Root {
            log::warn!("Refusing to move display list root {:?}", id);
            return None;
        }
        Some(f(node.object.transform_mut(), frame))
    }

    /// Set an object's local position, stamped with the current frame
    pub fn set_position(&mut self, id: impl Into<ObjectId>, x: f32, y: f32) {
        self.with_transform(id, |transform, frame| transform.set_position(x, y, frame));
    }

    // -- Topology --

    /// Owning container of `id`, if it has one and it is still alive
    pub fn parent_of(&self, id: impl Into<ObjectId>) -> Option<ObjectId> {
        let parent = self.nodes.get(id.into())?.parent?;
        self.nodes.contains_key(parent).then_some(parent)
    }

    /// Children of `id` in traversal order (empty if `id` is not live)
    pub fn children(&self, id: impl Into<ObjectId>) -> &[ObjectId] {
        self.nodes
            .get(id.into())
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `child` is a direct child of `parent`
    pub fn has_child(&self, parent: impl Into<ObjectId>, child: impl Into<ObjectId>) -> bool {
        self.children(parent).contains(&child.into())
    }

    /// Whether `ancestor` appears on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: impl Into<ObjectId>, id: impl Into<ObjectId>) -> bool {
        let ancestor = ancestor.into();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// Append `child` to `parent`.
    ///
    /// No-op if `child` is already a child of `parent`. A child owned by
    /// another container is detached from it first.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `child` is `parent` or one of its
    /// ancestors. Release builds reject the call instead.
    pub fn add_child<P: HasChildren>(&mut self, parent: Handle<P>, child: impl Into<ObjectId>) {
        if self.owns(parent) {
            self.attach(parent.id(), child.into());
        }
    }

    /// Remove `child` from `parent`. No-op if it is not a child of `parent`.
    ///
    /// The child stays alive, unparented.
    pub fn remove_child<P: HasChildren>(&mut self, parent: Handle<P>, child: impl Into<ObjectId>) {
        if !self.owns(parent) {
            return;
        }
        let (parent, child) = (parent.id(), child.into());
        if self.has_child(parent, child) {
            self.unlink(parent, child);
        } else {
            log::debug!("remove_child: {:?} is not a child of {:?}", child, parent);
        }
    }

    /// Detach `id` from whichever container owns it
    pub fn detach(&mut self, id: impl Into<ObjectId>) {
        let id = id.into();
        if let Some(parent) = self.parent_of(id) {
            self.unlink(parent, id);
        }
    }

    /// Destroy `id` and every object it owns.
    ///
    /// Returns the number of objects released.
    pub fn destroy(&mut self, id: impl Into<ObjectId>) -> usize {
        let id = id.into();
        if !self.nodes.contains_key(id) {
            return 0;
        }

        self.detach(id);
        let doomed = self.descendants(id);
        for &node in &doomed {
            self.nodes.remove(node);
        }
        log::trace!("Destroyed {} object(s) rooted at {:?}", doomed.len(), id);
        doomed.len()
    }

    /// `root` followed by all of its descendants, depth-first in child order
    pub fn descendants(&self, root: impl Into<ObjectId>) -> Vec<ObjectId> {
        let root = root.into();
        let mut order = Vec::new();
        if !self.nodes.contains_key(root) {
            return order;
        }

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    pub(crate) fn attach(&mut self, parent: ObjectId, child: ObjectId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::debug!("add_child: stale handle ({:?} -> {:?})", child, parent);
            return;
        }

        let cycle = child == parent || self.is_ancestor(child, parent);
        debug_assert!(!cycle, "cycle: {:?} cannot be added beneath itself", child);
        if cycle {
            log::error!("Rejected add_child that would form a cycle: {:?} under {:?}", child, parent);
            return;
        }

        if self.parent_of(child) == Some(parent) && self.has_child(parent, child) {
            return;
        }

        self.detach(child);

        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.object.transform_mut().invalidate();
    }

    fn unlink(&mut self, parent: ObjectId, child: ObjectId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
            node.object.transform_mut().invalidate();
        }
    }

    // -- Transforms --

    /// Resolve the world matrix of `id`, revalidating its ancestors first.
    ///
    /// Only the chain from the root to `id` is visited.
    pub fn world_transform(&mut self, id: impl Into<ObjectId>) -> Option<Affine2> {
        let id = id.into();
        if !self.nodes.contains_key(id) {
            return None;
        }

        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            chain.push(parent);
            current = parent;
        }

        let mut parent = None;
        for &node in chain.iter().rev() {
            parent = Some(self.revalidate(node, parent));
        }
        parent.map(|(world, _)| world)
    }

    /// World position of `id`
    pub fn world_position(&mut self, id: impl Into<ObjectId>) -> Option<Vec2> {
        self.world_transform(id).map(|world| affine::translation(&world))
    }

    /// Bring `id`'s cached world matrix up to date given its parent's
    /// resolved matrix and revision.
    fn revalidate(&mut self, id: ObjectId, parent: Option<(Affine2, u64)>) -> (Affine2, u64) {
        let frame = self.frame;
        let transform = self.nodes[id].object.transform_mut();
        let parent_revision = parent.map_or(0, |(_, revision)| revision);

        if !transform.is_cache_valid(parent_revision) {
            transform.recompute(parent.as_ref().map(|(world, revision)| (world, *revision)), frame);
            self.recomputes += 1;
        }

        (*transform.world(), transform.world_revision())
    }

    /// Walk the visible part of `root`'s subtree top-down, resolving world
    /// matrices on the way. Invisible objects hide their whole subtree.
    pub fn walk_visible(
        &mut self,
        root: impl Into<ObjectId>,
        mut visit: impl FnMut(ObjectId, &dyn DisplayObject, &WorldState),
    ) {
        let root = root.into();
        if !self.nodes.contains_key(root) {
            return;
        }

        let root_parent = match self.parent_of(root) {
            Some(parent) => {
                self.world_transform(parent);
                let transform = self.nodes[parent].object.transform();
                Some((*transform.world(), transform.world_revision()))
            }
            None => None,
        };

        let mut stack = vec![(root, root_parent, 1.0_f32)];
        while let Some((id, parent, parent_alpha)) = stack.pop() {
            let node = &self.nodes[id];
            if !node.object.visible() {
                continue;
            }

            let resolved = self.revalidate(id, parent);
            let node = &self.nodes[id];
            let state = WorldState {
                world: resolved.0,
                alpha: parent_alpha * node.object.alpha(),
            };
            visit(id, node.object.as_ref(), &state);

            for &child in node.children.iter().rev() {
                stack.push((child, Some(resolved), state.alpha));
            }
        }
    }

    /// Run `update` on `root` and its descendants in traversal order
    pub fn update_subtree(&mut self, root: impl Into<ObjectId>, time: &FrameTime) {
        for id in self.descendants(root) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.object.update(time);
            }
        }
    }
}
