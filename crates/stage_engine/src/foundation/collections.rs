//! Specialized collection types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable, generational identity of a display object.
    ///
    /// A removed object's id never aliases a newer object; lookups with a
    /// stale id simply miss. Ids are only meaningful in the arena that issued
    /// them: two fresh arenas hand out the same ids, so a bare `ObjectId`
    /// from one scene resolves to an unrelated object in another. Prefer
    /// [`Handle`], which remembers its arena.
    pub struct ObjectId;
}

/// Identity of one object arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u32);

impl GraphId {
    /// Allocate an id no other arena in this process has
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<ObjectId, T>;

/// Typed handle for type-safe object references
///
/// Carries the concrete type of the object it was created for, so typed
/// access needs no runtime capability query and operations that need a
/// particular capability can bound `T` instead.
///
/// A handle also records the arena that issued it. Typed lookups and
/// parenting calls on any other arena miss instead of resolving to
/// whatever object happens to share the id there. Converting to an
/// [`ObjectId`] drops that tag.
pub struct Handle<T> {
    id: ObjectId,
    graph: GraphId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(id: ObjectId, graph: GraphId) -> Self {
        Self {
            id,
            graph,
            _phantom: PhantomData,
        }
    }

    /// Get the untyped object id
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Arena this handle belongs to
    pub fn graph(&self) -> GraphId {
        self.graph
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.graph == other.graph
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.graph.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({:?} in {:?})", std::any::type_name::<T>(), self.id, self.graph)
    }
}

impl<T> From<Handle<T>> for ObjectId {
    fn from(handle: Handle<T>) -> Self {
        handle.id
    }
}
