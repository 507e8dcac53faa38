//! Parent capability

use crate::display::capability::{
    forward_display_object, forward_has_alpha, forward_transformable, impl_as_any,
    CapabilitySet, DisplayObject, GameObject, HasChildren, Layer, ObjectKind, Transformable,
};
use crate::display::Group;
use crate::foundation::time::FrameTime;

/// Lets a transform-bearing object own children.
///
/// The children themselves live in the [`SceneGraph`](crate::display::SceneGraph);
/// this layer only grants the [`HasChildren`] capability that parenting
/// operations require.
#[derive(Debug, Clone)]
pub struct Parent<B> {
    inner: B,
}

/// A plain container: a [`Group`] that may own children
pub type Container = Parent<Group>;

impl<B: Transformable> Parent<B> {
    /// Wrap `inner`
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// The wrapped value
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// The wrapped value, mutably
    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }
}

/// Layer config produced by [`layers::parent`](super::parent)
#[derive(Debug, Clone, Copy)]
pub struct ParentLayer;

impl<B: Transformable> Layer<B> for ParentLayer {
    type Output = Parent<B>;

    fn apply(self, base: B) -> Parent<B> {
        Parent::new(base)
    }
}

impl<B: Transformable> GameObject for Parent<B> {
    fn kind(&self) -> ObjectKind {
        match self.inner.kind() {
            ObjectKind::Group => ObjectKind::Container,
            other => other,
        }
    }

    fn capabilities(&self) -> CapabilitySet {
        self.inner.capabilities() | CapabilitySet::PARENT
    }

    fn update(&mut self, time: &FrameTime) {
        self.inner.update(time);
    }

    impl_as_any!();
}

forward_transformable!(Parent, Transformable);
forward_display_object!(Parent);
forward_has_alpha!(Parent);

impl<B: DisplayObject> HasChildren for Parent<B> {}
