//! Alpha capability

use crate::display::capability::{
    forward_has_children, forward_transformable, impl_as_any, CapabilitySet, DisplayObject,
    GameObject, HasAlpha, Layer, ObjectKind,
};
use crate::display::{Sprite, TextureRef};
use crate::foundation::math::utils;
use crate::foundation::time::FrameTime;

/// Adds an own alpha value to a display object.
///
/// The reported alpha is this layer's value multiplied by whatever the
/// layer below reports, so stacking two alpha layers multiplies them.
#[derive(Debug, Clone)]
pub struct Alpha<B> {
    inner: B,
    alpha: f32,
}

/// A sprite with its own alpha, as built by
/// [`GameObjectFactory::sprite`](crate::scene::GameObjectFactory::sprite)
pub type AlphaSprite = Alpha<Sprite>;

impl<B: DisplayObject> Alpha<B> {
    /// Wrap `inner` with the given alpha (clamped to `0.0..=1.0`)
    pub fn new(inner: B, alpha: f32) -> Self {
        Self {
            inner,
            alpha: utils::clamp(alpha, 0.0, 1.0),
        }
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

/// Layer config produced by [`layers::alpha`](super::alpha)
#[derive(Debug, Clone, Copy)]
pub struct AlphaLayer {
    pub(super) alpha: f32,
}

impl<B: DisplayObject> Layer<B> for AlphaLayer {
    type Output = Alpha<B>;

    fn apply(self, base: B) -> Alpha<B> {
        Alpha::new(base, self.alpha)
    }
}

impl<B: DisplayObject> GameObject for Alpha<B> {
    fn kind(&self) -> ObjectKind {
        self.inner.kind()
    }

    fn capabilities(&self) -> CapabilitySet {
        self.inner.capabilities() | CapabilitySet::ALPHA
    }

    fn update(&mut self, time: &FrameTime) {
        self.inner.update(time);
    }

    impl_as_any!();
}

forward_transformable!(Alpha, DisplayObject);
forward_has_children!(Alpha);

impl<B: DisplayObject> DisplayObject for Alpha<B> {
    fn alpha(&self) -> f32 {
        self.alpha * self.inner.alpha()
    }

    fn visible(&self) -> bool {
        self.inner.visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.inner.set_visible(visible);
    }

    fn texture(&self) -> Option<&TextureRef> {
        self.inner.texture()
    }

    fn tint(&self) -> u32 {
        self.inner.tint()
    }
}

impl<B: DisplayObject> HasAlpha for Alpha<B> {
    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = utils::clamp(alpha, 0.0, 1.0);
    }
}
