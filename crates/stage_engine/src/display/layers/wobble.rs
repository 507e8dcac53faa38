//! Wobble capability: rotational sine oscillation

use crate::display::capability::{
    forward_display_object, forward_has_alpha, forward_has_children, forward_transformable,
    impl_as_any, CapabilitySet, GameObject, Layer, ObjectKind, Transformable,
};
use crate::foundation::math::constants::TAU;
use crate::foundation::time::FrameTime;

/// Rocks the object's rotation back and forth around its resting angle.
#[derive(Debug, Clone)]
pub struct Wobble<B> {
    inner: B,
    angle: f32,
    frequency: f32,
    applied: f32,
}

impl<B: Transformable> Wobble<B> {
    /// Wrap `inner`; `angle` is the peak deflection in radians, `frequency` in Hz
    pub fn new(inner: B, angle: f32, frequency: f32) -> Self {
        Self {
            inner,
            angle,
            frequency,
            applied: 0.0,
        }
    }

    /// Current deflection from the resting rotation
    pub fn deflection(&self) -> f32 {
        self.applied
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

/// Layer config produced by [`layers::wobble`](super::wobble)
#[derive(Debug, Clone, Copy)]
pub struct WobbleLayer {
    pub(super) angle: f32,
    pub(super) frequency: f32,
}

impl<B: Transformable> Layer<B> for WobbleLayer {
    type Output = Wobble<B>;

    fn apply(self, base: B) -> Wobble<B> {
        Wobble::new(base, self.angle, self.frequency)
    }
}

impl<B: Transformable> GameObject for Wobble<B> {
    fn kind(&self) -> ObjectKind {
        self.inner.kind()
    }

    fn capabilities(&self) -> CapabilitySet {
        self.inner.capabilities() | CapabilitySet::WOBBLE
    }

    fn update(&mut self, time: &FrameTime) {
        self.inner.update(time);

        let deflection = self.angle * (TAU * self.frequency * time.now).sin();
        let transform = self.inner.transform_mut();
        let rotation = transform.rotation() - self.applied + deflection;
        transform.set_rotation(rotation, time.frame);
        self.applied = deflection;
    }

    impl_as_any!();
}

forward_transformable!(Wobble, Transformable);
forward_display_object!(Wobble);
forward_has_alpha!(Wobble);
forward_has_children!(Wobble);
