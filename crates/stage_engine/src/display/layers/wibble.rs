//! Wibble capability: horizontal sine oscillation

use crate::display::capability::{
    forward_display_object, forward_has_alpha, forward_has_children, forward_transformable,
    impl_as_any, CapabilitySet, GameObject, Layer, ObjectKind, Transformable,
};
use crate::foundation::math::constants::TAU;
use crate::foundation::time::FrameTime;

/// Oscillates the object's x position around wherever it is placed.
///
/// Only the offset applied on the previous frame is taken back before the
/// new one is added, so moving the object while it wibbles is preserved.
#[derive(Debug, Clone)]
pub struct Wibble<B> {
    inner: B,
    amplitude: f32,
    frequency: f32,
    phase: f32,
    applied: f32,
}

impl<B: Transformable> Wibble<B> {
    /// Wrap `inner`; `amplitude` in pixels, `frequency` in Hz
    pub fn new(inner: B, amplitude: f32, frequency: f32) -> Self {
        Self {
            inner,
            amplitude,
            frequency,
            phase: 0.0,
            applied: 0.0,
        }
    }

    /// Start the oscillation at a phase offset (radians)
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Current offset from the resting x position
    pub fn offset(&self) -> f32 {
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

/// Layer config produced by [`layers::wibble`](super::wibble)
#[derive(Debug, Clone, Copy)]
pub struct WibbleLayer {
    pub(super) amplitude: f32,
    pub(super) frequency: f32,
}

impl<B: Transformable> Layer<B> for WibbleLayer {
    type Output = Wibble<B>;

    fn apply(self, base: B) -> Wibble<B> {
        Wibble::new(base, self.amplitude, self.frequency)
    }
}

impl<B: Transformable> GameObject for Wibble<B> {
    fn kind(&self) -> ObjectKind {
        self.inner.kind()
    }

    fn capabilities(&self) -> CapabilitySet {
        self.inner.capabilities() | CapabilitySet::WIBBLE
    }

    fn update(&mut self, time: &FrameTime) {
        self.inner.update(time);

        let offset = self.amplitude * (TAU * self.frequency * time.now + self.phase).sin();
        let transform = self.inner.transform_mut();
        let x = transform.x() - self.applied + offset;
        transform.set_x(x, time.frame);
        self.applied = offset;
    }

    impl_as_any!();
}

forward_transformable!(Wibble, Transformable);
forward_display_object!(Wibble);
forward_has_alpha!(Wibble);
forward_has_children!(Wibble);
