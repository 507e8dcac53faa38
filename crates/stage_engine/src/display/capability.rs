//! Capability interfaces and the trait composer
//!
//! A display-object type is assembled by wrapping a base type in an ordered
//! stack of capability layers:
//!
//! ```text
//! Compose::new(Sprite::new(..))      Sprite
//!     .with(layers::alpha(0.5))      Alpha<Sprite>
//!     .with(layers::wibble(4.0, 1.0)) Wibble<Alpha<Sprite>>
//!     .build()
//! ```
//!
//! Each layer implements the base interfaces by forwarding to the value it
//! wraps, overriding only what it changes. An overriding layer reaches the
//! layer below it through its `inner` value; it never sees layers applied
//! after it. Which bases a layer accepts is a trait bound on its [`Layer`]
//! impl, so an invalid stack is rejected by the compiler:
//!
//! ```compile_fail
//! use stage_engine::display::{layers, Compose};
//!
//! // `u32` carries no transform, so it cannot wibble.
//! let _ = Compose::new(42_u32).with(layers::wibble(1.0, 1.0)).build();
//! ```

use std::any::Any;

use bitflags::bitflags;

use super::object::TextureRef;
use super::transform::Transform;
use crate::foundation::time::FrameTime;

bitflags! {
    /// The set of capabilities present on a composed object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u32 {
        /// Carries a local/world transform
        const TRANSFORM = 1 << 0;
        /// Bound to a texture key
        const TEXTURE = 1 << 1;
        /// Own alpha value
        const ALPHA = 1 << 2;
        /// May own child objects
        const PARENT = 1 << 3;
        /// Procedural horizontal oscillation
        const WIBBLE = 1 << 4;
        /// Procedural rotational oscillation
        const WOBBLE = 1 << 5;
    }
}

/// Type tag of a display object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Textured quad
    Sprite,
    /// Plain transform-bearing node
    Group,
    /// Node that owns children
    Container,
    /// The root node of a display list
    Root,
    /// User-defined base type
    Custom(&'static str),
}

/// Base capability interface shared by every composed object
pub trait GameObject: Any {
    /// Type tag
    fn kind(&self) -> ObjectKind;

    /// Capabilities contributed by this type and every layer beneath it
    fn capabilities(&self) -> CapabilitySet;

    /// Advance per-frame behavior. Layers call the inner update first.
    fn update(&mut self, _time: &FrameTime) {}

    /// Upcast for typed access
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Objects carrying a [`Transform`]
pub trait Transformable: GameObject {
    /// Local/world transform state
    fn transform(&self) -> &Transform;

    /// Mutable transform state
    fn transform_mut(&mut self) -> &mut Transform;
}

/// Objects that participate in the scene graph
pub trait DisplayObject: Transformable {
    /// Own alpha in `0.0..=1.0` (ancestors are not included)
    fn alpha(&self) -> f32 {
        1.0
    }

    /// Whether the object (and its subtree) is drawn
    fn visible(&self) -> bool;

    /// Show or hide the object
    fn set_visible(&mut self, visible: bool);

    /// Texture binding, if the object draws one
    fn texture(&self) -> Option<&TextureRef> {
        None
    }

    /// Packed 0xRRGGBB tint
    fn tint(&self) -> u32 {
        0xff_ff_ff
    }
}

/// Objects with a settable alpha
pub trait HasAlpha: DisplayObject {
    /// Set the alpha, clamped to `0.0..=1.0`
    fn set_alpha(&mut self, alpha: f32);
}

/// Objects that may own children in a [`SceneGraph`](super::SceneGraph)
pub trait HasChildren: DisplayObject {}

/// A capability transformer: wraps a base satisfying its precondition.
pub trait Layer<B> {
    /// The composed type
    type Output;

    /// Wrap `base`
    fn apply(self, base: B) -> Self::Output;
}

/// Ordered composition of capability layers onto a base type
#[derive(Debug)]
pub struct Compose<B> {
    value: B,
}

impl<B> Compose<B> {
    /// Start from a base value
    pub fn new(base: B) -> Self {
        Self { value: base }
    }

    /// Apply the next layer on top of everything applied so far
    pub fn with<L: Layer<B>>(self, layer: L) -> Compose<L::Output> {
        Compose {
            value: layer.apply(self.value),
        }
    }

    /// Finish composing
    pub fn build(self) -> B {
        self.value
    }
}

/// Implements `as_any`/`as_any_mut` for a type.
macro_rules! impl_as_any {
    () => {
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

/// Forwards `Transformable` to `self.inner`; `$bound` must match the
/// layer's `GameObject` impl.
macro_rules! forward_transformable {
    ($layer:ident, $bound:path) => {
        impl<B: $bound> $crate::display::Transformable for $layer<B> {
            fn transform(&self) -> &$crate::display::Transform {
                self.inner.transform()
            }

            fn transform_mut(&mut self) -> &mut $crate::display::Transform {
                self.inner.transform_mut()
            }
        }
    };
}

/// Forwards `DisplayObject` to `self.inner`.
macro_rules! forward_display_object {
    ($layer:ident) => {
        impl<B: $crate::display::DisplayObject> $crate::display::DisplayObject for $layer<B> {
            fn alpha(&self) -> f32 {
                self.inner.alpha()
            }

            fn visible(&self) -> bool {
                self.inner.visible()
            }

            fn set_visible(&mut self, visible: bool) {
                self.inner.set_visible(visible);
            }

            fn texture(&self) -> Option<&$crate::display::TextureRef> {
                self.inner.texture()
            }

            fn tint(&self) -> u32 {
                self.inner.tint()
            }
        }
    };
}

/// Forwards `HasAlpha` to `self.inner`.
macro_rules! forward_has_alpha {
    ($layer:ident) => {
        impl<B: $crate::display::HasAlpha> $crate::display::HasAlpha for $layer<B> {
            fn set_alpha(&mut self, alpha: f32) {
                self.inner.set_alpha(alpha);
            }
        }
    };
}

/// Forwards the `HasChildren` marker.
macro_rules! forward_has_children {
    ($layer:ident) => {
        impl<B: $crate::display::HasChildren> $crate::display::HasChildren for $layer<B> {}
    };
}

pub(crate) use {
    forward_display_object, forward_has_alpha, forward_has_children, forward_transformable,
    impl_as_any,
};
