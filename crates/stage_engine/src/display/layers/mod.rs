//! Capability layers
//!
//! Each layer comes with a constructor function returning its
//! [`Layer`](super::Layer) config, for use with [`Compose`](super::Compose).

mod alpha;
mod parent;
mod wibble;
mod wobble;

pub use alpha::{Alpha, AlphaLayer, AlphaSprite};
pub use parent::{Container, Parent, ParentLayer};
pub use wibble::{Wibble, WibbleLayer};
pub use wobble::{Wobble, WobbleLayer};

/// Own alpha value (requires a display object)
pub fn alpha(alpha: f32) -> AlphaLayer {
    AlphaLayer { alpha }
}

/// Ability to own children (requires a transform)
pub fn parent() -> ParentLayer {
    ParentLayer
}

/// Horizontal oscillation (requires a transform)
pub fn wibble(amplitude: f32, frequency: f32) -> WibbleLayer {
    WibbleLayer { amplitude, frequency }
}

/// Rotational oscillation (requires a transform)
pub fn wobble(angle: f32, frequency: f32) -> WobbleLayer {
    WobbleLayer { angle, frequency }
}
