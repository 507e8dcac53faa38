//! Scene graph core
//!
//! ## Architecture
//!
//! ```text
//! Compose (capability layers)  ->  concrete display-object type
//!      ↓ insert
//! SceneGraph (arena: owning child lists, weak parent links)
//!      ↓ rooted at
//! DisplayList (one per scene)  ->  RenderSink (external backend)
//! ```
//!
//! Display-object types are built by stacking capability layers
//! ([`Alpha`], [`Parent`], [`Wibble`], [`Wobble`]) over a base type
//! ([`Sprite`], [`Group`]). The graph derives world transforms lazily and
//! caches them per frame; see [`Transform`].

pub mod capability;
pub mod layers;

mod display_list;
mod graph;
mod object;
mod render;
mod transform;

pub use capability::{
    CapabilitySet, Compose, DisplayObject, GameObject, HasAlpha, HasChildren, Layer, ObjectKind,
    Transformable,
};
pub use display_list::DisplayList;
pub use graph::{SceneGraph, WorldState};
pub use layers::{Alpha, AlphaSprite, Container, Parent, Wibble, Wobble};
pub use object::{Group, Sprite, TextureRef};
pub use render::{DrawCommand, RecordingSink, RenderSink};
pub use transform::Transform;
