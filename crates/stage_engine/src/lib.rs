//! # Stage Engine
//!
//! A 2D scene-graph core for frame-driven games.
//!
//! ## Features
//!
//! - **Capability composition**: display-object types built by stacking
//!   alpha, parenting and procedural-motion layers, checked at compile time
//! - **Arena scene graph**: owning child lists, weak parent links, reparenting
//!   and cycle rejection
//! - **Lazy world transforms**: frame-stamped caches resolved top-down
//! - **Scene lifecycle**: init, preload, create, update, render, shutdown
//! - **Deferred textures**: sprites may reference textures still loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stage_engine::prelude::*;
//!
//! struct Title;
//!
//! impl Scene for Title {
//!     fn key(&self) -> &str {
//!         "title"
//!     }
//!
//!     fn preload(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
//!         let _logo = ctx.load().image("logo", "logo.png");
//!         Ok(())
//!     }
//!
//!     fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
//!         let logo = ctx.add().sprite(400.0, 300.0, "logo", None);
//!         ctx.graph().with_transform(logo, |t, frame| t.set_scale(2.0, 2.0, frame));
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     stage_engine::foundation::logging::init();
//!
//!     let mut game = Game::new(GameConfig::default(), vec![Box::new(Title)])?;
//!     let mut sink = RecordingSink::new();
//!     game.run(60, 1.0 / 60.0, &mut sink)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

pub mod assets;
pub mod config;
pub mod display;
pub mod foundation;
pub mod game;
pub mod scene;

pub use game::{Game, GameError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, LoadHandle, Loader, TextureManager},
        config::{Color, Config, GameConfig},
        display::{
            layers, AlphaSprite, Compose, Container, DisplayList, DisplayObject, DrawCommand,
            GameObject, HasAlpha, HasChildren, RecordingSink, RenderSink, SceneGraph, Sprite,
            Transform, Transformable,
        },
        foundation::{
            collections::{Handle, ObjectId},
            time::{Frame, FrameTime},
        },
        scene::{GameObjectFactory, Scene, SceneContext, SceneError, SceneState},
        Game, GameError,
    };
}
