//! Scene lifecycle
//!
//! A [`Scene`] is user code: a set of hooks the [`Game`](crate::game::Game)
//! calls in a fixed order. The game pairs each scene with a [`SceneHost`]
//! that owns the scene's [`DisplayList`](crate::display::DisplayList) and
//! tracks its [`SceneState`].
//!
//! ```text
//! Constructed -> Initialized -> Preloading -> Created -> Running <-> Paused
//!                                                              \-> Destroyed
//! ```
//!
//! Hooks receive a [`SceneContext`] that borrows the scene's display list
//! and the game's loader and texture store for the duration of the call.

mod context;
mod factory;
mod host;
mod state;

pub use context::SceneContext;
pub use factory::GameObjectFactory;
pub use host::SceneHost;
pub use state::SceneState;

use crate::assets::AssetError;
use crate::foundation::time::FrameTime;
use thiserror::Error;

/// Scene hooks
///
/// Every hook except [`key`](Scene::key) has a no-op default. An error
/// returned from a hook is propagated to the caller of
/// [`Game::tick`](crate::game::Game::tick).
pub trait Scene {
    /// Unique name of the scene within a game
    fn key(&self) -> &str;

    /// Called once when the scene is started
    fn init(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called once after `init`; queue load requests here
    fn preload(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called once when every request queued so far has been processed
    fn create(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called every tick while the scene runs and the game is not paused
    fn update(&mut self, _ctx: &mut SceneContext<'_>, _time: &FrameTime) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called every tick before the display list is drawn, paused or not
    fn render(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }

    /// Called once before the scene's display objects are released
    fn shutdown(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        Ok(())
    }
}

/// Scene errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Lifecycle transition not allowed from the current state
    #[error("Invalid scene transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current state
        from: SceneState,
        /// Requested state
        to: SceneState,
    },

    /// User hook failed
    #[error("Scene hook failed: {0}")]
    Hook(String),

    /// Asset error surfaced by a hook
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}
