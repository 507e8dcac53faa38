//! Per-hook borrow of everything a scene works with

use super::factory::GameObjectFactory;
use crate::assets::{Loader, TextureManager};
use crate::display::{DisplayList, SceneGraph};
use crate::foundation::time::{Frame, FrameTime};

/// What a scene hook may touch.
///
/// The display list belongs to the scene; the loader and texture store are
/// the game's and are only borrowed for the call.
#[derive(Debug)]
pub struct SceneContext<'a> {
    display: &'a mut DisplayList,
    loader: &'a mut Loader,
    textures: &'a mut TextureManager,
    time: FrameTime,
}

impl<'a> SceneContext<'a> {
    /// Bundle the borrows for one hook call
    pub fn new(
        display: &'a mut DisplayList,
        loader: &'a mut Loader,
        textures: &'a mut TextureManager,
        time: FrameTime,
    ) -> Self {
        Self {
            display,
            loader,
            textures,
            time,
        }
    }

    /// Factory that creates objects directly in this scene's display list
    pub fn add(&mut self) -> GameObjectFactory<'_> {
        GameObjectFactory::new(self.display)
    }

    /// The game's loader
    pub fn load(&mut self) -> &mut Loader {
        self.loader
    }

    /// The game's texture store
    pub fn textures(&mut self) -> &mut TextureManager {
        self.textures
    }

    /// This scene's display list
    pub fn display(&self) -> &DisplayList {
        self.display
    }

    /// This scene's display list, mutably
    pub fn display_mut(&mut self) -> &mut DisplayList {
        self.display
    }

    /// Shortcut to the display list's arena, for hierarchy and transform edits
    pub fn graph(&mut self) -> &mut SceneGraph {
        self.display.graph_mut()
    }

    /// Timing of the current tick
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Current frame
    pub fn frame(&self) -> Frame {
        self.time.frame
    }
}
