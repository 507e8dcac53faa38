//! Lifecycle driver for one scene

use std::fmt;

use super::context::SceneContext;
use super::state::SceneState;
use super::{Scene, SceneError};
use crate::assets::{Loader, TextureManager};
use crate::display::{DisplayList, RenderSink};
use crate::foundation::time::FrameTime;

/// A user [`Scene`] together with the display list it owns and its
/// lifecycle state.
///
/// Hooks are only ever called in lifecycle order; each transition is
/// checked with [`SceneState::can_transition_to`]. A scene whose `init`,
/// `preload` or `create` hook fails is abandoned: its display list is
/// released and it goes straight to `Destroyed` without `shutdown`, while
/// the error is still returned to the caller.
pub struct SceneHost {
    scene: Box<dyn Scene>,
    display: DisplayList,
    state: SceneState,
}

impl fmt::Debug for SceneHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneHost")
            .field("key", &self.scene.key())
            .field("state", &self.state)
            .field("display", &self.display)
            .finish()
    }
}

impl SceneHost {
    /// Wrap a scene in the `Constructed` state with an empty display list
    pub fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            display: DisplayList::new(),
            state: SceneState::Constructed,
        }
    }

    /// Scene key
    pub fn key(&self) -> &str {
        self.scene.key()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The scene's display list
    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    /// The scene's display list, mutably
    pub fn display_mut(&mut self) -> &mut DisplayList {
        &mut self.display
    }

    /// Move to `to`, rejecting steps the lifecycle does not allow
    pub fn transition(&mut self, to: SceneState) -> Result<(), SceneError> {
        if !self.state.can_transition_to(to) {
            return Err(SceneError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        log::info!("Scene '{}': {} -> {}", self.key(), self.state, to);
        self.state = to;
        Ok(())
    }

    /// Run `init` then `preload`, and start the loader on whatever was
    /// queued
    pub fn start(
        &mut self,
        loader: &mut Loader,
        textures: &mut TextureManager,
        time: FrameTime,
    ) -> Result<(), SceneError> {
        self.display.begin_frame(time.frame);

        self.transition(SceneState::Initialized)?;
        let init = self
            .scene
            .init(&mut SceneContext::new(&mut self.display, loader, textures, time));
        if let Err(e) = init {
            return Err(self.abandon("init", e));
        }

        self.transition(SceneState::Preloading)?;
        let preload = self
            .scene
            .preload(&mut SceneContext::new(&mut self.display, loader, textures, time));
        if let Err(e) = preload {
            return Err(self.abandon("preload", e));
        }
        loader.start();
        Ok(())
    }

    /// Run `create` once the loader has drained, entering `Running` or
    /// `Paused` depending on `paused`.
    ///
    /// Returns whether `create` ran.
    pub fn try_create(
        &mut self,
        loader: &mut Loader,
        textures: &mut TextureManager,
        time: FrameTime,
        paused: bool,
    ) -> Result<bool, SceneError> {
        if self.state != SceneState::Preloading || !loader.is_idle() {
            return Ok(false);
        }

        self.display.begin_frame(time.frame);
        self.transition(SceneState::Created)?;
        let create = self
            .scene
            .create(&mut SceneContext::new(&mut self.display, loader, textures, time));
        if let Err(e) = create {
            return Err(self.abandon("create", e));
        }

        let next = if paused {
            SceneState::Paused
        } else {
            SceneState::Running
        };
        self.transition(next)?;
        Ok(true)
    }

    /// Follow the game's pause flag. No-op outside `Running`/`Paused`.
    pub fn set_paused(&mut self, paused: bool) -> Result<(), SceneError> {
        match (self.state, paused) {
            (SceneState::Running, true) => self.transition(SceneState::Paused),
            (SceneState::Paused, false) => self.transition(SceneState::Running),
            _ => Ok(()),
        }
    }

    /// Run the `update` hook and every object's behavior. Only a `Running`
    /// scene is updated; returns whether it was.
    pub fn update(
        &mut self,
        loader: &mut Loader,
        textures: &mut TextureManager,
        time: FrameTime,
    ) -> Result<bool, SceneError> {
        if self.state != SceneState::Running {
            return Ok(false);
        }

        self.display.begin_frame(time.frame);
        self.scene.update(
            &mut SceneContext::new(&mut self.display, loader, textures, time),
            &time,
        )?;
        self.display.update(&time);
        Ok(true)
    }

    /// Run the `render` hook and draw the display list. Scenes that have
    /// not reached `create` draw nothing; returns the number of draw
    /// commands emitted.
    pub fn render(
        &mut self,
        loader: &mut Loader,
        textures: &mut TextureManager,
        time: FrameTime,
        sink: &mut dyn RenderSink,
    ) -> Result<usize, SceneError> {
        if !self.state.is_visible() {
            return Ok(0);
        }

        self.display.begin_frame(time.frame);
        self.scene
            .render(&mut SceneContext::new(&mut self.display, loader, textures, time))?;
        Ok(self.display.render(textures, sink))
    }

    /// Tear down after a failed setup hook
    fn abandon(&mut self, hook: &str, error: SceneError) -> SceneError {
        log::error!("Scene '{}' failed in {}: {}", self.key(), hook, error);
        self.display.clear();
        log::info!("Scene '{}': {} -> {}", self.key(), self.state, SceneState::Destroyed);
        self.state = SceneState::Destroyed;
        error
    }

    /// Run `shutdown` and release every display object.
    ///
    /// The scene ends up `Destroyed` even if the hook fails; the hook's
    /// error is still returned.
    pub fn destroy(
        &mut self,
        loader: &mut Loader,
        textures: &mut TextureManager,
        time: FrameTime,
    ) -> Result<(), SceneError> {
        if self.state == SceneState::Destroyed {
            return Ok(());
        }

        let hook = if self.state.is_active() {
            self.scene
                .shutdown(&mut SceneContext::new(&mut self.display, loader, textures, time))
        } else {
            Ok(())
        };

        self.display.clear();
        self.transition(SceneState::Destroyed)?;
        hook
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemorySource;
    use crate::display::RecordingSink;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<&'static str>>>;

    struct Probe {
        calls: Calls,
        fail_create: bool,
    }

    impl Scene for Probe {
        fn key(&self) -> &str {
            "probe"
        }

        fn init(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            self.calls.borrow_mut().push("init");
            Ok(())
        }

        fn preload(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            self.calls.borrow_mut().push("preload");
            drop(ctx.load().image("ship", "ship.png"));
            Ok(())
        }

        fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            self.calls.borrow_mut().push("create");
            if self.fail_create {
                return Err(SceneError::Hook("no ship".into()));
            }
            ctx.textures().add_color("dot", 0xffffff, 1, 1)?;
            ctx.add().sprite(0.0, 0.0, "dot", None);
            Ok(())
        }

        fn update(&mut self, _ctx: &mut SceneContext<'_>, _time: &FrameTime) -> Result<(), SceneError> {
            self.calls.borrow_mut().push("update");
            Ok(())
        }

        fn shutdown(&mut self, _ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            self.calls.borrow_mut().push("shutdown");
            Ok(())
        }
    }

    fn host(fail_create: bool) -> (SceneHost, Calls) {
        let calls = Calls::default();
        let probe = Probe {
            calls: Rc::clone(&calls),
            fail_create,
        };
        (SceneHost::new(Box::new(probe)), calls)
    }

    #[test]
    fn test_create_waits_for_loader() {
        let (mut host, calls) = host(false);
        let mut loader = Loader::new(MemorySource::new());
        let mut textures = TextureManager::new();
        let time = FrameTime::new(1, 0.016, 0.016);

        host.start(&mut loader, &mut textures, time).unwrap();
        assert_eq!(host.state(), SceneState::Preloading);
        assert!(!host.try_create(&mut loader, &mut textures, time, false).unwrap());

        loader.update(&mut textures);
        assert!(host.try_create(&mut loader, &mut textures, time, false).unwrap());
        assert_eq!(host.state(), SceneState::Running);
        assert_eq!(host.display().len(), 1);
        assert_eq!(*calls.borrow(), vec!["init", "preload", "create"]);
    }

    #[test]
    fn test_paused_scene_renders_without_update() {
        let (mut host, calls) = host(false);
        let mut loader = Loader::new(MemorySource::new());
        let mut textures = TextureManager::new();
        let mut sink = RecordingSink::new();
        let time = FrameTime::new(1, 0.016, 0.016);

        host.start(&mut loader, &mut textures, time).unwrap();
        loader.update(&mut textures);
        host.try_create(&mut loader, &mut textures, time, true).unwrap();
        assert_eq!(host.state(), SceneState::Paused);

        assert!(!host.update(&mut loader, &mut textures, time).unwrap());
        assert_eq!(host.render(&mut loader, &mut textures, time, &mut sink).unwrap(), 1);
        assert!(!calls.borrow().contains(&"update"));

        host.set_paused(false).unwrap();
        assert!(host.update(&mut loader, &mut textures, time).unwrap());
    }

    #[test]
    fn test_destroy_runs_shutdown_and_clears() {
        let (mut host, calls) = host(false);
        let mut loader = Loader::new(MemorySource::new());
        let mut textures = TextureManager::new();
        let time = FrameTime::new(1, 0.016, 0.016);

        host.start(&mut loader, &mut textures, time).unwrap();
        loader.update(&mut textures);
        host.try_create(&mut loader, &mut textures, time, false).unwrap();
        host.destroy(&mut loader, &mut textures, time).unwrap();

        assert_eq!(host.state(), SceneState::Destroyed);
        assert!(host.display().is_empty());
        assert_eq!(calls.borrow().last(), Some(&"shutdown"));

        // Terminal
        host.destroy(&mut loader, &mut textures, time).unwrap();
        assert!(matches!(
            host.transition(SceneState::Running),
            Err(SceneError::InvalidTransition { from: SceneState::Destroyed, .. })
        ));
    }

    #[test]
    fn test_hook_error_propagates() {
        let (mut host, _) = host(true);
        let mut loader = Loader::new(MemorySource::new());
        let mut textures = TextureManager::new();
        let time = FrameTime::new(1, 0.016, 0.016);

        host.start(&mut loader, &mut textures, time).unwrap();
        loader.update(&mut textures);

        let result = host.try_create(&mut loader, &mut textures, time, false);
        assert!(matches!(result, Err(SceneError::Hook(_))));
    }

    #[test]
    fn test_failed_create_abandons_scene() {
        let (mut host, calls) = host(true);
        let mut loader = Loader::new(MemorySource::new());
        let mut textures = TextureManager::new();
        let mut sink = RecordingSink::new();
        let time = FrameTime::new(1, 0.016, 0.016);

        host.start(&mut loader, &mut textures, time).unwrap();
        loader.update(&mut textures);
        assert!(host.try_create(&mut loader, &mut textures, time, false).is_err());

        assert_eq!(host.state(), SceneState::Destroyed);
        assert!(host.display().is_empty());
        assert!(!host.try_create(&mut loader, &mut textures, time, false).unwrap());
        assert!(!host.update(&mut loader, &mut textures, time).unwrap());
        assert_eq!(host.render(&mut loader, &mut textures, time, &mut sink).unwrap(), 0);

        host.destroy(&mut loader, &mut textures, time).unwrap();
        assert!(!calls.borrow().contains(&"shutdown"));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let (mut host, _) = host(false);
        let mut loader = Loader::new(MemorySource::new());
        let mut textures = TextureManager::new();
        let time = FrameTime::new(1, 0.016, 0.016);

        host.start(&mut loader, &mut textures, time).unwrap();
        assert!(host.start(&mut loader, &mut textures, time).is_err());
    }
}
