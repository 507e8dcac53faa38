//! Game driver
//!
//! [`Game`] owns the frame counter, the pause flag, the loader, the texture
//! store and every registered scene. The host calls [`Game::tick`] once per
//! frame; each tick runs, in order:
//!
//! 1. frame counter increment
//! 2. loader processing (unobserved failures go to the host error channel)
//! 3. `create` for scenes whose preload has drained
//! 4. `update` for running scenes, skipped entirely while paused
//! 5. `render` and draw for every created scene, paused or not

use thiserror::Error;

use crate::assets::{AssetError, Loader, TextureManager};
use crate::config::{ConfigError, GameConfig};
use crate::display::RenderSink;
use crate::foundation::time::{Frame, FrameTime, Timer};
use crate::scene::{Scene, SceneError, SceneHost, SceneState};

/// Process-wide game state
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    scenes: Vec<SceneHost>,
    loader: Loader,
    textures: TextureManager,
    timer: Timer,
    frame: Frame,
    elapsed: f32,
    paused: bool,
    booted: bool,
    host_errors: Vec<AssetError>,
}

impl Game {
    /// Create a game. The first scene is started on [`boot`](Self::boot);
    /// the others stay dormant until [`start_scene`](Self::start_scene).
    pub fn new(config: GameConfig, scenes: Vec<Box<dyn Scene>>) -> Result<Self, GameError> {
        config.validate()?;
        if scenes.is_empty() {
            return Err(GameError::NoScenes);
        }

        let mut hosts: Vec<SceneHost> = Vec::with_capacity(scenes.len());
        for scene in scenes {
            if hosts.iter().any(|host| host.key() == scene.key()) {
                return Err(GameError::DuplicateScene(scene.key().to_string()));
            }
            hosts.push(SceneHost::new(scene));
        }

        let mut loader = Loader::default();
        loader.set_path(config.asset_path.clone());

        log::info!(
            "Game '{}' ({}x{}) with {} scene(s)",
            config.title,
            config.width,
            config.height,
            hosts.len()
        );

        Ok(Self {
            config,
            scenes: hosts,
            loader,
            textures: TextureManager::new(),
            timer: Timer::new(),
            frame: 0,
            elapsed: 0.0,
            paused: false,
            booted: false,
            host_errors: Vec::new(),
        })
    }

    /// Replace the loader, e.g. with one reading from memory. The
    /// configured asset path is applied if the loader has none.
    pub fn with_loader(mut self, mut loader: Loader) -> Self {
        if loader.path().is_empty() {
            loader.set_path(self.config.asset_path.clone());
        }
        self.loader = loader;
        self
    }

    /// Start the first scene. Called by the first [`tick`](Self::tick) if
    /// the host has not done so.
    pub fn boot(&mut self) -> Result<(), GameError> {
        if self.booted {
            return Ok(());
        }
        self.booted = true;

        let key = match self.scenes.first() {
            Some(host) => host.key().to_string(),
            None => return Err(GameError::NoScenes),
        };
        log::info!("Booting game, first scene '{}'", key);
        self.start_scene(&key)
    }

    /// Start a dormant scene: runs `init` and `preload`
    pub fn start_scene(&mut self, key: &str) -> Result<(), GameError> {
        let time = self.idle_time();
        let host = Self::host_mut(&mut self.scenes, key)?;
        host.start(&mut self.loader, &mut self.textures, time)
            .map_err(|source| GameError::scene(key, source))
    }

    /// Tear a scene down: runs `shutdown` and releases its display objects
    pub fn stop_scene(&mut self, key: &str) -> Result<(), GameError> {
        let time = self.idle_time();
        let host = Self::host_mut(&mut self.scenes, key)?;
        host.destroy(&mut self.loader, &mut self.textures, time)
            .map_err(|source| GameError::scene(key, source))
    }

    /// Tear down every active scene
    pub fn shutdown(&mut self) -> Result<(), GameError> {
        let time = self.idle_time();
        let mut first_error = None;
        for host in self.scenes.iter_mut().filter(|host| host.state().is_active()) {
            if let Err(source) = host.destroy(&mut self.loader, &mut self.textures, time) {
                log::error!("Scene '{}' failed to shut down: {}", host.key(), source);
                first_error.get_or_insert(GameError::scene(host.key(), source));
            }
        }
        log::info!("Game shut down after {} frame(s)", self.frame);
        first_error.map_or(Ok(()), Err)
    }

    /// Freeze simulation. Rendering continues every tick.
    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Paused at frame {}", self.frame);
        }
        self.paused = true;
        self.sync_pause();
    }

    /// Resume simulation
    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Resumed at frame {}", self.frame);
        }
        self.paused = false;
        self.sync_pause();
    }

    /// Whether simulation is frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance one frame of `delta` seconds, drawing into `sink`.
    ///
    /// A hook error aborts the tick and is returned; the host decides
    /// whether to keep ticking.
    pub fn tick(&mut self, delta: f32, sink: &mut dyn RenderSink) -> Result<(), GameError> {
        self.boot()?;

        self.frame += 1;
        self.elapsed += delta;
        let time = FrameTime::new(self.frame, delta, self.elapsed);

        self.loader.update(&mut self.textures);
        for error in self.loader.take_unhandled() {
            log::error!("Unhandled load failure: {}", error);
            self.host_errors.push(error);
        }

        for host in &mut self.scenes {
            host.try_create(&mut self.loader, &mut self.textures, time, self.paused)
                .map_err(|source| GameError::scene(host.key(), source))?;
        }

        if !self.paused {
            for host in &mut self.scenes {
                host.update(&mut self.loader, &mut self.textures, time)
                    .map_err(|source| GameError::scene(host.key(), source))?;
            }
        }

        for host in &mut self.scenes {
            host.render(&mut self.loader, &mut self.textures, time, sink)
                .map_err(|source| GameError::scene(host.key(), source))?;
        }
        Ok(())
    }

    /// Advance one frame using wall-clock time since the previous call
    pub fn tick_realtime(&mut self, sink: &mut dyn RenderSink) -> Result<(), GameError> {
        self.timer.update();
        let delta = self.timer.delta_time();
        self.tick(delta, sink)
    }

    /// Run `ticks` frames of a fixed `delta`
    pub fn run(&mut self, ticks: u64, delta: f32, sink: &mut dyn RenderSink) -> Result<(), GameError> {
        for _ in 0..ticks {
            self.tick(delta, sink)?;
        }
        Ok(())
    }

    /// Boot configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Frames ticked so far
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Seconds of simulated time ticked so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Look up a scene by key
    pub fn scene(&self, key: &str) -> Option<&SceneHost> {
        self.scenes.iter().find(|host| host.key() == key)
    }

    /// Look up a scene by key, mutably
    pub fn scene_mut(&mut self, key: &str) -> Option<&mut SceneHost> {
        self.scenes.iter_mut().find(|host| host.key() == key)
    }

    /// Lifecycle state of a scene
    pub fn scene_state(&self, key: &str) -> Option<SceneState> {
        self.scene(key).map(SceneHost::state)
    }

    /// Keys of scenes that have been started and not destroyed
    pub fn active_scenes(&self) -> Vec<&str> {
        self.scenes
            .iter()
            .filter(|host| host.state().is_active())
            .map(SceneHost::key)
            .collect()
    }

    /// Shared texture store
    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Shared texture store, mutably
    pub fn textures_mut(&mut self) -> &mut TextureManager {
        &mut self.textures
    }

    /// Shared loader
    pub fn loader_mut(&mut self) -> &mut Loader {
        &mut self.loader
    }

    /// Load failures no scene observed, oldest first
    pub fn host_errors(&self) -> &[AssetError] {
        &self.host_errors
    }

    /// Drain the host error channel
    pub fn take_host_errors(&mut self) -> Vec<AssetError> {
        std::mem::take(&mut self.host_errors)
    }

    fn idle_time(&self) -> FrameTime {
        FrameTime::new(self.frame, 0.0, self.elapsed)
    }

    fn sync_pause(&mut self) {
        for host in &mut self.scenes {
            if let Err(e) = host.set_paused(self.paused) {
                log::error!("Scene '{}' could not follow pause flag: {}", host.key(), e);
            }
        }
    }

    fn host_mut<'s>(scenes: &'s mut [SceneHost], key: &str) -> Result<&'s mut SceneHost, GameError> {
        scenes
            .iter_mut()
            .find(|host| host.key() == key)
            .ok_or_else(|| GameError::UnknownScene(key.to_string()))
    }
}

/// Game-level errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A scene hook or lifecycle step failed
    #[error("Scene '{key}' failed: {source}")]
    Scene {
        /// Scene key
        key: String,
        /// Underlying error
        #[source]
        source: SceneError,
    },

    /// The game was created without scenes
    #[error("A game needs at least one scene")]
    NoScenes,

    /// No scene is registered under the key
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// Two scenes share a key
    #[error("Duplicate scene key: {0}")]
    DuplicateScene(String),
}

impl GameError {
    fn scene(key: &str, source: SceneError) -> Self {
        GameError::Scene {
            key: key.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSink;
    use crate::scene::SceneContext;

    struct Empty(&'static str);

    impl Scene for Empty {
        fn key(&self) -> &str {
            self.0
        }
    }

    struct Dots;

    impl Scene for Dots {
        fn key(&self) -> &str {
            "dots"
        }

        fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
            ctx.textures().add_color("dot", 0xffffff, 2, 2)?;
            ctx.add().sprite(0.0, 0.0, "dot", None);
            ctx.add().sprite(5.0, 5.0, "dot", None);
            Ok(())
        }
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(Game::new(GameConfig::default(), Vec::new()), Err(GameError::NoScenes)));
        assert!(matches!(
            Game::new(GameConfig::new(0, 0), vec![Box::new(Empty("a"))]),
            Err(GameError::Config(_))
        ));
        assert!(matches!(
            Game::new(GameConfig::default(), vec![Box::new(Empty("a")), Box::new(Empty("a"))]),
            Err(GameError::DuplicateScene(_))
        ));
    }

    #[test]
    fn test_first_scene_is_started_on_first_tick() {
        let scenes: Vec<Box<dyn Scene>> = vec![Box::new(Dots), Box::new(Empty("later"))];
        let mut game = Game::new(GameConfig::default(), scenes).unwrap();
        let mut sink = RecordingSink::new();

        game.tick(0.016, &mut sink).unwrap();

        assert_eq!(game.frame(), 1);
        assert_eq!(game.scene_state("dots"), Some(SceneState::Running));
        assert_eq!(game.scene_state("later"), Some(SceneState::Constructed));
        assert_eq!(game.active_scenes(), vec!["dots"]);
        assert_eq!(sink.commands().len(), 2);
    }

    #[test]
    fn test_frame_counts_paused_ticks() {
        let mut game = Game::new(GameConfig::default(), vec![Box::new(Dots)]).unwrap();
        let mut sink = RecordingSink::new();

        game.pause();
        game.run(3, 0.5, &mut sink).unwrap();

        assert_eq!(game.frame(), 3);
        assert_eq!(game.elapsed(), 1.5);
        assert_eq!(game.scene_state("dots"), Some(SceneState::Paused));

        game.resume();
        assert_eq!(game.scene_state("dots"), Some(SceneState::Running));
    }

    #[test]
    fn test_unknown_scene() {
        let mut game = Game::new(GameConfig::default(), vec![Box::new(Empty("a"))]).unwrap();
        assert!(matches!(game.start_scene("nope"), Err(GameError::UnknownScene(_))));
    }

    #[test]
    fn test_stop_and_shutdown() {
        let scenes: Vec<Box<dyn Scene>> = vec![Box::new(Dots), Box::new(Empty("other"))];
        let mut game = Game::new(GameConfig::default(), scenes).unwrap();
        let mut sink = RecordingSink::new();

        game.tick(0.016, &mut sink).unwrap();
        game.start_scene("other").unwrap();
        game.stop_scene("dots").unwrap();

        assert_eq!(game.scene_state("dots"), Some(SceneState::Destroyed));
        assert!(game.scene("dots").unwrap().display().is_empty());

        game.shutdown().unwrap();
        assert!(game.active_scenes().is_empty());
    }
}
