//! Headless sandbox
//!
//! Builds a small scene of wibbling and wobbling sprites inside nested
//! containers and ticks it at a fixed rate, pausing halfway through. Draw
//! commands go to a counting sink instead of a GPU backend.
//!
//! Usage: `sandbox [config.toml|config.ron] [ticks]`

use rand::Rng;
use stage_engine::config::ConfigError;
use stage_engine::display::{Container, Group, Wobble};
use stage_engine::foundation::math::constants::TAU;
use stage_engine::prelude::*;
use thiserror::Error;

const DEFAULT_TICKS: u64 = 240;
const TICK_SECONDS: f32 = 1.0 / 60.0;
const SPRITE_COUNT: usize = 12;

#[derive(Error, Debug)]
enum SandboxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Invalid tick count '{0}'")]
    Ticks(String),
}

/// Counts draw commands per tick
#[derive(Default)]
struct StatsSink {
    frame_draws: usize,
    total_draws: usize,
    faintest_alpha: f32,
}

impl StatsSink {
    fn new() -> Self {
        Self {
            faintest_alpha: 1.0,
            ..Self::default()
        }
    }

    fn end_frame(&mut self) -> usize {
        std::mem::take(&mut self.frame_draws)
    }
}

impl RenderSink for StatsSink {
    fn draw(&mut self, command: &DrawCommand) {
        self.frame_draws += 1;
        self.total_draws += 1;
        self.faintest_alpha = self.faintest_alpha.min(command.alpha);
    }
}

/// A ring of sprites orbiting the center of the screen
struct Orbit {
    width: f32,
    height: f32,
    ring: Option<Handle<Wobble<Container>>>,
}

impl Orbit {
    fn new(config: &GameConfig) -> Self {
        Self {
            width: config.width as f32,
            height: config.height as f32,
            ring: None,
        }
    }
}

impl Scene for Orbit {
    fn key(&self) -> &str {
        "orbit"
    }

    fn preload(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        // No logo ships with the sandbox: the failure goes to the host error
        // channel and the logo sprite is never drawn.
        let _ = ctx.load().image("logo", "logo.png");
        Ok(())
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), SceneError> {
        ctx.textures().add_grid("tiles", 0x203040, 0x405060, 64, 64, 2, 2)?;
        ctx.textures().add_color("dot", 0xffcc00, 4, 4)?;

        ctx.add().sprite(self.width / 2.0, 40.0, "logo", None);
        for i in 0..4 {
            let x = 32.0 + 64.0 * i as f32;
            ctx.add().sprite(x, self.height - 32.0, "tiles", Some(i.to_string().as_str()));
        }

        let ring = ctx.add().existing(
            Compose::new(Container::new(Group::new(self.width / 2.0, self.height / 2.0)))
                .with(layers::wobble(0.3, 0.25))
                .build(),
        );

        let mut rng = rand::thread_rng();
        for i in 0..SPRITE_COUNT {
            let angle = TAU * i as f32 / SPRITE_COUNT as f32;
            let radius: f32 = rng.gen_range(80.0..160.0);
            let sprite = ctx.add().existing(
                Compose::new(Sprite::new(angle.cos() * radius, angle.sin() * radius, "dot"))
                    .with(layers::alpha(rng.gen_range(0.4..1.0)))
                    .with(layers::wibble(rng.gen_range(2.0..8.0), rng.gen_range(0.5..2.0)))
                    .build(),
            );
            ctx.graph().add_child(ring, sprite);
        }

        log::info!("Created {} display objects", ctx.display().graph().len() - 1);
        self.ring = Some(ring);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, time: &FrameTime) -> Result<(), SceneError> {
        if let Some(ring) = self.ring {
            let spin = 0.5 * time.delta;
            let pulse = 1.0 + 0.1 * time.now.sin();
            ctx.graph().with_transform(ring, |t, frame| {
                t.set_rotation(t.rotation() + spin, frame);
                t.set_scale(pulse, pulse, frame);
            });
        }
        Ok(())
    }
}

fn main() -> Result<(), SandboxError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load_from_file(&path)?,
        None => GameConfig::default().with_title("Sandbox"),
    };
    let ticks = match args.next() {
        Some(raw) => raw.parse().map_err(|_| SandboxError::Ticks(raw))?,
        None => DEFAULT_TICKS,
    };

    stage_engine::foundation::logging::init_with_level(&config.log_level);

    let scene = Orbit::new(&config);
    let mut game = Game::new(config, vec![Box::new(scene)])?;
    let mut sink = StatsSink::new();

    for tick in 0..ticks {
        if tick == ticks / 2 {
            game.pause();
        } else if tick == ticks / 2 + ticks / 4 {
            game.resume();
        }

        game.tick(TICK_SECONDS, &mut sink)?;
        let drawn = sink.end_frame();
        if tick % 60 == 0 {
            log::info!("Frame {}: {} draw(s), paused = {}", game.frame(), drawn, game.is_paused());
        }
    }

    for error in game.take_host_errors() {
        log::warn!("Host error: {}", error);
    }
    game.shutdown()?;

    log::info!(
        "Ran {} frame(s), {} draw command(s), faintest alpha {:.2}",
        game.frame(),
        sink.total_draws,
        sink.faintest_alpha
    );
    Ok(())
}
